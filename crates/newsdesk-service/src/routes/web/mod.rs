use axum::{
    Router,
    extract::State,
    response::Html,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::AppState;
use crate::errors::AppError;
use crate::views;

mod news;
mod posts;

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<u32>,
}

#[instrument(skip_all)]
async fn home<S: AppState>(State(state): State<S>) -> Result<Html<String>, AppError> {
    debug!("Rendering home page");

    let overview = state.dashboard().overview().await?;
    Ok(Html(views::home_page(&overview, &[])))
}

#[instrument(skip_all)]
async fn refresh<S: AppState>(State(state): State<S>) -> Result<Html<String>, AppError> {
    let dashboard = state.dashboard();
    let outcome = dashboard.refresh_all().await?;
    info!(
        cleared_posts = outcome.cleared_posts,
        stored_news = outcome.news.stored,
        "Refreshed all data"
    );

    let overview = dashboard.overview().await?;
    Ok(Html(views::home_page(
        &overview,
        &views::refresh_notices(&outcome),
    )))
}

pub fn create_web_router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/", get(home::<S>))
        .route("/refresh", post(refresh::<S>))
        .route("/posts", get(posts::list_posts::<S>))
        .route("/posts/fetch", post(posts::fetch_posts::<S>))
        .route("/news", get(news::list_news::<S>))
        .route("/news/fetch", post(news::fetch_news::<S>))
}
