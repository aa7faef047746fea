use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::AppState;
use crate::dashboard::NewsFilter;
use crate::errors::AppError;
use crate::views;

#[derive(Debug, Deserialize)]
pub(super) struct NewsQuery {
    category: Option<String>,
    q: Option<String>,
    page: Option<u32>,
}

#[instrument(skip_all, fields(category = ?query.category, has_term = query.q.is_some(), page = query.page))]
pub(super) async fn list_news<S: AppState>(
    State(state): State<S>,
    Query(query): Query<NewsQuery>,
) -> Result<Html<String>, AppError> {
    debug!("Processing list news request");

    let dashboard = state.dashboard();
    let filter = NewsFilter::new(query.category, query.q);
    let listing = dashboard
        .news_page(&filter, query.page.unwrap_or(1))
        .await?;

    debug!(
        returned_count = listing.items.len(),
        total = listing.window.total,
        "Retrieved news page"
    );
    Ok(Html(views::news_page(
        &listing,
        &filter,
        &dashboard.categories(),
        &[],
    )))
}

#[instrument(skip_all)]
pub(super) async fn fetch_news<S: AppState>(
    State(state): State<S>,
) -> Result<Html<String>, AppError> {
    let dashboard = state.dashboard();
    let outcome = dashboard.fetch_news().await?;
    info!(
        stored = outcome.stored,
        warnings = outcome.warnings.len(),
        "Fetch news finished"
    );

    let filter = NewsFilter::default();
    let listing = dashboard.news_page(&filter, 1).await?;
    Ok(Html(views::news_page(
        &listing,
        &filter,
        &dashboard.categories(),
        &views::news_notices(&outcome),
    )))
}
