use axum::{
    extract::{Query, State},
    response::Html,
};
use tracing::{debug, info, instrument};

use super::PageQuery;
use crate::AppState;
use crate::errors::AppError;
use crate::views;

#[instrument(skip_all, fields(page = query.page))]
pub(super) async fn list_posts<S: AppState>(
    State(state): State<S>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    debug!("Processing list posts request");

    let listing = state
        .dashboard()
        .posts_page(query.page.unwrap_or(1))
        .await?;

    debug!(
        returned_count = listing.items.len(),
        total = listing.window.total,
        "Retrieved posts page"
    );
    Ok(Html(views::posts_page(&listing, &[])))
}

#[instrument(skip_all)]
pub(super) async fn fetch_posts<S: AppState>(
    State(state): State<S>,
) -> Result<Html<String>, AppError> {
    let dashboard = state.dashboard();
    let outcome = dashboard.fetch_posts().await?;
    info!(outcome = ?outcome, "Fetch posts finished");

    let listing = dashboard.posts_page(1).await?;
    Ok(Html(views::posts_page(
        &listing,
        &views::posts_notices(&outcome),
    )))
}
