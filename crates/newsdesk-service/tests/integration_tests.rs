use anyhow::Result;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use std::net::SocketAddr;
use tower::{Service, ServiceExt};

mod common;

use common::{Upstream, row_card_page, server_utils::create_test_server, spawn_upstream, test_config};

mod helpers {
    use super::*;
    use crate::common::shared_test_connection;
    use newsdesk_service::{DefaultAppState, create_app};

    pub fn create_test_app(upstream: SocketAddr) -> Result<Router> {
        let config = test_config(upstream, 1, &[("tech", "/tech")]);
        let state = DefaultAppState::new(shared_test_connection(), &config)?;
        Ok(create_app(state))
    }

    pub async fn make_request(
        app: &mut Router,
        request: Request<Body>,
    ) -> Result<(StatusCode, String)> {
        let response = ServiceExt::<Request<Body>>::ready(app)
            .await?
            .call(request)
            .await?;

        let status = response.status();
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, String::from_utf8(body_bytes.to_vec())?))
    }
}

const DISABLED_PREVIOUS: &str =
    r#"<span class="pager-link disabled" aria-disabled="true">Previous</span>"#;
const DISABLED_NEXT: &str = r#"<span class="pager-link disabled" aria-disabled="true">Next</span>"#;

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let addr = spawn_upstream(Upstream::default()).await;
    let mut app = helpers::create_test_app(addr)?;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())?;

    let (status, body) = helpers::make_request(&mut app, request).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
    Ok(())
}

#[tokio::test]
async fn test_home_shows_counts_and_actions() -> Result<()> {
    let addr = spawn_upstream(Upstream::default()).await;
    let mut app = helpers::create_test_app(addr)?;

    let request = Request::builder().uri("/").body(Body::empty())?;
    let (status, body) = helpers::make_request(&mut app, request).await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<a href="/posts">0 posts</a>"#));
    assert!(body.contains(r#"<a href="/news">0 news items</a>"#));
    assert!(body.contains(r#"action="/posts/fetch""#));
    assert!(body.contains(r#"action="/news/fetch""#));
    assert!(body.contains(r#"action="/refresh""#));
    Ok(())
}

#[tokio::test]
async fn test_malformed_page_is_rejected() -> Result<()> {
    let addr = spawn_upstream(Upstream::default()).await;
    let mut app = helpers::create_test_app(addr)?;

    let request = Request::builder()
        .uri("/posts?page=abc")
        .body(Body::empty())?;
    let (status, _body) = helpers::make_request(&mut app, request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_fetch_posts_then_guarded_second_fetch() -> Result<()> {
    let addr = spawn_upstream(Upstream::default().with_posts(1, 7)).await;
    let (server, _db) = create_test_server(&test_config(addr, 1, &[]));

    let response = server.post("/posts/fetch").await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("Fetched 7 posts."));
    assert!(body.contains("User ID: 1 · Post ID: 100"));
    assert!(body.contains("Page 1 of 2 · 7 items"));
    assert!(body.contains(DISABLED_PREVIOUS));
    assert!(body.contains(r#"href="/posts?page=2""#));

    let response = server.post("/posts/fetch").await;
    response.assert_status_ok();
    assert!(
        response
            .text()
            .contains("Posts already loaded (7 stored), fetch skipped.")
    );
    Ok(())
}

#[tokio::test]
async fn test_posts_last_page_and_out_of_range_page() -> Result<()> {
    let addr = spawn_upstream(Upstream::default().with_posts(1, 7)).await;
    let (server, _db) = create_test_server(&test_config(addr, 1, &[]));
    server.post("/posts/fetch").await.assert_status_ok();

    let response = server.get("/posts").add_query_param("page", 2).await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("Post ID: 105"));
    assert!(body.contains("Post ID: 106"));
    assert!(!body.contains("Post ID: 104"));
    assert!(body.contains(DISABLED_NEXT));
    assert!(body.contains(r#"href="/posts?page=1""#));

    let response = server.get("/posts").add_query_param("page", 9).await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("No posts to show."));
    assert!(body.contains(DISABLED_NEXT));
    Ok(())
}

#[tokio::test]
async fn test_fetch_news_reports_warnings_and_lists_items() -> Result<()> {
    let addr = spawn_upstream(Upstream::default().with_page("/tech", row_card_page(3))).await;
    let config = test_config(addr, 1, &[("tech", "/tech"), ("games", "/games")]);
    let (server, _db) = create_test_server(&config);

    let response = server.post("/news/fetch").await;
    response.assert_status_ok();
    let body = response.text();

    assert!(body.contains("Stored 3 news items."));
    assert!(body.contains(r#"<div class="notice warning" role="status">Category games: "#));
    assert!(body.contains(&format!(r#"href="http://{addr}/news/3""#)));
    assert!(body.contains(r#"<span class="badge">tech</span>"#));
    assert!(body.contains(r#"<option value="games">games</option>"#));
    Ok(())
}

#[tokio::test]
async fn test_news_filter_and_search() -> Result<()> {
    let addr = spawn_upstream(
        Upstream::default()
            .with_page("/tech", row_card_page(7))
            .with_page("/games", row_card_page(2)),
    )
    .await;
    let config = test_config(addr, 1, &[("tech", "/tech"), ("games", "/games")]);
    let (server, _db) = create_test_server(&config);
    server.post("/news/fetch").await.assert_status_ok();

    let response = server.get("/news").add_query_param("category", "games").await;
    let body = response.text();
    assert!(body.contains("Page 1 of 1 · 2 items"));
    assert!(body.contains(r#"<option value="games" selected>games</option>"#));
    assert!(!body.contains(r#"<span class="badge">tech</span>"#));

    let response = server
        .get("/news")
        .add_query_param("category", "tech")
        .add_query_param("q", "Title")
        .await;
    let body = response.text();
    assert!(body.contains("Page 1 of 2 · 7 items"));
    assert!(body.contains(r#"href="/news?category=tech&amp;q=Title&amp;page=2""#));

    let response = server
        .get("/news")
        .add_query_param("category", "all")
        .add_query_param("q", "nothing like this")
        .await;
    let body = response.text();
    assert!(body.contains("No news matches this filter."));
    assert!(body.contains(DISABLED_PREVIOUS));
    assert!(body.contains(DISABLED_NEXT));
    Ok(())
}

#[tokio::test]
async fn test_refresh_replaces_everything() -> Result<()> {
    let addr = spawn_upstream(
        Upstream::default()
            .with_posts(1, 2)
            .with_page("/tech", row_card_page(4)),
    )
    .await;
    let (server, _db) = create_test_server(&test_config(addr, 1, &[("tech", "/tech")]));
    server.post("/posts/fetch").await.assert_status_ok();

    let response = server.post("/refresh").await;
    response.assert_status_ok();
    let body = response.text();

    assert!(body.contains("Cleared 2 posts before refetching."));
    assert!(body.contains("Fetched 2 posts."));
    assert!(body.contains("Stored 4 news items."));
    assert!(body.contains(r#"<a href="/posts">2 posts</a>"#));
    assert!(body.contains(r#"<a href="/news">4 news items</a>"#));
    Ok(())
}
