#![allow(dead_code, unused_imports)]

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use diesel::sqlite::SqliteConnection;
use newsdesk_service::config::{CategorySource, Config};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

pub use newsdesk_service::test_helpers::{establish_test_connection, shared_test_connection};

/// What the fake upstream serves: posts per user id and HTML pages per path.
#[derive(Debug, Default, Clone)]
pub struct Upstream {
    pub posts_per_user: HashMap<i32, usize>,
    pub failing_users: Vec<i32>,
    pub pages: HashMap<String, String>,
}

impl Upstream {
    pub fn with_posts(mut self, user_id: i32, count: usize) -> Self {
        self.posts_per_user.insert(user_id, count);
        self
    }

    pub fn with_failing_user(mut self, user_id: i32) -> Self {
        self.failing_users.push(user_id);
        self
    }

    pub fn with_page(mut self, path: &str, html: impl Into<String>) -> Self {
        self.pages.insert(path.to_string(), html.into());
        self
    }
}

#[derive(Deserialize)]
struct PostsQuery {
    #[serde(rename = "userId")]
    user_id: i32,
}

async fn posts(State(upstream): State<Arc<Upstream>>, Query(query): Query<PostsQuery>) -> Response {
    if upstream.failing_users.contains(&query.user_id) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let count = upstream
        .posts_per_user
        .get(&query.user_id)
        .copied()
        .unwrap_or(0);
    let payload: Vec<_> = (0..count)
        .map(|i| {
            let id = query.user_id * 100 + i as i32;
            json!({
                "userId": query.user_id,
                "id": id,
                "title": format!("post {id}"),
                "body": format!("body of post {id}"),
            })
        })
        .collect();

    Json(payload).into_response()
}

async fn page(State(upstream): State<Arc<Upstream>>, uri: Uri) -> Response {
    match upstream.pages.get(uri.path()) {
        Some(html) => Html(html.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serve `upstream` on an ephemeral local port.
pub async fn spawn_upstream(upstream: Upstream) -> SocketAddr {
    let app = Router::new()
        .route("/posts", get(posts))
        .fallback(page)
        .with_state(Arc::new(upstream));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind upstream");
    let addr = listener.local_addr().expect("Upstream has no address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Upstream failed");
    });

    addr
}

/// Config pointing both adapters at a local upstream.
pub fn test_config(upstream: SocketAddr, users: i32, categories: &[(&str, &str)]) -> Config {
    let mut config = Config::default();
    config.posts.endpoint = format!("http://{upstream}/posts");
    config.posts.first_user_id = 1;
    config.posts.last_user_id = users;
    config.posts.timeout_secs = Some(5);
    config.news.base_url = format!("http://{upstream}");
    config.news.timeout_secs = 5;
    config.news.categories = categories
        .iter()
        .map(|(name, path)| CategorySource {
            name: name.to_string(),
            path: path.to_string(),
        })
        .collect();
    config
}

/// A category page in the markup the default selectors expect first.
pub fn row_card_page(count: usize) -> String {
    let cards: String = (1..=count)
        .map(|i| {
            format!(
                r#"<div class="rowCard homeTodayItem">
                     <a class="rowCard__title" href="/news/{i}">Title {i}</a>
                     <p class="rowCard__description">Body {i}</p>
                   </div>"#
            )
        })
        .collect();
    format!("<html><body><main>{cards}</main></body></html>")
}

/// A page only the generic `article` selector understands.
pub fn article_page(titles: &[(&str, &str)]) -> String {
    let articles: String = titles
        .iter()
        .map(|(title, body)| {
            format!(r#"<article><h2><a href="/a/{title}">{title}</a></h2><p>{body}</p></article>"#)
        })
        .collect();
    format!("<html><body>{articles}</body></html>")
}

pub mod server_utils {
    use super::*;
    use axum_test::TestServer;
    use newsdesk_service::{DefaultAppState, routes};

    pub fn create_test_server(config: &Config) -> (TestServer, Arc<Mutex<SqliteConnection>>) {
        let db = shared_test_connection();

        let state = DefaultAppState::new(db.clone(), config).unwrap();
        let app = routes::create_router().with_state(state);

        let server = TestServer::new(app).unwrap();
        (server, db)
    }
}

pub mod test_utils {
    use diesel::prelude::*;
    use diesel::sqlite::SqliteConnection;
    use newsdesk_service::models::{NewsItem, Post};
    use newsdesk_service::schema::{news, posts};

    pub fn count_posts(conn: &mut SqliteConnection) -> i64 {
        posts::table
            .count()
            .get_result(conn)
            .expect("Failed to count posts")
    }

    pub fn posts_for_user(conn: &mut SqliteConnection, user_id: i32) -> Vec<Post> {
        posts::table
            .filter(posts::user_id.eq(user_id))
            .select(Post::as_select())
            .load(conn)
            .expect("Failed to load posts")
    }

    pub fn all_news(conn: &mut SqliteConnection) -> Vec<NewsItem> {
        news::table
            .select(NewsItem::as_select())
            .load(conn)
            .expect("Failed to load news items")
    }
}
