use axum::Router;
use std::sync::Arc;

pub mod config;
pub mod dashboard;
pub mod errors;
pub mod ingest;
pub mod models;
pub mod pagination;
pub mod repositories;
pub mod routes;
pub mod schema;
pub mod shutdown;
pub mod store;
pub mod views;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use config::Config;
use dashboard::Dashboard;
use errors::Result;
use repositories::{NewsRepository, PostRepository, SqliteNewsRepository, SqlitePostRepository};
use store::SharedConnection;

pub trait AppState: Clone + Send + Sync + 'static {
    type Posts: PostRepository;
    type News: NewsRepository;

    fn dashboard(&self) -> &Dashboard<Self::Posts, Self::News>;
}

#[derive(Clone)]
pub struct DefaultAppState {
    dashboard: Arc<Dashboard<SqlitePostRepository, SqliteNewsRepository>>,
}

impl DefaultAppState {
    pub fn new(db: SharedConnection, config: &Config) -> Result<Self> {
        let dashboard = Dashboard::from_config(
            SqlitePostRepository::new(db.clone()),
            SqliteNewsRepository::new(db),
            config,
        )?;

        Ok(Self {
            dashboard: Arc::new(dashboard),
        })
    }
}

impl AppState for DefaultAppState {
    type Posts = SqlitePostRepository;
    type News = SqliteNewsRepository;

    fn dashboard(&self) -> &Dashboard<Self::Posts, Self::News> {
        &self.dashboard
    }
}

pub fn create_app<S: AppState>(state: S) -> Router {
    routes::create_router().with_state(state)
}
