use crate::errors::AppError;
use crate::models::{NewNewsItem, NewPost, NewsItem, Post};
use async_trait::async_trait;

#[async_trait]
pub trait PostRepository: Clone + Send + Sync + 'static {
    async fn count(&self) -> Result<u64, AppError>;
    /// Appends every record. Nothing prevents duplicates.
    async fn insert_posts(&self, posts: &[NewPost]) -> Result<usize, AppError>;
    /// Posts in insertion order.
    async fn list(&self, limit: u32, offset: u32) -> Result<Vec<Post>, AppError>;
    async fn clear(&self) -> Result<usize, AppError>;
}

#[async_trait]
pub trait NewsRepository: Clone + Send + Sync + 'static {
    /// Deletes every row, then inserts `items`. The two steps are not atomic.
    async fn replace_news(&self, items: &[NewNewsItem]) -> Result<usize, AppError>;
    async fn count_news(&self, category: Option<&str>) -> Result<u64, AppError>;
    /// Newest first.
    async fn query_news(
        &self,
        category: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<NewsItem>, AppError>;
    /// Every row whose title or body contains `term`, newest first, unpaginated.
    async fn search_news(
        &self,
        term: &str,
        category: Option<&str>,
    ) -> Result<Vec<NewsItem>, AppError>;
}
