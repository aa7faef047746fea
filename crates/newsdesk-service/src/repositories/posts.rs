use super::traits::PostRepository;
use crate::errors::AppError;
use crate::models::{NewPost, Post};
use crate::schema::posts;
use crate::store::{self, SharedConnection};
use async_trait::async_trait;
use diesel::prelude::*;

#[derive(Clone)]
pub struct SqlitePostRepository {
    db: SharedConnection,
}

impl SqlitePostRepository {
    pub fn new(db: SharedConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for SqlitePostRepository {
    async fn count(&self) -> Result<u64, AppError> {
        let mut conn = store::lock(&self.db)?;
        let total: i64 = posts::table.count().get_result(&mut *conn)?;
        Ok(total as u64)
    }

    async fn insert_posts(&self, new_posts: &[NewPost]) -> Result<usize, AppError> {
        if new_posts.is_empty() {
            return Ok(0);
        }

        let mut conn = store::lock(&self.db)?;
        let inserted = diesel::insert_into(posts::table)
            .values(new_posts)
            .execute(&mut *conn)?;
        Ok(inserted)
    }

    async fn list(&self, limit: u32, offset: u32) -> Result<Vec<Post>, AppError> {
        let mut conn = store::lock(&self.db)?;
        let result = posts::table
            .order(posts::id.asc())
            .limit(i64::from(limit))
            .offset(i64::from(offset))
            .select(Post::as_select())
            .load(&mut *conn)?;
        Ok(result)
    }

    async fn clear(&self) -> Result<usize, AppError> {
        let mut conn = store::lock(&self.db)?;
        let deleted = diesel::delete(posts::table).execute(&mut *conn)?;
        Ok(deleted)
    }
}
