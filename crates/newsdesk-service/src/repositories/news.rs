use super::traits::NewsRepository;
use crate::errors::AppError;
use crate::models::{NewNewsItem, NewsItem};
use crate::schema::news;
use crate::store::{self, SharedConnection};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use tracing::debug;

#[derive(Clone)]
pub struct SqliteNewsRepository {
    db: SharedConnection,
}

impl SqliteNewsRepository {
    pub fn new(db: SharedConnection) -> Self {
        Self { db }
    }
}

fn filtered<'a>(category: Option<&'a str>) -> news::BoxedQuery<'a, Sqlite> {
    let mut query = news::table.into_boxed();
    if let Some(category) = category {
        query = query.filter(news::category.eq(category));
    }
    query
}

fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl NewsRepository for SqliteNewsRepository {
    async fn replace_news(&self, items: &[NewNewsItem]) -> Result<usize, AppError> {
        let mut conn = store::lock(&self.db)?;

        let deleted = diesel::delete(news::table).execute(&mut *conn)?;
        debug!(deleted, "Cleared news table");

        if items.is_empty() {
            return Ok(0);
        }

        let inserted = diesel::insert_into(news::table)
            .values(items)
            .execute(&mut *conn)?;
        Ok(inserted)
    }

    async fn count_news(&self, category: Option<&str>) -> Result<u64, AppError> {
        let mut conn = store::lock(&self.db)?;
        let total: i64 = filtered(category).count().get_result(&mut *conn)?;
        Ok(total as u64)
    }

    async fn query_news(
        &self,
        category: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<NewsItem>, AppError> {
        let mut conn = store::lock(&self.db)?;
        let result = filtered(category)
            .order((news::created_at.desc(), news::id.desc()))
            .limit(i64::from(limit))
            .offset(i64::from(offset))
            .select(NewsItem::as_select())
            .load(&mut *conn)?;
        Ok(result)
    }

    async fn search_news(
        &self,
        term: &str,
        category: Option<&str>,
    ) -> Result<Vec<NewsItem>, AppError> {
        let pattern = format!("%{}%", escape_like(term));

        let mut conn = store::lock(&self.db)?;
        let result = filtered(category)
            .filter(
                news::title
                    .like(pattern.clone())
                    .escape('\\')
                    .or(news::body.like(pattern).escape('\\')),
            )
            .order((news::created_at.desc(), news::id.desc()))
            .select(NewsItem::as_select())
            .load(&mut *conn)?;
        Ok(result)
    }
}
