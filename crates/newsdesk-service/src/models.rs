use diesel::prelude::*;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::posts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Post {
    pub id: i32,
    pub user_id: i32,
    pub post_id: i32,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = crate::schema::posts)]
pub struct NewPost {
    pub user_id: i32,
    pub post_id: i32,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::news)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewsItem {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub source_url: Option<String>,
    pub category: String,
    pub created_at: chrono::NaiveDateTime,
}

/// A scraped article ready to be stored. `created_at` is filled in by the store.
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = crate::schema::news)]
pub struct NewNewsItem {
    pub title: String,
    pub body: String,
    pub source_url: Option<String>,
    pub category: String,
}
