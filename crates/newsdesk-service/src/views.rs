//! HTML rendering for the dashboard pages.

use axum::http::StatusCode;
use url::form_urlencoded;

use crate::dashboard::{Listing, NewsFilter, NewsOutcome, Overview, PostsOutcome, RefreshOutcome};
use crate::ingest::links::web_link;
use crate::models::{NewsItem, Post};
use crate::pagination::PageWindow;

/// `created_at` is SQLite's `CURRENT_TIMESTAMP`, which is UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

const STYLE: &str = r#"
:root { --bg: #0b0f1a; --panel: #121a2b; --text: #e6f1ff; --muted: #8aa0c0;
        --neon: #39ff14; --accent: #ff2bd6; --warn: #ffb020; --error: #ff4d4d; }
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; background: var(--bg); color: var(--text); }
header { padding: 1rem 2rem; border-bottom: 1px solid var(--accent); display: flex; gap: 2rem; align-items: center; }
header h1 { margin: 0; color: var(--neon); text-shadow: 0 0 8px var(--neon); font-size: 1.5rem; }
header nav a { color: var(--text); margin-right: 1rem; text-decoration: none; }
main { max-width: 60rem; margin: 0 auto; padding: 1.5rem 2rem; }
.actions { display: flex; gap: 0.75rem; flex-wrap: wrap; margin-bottom: 1.5rem; }
button { background: transparent; color: var(--neon); border: 1px solid var(--neon); border-radius: 4px;
         padding: 0.5rem 1rem; cursor: pointer; box-shadow: 0 0 6px var(--neon); }
button:hover { background: var(--neon); color: var(--bg); }
.card { background: var(--panel); border-left: 3px solid var(--accent); border-radius: 4px;
        padding: 1rem 1.25rem; margin-bottom: 1rem; box-shadow: 0 0 10px rgba(255, 43, 214, 0.2); }
.card h3 { margin: 0 0 0.5rem; }
.card h3 a { color: var(--text); }
.meta { color: var(--muted); font-size: 0.85rem; }
.badge { color: var(--neon); border: 1px solid var(--neon); border-radius: 999px; padding: 0 0.5rem; margin-right: 0.5rem; }
.notice { padding: 0.75rem 1rem; border-radius: 4px; margin-bottom: 1rem; border: 1px solid var(--muted); }
.notice.warning { border-color: var(--warn); color: var(--warn); }
.notice.error { border-color: var(--error); color: var(--error); }
.filters { display: flex; gap: 0.5rem; margin-bottom: 1.5rem; }
.filters input, .filters select { background: var(--panel); color: var(--text); border: 1px solid var(--muted); padding: 0.4rem; }
.pager { display: flex; gap: 1rem; align-items: center; justify-content: center; margin-top: 1.5rem; }
.pager a { color: var(--neon); }
.pager .disabled { color: var(--muted); opacity: 0.5; }
.spinner { display: none; position: fixed; top: 1rem; right: 1rem; width: 2rem; height: 2rem;
           border: 3px solid var(--panel); border-top-color: var(--neon); border-radius: 50%;
           animation: spin 0.8s linear infinite; }
body.loading .spinner { display: block; }
@keyframes spin { to { transform: rotate(360deg); } }
"#;

const SCRIPT: &str = r#"
document.querySelectorAll('form[method="post"]').forEach(function (form) {
  form.addEventListener('submit', function () { document.body.classList.add('loading'); });
});
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }

    fn render(&self) -> String {
        let class = match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        format!(
            r#"<div class="notice {class}" role="status">{}</div>"#,
            escape(&self.text)
        )
    }
}

pub fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, notices: &[Notice], content: &str) -> String {
    let notices: String = notices.iter().map(Notice::render).collect();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · Newsdesk</title>
<style>{STYLE}</style>
</head>
<body>
<header>
<h1>Newsdesk</h1>
<nav><a href="/">Home</a><a href="/posts">Posts</a><a href="/news">News</a></nav>
</header>
<div class="spinner" aria-hidden="true"></div>
<main>
{notices}{content}
</main>
<script>{SCRIPT}</script>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn action_buttons() -> &'static str {
    r#"<section class="actions">
<form method="post" action="/posts/fetch"><button type="submit">Fetch posts</button></form>
<form method="post" action="/news/fetch"><button type="submit">Fetch news</button></form>
<form method="post" action="/refresh"><button type="submit">Refresh all</button></form>
</section>
"#
}

pub fn home_page(overview: &Overview, notices: &[Notice]) -> String {
    let content = format!(
        r#"{actions}<section class="card">
<h3>Stored data</h3>
<p><a href="/posts">{posts} posts</a> from the JSON placeholder API</p>
<p><a href="/news">{news} news items</a> scraped from the news site</p>
</section>
"#,
        actions = action_buttons(),
        posts = overview.posts,
        news = overview.news,
    );
    layout("Home", notices, &content)
}

fn post_card(post: &Post) -> String {
    format!(
        r#"<article class="card">
<p class="meta">User ID: {user_id} · Post ID: {post_id}</p>
<h3>{title}</h3>
<p>{body}</p>
</article>
"#,
        user_id = post.user_id,
        post_id = post.post_id,
        title = escape(&post.title),
        body = escape(&post.body),
    )
}

pub fn posts_page(listing: &Listing<Post>, notices: &[Notice]) -> String {
    let mut content = String::from(action_buttons());
    content.push_str("<h2>User posts</h2>\n");

    if listing.items.is_empty() {
        content.push_str(&Notice::info("No posts to show. Use Fetch posts to load them.").render());
    } else {
        content.extend(listing.items.iter().map(post_card));
    }

    content.push_str(&pager(&listing.window, "/posts", &[]));
    layout("Posts", notices, &content)
}

fn news_card(item: &NewsItem) -> String {
    let title = escape(&item.title);
    let title = match item.source_url.as_deref().and_then(web_link) {
        Some(link) => format!(
            r#"<a href="{href}" target="_blank" rel="noopener noreferrer">{title}</a>"#,
            href = escape(link.as_str()),
        ),
        None => title,
    };

    format!(
        r#"<article class="card">
<p class="meta"><span class="badge">{category}</span>{timestamp}</p>
<h3>{title}</h3>
<p>{body}</p>
</article>
"#,
        category = escape(&item.category),
        timestamp = item.created_at.format(TIMESTAMP_FORMAT),
        body = escape(&item.body),
    )
}

fn news_filters(filter: &NewsFilter, categories: &[String]) -> String {
    let selected = filter.category.as_deref();
    let mut options = format!(
        r#"<option value="all"{}>All categories</option>"#,
        if selected.is_none() { " selected" } else { "" }
    );
    for category in categories {
        options.push_str(&format!(
            r#"<option value="{value}"{selected}>{value}</option>"#,
            value = escape(category),
            selected = if selected == Some(category.as_str()) {
                " selected"
            } else {
                ""
            },
        ));
    }

    format!(
        r#"<form class="filters" method="get" action="/news">
<select name="category">{options}</select>
<input type="search" name="q" placeholder="Search title or body" value="{term}">
<button type="submit">Search</button>
</form>
"#,
        term = escape(filter.term.as_deref().unwrap_or_default()),
    )
}

pub fn news_page(
    listing: &Listing<NewsItem>,
    filter: &NewsFilter,
    categories: &[String],
    notices: &[Notice],
) -> String {
    let mut content = String::from(action_buttons());
    content.push_str("<h2>News</h2>\n");
    content.push_str(&news_filters(filter, categories));

    if listing.items.is_empty() {
        let message = if filter.term.is_some() || filter.category.is_some() {
            "No news matches this filter."
        } else {
            "No news to show. Use Fetch news to scrape the site."
        };
        content.push_str(&Notice::info(message).render());
    } else {
        content.extend(listing.items.iter().map(news_card));
    }

    let mut params = Vec::new();
    if let Some(category) = filter.category.as_deref() {
        params.push(("category", category));
    }
    if let Some(term) = filter.term.as_deref() {
        params.push(("q", term));
    }
    content.push_str(&pager(&listing.window, "/news", &params));

    layout("News", notices, &content)
}

fn page_href(path: &str, params: &[(&str, &str)], page: u32) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        query.append_pair(key, value);
    }
    query.append_pair("page", &page.to_string());
    format!("{path}?{}", query.finish())
}

/// Previous/next controls. Out-of-range directions render as disabled text.
fn pager(window: &PageWindow, path: &str, params: &[(&str, &str)]) -> String {
    let previous = match window.previous_page() {
        Some(page) => format!(
            r#"<a class="pager-link" rel="prev" href="{}">Previous</a>"#,
            escape(&page_href(path, params, page))
        ),
        None => r#"<span class="pager-link disabled" aria-disabled="true">Previous</span>"#
            .to_string(),
    };
    let next = match window.next_page() {
        Some(page) => format!(
            r#"<a class="pager-link" rel="next" href="{}">Next</a>"#,
            escape(&page_href(path, params, page))
        ),
        None => {
            r#"<span class="pager-link disabled" aria-disabled="true">Next</span>"#.to_string()
        }
    };

    format!(
        r#"<nav class="pager">{previous}<span class="page-status">Page {page} of {pages} · {total} items</span>{next}</nav>
"#,
        page = window.page,
        pages = window.total_pages().max(1),
        total = window.total,
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    layout(title, &[Notice::error(message)], "")
}

pub fn posts_notices(outcome: &PostsOutcome) -> Vec<Notice> {
    match outcome {
        PostsOutcome::Skipped { existing } => vec![Notice::info(format!(
            "Posts already loaded ({existing} stored), fetch skipped."
        ))],
        PostsOutcome::Fetched {
            inserted,
            skipped_users,
        } => {
            let mut notices = vec![Notice::info(format!("Fetched {inserted} posts."))];
            if !skipped_users.is_empty() {
                let ids: Vec<String> = skipped_users.iter().map(i32::to_string).collect();
                notices.push(Notice::warning(format!(
                    "No posts for user ids {}: the upstream did not answer successfully.",
                    ids.join(", ")
                )));
            }
            notices
        }
    }
}

pub fn news_notices(outcome: &NewsOutcome) -> Vec<Notice> {
    let mut notices = vec![Notice::info(format!("Stored {} news items.", outcome.stored))];
    notices.extend(outcome.warnings.iter().map(|warning| {
        Notice::warning(format!(
            "Category {}: {}",
            warning.category, warning.message
        ))
    }));
    notices
}

pub fn refresh_notices(outcome: &RefreshOutcome) -> Vec<Notice> {
    let mut notices = vec![Notice::info(format!(
        "Cleared {} posts before refetching.",
        outcome.cleared_posts
    ))];
    notices.extend(posts_notices(&outcome.posts));
    notices.extend(news_notices(&outcome.news));
    notices
}
