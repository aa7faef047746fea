//! User actions: each one runs an adapter, writes the store, then reads back
//! what the views render.

use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::config::Config;
use crate::errors::Result;
use crate::ingest::{NewsScraper, PostFetcher, ScrapeWarning};
use crate::models::{NewsItem, Post};
use crate::pagination::PageWindow;
use crate::repositories::{NewsRepository, PostRepository};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostsOutcome {
    /// The table already had rows, so nothing was requested
    Skipped { existing: u64 },
    Fetched {
        inserted: usize,
        skipped_users: Vec<i32>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsOutcome {
    pub stored: usize,
    pub warnings: Vec<ScrapeWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub cleared_posts: usize,
    pub posts: PostsOutcome,
    pub news: NewsOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overview {
    pub posts: u64,
    pub news: u64,
}

/// One page of records plus the window it was cut with.
#[derive(Debug, Clone)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
}

/// Category and search term for the news listing. Blank values mean "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsFilter {
    pub category: Option<String>,
    pub term: Option<String>,
}

impl NewsFilter {
    pub fn new(category: Option<String>, term: Option<String>) -> Self {
        fn present(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            category: present(category).filter(|c| c != "all"),
            term: present(term),
        }
    }
}

pub struct Dashboard<P, N> {
    posts: P,
    news: N,
    post_fetcher: PostFetcher,
    news_scraper: NewsScraper,
    page_size: u32,
    /// Held for the whole of every action that writes, so a count guard and
    /// the insert it protects can't interleave with another action.
    actions: Mutex<()>,
}

impl<P, N> Dashboard<P, N>
where
    P: PostRepository,
    N: NewsRepository,
{
    pub fn new(
        posts: P,
        news: N,
        post_fetcher: PostFetcher,
        news_scraper: NewsScraper,
        page_size: u32,
    ) -> Self {
        Self {
            posts,
            news,
            post_fetcher,
            news_scraper,
            page_size,
            actions: Mutex::new(()),
        }
    }

    pub fn from_config(posts: P, news: N, config: &Config) -> Result<Self> {
        Ok(Self::new(
            posts,
            news,
            PostFetcher::from_config(&config.posts)?,
            NewsScraper::from_config(&config.news)?,
            config.display.page_size,
        ))
    }

    /// Candidate categories offered by the filter control.
    pub fn categories(&self) -> Vec<String> {
        self.news_scraper
            .categories()
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    /// Fetch posts unless the table already holds any.
    #[instrument(skip(self))]
    pub async fn fetch_posts(&self) -> Result<PostsOutcome> {
        let _action = self.actions.lock().await;
        self.fetch_posts_if_empty().await
    }

    /// Scrape every category and replace the news table with the result.
    #[instrument(skip(self))]
    pub async fn fetch_news(&self) -> Result<NewsOutcome> {
        let _action = self.actions.lock().await;
        self.replace_news().await
    }

    /// Wipe posts and refetch both sources.
    #[instrument(skip(self))]
    pub async fn refresh_all(&self) -> Result<RefreshOutcome> {
        let _action = self.actions.lock().await;

        let cleared_posts = self.posts.clear().await?;
        let posts = self.insert_fetched_posts().await?;
        let news = self.replace_news().await?;

        Ok(RefreshOutcome {
            cleared_posts,
            posts,
            news,
        })
    }

    /// Startup fetch: guarded posts, then a fresh news scrape.
    pub async fn bootstrap(&self) -> Result<(PostsOutcome, NewsOutcome)> {
        let _action = self.actions.lock().await;

        let posts = self.fetch_posts_if_empty().await?;
        let news = self.replace_news().await?;
        Ok((posts, news))
    }

    // The helpers below expect the caller to hold `actions`.

    async fn fetch_posts_if_empty(&self) -> Result<PostsOutcome> {
        let existing = self.posts.count().await?;
        if existing > 0 {
            info!(existing, "Posts already stored, skipping fetch");
            return Ok(PostsOutcome::Skipped { existing });
        }

        self.insert_fetched_posts().await
    }

    async fn insert_fetched_posts(&self) -> Result<PostsOutcome> {
        let report = self.post_fetcher.fetch().await;
        let inserted = self.posts.insert_posts(&report.posts).await?;
        info!(inserted, skipped_users = ?report.skipped, "Stored posts");

        Ok(PostsOutcome::Fetched {
            inserted,
            skipped_users: report.skipped,
        })
    }

    async fn replace_news(&self) -> Result<NewsOutcome> {
        let report = self.news_scraper.scrape().await;
        let stored = self.news.replace_news(&report.items).await?;
        info!(stored, warnings = report.warnings.len(), "Replaced news");

        Ok(NewsOutcome {
            stored,
            warnings: report.warnings,
        })
    }

    pub async fn overview(&self) -> Result<Overview> {
        Ok(Overview {
            posts: self.posts.count().await?,
            news: self.news.count_news(None).await?,
        })
    }

    pub async fn posts_page(&self, page: u32) -> Result<Listing<Post>> {
        let total = self.posts.count().await?;
        let window = PageWindow::new(total, self.page_size, page);
        let items = self.posts.list(window.limit(), window.offset()).await?;
        Ok(Listing { items, window })
    }

    /// A search term switches to an unpaginated query, windowed in memory.
    pub async fn news_page(&self, filter: &NewsFilter, page: u32) -> Result<Listing<NewsItem>> {
        let category = filter.category.as_deref();

        match filter.term.as_deref() {
            Some(term) => {
                let matches = self.news.search_news(term, category).await?;
                let window = PageWindow::new(matches.len() as u64, self.page_size, page);
                Ok(Listing {
                    items: window.slice(matches),
                    window,
                })
            }
            None => {
                let total = self.news.count_news(category).await?;
                let window = PageWindow::new(total, self.page_size, page);
                let items = self
                    .news
                    .query_news(category, window.limit(), window.offset())
                    .await?;
                Ok(Listing { items, window })
            }
        }
    }
}
