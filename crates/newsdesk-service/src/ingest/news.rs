use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::create_client;
use super::links::absolutize;
use super::selectors::{ArticleExtractor, Extraction};
use crate::config::{CategorySource, NewsSourceConfig};
use crate::errors::Result;
use crate::models::NewNewsItem;

/// A category that produced nothing, with the reason shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeWarning {
    pub category: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ScrapeReport {
    pub items: Vec<NewNewsItem>,
    pub warnings: Vec<ScrapeWarning>,
    /// Which strategy served each category that was reached
    pub strategies: Vec<(String, Option<usize>)>,
}

#[derive(Debug)]
pub struct CategoryScrape {
    pub strategy: Option<usize>,
    pub items: Vec<NewNewsItem>,
}

/// Scrapes article teasers from each configured category landing page.
#[derive(Debug, Clone)]
pub struct NewsScraper {
    client: Client,
    base_url: Url,
    categories: Vec<CategorySource>,
    extractor: ArticleExtractor,
}

impl NewsScraper {
    pub fn new(
        client: Client,
        base_url: Url,
        categories: Vec<CategorySource>,
        extractor: ArticleExtractor,
    ) -> Self {
        Self {
            client,
            base_url,
            categories,
            extractor,
        }
    }

    pub fn from_config(config: &NewsSourceConfig) -> Result<Self> {
        let client = create_client(
            &config.user_agent,
            Some(Duration::from_secs(config.timeout_secs)),
        )?;
        Ok(Self::new(
            client,
            Url::parse(&config.base_url)?,
            config.categories.clone(),
            ArticleExtractor::from_config(config)?,
        ))
    }

    pub fn categories(&self) -> &[CategorySource] {
        &self.categories
    }

    /// Scrape every category in order. A failing category becomes a warning
    /// and the remaining ones still run.
    #[instrument(skip(self), fields(base_url = %self.base_url, categories = self.categories.len()))]
    pub async fn scrape(&self) -> ScrapeReport {
        let mut report = ScrapeReport::default();

        for category in &self.categories {
            match self.scrape_category(category).await {
                Ok(scrape) => {
                    report
                        .strategies
                        .push((category.name.clone(), scrape.strategy));

                    match (scrape.strategy, scrape.items.is_empty()) {
                        (None, _) => {
                            warn!(category = %category.name, "No article containers matched");
                            report.warnings.push(ScrapeWarning {
                                category: category.name.clone(),
                                message: "page layout not recognised, no articles found"
                                    .to_string(),
                            });
                        }
                        (Some(_), true) => {
                            warn!(category = %category.name, "Containers matched but none were complete");
                            report.warnings.push(ScrapeWarning {
                                category: category.name.clone(),
                                message: "articles found but none had both a title and a body"
                                    .to_string(),
                            });
                        }
                        (Some(_), false) => report.items.extend(scrape.items),
                    }
                }
                Err(err) => {
                    warn!(category = %category.name, error = %err, "Category scrape failed");
                    report.warnings.push(ScrapeWarning {
                        category: category.name.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        info!(
            items = report.items.len(),
            warnings = report.warnings.len(),
            "News scrape finished"
        );
        report
    }

    pub async fn scrape_category(&self, category: &CategorySource) -> Result<CategoryScrape> {
        let url = self.base_url.join(&category.path)?;
        debug!(category = %category.name, url = %url, "Fetching category page");

        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let Extraction { strategy, articles } = self.extractor.extract_html(&html);
        debug!(category = %category.name, strategy = ?strategy, articles = articles.len(), "Extracted articles");

        let items = articles
            .into_iter()
            .map(|article| NewNewsItem {
                title: article.title,
                body: article.body,
                source_url: article
                    .href
                    .and_then(|href| absolutize(&self.base_url, &href)),
                category: category.name.clone(),
            })
            .collect();

        Ok(CategoryScrape { strategy, items })
    }
}
