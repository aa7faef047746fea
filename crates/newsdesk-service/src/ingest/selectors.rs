//! Selector fallback chains for article extraction.
//!
//! A page is handled by the first [`ArticleStrategy`] whose container selector
//! matches anything. Within each container, the title and body are resolved by
//! their own [`SelectorChain`]s. A container missing either is dropped; there
//! is no fallback to a later strategy once one has matched.

use scraper::{ElementRef, Html, Selector};

use crate::config::NewsSourceConfig;
use crate::errors::{AppError, Result};

/// A parsed CSS selector. Parse failures name the offending source text.
#[derive(Debug, Clone)]
pub struct CompiledSelector {
    selector: Selector,
}

impl CompiledSelector {
    pub fn parse(source: &str) -> Result<Self> {
        let selector =
            Selector::parse(source).map_err(|err| AppError::selector(source, err))?;
        Ok(Self { selector })
    }

    pub fn select_in<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        scope.select(&self.selector).collect()
    }

    pub fn select_document<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        document.select(&self.selector).collect()
    }
}

/// Ordered selectors, earliest first.
#[derive(Debug, Clone)]
pub struct SelectorChain {
    selectors: Vec<CompiledSelector>,
}

impl SelectorChain {
    pub fn parse<S: AsRef<str>>(sources: &[S]) -> Result<Self> {
        let selectors = sources
            .iter()
            .map(|s| CompiledSelector::parse(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { selectors })
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledSelector> {
        self.selectors.iter()
    }

    /// First element matched by the earliest selector that matches anything
    /// inside `scope`.
    pub fn first_in<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.selectors
            .iter()
            .find_map(|s| s.select_in(scope).into_iter().next())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedArticle {
    pub title: String,
    /// Link target exactly as it appears in the markup
    pub href: Option<String>,
    pub body: String,
}

/// One container selector paired with the shared title and body chains.
#[derive(Debug, Clone, Copy)]
pub struct ArticleStrategy<'a> {
    container: &'a CompiledSelector,
    title: &'a SelectorChain,
    body: &'a SelectorChain,
    link: &'a CompiledSelector,
}

impl ArticleStrategy<'_> {
    /// `None` when the container selector matches nothing on the page.
    /// `Some` (possibly empty) otherwise, which ends the fallback chain.
    pub fn try_extract(&self, document: &Html) -> Option<Vec<ScrapedArticle>> {
        let containers = self.container.select_document(document);
        if containers.is_empty() {
            return None;
        }

        Some(
            containers
                .into_iter()
                .filter_map(|container| self.extract_one(container))
                .collect(),
        )
    }

    fn extract_one(&self, container: ElementRef<'_>) -> Option<ScrapedArticle> {
        let title_el = self.title.first_in(container)?;
        let body_el = self.body.first_in(container)?;

        let title = element_text(title_el);
        if title.is_empty() {
            return None;
        }

        let href = title_el
            .value()
            .attr("href")
            .or_else(|| {
                self.link
                    .select_in(title_el)
                    .into_iter()
                    .find_map(|a| a.value().attr("href"))
            })
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string);

        Some(ScrapedArticle {
            title,
            href,
            body: element_text(body_el),
        })
    }
}

/// Result of running the strategies over one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Index of the strategy that matched, if any did
    pub strategy: Option<usize>,
    pub articles: Vec<ScrapedArticle>,
}

#[derive(Debug, Clone)]
pub struct ArticleExtractor {
    containers: SelectorChain,
    title: SelectorChain,
    body: SelectorChain,
    link: CompiledSelector,
}

impl ArticleExtractor {
    pub fn new(containers: SelectorChain, title: SelectorChain, body: SelectorChain) -> Result<Self> {
        Ok(Self {
            containers,
            title,
            body,
            link: CompiledSelector::parse("a[href]")?,
        })
    }

    pub fn from_config(config: &NewsSourceConfig) -> Result<Self> {
        Self::new(
            SelectorChain::parse(config.container_selectors.as_slice())?,
            SelectorChain::parse(config.title_selectors.as_slice())?,
            SelectorChain::parse(config.body_selectors.as_slice())?,
        )
    }

    pub fn strategies(&self) -> impl Iterator<Item = ArticleStrategy<'_>> {
        self.containers.iter().map(|container| ArticleStrategy {
            container,
            title: &self.title,
            body: &self.body,
            link: &self.link,
        })
    }

    pub fn extract(&self, document: &Html) -> Extraction {
        self.strategies()
            .enumerate()
            .find_map(|(index, strategy)| {
                strategy.try_extract(document).map(|articles| Extraction {
                    strategy: Some(index),
                    articles,
                })
            })
            .unwrap_or_default()
    }

    /// Parse `html` and extract in one step. `Html` is not `Send`, so async
    /// callers go through here instead of holding a document across awaits.
    pub fn extract_html(&self, html: &str) -> Extraction {
        let document = Html::parse_document(html);
        self.extract(&document)
    }
}

/// Text content with runs of whitespace collapsed.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}
