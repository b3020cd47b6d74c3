use std::sync::Arc;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use scraper::Html;
use serde::Serialize;
use tokio::task::JoinSet;
use url::Url;

use crate::{
    configuration::ScraperSettings,
    dal::website_store::StoreError,
    domain::{
        candidate::locate_candidates,
        field_extractor::extract_product,
        keyword::KeywordSet,
        product::{ProductListing, ScoredProduct},
        ranking::dedupe_and_rank,
    },
};

use super::{FetchError, FetcherBuildError, PageFetcher};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("source url {url} is not valid: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("scrape task for {url} did not finish")]
    Task { url: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("no keywords given")]
    NoKeywords,
    #[error("no source websites configured")]
    NoSources,
    #[error("failed to load source websites: {0}")]
    Store(#[from] StoreError),
}

/// What one source contributed to a search.
#[derive(Debug)]
pub struct SourceReport {
    pub source: String,
    pub outcome: Result<Vec<ProductListing>, SourceError>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub results: Vec<ProductListing>,
    pub timestamp: DateTime<Utc>,
}

pub struct ProductScraper {
    fetcher: PageFetcher,
    result_cap: usize,
}

impl ProductScraper {
    pub fn new(settings: &ScraperSettings) -> Result<Self, FetcherBuildError> {
        Ok(ProductScraper {
            fetcher: PageFetcher::new(settings)?,
            result_cap: settings.result_cap,
        })
    }

    pub async fn search(
        &self,
        keywords: KeywordSet,
        sources: Vec<String>,
    ) -> Result<SearchResults, SearchError> {
        if keywords.is_empty() {
            return Err(SearchError::NoKeywords);
        }
        if sources.is_empty() {
            return Err(SearchError::NoSources);
        }

        let reports = self.search_sources(Arc::new(keywords), sources).await;
        let results = aggregate(reports);

        Ok(SearchResults {
            count: results.len(),
            results,
            timestamp: Utc::now(),
        })
    }

    /// Scrapes every source in its own task and returns one report per source,
    /// in input order. Dropping the returned future aborts all in-flight tasks.
    pub async fn search_sources(
        &self,
        keywords: Arc<KeywordSet>,
        sources: Vec<String>,
    ) -> Vec<SourceReport> {
        let mut tasks: JoinSet<TaskOutcome> = JoinSet::new();

        for (index, source) in sources.iter().enumerate() {
            let fetcher = self.fetcher.clone();
            let keywords = keywords.clone();
            let source = source.clone();
            let cap = self.result_cap;

            tasks.spawn(async move {
                let outcome = scrape_source(&fetcher, &source, &keywords, cap).await;
                (index, outcome)
            });
        }

        collect_reports(sources, tasks).await
    }
}

type TaskOutcome = (usize, Result<Vec<ProductListing>, SourceError>);

/// Drains `tasks` and lines the outcomes up with `sources`. A source whose
/// task panicked or was cancelled reports `SourceError::Task`.
async fn collect_reports(
    sources: Vec<String>,
    mut tasks: JoinSet<TaskOutcome>,
) -> Vec<SourceReport> {
    let mut outcomes: Vec<Option<Result<Vec<ProductListing>, SourceError>>> =
        sources.iter().map(|_| None).collect();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, outcome)) => outcomes[index] = Some(outcome),
            Err(e) => log::debug!("Scrape task ended abnormally: {:?}", e),
        }
    }

    sources
        .into_iter()
        .zip(outcomes)
        .map(|(source, outcome)| {
            let outcome = outcome.unwrap_or_else(|| {
                log::error!("Skipping {}: scrape task did not finish", source);
                Err(SourceError::Task {
                    url: source.clone(),
                })
            });
            SourceReport { source, outcome }
        })
        .collect()
}

async fn scrape_source(
    fetcher: &PageFetcher,
    source: &str,
    keywords: &KeywordSet,
    cap: usize,
) -> Result<Vec<ProductListing>, SourceError> {
    log::info!(
        "Searching {} on {}",
        keywords.iter().join(" + "),
        source
    );

    let result = scrape_source_inner(fetcher, source, keywords, cap).await;
    match result {
        Ok(ref products) => log::info!("Found {} products on {}", products.len(), source),
        Err(ref e) => log::error!("Skipping {}: {}", source, e),
    }

    result
}

async fn scrape_source_inner(
    fetcher: &PageFetcher,
    source: &str,
    keywords: &KeywordSet,
    cap: usize,
) -> Result<Vec<ProductListing>, SourceError> {
    let base = Url::parse(source).map_err(|e| SourceError::InvalidUrl {
        url: source.to_string(),
        source: e,
    })?;
    let html = fetcher.fetch(source).await?;

    Ok(extract_products(&html, &base, keywords, cap))
}

/// Runs locate, extract and rank over one page.
pub fn extract_products(
    html: &str,
    source: &Url,
    keywords: &KeywordSet,
    cap: usize,
) -> Vec<ProductListing> {
    let document = Html::parse_document(html);

    let scored: Vec<ScoredProduct> = locate_candidates(&document)
        .iter()
        .filter_map(|candidate| extract_product(candidate, source, keywords))
        .collect();
    log::debug!("{} scored candidates on {}", scored.len(), source);

    dedupe_and_rank(scored, cap)
}

/// Concatenates per-source results in source order. Failed sources add nothing.
pub fn aggregate(reports: Vec<SourceReport>) -> Vec<ProductListing> {
    reports
        .into_iter()
        .filter_map(|report| report.outcome.ok())
        .flatten()
        .collect()
}
