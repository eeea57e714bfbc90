use chrono::NaiveDate;
use itertools::Itertools;
use reqwest::Url;
use scraper::Html;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

pub mod config;
pub mod deadline;
pub mod dedup;
pub mod linkareer;
pub mod provider;
pub mod sink;
pub mod store;

mod contest;
mod error;
mod utils;

pub use contest::{ContestRecord, Listing, RawContest};
pub use error::{ConfigError, CrawlerError};
pub use provider::MarkupProvider;
pub use sink::{PostOutcome, Sink};
pub use store::RecordStore;

#[derive(Debug, PartialEq, Eq)]
pub enum Extraction<T: Listing> {
    Empty,
    Items(Vec<T>),
}

pub trait Extractor {
    type Record: Listing;

    fn extract(&self, doc: &Html) -> Extraction<Self::Record>;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub no_items: bool,
    pub found: usize,
    pub new: usize,
    pub posted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.no_items {
            return write!(f, "no items found");
        }
        write!(
            f,
            "found {}, new {}, posted {}, skipped {}, failed {}",
            self.found, self.new, self.posted, self.skipped, self.failed
        )
    }
}

pub async fn run_crawler<P, E, S>(
    provider: &P,
    extractor: &E,
    sink: &Sink<S>,
    url: &Url,
    dry_run: bool,
) -> Result<RunSummary, CrawlerError>
where
    P: MarkupProvider + Sync,
    E: Extractor<Record = RawContest>,
    S: RecordStore + Sync,
{
    run_crawler_at(provider, extractor, sink, url, dry_run, utils::get_today()).await
}

pub(crate) async fn run_crawler_at<P, E, S>(
    provider: &P,
    extractor: &E,
    sink: &Sink<S>,
    url: &Url,
    dry_run: bool,
    today: NaiveDate,
) -> Result<RunSummary, CrawlerError>
where
    P: MarkupProvider + Sync,
    E: Extractor<Record = RawContest>,
    S: RecordStore + Sync,
{
    // An unreadable store means duplicates may be inserted on this run.
    let existing = match sink.store().query_titles().await {
        Ok(titles) => titles,
        Err(e) => {
            warn!("Failed to fetch existing titles, continuing with none: {}", e);
            HashSet::new()
        }
    };
    info!("Number of contests already in store: {}", existing.len());

    let markup = provider.fetch(url).await?;

    let extraction = {
        let doc = Html::parse_document(&markup);
        extractor.extract(&doc)
    };

    let mut summary = RunSummary::default();
    let raw = match extraction {
        Extraction::Empty => {
            summary.no_items = true;
            info!("Run finished: {}", summary);
            return Ok(summary);
        }
        Extraction::Items(raw) => raw,
    };
    summary.found = raw.len();

    let records = raw
        .into_iter()
        .map(|r| r.normalize_at(today))
        .collect_vec();
    let new = dedup::filter_new(&existing, records);
    summary.new = new.len();
    debug!("New contests: {}", new.iter().map(Listing::title).join(", "));

    for record in &new {
        if dry_run {
            info!("Would insert\n{}", record);
            continue;
        }
        match sink.post(record).await {
            PostOutcome::Success => summary.posted += 1,
            PostOutcome::Skipped => summary.skipped += 1,
            PostOutcome::Failed(_) => summary.failed += 1,
        }
    }

    if new.is_empty() {
        info!("No new contests found");
    }
    info!("Run finished: {}", summary);
    Ok(summary)
}
