use clap::Parser;
use contest_crawler::config::{Cli, Config, Source, StoreConfig};
use contest_crawler::linkareer::LinkareerExtractor;
use contest_crawler::provider::{FileProvider, HttpProvider};
use contest_crawler::store::{NotionStore, SqliteStore};
use contest_crawler::{run_crawler, CrawlerError, RecordStore, RunSummary, Sink};
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;

async fn run_with_store<S: RecordStore + Sync>(
    config: &Config,
    store: S,
) -> Result<RunSummary, CrawlerError> {
    let extractor = LinkareerExtractor::new(config.origin.clone(), config.sentinels.clone());
    let sink = Sink::new(store, config.fields.clone());

    match &config.source {
        Source::Http(url) => {
            run_crawler(&HttpProvider::new(), &extractor, &sink, url, config.dry_run).await
        }
        Source::File(path) => {
            let provider = FileProvider::new(path.clone());
            run_crawler(&provider, &extractor, &sink, &config.listing_url, config.dry_run).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| {
                "debug,html5ever=error,selectors=error,hyper=warn,reqwest=info,sqlx=warn".into()
            }),
        )
        .with(ErrorLayer::default())
        .init();

    let config = Cli::parse().into_config()?;
    info!("Starting contest scraping from {}", config.listing_url);

    let summary = match &config.store {
        StoreConfig::Notion(notion) => {
            let store = NotionStore::new(notion.clone(), &config.fields.name);
            run_with_store(&config, store).await?
        }
        StoreConfig::Sqlite { name } => {
            let store = SqliteStore::new(name).await?;
            run_with_store(&config, store).await?
        }
    };

    if summary.no_items {
        info!("No contest items found. Check the listing markup.");
    } else if summary.new == 0 {
        info!("No new contests found");
    }

    Ok(())
}
