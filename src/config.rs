use clap::{Parser, ValueEnum};
use reqwest::Url;
use std::path::PathBuf;

use crate::error::ConfigError;

pub const DEFAULT_LISTING_URL: &str = "https://linkareer.com/list/contest?filterBy_categoryIDs=35&filterType=CATEGORY&orderBy_direction=DESC&orderBy_field=CREATED_AT&page=1";
pub const DEFAULT_ORIGIN: &str = "https://linkareer.com";

/// Placeholders substituted for fields missing from a listing card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinels {
    pub no_title: String,
    pub no_host: String,
    pub no_deadline: String,
}

impl Default for Sentinels {
    fn default() -> Self {
        Sentinels {
            no_title: "제목 없음".to_string(),
            no_host: "주최자 없음".to_string(),
            no_deadline: "마감일 없음".to_string(),
        }
    }
}

/// Property names of the target collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    pub name: String,
    pub organization: String,
    pub deadline: String,
    pub url: String,
    pub category: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        FieldNames {
            name: "이름".to_string(),
            organization: "주최".to_string(),
            deadline: "마감일".to_string(),
            url: "링크".to_string(),
            category: "분류".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotionConfig {
    pub token: String,
    pub database_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Notion(NotionConfig),
    Sqlite { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Http(Url),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub listing_url: Url,
    pub origin: Url,
    pub source: Source,
    pub store: StoreConfig,
    pub sentinels: Sentinels,
    pub fields: FieldNames,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    Notion,
    Sqlite,
}

#[derive(Debug, Parser)]
#[command(name = "contest-crawler", about = "Copy new Linkareer contests into a record store")]
pub struct Cli {
    /// Listing page to scrape
    #[arg(long, env = "LISTING_URL", default_value = DEFAULT_LISTING_URL)]
    pub url: String,

    /// Origin prefixed to relative contest links
    #[arg(long, default_value = DEFAULT_ORIGIN)]
    pub origin: String,

    /// Read already rendered markup from this file instead of fetching `--url`
    #[arg(long)]
    pub html_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = StoreKind::Notion)]
    pub store: StoreKind,

    #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
    pub notion_token: Option<String>,

    #[arg(long, env = "DATABASE_ID")]
    pub database_id: Option<String>,

    #[arg(long, default_value = "contests")]
    pub sqlite_name: String,

    #[arg(long, default_value = "제목 없음")]
    pub no_title: String,

    #[arg(long, default_value = "주최자 없음")]
    pub no_host: String,

    #[arg(long, default_value = "마감일 없음")]
    pub no_deadline: String,

    /// Extract and filter only, without inserting
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_url(url: &str) -> Result<Url, ConfigError> {
    Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

impl Cli {
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let listing_url = parse_url(&self.url)?;
        let origin = parse_url(&self.origin)?;

        let source = match self.html_file {
            Some(path) => Source::File(path),
            None => Source::Http(listing_url.clone()),
        };

        let store = match self.store {
            StoreKind::Notion => StoreConfig::Notion(NotionConfig {
                token: self
                    .notion_token
                    .filter(|t| !t.is_empty())
                    .ok_or(ConfigError::MissingCredential("NOTION_TOKEN"))?,
                database_id: self
                    .database_id
                    .filter(|t| !t.is_empty())
                    .ok_or(ConfigError::MissingCredential("DATABASE_ID"))?,
            }),
            StoreKind::Sqlite => StoreConfig::Sqlite {
                name: self.sqlite_name,
            },
        };

        Ok(Config {
            listing_url,
            origin,
            source,
            store,
            sentinels: Sentinels {
                no_title: self.no_title,
                no_host: self.no_host,
                no_deadline: self.no_deadline,
            },
            fields: FieldNames::default(),
            dry_run: self.dry_run,
        })
    }
}
