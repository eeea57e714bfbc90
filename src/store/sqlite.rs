use super::{FieldMap, RecordStore};
use crate::{utils, CrawlerError};
use futures::TryStreamExt;
use sqlx::{sqlite::SqliteConnectOptions, Row, SqlitePool};
use std::collections::HashSet;

#[async_trait::async_trait]
pub trait Table {
    type Record<'a>;

    fn get_name(&self) -> &str;
    fn get_pool(&self) -> &SqlitePool;

    async fn create(&self) -> Result<(), sqlx::Error>;
    async fn insert<'a>(&self, record: Self::Record<'a>) -> Result<(), sqlx::Error>;

    async fn is_created(&self) -> Result<bool, sqlx::Error> {
        Ok(
            sqlx::query("SELECT name FROM sqlite_master WHERE type='table' AND name = ?")
                .bind(self.get_name())
                .fetch_optional(self.get_pool())
                .await?
                .is_some(),
        )
    }

    async fn ids(&self) -> Result<HashSet<String>, sqlx::Error> {
        let mut ids: HashSet<String> = HashSet::new();
        let query = format!("SELECT id FROM {}", self.get_name());
        let mut rows = sqlx::query(&query).fetch(self.get_pool());
        while let Some(row) = rows.try_next().await? {
            ids.insert(row.try_get("id")?);
        }
        Ok(ids)
    }

    async fn count(&self) -> Result<u32, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM {}", self.get_name());
        Ok(sqlx::query(&query)
            .fetch_one(self.get_pool())
            .await?
            .try_get(0)?)
    }
}

/// One row per contest title; the typed fields are kept as JSON.
pub struct ContestTable {
    name: String,
    pool: SqlitePool,
}

#[async_trait::async_trait]
impl Table for ContestTable {
    /// Title and the field map serialized as JSON.
    type Record<'a> = (&'a str, &'a str);

    fn get_name(&self) -> &str {
        self.name.as_str()
    }

    fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn create(&self) -> Result<(), sqlx::Error> {
        let query = format!(
            r#"
                CREATE TABLE IF NOT EXISTS {} (
                    id TEXT PRIMARY KEY,
                    created_at DATETIME,
                    fields TEXT
                )
            "#,
            &self.name
        );
        sqlx::query(query.as_str()).execute(self.get_pool()).await?;
        Ok(())
    }

    async fn insert<'a>(&self, (title, fields): Self::Record<'a>) -> Result<(), sqlx::Error> {
        let query = format!(
            "INSERT OR IGNORE INTO {} (id, created_at, fields) VALUES (?, ?, ?)",
            &self.name
        );
        sqlx::query(&query)
            .bind(title)
            .bind(utils::get_now())
            .bind(fields)
            .execute(self.get_pool())
            .await?;
        Ok(())
    }
}

/// Local record store backed by `<name>.db`.
pub struct SqliteStore {
    pub contests: ContestTable,
}

impl SqliteStore {
    pub async fn new(name: &str) -> Result<SqliteStore, CrawlerError> {
        let opt = SqliteConnectOptions::new()
            .filename(format!("{}.db", name))
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(opt).await?;
        let contests = ContestTable {
            name: format!("{}_contests", name),
            pool,
        };

        if contests.is_created().await? {
            tracing::debug!("Use table {} ({} rows)", contests.name, contests.count().await?);
        } else {
            tracing::debug!("Create table {}", contests.name);
            contests.create().await?;
        }

        Ok(SqliteStore { contests })
    }
}

#[async_trait::async_trait]
impl RecordStore for SqliteStore {
    async fn query_titles(&self) -> Result<HashSet<String>, CrawlerError> {
        Ok(self.contests.ids().await?)
    }

    async fn create(&self, fields: &FieldMap) -> Result<(), CrawlerError> {
        let title = fields
            .title()
            .ok_or_else(|| CrawlerError::MissingTitleField(fields.to_string()))?;
        let json = serde_json::to_string(fields)?;
        Ok(self.contests.insert((title, &json)).await?)
    }
}
