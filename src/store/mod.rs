mod notion;
mod sqlite;

pub use notion::NotionStore;
pub use sqlite::{ContestTable, SqliteStore, Table};

use crate::CrawlerError;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Title(String),
    Text(String),
    Date(NaiveDate),
    Url(String),
    Select(String),
}

/// Property name to typed value, as handed to [`RecordStore::create`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<String, FieldValue>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>>(&mut self, key: K, value: FieldValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    pub fn title(&self) -> Option<&str> {
        self.0.values().find_map(|v| match v {
            FieldValue::Title(t) => Some(t.as_str()),
            _ => None,
        })
    }
}

impl fmt::Display for FieldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => write!(f, "{}", s),
            Err(_) => write!(f, "{:?}", self.0),
        }
    }
}

#[async_trait::async_trait]
pub trait RecordStore {
    async fn query_titles(&self) -> Result<HashSet<String>, CrawlerError>;
    async fn create(&self, fields: &FieldMap) -> Result<(), CrawlerError>;
}
