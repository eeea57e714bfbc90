use tracing::{info, warn};

use crate::{
    config::FieldNames,
    store::{FieldMap, FieldValue, RecordStore},
    ContestRecord,
};

/// Category attached to every record inserted by this crawler.
pub const CATEGORY_TAG: &str = "external";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    Success,
    Skipped,
    Failed(String),
}

pub struct Sink<S: RecordStore> {
    store: S,
    fields: FieldNames,
}

impl<S: RecordStore> Sink<S> {
    pub fn new(store: S, fields: FieldNames) -> Self {
        Sink { store, fields }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn field_map(&self, record: &ContestRecord) -> FieldMap {
        let mut map = FieldMap::new();
        map.insert(&self.fields.name, FieldValue::Title(record.title.clone()));
        map.insert(
            &self.fields.organization,
            FieldValue::Text(record.host.clone()),
        );
        if let Some(date) = record.deadline_date {
            map.insert(&self.fields.deadline, FieldValue::Date(date));
        }
        map.insert(&self.fields.url, FieldValue::Url(record.link.clone()));
        map.insert(
            &self.fields.category,
            FieldValue::Select(CATEGORY_TAG.to_string()),
        );
        map
    }

    pub async fn post(&self, record: &ContestRecord) -> PostOutcome {
        if !record.is_postable() {
            warn!(
                "Skip contest with empty title or link: {:?} {:?}",
                record.title, record.link
            );
            return PostOutcome::Skipped;
        }

        let fields = self.field_map(record);
        match self.store.create(&fields).await {
            Ok(()) => {
                info!("Insert {}", record.title);
                PostOutcome::Success
            }
            Err(e) => {
                warn!("Failed to insert {}: {} ({})", record.title, e, fields);
                PostOutcome::Failed(e.to_string())
            }
        }
    }
}
