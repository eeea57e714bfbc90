use super::{FieldMap, FieldValue, RecordStore};
use crate::{config::NotionConfig, CrawlerError};
use itertools::Itertools;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use tracing::debug;

const API_BASE: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";
const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Notion database used as the record store.
pub struct NotionStore {
    client: Client,
    base_url: String,
    config: NotionConfig,
    title_field: String,
}

impl NotionStore {
    pub fn new(config: NotionConfig, title_field: &str) -> Self {
        Self::with_base_url(API_BASE, config, title_field)
    }

    pub fn with_base_url(base_url: &str, config: NotionConfig, title_field: &str) -> Self {
        NotionStore {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            config,
            title_field: title_field.to_string(),
        }
    }

    async fn query_page(&self, cursor: Option<&str>) -> Result<QueryResponse, CrawlerError> {
        let mut body = json!({ "page_size": PAGE_SIZE });
        if let Some(cursor) = cursor {
            body["start_cursor"] = Value::from(cursor);
        }

        let res = self
            .client
            .post(format!(
                "{}/databases/{}/query",
                self.base_url, self.config.database_id
            ))
            .bearer_auth(&self.config.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await?;

        Ok(check_status(res).await?.json::<QueryResponse>().await?)
    }
}

async fn check_status(res: Response) -> Result<Response, CrawlerError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.message)
        .unwrap_or(body);
    Err(CrawlerError::StoreRejected {
        status: status.as_u16(),
        message,
    })
}

fn rich_text(content: &str) -> Value {
    json!([{ "text": { "content": content } }])
}

pub(crate) fn to_properties(fields: &FieldMap) -> Value {
    let mut properties = Map::new();
    for (name, value) in fields.iter() {
        let property = match value {
            FieldValue::Title(t) => json!({ "title": rich_text(t) }),
            FieldValue::Text(t) => json!({ "rich_text": rich_text(t) }),
            FieldValue::Date(d) => json!({ "date": { "start": d.format("%Y-%m-%d").to_string() } }),
            FieldValue::Url(u) => json!({ "url": u }),
            FieldValue::Select(s) => json!({ "select": { "name": s } }),
        };
        properties.insert(name.clone(), property);
    }
    Value::Object(properties)
}

pub(crate) fn page_title(page: &Value, title_field: &str) -> Option<String> {
    let segments = page["properties"][title_field]["title"].as_array()?;
    let title = segments
        .iter()
        .filter_map(|s| s["plain_text"].as_str())
        .join("");
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

#[async_trait::async_trait]
impl RecordStore for NotionStore {
    async fn query_titles(&self) -> Result<HashSet<String>, CrawlerError> {
        let mut titles = HashSet::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.query_page(cursor.as_deref()).await?;
            debug!("Fetched {} rows from notion", page.results.len());
            titles.extend(
                page.results
                    .iter()
                    .filter_map(|p| page_title(p, &self.title_field)),
            );

            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        Ok(titles)
    }

    async fn create(&self, fields: &FieldMap) -> Result<(), CrawlerError> {
        let body = json!({
            "parent": { "database_id": self.config.database_id },
            "properties": to_properties(fields),
        });

        let res = self
            .client
            .post(format!("{}/pages", self.base_url))
            .bearer_auth(&self.config.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await?;
        check_status(res).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_json, body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer) -> NotionStore {
        NotionStore::with_base_url(
            &format!("{}/", server.uri()),
            NotionConfig {
                token: "secret-token".to_string(),
                database_id: "db".to_string(),
            },
            "이름",
        )
    }

    fn row(title: &str) -> Value {
        json!({ "properties": { "이름": { "title": [{ "plain_text": title }] } } })
    }

    #[test]
    fn properties_follow_field_types() {
        let mut fields = FieldMap::new();
        fields.insert("이름", FieldValue::Title("Contest".into()));
        fields.insert("주최", FieldValue::Text("Host".into()));
        fields.insert(
            "마감일",
            FieldValue::Date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()),
        );
        fields.insert("링크", FieldValue::Url("https://linkareer.com/activity/1".into()));
        fields.insert("분류", FieldValue::Select("external".into()));

        assert_eq!(
            to_properties(&fields),
            json!({
                "이름": { "title": [{ "text": { "content": "Contest" } }] },
                "주최": { "rich_text": [{ "text": { "content": "Host" } }] },
                "마감일": { "date": { "start": "2024-07-01" } },
                "링크": { "url": "https://linkareer.com/activity/1" },
                "분류": { "select": { "name": "external" } },
            })
        );
    }

    #[test]
    fn titles_are_read_from_query_results() {
        let response: QueryResponse = serde_json::from_value(json!({
            "object": "list",
            "results": [
                { "properties": { "이름": { "title": [{ "plain_text": "Contest A" }] } } },
                { "properties": { "이름": { "title": [
                    { "plain_text": "Contest " },
                    { "plain_text": "B" }
                ] } } },
                { "properties": { "이름": { "title": [] } } },
                { "properties": { "Name": { "title": [{ "plain_text": "Other" }] } } },
            ],
            "has_more": true,
            "next_cursor": "abc"
        }))
        .unwrap();

        let titles: Vec<String> = response
            .results
            .iter()
            .filter_map(|p| page_title(p, "이름"))
            .collect();
        assert_eq!(titles, vec!["Contest A".to_string(), "Contest B".to_string()]);
        assert!(response.has_more);
        assert_eq!(response.next_cursor.as_deref(), Some("abc"));
    }

    #[test]
    fn last_page_has_no_cursor() {
        let response: QueryResponse =
            serde_json::from_value(json!({ "results": [], "next_cursor": null })).unwrap();
        assert!(!response.has_more);
        assert_eq!(response.next_cursor, None);
    }

    #[tokio::test]
    async fn query_titles_follows_cursor_pages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/databases/db/query"))
            .and(header("Authorization", "Bearer secret-token"))
            .and(header("Notion-Version", NOTION_VERSION))
            .and(body_json(json!({ "page_size": PAGE_SIZE })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [row("Contest A"), row("Contest B")],
                "has_more": true,
                "next_cursor": "cursor-2"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/databases/db/query"))
            .and(body_partial_json(json!({ "start_cursor": "cursor-2" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [row("Contest C")],
                "has_more": false,
                "next_cursor": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let titles = store(&server).query_titles().await.unwrap();
        assert_eq!(
            titles,
            HashSet::from([
                "Contest A".to_string(),
                "Contest B".to_string(),
                "Contest C".to_string()
            ])
        );
    }

    #[tokio::test]
    async fn rejected_query_keeps_status_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/databases/db/query"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "object": "error",
                "code": "validation_error",
                "message": "body failed validation"
            })))
            .mount(&server)
            .await;

        match store(&server).query_titles().await {
            Err(CrawlerError::StoreRejected { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "body failed validation");
            }
            other => panic!("expected a rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn create_posts_page_under_database() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pages"))
            .and(header("Authorization", "Bearer secret-token"))
            .and(header("Notion-Version", NOTION_VERSION))
            .and(body_partial_json(json!({
                "parent": { "database_id": "db" },
                "properties": {
                    "이름": { "title": [{ "text": { "content": "Contest" } }] },
                    "링크": { "url": "https://linkareer.com/activity/1" }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "object": "page" })))
            .expect(1)
            .mount(&server)
            .await;

        let mut fields = FieldMap::new();
        fields.insert("이름", FieldValue::Title("Contest".into()));
        fields.insert("링크", FieldValue::Url("https://linkareer.com/activity/1".into()));
        store(&server).create(&fields).await.unwrap();
    }

    #[tokio::test]
    async fn rejected_create_without_json_body_keeps_raw_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pages"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway"))
            .mount(&server)
            .await;

        let mut fields = FieldMap::new();
        fields.insert("이름", FieldValue::Title("Contest".into()));
        match store(&server).create(&fields).await {
            Err(CrawlerError::StoreRejected { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad gateway");
            }
            other => panic!("expected a rejection, got {:?}", other),
        }
    }
}
