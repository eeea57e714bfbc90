use reqwest::{Client, Url};
use std::path::PathBuf;
use tracing::debug;

use crate::CrawlerError;

/// Supplies the rendered markup of a listing page.
#[async_trait::async_trait]
pub trait MarkupProvider {
    async fn fetch(&self, url: &Url) -> Result<String, CrawlerError>;
}

/// Plain GET; only useful when the page is rendered server-side.
pub struct HttpProvider {
    client: Client,
}

impl HttpProvider {
    pub fn new() -> Self {
        HttpProvider {
            client: Client::new(),
        }
    }
}

impl Default for HttpProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MarkupProvider for HttpProvider {
    async fn fetch(&self, url: &Url) -> Result<String, CrawlerError> {
        debug!("Visit {}", url);
        Ok(self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }
}

/// Markup saved to disk by an external renderer. The url is ignored.
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        FileProvider { path: path.into() }
    }
}

#[async_trait::async_trait]
impl MarkupProvider for FileProvider {
    async fn fetch(&self, url: &Url) -> Result<String, CrawlerError> {
        debug!("Read {} for {}", self.path.display(), url);
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}
