#[derive(Debug, thiserror::Error)]
pub enum CrawlerError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::error::Error),
    #[error("Http error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Store rejected the request ({status}): {message}")]
    StoreRejected { status: u16, message: String },
    #[error("Field map has no title-typed field: {0}")]
    MissingTitleField(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing {0} for the notion store")]
    MissingCredential(&'static str),
    #[error("Invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}
