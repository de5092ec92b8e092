use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch failed for {source_id}: {message}")]
    Fetch { source_id: String, message: String },

    /// Page headings and extracted tables disagree with the declared source layout.
    #[error("Configuration mismatch for {source_id}: {detail}")]
    ConfigurationMismatch { source_id: String, detail: String },

    /// Free text outside the known vocabulary/format tables.
    #[error("Unrecognized {field} value {value:?} in {service} record {title:?}")]
    UnrecognizedFormat {
        service: String,
        title: String,
        field: &'static str,
        value: String,
    },
}

impl DatasetError {
    pub fn mismatch(source_id: &str, detail: impl Into<String>) -> Self {
        DatasetError::ConfigurationMismatch {
            source_id: source_id.to_string(),
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DatasetError>;
