use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotionError {
    #[error("an API key is required")]
    MissingCredential,

    #[error("a {0} ID is required")]
    MissingTarget(&'static str),

    #[error("not a Notion ID or URL: {0:?}")]
    InvalidTarget(String),

    /// Non-success status from one of the two page reads.
    #[error("failed to fetch {what} (HTTP {status})")]
    Fetch { what: &'static str, status: u16 },

    #[error("failed to query Notion database (HTTP {status}): {message}")]
    Query { status: u16, message: String },

    #[error("request to Notion failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response from Notion: {0}")]
    Decode(#[from] serde_json::Error),
}

impl NotionError {
    /// Input problems caught before any request went out.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            NotionError::MissingCredential
                | NotionError::MissingTarget(_)
                | NotionError::InvalidTarget(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, NotionError>;
