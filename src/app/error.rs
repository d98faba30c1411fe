use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response status: {status}")]
    UnexpectedStatus { status: u16 },

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot parse error: {0}")]
    SnapshotParse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FetchError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::UnexpectedStatus { status } => Some(*status),
            FetchError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether a later attempt could plausibly succeed.
    ///
    /// Transport failures and 5xx responses are transient. Among 4xx only
    /// 400, 408 and 429 are; anything else (bad key, missing resource)
    /// will keep failing until the configuration changes.
    pub fn is_recoverable(&self) -> bool {
        match self {
            FetchError::UnexpectedStatus { status } => is_http_error_recoverable(*status),
            FetchError::Transport(_) => true,
            _ => false,
        }
    }
}

pub fn is_http_error_recoverable(status: u16) -> bool {
    if (400..500).contains(&status) {
        matches!(status, 400 | 408 | 429)
    } else {
        true
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
