use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request timed out")]
    Timeout,

    #[error("backend returned {status}")]
    Rejected {
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else if err.is_decode() {
            BackendError::InvalidResponse(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

/// What the user gets to see when an action fails. `Display` is the
/// message shown in the interface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("Please upload at least one pdf file")]
    NoFiles,

    #[error("Please upload and process PDFs first.")]
    NoSession,

    #[error("Error: {}", .detail.as_deref().unwrap_or("Unknown error"))]
    Backend { detail: Option<String> },

    #[error("Processing timed out. Please try with smaller files.")]
    ProcessTimeout,

    #[error("Request timed out. Please try again.")]
    AskTimeout,

    #[error("Connection failed: {0}")]
    Connection(String),
}

impl ChatError {
    pub(crate) fn from_process(err: BackendError) -> Self {
        match err {
            BackendError::Timeout => ChatError::ProcessTimeout,
            other => Self::from_backend(other),
        }
    }

    pub(crate) fn from_ask(err: BackendError) -> Self {
        match err {
            BackendError::Timeout => ChatError::AskTimeout,
            other => Self::from_backend(other),
        }
    }

    fn from_backend(err: BackendError) -> Self {
        match err {
            BackendError::Rejected { detail, .. } => ChatError::Backend { detail },
            BackendError::Transport(msg) | BackendError::InvalidResponse(msg) => ChatError::Connection(msg),
            BackendError::Timeout => ChatError::Connection("request timed out".to_string()),
        }
    }

    /// Raised locally, before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, ChatError::NoFiles | ChatError::NoSession)
    }
}
