use reqwest::StatusCode;
use thiserror::Error;

use crate::validate::ValidationErrors;

#[derive(Debug, Error)]
pub enum MelodexError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("nothing found")]
    NotFound,

    #[error("not authorized ({0})")]
    Unauthorized(StatusCode),

    #[error("unexpected response {status}: {body}")]
    Non200 { status: StatusCode, body: String },

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("bad base url: {0}")]
    Url(#[from] url::ParseError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a failed call should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Rejected before dispatch, shown next to the offending field.
    Validation,
    /// 404: a normal "no results" state.
    NotFound,
    /// 401/403: the session is gone.
    Unauthorized,
    Other,
}

impl MelodexError {
    pub fn failure(&self) -> Failure {
        match self {
            MelodexError::Validation(_) => Failure::Validation,
            MelodexError::NotFound => Failure::NotFound,
            MelodexError::Unauthorized(_) => Failure::Unauthorized,
            _ => Failure::Other,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.failure() == Failure::Unauthorized
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            MelodexError::NotFound => Some(StatusCode::NOT_FOUND),
            MelodexError::Unauthorized(status) => Some(*status),
            MelodexError::Non200 { status, .. } => Some(*status),
            MelodexError::Request(e) => e.status(),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("fs error: {0}")]
    Fs(#[from] std::io::Error),

    #[error("corrupt storage file: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}
