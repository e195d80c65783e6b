use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoutError {
    // Request shape
    #[error("{message}")]
    Client { message: String },

    // Filesystem
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Peer round trip
    #[error("request to {url} failed: {message}")]
    Delegate {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation timed out after {}ms", after.as_millis())]
    TimedOut { after: Duration },
}

impl ScoutError {
    pub fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn delegate(url: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Delegate {
            url: url.into(),
            status,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Client { .. } => StatusCode::BAD_REQUEST,
            Self::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Delegate { status, .. } => status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Self::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            Self::TimedOut { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Wire representation carried in responses and in `SearchResult.error`.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            message: self.to_string(),
            code: self.status_code().as_u16(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: u16,
}

pub type ScoutResult<T> = Result<T, ScoutError>;
