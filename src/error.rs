//! Error taxonomy for the movie library
//!
//! Every failure maps to one [`ErrorKind`], and each kind has its own gRPC
//! status and HTTP status so callers can tell them apart.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tonic::{Code, Status};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse classification of an [`Error`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Validation,
    NotFound,
    Storage,
    Transport,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input document could not be decoded
    #[error("malformed movie document: {0}")]
    Parse(String),

    #[error("invalid request: {0}")]
    Validation(String),

    /// Query or update before any load
    #[error("catalog has not been loaded")]
    NotLoaded,

    #[error("{0}")]
    NotFound(String),

    #[error("catalog document {path} is not accessible: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog document {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Storage failure without a local path, e.g. reported by a remote server
    #[error("catalog storage failed: {0}")]
    Storage(String),

    #[error("rpc transport failed: {0}")]
    Transport(String),

    #[error("rpc did not complete within {0:?}")]
    Timeout(Duration),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) => ErrorKind::Parse,
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotLoaded | Self::NotFound(_) => ErrorKind::NotFound,
            Self::Io { .. } | Self::Corrupt { .. } | Self::Storage(_) => ErrorKind::Storage,
            Self::Transport(_) | Self::Timeout(_) => ErrorKind::Transport,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "TIMEOUT",
            _ => match self.kind() {
                ErrorKind::Parse => "PARSE_ERROR",
                ErrorKind::Validation => "VALIDATION_ERROR",
                ErrorKind::NotFound => "NOT_FOUND",
                ErrorKind::Storage => "STORAGE_ERROR",
                ErrorKind::Transport => "TRANSPORT_ERROR",
            },
        }
    }

    fn http_status(&self) -> StatusCode {
        match self {
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => match self.kind() {
                ErrorKind::Parse | ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
                ErrorKind::Transport => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

// Server side: errors leave the catalog service as gRPC statuses
impl From<Error> for Status {
    fn from(err: Error) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Parse | ErrorKind::Validation => Status::invalid_argument(message),
            ErrorKind::NotFound => Status::not_found(message),
            ErrorKind::Storage => Status::internal(message),
            ErrorKind::Transport => Status::unavailable(message),
        }
    }
}

// Client side: statuses come back into the same taxonomy
impl From<Status> for Error {
    fn from(status: Status) -> Self {
        let message = status.message().to_string();
        match status.code() {
            Code::NotFound => Self::NotFound(message),
            Code::InvalidArgument => Self::Validation(message),
            Code::Internal | Code::DataLoss => Self::Storage(message),
            code => Self::Transport(format!("{code:?}: {message}")),
        }
    }
}

impl From<tonic::transport::Error> for Error {
    fn from(err: tonic::transport::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// JSON error payload returned by the HTTP gateway
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let payload = ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        };
        (self.http_status(), Json(payload)).into_response()
    }
}
