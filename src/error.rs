// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system.
//! Transport faults come from the remote side; pagination and
//! reconciliation faults mean the data we were handed is inconsistent.
//! None of them is retried here: every fault aborts the current group.

use std::fmt;
use thiserror::Error;

/// Wall API error codes as a typed vocabulary.
///
/// The API reports failures as `{"error": {"error_code": N, ...}}` with an
/// HTTP 200 status, so the numeric code is the only reliable signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// Authorization failed: the access token is invalid or expired
    AuthorizationFailed,
    /// Too many requests per second
    TooManyRequests,
    /// Flood control: too many identical requests
    FloodControl,
    /// Internal server error on the remote side
    InternalError,
    /// Access to the requested content is denied
    AccessDenied,
    /// One of the parameters is missing or invalid
    InvalidParameter,
    /// The group or community is private
    PrivateGroup,
    /// HTTP status code fallback when there is no error envelope
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(i64),
}

impl ApiErrorCode {
    /// Maps a numeric API error code into the typed vocabulary.
    pub fn from_api_code(code: i64) -> Self {
        match code {
            5 => Self::AuthorizationFailed,
            6 | 29 => Self::TooManyRequests,
            9 => Self::FloodControl,
            10 => Self::InternalError,
            15 | 203 => Self::AccessDenied,
            100 | 113 => Self::InvalidParameter,
            30 => Self::PrivateGroup,
            other => Self::Unknown(other),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether the remote rejected us for calling too fast.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::TooManyRequests | Self::FloodControl)
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthorizationFailed => write!(f, "authorization_failed"),
            Self::TooManyRequests => write!(f, "too_many_requests"),
            Self::FloodControl => write!(f, "flood_control"),
            Self::InternalError => write!(f, "internal_error"),
            Self::AccessDenied => write!(f, "access_denied"),
            Self::InvalidParameter => write!(f, "invalid_parameter"),
            Self::PrivateGroup => write!(f, "private_group"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "code_{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Remote call to {endpoint} failed ({code}): {message}")]
    TransportFault {
        endpoint: String,
        code: ApiErrorCode,
        message: String,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error(
        "{endpoint} returned an empty page at offset {offset} after {fetched} of {declared} items"
    )]
    IncompletePage {
        endpoint: String,
        offset: u64,
        fetched: u64,
        declared: u64,
    },

    #[error("{endpoint} declared {declared} items but {fetched} were fetched")]
    CountMismatch {
        endpoint: String,
        fetched: u64,
        declared: u64,
    },

    #[error("Photo {photo_id} has no {field} after reconciliation")]
    IncompleteRecord {
        photo_id: String,
        field: &'static str,
    },

    #[error("Photo {photo_id} appears more than once in post {post_id}")]
    DuplicateRecord { post_id: String, photo_id: String },

    #[error("Photo {photo_id} matches {matches} album records; at most one is allowed")]
    AmbiguousMatch { photo_id: String, matches: usize },

    #[error("Fetch from {0} was cancelled")]
    Cancelled(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

impl AppError {
    /// Whether this fault says the fetched data itself is inconsistent,
    /// as opposed to the remote being unreachable or refusing us.
    pub fn is_data_inconsistency(&self) -> bool {
        matches!(
            self,
            AppError::IncompletePage { .. }
                | AppError::CountMismatch { .. }
                | AppError::IncompleteRecord { .. }
                | AppError::DuplicateRecord { .. }
                | AppError::AmbiguousMatch { .. }
        )
    }
}
