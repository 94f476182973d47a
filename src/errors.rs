use axum::http::StatusCode;
use thiserror::Error;

/// Failure of one of the two outbound calls to the shortening service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service responded with {0}")]
    Status(StatusCode),
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("no shortened url to copy")]
    NothingToCopy,
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

impl ClipboardError {
    pub fn acknowledgment(&self) -> &'static str {
        match self {
            Self::NothingToCopy => "Please shorten a URL first.",
            Self::Unavailable(_) => "Failed to copy URL.",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid SHORTENER_API_ORIGIN {value:?}: {reason}")]
    InvalidOrigin { value: String, reason: String },
}

/// User-facing outcome of a failed form action. The message is what the
/// error banner shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("{0}")]
    Request(&'static str),
}

impl OperationError {
    pub const EMPTY_URL: Self = Self::Validation("Please enter a URL.");
    pub const NO_SHORT_ID: Self =
        Self::Validation("Please shorten a URL first to view analytics.");
    pub const SHORTEN_FAILED: Self = Self::Request("Failed to shorten URL. Please try again.");
    pub const ANALYTICS_FAILED: Self =
        Self::Request("Failed to fetch analytics. Make sure the shortened URL is valid.");

    pub fn message(&self) -> &'static str {
        match self {
            Self::Validation(message) | Self::Request(message) => message,
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
        }
    }
}

impl From<OperationError> for AppError {
    fn from(err: OperationError) -> Self {
        match err {
            OperationError::Validation(message) => Self::bad_request(message),
            OperationError::Request(message) => Self::bad_gateway(message),
        }
    }
}

impl From<ClipboardError> for AppError {
    fn from(err: ClipboardError) -> Self {
        let status = match err {
            ClipboardError::NothingToCopy => StatusCode::CONFLICT,
            ClipboardError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.acknowledgment().to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
