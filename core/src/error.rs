//! Error types for the breach service client.
//!
//! # Design
//! Errors fall into four kinds, exposed through `ApiError::kind`:
//! local preconditions that fail before any request is sent, transport
//! failures surfaced verbatim from the underlying HTTP stack, status codes
//! the service documents, and bodies that do not decode into the expected
//! shape. Callers branch on the variant or the kind instead of matching on
//! message text.

use thiserror::Error;

use crate::status::ResponseCode;

/// Boxed error returned by a `Transport` implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Coarse classification of an `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally, no request was sent.
    Precondition,
    /// The HTTP exchange itself failed.
    Transport,
    /// The service answered with a non-success status.
    Status,
    /// A success response carried a body of the wrong shape.
    Decode,
}

/// Errors returned by `PwnedClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A token-gated resource was requested without a configured API key.
    #[error("the requested resource requires an API key")]
    MissingApiKey,

    /// A required path identifier was empty.
    #[error("a {0} was not provided")]
    MissingIdentifier(&'static str),

    /// A path identifier that would be dropped from the URL as a dot segment.
    #[error("{what} {value:?} cannot be used as a path segment")]
    InvalidIdentifier { what: &'static str, value: String },

    /// The password-range prefix is not exactly five hexadecimal characters.
    #[error("range prefix must be 5 hexadecimal characters, got {0:?}")]
    InvalidRangePrefix(String),

    /// A configured base URL is unusable.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    /// 400: the identifier does not comply with an acceptable format.
    #[error("{}", ResponseCode::BadRequest.message())]
    BadRequest,

    /// 401: the API key provided was not valid.
    #[error("{}", ResponseCode::Unauthorized.message())]
    Unauthorized,

    /// 403: no user agent was specified in the request.
    #[error("{}", ResponseCode::Forbidden.message())]
    Forbidden,

    /// 404: nothing matched. For account lookups this means "not pwned".
    #[error("{}", ResponseCode::NotFound.message())]
    NotFound,

    /// 429: the rate limit has been exceeded.
    #[error("{}", ResponseCode::TooManyRequests.message())]
    TooManyRequests { retry_after: Option<u64> },

    /// 503: the underlying service is not available.
    #[error("{}", ResponseCode::ServiceUnavailable.message())]
    ServiceUnavailable,

    /// Any non-success status the service does not document.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::MissingApiKey
            | ApiError::MissingIdentifier(_)
            | ApiError::InvalidIdentifier { .. }
            | ApiError::InvalidRangePrefix(_)
            | ApiError::InvalidUrl(_) => ErrorKind::Precondition,
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::BadRequest
            | ApiError::Unauthorized
            | ApiError::Forbidden
            | ApiError::NotFound
            | ApiError::TooManyRequests { .. }
            | ApiError::ServiceUnavailable
            | ApiError::HttpError { .. } => ErrorKind::Status,
            ApiError::DeserializationError(_) => ErrorKind::Decode,
        }
    }

    /// True for a 404, which the account endpoints use to mean "no matches".
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::DeserializationError(err.to_string())
    }
}
