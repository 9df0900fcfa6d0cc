//! Mapping of HTTP status codes to the outcomes the service documents.

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Status codes with a documented meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Ok,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    TooManyRequests,
    ServiceUnavailable,
}

impl ResponseCode {
    pub fn from_status(status: u16) -> Option<Self> {
        let code = match status {
            200 => ResponseCode::Ok,
            400 => ResponseCode::BadRequest,
            401 => ResponseCode::Unauthorized,
            403 => ResponseCode::Forbidden,
            404 => ResponseCode::NotFound,
            429 => ResponseCode::TooManyRequests,
            503 => ResponseCode::ServiceUnavailable,
            _ => return None,
        };
        Some(code)
    }

    pub fn status(self) -> u16 {
        match self {
            ResponseCode::Ok => 200,
            ResponseCode::BadRequest => 400,
            ResponseCode::Unauthorized => 401,
            ResponseCode::Forbidden => 403,
            ResponseCode::NotFound => 404,
            ResponseCode::TooManyRequests => 429,
            ResponseCode::ServiceUnavailable => 503,
        }
    }

    /// Human-readable meaning of the code, also used as the `ApiError` message.
    pub fn message(self) -> &'static str {
        match self {
            ResponseCode::Ok => "ok: everything worked and the response carries a payload",
            ResponseCode::BadRequest => {
                "bad request: the account does not comply with an acceptable format"
            }
            ResponseCode::Unauthorized => "unauthorised: the API key provided was not valid",
            ResponseCode::Forbidden => "forbidden: no user agent has been specified in the request",
            ResponseCode::NotFound => {
                "not found: the account could not be found and has therefore not been pwned"
            }
            ResponseCode::TooManyRequests => "too many requests: the rate limit has been exceeded",
            ResponseCode::ServiceUnavailable => {
                "service unavailable: the underlying service is not available"
            }
        }
    }
}

/// Let any 2xx through; turn everything else into the matching `ApiError`.
pub fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }

    let err = match ResponseCode::from_status(response.status) {
        Some(ResponseCode::BadRequest) => ApiError::BadRequest,
        Some(ResponseCode::Unauthorized) => ApiError::Unauthorized,
        Some(ResponseCode::Forbidden) => ApiError::Forbidden,
        Some(ResponseCode::NotFound) => ApiError::NotFound,
        Some(ResponseCode::TooManyRequests) => {
            let retry_after = response
                .header("retry-after")
                .and_then(|value| value.trim().parse().ok());
            tracing::warn!(?retry_after, "rate limit exceeded");
            ApiError::TooManyRequests { retry_after }
        }
        Some(ResponseCode::ServiceUnavailable) => {
            tracing::warn!("breach service unavailable");
            ApiError::ServiceUnavailable
        }
        _ => ApiError::HttpError {
            status: response.status,
            body: response.body_lossy(),
        },
    };
    Err(err)
}
