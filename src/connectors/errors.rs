use reqwest::StatusCode;
use std::fmt;

/// Errors that can occur while talking to the remote store
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectorError {
    /// HTTP request/response error
    HttpError(String),
    /// Service unreachable or timeout
    ServiceUnavailable(String),
    /// Invalid response format from the remote store
    InvalidResponse(String),
    /// Authentication error (401/403)
    Unauthorized(String),
    /// Not found (404 or an empty representation for a keyed write)
    NotFound(String),
    /// Request rejected by the store (400/409/422), e.g. a duplicate object path
    Rejected(String),
    /// Internal error in connector
    Internal(String),
}

impl ConnectorError {
    /// Map a non-success status and its body to an error.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let body_preview: String = body.chars().take(240).collect();
        let msg = format!("HTTP {}: {}", status.as_u16(), body_preview);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized(msg),
            StatusCode::NOT_FOUND => Self::NotFound(msg),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                Self::Rejected(msg)
            }
            s if s.is_server_error() => Self::ServiceUnavailable(msg),
            _ => Self::HttpError(msg),
        }
    }
}

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            Self::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::Rejected(msg) => write!(f, "Rejected: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ConnectorError {}

impl From<reqwest::Error> for ConnectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::ServiceUnavailable(format!("Request timeout: {}", err))
        } else if err.is_connect() {
            Self::ServiceUnavailable(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ConnectorError::from_status(StatusCode::UNAUTHORIZED, "jwt expired"),
            ConnectorError::Unauthorized(_)
        ));
        assert!(matches!(
            ConnectorError::from_status(StatusCode::FORBIDDEN, ""),
            ConnectorError::Unauthorized(_)
        ));
        assert!(matches!(
            ConnectorError::from_status(StatusCode::NOT_FOUND, ""),
            ConnectorError::NotFound(_)
        ));
        assert!(matches!(
            ConnectorError::from_status(StatusCode::CONFLICT, "The resource already exists"),
            ConnectorError::Rejected(_)
        ));
        assert!(matches!(
            ConnectorError::from_status(StatusCode::BAD_GATEWAY, ""),
            ConnectorError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            ConnectorError::from_status(StatusCode::IM_A_TEAPOT, ""),
            ConnectorError::HttpError(_)
        ));
    }

    #[test]
    fn test_display_includes_status_and_body() {
        let err = ConnectorError::from_status(StatusCode::CONFLICT, "Duplicate");
        let msg = err.to_string();
        assert!(msg.contains("409"), "Expected status in: {msg}");
        assert!(msg.contains("Duplicate"), "Expected body in: {msg}");
    }
}
