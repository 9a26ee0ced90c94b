use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Upper bound on response body text kept in an [`ApiError::Http`].
pub const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Non-2xx response. `body` holds at most [`MAX_ERROR_BODY_CHARS`] chars.
    #[error("{method} {path} failed (HTTP {status})")]
    Http {
        method: &'static str,
        path: String,
        status: u16,
        body: String,
    },

    /// DNS, connect, timeout, reset: no HTTP status was received.
    #[error("{method} {path} failed: {message}")]
    Network {
        method: &'static str,
        path: String,
        message: String,
    },

    /// Incoming payload did not match the expected schema.
    #[error("{what} did not match expected schema: {detail}")]
    Contract { what: String, detail: String },

    /// Outgoing payload rejected before any network call.
    #[error("Invalid note data: {0}")]
    Validation(String),

    #[error("Invalid API base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl ApiError {
    pub(crate) fn http(method: &'static str, path: &str, status: u16, body: &str) -> Self {
        Self::Http {
            method,
            path: path.to_string(),
            status,
            body: truncate_body(body),
        }
    }

    pub(crate) fn contract(what: impl Into<String>, detail: impl ToString) -> Self {
        Self::Contract {
            what: what.into(),
            detail: detail.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_body_is_bounded() {
        let long = "x".repeat(2_000);
        let err = ApiError::http("GET", "/lab-notes", 500, &long);
        match err {
            ApiError::Http { body, status, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body.chars().count(), MAX_ERROR_BODY_CHARS);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let body = "é".repeat(600);
        let truncated = truncate_body(&body);
        assert_eq!(truncated.chars().count(), MAX_ERROR_BODY_CHARS);
        assert_eq!(truncate_body("short"), "short");
    }
}
