//! API errors.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors returned by backend calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("request failed with status {status}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// `detail` from the error body, when the server sent one.
        detail: Option<String>,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response body")]
    Decode(#[source] serde_json::Error),

    /// The backend does not offer this operation.
    #[error("operation is not supported by the backend")]
    Unsupported,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Value,
}

impl ApiError {
    /// Build a status error from a raw error body, keeping `detail` if present.
    pub fn from_body(status: StatusCode, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|body| match body.detail {
                Value::Null => None,
                Value::String(detail) => Some(detail),
                other => Some(other.to_string()),
            })
            .filter(|detail| !detail.trim().is_empty());

        Self::Status { status, detail }
    }

    /// The server's own explanation, shown to the user verbatim.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Whether the server rejected the request as conflicting with current state.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::CONFLICT)
    }

    /// Server detail, or `fallback` when there is none.
    pub fn detail_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.detail().unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_kept_verbatim() {
        let error = ApiError::from_body(
            StatusCode::BAD_REQUEST,
            r#"{"detail":"Coupon has expired"}"#,
        );

        assert_eq!(error.detail(), Some("Coupon has expired"));
        assert!(!error.is_conflict());
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let error = ApiError::from_body(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","quantity"],"msg":"field required"}]}"#,
        );

        assert!(error.detail().is_some_and(|detail| detail.contains("field required")));
    }

    #[test]
    fn non_json_body_has_no_detail() {
        let error = ApiError::from_body(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");

        assert_eq!(error.detail(), None);
        assert_eq!(error.detail_or("try again later"), "try again later");
    }

    #[test]
    fn conflict_status_is_detected() {
        let error = ApiError::from_body(StatusCode::CONFLICT, r#"{"detail":"other branch"}"#);

        assert!(error.is_conflict());
    }
}
