use reqwest::StatusCode;
use thiserror::Error;

use crate::utils::truncate;

/// Longest slice of a response body carried in an error message
const MAX_BODY_EXCERPT_CHARS: usize = 200;

/// Why the catalog host did not hand back a usable hero list
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Catalog host refused access ({status}): {excerpt}")]
    AccessDenied { status: u16, excerpt: String },

    #[error("No hero catalog at {url}")]
    CatalogNotFound { url: String },

    #[error("Catalog host is throttling requests")]
    Throttled,

    #[error("Catalog host failed ({status}): {excerpt}")]
    ServerError { status: u16, excerpt: String },

    #[error("Unexpected status {status} from catalog host: {excerpt}")]
    UnexpectedStatus { status: u16, excerpt: String },

    #[error("Could not reach catalog host: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Catalog payload is not a hero list: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Classify a non-success response for `url`
    pub fn from_status(status: StatusCode, url: &str, body: &str) -> Self {
        let code = status.as_u16();
        let excerpt = truncate(body.trim(), MAX_BODY_EXCERPT_CHARS);
        match code {
            401 | 403 => ApiError::AccessDenied {
                status: code,
                excerpt,
            },
            404 | 410 => ApiError::CatalogNotFound {
                url: url.to_string(),
            },
            429 => ApiError::Throttled,
            500..=599 => ApiError::ServerError {
                status: code,
                excerpt,
            },
            _ => ApiError::UnexpectedStatus {
                status: code,
                excerpt,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://catalog.test/api/all.json";

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, URL, ""),
            ApiError::AccessDenied { status: 403, .. }
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, URL, "gone"),
            ApiError::CatalogNotFound { url } if url == URL
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, URL, ""),
            ApiError::Throttled
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, URL, ""),
            ApiError::ServerError { status: 502, .. }
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, URL, ""),
            ApiError::UnexpectedStatus { status: 418, .. }
        ));
    }

    #[test]
    fn test_body_excerpt_is_bounded() {
        let body = "é".repeat(1000);
        match ApiError::from_status(StatusCode::SERVICE_UNAVAILABLE, URL, &body) {
            ApiError::ServerError { excerpt, .. } => {
                assert_eq!(excerpt.chars().count(), MAX_BODY_EXCERPT_CHARS);
                assert!(excerpt.ends_with("..."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_display_mentions_status() {
        let err = ApiError::from_status(StatusCode::SERVICE_UNAVAILABLE, URL, " down \n");
        assert_eq!(err.to_string(), "Catalog host failed (503): down");
    }
}
