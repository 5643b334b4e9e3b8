//! Problem details bodies returned on every non-2xx response (RFC 7807).

use serde::{Deserialize, Serialize};

/// Problem type used for all errors; the status carries the meaning.
const BLANK_TYPE: &str = "about:blank";

/// RFC 7807 problem details.
///
/// The `title` is fixed per status, so the gate's rejection always reads
/// `"Forbidden"`. Per-occurrence data goes in `detail`, `instance` and
/// `request_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Path of the request that failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// A body for `status` with its canonical title.
    pub fn from_status(status: u16) -> Self {
        let title = match status {
            400 => "Bad Request",
            403 => "Forbidden",
            404 => "Not Found",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ if status >= 500 => "Server Error",
            _ => "Client Error",
        };
        Self {
            error_type: BLANK_TYPE.to_string(),
            title: title.to_string(),
            status,
            detail: None,
            instance: None,
            request_id: None,
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::from_status(400).with_detail(detail)
    }

    /// The fixed body returned when the origin gate refuses a request.
    pub fn forbidden() -> Self {
        Self::from_status(403)
    }

    /// Storage failures; details are logged, never echoed.
    pub fn internal_error() -> Self {
        Self::from_status(500)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_instance(mut self, path: impl Into<String>) -> Self {
        self.instance = Some(path.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}
