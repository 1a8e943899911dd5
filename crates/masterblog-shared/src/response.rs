//! Error response bodies (RFC 7807 problem details).

use serde::{Deserialize, Serialize};

/// Stable problem type for rejected input.
pub const VALIDATION_ERROR_TYPE: &str = "/errors/validation";
/// Stable problem type for an unknown post id.
pub const NOT_FOUND_ERROR_TYPE: &str = "/errors/not-found";
/// Stable problem type for a change that could not be made durable.
pub const PERSISTENCE_ERROR_TYPE: &str = "/errors/persistence";

/// RFC 7807 Problem Details for HTTP APIs.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// A short, human-readable summary of the problem type.
    pub title: String,

    /// The HTTP status code.
    pub status: u16,

    /// A human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Offending input fields, for validation problems.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
            fields: Vec::new(),
        }
    }

    pub fn with_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = error_type.into();
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    pub fn validation(detail: impl Into<String>, fields: Vec<String>) -> Self {
        Self::new(400, "Bad Request")
            .with_type(VALIDATION_ERROR_TYPE)
            .with_detail(detail)
            .with_fields(fields)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found")
            .with_type(NOT_FOUND_ERROR_TYPE)
            .with_detail(detail)
    }

    pub fn persistence_failure() -> Self {
        Self::new(500, "Internal Server Error")
            .with_type(PERSISTENCE_ERROR_TYPE)
            .with_detail("The change could not be saved")
    }
}
