//! Input normalization - turns loosely typed request input into trimmed fields.
//!
//! Nothing here raises: absent, non-string, or blank values all become `None`,
//! and the caller decides which of those are fatal.

use std::collections::HashMap;

use serde_json::Value;

use crate::domain::{PostId, parse_calendar_date};
use crate::error::{DomainError, FieldError};

/// Keys a post payload may carry.
pub const POST_FIELDS: [&str; 4] = ["title", "content", "author", "date"];

/// Untyped input: an optional structured body plus query parameters.
///
/// Body values win; a body value that is null, false, zero, or empty falls
/// through to the query parameter of the same name.
#[derive(Debug, Clone, Default)]
pub struct FieldSource {
    body: Option<Value>,
    query: HashMap<String, String>,
}

impl FieldSource {
    pub fn new(body: Option<Value>, query: HashMap<String, String>) -> Self {
        Self { body, query }
    }

    pub fn from_body(body: Value) -> Self {
        Self::new(Some(body), HashMap::new())
    }

    pub fn from_query(query: HashMap<String, String>) -> Self {
        Self::new(None, query)
    }

    /// Trimmed value for `key`, body first, then query.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.body_value(key) {
            Some(value) => trimmed(value.as_str()),
            None => self.query_text(key),
        }
    }

    /// Trimmed value for `key`, looking only at the body.
    pub fn body_text(&self, key: &str) -> Option<String> {
        self.body_value(key).and_then(|v| trimmed(v.as_str()))
    }

    /// Trimmed value for `key`, looking only at query parameters.
    pub fn query_text(&self, key: &str) -> Option<String> {
        trimmed(self.query.get(key).map(String::as_str))
    }

    fn body_value(&self, key: &str) -> Option<&Value> {
        self.body
            .as_ref()
            .and_then(|body| body.get(key))
            .filter(|value| is_truthy(value))
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn trimmed(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// The four editable post fields, each either present and trimmed or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFields {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
}

impl PostFields {
    pub fn from_source(source: &FieldSource) -> Self {
        Self {
            title: source.text("title"),
            content: source.text("content"),
            author: source.text("author"),
            date: source.text("date"),
        }
    }

    /// True when none of the four fields was supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.author.is_none()
            && self.date.is_none()
    }

    /// Names of required fields that are absent, in declaration order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let present = [
            self.title.is_some(),
            self.content.is_some(),
            self.author.is_some(),
            self.date.is_some(),
        ];

        POST_FIELDS
            .iter()
            .zip(present)
            .filter(|(_, present)| !present)
            .map(|(name, _)| *name)
            .collect()
    }

    /// Problem with a supplied `date`, if it is not a strict `YYYY-MM-DD` day.
    pub fn date_error(&self) -> Option<FieldError> {
        let date = self.date.as_deref()?;
        match parse_calendar_date(date) {
            Some(_) => None,
            None => Some(invalid_date(date)),
        }
    }

    /// Every missing or malformed field, for the create path.
    pub fn creation_errors(&self) -> Vec<FieldError> {
        let mut errors: Vec<FieldError> = self
            .missing_required()
            .into_iter()
            .map(FieldError::missing)
            .collect();
        errors.extend(self.date_error());
        errors
    }
}

/// Sort request as given by the caller, not yet checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortQuery {
    pub sort: Option<String>,
    pub direction: Option<String>,
}

impl SortQuery {
    pub fn new(sort: Option<&str>, direction: Option<&str>) -> Self {
        Self {
            sort: trimmed(sort),
            direction: trimmed(direction),
        }
    }

    /// Sorting is only driven by query parameters.
    pub fn from_source(source: &FieldSource) -> Self {
        Self {
            sort: source.query_text("sort"),
            direction: source.query_text("direction"),
        }
    }
}

/// Comment text from the request body.
pub fn comment_text(source: &FieldSource) -> Option<String> {
    source.body_text("comment")
}

/// Parse a path segment into a post id.
pub fn parse_post_id(raw: &str) -> Result<PostId, DomainError> {
    match raw.trim().parse::<PostId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(DomainError::invalid(
            "id",
            format!("Post ID must be a positive integer, got '{raw}'"),
        )),
    }
}

fn invalid_date(raw: &str) -> FieldError {
    FieldError::new("date", format!("invalid date '{raw}', expected YYYY-MM-DD"))
}
