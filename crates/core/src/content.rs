//! The scraped page record and its schema check.
//!
//! `ScrapedContent` is both the value returned to callers and the JSON blob
//! written to the cache store. Values read back from the store are untrusted:
//! they go through [`validate_value`] before being decoded.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error message carried by a failed scrape.
pub const FAILED_MESSAGE: &str = "Failed to scrape URL";

/// First- and second-level headings of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headings {
    pub h1: String,
    pub h2: String,
}

/// Salient text extracted from a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedContent {
    pub url: String,
    pub title: String,
    pub headings: Headings,
    pub meta_description: String,
    pub content: String,
    /// Set only when the fetch or parse failed.
    pub error: Option<String>,
    /// Epoch milliseconds at which the value was written to the cache.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_at: Option<i64>,
}

impl ScrapedContent {
    /// Error-shaped record for `url`: every text field empty, `error` set.
    pub fn failed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            headings: Headings::default(),
            meta_description: String::new(),
            content: String::new(),
            error: Some(FAILED_MESSAGE.to_string()),
            cached_at: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Decode an untrusted JSON value, checking its shape first.
    pub fn from_value(value: Value) -> Result<Self, crate::Error> {
        validate_value(&value)?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Shape violations found by [`validate_value`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("expected a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected}")]
    WrongType { field: &'static str, expected: &'static str },
}

/// Check that `value` has the structure of a [`ScrapedContent`].
///
/// Requires string `url`, `title`, `metaDescription` and `content`, an object
/// `headings` with string `h1` and `h2`, and an `error` that is null or a
/// string. `cachedAt` may be absent or null; otherwise it must be an integer.
pub fn validate_value(value: &Value) -> Result<(), ValidationError> {
    let obj = value.as_object().ok_or(ValidationError::NotAnObject)?;

    for field in ["url", "title", "metaDescription", "content"] {
        require_string(obj.get(field), field)?;
    }

    let headings = obj
        .get("headings")
        .ok_or(ValidationError::MissingField("headings"))?
        .as_object()
        .ok_or(ValidationError::WrongType { field: "headings", expected: "an object" })?;
    require_string(headings.get("h1"), "headings.h1")?;
    require_string(headings.get("h2"), "headings.h2")?;

    match obj.get("error") {
        None => return Err(ValidationError::MissingField("error")),
        Some(Value::Null | Value::String(_)) => {}
        Some(_) => return Err(ValidationError::WrongType { field: "error", expected: "null or a string" }),
    }

    match obj.get("cachedAt") {
        None | Some(Value::Null) => {}
        Some(v) if v.is_i64() => {}
        Some(_) => return Err(ValidationError::WrongType { field: "cachedAt", expected: "an integer" }),
    }

    Ok(())
}

fn require_string(value: Option<&Value>, field: &'static str) -> Result<(), ValidationError> {
    match value {
        None => Err(ValidationError::MissingField(field)),
        Some(Value::String(_)) => Ok(()),
        Some(_) => Err(ValidationError::WrongType { field, expected: "a string" }),
    }
}
