//! Reply envelope of the REST store.

use serde::Deserialize;
use serde_json::Value;

/// `{"result": ...}` or `{"error": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RestReply {
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<String>,
}
