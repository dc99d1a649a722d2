//! Shell Responses
//!
//! Every command produces one JSON object on its own line.

use serde::Serialize;
use serde_json::Value;

use crate::cache::DisposeReason;

/// An entry that left the cache while a command ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Disposal {
    pub key: String,
    pub value: String,
    pub reason: DisposeReason,
}

/// Outcome of one shell command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disposed: Vec<Disposal>,
}

impl Response {
    pub fn success(result: Value, disposed: Vec<Disposal>) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
            disposed,
        }
    }

    pub fn failure(error: impl Into<String>, disposed: Vec<Disposal>) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(error.into()),
            disposed,
        }
    }
}
