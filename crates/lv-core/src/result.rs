//! Result type alias and the upstream response envelope
//!
//! Every endpoint of the account API answers with the same envelope:
//!
//! ```json
//! { "success": true, "message": "...", "history": [ ... ] }
//! ```
//!
//! The collection lives under an endpoint-specific key (`history`, `users`,
//! `requests`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::LvError;

/// Standard Result type for ledgerview operations
pub type LvResult<T> = Result<T, LvError>;

/// Response envelope of the account API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Whether the request succeeded
    #[serde(default)]
    pub success: bool,
    /// Human readable status or error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Everything else, including the collection
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ApiResponse {
    /// Create a successful response carrying `items` under `key`
    pub fn success(key: impl Into<String>, items: Vec<Value>) -> Self {
        let mut payload = Map::new();
        payload.insert(key.into(), Value::Array(items));
        Self {
            success: true,
            message: None,
            payload,
        }
    }

    /// Create a failed response
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            payload: Map::new(),
        }
    }

    /// The collection stored under `key`, if it is an array
    pub fn collection(&self, key: &str) -> Option<&Vec<Value>> {
        self.payload.get(key).and_then(Value::as_array)
    }

    /// Convert a failed response into a source error
    pub fn into_result(self, source_name: &str) -> LvResult<Self> {
        if self.success {
            Ok(self)
        } else {
            let message = self
                .message
                .unwrap_or_else(|| "request failed".to_string());
            Err(LvError::upstream(source_name, message))
        }
    }
}
