//! Response Envelope
//!
//! The marketplace front end surfaces every call as `{ data?, error?, message? }`.
//! Non-2xx bodies carry a FastAPI-style `detail`, which is either a string or a
//! list of `{ loc, msg, type }` validation entries.

use serde::{Deserialize, Serialize};

/// Fallback when a failure body carries no usable detail.
pub const GENERIC_ERROR: &str = "An error occurred";

/// Normalized outcome of one API call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn failed(error: impl Into<String>, message: Option<String>) -> Self {
        Self {
            data: None,
            error: Some(error.into()),
            message,
        }
    }

    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Convert back into a `Result`, keeping the error text.
    pub fn into_result(self) -> Result<Option<T>, String> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.data),
        }
    }
}

/// Body of a non-2xx response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Parse a raw body. Anything that is not JSON yields an empty body.
    pub fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    /// Human-readable error text from `detail`.
    pub fn detail_text(&self) -> String {
        match &self.detail {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(serde_json::Value::Array(entries)) => {
                let msgs: Vec<&str> = entries
                    .iter()
                    .filter_map(|e| e.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if msgs.is_empty() {
                    GENERIC_ERROR.to_string()
                } else {
                    msgs.join("; ")
                }
            }
            _ => GENERIC_ERROR.to_string(),
        }
    }
}
