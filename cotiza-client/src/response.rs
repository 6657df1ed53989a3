//! Wire envelope shared by every API endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Unified API response structure
///
/// - `code`: error code (0 for success)
/// - `message`: human-readable message
/// - `data`: response payload (on success)
/// - `details`: additional error details (on failure)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: Some(0),
            message: "OK".to_string(),
            data: Some(data),
            details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_decodes_without_optional_fields() {
        let resp: ApiResponse<i32> =
            serde_json::from_str(r#"{"message":"OK","data":5}"#).unwrap();
        assert_eq!(resp.data, Some(5));
        assert!(resp.code.is_none());
    }

    #[test]
    fn test_error_envelope_carries_message() {
        let resp: ApiResponse<i32> =
            serde_json::from_str(r#"{"code":422,"message":"RUT inválido"}"#).unwrap();
        assert_eq!(resp.message, "RUT inválido");
        assert!(resp.data.is_none());
    }
}
