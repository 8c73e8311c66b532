//! Error record - một dòng JSONL

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bản ghi lỗi nội bộ. Chi tiết chỉ dành cho admin, không trả về client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// `ERR_000001`
    pub error_id: String,
    pub timestamp: DateTime<Utc>,
    /// Loại lỗi, ví dụ `database`, `internal`
    pub error_type: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl ErrorRecord {
    pub fn new(error_id: &str, error_type: &str, message: &str) -> Self {
        Self {
            error_id: error_id.to_string(),
            timestamp: Utc::now(),
            error_type: error_type.to_string(),
            message: message.to_string(),
            user_id: None,
            path: None,
            method: None,
            client_ip: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Số thứ tự trong id: `ERR_000123` -> 123
    pub fn sequence(&self) -> Option<u64> {
        self.error_id.strip_prefix("ERR_")?.parse().ok()
    }

    pub fn date(&self) -> String {
        self.timestamp.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_parse() {
        assert_eq!(ErrorRecord::new("ERR_000042", "internal", "x").sequence(), Some(42));
        assert_eq!(ErrorRecord::new("EVT_000042", "internal", "x").sequence(), None);
    }

    #[test]
    fn test_optional_fields_omitted() {
        let json = serde_json::to_string(&ErrorRecord::new("ERR_000001", "internal", "boom")).unwrap();
        assert!(!json.contains("user_id"));
        assert!(!json.contains("metadata"));
        let back: ErrorRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.error_id, "ERR_000001");
    }
}
