//! 에이전트 로그 보고 모델.

use serde::{Deserialize, Serialize};

/// 서명된 로그 항목: 서명 대상은 `key + value`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedLogEntry {
    /// 머신 ID
    pub id: String,
    /// 메트릭 이름 (예: "service")
    pub key: String,
    /// 메트릭 값 (문자열 또는 JSON 문자열)
    pub value: String,
    /// Ed25519 서명 (Base64)
    pub signature: String,
}

impl SignedLogEntry {
    /// 서명 대상 메시지
    pub fn message(key: &str, value: &str) -> String {
        format!("{key}{value}")
    }
}
