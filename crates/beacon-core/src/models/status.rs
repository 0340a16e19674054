//! 서비스 상태 모델.
//!
//! 공개 상태 피드 응답과 대시보드 표시 상태.

use serde::{Deserialize, Serialize};

/// 상태 피드 응답 (`{status, since?}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// "ok"면 정상, 그 외는 저하
    pub status: String,
    /// 상태 기준 시각 (선택)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
}

/// 대시보드 상태 표시
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceHealth {
    /// 정상 운영
    Online,
    /// 서비스 저하 (응답은 왔지만 "ok" 아님)
    Degraded,
    /// 상태 조회 자체 실패
    Error,
}

impl ServiceHealth {
    /// 피드 응답 → 상태. `status == "ok"`만 정상으로 본다.
    pub fn from_response(response: &StatusResponse) -> Self {
        if response.status == "ok" {
            ServiceHealth::Online
        } else {
            ServiceHealth::Degraded
        }
    }
}
