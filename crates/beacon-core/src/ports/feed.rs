//! 피드 클라이언트 포트.
//!
//! 구현: `beacon-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::metric::MachineRecord;
use crate::models::report::SignedLogEntry;
use crate::models::status::StatusResponse;

/// 공개 상태 피드
#[async_trait]
pub trait StatusFeed: Send + Sync {
    /// 상태 1회 조회. 재시도 없음.
    async fn fetch_status(&self) -> Result<StatusResponse, CoreError>;
}

/// 비밀번호로 보호된 관리자 메트릭 피드
#[async_trait]
pub trait AdminFeed: Send + Sync {
    /// 머신별 메트릭 조회.
    ///
    /// 2xx가 아닌 응답은 `CoreError::Rejected`로, 본문을 그대로 담아 반환한다.
    async fn fetch_machines(&self, password: &str) -> Result<Vec<MachineRecord>, CoreError>;
}

/// 서명된 로그 수신 엔드포인트
#[async_trait]
pub trait LogSink: Send + Sync {
    /// 로그 항목 1건 전송
    async fn post_log(&self, entry: &SignedLogEntry) -> Result<(), CoreError>;
}
