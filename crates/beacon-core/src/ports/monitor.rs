//! 에이전트 측 모니터링 포트.
//!
//! 구현: `beacon-monitor` crate (systemctl, sysinfo)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::metric::MetricReading;

/// 서비스 상태 프로브 (예: `systemctl is-active`)
#[async_trait]
pub trait ServiceInspector: Send + Sync {
    /// 현재 서비스 상태 문자열 ("active", "inactive", "error" 등)
    async fn service_state(&self) -> String;
}

/// 시스템 리소스 샘플러 (CPU/메모리/디스크)
#[async_trait]
pub trait SystemSampler: Send + Sync {
    /// 현재 리소스 사용량을 메트릭 값으로 수집
    async fn sample(&self) -> Result<Vec<MetricReading>, CoreError>;
}
