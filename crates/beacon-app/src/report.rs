//! 에이전트 보고 명령.
//!
//! 서비스 상태를 (선택적으로 CPU/메모리/디스크 샘플도) 서명해 로그 엔드포인트로 보낸다.

use beacon_core::error::CoreError;
use beacon_core::models::metric::MetricKind;
use beacon_core::ports::monitor::{ServiceInspector, SystemSampler};
use beacon_network::reporter::SignedLogReporter;
use tracing::info;

/// 보고 결과 (키, 값)
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutcome {
    pub sent: Vec<(String, String)>,
}

/// 보고 실행
///
/// 서비스 상태를 먼저 보내고, `sampler`가 있으면 시스템 메트릭을 이어서 보낸다.
/// 첫 실패에서 중단한다.
pub async fn run_report(
    reporter: &SignedLogReporter,
    inspector: &dyn ServiceInspector,
    sampler: Option<&dyn SystemSampler>,
) -> Result<ReportOutcome, CoreError> {
    let mut sent = Vec::new();

    let state = serde_json::Value::String(inspector.service_state().await);
    let entry = reporter.report(MetricKind::Service.as_str(), &state).await?;
    sent.push((entry.key, entry.value));

    if let Some(sampler) = sampler {
        for reading in sampler.sample().await? {
            let value = serde_json::to_value(&reading.value)?;
            let entry = reporter.report(reading.kind.as_str(), &value).await?;
            sent.push((entry.key, entry.value));
        }
    }

    info!("보고 완료: {}건", sent.len());
    Ok(ReportOutcome { sent })
}
