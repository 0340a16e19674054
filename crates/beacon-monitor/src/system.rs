//! 시스템 리소스 샘플러.
//!
//! `SystemSampler` 포트 구현. sysinfo 기반 코어별 CPU / 메모리 / 디스크 수집.
//! 결과는 `cpu_percent`(배열), `memory`·`disk`(`{used,total,free}` 바이트) 메트릭 값.

use async_trait::async_trait;
use beacon_core::error::CoreError;
use beacon_core::models::metric::{MetricKind, MetricReading, MetricValue};
use beacon_core::ports::monitor::SystemSampler;
use std::collections::BTreeMap;
use std::sync::Mutex;
use sysinfo::{Disks, System, MINIMUM_CPU_UPDATE_INTERVAL};
use tracing::debug;

/// sysinfo 기반 샘플러: `SystemSampler` 포트 구현
pub struct SysInfoSampler {
    sys: Mutex<System>,
}

impl SysInfoSampler {
    /// 새 샘플러 생성
    pub fn new() -> Self {
        Self {
            sys: Mutex::new(System::new_all()),
        }
    }

    fn refresh_cpu(&self) -> Result<(), CoreError> {
        let mut sys = self
            .sys
            .lock()
            .map_err(|e| CoreError::Internal(format!("시스템 잠금 실패: {e}")))?;
        sys.refresh_cpu_usage();
        Ok(())
    }
}

impl Default for SysInfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// used/total/free 필드 맵
fn capacity(used: u64, total: u64, free: u64) -> MetricValue {
    MetricValue::Fields(BTreeMap::from([
        ("used".to_string(), used as f64),
        ("total".to_string(), total as f64),
        ("free".to_string(), free as f64),
    ]))
}

#[async_trait]
impl SystemSampler for SysInfoSampler {
    async fn sample(&self) -> Result<Vec<MetricReading>, CoreError> {
        // CPU 사용률은 두 번의 갱신 사이 차이로 계산된다
        self.refresh_cpu()?;
        tokio::time::sleep(MINIMUM_CPU_UPDATE_INTERVAL).await;

        let (cores, memory) = {
            let mut sys = self
                .sys
                .lock()
                .map_err(|e| CoreError::Internal(format!("시스템 잠금 실패: {e}")))?;
            sys.refresh_cpu_usage();
            sys.refresh_memory();

            let cores: Vec<f64> = sys.cpus().iter().map(|c| c.cpu_usage() as f64).collect();
            let total = sys.total_memory();
            let used = sys.used_memory();
            (cores, capacity(used, total, total.saturating_sub(used)))
        };

        // 디스크 합계
        let disks = Disks::new_with_refreshed_list();
        let (disk_total, disk_free) = disks.list().iter().fold((0u64, 0u64), |(total, free), d| {
            (total + d.total_space(), free + d.available_space())
        });
        let disk = capacity(disk_total.saturating_sub(disk_free), disk_total, disk_free);

        debug!(
            "시스템 샘플: 코어 {}개, 메모리 {:?}/{:?}, 디스크 {}/{} bytes",
            cores.len(),
            memory.field("used"),
            memory.field("total"),
            disk_total.saturating_sub(disk_free),
            disk_total
        );

        Ok(vec![
            MetricReading {
                kind: MetricKind::CpuPercent,
                value: MetricValue::Numbers(cores),
            },
            MetricReading {
                kind: MetricKind::Memory,
                value: memory,
            },
            MetricReading {
                kind: MetricKind::Disk,
                value: disk,
            },
        ])
    }
}
