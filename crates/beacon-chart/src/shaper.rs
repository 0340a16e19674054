//! 메트릭 셰이퍼.
//!
//! 메트릭 종류별 핸들러가 원시 샘플 시퀀스를 차트 입력(`ShapedMetric`)으로 변환한다.
//! 빈 시퀀스나 모르는 메트릭은 에러가 아니라 `Ok(None)`: 호출자가 렌더링을 건너뛴다.

use beacon_core::config::UnitConfig;
use beacon_core::error::CoreError;
use beacon_core::models::chart::{Color, ColorGradient, LegendEntry};
use beacon_core::models::metric::{
    MetricKind, MetricSample, MetricValue, Series, ShapedMetric, ValueRange,
};
use tracing::debug;

/// service / cpu 선 색상
pub const CYAN: ColorGradient =
    ColorGradient::new(Color::rgb(0xaa, 0xee, 0xff), Color::rgb(0x00, 0xdd, 0xff));
/// memory/disk `used` 선 색상
pub const PINK: ColorGradient =
    ColorGradient::new(Color::rgb(0xff, 0xaa, 0xee), Color::rgb(0xff, 0x00, 0xdd));
/// memory/disk `free` 선 색상
pub const YELLOW: ColorGradient =
    ColorGradient::new(Color::rgb(0xee, 0xff, 0xaa), Color::rgb(0xff, 0xdd, 0x00));

/// used/total/free 시리즈 순서와 색상
const CAPACITY_FIELDS: [(&str, ColorGradient); 3] =
    [("used", PINK), ("total", CYAN), ("free", YELLOW)];

/// 서비스 활성 상태 문자열
const SERVICE_ACTIVE: &str = "active";

/// 메트릭 이름으로 셰이핑. 모르는 이름이면 `Ok(None)`.
pub fn shape_metric(
    name: &str,
    samples: &[MetricSample],
    units: &UnitConfig,
) -> Result<Option<ShapedMetric>, CoreError> {
    match MetricKind::parse(name) {
        Some(kind) => shape(kind, samples, units),
        None => {
            debug!("미지원 메트릭 무시: {name}");
            Ok(None)
        }
    }
}

/// 메트릭 종류별 셰이핑
pub fn shape(
    kind: MetricKind,
    samples: &[MetricSample],
    units: &UnitConfig,
) -> Result<Option<ShapedMetric>, CoreError> {
    if samples.is_empty() {
        debug!("{kind}: 샘플 없음, 차트 생략");
        return Ok(None);
    }

    let shaped = match kind {
        MetricKind::Service => shape_service(samples),
        MetricKind::CpuPercent => shape_cpu(samples)?,
        MetricKind::Memory => shape_capacity(kind, samples, units.memory_divisor)?,
        MetricKind::Disk => shape_capacity(kind, samples, units.disk_divisor)?,
    };

    debug!(
        "{kind}: 시리즈 {}개 × 포인트 {}개, 범위 [{}, {}]",
        shaped.series.len(),
        shaped.point_count(),
        shaped.range.min(),
        shaped.range.max()
    );
    Ok(Some(shaped))
}

/// 서비스 상태 → 0/1 단일 시리즈
fn shape_service(samples: &[MetricSample]) -> ShapedMetric {
    let series: Series = samples
        .iter()
        .map(|s| match &s.value {
            MetricValue::Text(state) if state == SERVICE_ACTIVE => 1.0,
            _ => 0.0,
        })
        .collect();

    ShapedMetric {
        kind: MetricKind::Service,
        series: vec![series],
        gradients: vec![CYAN],
        legend: vec![LegendEntry::new(SERVICE_ACTIVE, CYAN)],
        range: ValueRange::new(0.0, 1.0),
        x_labels: x_labels(samples),
    }
}

/// 코어별 CPU 사용률 → 코어당 시리즈 1개 (첫 샘플 배열 길이 기준)
fn shape_cpu(samples: &[MetricSample]) -> Result<ShapedMetric, CoreError> {
    let first = cpu_values(&samples[0])?;
    let cores = first.len();
    if cores == 0 {
        return Err(CoreError::InvalidInput(
            "cpu_percent: 첫 샘플의 코어 배열이 비어 있음".to_string(),
        ));
    }

    let mut series: Vec<Series> = vec![Vec::with_capacity(samples.len()); cores];
    for (index, sample) in samples.iter().enumerate() {
        let values = cpu_values(sample)?;
        if values.len() < cores {
            return Err(CoreError::InvalidInput(format!(
                "cpu_percent: 샘플 {index}의 코어 수 {}개 < {cores}개",
                values.len()
            )));
        }
        // N개를 넘는 항목은 무시
        for (core, line) in series.iter_mut().enumerate() {
            line.push(values[core]);
        }
    }

    Ok(ShapedMetric {
        kind: MetricKind::CpuPercent,
        series,
        gradients: vec![CYAN; cores],
        legend: (0..cores)
            .map(|i| LegendEntry::new(format!("CPU {i}"), CYAN))
            .collect(),
        range: ValueRange::new(0.0, 100.0),
        x_labels: x_labels(samples),
    })
}

fn cpu_values(sample: &MetricSample) -> Result<&[f64], CoreError> {
    match &sample.value {
        MetricValue::Numbers(values) => Ok(values),
        other => Err(CoreError::InvalidInput(format!(
            "cpu_percent: number-array 필요, {} 수신",
            other.variant_name()
        ))),
    }
}

/// used/total/free → 3개 시리즈. 범위 상한은 첫 샘플의 total.
fn shape_capacity(
    kind: MetricKind,
    samples: &[MetricSample],
    divisor: f64,
) -> Result<ShapedMetric, CoreError> {
    if !(divisor.is_finite() && divisor > 0.0) {
        return Err(CoreError::Config(format!(
            "{kind}: 단위 제수는 양수여야 함 ({divisor})"
        )));
    }

    let mut series: Vec<Series> = vec![Vec::with_capacity(samples.len()); CAPACITY_FIELDS.len()];
    for (index, sample) in samples.iter().enumerate() {
        for ((field, _), line) in CAPACITY_FIELDS.iter().zip(series.iter_mut()) {
            let raw = sample.value.field(field).ok_or_else(|| {
                CoreError::InvalidInput(format!(
                    "{kind}: 샘플 {index}에 '{field}' 필드 없음 ({})",
                    sample.value.variant_name()
                ))
            })?;
            line.push(raw / divisor);
        }
    }

    // total 시리즈의 첫 값
    let max = series[1][0];

    Ok(ShapedMetric {
        kind,
        series,
        gradients: CAPACITY_FIELDS.iter().map(|(_, g)| *g).collect(),
        legend: CAPACITY_FIELDS
            .iter()
            .map(|(field, g)| LegendEntry::new(*field, *g))
            .collect(),
        range: ValueRange::new(0.0, max),
        x_labels: x_labels(samples),
    })
}

fn x_labels(samples: &[MetricSample]) -> Vec<String> {
    samples.iter().map(|s| s.timestamp.clone()).collect()
}
