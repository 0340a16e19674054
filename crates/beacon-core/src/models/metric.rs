//! 머신 메트릭 모델.
//!
//! 관리자 피드가 내려주는 머신별 시계열 샘플과,
//! 셰이퍼가 만들어내는 차트 입력(시리즈/범위/라벨)을 표현.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::chart::{ColorGradient, LegendEntry};

/// 퇴화 범위(max <= min) 보정값
pub const RANGE_EPSILON: f64 = 1e-6;

/// 한 줄로 그려지는 수치 시퀀스 (샘플 인덱스당 1개)
pub type Series = Vec<f64>;

/// 알려진 메트릭 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// 서비스 상태 ("active" 여부)
    Service,
    /// 코어별 CPU 사용률 (%)
    CpuPercent,
    /// 메모리 used/total/free (바이트)
    Memory,
    /// 디스크 used/total/free (바이트)
    Disk,
}

impl MetricKind {
    /// 전체 종류 목록
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Service,
        MetricKind::CpuPercent,
        MetricKind::Memory,
        MetricKind::Disk,
    ];

    /// 메트릭 이름 → 종류. 모르는 이름이면 `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "service" => Some(MetricKind::Service),
            "cpu_percent" => Some(MetricKind::CpuPercent),
            "memory" => Some(MetricKind::Memory),
            "disk" => Some(MetricKind::Disk),
            _ => None,
        }
    }

    /// 와이어 상의 메트릭 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Service => "service",
            MetricKind::CpuPercent => "cpu_percent",
            MetricKind::Memory => "memory",
            MetricKind::Disk => "disk",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 샘플 값 변형
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// 단일 수치
    Number(f64),
    /// 수치 배열 (예: 코어별 CPU)
    Numbers(Vec<f64>),
    /// 필드 맵 (예: used/total/free)
    Fields(BTreeMap<String, f64>),
    /// 문자열 (예: 서비스 상태)
    Text(String),
    /// 그 외 JSON 값
    Other(serde_json::Value),
}

impl MetricValue {
    /// 필드 맵에서 값 조회
    pub fn field(&self, name: &str) -> Option<f64> {
        match self {
            MetricValue::Fields(map) => map.get(name).copied(),
            _ => None,
        }
    }

    /// 변형 이름 (에러 메시지용)
    pub fn variant_name(&self) -> &'static str {
        match self {
            MetricValue::Number(_) => "number",
            MetricValue::Numbers(_) => "number-array",
            MetricValue::Fields(_) => "field-map",
            MetricValue::Text(_) => "text",
            MetricValue::Other(_) => "other",
        }
    }
}

/// 시계열 샘플: 와이어 형식은 `[value, timestamp]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSample", into = "RawSample")]
pub struct MetricSample {
    /// 샘플 값
    pub value: MetricValue,
    /// 타임스탬프 (문자열화된 원본)
    pub timestamp: String,
}

impl MetricSample {
    /// 새 샘플 생성
    pub fn new(value: MetricValue, timestamp: impl Into<String>) -> Self {
        Self {
            value,
            timestamp: timestamp.into(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawSample(MetricValue, serde_json::Value);

impl From<RawSample> for MetricSample {
    fn from(raw: RawSample) -> Self {
        let timestamp = match raw.1 {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        Self {
            value: raw.0,
            timestamp,
        }
    }
}

impl From<MetricSample> for RawSample {
    fn from(sample: MetricSample) -> Self {
        RawSample(sample.value, serde_json::Value::String(sample.timestamp))
    }
}

/// 관리자 피드의 머신 레코드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineRecord {
    /// 머신 ID
    pub id: String,
    /// 메트릭 이름 → 샘플 시퀀스 (이름 사전순)
    #[serde(default)]
    pub metrics: BTreeMap<String, Vec<MetricSample>>,
}

/// 한 메트릭의 모든 시리즈가 공유하는 세로 범위
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    min: f64,
    max: f64,
}

impl ValueRange {
    /// 범위 생성. `max <= min`이면 `max = min + RANGE_EPSILON`으로 보정.
    pub fn new(min: f64, max: f64) -> Self {
        let max = if max > min { max } else { min + RANGE_EPSILON };
        Self { min, max }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// max - min (항상 양수, 유한 입력 기준)
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// 값을 [0, 1] 기준으로 정규화 (범위 밖 값은 그대로 외삽)
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }
}

/// 셰이퍼 출력: 차트 하나를 그리는 데 필요한 모든 것
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedMetric {
    /// 메트릭 종류
    pub kind: MetricKind,
    /// 정렬된 시리즈 목록 (모두 샘플 수와 같은 길이)
    pub series: Vec<Series>,
    /// 시리즈별 선 그라디언트
    pub gradients: Vec<ColorGradient>,
    /// 시리즈별 범례 항목
    pub legend: Vec<LegendEntry>,
    /// 공유 세로 범위
    pub range: ValueRange,
    /// X축 라벨 (샘플 타임스탬프)
    pub x_labels: Vec<String>,
}

impl ShapedMetric {
    /// 샘플(포인트) 수
    pub fn point_count(&self) -> usize {
        self.x_labels.len()
    }
}

/// 에이전트가 수집한 단일 메트릭 값
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricReading {
    /// 메트릭 종류
    pub kind: MetricKind,
    /// 값
    pub value: MetricValue,
}
