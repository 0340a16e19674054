//! Beacon 도메인 모델.
//!
//! 피드 응답, 메트릭 샘플, 차트 색상 등 crate 간 공유 데이터 구조체.

pub mod chart;
pub mod metric;
pub mod report;
pub mod status;
