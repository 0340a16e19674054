//! # beacon-app
//!
//! Beacon 상태 대시보드 앱 레이어.
//! 상태 뷰(공개 상태 피드), 관리자 뷰(머신별 메트릭 차트),
//! 에이전트 보고 명령, 라이프사이클 관리를 담당한다. 바이너리 진입점은 `main.rs`.

pub mod admin_view;
pub mod lifecycle;
pub mod report;
pub mod status_view;
