//! # beacon-monitor
//!
//! 에이전트 측 모니터링 어댑터.
//! `systemctl is-active`로 서비스 상태를, sysinfo로 코어별 CPU/메모리/디스크 사용량을 수집한다.
//! 수집 값은 관리자 피드가 내려주는 메트릭 페이로드와 같은 형태다.

pub mod service;
pub mod system;
