//! # beacon-network
//!
//! HTTP 네트워크 어댑터.
//! 공개 상태 피드(GET), 비밀번호 보호 관리자 메트릭 피드(POST),
//! Ed25519 서명 로그 엔드포인트(POST `/log`)와의 통신을 담당한다.
//! 모든 요청은 1회 전송 + 타임아웃이며 재시도하지 않는다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use beacon_network::http_client::HttpFeedClient;
//! use beacon_network::reporter::{LogSigner, SignedLogReporter};
//! ```

pub mod http_client;
pub mod reporter;
