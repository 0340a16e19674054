//! 포트 인터페이스 (trait).
//!
//! 각 어댑터 crate가 이 trait들을 구현하며,
//! `beacon-app`에서 `Arc<dyn T>`로 와이어링한다.

pub mod feed;
pub mod monitor;
