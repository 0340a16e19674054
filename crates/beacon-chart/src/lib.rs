//! # beacon-chart
//!
//! 메트릭 셰이핑과 차트 래스터 렌더링 크레이트.
//! 머신 메트릭 샘플을 정규화된 시리즈로 변환하고(`shaper`),
//! 축/격자/라벨/그라디언트 라인을 `RgbaImage`에 그린다(`renderer`).
//! 네트워크나 비동기 코드는 없다.

mod canvas;
pub mod encoder;
pub mod legend;
pub mod renderer;
pub mod shaper;
mod text;

pub use renderer::{ChartRenderer, RenderedChart};
pub use shaper::shape_metric;
