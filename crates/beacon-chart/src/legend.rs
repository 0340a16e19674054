//! 범례 스트립.
//!
//! 항목당 한 줄: 왼쪽→오른쪽 high→low 그라디언트 견본 + 라벨.
//! 너비는 차트 표면과 같다.

use beacon_core::config::ChartConfig;
use beacon_core::error::CoreError;
use beacon_core::models::chart::LegendEntry;
use image::RgbaImage;
use tracing::debug;

use crate::canvas::{gradient_paint, Surface};
use crate::text::{draw_text, text_width, Align, Baseline, TextStyle};

/// 견본 너비 (논리 픽셀)
const SWATCH_WIDTH: f64 = 40.0;

/// 범례 이미지 렌더링
pub fn render_legend(entries: &[LegendEntry], config: &ChartConfig) -> Result<RgbaImage, CoreError> {
    if entries.is_empty() {
        return Err(CoreError::InvalidInput("범례 항목 없음".to_string()));
    }
    config
        .validate()
        .map_err(|e| CoreError::InvalidInput(format!("차트 설정 오류: {e}")))?;

    let ratio = config.pixel_ratio;
    let (width, _) = config.surface_size();
    let font = config.font_size * ratio;
    let pad = config.label_padding * ratio;
    let row = font + pad;
    let height = (row * entries.len() as f64 + pad).ceil() as u32;

    let mut surface = Surface::new(width, height, config.background)?;
    let swatch_w = (SWATCH_WIDTH * ratio).round();
    let style = TextStyle {
        size: font,
        color: config.text_color,
        align: Align::Left,
        baseline: Baseline::Top,
        angle_deg: 0.0,
    };

    for (k, entry) in entries.iter().enumerate() {
        let top = (pad + k as f64 * row).round();
        let left = pad.round();
        let paint = gradient_paint(&entry.gradient, (left, 0.0), (left + swatch_w, 0.0));
        surface.fill_rect(left, top, swatch_w, font.round(), &paint);

        let label_x = pad * 2.0 + swatch_w;
        // 표면 밖으로 나가는 라벨은 잘린다
        if label_x + text_width(&entry.label, font) > surface.width() as f64 {
            debug!("범례 라벨 잘림: {}", entry.label);
        }
        draw_text(&mut surface, &entry.label, (label_x, top), &style);
    }

    surface.into_image()
}
