//! 8×8 비트맵 글꼴 텍스트.
//!
//! 글리프는 `font8x8::BASIC_FONTS`에서 가져온다. 켜진 비트 구간을 사각형 경로로 모아
//! 한 번에 채우고, 회전은 앵커 기준 `Transform::from_rotate_at`으로 처리한다.

use beacon_core::models::chart::Color;
use font8x8::{UnicodeFonts, BASIC_FONTS};
use tiny_skia::{PathBuilder, Rect, Transform};

use crate::canvas::{solid_paint, Surface};

/// 글리프 한 변의 비트 수
const GLYPH_BITS: usize = 8;

/// 가로 정렬 (앵커 기준)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Right,
}

/// 세로 기준선 (앵커 기준)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Baseline {
    /// 텍스트가 앵커 아래로 걸린다
    Top,
    /// 텍스트가 앵커 위에서 끝난다
    Bottom,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TextStyle {
    /// 글자 높이 (디바이스 픽셀)
    pub size: f64,
    pub color: Color,
    pub align: Align,
    pub baseline: Baseline,
    /// 회전 각도 (도, 화면 기준 시계방향)
    pub angle_deg: f64,
}

/// 텍스트 너비 (디바이스 픽셀)
pub(crate) fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// 앵커 `(x, y)`에 텍스트를 그린다
pub(crate) fn draw_text(surface: &mut Surface, text: &str, anchor: (f64, f64), style: &TextStyle) {
    if text.is_empty() || !(style.size.is_finite() && style.size > 0.0) {
        return;
    }

    let cell = style.size as f32;
    let scale = cell / GLYPH_BITS as f32;
    let (ax, ay) = (anchor.0 as f32, anchor.1 as f32);
    let left = match style.align {
        Align::Left => ax,
        Align::Right => ax - text_width(text, style.size) as f32,
    };
    let top = match style.baseline {
        Baseline::Top => ay,
        Baseline::Bottom => ay - cell,
    };

    let mut builder = PathBuilder::new();
    for (index, c) in text.chars().enumerate() {
        let origin_x = left + index as f32 * cell;
        for (gy, row) in glyph(c).iter().enumerate() {
            // 비트 0이 가장 왼쪽 픽셀, 연속 구간은 사각형 하나로
            let mut gx = 0;
            while gx < GLYPH_BITS {
                if row & (1 << gx) == 0 {
                    gx += 1;
                    continue;
                }
                let start = gx;
                while gx < GLYPH_BITS && row & (1 << gx) != 0 {
                    gx += 1;
                }
                if let Some(rect) = Rect::from_xywh(
                    origin_x + start as f32 * scale,
                    top + gy as f32 * scale,
                    (gx - start) as f32 * scale,
                    scale,
                ) {
                    builder.push_rect(rect);
                }
            }
        }
    }

    let Some(path) = builder.finish() else {
        return;
    };
    let mut paint = solid_paint(style.color);
    // 회전 없는 라벨은 픽셀 격자에 맞춰 선명하게
    paint.anti_alias = style.angle_deg != 0.0;
    let transform = Transform::from_rotate_at(style.angle_deg as f32, ax, ay);
    surface.fill(&path, &paint, transform);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(align: Align, baseline: Baseline, angle_deg: f64) -> TextStyle {
        TextStyle {
            size: 8.0,
            color: Color::WHITE,
            align,
            baseline,
            angle_deg,
        }
    }

    fn lit_bounds(surface: Surface) -> Option<(u32, u32, u32, u32)> {
        let image = surface.into_image().unwrap();
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, p) in image.enumerate_pixels() {
            if p[3] > 0 {
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((a, b, c, d)) => (a.min(x), b.min(y), c.max(x), d.max(y)),
                });
            }
        }
        bounds
    }

    fn surface(w: u32, h: u32) -> Surface {
        Surface::new(w, h, Color::TRANSPARENT).unwrap()
    }

    #[test]
    fn left_top_text_hangs_below_anchor() {
        let mut s = surface(64, 32);
        draw_text(&mut s, "H", (10.0, 5.0), &style(Align::Left, Baseline::Top, 0.0));
        let (x0, y0, x1, y1) = lit_bounds(s).unwrap();
        assert!(x0 >= 10 && x1 < 18);
        assert!(y0 >= 5 && y1 < 13);
    }

    #[test]
    fn right_bottom_text_ends_at_anchor() {
        let mut s = surface(64, 32);
        draw_text(&mut s, "10.0", (50.0, 20.0), &style(Align::Right, Baseline::Bottom, 0.0));
        let (x0, y0, x1, y1) = lit_bounds(s).unwrap();
        assert!(x1 < 50 && x0 >= 18);
        assert!(y1 < 20 && y0 >= 12);
    }

    #[test]
    fn rotated_text_extends_down_right() {
        let mut s = surface(64, 64);
        draw_text(&mut s, "TTTT", (10.0, 10.0), &style(Align::Left, Baseline::Bottom, 60.0));
        let (_, _, x1, y1) = lit_bounds(s).unwrap();
        assert!(y1 > 30, "60도 회전 텍스트는 아래로 뻗어야 함: {y1}");
        assert!(x1 > 15);
    }

    #[test]
    fn clipped_text_does_not_panic() {
        let mut s = surface(8, 8);
        draw_text(&mut s, "overflow", (-20.0, -3.0), &style(Align::Left, Baseline::Top, 17.0));
        draw_text(&mut s, "", (0.0, 0.0), &style(Align::Left, Baseline::Top, 0.0));
    }

    #[test]
    fn width_is_per_char() {
        assert_eq!(text_width("0.0", 14.0), 42.0);
    }
}
