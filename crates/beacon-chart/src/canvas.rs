//! tiny-skia 표면 도우미.
//!
//! `Pixmap` 위에 스트로크/채우기를 하고, 마지막에 비-프리멀티플라이
//! `RgbaImage`로 변환한다. 폴리라인은 한 경로로 스트로크해 이음매가 이중으로 칠해지지 않는다.

use beacon_core::error::CoreError;
use beacon_core::models::chart::{Color, ColorGradient};
use image::RgbaImage;
use tiny_skia::{
    FillRule, GradientStop, LinearGradient, Paint, Path, PathBuilder, Pixmap, Point, Rect,
    SpreadMode, Stroke, Transform,
};

/// 차트/범례 래스터 표면
pub(crate) struct Surface {
    pixmap: Pixmap,
}

impl Surface {
    /// 배경색으로 채운 표면. 크기가 0이면 `InvalidInput`.
    pub(crate) fn new(width: u32, height: u32, background: Color) -> Result<Self, CoreError> {
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            CoreError::InvalidInput(format!("표면 생성 실패: {width}x{height}"))
        })?;
        pixmap.fill(skia_color(background));
        Ok(Self { pixmap })
    }

    pub(crate) fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// 두께 `width`(디바이스 픽셀) 스트로크
    pub(crate) fn stroke(&mut self, path: &Path, paint: &Paint, width: f64) {
        let stroke = Stroke {
            width: width as f32,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, paint, &stroke, Transform::identity(), None);
    }

    /// 경로 채우기
    pub(crate) fn fill(&mut self, path: &Path, paint: &Paint, transform: Transform) {
        self.pixmap
            .fill_path(path, paint, FillRule::Winding, transform, None);
    }

    /// 사각형 채우기. 크기가 0이거나 유한하지 않으면 무시.
    pub(crate) fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: &Paint) {
        if let Some(rect) = Rect::from_xywh(x as f32, y as f32, w as f32, h as f32) {
            self.pixmap
                .fill_rect(rect, paint, Transform::identity(), None);
        }
    }

    /// 프리멀티플라이 해제 후 `RgbaImage`로 변환
    pub(crate) fn into_image(self) -> Result<RgbaImage, CoreError> {
        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        let mut raw = Vec::with_capacity(w as usize * h as usize * 4);
        for pixel in self.pixmap.pixels() {
            let c = pixel.demultiply();
            raw.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        RgbaImage::from_raw(w, h, raw)
            .ok_or_else(|| CoreError::Image(format!("표면 변환 실패: {w}x{h}")))
    }
}

pub(crate) fn skia_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

/// 단색 페인트
pub(crate) fn solid_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(skia_color(color));
    paint.anti_alias = true;
    paint
}

/// `start`(high) → `end`(low) 선형 그라디언트 페인트. 양 끝 밖은 끝 색으로 고정.
pub(crate) fn gradient_paint(
    gradient: &ColorGradient,
    start: (f64, f64),
    end: (f64, f64),
) -> Paint<'static> {
    let shader = LinearGradient::new(
        Point::from_xy(start.0 as f32, start.1 as f32),
        Point::from_xy(end.0 as f32, end.1 as f32),
        vec![
            GradientStop::new(0.0, skia_color(gradient.high)),
            GradientStop::new(1.0, skia_color(gradient.low)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    );

    match shader {
        Some(shader) => Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        },
        None => solid_paint(gradient.high),
    }
}

/// 점 목록 → 폴리라인 경로. 유한하지 않은 점에서 끊는다.
/// 반환: (경로, 선분 수). 선분이 하나도 없으면 경로는 `None`.
pub(crate) fn polyline(points: &[(f64, f64)]) -> (Option<Path>, usize) {
    let mut builder = PathBuilder::new();
    let mut segments = 0;
    let mut pen_down = false;

    for &(x, y) in points {
        if !(x.is_finite() && y.is_finite()) {
            pen_down = false;
            continue;
        }
        if pen_down {
            builder.line_to(x as f32, y as f32);
            segments += 1;
        } else {
            builder.move_to(x as f32, y as f32);
            pen_down = true;
        }
    }

    if segments == 0 {
        return (None, 0);
    }
    (builder.finish(), segments)
}

/// 중심 `center`, 반지름 `radius`의 원 경로
pub(crate) fn circle(center: (f64, f64), radius: f64) -> Option<Path> {
    if !(center.0.is_finite() && center.1.is_finite()) {
        return None;
    }
    PathBuilder::from_circle(center.0 as f32, center.1 as f32, radius as f32)
}
