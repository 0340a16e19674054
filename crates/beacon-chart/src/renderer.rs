//! 그라디언트 라인 차트 렌더러.
//!
//! 축, 가로 격자 + Y 라벨, 회전된 X 라벨, 시리즈별 그라디언트 선을 순서대로
//! tiny-skia `Pixmap`에 그린다. 입력은 빌려 쓰기만 하고, 호출마다 새 표면을 만든다.

use beacon_core::config::ChartConfig;
use beacon_core::error::CoreError;
use beacon_core::models::chart::ColorGradient;
use beacon_core::models::metric::{Series, ShapedMetric, ValueRange};
use image::RgbaImage;
use tiny_skia::Transform;
use tracing::debug;

use crate::canvas::{circle, gradient_paint, polyline, solid_paint, Surface};
use crate::text::{draw_text, Align, Baseline, TextStyle};

/// Y 라벨 세로 오프셋 (논리 픽셀)
const Y_LABEL_OFFSET: f64 = 4.0;

/// 렌더링 결과
#[derive(Debug, Clone)]
pub struct RenderedChart {
    /// 래스터 표면
    pub image: RgbaImage,
    /// 그려진 (유한한) 포인트 수: 전체 시리즈 합계
    pub points_plotted: usize,
    /// 그려진 선분 수: 전체 시리즈 합계
    pub segments_drawn: usize,
}

/// 디바이스 픽셀 기준 레이아웃
#[derive(Debug, Clone, Copy)]
struct Layout {
    width: u32,
    height: u32,
    ratio: f64,
    pad: f64,
    label_pad: f64,
    plot_bottom: f64,
    plot_width: f64,
}

impl Layout {
    fn x_at(&self, index: usize, point_count: usize) -> f64 {
        if point_count <= 1 {
            self.pad + self.plot_width / 2.0
        } else {
            self.pad + index as f64 * (self.plot_width / (point_count - 1) as f64)
        }
    }

    fn y_at(&self, value: f64, range: &ValueRange) -> f64 {
        self.plot_bottom - range.normalize(value) * self.plot_bottom
    }
}

/// 차트 렌더러
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    config: ChartConfig,
}

impl ChartRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// 셰이핑 결과 렌더링
    pub fn render_metric(&self, metric: &ShapedMetric) -> Result<RenderedChart, CoreError> {
        self.render(&metric.series, &metric.gradients, &metric.x_labels, &metric.range)
    }

    /// 시리즈 렌더링
    ///
    /// 길이가 맞지 않는 입력은 부분 렌더링 없이 `InvalidInput`.
    pub fn render(
        &self,
        series: &[Series],
        gradients: &[ColorGradient],
        x_labels: &[String],
        range: &ValueRange,
    ) -> Result<RenderedChart, CoreError> {
        self.check_inputs(series, gradients, x_labels, range)?;
        let layout = self.layout()?;
        let point_count = x_labels.len();

        let mut surface = Surface::new(layout.width, layout.height, self.config.background)?;

        self.draw_axes(&mut surface, &layout);
        self.draw_grid(&mut surface, &layout, range);
        self.draw_x_labels(&mut surface, &layout, x_labels);

        let mut points_plotted = 0;
        let mut segments_drawn = 0;
        for (values, gradient) in series.iter().zip(gradients) {
            let (points, segments) = self.draw_series(&mut surface, &layout, values, gradient, range);
            points_plotted += points;
            segments_drawn += segments;
        }

        debug!(
            "차트 렌더링: {}x{}, 시리즈 {}개, 포인트 {}개, 선분 {}개",
            layout.width,
            layout.height,
            series.len(),
            point_count,
            segments_drawn
        );

        Ok(RenderedChart {
            image: surface.into_image()?,
            points_plotted,
            segments_drawn,
        })
    }

    fn check_inputs(
        &self,
        series: &[Series],
        gradients: &[ColorGradient],
        x_labels: &[String],
        range: &ValueRange,
    ) -> Result<(), CoreError> {
        if gradients.len() != series.len() {
            return Err(CoreError::InvalidInput(format!(
                "그라디언트 {}개 != 시리즈 {}개",
                gradients.len(),
                series.len()
            )));
        }
        if let Some((k, s)) = series
            .iter()
            .enumerate()
            .find(|(_, s)| s.len() != x_labels.len())
        {
            return Err(CoreError::InvalidInput(format!(
                "시리즈 {k} 길이 {} != 라벨 {}개",
                s.len(),
                x_labels.len()
            )));
        }
        if !range.is_finite() {
            return Err(CoreError::InvalidInput(format!(
                "범위가 유한하지 않음: [{}, {}]",
                range.min(),
                range.max()
            )));
        }
        Ok(())
    }

    fn layout(&self) -> Result<Layout, CoreError> {
        self.config
            .validate()
            .map_err(|e| CoreError::InvalidInput(format!("차트 설정 오류: {e}")))?;

        let (width, height) = self.config.surface_size();
        let ratio = self.config.pixel_ratio;
        let pad = self.config.x_padding * ratio;
        Ok(Layout {
            width,
            height,
            ratio,
            pad,
            label_pad: self.config.label_padding * ratio,
            plot_bottom: self.config.plot_height_ratio * height as f64,
            plot_width: width as f64 - 2.0 * pad,
        })
    }

    /// 왼쪽 세로축 + 아래 가로축 (한 번의 스트로크)
    fn draw_axes(&self, surface: &mut Surface, layout: &Layout) {
        let (path, _) = polyline(&[
            (layout.pad, 0.0),
            (layout.pad, layout.plot_bottom),
            (layout.width as f64 - layout.pad, layout.plot_bottom),
        ]);
        if let Some(path) = path {
            surface.stroke(&path, &solid_paint(self.config.axis_color), self.config.axis_width);
        }
    }

    /// 가로 격자선 `y_steps + 1`개와 Y 라벨. 라벨은 격자선 바로 아래에 걸린다.
    fn draw_grid(&self, surface: &mut Surface, layout: &Layout, range: &ValueRange) {
        let steps = self.config.y_steps;
        let step_height = layout.plot_bottom / steps as f64;
        let grid_paint = solid_paint(self.config.grid_color);
        let style = TextStyle {
            size: self.config.font_size * layout.ratio,
            color: self.config.text_color,
            align: Align::Right,
            baseline: Baseline::Top,
            angle_deg: 0.0,
        };

        for i in 0..=steps {
            let y = layout.plot_bottom - i as f64 * step_height;
            let (path, _) = polyline(&[(layout.pad, y), (layout.width as f64 - layout.pad, y)]);
            if let Some(path) = path {
                surface.stroke(&path, &grid_paint, self.config.grid_width);
            }

            let value = range.min() + i as f64 * range.span() / steps as f64;
            draw_text(
                surface,
                &format_tick(value),
                (layout.pad - layout.label_pad, y + Y_LABEL_OFFSET * layout.ratio),
                &style,
            );
        }
    }

    /// `x_label_every`번째 인덱스마다 회전된 X 라벨
    fn draw_x_labels(&self, surface: &mut Surface, layout: &Layout, x_labels: &[String]) {
        let style = TextStyle {
            size: self.config.font_size * layout.ratio,
            color: self.config.text_color,
            align: Align::Left,
            baseline: Baseline::Bottom,
            angle_deg: self.config.x_label_angle_deg,
        };
        let y = layout.plot_bottom + layout.label_pad;
        for (i, label) in x_labels
            .iter()
            .enumerate()
            .step_by(self.config.x_label_every)
        {
            draw_text(surface, label, (layout.x_at(i, x_labels.len()), y), &style);
        }
    }

    /// 시리즈 하나를 그라디언트 선으로. 반환: (포인트 수, 선분 수)
    fn draw_series(
        &self,
        surface: &mut Surface,
        layout: &Layout,
        values: &[f64],
        gradient: &ColorGradient,
        range: &ValueRange,
    ) -> (usize, usize) {
        let count = values.len();
        let points: Vec<(f64, f64)> = values
            .iter()
            .enumerate()
            .map(|(i, v)| (layout.x_at(i, count), layout.y_at(*v, range)))
            .collect();
        let plotted = points
            .iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .count();

        // 그라디언트는 선 자체가 아니라 플롯 높이 기준 (y=0 → high, plot_bottom → low)
        let paint = gradient_paint(gradient, (0.0, 0.0), (0.0, layout.plot_bottom));

        if count == 1 {
            if let Some(dot) = circle(points[0], self.config.line_width) {
                surface.fill(&dot, &paint, Transform::identity());
            }
            return (plotted, 0);
        }

        let (path, segments) = polyline(&points);
        if let Some(path) = path {
            surface.stroke(&path, &paint, self.config.line_width);
        }
        (plotted, segments)
    }
}

/// 소수점 한 자리, 음수 0은 `0.0`
fn format_tick(value: f64) -> String {
    let text = format!("{value:.1}");
    if text == "-0.0" {
        "0.0".to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaper::{shape_metric, CYAN, PINK};
    use assert_matches::assert_matches;
    use beacon_core::config::UnitConfig;
    use beacon_core::models::chart::Color;
    use beacon_core::models::metric::{MetricSample, MetricValue};

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("t{i}")).collect()
    }

    fn renderer() -> ChartRenderer {
        ChartRenderer::new(ChartConfig::default())
    }

    /// 채널별 허용 오차 내 색상 비교 (그라디언트 보간 반올림)
    fn assert_rgb_near(actual: [u8; 4], expected: Color) {
        let expected = expected.to_array();
        for c in 0..3 {
            let diff = (actual[c] as i32 - expected[c] as i32).abs();
            assert!(diff <= 3, "채널 {c}: {actual:?} vs {expected:?}");
        }
    }

    /// `x_range` × `y_range` 영역에서 칠해진 픽셀 수
    fn lit_pixels(image: &RgbaImage, x_range: std::ops::Range<u32>, y_range: std::ops::Range<u32>) -> usize {
        let mut lit = 0;
        for y in y_range {
            for x in x_range.clone() {
                if image.get_pixel(x, y)[3] > 0 {
                    lit += 1;
                }
            }
        }
        lit
    }

    #[test]
    fn renders_declared_dimensions_deterministically() {
        let series = vec![vec![10.0, 50.0, 30.0, 90.0]];
        let range = ValueRange::new(0.0, 100.0);
        let a = renderer().render(&series, &[CYAN], &labels(4), &range).unwrap();
        let b = renderer().render(&series, &[CYAN], &labels(4), &range).unwrap();

        assert_eq!(a.image.dimensions(), (600, 400));
        assert_eq!(a.image.as_raw(), b.image.as_raw());
        assert_eq!(a.points_plotted, 4);
        assert_eq!(a.segments_drawn, 3);
    }

    #[test]
    fn pixel_ratio_scales_surface() {
        let config = ChartConfig {
            pixel_ratio: 2.0,
            ..ChartConfig::default()
        };
        let chart = ChartRenderer::new(config)
            .render(&[vec![1.0, 2.0]], &[CYAN], &labels(2), &ValueRange::new(0.0, 2.0))
            .unwrap();
        assert_eq!(chart.image.dimensions(), (1200, 800));
    }

    #[test]
    fn service_scenario_draws_three_points_two_segments() {
        let samples = vec![
            MetricSample::new(MetricValue::Text("active".into()), "t0"),
            MetricSample::new(MetricValue::Text("inactive".into()), "t1"),
            MetricSample::new(MetricValue::Text("active".into()), "t2"),
        ];
        let shaped = shape_metric("service", &samples, &UnitConfig::default())
            .unwrap()
            .unwrap();
        let chart = renderer().render_metric(&shaped).unwrap();
        assert_eq!(chart.points_plotted, 3);
        assert_eq!(chart.segments_drawn, 2);
    }

    #[test]
    fn single_point_draws_centered_dot() {
        let chart = renderer()
            .render(&[vec![50.0]], &[CYAN], &labels(1), &ValueRange::new(0.0, 100.0))
            .unwrap();
        assert_eq!(chart.points_plotted, 1);
        assert_eq!(chart.segments_drawn, 0);

        // 중앙 x=300, y = 240 - 0.5*240 = 120
        let px = chart.image.get_pixel(300, 120);
        assert_eq!(px[3], 255);
        assert_rgb_near(px.0, CYAN.at(120.5 / 240.0));
    }

    #[test]
    fn zero_points_draws_axes_only() {
        let chart = renderer()
            .render(&[], &[], &[], &ValueRange::new(0.0, 1.0))
            .unwrap();
        assert_eq!(chart.points_plotted, 0);
        assert_eq!(chart.segments_drawn, 0);
        // 왼쪽 세로축 (x=60) 은 흰색
        assert_eq!(chart.image.get_pixel(60, 100).0, [255, 255, 255, 255]);
    }

    #[test]
    fn gradient_runs_top_to_bottom_of_plot() {
        let chart = renderer()
            .render(
                &[vec![100.0, 0.0]],
                &[PINK],
                &labels(2),
                &ValueRange::new(0.0, 100.0),
            )
            .unwrap();

        // 선 시작점 근처(위)는 high, 끝점 근처(아래)는 low에 가까움
        // 선: (60, 0) → (540, 240), y = (x - 60) / 2
        let top = chart.image.get_pixel(66, 3);
        let bottom = chart.image.get_pixel(533, 236);
        assert_eq!(top[3], 255);
        assert_eq!(bottom[3], 255);
        assert_rgb_near(top.0, PINK.at(3.5 / 240.0));
        assert_rgb_near(bottom.0, PINK.at(236.5 / 240.0));
    }

    #[test]
    fn y_labels_hang_below_their_gridline() {
        let chart = renderer()
            .render(&[], &[], &[], &ValueRange::new(0.0, 1.0))
            .unwrap();

        // 라벨 열 (x < pad - label_pad = 50), 맨 아래 격자선 y=240, 앵커 y=244
        let above = lit_pixels(&chart.image, 0..50, 226..244);
        let below = lit_pixels(&chart.image, 0..50, 244..262);
        assert_eq!(above, 0);
        assert!(below > 0);
    }

    #[test]
    fn y_labels_scale_offset_with_pixel_ratio() {
        let config = ChartConfig {
            pixel_ratio: 2.0,
            ..ChartConfig::default()
        };
        let chart = ChartRenderer::new(config)
            .render(&[], &[], &[], &ValueRange::new(0.0, 1.0))
            .unwrap();

        // plot_bottom = 480, 앵커 = 480 + 4 * 2 = 488, 라벨 열 x < 120 - 20
        assert_eq!(lit_pixels(&chart.image, 0..100, 452..488), 0);
        assert!(lit_pixels(&chart.image, 0..100, 488..524) > 0);
    }

    #[test]
    fn non_finite_points_are_skipped() {
        let chart = renderer()
            .render(
                &[vec![10.0, f64::NAN, 30.0, 40.0]],
                &[CYAN],
                &labels(4),
                &ValueRange::new(0.0, 100.0),
            )
            .unwrap();
        assert_eq!(chart.points_plotted, 3);
        assert_eq!(chart.segments_drawn, 1);
    }

    #[test]
    fn mismatched_lengths_fail_fast() {
        let range = ValueRange::new(0.0, 1.0);
        assert_matches!(
            renderer().render(&[vec![1.0, 2.0]], &[], &labels(2), &range),
            Err(CoreError::InvalidInput(_))
        );
        assert_matches!(
            renderer().render(&[vec![1.0, 2.0]], &[CYAN], &labels(3), &range),
            Err(CoreError::InvalidInput(_))
        );
    }

    #[test]
    fn non_finite_range_fails() {
        assert_matches!(
            renderer().render(
                &[vec![1.0]],
                &[CYAN],
                &labels(1),
                &ValueRange::new(f64::NEG_INFINITY, 1.0)
            ),
            Err(CoreError::InvalidInput(_))
        );
    }

    #[test]
    fn zero_sized_surface_fails() {
        let config = ChartConfig {
            width: 0,
            ..ChartConfig::default()
        };
        assert_matches!(
            ChartRenderer::new(config).render(&[], &[], &[], &ValueRange::new(0.0, 1.0)),
            Err(CoreError::InvalidInput(_))
        );
    }

    #[test]
    fn background_is_transparent_by_default() {
        let chart = renderer()
            .render(&[], &[], &[], &ValueRange::new(0.0, 1.0))
            .unwrap();
        assert_eq!(chart.image.get_pixel(599, 399).0, [0, 0, 0, 0]);

        let config = ChartConfig {
            background: Color::rgb(0, 0, 0),
            ..ChartConfig::default()
        };
        let chart = ChartRenderer::new(config)
            .render(&[], &[], &[], &ValueRange::new(0.0, 1.0))
            .unwrap();
        assert_eq!(chart.image.get_pixel(599, 399).0, [0, 0, 0, 255]);
    }

    #[test]
    fn tick_format_has_one_decimal() {
        assert_eq!(format_tick(0.0), "0.0");
        assert_eq!(format_tick(-0.0), "0.0");
        assert_eq!(format_tick(-0.04), "0.0");
        assert_eq!(format_tick(20.0), "20.0");
        assert_eq!(format_tick(0.2), "0.2");
        assert_eq!(format_tick(409.6), "409.6");
    }
}
