//! 애플리케이션 설정 구조체.
//!
//! 피드 URL, 차트 레이아웃, 단위 환산, 관리자 뷰, 에이전트 보고 설정을 정의한다.
//! `ConfigManager`를 통해 파일/환경변수에서 로드.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;
use crate::models::chart::Color;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 서버 연결 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 차트 렌더링 설정
    #[serde(default)]
    pub chart: ChartConfig,
    /// 메트릭 단위 환산 설정
    #[serde(default)]
    pub units: UnitConfig,
    /// 관리자 뷰 설정
    #[serde(default)]
    pub admin: AdminConfig,
    /// 에이전트 보고 설정
    #[serde(default)]
    pub reporter: ReporterConfig,
}

// ============================================================
// 서버 설정
// ============================================================

/// 서버 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 공개 상태 피드 URL (GET)
    #[serde(default = "default_status_url")]
    pub status_url: String,
    /// 관리자 메트릭 피드 URL (POST)
    #[serde(default = "default_admin_url")]
    pub admin_url: String,
    /// 로그 수신 엔드포인트 기본 URL (`/log`가 붙는다)
    #[serde(default = "default_log_endpoint")]
    pub log_endpoint: String,
    /// 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// `status --watch` 폴링 주기 (밀리초)
    #[serde(default = "default_status_poll_interval_ms")]
    pub status_poll_interval_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            status_url: default_status_url(),
            admin_url: default_admin_url(),
            log_endpoint: default_log_endpoint(),
            request_timeout_ms: default_request_timeout_ms(),
            status_poll_interval_ms: default_status_poll_interval_ms(),
        }
    }
}

// ============================================================
// 차트 설정
// ============================================================

/// 차트 렌더링 설정: 논리 픽셀 단위, `pixel_ratio`로 디바이스 픽셀 환산
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// 논리 너비
    #[serde(default = "default_chart_width")]
    pub width: u32,
    /// 논리 높이
    #[serde(default = "default_chart_height")]
    pub height: u32,
    /// 디스플레이 픽셀 밀도
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f64,
    /// 좌우 여백 (Y 라벨 영역)
    #[serde(default = "default_x_padding")]
    pub x_padding: f64,
    /// 라벨과 축 사이 간격
    #[serde(default = "default_label_padding")]
    pub label_padding: f64,
    /// 전체 높이 중 플롯 영역 비율 (나머지는 X 라벨)
    #[serde(default = "default_plot_height_ratio")]
    pub plot_height_ratio: f64,
    /// 가로 격자 구간 수
    #[serde(default = "default_y_steps")]
    pub y_steps: u32,
    /// X 라벨 표시 간격 (인덱스 기준)
    #[serde(default = "default_x_label_every")]
    pub x_label_every: usize,
    /// X 라벨 회전 각도 (도, 화면 기준 시계방향)
    #[serde(default = "default_x_label_angle_deg")]
    pub x_label_angle_deg: f64,
    /// 라벨 글꼴 크기 (논리 픽셀)
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// 주축 선 두께 (디바이스 픽셀)
    #[serde(default = "default_axis_width")]
    pub axis_width: f64,
    /// 격자선 두께 (디바이스 픽셀)
    #[serde(default = "default_grid_width")]
    pub grid_width: f64,
    /// 시리즈 선 두께 (디바이스 픽셀)
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    /// 주축 색상
    #[serde(default = "default_axis_color")]
    pub axis_color: Color,
    /// 격자선 색상
    #[serde(default = "default_grid_color")]
    pub grid_color: Color,
    /// 라벨 색상
    #[serde(default = "default_text_color")]
    pub text_color: Color,
    /// 배경 색상 (기본 투명)
    #[serde(default = "default_background")]
    pub background: Color,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
            height: default_chart_height(),
            pixel_ratio: default_pixel_ratio(),
            x_padding: default_x_padding(),
            label_padding: default_label_padding(),
            plot_height_ratio: default_plot_height_ratio(),
            y_steps: default_y_steps(),
            x_label_every: default_x_label_every(),
            x_label_angle_deg: default_x_label_angle_deg(),
            font_size: default_font_size(),
            axis_width: default_axis_width(),
            grid_width: default_grid_width(),
            line_width: default_line_width(),
            axis_color: default_axis_color(),
            grid_color: default_grid_color(),
            text_color: default_text_color(),
            background: default_background(),
        }
    }
}

impl ChartConfig {
    /// 디바이스 픽셀 기준 표면 크기
    pub fn surface_size(&self) -> (u32, u32) {
        (
            (self.width as f64 * self.pixel_ratio).round() as u32,
            (self.height as f64 * self.pixel_ratio).round() as u32,
        )
    }

    /// 설정값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        let (w, h) = self.surface_size();
        if w == 0 || h == 0 {
            return Err(invalid("chart.width/height", "표면 크기가 0"));
        }
        if !(self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0) {
            return Err(invalid("chart.pixel_ratio", "양수여야 함"));
        }
        if !(self.plot_height_ratio > 0.0 && self.plot_height_ratio <= 1.0) {
            return Err(invalid("chart.plot_height_ratio", "(0, 1] 범위여야 함"));
        }
        if self.y_steps == 0 {
            return Err(invalid("chart.y_steps", "1 이상이어야 함"));
        }
        if self.x_label_every == 0 {
            return Err(invalid("chart.x_label_every", "1 이상이어야 함"));
        }
        if !(self.x_padding >= 0.0 && self.x_padding * 2.0 < self.width as f64) {
            return Err(invalid("chart.x_padding", "너비의 절반 미만이어야 함"));
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(invalid("chart.font_size", "양수여야 함"));
        }
        Ok(())
    }
}

// ============================================================
// 단위 / 관리자 / 보고 설정
// ============================================================

/// 메트릭 단위 환산: used/total/free에 같은 제수 적용
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitConfig {
    /// 메모리 제수 (기본 MiB)
    #[serde(default = "default_memory_divisor")]
    pub memory_divisor: f64,
    /// 디스크 제수 (기본 GiB)
    #[serde(default = "default_disk_divisor")]
    pub disk_divisor: f64,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            memory_divisor: default_memory_divisor(),
            disk_divisor: default_disk_divisor(),
        }
    }
}

impl UnitConfig {
    /// 환산 없이 원본 바이트 그대로
    pub fn raw() -> Self {
        Self {
            memory_divisor: 1.0,
            disk_divisor: 1.0,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, divisor) in [
            ("units.memory_divisor", self.memory_divisor),
            ("units.disk_divisor", self.disk_divisor),
        ] {
            if !(divisor.is_finite() && divisor > 0.0) {
                return Err(invalid(field, "양수여야 함"));
            }
        }
        Ok(())
    }
}

/// 관리자 뷰 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// 머신 슬롯 수 (빈 슬롯은 자리표시자)
    #[serde(default = "default_machine_slots")]
    pub machine_slots: usize,
    /// 차트 PNG 출력 디렉토리
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            machine_slots: default_machine_slots(),
            output_dir: default_output_dir(),
        }
    }
}

/// 에이전트 보고 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// 이 머신의 ID
    #[serde(default)]
    pub machine_id: String,
    /// Ed25519 개인키 (PKCS#8 DER) 경로
    #[serde(default = "default_private_key_path")]
    pub private_key_path: PathBuf,
    /// 상태를 확인할 systemd 유닛
    #[serde(default = "default_service_unit")]
    pub service_unit: String,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            machine_id: String::new(),
            private_key_path: default_private_key_path(),
            service_unit: default_service_unit(),
        }
    }
}

// ============================================================
// AppConfig impl
// ============================================================

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            chart: ChartConfig::default(),
            units: UnitConfig::default(),
            admin: AdminConfig::default(),
            reporter: ReporterConfig::default(),
        }
    }

    /// 전체 설정 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        self.chart.validate()?;
        self.units.validate()?;
        if self.server.request_timeout_ms == 0 {
            return Err(invalid("server.request_timeout_ms", "1 이상이어야 함"));
        }
        if self.server.status_poll_interval_ms == 0 {
            return Err(invalid("server.status_poll_interval_ms", "1 이상이어야 함"));
        }
        Ok(())
    }

    /// 서버 요청 타임아웃을 Duration으로 반환
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }

    /// 상태 폴링 주기를 Duration으로 반환
    pub fn status_poll_interval(&self) -> Duration {
        Duration::from_millis(self.server.status_poll_interval_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

fn invalid(field: &str, message: &str) -> CoreError {
    CoreError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_status_url() -> String {
    "http://localhost:8080/public_info".to_string()
}
fn default_admin_url() -> String {
    "http://localhost:8080/main".to_string()
}
fn default_log_endpoint() -> String {
    "http://localhost:8080".to_string()
}
fn default_request_timeout_ms() -> u64 {
    10_000
}
fn default_status_poll_interval_ms() -> u64 {
    60_000
}
fn default_chart_width() -> u32 {
    600
}
fn default_chart_height() -> u32 {
    400
}
fn default_pixel_ratio() -> f64 {
    1.0
}
fn default_x_padding() -> f64 {
    60.0
}
fn default_label_padding() -> f64 {
    10.0
}
fn default_plot_height_ratio() -> f64 {
    0.6
}
fn default_y_steps() -> u32 {
    5
}
fn default_x_label_every() -> usize {
    4
}
fn default_x_label_angle_deg() -> f64 {
    60.0
}
fn default_font_size() -> f64 {
    14.0
}
fn default_axis_width() -> f64 {
    2.0
}
fn default_grid_width() -> f64 {
    0.5
}
fn default_line_width() -> f64 {
    2.0
}
fn default_axis_color() -> Color {
    Color::WHITE
}
fn default_grid_color() -> Color {
    Color::rgb(0x99, 0x99, 0x99)
}
fn default_text_color() -> Color {
    Color::WHITE
}
fn default_background() -> Color {
    Color::TRANSPARENT
}
fn default_memory_divisor() -> f64 {
    1024.0 * 1024.0
}
fn default_disk_divisor() -> f64 {
    1024.0 * 1024.0 * 1024.0
}
fn default_machine_slots() -> usize {
    10
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("beacon-charts")
}
fn default_private_key_path() -> PathBuf {
    PathBuf::from("private.der")
}
fn default_service_unit() -> String {
    "backend.service".to_string()
}
