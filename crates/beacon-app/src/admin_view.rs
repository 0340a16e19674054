//! 관리자 뷰.
//!
//! 비밀번호로 머신별 메트릭을 1회 조회하고, 머신 × 메트릭마다
//! 셰이핑 → 차트 렌더링 → 범례 렌더링을 거쳐 패널을 만든다.
//! 한 메트릭의 실패는 그 패널에만 기록되고 나머지는 계속 진행한다.

use beacon_chart::encoder::{encode_png_base64, save_png};
use beacon_chart::legend::render_legend;
use beacon_chart::{shape_metric, ChartRenderer};
use beacon_core::config::AppConfig;
use beacon_core::error::CoreError;
use beacon_core::models::metric::{MachineRecord, MetricKind, MetricSample};
use beacon_core::ports::feed::AdminFeed;
use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 빈 슬롯의 머신 ID 자리표시자
const VACANT_ID: &str = "XX";

/// 관리자 데이터 로드 실패 문구
pub fn load_failure_message(error: &CoreError) -> String {
    format!("Failed to load admin data: {error}")
}

/// 저장된 관리자 피드 페이로드(JSON) 로드
pub fn load_payload(path: &Path) -> Result<Vec<MachineRecord>, CoreError> {
    let content = fs::read_to_string(path)?;
    let machines: Vec<MachineRecord> = serde_json::from_str(&content)?;
    debug!("페이로드 로드: {} (머신 {}대)", path.display(), machines.len());
    Ok(machines)
}

/// 인증된 관리자 세션: 조회한 머신 목록을 뷰 수명 동안만 보관한다
#[derive(Debug)]
pub struct AdminSession {
    machines: Vec<MachineRecord>,
}

impl AdminSession {
    /// 비밀번호로 1회 조회. 비밀번호는 보관하지 않는다.
    pub async fn unlock(feed: &dyn AdminFeed, password: &str) -> Result<Self, CoreError> {
        if password.is_empty() {
            return Err(CoreError::Auth("비밀번호가 비어 있음".to_string()));
        }

        let machines = feed.fetch_machines(password).await?;
        info!("관리자 세션 시작: 머신 {}대", machines.len());
        Ok(Self { machines })
    }

    /// 이미 받은 페이로드로 세션 구성 (오프라인 렌더링)
    pub fn from_machines(machines: Vec<MachineRecord>) -> Self {
        Self { machines }
    }

    pub fn machines(&self) -> &[MachineRecord] {
        &self.machines
    }

    /// 슬롯 + 패널 구성
    pub fn into_view(self, config: &AppConfig) -> AdminView {
        AdminView::build(self.machines, config)
    }
}

/// 머신 슬롯
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineSlot {
    /// 실제 머신
    Occupied { id: String },
    /// 빈 자리
    Vacant,
}

impl MachineSlot {
    /// 슬롯 제목 (`B-{id}` / `B-XX`)
    pub fn title(&self) -> String {
        match self {
            MachineSlot::Occupied { id } => format!("B-{id}"),
            MachineSlot::Vacant => format!("B-{VACANT_ID}"),
        }
    }

    /// 슬롯 상태 문구
    pub fn status(&self) -> &'static str {
        match self {
            MachineSlot::Occupied { .. } => "OK",
            MachineSlot::Vacant => "SLOT",
        }
    }

    pub fn is_vacant(&self) -> bool {
        matches!(self, MachineSlot::Vacant)
    }
}

/// 머신 목록 → 슬롯. 머신이 슬롯 수보다 적으면 나머지는 빈 슬롯.
pub fn machine_slots(machines: &[MachineRecord], slot_count: usize) -> Vec<MachineSlot> {
    let vacant = slot_count.saturating_sub(machines.len());
    machines
        .iter()
        .map(|m| MachineSlot::Occupied { id: m.id.clone() })
        .chain(std::iter::repeat(MachineSlot::Vacant).take(vacant))
        .collect()
}

/// 렌더링된 메트릭 패널 (차트 + 범례)
#[derive(Debug, Clone)]
pub struct MetricPanel {
    pub machine_id: String,
    pub metric: MetricKind,
    pub chart: RgbaImage,
    pub legend: RgbaImage,
    pub points_plotted: usize,
    pub segments_drawn: usize,
}

impl MetricPanel {
    /// 파일 이름 기준 (`<machine>-<metric>`). 경로 구분자 등은 `_`로 치환.
    pub fn file_stem(&self) -> String {
        let machine: String = self
            .machine_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("{}-{}", machine, self.metric)
    }
}

/// 한 메트릭의 셰이핑/렌더링 실패
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelFailure {
    pub machine_id: String,
    pub metric: String,
    pub message: String,
}

/// 관리자 뷰
#[derive(Debug, Clone)]
pub struct AdminView {
    pub slots: Vec<MachineSlot>,
    pub panels: Vec<MetricPanel>,
    pub failures: Vec<PanelFailure>,
}

impl AdminView {
    /// 슬롯과 패널 구성. 메트릭 순서는 이름 사전순.
    pub fn build(machines: Vec<MachineRecord>, config: &AppConfig) -> Self {
        let renderer = ChartRenderer::new(config.chart.clone());
        let slots = machine_slots(&machines, config.admin.machine_slots);
        let mut panels = Vec::new();
        let mut failures = Vec::new();

        for machine in &machines {
            for (name, samples) in &machine.metrics {
                match build_panel(&renderer, config, &machine.id, name, samples) {
                    Ok(Some(panel)) => panels.push(panel),
                    Ok(None) => debug!("{}/{}: 패널 없음", machine.id, name),
                    Err(e) => {
                        warn!("{}/{} 패널 생성 실패: {e}", machine.id, name);
                        failures.push(PanelFailure {
                            machine_id: machine.id.clone(),
                            metric: name.clone(),
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        info!(
            "관리자 뷰 구성: 슬롯 {}개, 패널 {}개, 실패 {}개",
            slots.len(),
            panels.len(),
            failures.len()
        );
        Self {
            slots,
            panels,
            failures,
        }
    }

    /// 패널을 PNG로 저장. 반환: 저장된 파일 경로.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, CoreError> {
        fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(self.panels.len() * 2);
        for panel in &self.panels {
            let stem = panel.file_stem();
            let chart_path = dir.join(format!("{stem}.png"));
            let legend_path = dir.join(format!("{stem}-legend.png"));
            save_png(&panel.chart, &chart_path)?;
            save_png(&panel.legend, &legend_path)?;
            written.push(chart_path);
            written.push(legend_path);
        }

        info!("차트 {}개 저장: {}", written.len(), dir.display());
        Ok(written)
    }

    /// 패널을 파일 대신 PNG data URL로. 반환: (파일 이름 기준, URL), 차트 다음 범례 순.
    pub fn data_urls(&self) -> Result<Vec<(String, String)>, CoreError> {
        let mut urls = Vec::with_capacity(self.panels.len() * 2);
        for panel in &self.panels {
            let stem = panel.file_stem();
            urls.push((stem.clone(), data_url(&panel.chart)?));
            urls.push((format!("{stem}-legend"), data_url(&panel.legend)?));
        }
        Ok(urls)
    }

    /// 터미널 요약
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let slots: Vec<String> = self
            .slots
            .iter()
            .map(|s| format!("[{} {}]", s.title(), s.status()))
            .collect();
        out.push_str(&slots.join(" "));
        out.push('\n');

        for panel in &self.panels {
            out.push_str(&format!(
                "  {} / {}: 포인트 {}개, 선분 {}개\n",
                panel.machine_id, panel.metric, panel.points_plotted, panel.segments_drawn
            ));
        }
        for failure in &self.failures {
            out.push_str(&format!(
                "  {} / {}: 실패: {}\n",
                failure.machine_id, failure.metric, failure.message
            ));
        }
        out
    }
}

fn data_url(image: &RgbaImage) -> Result<String, CoreError> {
    Ok(format!("data:image/png;base64,{}", encode_png_base64(image)?))
}

/// 메트릭 1개 → 패널. 셰이퍼가 `None`이면 패널 없음.
fn build_panel(
    renderer: &ChartRenderer,
    config: &AppConfig,
    machine_id: &str,
    name: &str,
    samples: &[MetricSample],
) -> Result<Option<MetricPanel>, CoreError> {
    let Some(shaped) = shape_metric(name, samples, &config.units)? else {
        return Ok(None);
    };

    let chart = renderer.render_metric(&shaped)?;
    let legend = render_legend(&shaped.legend, &config.chart)?;

    Ok(Some(MetricPanel {
        machine_id: machine_id.to_string(),
        metric: shaped.kind,
        chart: chart.image,
        legend,
        points_plotted: chart.points_plotted,
        segments_drawn: chart.segments_drawn,
    }))
}
