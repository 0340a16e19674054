//! 상태 뷰.
//!
//! 공개 상태 피드를 조회해 ONLINE / SERVICE DEGRADATION / SERVICE ERROR 표시를 만든다.
//! 조회는 1회 요청이며, 실패는 해당 회차의 에러 표시로만 나타난다.

use beacon_core::models::chart::Color;
use beacon_core::models::status::{ServiceHealth, StatusResponse};
use beacon_core::ports::feed::StatusFeed;
use std::fmt;
use std::time::Duration;
use tracing::{error, info};

use crate::lifecycle::ShutdownReceiver;

/// 상태 아이콘
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    Check,
    Warning,
    Cross,
}

impl StatusIcon {
    /// 터미널 표시용 글리프
    pub fn glyph(&self) -> &'static str {
        match self {
            StatusIcon::Check => "✔",
            StatusIcon::Warning => "⚠",
            StatusIcon::Cross => "✖",
        }
    }
}

/// 상태 표시기
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicator {
    pub health: ServiceHealth,
    /// 상태 문구
    pub label: &'static str,
    /// 원형 표시 색상
    pub color: Color,
    pub icon: StatusIcon,
    /// `As of {since}` (응답에 since가 있을 때만)
    pub caption: Option<String>,
}

impl StatusIndicator {
    /// 상태 → 표시기
    pub fn new(health: ServiceHealth, since: Option<&str>) -> Self {
        let (label, color, icon) = match health {
            ServiceHealth::Online => ("ONLINE", Color::rgb(0x2e, 0xcc, 0x71), StatusIcon::Check),
            ServiceHealth::Degraded => (
                "SERVICE DEGRADATION",
                Color::rgb(0xff, 0x69, 0x00),
                StatusIcon::Warning,
            ),
            ServiceHealth::Error => ("SERVICE ERROR", Color::rgb(0xfa, 0x2c, 0x37), StatusIcon::Cross),
        };
        Self {
            health,
            label,
            color,
            icon,
            caption: since.map(|s| format!("As of {s}")),
        }
    }

    /// 피드 응답 → 표시기
    pub fn from_response(response: &StatusResponse) -> Self {
        Self::new(
            ServiceHealth::from_response(response),
            response.since.as_deref(),
        )
    }

    /// 조회 실패 표시기
    pub fn error() -> Self {
        Self::new(ServiceHealth::Error, None)
    }
}

impl fmt::Display for StatusIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 24비트 ANSI 색상으로 원형 표시
        write!(
            f,
            "\x1b[38;2;{};{};{}m●\x1b[0m {} {}",
            self.color.r,
            self.color.g,
            self.color.b,
            self.icon.glyph(),
            self.label
        )?;
        if let Some(caption) = &self.caption {
            write!(f, "  ({caption})")?;
        }
        Ok(())
    }
}

/// 상태 1회 확인
pub async fn check_status(feed: &dyn StatusFeed) -> StatusIndicator {
    match feed.fetch_status().await {
        Ok(response) => StatusIndicator::from_response(&response),
        Err(e) => {
            error!("상태 조회 실패: {e}");
            StatusIndicator::error()
        }
    }
}

/// 종료 신호까지 주기적으로 확인. 반환: 확인 횟수.
///
/// 이미 종료된 수신기를 받으면 한 번도 조회하지 않는다.
pub async fn watch_status<F>(
    feed: &dyn StatusFeed,
    interval: Duration,
    mut shutdown_rx: ShutdownReceiver,
    mut on_update: F,
) -> usize
where
    F: FnMut(&StatusIndicator),
{
    let mut ticker = tokio::time::interval(interval);
    let mut polls = 0;

    while shutdown_rx.borrow_and_update().is_none() {
        tokio::select! {
            _ = ticker.tick() => {
                let indicator = check_status(feed).await;
                on_update(&indicator);
                polls += 1;
            }
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    // 송신측이 사라지면 더 받을 종료 신호가 없다
                    break;
                }
            }
        }
    }

    let reason = match *shutdown_rx.borrow() {
        Some(reason) => reason.to_string(),
        None => "closed".to_string(),
    };
    info!("상태 감시 종료 ({polls}회 확인, 사유: {reason})");
    polls
}
