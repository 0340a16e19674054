//! 상태 감시 종료 제어.
//!
//! 종료 사유(시그널 / 감시 시간 만료)를 watch 채널로 한 번만 전파한다.
//! 먼저 도착한 사유가 유지되고 이후 요청은 무시된다.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// 종료 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT / Ctrl+C
    Interrupt,
    /// SIGTERM
    Terminate,
    /// `--duration-secs` 만료
    Deadline,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShutdownReason::Interrupt => "interrupt",
            ShutdownReason::Terminate => "terminate",
            ShutdownReason::Deadline => "deadline",
        };
        f.write_str(name)
    }
}

/// 종료 수신기. `None`이면 아직 실행 중.
pub type ShutdownReceiver = watch::Receiver<Option<ShutdownReason>>;

/// 라이프사이클 관리자
pub struct LifecycleManager {
    shutdown_tx: watch::Sender<Option<ShutdownReason>>,
}

impl LifecycleManager {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(None);
        Self { shutdown_tx }
    }

    pub fn subscribe(&self) -> ShutdownReceiver {
        self.shutdown_tx.subscribe()
    }

    /// 종료 요청. 이미 종료 중이면 `false`.
    pub fn shutdown(&self, reason: ShutdownReason) -> bool {
        let accepted = self.shutdown_tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        });
        if accepted {
            info!("종료 요청: {reason}");
        }
        accepted
    }

    /// 현재 종료 사유
    pub fn reason(&self) -> Option<ShutdownReason> {
        *self.shutdown_tx.borrow()
    }

    /// OS 시그널 대기 태스크
    pub fn spawn_signal_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let lifecycle = Arc::clone(self);
        tokio::spawn(async move {
            let reason = wait_for_signal().await;
            lifecycle.shutdown(reason);
        })
    }

    /// `after` 경과 후 `Deadline`으로 종료하는 태스크
    pub fn spawn_deadline(self: &Arc<Self>, after: Duration) -> JoinHandle<()> {
        let lifecycle = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            lifecycle.shutdown(ShutdownReason::Deadline);
        })
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}

async fn wait_for_signal() -> ShutdownReason {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        if let (Ok(mut sigint), Ok(mut sigterm)) = (
            signal(SignalKind::interrupt()),
            signal(SignalKind::terminate()),
        ) {
            return tokio::select! {
                _ = sigint.recv() => ShutdownReason::Interrupt,
                _ = sigterm.recv() => ShutdownReason::Terminate,
            };
        }
        warn!("유닉스 시그널 핸들러 등록 실패, Ctrl+C만 대기");
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        // 핸들러가 없으면 시그널로는 끝낼 수 없다
        warn!("Ctrl+C 핸들러 등록 실패: {e}");
        std::future::pending::<()>().await;
    }
    ShutdownReason::Interrupt
}
