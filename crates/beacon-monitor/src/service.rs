//! 서비스 상태 프로브.
//!
//! `ServiceInspector` 포트 구현. `systemctl is-active <unit>`의 표준 출력을 그대로 쓴다.
//! 명령 실행 실패나 0이 아닌 종료 코드는 모두 `"error"`.

use async_trait::async_trait;
use beacon_core::ports::monitor::ServiceInspector;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// 실패 시 보고하는 상태 문자열
pub const STATE_ERROR: &str = "error";

/// systemctl 기반 서비스 프로브
pub struct SystemctlInspector {
    program: String,
    unit: String,
}

impl SystemctlInspector {
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            program: "systemctl".to_string(),
            unit: unit.into(),
        }
    }

    /// 실행 파일 교체 (테스트/비 systemd 환경)
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

#[async_trait]
impl ServiceInspector for SystemctlInspector {
    async fn service_state(&self) -> String {
        let output = Command::new(&self.program)
            .arg("is-active")
            .arg(&self.unit)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await;

        match output {
            Ok(out) if out.status.success() => {
                let state = String::from_utf8_lossy(&out.stdout).trim().to_string();
                debug!("서비스 상태: {} = {}", self.unit, state);
                state
            }
            Ok(out) => {
                debug!("서비스 비활성: {} (종료 코드 {:?})", self.unit, out.status.code());
                STATE_ERROR.to_string()
            }
            Err(e) => {
                warn!("{} 실행 실패: {e}", self.program);
                STATE_ERROR.to_string()
            }
        }
    }
}
