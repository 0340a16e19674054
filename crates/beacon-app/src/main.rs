//! # beacon
//!
//! Beacon 상태 대시보드 바이너리 진입점.
//! 설정/로깅 초기화, 어댑터 와이어링, 서브커맨드 실행.

use anyhow::{anyhow, Context, Result};
use beacon_app::admin_view::{load_failure_message, load_payload, AdminSession, AdminView};
use beacon_app::lifecycle::LifecycleManager;
use beacon_app::report::run_report;
use beacon_app::status_view::{check_status, watch_status};
use beacon_core::config::AppConfig;
use beacon_core::config_manager::ConfigManager;
use beacon_core::ports::monitor::SystemSampler;
use beacon_monitor::service::SystemctlInspector;
use beacon_monitor::system::SysInfoSampler;
use beacon_network::http_client::HttpFeedClient;
use beacon_network::reporter::{LogSigner, SignedLogReporter};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Beacon 상태 대시보드
///
/// 백엔드 상태 확인, 관리자 메트릭 차트 렌더링, 에이전트 상태 보고
#[derive(Parser, Debug)]
#[command(name = "beacon")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (JSON/TOML, 기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 서비스 상태 확인
    Status {
        /// 종료 신호까지 주기적으로 확인
        #[arg(long, short = 'w')]
        watch: bool,
        /// 감시 시간 (초). 없으면 종료 신호까지.
        #[arg(long, requires = "watch")]
        duration_secs: Option<u64>,
    },
    /// 관리자 메트릭 조회 후 차트 PNG 저장
    Admin {
        /// 관리자 비밀번호 (없으면 표준 입력에서 읽음)
        #[arg(long, short = 'p')]
        password: Option<String>,
        /// 출력 디렉토리 (기본: admin.output_dir)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
        /// 파일 대신 PNG data URL을 표준 출력으로
        #[arg(long, conflicts_with = "out")]
        base64: bool,
    },
    /// 서명된 상태 로그 보고 (에이전트)
    Report {
        /// CPU/메모리/디스크 메트릭도 함께 보고
        #[arg(long)]
        system: bool,
    },
    /// 저장된 관리자 페이로드를 오프라인 렌더링
    Render {
        /// 관리자 피드 응답 JSON 파일
        #[arg(long, short = 'i')]
        input: PathBuf,
        /// 출력 디렉토리 (기본: admin.output_dir)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
        /// 파일 대신 PNG data URL을 표준 출력으로
        #[arg(long, conflicts_with = "out")]
        base64: bool,
    },
    /// 기본 설정 파일 생성
    InitConfig {
        /// 저장 경로 (기본: 플랫폼 설정 디렉토리)
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "beacon={},beacon_app={},beacon_core={},beacon_chart={},beacon_network={},beacon_monitor={}",
        args.log_level, args.log_level, args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .with_writer(io::stderr)
        .init();

    if let Command::InitConfig { path } = &args.command {
        let path = match path {
            Some(p) => p.clone(),
            None => ConfigManager::default_config_path()?,
        };
        ConfigManager::save_defaults(&path)?;
        println!("설정 파일 생성: {}", path.display());
        return Ok(());
    }

    let manager = ConfigManager::load(args.config.as_deref()).context("설정 로드 실패")?;
    if let Some(path) = manager.source_path() {
        info!("설정 파일: {}", path.display());
    }
    let config = manager.into_config();

    match args.command {
        Command::Status {
            watch,
            duration_secs,
        } => run_status(&config, watch, duration_secs.map(Duration::from_secs)).await,
        Command::Admin {
            password,
            out,
            base64,
        } => run_admin(&config, password, out, base64).await,
        Command::Report { system } => run_agent_report(&config, system).await,
        Command::Render { input, out, base64 } => run_render(&config, &input, out, base64),
        Command::InitConfig { .. } => Ok(()),
    }
}

fn feed_client(config: &AppConfig) -> Result<HttpFeedClient> {
    Ok(HttpFeedClient::new(&config.server, config.request_timeout())?)
}

async fn run_status(config: &AppConfig, watch: bool, duration: Option<Duration>) -> Result<()> {
    let client = feed_client(config)?;

    if !watch {
        println!("{}", check_status(&client).await);
        return Ok(());
    }

    let lifecycle = Arc::new(LifecycleManager::new());
    let shutdown_rx = lifecycle.subscribe();
    let mut tasks = vec![lifecycle.spawn_signal_listener()];
    if let Some(after) = duration {
        tasks.push(lifecycle.spawn_deadline(after));
    }

    info!("상태 감시 시작 (주기 {:?})", config.status_poll_interval());
    watch_status(&client, config.status_poll_interval(), shutdown_rx, |indicator| {
        println!("[{}] {}", chrono::Local::now().format("%H:%M:%S"), indicator);
    })
    .await;

    for task in tasks {
        task.abort();
    }
    Ok(())
}

async fn run_admin(
    config: &AppConfig,
    password: Option<String>,
    out: Option<PathBuf>,
    base64: bool,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_password()?,
    };
    if password.is_empty() {
        // 입력 취소
        return Ok(());
    }

    let client = feed_client(config)?;
    println!("Loading...");
    let session = match AdminSession::unlock(&client, &password).await {
        Ok(session) => session,
        Err(e) => {
            error!("관리자 데이터 조회 실패: {e}");
            return Err(anyhow!(load_failure_message(&e)));
        }
    };

    emit_view(config, &session.into_view(config), out, base64)
}

fn prompt_password() -> Result<String> {
    print!("Enter admin password: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn run_agent_report(config: &AppConfig, system: bool) -> Result<()> {
    let client = Arc::new(feed_client(config)?);
    let signer = LogSigner::load(&config.reporter.private_key_path).await?;
    let reporter = SignedLogReporter::new(config.reporter.machine_id.clone(), signer, client);
    let inspector = SystemctlInspector::new(config.reporter.service_unit.clone());
    let sampler = SysInfoSampler::new();

    let outcome = run_report(
        &reporter,
        &inspector,
        system.then_some(&sampler as &dyn SystemSampler),
    )
    .await?;

    let now = chrono::Local::now().to_rfc3339();
    for (key, value) in outcome.sent {
        println!("[{now}] Sent {key} '{value}'");
    }
    Ok(())
}

fn run_render(config: &AppConfig, input: &Path, out: Option<PathBuf>, base64: bool) -> Result<()> {
    let machines = load_payload(input)
        .with_context(|| format!("페이로드 로드 실패: {}", input.display()))?;
    let view = AdminSession::from_machines(machines).into_view(config);
    emit_view(config, &view, out, base64)
}

/// 뷰 출력: PNG 파일 저장 또는 data URL 출력
fn emit_view(config: &AppConfig, view: &AdminView, out: Option<PathBuf>, base64: bool) -> Result<()> {
    if base64 {
        for (stem, url) in view.data_urls()? {
            println!("{stem}\t{url}");
        }
        // 요약은 표준 출력을 오염시키지 않게 stderr로
        eprint!("{}", view.summary());
        return Ok(());
    }

    let dir = out.unwrap_or_else(|| config.admin.output_dir.clone());
    let written = view.write_to(&dir)?;
    print!("{}", view.summary());
    println!("{}개 파일 저장: {}", written.len(), dir.display());
    Ok(())
}
