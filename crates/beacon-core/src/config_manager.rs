//! 설정 로드.
//!
//! 기본값 → 설정 파일 → `BEACON__*` 환경변수 순으로 덮어쓴다.
//! 파일 형식은 확장자(.json / .toml)로 판별.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::CoreError;

/// 설정 파일 이름
const CONFIG_FILE_NAME: &str = "config.json";

/// 앱 디렉토리 이름
const APP_DIR_NAME: &str = "beacon";

/// 환경변수 접두사 (`BEACON__CHART__WIDTH=800`)
const ENV_PREFIX: &str = "BEACON";

/// 설정 관리자
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 로드된 설정
    config: AppConfig,
    /// 실제로 읽은 설정 파일 (없으면 `None`)
    source_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 설정 로드
    ///
    /// `path`가 주어지면 해당 파일은 반드시 존재해야 한다.
    /// 없으면 플랫폼 설정 디렉토리의 `config.json`을 선택적으로 읽는다.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let (source_path, required) = match path {
            Some(p) => (Some(p.to_path_buf()), true),
            None => (Self::default_config_path().ok(), false),
        };

        let defaults = Config::try_from(&AppConfig::default_config())
            .map_err(|e| CoreError::Config(format!("기본 설정 변환 실패: {e}")))?;

        let mut builder = Config::builder().add_source(defaults);
        if let Some(ref p) = source_path {
            builder = builder.add_source(File::from(p.as_path()).required(required));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| CoreError::Config(format!("설정 로드 실패: {e}")))?;

        config.validate()?;

        let source_path = source_path.filter(|p| p.exists());
        match &source_path {
            Some(p) => debug!("설정 파일 로드 완료: {}", p.display()),
            None => debug!("설정 파일 없음, 기본값 + 환경변수 사용"),
        }

        Ok(Self {
            config,
            source_path,
        })
    }

    /// 기본값으로 생성 (파일/환경변수 무시)
    pub fn from_defaults() -> Self {
        Self {
            config: AppConfig::default_config(),
            source_path: None,
        }
    }

    /// 현재 설정
    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    /// 설정 소유권 반환
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// 실제로 읽은 설정 파일 경로
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// 기본 설정을 JSON 파일로 저장 (상위 디렉토리 생성)
    pub fn save_defaults(path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    CoreError::Config(format!(
                        "설정 디렉토리 생성 실패: {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(&AppConfig::default_config())
            .map_err(|e| CoreError::Config(format!("설정 직렬화 실패: {e}")))?;
        fs::write(path, content).map_err(|e| {
            CoreError::Config(format!("설정 파일 저장 실패: {}: {}", path.display(), e))
        })?;

        info!("기본 설정 파일 생성: {}", path.display());
        Ok(())
    }

    /// 플랫폼별 설정 디렉토리
    pub fn config_dir() -> Result<PathBuf, CoreError> {
        ProjectDirs::from("", "", APP_DIR_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| CoreError::Config("홈 디렉토리를 찾을 수 없습니다".to_string()))
    }

    /// 플랫폼별 기본 설정 파일 경로
    pub fn default_config_path() -> Result<PathBuf, CoreError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    #[test]
    fn explicit_json_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("beacon.json");
        fs::write(
            &path,
            r##"{"chart":{"width":800,"grid_color":"#333333"},"admin":{"machine_slots":4}}"##,
        )
        .unwrap();

        let manager = ConfigManager::load(Some(&path)).unwrap();
        let config = manager.get();
        assert_eq!(config.chart.width, 800);
        assert_eq!(config.chart.height, 400);
        assert_eq!(config.chart.grid_color.to_string(), "#333333");
        assert_eq!(config.admin.machine_slots, 4);
        assert_eq!(manager.source_path(), Some(path.as_path()));
    }

    #[test]
    fn toml_file_is_supported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("beacon.toml");
        fs::write(
            &path,
            "[server]\nstatus_url = \"http://status.local/public_info\"\n\n[units]\ndisk_divisor = 1000.0\n",
        )
        .unwrap();

        let config = ConfigManager::load(Some(&path)).unwrap().into_config();
        assert_eq!(config.server.status_url, "http://status.local/public_info");
        assert_eq!(config.units.disk_divisor, 1000.0);
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope.json");
        assert_matches!(ConfigManager::load(Some(&path)), Err(CoreError::Config(_)));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, r#"{"chart":{"y_steps":0}}"#).unwrap();
        assert_matches!(
            ConfigManager::load(Some(&path)),
            Err(CoreError::Validation { .. })
        );
    }

    #[test]
    fn save_defaults_roundtrips() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        ConfigManager::save_defaults(&path).unwrap();
        assert!(path.exists());

        let config = ConfigManager::load(Some(&path)).unwrap().into_config();
        assert_eq!(config.chart, AppConfig::default_config().chart);
    }

    #[test]
    fn env_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("beacon.json");
        fs::write(&path, r#"{"reporter":{"machine_id":"from-file"}}"#).unwrap();

        std::env::set_var("BEACON__REPORTER__SERVICE_UNIT", "worker.service");
        let config = ConfigManager::load(Some(&path)).unwrap().into_config();
        std::env::remove_var("BEACON__REPORTER__SERVICE_UNIT");

        assert_eq!(config.reporter.machine_id, "from-file");
        assert_eq!(config.reporter.service_unit, "worker.service");
    }
}
