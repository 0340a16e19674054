//! 설정 로드 + 어댑터 와이어링 통합 테스트.

use beacon_app::admin_view::AdminSession;
use beacon_chart::ChartRenderer;
use beacon_core::config_manager::ConfigManager;
use beacon_network::http_client::HttpFeedClient;
use std::time::Duration;

#[test]
fn toml_config_drives_rendering() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("beacon.toml");
    std::fs::write(
        &path,
        r#"
[server]
request_timeout_ms = 2500

[chart]
width = 320
height = 200
pixel_ratio = 2.0

[admin]
machine_slots = 4
"#,
    )
    .unwrap();

    let manager = ConfigManager::load(Some(&path)).unwrap();
    let config = manager.get().clone();
    assert_eq!(config.request_timeout(), Duration::from_millis(2500));
    assert!(HttpFeedClient::new(&config.server, config.request_timeout()).is_ok());

    let renderer = ChartRenderer::new(config.chart.clone());
    assert_eq!(renderer.config().surface_size(), (640, 400));

    let machines = serde_json::from_str(r#"[{"id":"a1","metrics":{"service":[["active","t0"]]}}]"#)
        .unwrap();
    let view = AdminSession::from_machines(machines).into_view(&config);
    assert_eq!(view.slots.len(), 4);
    assert_eq!(view.panels[0].chart.dimensions(), (640, 400));
}

#[test]
fn invalid_chart_config_is_rejected_at_load() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("beacon.json");
    std::fs::write(&path, r#"{"chart":{"pixel_ratio":0.0}}"#).unwrap();

    assert!(ConfigManager::load(Some(&path)).is_err());
}

#[test]
fn saved_defaults_load_back() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.json");
    ConfigManager::save_defaults(&path).unwrap();

    let manager = ConfigManager::load(Some(&path)).unwrap();
    assert_eq!(manager.source_path(), Some(path.as_path()));
    assert_eq!(manager.get().admin.machine_slots, 10);
}
