//! 관리자 흐름 통합 테스트.
//!
//! mockito 서버 → HttpFeedClient → AdminSession → AdminView → PNG 파일.

use beacon_app::admin_view::{load_failure_message, AdminSession, MachineSlot};
use beacon_core::config::AppConfig;
use beacon_core::error::CoreError;
use beacon_network::http_client::HttpFeedClient;
use mockito::Matcher;
use std::time::Duration;

const MACHINES: &str = r#"[
  {"id":"01","metrics":{"service":[["active","t0"],["active","t1"]],
                        "cpu_percent":[[[5.0],"t0"],[[15.0],"t1"]]}},
  {"id":"02","metrics":{"service":[["failed","t0"]]}}
]"#;

fn config_for(server: &mockito::Server) -> AppConfig {
    let mut config = AppConfig::default_config();
    config.server.admin_url = format!("{}/main", server.url());
    config.chart.width = 240;
    config.chart.height = 160;
    config.chart.x_padding = 30.0;
    config
}

fn client(config: &AppConfig) -> HttpFeedClient {
    HttpFeedClient::new(&config.server, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn unlock_renders_and_writes_panels() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/main")
        .match_body(Matcher::Json(serde_json::json!({"password": "hunter2"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(MACHINES)
        .expect(1)
        .create_async()
        .await;

    let config = config_for(&server);
    let session = AdminSession::unlock(&client(&config), "hunter2").await.unwrap();
    mock.assert_async().await;
    assert_eq!(session.machines().len(), 2);

    let view = session.into_view(&config);
    assert_eq!(view.slots.len(), 10);
    assert_eq!(
        view.slots[0],
        MachineSlot::Occupied {
            id: "01".to_string()
        }
    );
    assert!(view.slots[2..].iter().all(MachineSlot::is_vacant));
    assert_eq!(view.panels.len(), 3);
    assert!(view.failures.is_empty());

    let dir = tempfile::TempDir::new().unwrap();
    let written = view.write_to(dir.path()).unwrap();
    assert_eq!(written.len(), 6);
    assert!(dir.path().join("01-cpu_percent.png").exists());
    assert!(dir.path().join("02-service-legend.png").exists());

    let chart = image::open(dir.path().join("01-service.png")).unwrap();
    assert_eq!((chart.width(), chart.height()), (240, 160));
}

#[tokio::test]
async fn rejected_password_surfaces_body_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/main")
        .with_status(401)
        .with_body("Invalid password")
        .create_async()
        .await;

    let config = config_for(&server);
    let err = AdminSession::unlock(&client(&config), "wrong").await.unwrap_err();

    assert!(matches!(err, CoreError::Rejected { status: 401, .. }));
    assert_eq!(load_failure_message(&err), "Failed to load admin data: Invalid password");
}

#[tokio::test]
async fn malformed_payload_is_fetch_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/main")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let config = config_for(&server);
    let err = AdminSession::unlock(&client(&config), "pw").await.unwrap_err();
    assert!(err.is_fetch_failure());
}

#[tokio::test]
async fn empty_password_sends_nothing() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/main")
        .expect(0)
        .create_async()
        .await;

    let config = config_for(&server);
    let err = AdminSession::unlock(&client(&config), "").await.unwrap_err();
    assert!(matches!(err, CoreError::Auth(_)));
    mock.assert_async().await;
}
