//! HTTP 피드 클라이언트.
//!
//! `StatusFeed` / `AdminFeed` / `LogSink` 포트 구현.
//! 요청 1회 + 타임아웃, 재시도 없음. 2xx가 아닌 응답은 본문을 그대로 `Rejected`로 올린다.

use async_trait::async_trait;
use beacon_core::config::ServerConfig;
use beacon_core::error::CoreError;
use beacon_core::models::metric::MachineRecord;
use beacon_core::models::report::SignedLogEntry;
use beacon_core::models::status::StatusResponse;
use beacon_core::ports::feed::{AdminFeed, LogSink, StatusFeed};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// 로그 엔드포인트 경로
const LOG_PATH: &str = "/log";

/// reqwest 기반 피드 클라이언트
pub struct HttpFeedClient {
    client: reqwest::Client,
    status_url: String,
    admin_url: String,
    log_url: String,
}

impl HttpFeedClient {
    /// 새 피드 클라이언트 생성
    pub fn new(server: &ServerConfig, timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {}", e)))?;

        Ok(Self {
            client,
            status_url: server.status_url.clone(),
            admin_url: server.admin_url.clone(),
            log_url: format!("{}{}", server.log_endpoint.trim_end_matches('/'), LOG_PATH),
        })
    }

    /// 응답 상태 코드 확인. 실패 시 본문을 가공 없이 담는다.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_else(|e| {
            warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });
        Err(CoreError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    /// 응답 본문을 JSON으로 디코딩
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, CoreError> {
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| CoreError::Network(format!("응답 본문 읽기 실패: {e}")))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl StatusFeed for HttpFeedClient {
    async fn fetch_status(&self) -> Result<StatusResponse, CoreError> {
        debug!("상태 조회: {}", self.status_url);

        let resp = self
            .client
            .get(&self.status_url)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("상태 조회 요청 실패: {e}")))?;

        let resp = Self::check_response(resp).await?;
        let status: StatusResponse = Self::decode(resp).await?;
        debug!("상태 조회 성공: status={}", status.status);
        Ok(status)
    }
}

#[async_trait]
impl AdminFeed for HttpFeedClient {
    async fn fetch_machines(&self, password: &str) -> Result<Vec<MachineRecord>, CoreError> {
        debug!("관리자 메트릭 조회: {}", self.admin_url);

        let body = serde_json::json!({ "password": password });
        let resp = self
            .client
            .post(&self.admin_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("관리자 메트릭 요청 실패: {e}")))?;

        let resp = Self::check_response(resp).await?;
        let machines: Vec<MachineRecord> = Self::decode(resp).await?;
        debug!("관리자 메트릭 조회 성공: 머신 {}대", machines.len());
        Ok(machines)
    }
}

#[async_trait]
impl LogSink for HttpFeedClient {
    async fn post_log(&self, entry: &SignedLogEntry) -> Result<(), CoreError> {
        debug!("로그 전송: id={}, key={}", entry.id, entry.key);

        let resp = self
            .client
            .post(&self.log_url)
            .json(entry)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("로그 전송 요청 실패: {e}")))?;

        Self::check_response(resp).await?;
        Ok(())
    }
}
