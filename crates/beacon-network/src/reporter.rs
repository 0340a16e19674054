//! 서명 로그 보고기.
//!
//! 에이전트가 수집한 값을 `key + value` 기준 Ed25519로 서명해 로그 엔드포인트로 보낸다.
//! 문자열이 아닌 값은 JSON 문자열로 직렬화한 뒤 서명한다.

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use beacon_core::error::CoreError;
use beacon_core::models::report::SignedLogEntry;
use beacon_core::ports::feed::LogSink;
use ed25519_dalek::pkcs8::DecodePrivateKey;
use ed25519_dalek::{Signer, SigningKey};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Ed25519 서명기
#[derive(Debug)]
pub struct LogSigner {
    key: SigningKey,
}

impl LogSigner {
    pub fn new(key: SigningKey) -> Self {
        Self { key }
    }

    /// PKCS#8 DER 바이트에서 로드
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self, CoreError> {
        let key = SigningKey::from_pkcs8_der(der)
            .map_err(|e| CoreError::Signing(format!("PKCS#8 개인키 파싱 실패: {e}")))?;
        Ok(Self { key })
    }

    /// PKCS#8 DER 파일에서 로드
    pub async fn load(path: &Path) -> Result<Self, CoreError> {
        let der = tokio::fs::read(path).await.map_err(|e| {
            CoreError::Signing(format!("개인키 파일 읽기 실패: {}: {}", path.display(), e))
        })?;
        Self::from_pkcs8_der(&der)
    }

    /// `key + value` 서명 → Base64
    pub fn sign(&self, key: &str, value: &str) -> String {
        let message = SignedLogEntry::message(key, value);
        let signature = self.key.sign(message.as_bytes());
        B64.encode(signature.to_bytes())
    }
}

/// 서명 후 전송하는 보고기
pub struct SignedLogReporter {
    machine_id: String,
    signer: LogSigner,
    sink: Arc<dyn LogSink>,
}

impl SignedLogReporter {
    pub fn new(machine_id: impl Into<String>, signer: LogSigner, sink: Arc<dyn LogSink>) -> Self {
        Self {
            machine_id: machine_id.into(),
            signer,
            sink,
        }
    }

    /// 서명된 로그 항목 생성 (전송 없음)
    pub fn entry(&self, key: &str, value: &serde_json::Value) -> SignedLogEntry {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        SignedLogEntry {
            id: self.machine_id.clone(),
            key: key.to_string(),
            signature: self.signer.sign(key, &value),
            value,
        }
    }

    /// 값 1건 서명 + 전송. 반환: 전송된 항목.
    pub async fn report(
        &self,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<SignedLogEntry, CoreError> {
        if self.machine_id.is_empty() {
            return Err(CoreError::Config("reporter.machine_id가 비어 있음".to_string()));
        }

        let entry = self.entry(key, value);
        debug!("로그 서명 완료: key={}, value={}", entry.key, entry.value);
        self.sink.post_log(&entry).await?;
        info!("로그 보고 완료: id={}, key={}", entry.id, entry.key);
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use ed25519_dalek::pkcs8::EncodePrivateKey;
    use ed25519_dalek::{Signature, Verifier};
    use std::sync::Mutex;

    /// 전송된 항목을 모으는 테스트용 싱크
    #[derive(Default)]
    struct RecordingSink {
        entries: Mutex<Vec<SignedLogEntry>>,
    }

    #[async_trait]
    impl LogSink for RecordingSink {
        async fn post_log(&self, entry: &SignedLogEntry) -> Result<(), CoreError> {
            self.entries.lock().unwrap().push(entry.clone());
            Ok(())
        }
    }

    fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[7u8; 32])
    }

    fn verify(entry: &SignedLogEntry) -> bool {
        let bytes = B64.decode(&entry.signature).unwrap();
        let signature = Signature::from_slice(&bytes).unwrap();
        let message = SignedLogEntry::message(&entry.key, &entry.value);
        signing_key()
            .verifying_key()
            .verify(message.as_bytes(), &signature)
            .is_ok()
    }

    #[test]
    fn signature_covers_key_and_value() {
        let reporter = SignedLogReporter::new(
            "01",
            LogSigner::new(signing_key()),
            Arc::new(RecordingSink::default()),
        );
        let entry = reporter.entry("service", &serde_json::json!("active"));
        assert_eq!(entry.value, "active");
        assert!(verify(&entry));

        let mut tampered = entry.clone();
        tampered.value = "inactive".to_string();
        assert!(!verify(&tampered));
    }

    #[test]
    fn non_string_values_are_json_encoded() {
        let reporter = SignedLogReporter::new(
            "01",
            LogSigner::new(signing_key()),
            Arc::new(RecordingSink::default()),
        );
        let entry = reporter.entry("cpu_percent", &serde_json::json!([12.5, 40.0]));
        assert_eq!(entry.value, "[12.5,40.0]");
        assert!(verify(&entry));
    }

    #[test]
    fn pkcs8_der_roundtrip() {
        let der = signing_key().to_pkcs8_der().unwrap();
        let signer = LogSigner::from_pkcs8_der(der.as_bytes()).unwrap();
        assert_eq!(signer.sign("k", "v"), LogSigner::new(signing_key()).sign("k", "v"));
    }

    #[test]
    fn invalid_der_is_signing_error() {
        assert_matches!(
            LogSigner::from_pkcs8_der(b"not a key"),
            Err(CoreError::Signing(_))
        );
    }

    #[tokio::test]
    async fn load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("private.der");
        let der = signing_key().to_pkcs8_der().unwrap();
        std::fs::write(&path, der.as_bytes()).unwrap();

        assert!(LogSigner::load(&path).await.is_ok());
        assert_matches!(
            LogSigner::load(&dir.path().join("missing.der")).await,
            Err(CoreError::Signing(_))
        );
    }

    #[tokio::test]
    async fn report_posts_to_sink() {
        let sink = Arc::new(RecordingSink::default());
        let reporter = SignedLogReporter::new("07", LogSigner::new(signing_key()), sink.clone());

        reporter
            .report("memory", &serde_json::json!({"used": 1, "total": 2, "free": 1}))
            .await
            .unwrap();

        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "07");
        assert_eq!(entries[0].key, "memory");
        assert!(verify(&entries[0]));
    }

    #[tokio::test]
    async fn report_requires_machine_id() {
        let reporter = SignedLogReporter::new(
            "",
            LogSigner::new(signing_key()),
            Arc::new(RecordingSink::default()),
        );
        assert_matches!(
            reporter.report("service", &serde_json::json!("active")).await,
            Err(CoreError::Config(_))
        );
    }
}
