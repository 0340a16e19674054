//! Beacon 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 이 타입을 그대로 반환한다.
//! 셰이핑 스킵(빈 샘플, 미지원 메트릭)은 에러가 아니라 `Ok(None)`으로 표현한다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 ({field}): {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 렌더러/셰이퍼 입력 계약 위반 (길이 불일치, 잘못된 값 형식 등)
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 네트워크 에러 (연결 실패, 타임아웃)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 2xx가 아닌 응답. 본문을 그대로 노출한다.
    #[error("{body}")]
    Rejected {
        /// HTTP 상태 코드
        status: u16,
        /// 응답 본문 (가공 없음)
        body: String,
    },

    /// 인증 에러 (비밀번호 누락 등 요청 전 단계)
    #[error("인증 에러: {0}")]
    Auth(String),

    /// 서명 키 로드/서명 실패
    #[error("서명 에러: {0}")]
    Signing(String),

    /// 이미지 인코딩 실패
    #[error("이미지 에러: {0}")]
    Image(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl CoreError {
    /// 피드 조회 실패(전송/응답/디코딩) 여부
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            CoreError::Network(_) | CoreError::Rejected { .. } | CoreError::Serialization(_)
        )
    }
}
