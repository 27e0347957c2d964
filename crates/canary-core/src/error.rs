//! 수집기 전반에서 사용되는 에러 타입.
//!
//! 빈 결과는 에러가 아닙니다. 업스트림이 정상 응답했지만 데이터가 없는 경우
//! 수집기는 `{"error": "empty"}` 마커를 담은 [`OutputRecord`](crate::OutputRecord)를 반환합니다.

use thiserror::Error;

/// 수집기 에러.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// 지표 계산에 필요한 행 수 부족
    #[error("{label} requires at least {required} rows, but got {provided}.")]
    InsufficientData {
        label: String,
        required: usize,
        provided: usize,
    },

    /// 인식할 수 없는 키/티커/인터벌
    #[error("{0} is not valid type.")]
    UnknownKey(String),

    /// 필수 API 키 없음
    #[error("{0} is not set")]
    MissingCredential(String),

    /// 전송 계층 실패 (연결, 타임아웃, HTTP 상태 오류)
    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    /// 응답 파싱 실패
    #[error("Parse failure: {0}")]
    ParseFailure(String),

    /// 업스트림이 명시적인 에러 코드로 응답함
    #[error("API error ({provider}): {message}")]
    Api { provider: String, message: String },

    /// 잘못된 파라미터
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl CollectorError {
    /// 호출자가 더 긴 히스토리를 제공하면 해결되는 에러인지 확인합니다.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, CollectorError::InsufficientData { .. })
    }

    /// 호출자 입력 오류인지 확인합니다.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            CollectorError::UnknownKey(_) | CollectorError::InvalidParameter(_)
        )
    }
}

impl From<serde_json::Error> for CollectorError {
    fn from(err: serde_json::Error) -> Self {
        CollectorError::ParseFailure(err.to_string())
    }
}

/// 수집기 작업을 위한 Result 타입.
pub type Result<T> = std::result::Result<T, CollectorError>;
