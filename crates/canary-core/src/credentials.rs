//! API 인증 정보.
//!
//! 인증키는 생성 시점에 한 번 검증되고 이후 환경변수를 다시 읽지 않습니다.
//! 값은 `secrecy`로 감싸 Debug 출력에 노출되지 않습니다.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{CollectorError, Result};

/// 외부 API 인증키.
#[derive(Debug)]
pub struct Credentials {
    name: String,
    api_key: SecretString,
}

impl Credentials {
    /// 인증 정보 생성.
    ///
    /// # Arguments
    /// * `name` - 에러 메시지에 쓰일 인증키 이름 (예: "FRED_API_KEY")
    /// * `api_key` - 인증키 값 (공백뿐이면 `MissingCredential`)
    pub fn new(name: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let api_key = api_key.into();

        if api_key.trim().is_empty() {
            return Err(CollectorError::MissingCredential(name));
        }

        Ok(Self {
            name,
            api_key: SecretString::from(api_key.trim().to_string()),
        })
    }

    /// 환경변수에서 인증 정보 로드.
    ///
    /// 바이너리 진입점에서만 사용합니다. 라이브러리 코드는 `Credentials`를 인자로 받습니다.
    pub fn from_env(var: &str) -> Result<Self> {
        let value = std::env::var(var)
            .map_err(|_| CollectorError::MissingCredential(var.to_string()))?;
        Self::new(var, value)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}
