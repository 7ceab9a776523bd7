//! Error type shared by the persistence, identity and form layers.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    /// A form field is missing or malformed; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("remote error {status}: {message}")]
    Remote { status: u16, message: String },
    #[error("not signed in")]
    Unauthorized,
    #[error("request timed out after {0} ms")]
    Timeout(u32),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("local storage error: {0}")]
    Storage(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Text shown to the user in alerts and inline status lines.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Network(_) => "네트워크 오류가 발생했습니다.".to_string(),
            AppError::Remote { message, .. } => message.clone(),
            AppError::Unauthorized => "로그인이 필요합니다. 다시 로그인해주세요.".to_string(),
            AppError::Timeout(_) => "서버 응답 시간이 초과되었습니다.".to_string(),
            AppError::Decode(_) => "서버 응답을 읽을 수 없습니다.".to_string(),
            AppError::Storage(_) => "브라우저 저장소를 사용할 수 없습니다.".to_string(),
            AppError::NotFound(what) => format!("항목을 찾을 수 없습니다: {}", what),
        }
    }

    /// Remote failures that should send the user back to the login screen.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AppError::Unauthorized | AppError::Remote { status: 401, .. }
        )
    }
}

impl From<gloo_net::Error> for AppError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => AppError::Decode(e.to_string()),
            other => AppError::Network(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}
