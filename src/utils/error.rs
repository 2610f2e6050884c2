use crate::config::ConfigError;

/// Error type for everything around the bridge core.
///
/// Bridge operations themselves are total and never produce one of these;
/// only configuration, channel routing and host shell I/O do.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),

    #[error("등록되지 않은 채널입니다: {0}")]
    UnknownChannel(String),

    #[error("잘못된 요청 형식입니다: {0}")]
    InvalidRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// 에러 코드 반환
    pub fn error_code(&self) -> String {
        match self {
            AppError::Config(_) => "CONFIG500",
            AppError::UnknownChannel(_) => "CHANNEL404",
            AppError::InvalidRequest(_) => "COMMON400",
            AppError::Io(_) => "COMMON500",
            AppError::Json(_) => "COMMON400",
        }
        .to_string()
    }

    /// 에러 메시지 반환
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// 편의 함수들
impl AppError {
    pub fn unknown_channel(name: impl Into<String>) -> Self {
        AppError::UnknownChannel(name.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        AppError::InvalidRequest(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_error_codes() {
        // Arrange
        let unknown = AppError::unknown_channel("com.example/none");
        let invalid = AppError::invalid_request("missing method");
        let config = AppError::from(ConfigError::InvalidCapacity);

        // Act & Assert
        assert_eq!(unknown.error_code(), "CHANNEL404");
        assert_eq!(invalid.error_code(), "COMMON400");
        assert_eq!(config.error_code(), "CONFIG500");
    }

    #[test]
    fn should_include_detail_in_message() {
        // Arrange
        let err = AppError::unknown_channel("com.example/none");

        // Act
        let message = err.message();

        // Assert
        assert!(message.contains("com.example/none"));
    }

    #[test]
    fn should_convert_json_error() {
        // Arrange
        let parse_err = serde_json::from_str::<serde_json::Value>("{ invalid").unwrap_err();

        // Act
        let err: AppError = parse_err.into();

        // Assert
        assert_eq!(err.error_code(), "COMMON400");
    }
}
