//! 에러 타입 -- 도메인별 에러 정의

/// killfeed 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum KillfeedError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 세션 시작/중단 에러
    #[error("session error: {0}")]
    Session(String),

    /// 로그 라인 파싱 에러
    #[error("parse error: {0}")]
    Parse(String),

    /// 수집기 전달 실패 (전송 계층)
    #[error("delivery error: {0}")]
    Delivery(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_to_killfeed_error() {
        let err: KillfeedError = ConfigError::InvalidValue {
            field: "tracker.poll_interval_ms".to_owned(),
            reason: "must be 1-60000".to_owned(),
        }
        .into();
        assert!(matches!(err, KillfeedError::Config(_)));
        assert!(err.to_string().contains("poll_interval_ms"));
    }

    #[test]
    fn io_error_converts_to_killfeed_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: KillfeedError = io.into();
        assert!(matches!(err, KillfeedError::Io(_)));
    }

    #[test]
    fn delivery_error_display() {
        let err = KillfeedError::Delivery("connection refused".to_owned());
        assert_eq!(err.to_string(), "delivery error: connection refused");
    }
}
