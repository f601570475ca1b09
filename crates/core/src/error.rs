//! 에러 타입 -- 도메인별 에러 정의

/// Gathering 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum GatheringError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 로그 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

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

/// 로그 파싱 에러
///
/// 세그먼트 단위 실패는 치명적이지 않으며, 상위 계층으로 올라올 때만
/// 이 타입으로 변환됩니다.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 세그먼트 페이로드를 JSON으로 복원하지 못함
    #[error("malformed {kind} payload at line {line}: {reason}")]
    MalformedPayload {
        kind: String,
        line: usize,
        reason: String,
    },

    /// 세그먼트 간 상관 관계 불일치 (예: 진행 중인 매치와 다른 종료 ID)
    #[error("inconsistent log at line {line}: {reason}")]
    Inconsistency { line: usize, reason: String },

    /// 입력 데이터 초과
    #[error("input too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },
}
