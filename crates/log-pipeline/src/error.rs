//! 로그 재구성 에러 타입
//!
//! [`ArenaLogError`]는 세그먼트 분할, JSON 추출, 레코드 디코딩, 상관 분석 과정에서
//! 발생하는 모든 에러를 표현합니다.
//! `From<ArenaLogError> for GatheringError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use gathering_core::error::{ConfigError, GatheringError, ParseError};

/// 로그 재구성 도메인 에러
///
/// 세그먼트 단위 에러는 치명적이지 않습니다. 조회 함수는 이 에러를
/// 로그로 남기고 해당 세그먼트를 건너뜁니다.
#[derive(Debug, thiserror::Error)]
pub enum ArenaLogError {
    /// 세그먼트 본문에 JSON 후보(`{`/`[` ... `}`/`]`)가 없음
    #[error("no json payload in {kind} segment at line {line}")]
    NoJson {
        /// 세그먼트 분류
        kind: String,
        /// 마커 라인 번호 (0부터 시작)
        line: usize,
    },

    /// 백오프 후에도 JSON 디코딩 실패
    #[error("malformed {kind} payload at line {line}: {reason}")]
    MalformedPayload {
        /// 세그먼트 분류
        kind: String,
        /// 마커 라인 번호 (0부터 시작)
        line: usize,
        /// 마지막 디코딩 실패 사유
        reason: String,
    },

    /// 세그먼트 간 불일치 (진행 중인 매치와 다른 종료 ID 등)
    #[error("inconsistent log at line {line}: {reason}")]
    Inconsistency {
        /// 문제가 된 세그먼트의 마커 라인 번호
        line: usize,
        /// 불일치 내용
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 입력 로그가 허용 크기를 초과
    #[error("log too large: {size} bytes (max: {max})")]
    TooLarge {
        /// 실제 크기 (바이트)
        size: u64,
        /// 허용 최대 크기 (바이트)
        max: u64,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 분류 패턴 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<ArenaLogError> for GatheringError {
    fn from(err: ArenaLogError) -> Self {
        match err {
            ArenaLogError::NoJson { kind, line } => GatheringError::Parse(ParseError::MalformedPayload {
                kind,
                line,
                reason: "no json payload".to_owned(),
            }),
            ArenaLogError::MalformedPayload { kind, line, reason } => {
                GatheringError::Parse(ParseError::MalformedPayload { kind, line, reason })
            }
            ArenaLogError::Inconsistency { line, reason } => {
                GatheringError::Parse(ParseError::Inconsistency { line, reason })
            }
            ArenaLogError::Config { field, reason } => {
                GatheringError::Config(ConfigError::InvalidValue { field, reason })
            }
            ArenaLogError::TooLarge { size, max } => GatheringError::Parse(ParseError::TooLarge {
                size: usize::try_from(size).unwrap_or(usize::MAX),
                max: usize::try_from(max).unwrap_or(usize::MAX),
            }),
            ArenaLogError::Io(e) => GatheringError::Io(e),
            ArenaLogError::Regex(e) => GatheringError::Config(ConfigError::InvalidValue {
                field: "classifier.pattern".to_owned(),
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_payload_display() {
        let err = ArenaLogError::MalformedPayload {
            kind: "deck-list".to_owned(),
            line: 42,
            reason: "trailing characters".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("deck-list"));
        assert!(msg.contains("42"));
        assert!(msg.contains("trailing characters"));
    }

    #[test]
    fn no_json_display() {
        let err = ArenaLogError::NoJson {
            kind: "rank-snapshot".to_owned(),
            line: 7,
        };
        assert!(err.to_string().contains("rank-snapshot"));
    }

    #[test]
    fn malformed_converts_to_parse_error() {
        let err = ArenaLogError::MalformedPayload {
            kind: "match-start".to_owned(),
            line: 1,
            reason: "eof".to_owned(),
        };
        let top: GatheringError = err.into();
        assert!(matches!(
            top,
            GatheringError::Parse(ParseError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn config_converts_to_config_error() {
        let err = ArenaLogError::Config {
            field: "prize_window".to_owned(),
            reason: "must be 1-1000".to_owned(),
        };
        let top: GatheringError = err.into();
        assert!(matches!(
            top,
            GatheringError::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn too_large_converts_to_parse_error() {
        let err = ArenaLogError::TooLarge { size: 10, max: 5 };
        let top: GatheringError = err.into();
        assert!(matches!(
            top,
            GatheringError::Parse(ParseError::TooLarge { size: 10, max: 5 })
        ));
    }
}
