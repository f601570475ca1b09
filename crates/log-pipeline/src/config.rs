//! 로그 재구성 설정
//!
//! [`LogConfig`]는 core의 [`ParserConfig`](gathering_core::config::ParserConfig)를
//! 기반으로 상관 분석 단계의 설정을 제공합니다.
//!
//! # 사용 예시
//! ```
//! use gathering_core::config::GatheringConfig;
//! use gathering_log_pipeline::config::LogConfig;
//!
//! let core_config = GatheringConfig::default();
//! let config = LogConfig::from_core(&core_config.parser);
//! assert_eq!(config.prize_window, 10);
//! ```

use serde::{Deserialize, Serialize};

use gathering_core::config::{MAX_PRIZE_WINDOW, ParserConfig};

use crate::error::ArenaLogError;

/// 로그 재구성 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// 클레임 프라이즈 직전에 인벤토리 델타를 찾을 세그먼트 수
    pub prize_window: usize,
    /// 매치 시작에서 코스 덱을 찾을 때 되돌아볼 세그먼트 수 (`None` = 무제한)
    pub course_lookback: Option<usize>,
    /// 파일에서 읽을 로그 최대 크기 (바이트)
    pub max_log_bytes: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::from_core(&ParserConfig::default())
    }
}

impl LogConfig {
    /// core의 `ParserConfig`에서 설정을 생성합니다.
    ///
    /// `course_lookback = 0`은 무제한(`None`)으로 해석합니다.
    pub fn from_core(core: &ParserConfig) -> Self {
        Self {
            prize_window: core.prize_window,
            course_lookback: (core.course_lookback > 0).then_some(core.course_lookback),
            max_log_bytes: core.max_log_bytes,
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ArenaLogError> {
        if self.prize_window == 0 || self.prize_window > MAX_PRIZE_WINDOW {
            return Err(ArenaLogError::Config {
                field: "prize_window".to_owned(),
                reason: format!("must be 1-{}", MAX_PRIZE_WINDOW),
            });
        }

        if self.course_lookback == Some(0) {
            return Err(ArenaLogError::Config {
                field: "course_lookback".to_owned(),
                reason: "must be greater than 0 when set".to_owned(),
            });
        }

        if self.max_log_bytes == 0 {
            return Err(ArenaLogError::Config {
                field: "max_log_bytes".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        Ok(())
    }
}

/// 로그 재구성 설정 빌더
#[derive(Default)]
pub struct LogConfigBuilder {
    config: LogConfig,
}

impl LogConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 프라이즈 탐색 윈도우를 설정합니다.
    pub fn prize_window(mut self, window: usize) -> Self {
        self.config.prize_window = window;
        self
    }

    /// 코스 덱 역방향 탐색 한도를 설정합니다.
    pub fn course_lookback(mut self, lookback: Option<usize>) -> Self {
        self.config.course_lookback = lookback;
        self
    }

    /// 로그 최대 크기를 설정합니다.
    pub fn max_log_bytes(mut self, bytes: u64) -> Self {
        self.config.max_log_bytes = bytes;
        self
    }

    /// 설정을 검증하고 `LogConfig`를 생성합니다.
    pub fn build(self) -> Result<LogConfig, ArenaLogError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LogConfig::default();
        config.validate().unwrap();
        assert_eq!(config.prize_window, 10);
        assert_eq!(config.course_lookback, None);
    }

    #[test]
    fn from_core_preserves_values() {
        let core = ParserConfig {
            prize_window: 4,
            course_lookback: 250,
            ..Default::default()
        };
        let config = LogConfig::from_core(&core);
        assert_eq!(config.prize_window, 4);
        assert_eq!(config.course_lookback, Some(250));
    }

    #[test]
    fn from_core_zero_lookback_is_unbounded() {
        let core = ParserConfig {
            course_lookback: 0,
            ..Default::default()
        };
        assert_eq!(LogConfig::from_core(&core).course_lookback, None);
    }

    #[test]
    fn validate_rejects_zero_prize_window() {
        let config = LogConfig {
            prize_window: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_lookback() {
        let config = LogConfig {
            course_lookback: Some(0),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("course_lookback"));
    }

    #[test]
    fn builder_creates_valid_config() {
        let config = LogConfigBuilder::new()
            .prize_window(3)
            .course_lookback(Some(100))
            .max_log_bytes(1024)
            .build()
            .unwrap();
        assert_eq!(config.prize_window, 3);
        assert_eq!(config.course_lookback, Some(100));
        assert_eq!(config.max_log_bytes, 1024);
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let result = LogConfigBuilder::new()
            .prize_window(MAX_PRIZE_WINDOW + 1)
            .build();
        assert!(result.is_err());
    }
}
