//! 설정 관리 -- gathering.toml 파싱 및 런타임 설정
//!
//! [`GatheringConfig`]는 로그 재구성 엔진과 CLI의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. 환경변수 (`GATHERING_PARSER_PRIZE_WINDOW=12` 형식)
//! 2. 설정 파일 (`gathering.toml`)
//! 3. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), gathering_core::error::GatheringError> {
//! use gathering_core::config::GatheringConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = GatheringConfig::load("gathering.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = GatheringConfig::parse("[parser]\nprize_window = 12")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, GatheringError};

/// 클레임 프라이즈 세그먼트에서 인벤토리 델타를 찾을 때 되돌아볼 최대 세그먼트 수 상한
pub const MAX_PRIZE_WINDOW: usize = 1_000;

/// Gathering 통합 설정
///
/// `gathering.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatheringConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 로그 파서 설정
    #[serde(default)]
    pub parser: ParserConfig,
}

impl GatheringConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, GatheringError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, GatheringError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GatheringError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                GatheringError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, GatheringError> {
        toml::from_str(toml_str).map_err(|e| {
            GatheringError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `GATHERING_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.general.log_level, "GATHERING_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "GATHERING_GENERAL_LOG_FORMAT");

        override_usize(
            &mut self.parser.prize_window,
            "GATHERING_PARSER_PRIZE_WINDOW",
        );
        override_usize(
            &mut self.parser.course_lookback,
            "GATHERING_PARSER_COURSE_LOOKBACK",
        );
        override_u64(
            &mut self.parser.max_log_bytes,
            "GATHERING_PARSER_MAX_LOG_BYTES",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), GatheringError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.parser.prize_window == 0 || self.parser.prize_window > MAX_PRIZE_WINDOW {
            return Err(ConfigError::InvalidValue {
                field: "parser.prize_window".to_owned(),
                reason: format!("must be between 1 and {MAX_PRIZE_WINDOW}"),
            }
            .into());
        }

        if self.parser.max_log_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "parser.max_log_bytes".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 로그 파서 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// 클레임 프라이즈 직전에 인벤토리 델타를 찾을 세그먼트 수
    pub prize_window: usize,
    /// 매치 시작에서 코스 덱을 찾을 때 되돌아볼 세그먼트 수 (0 = 무제한)
    pub course_lookback: usize,
    /// 한 번에 읽을 로그 파일 최대 크기 (바이트)
    pub max_log_bytes: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            prize_window: 10,
            course_lookback: 0,
            max_log_bytes: 512 * 1024 * 1024, // 512MB
        }
    }
}

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
