//! Gathering 공통 크레이트
//!
//! 로그 재구성 엔진과 CLI가 함께 쓰는 에러 타입, 설정, 메트릭 이름을 제공합니다.

pub mod config;
pub mod error;
pub mod metrics;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, GatheringError, ParseError};

// 설정
pub use config::{GatheringConfig, GeneralConfig, ParserConfig};
