#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`segment`]: 마커 라인 기준 무손실 세그먼트 분할, 타임스탬프 파싱
//! - [`classify`]: 우선순위 정규식 테이블 기반 세그먼트 분류
//! - [`extract`]: 노이즈 제거 및 백오프 JSON 디코딩
//! - [`records`]: 세그먼트 분류별 타입 디코더
//! - [`correlate`]: 세그먼트 간 상태 재구성 (랭크, 이벤트, 매치 상태 머신)
//! - [`log`]: 파싱된 로그와 조회 함수 ([`ArenaLog`])
//! - [`upload`]: 업로드 집계 ([`UploadData`])
//! - [`config`]: 재구성 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! raw text -> Segmenter -> Classifier -> [query] Extractor -> Record parser -> Correlator
//!                |             |                  |                               |
//!          marker lines   regex table     noise strip + backoff        latest / replay / state machine
//! ```

pub mod classify;
pub mod config;
pub mod correlate;
pub mod error;
pub mod extract;
pub mod log;
pub mod records;
pub mod segment;
pub mod upload;

// --- 주요 타입 re-export ---

// 로그
pub use log::ArenaLog;
pub use upload::UploadData;

// 설정
pub use config::{LogConfig, LogConfigBuilder};

// 에러
pub use error::ArenaLogError;

// 분할/분류
pub use classify::{Classifier, SegmentType};
pub use segment::{LoggerKind, Segment, Segmented, Segmenter};

// 상관 분석
pub use correlate::{Inconsistency, MatchScan, MatchState, Signal, Transition};
