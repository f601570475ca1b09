//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 로그 파이프라인은 이 상수를 사용하여 `metrics::counter!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! 메트릭은 세그먼트 분할 단계에서만 기록됩니다. 조회(query)는 부수 효과가 없습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `gathering_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(gathering_core::metrics::LOG_BYTES_INGESTED_TOTAL).increment(4096);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 로거 종류 레이블 키 (primary, secondary)
pub const LABEL_LOGGER: &str = "logger";

/// 세그먼트 분류 레이블 키 (collection-snapshot, match-start, ...)
pub const LABEL_SEGMENT_KIND: &str = "kind";

// ─── 로그 파이프라인 메트릭 ─────────────────────────────────────────

/// 분할된 세그먼트 수 (counter, label: logger)
pub const LOG_SEGMENTS_TOTAL: &str = "gathering_log_segments_total";

/// 분류된 세그먼트 수 (counter, label: kind)
pub const LOG_SEGMENTS_CLASSIFIED_TOTAL: &str = "gathering_log_segments_classified_total";

/// 입력된 로그 바이트 수 (counter)
pub const LOG_BYTES_INGESTED_TOTAL: &str = "gathering_log_bytes_ingested_total";

/// 전체 분할 + 분류 소요 시간 (histogram, 초)
pub const LOG_PARSE_DURATION_SECONDS: &str = "gathering_log_parse_duration_seconds";

/// 파싱 소요 시간 히스토그램 버킷 (초)
///
/// 수 KB 로그부터 수백 MB 로그까지를 포괄합니다.
pub const PARSE_DURATION_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0];

/// 모든 메트릭의 설명을 등록합니다.
///
/// 레코더 설치 직후 한 번 호출합니다. 레코더가 없으면 아무 일도 하지 않습니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        LOG_SEGMENTS_TOTAL,
        "Total number of log segments split out of the client log"
    );
    describe_counter!(
        LOG_SEGMENTS_CLASSIFIED_TOTAL,
        "Segments per classified payload kind"
    );
    describe_counter!(
        LOG_BYTES_INGESTED_TOTAL,
        "Total bytes of client log text segmented"
    );
    describe_histogram!(
        LOG_PARSE_DURATION_SECONDS,
        "Time spent splitting and classifying one log snapshot in seconds"
    );
}
