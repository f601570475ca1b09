//! 상관 분석 -- 여러 세그먼트에 걸친 상태를 재구성합니다.
//!
//! 조회 전략:
//! - 최신 우선 (컬렉션, 인벤토리, 덱, 최신 부스터): 역방향으로 처음 디코딩된 세그먼트
//! - 첫 일치 (인증): 순방향으로 처음 디코딩된 세그먼트
//! - 순차 적용 ([`rank`]): 스냅샷 이후 변경분을 순서대로 적용
//! - 윈도우 역방향 결합 ([`events`]): 보상 수령 직전의 인벤토리 변경분
//! - 상태 머신 ([`matches`]): 매치 시작/턴/게임 종료/매치 종료 누적
//!
//! 디코딩에 실패한 세그먼트는 `warn` 로그를 남기고 건너뜁니다.

pub mod events;
pub mod matches;
pub mod rank;

use crate::classify::SegmentType;
use crate::error::ArenaLogError;
use crate::segment::Segment;

pub use events::collect_events;
pub use matches::{
    Inconsistency, MatchScan, MatchSet, MatchState, Signal, Transition, scan_matches,
};
pub use rank::replay_rank;

/// 디코딩 실패를 기록합니다.
pub(crate) fn log_malformed(segment: &Segment, err: &ArenaLogError) {
    tracing::warn!(
        kind = %segment.kind,
        line = segment.line(),
        reason = %err,
        "skipping malformed segment"
    );
}

/// 역방향으로 `kind` 세그먼트를 찾아 처음 디코딩에 성공한 값을 반환합니다.
pub fn latest<T>(
    segments: &[Segment],
    kind: SegmentType,
    parse: impl Fn(&Segment) -> Result<T, ArenaLogError>,
) -> Option<T> {
    segments
        .iter()
        .rev()
        .filter(|s| s.kind == kind)
        .find_map(|s| parse(s).inspect_err(|e| log_malformed(s, e)).ok())
}

/// 순방향으로 `kind` 세그먼트를 찾아 처음 디코딩에 성공한 값을 반환합니다.
pub fn first<T>(
    segments: &[Segment],
    kind: SegmentType,
    parse: impl Fn(&Segment) -> Result<T, ArenaLogError>,
) -> Option<T> {
    segments
        .iter()
        .filter(|s| s.kind == kind)
        .find_map(|s| parse(s).inspect_err(|e| log_malformed(s, e)).ok())
}

/// `kind` 세그먼트를 로그 순서대로 모두 디코딩합니다. 실패한 세그먼트는 제외합니다.
pub fn all<T>(
    segments: &[Segment],
    kind: SegmentType,
    parse: impl Fn(&Segment) -> Result<T, ArenaLogError>,
) -> Vec<T> {
    segments
        .iter()
        .filter(|s| s.kind == kind)
        .filter_map(|s| parse(s).inspect_err(|e| log_malformed(s, e)).ok())
        .collect()
}
