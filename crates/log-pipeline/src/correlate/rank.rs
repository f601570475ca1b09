//! 랭크 재구성 -- 스냅샷 + 순차 변경분

use crate::classify::SegmentType;
use crate::records::{RankInfo, parse_rank_info, parse_rank_update};
use crate::segment::Segment;

use super::log_malformed;

/// 순방향으로 스냅샷과 변경분을 적용해 최신 랭크를 계산합니다.
///
/// 스냅샷은 누적 레코드를 대체하고, 변경분은 `rankUpdateType`에 맞는 분기에
/// 적용됩니다. 스냅샷 없이 변경분이 먼저 나오면 빈 레코드에서 시작합니다.
/// 둘 다 없으면 `None`.
pub fn replay_rank(segments: &[Segment]) -> Option<RankInfo> {
    let mut running: Option<RankInfo> = None;

    for segment in segments {
        match segment.kind {
            SegmentType::RankSnapshot => match parse_rank_info(segment) {
                Ok(info) => running = Some(info),
                Err(e) => log_malformed(segment, &e),
            },
            SegmentType::RankDelta => match parse_rank_update(segment) {
                Ok(update) => {
                    if !running.get_or_insert_with(RankInfo::default).apply(&update) {
                        tracing::debug!(
                            line = segment.line(),
                            "rank update with unknown format ignored"
                        );
                    }
                }
                Err(e) => log_malformed(segment, &e),
            },
            _ => {}
        }
    }

    running
}
