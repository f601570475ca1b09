//! 이벤트 재구성 -- 보상 수령 + 직전 인벤토리 변경분

use crate::classify::SegmentType;
use crate::records::{ArenaEvent, InventoryUpdate, parse_claim_prize, parse_inventory_update};
use crate::segment::Segment;

use super::log_malformed;

/// 보상 수령 세그먼트마다 이벤트를 만듭니다.
///
/// 보상은 수령 세그먼트 직전 `prize_window`개 세그먼트 안에서 가장 가까운
/// 인벤토리 변경분입니다. 없거나 디코딩에 실패하면 보상은 `None`입니다.
pub fn collect_events(segments: &[Segment], prize_window: usize) -> Vec<ArenaEvent> {
    let mut events = Vec::new();

    for (i, segment) in segments.iter().enumerate() {
        if segment.kind != SegmentType::EventClaimPrize {
            continue;
        }
        let claim_prize = match parse_claim_prize(segment) {
            Ok(claim) => claim,
            Err(e) => {
                log_malformed(segment, &e);
                continue;
            }
        };
        let prize = find_prize(&segments[i.saturating_sub(prize_window)..i]);
        if prize.is_none() {
            tracing::debug!(
                line = segment.line(),
                event = %claim_prize.internal_event_name,
                "no inventory update near claimed prize"
            );
        }
        events.push(ArenaEvent { claim_prize, prize });
    }

    events
}

fn find_prize(window: &[Segment]) -> Option<InventoryUpdate> {
    let segment = window
        .iter()
        .rev()
        .find(|s| s.kind == SegmentType::InventoryDelta)?;
    parse_inventory_update(segment)
        .inspect_err(|e| log_malformed(segment, e))
        .ok()
}
