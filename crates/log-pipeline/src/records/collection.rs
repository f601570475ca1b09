//! 카드 컬렉션 스냅샷

use std::collections::BTreeMap;

use crate::error::ArenaLogError;
use crate::extract::decode_segment;
use crate::segment::Segment;

/// 카드 ID → 보유 수량
pub type Collection = BTreeMap<u32, u32>;

/// 컬렉션 스냅샷 세그먼트를 디코딩합니다.
///
/// 페이로드는 `{"66001": 2, ...}` 형태이며 키는 문자열로 된 카드 ID입니다.
pub fn parse_collection(segment: &Segment) -> Result<Collection, ArenaLogError> {
    decode_segment(segment)
}
