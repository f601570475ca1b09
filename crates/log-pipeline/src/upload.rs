//! 업로드 집계
//!
//! 모든 조회 결과를 하나의 레코드로 묶습니다. 전송은 외부 업로더가 담당하며,
//! 이 크레이트는 네트워크에 접근하지 않습니다.

use serde::Serialize;

use crate::log::ArenaLog;
use crate::records::{
    ArenaDeck, ArenaEvent, ArenaMatch, AuthRequest, Booster, Collection, PlayerInventory,
    RankInfo,
};

/// 업로드용 집계 레코드
///
/// 찾지 못한 단일 집계는 `null`, 목록 집계는 빈 배열로 직렬화됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadData {
    /// 게임 프로세스 실행 여부
    pub is_playing: bool,
    pub collection: Option<Collection>,
    /// 덱 목록
    pub deck: Option<Vec<ArenaDeck>>,
    pub inventory: Option<PlayerInventory>,
    pub rank: Option<RankInfo>,
    pub auth: Option<AuthRequest>,
    pub matches: Vec<ArenaMatch>,
    pub events: Vec<ArenaEvent>,
    pub boosters: Vec<Booster>,
}

impl UploadData {
    /// 로그의 모든 조회를 실행해 집계를 만듭니다.
    pub fn build(log: &ArenaLog, is_playing: bool) -> Self {
        Self {
            is_playing,
            collection: log.collection(),
            deck: log.decks(),
            inventory: log.inventory(),
            rank: log.rank(),
            auth: log.auth().map(AuthRequest::new),
            matches: log.matches(),
            events: log.events(),
            boosters: log.boosters(),
        }
    }

    /// 로그에서 찾지 못한 단일 집계 이름
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("collection", self.collection.is_none()),
            ("deck", self.deck.is_none()),
            ("inventory", self.inventory.is_none()),
            ("rank", self.rank.is_none()),
            ("auth", self.auth.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect()
    }
}
