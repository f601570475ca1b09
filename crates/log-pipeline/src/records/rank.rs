//! 랭크 스냅샷과 변경분
//!
//! 스냅샷(`Event.GetCombinedRankInfo`)은 드물게 요청되므로, 최신 랭크는
//! 스냅샷 이후의 `Rank.Updated` 변경분을 순서대로 적용해서 얻습니다.

use serde::{Deserialize, Serialize};

use super::de::{lenient_string, null_default};
use crate::error::ArenaLogError;
use crate::extract::decode_segment;
use crate::segment::Segment;

/// 플레이어 랭크 정보 (구성/제한 포맷)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RankInfo {
    pub player_id: Option<String>,
    pub constructed_season_ordinal: Option<u32>,
    pub constructed_class: Option<String>,
    pub constructed_level: Option<u32>,
    pub constructed_step: Option<u32>,
    pub constructed_matches_won: Option<u32>,
    pub constructed_matches_lost: Option<u32>,
    pub constructed_matches_drawn: Option<u32>,
    pub limited_season_ordinal: Option<u32>,
    pub limited_class: Option<String>,
    pub limited_level: Option<u32>,
    pub limited_step: Option<u32>,
    pub limited_matches_won: Option<u32>,
    pub limited_matches_lost: Option<u32>,
    pub limited_matches_drawn: Option<u32>,
}

/// 랭크 변경분이 적용되는 포맷
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankUpdateKind {
    /// 구성 포맷
    Constructed,
    /// 제한 포맷 (드래프트/실드)
    Limited,
    /// 알 수 없는 값
    #[default]
    #[serde(other)]
    Other,
}

/// 랭크 변경분 푸시 (`Incoming Rank.Updated`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RankUpdate {
    #[serde(deserialize_with = "lenient_string")]
    pub player_id: String,
    pub season_ordinal: Option<u32>,
    pub new_class: Option<String>,
    pub old_class: Option<String>,
    pub new_level: Option<u32>,
    pub old_level: Option<u32>,
    pub new_step: Option<u32>,
    pub old_step: Option<u32>,
    pub was_loss_protected: Option<bool>,
    #[serde(deserialize_with = "null_default")]
    pub rank_update_type: RankUpdateKind,
}

impl RankInfo {
    /// 변경분의 구성/제한 분기를 적용합니다.
    ///
    /// 알 수 없는 포맷이면 아무것도 바꾸지 않고 `false`를 반환합니다.
    pub fn apply(&mut self, update: &RankUpdate) -> bool {
        let (season, class, level, step) = match update.rank_update_type {
            RankUpdateKind::Constructed => (
                &mut self.constructed_season_ordinal,
                &mut self.constructed_class,
                &mut self.constructed_level,
                &mut self.constructed_step,
            ),
            RankUpdateKind::Limited => (
                &mut self.limited_season_ordinal,
                &mut self.limited_class,
                &mut self.limited_level,
                &mut self.limited_step,
            ),
            RankUpdateKind::Other => return false,
        };

        if update.season_ordinal.is_some() {
            *season = update.season_ordinal;
        }
        if update.new_class.is_some() {
            class.clone_from(&update.new_class);
        }
        if update.new_level.is_some() {
            *level = update.new_level;
        }
        if update.new_step.is_some() {
            *step = update.new_step;
        }
        if self.player_id.is_none() && !update.player_id.is_empty() {
            self.player_id = Some(update.player_id.clone());
        }
        true
    }
}

/// 랭크 스냅샷 세그먼트를 디코딩합니다.
pub fn parse_rank_info(segment: &Segment) -> Result<RankInfo, ArenaLogError> {
    decode_segment(segment)
}

/// 랭크 변경분 세그먼트를 디코딩합니다.
pub fn parse_rank_update(segment: &Segment) -> Result<RankUpdate, ArenaLogError> {
    decode_segment(segment)
}
