//! 부스터 개봉 기록

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de::{lenient_string, null_default};
use crate::error::ArenaLogError;
use crate::extract::decode_segment;
use crate::segment::Segment;

/// 부스터에서 나온 카드
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoosterCard {
    #[serde(deserialize_with = "null_default")]
    pub grp_id: u32,
    /// 중복 카드 대신 지급된 골드
    #[serde(deserialize_with = "null_default")]
    pub gold_awarded: i64,
    /// 중복 카드 대신 지급된 젬
    #[serde(deserialize_with = "null_default")]
    pub gems_awarded: i64,
    #[serde(deserialize_with = "lenient_string")]
    pub set: String,
}

/// 개봉한 부스터
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Booster {
    #[serde(deserialize_with = "null_default")]
    pub cards_opened: Vec<BoosterCard>,
    #[serde(deserialize_with = "null_default")]
    pub total_vault_progress: f64,
    #[serde(deserialize_with = "null_default")]
    pub wild_card_track_moves: i64,
    #[serde(deserialize_with = "null_default")]
    pub wild_card_track_position: i64,
    #[serde(deserialize_with = "null_default")]
    pub wild_card_track_commons: i64,
    #[serde(alias = "wildCardTrackUnCommons", deserialize_with = "null_default")]
    pub wild_card_track_uncommons: i64,
    #[serde(deserialize_with = "null_default")]
    pub wild_card_track_rares: i64,
    #[serde(deserialize_with = "null_default")]
    pub wild_card_track_mythics: i64,
    /// 개봉 시각 (세그먼트 마커 라인에서 복사)
    #[serde(skip_deserializing)]
    pub opened_at: Option<DateTime<Utc>>,
}

/// 부스터 개봉 세그먼트를 디코딩합니다.
pub fn parse_booster(segment: &Segment) -> Result<Booster, ArenaLogError> {
    let mut booster: Booster = decode_segment(segment)?;
    booster.opened_at = segment.timestamp;
    Ok(booster)
}
