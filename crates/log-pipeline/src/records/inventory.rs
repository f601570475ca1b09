//! 인벤토리 스냅샷과 변경분

use serde::{Deserialize, Serialize};

use super::de::{lenient_string, null_default};
use crate::error::ArenaLogError;
use crate::extract::decode_segment;
use crate::segment::Segment;

/// 플레이어 인벤토리 스냅샷
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerInventory {
    /// 플레이어 ID
    #[serde(deserialize_with = "lenient_string")]
    pub player_id: String,
    /// 커먼 와일드카드
    #[serde(deserialize_with = "null_default")]
    pub wc_common: i64,
    /// 언커먼 와일드카드
    #[serde(deserialize_with = "null_default")]
    pub wc_uncommon: i64,
    /// 레어 와일드카드
    #[serde(deserialize_with = "null_default")]
    pub wc_rare: i64,
    /// 미식 와일드카드
    #[serde(deserialize_with = "null_default")]
    pub wc_mythic: i64,
    /// 골드
    #[serde(deserialize_with = "null_default")]
    pub gold: i64,
    /// 젬
    #[serde(deserialize_with = "null_default")]
    pub gems: i64,
    /// 드래프트 토큰
    #[serde(deserialize_with = "null_default")]
    pub draft_tokens: i64,
    /// 실드 토큰
    #[serde(deserialize_with = "null_default")]
    pub sealed_tokens: i64,
    /// 와일드카드 트랙 위치
    #[serde(deserialize_with = "null_default")]
    pub wc_track_position: i64,
    /// 볼트 진행도 (%)
    #[serde(deserialize_with = "null_default")]
    pub vault_progress: f64,
    /// 보유 부스터
    #[serde(deserialize_with = "null_default")]
    pub boosters: Vec<InventoryBooster>,
}

/// 보유 부스터 (세트별 수량)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryBooster {
    /// 부스터 콜레이션 ID
    #[serde(alias = "CollationId", deserialize_with = "null_default")]
    pub collation_id: i64,
    /// 수량 (변경분에서는 증감량)
    #[serde(alias = "Count", deserialize_with = "null_default")]
    pub count: i64,
}

/// 인벤토리 변경분 푸시 (`Incoming Inventory.Updated`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryUpdate {
    /// 변경 내용
    #[serde(alias = "Delta", deserialize_with = "null_default")]
    pub delta: InventoryDelta,
    /// 변경 사유 (예: `EventPayout`)
    #[serde(alias = "Context", deserialize_with = "lenient_string")]
    pub context: String,
}

/// 인벤토리 증감량
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryDelta {
    #[serde(alias = "GemsDelta", deserialize_with = "null_default")]
    pub gems_delta: i64,
    #[serde(alias = "GoldDelta", deserialize_with = "null_default")]
    pub gold_delta: i64,
    #[serde(alias = "BoosterDelta", deserialize_with = "null_default")]
    pub booster_delta: Vec<InventoryBooster>,
    /// 추가된 카드 ID (중복 가능)
    #[serde(alias = "CardsAdded", deserialize_with = "null_default")]
    pub cards_added: Vec<u32>,
    #[serde(alias = "DecksAdded", deserialize_with = "null_default")]
    pub decks_added: Vec<serde_json::Value>,
    #[serde(alias = "VanityItemsAdded", deserialize_with = "null_default")]
    pub vanity_items_added: Vec<serde_json::Value>,
    #[serde(alias = "VanityItemsRemoved", deserialize_with = "null_default")]
    pub vanity_items_removed: Vec<serde_json::Value>,
    #[serde(alias = "DraftTokensDelta", deserialize_with = "null_default")]
    pub draft_tokens_delta: i64,
    #[serde(alias = "SealedTokensDelta", deserialize_with = "null_default")]
    pub sealed_tokens_delta: i64,
    #[serde(alias = "VaultProgressDelta", deserialize_with = "null_default")]
    pub vault_progress_delta: f64,
    #[serde(alias = "WcCommonDelta", deserialize_with = "null_default")]
    pub wc_common_delta: i64,
    #[serde(alias = "WcUncommonDelta", deserialize_with = "null_default")]
    pub wc_uncommon_delta: i64,
    #[serde(alias = "WcRareDelta", deserialize_with = "null_default")]
    pub wc_rare_delta: i64,
    #[serde(alias = "WcMythicDelta", deserialize_with = "null_default")]
    pub wc_mythic_delta: i64,
}

/// 인벤토리 스냅샷 세그먼트를 디코딩합니다.
pub fn parse_inventory(segment: &Segment) -> Result<PlayerInventory, ArenaLogError> {
    decode_segment(segment)
}

/// 인벤토리 변경분 세그먼트를 디코딩합니다.
pub fn parse_inventory_update(segment: &Segment) -> Result<InventoryUpdate, ArenaLogError> {
    decode_segment(segment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::SegmentType;
    use crate::test_support::segment;

    #[test]
    fn parses_inventory_snapshot() {
        let seg = segment(
            SegmentType::InventorySnapshot,
            r#"<== PlayerInventory.GetPlayerInventory(12)
{
  "playerId": "ABCDEF",
  "wcCommon": 12,
  "wcUncommon": 9,
  "wcRare": 3,
  "wcMythic": 1,
  "gold": 4550,
  "gems": 200,
  "draftTokens": 0,
  "sealedTokens": 0,
  "wcTrackPosition": 4,
  "vaultProgress": 37.4,
  "boosters": [{"collationId": 100006, "count": 3}],
  "vanityItems": {"pets": []}
}
"#,
        );
        let inventory = parse_inventory(&seg).unwrap();
        assert_eq!(inventory.player_id, "ABCDEF");
        assert_eq!(inventory.gold, 4550);
        assert_eq!(inventory.wc_mythic, 1);
        assert!((inventory.vault_progress - 37.4).abs() < f64::EPSILON);
        assert_eq!(inventory.boosters[0].collation_id, 100006);
    }

    #[test]
    fn null_fields_decode_to_defaults() {
        let seg = segment(
            SegmentType::InventorySnapshot,
            r#"{"playerId": null, "gold": null, "boosters": null}"#,
        );
        let inventory = parse_inventory(&seg).unwrap();
        assert!(inventory.player_id.is_empty());
        assert_eq!(inventory.gold, 0);
        assert!(inventory.boosters.is_empty());
    }

    #[test]
    fn parses_inventory_update() {
        let seg = segment(
            SegmentType::InventoryDelta,
            r#"(-1) Incoming Inventory.Updated {
  "delta": {
    "gemsDelta": 0,
    "boosterDelta": [{"collationId": 100007, "count": 1}],
    "cardsAdded": [66001, 66001],
    "decksAdded": [],
    "vanityItemsAdded": [],
    "vanityItemsRemoved": [],
    "draftTokensDelta": 0,
    "goldDelta": 1000,
    "sealedTokensDelta": 0,
    "vaultProgressDelta": 0.5,
    "wcCommonDelta": 0,
    "wcUncommonDelta": 0,
    "wcRareDelta": 1,
    "wcMythicDelta": 0
  },
  "context": "EventPrize"
}"#,
        );
        let update = parse_inventory_update(&seg).unwrap();
        assert_eq!(update.delta.gold_delta, 1000);
        assert_eq!(update.delta.cards_added, vec![66001, 66001]);
        assert_eq!(update.delta.booster_delta[0].count, 1);
        assert_eq!(update.context, "EventPrize");
    }

    #[test]
    fn accepts_pascal_case_delta() {
        let seg = segment(
            SegmentType::InventoryDelta,
            r#"{"Delta": {"GoldDelta": 250, "CardsAdded": [1]}, "Context": "PurchasedBundle"}"#,
        );
        let update = parse_inventory_update(&seg).unwrap();
        assert_eq!(update.delta.gold_delta, 250);
        assert_eq!(update.delta.cards_added, vec![1]);
        assert_eq!(update.context, "PurchasedBundle");
    }
}
