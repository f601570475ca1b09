//! 덱 목록
//!
//! 덱의 카드 목록은 두 가지 형태로 기록됩니다.
//! - 이전 형식: `[카드ID, 수량, 카드ID, 수량, ...]` 평면 정수 배열
//! - 이후 형식: `[{"id": "66001", "quantity": 4}, ...]` 객체 배열 (ID는 문자열 또는 숫자)
//!
//! 두 형식 모두 디코딩 시점에 [`DeckCard`] 목록으로 정규화합니다.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use super::de::{lenient_string, null_default};
use crate::error::ArenaLogError;
use crate::extract::decode_segment;
use crate::segment::Segment;

/// 덱 구성 카드 (카드 ID, 수량)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DeckCard {
    pub id: u32,
    pub quantity: u32,
}

/// 카드 스킨 (카드 ID별 아트 변형)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardSkin {
    #[serde(deserialize_with = "null_default")]
    pub grp_id: u32,
    #[serde(deserialize_with = "lenient_string")]
    pub ccv: String,
}

/// 플레이어 덱
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArenaDeck {
    /// 덱 ID (UUID)
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    /// 덱 이름
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    pub description: Option<String>,
    pub format: Option<String>,
    /// 덱 타일로 표시할 카드 ID
    pub deck_tile_id: Option<u32>,
    /// 메인 덱
    #[serde(deserialize_with = "deck_cards")]
    pub main_deck: Vec<DeckCard>,
    /// 사이드보드
    #[serde(deserialize_with = "deck_cards")]
    pub sideboard: Vec<DeckCard>,
    #[serde(deserialize_with = "null_default")]
    pub card_skins: Vec<CardSkin>,
    pub card_back: Option<String>,
}

impl ArenaDeck {
    /// 메인 덱 총 카드 수
    pub fn main_deck_size(&self) -> u32 {
        self.main_deck.iter().map(|c| c.quantity).sum()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCards {
    Flat(Vec<u32>),
    Objects(Vec<RawCard>),
}

#[derive(Deserialize)]
struct RawCard {
    id: RawCardId,
    quantity: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCardId {
    Number(u32),
    Text(String),
}

/// 두 가지 카드 목록 형식을 [`DeckCard`] 목록으로 정규화합니다.
fn deck_cards<'de, D>(deserializer: D) -> Result<Vec<DeckCard>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<RawCards>::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    match raw {
        RawCards::Flat(values) => {
            if values.len() % 2 != 0 {
                return Err(D::Error::custom(format!(
                    "flat card list has odd length {}",
                    values.len()
                )));
            }
            Ok(values
                .chunks_exact(2)
                .map(|pair| DeckCard {
                    id: pair[0],
                    quantity: pair[1],
                })
                .collect())
        }
        RawCards::Objects(cards) => cards
            .into_iter()
            .map(|card| {
                let id = match card.id {
                    RawCardId::Number(id) => id,
                    RawCardId::Text(text) => text.trim().parse().map_err(|_| {
                        D::Error::custom(format!("card id '{text}' is not a number"))
                    })?,
                };
                Ok(DeckCard {
                    id,
                    quantity: card.quantity,
                })
            })
            .collect(),
    }
}

/// 덱 목록 세그먼트를 디코딩합니다. ID가 없는 덱은 제외합니다.
pub fn parse_deck_list(segment: &Segment) -> Result<Vec<ArenaDeck>, ArenaLogError> {
    let decks: Vec<ArenaDeck> = decode_segment(segment)?;
    Ok(decks.into_iter().filter(|d| !d.id.is_empty()).collect())
}
