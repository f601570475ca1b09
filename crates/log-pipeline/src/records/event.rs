//! 이벤트 코스와 클레임 프라이즈
//!
//! 이벤트 참가(`Event.Join`), 참가비 지불(`Event.PayEntry`), 코스 조회
//! (`Event.GetPlayerCourse`), 덱 제출(`Event.DeckSubmit`), 보상 수령
//! (`Event.ClaimPrize`) 응답은 모두 같은 코스 레코드 형태를 공유합니다.

use serde::{Deserialize, Serialize};

use super::de::{lenient_string, null_default};
use super::deck::ArenaDeck;
use super::inventory::InventoryUpdate;
use crate::error::ArenaLogError;
use crate::extract::decode_segment;
use crate::segment::Segment;

/// 이벤트 코스 상태
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EventCourse {
    /// 코스 ID
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    /// 내부 이벤트 이름 (예: `QuickDraft_RNA_20190208`)
    #[serde(deserialize_with = "lenient_string")]
    pub internal_event_name: String,
    /// 업로드 키는 `ModuleinstanceData` (수신 서버가 기대하는 철자)
    #[serde(
        rename(serialize = "ModuleinstanceData"),
        alias = "ModuleinstanceData",
        deserialize_with = "null_default"
    )]
    pub module_instance_data: ModuleInstanceData,
    #[serde(deserialize_with = "lenient_string")]
    pub current_event_state: String,
    #[serde(deserialize_with = "lenient_string")]
    pub current_module: String,
    /// 드래프트/실드 카드 풀 (업로드 키는 `Cardpool`)
    #[serde(
        rename(serialize = "Cardpool"),
        alias = "Cardpool",
        deserialize_with = "null_default"
    )]
    pub card_pool: Vec<u32>,
    /// 이벤트에 제출한 덱
    pub course_deck: Option<ArenaDeck>,
}

/// 이벤트 모듈 진행 데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ModuleInstanceData {
    /// 참가비 지불 수단 (`Gold`, `Gems` 등)
    #[serde(deserialize_with = "lenient_string")]
    pub has_paid_entry: String,
    #[serde(deserialize_with = "null_default")]
    pub deck_selected: bool,
    pub win_loss_gate: Option<WinLossGate>,
}

/// 이벤트 승패 기록
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct WinLossGate {
    #[serde(deserialize_with = "null_default")]
    pub max_wins: u32,
    #[serde(deserialize_with = "null_default")]
    pub max_losses: u32,
    #[serde(deserialize_with = "null_default")]
    pub current_wins: u32,
    #[serde(deserialize_with = "null_default")]
    pub current_losses: u32,
    /// 이벤트에서 처리된 매치 ID
    #[serde(alias = "ProcessedMatchIDs", deserialize_with = "null_default")]
    pub processed_match_ids: Vec<String>,
}

/// 보상을 수령한 이벤트
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArenaEvent {
    /// 보상 수령 시점의 코스 상태
    pub claim_prize: EventCourse,
    /// 보상으로 받은 인벤토리 변경분 (찾지 못하면 `None`)
    pub prize: Option<InventoryUpdate>,
}

/// 코스 레코드 세그먼트(참가, 참가비, 코스 조회, 덱 제출)를 디코딩합니다.
pub fn parse_event_course(segment: &Segment) -> Result<EventCourse, ArenaLogError> {
    decode_segment(segment)
}

/// 클레임 프라이즈 세그먼트를 디코딩합니다.
pub fn parse_claim_prize(segment: &Segment) -> Result<EventCourse, ArenaLogError> {
    decode_segment(segment)
}
