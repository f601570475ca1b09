//! 레코드 파서 -- 세그먼트 분류별 타입 디코더
//!
//! 각 파서는 [`extract`](crate::extract)로 JSON을 복원한 뒤 타입이 있는
//! 레코드로 디코딩합니다. 세그먼트 분류 확인은 호출자 책임이며,
//! 파서는 panic 없이 [`ArenaLogError`](crate::error::ArenaLogError)를 반환합니다.
//!
//! 누락되었거나 `null`인 스칼라 필드는 기본값으로 디코딩합니다.

mod de;

pub mod auth;
pub mod booster;
pub mod collection;
pub mod deck;
pub mod event;
pub mod inventory;
pub mod matches;
pub mod rank;

pub use auth::{AuthPayload, AuthRequest, parse_auth};
pub use booster::{Booster, BoosterCard, parse_booster};
pub use collection::{Collection, parse_collection};
pub use deck::{ArenaDeck, CardSkin, DeckCard, parse_deck_list};
pub use event::{
    ArenaEvent, EventCourse, ModuleInstanceData, WinLossGate, parse_claim_prize,
    parse_event_course,
};
pub use inventory::{
    InventoryBooster, InventoryDelta, InventoryUpdate, PlayerInventory, parse_inventory,
    parse_inventory_update,
};
pub use matches::{
    ArenaMatch, Game, GameObject, GameResult, GreEvent, MatchCompleted, MatchCreated,
    MatchResult, SeenObjects, parse_match_completed, parse_match_end, parse_match_event,
    parse_match_start,
};
pub use rank::{RankInfo, RankUpdate, RankUpdateKind, parse_rank_info, parse_rank_update};
