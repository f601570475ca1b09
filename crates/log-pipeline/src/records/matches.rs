//! 매치 레코드
//!
//! 매치 정보는 여러 세그먼트에 흩어져 있습니다.
//! - 매치 시작 (`Incoming Event.MatchCreated`): 매치 ID, 상대 정보
//! - 턴 이벤트 (GRE 게임 상태 메시지): 관찰한 게임 오브젝트
//! - 게임 종료 (`DuelScene.GameStop`): 게임 단위 결과
//! - 매치 종료 (`MatchGameRoomStateType_MatchCompleted`): 매치 단위 결과
//!
//! 이 모듈은 세그먼트별 디코더와 누적 대상 타입을 제공하며,
//! 세그먼트 간 연결은 [`correlate::matches`](crate::correlate::matches)가 담당합니다.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de::{lenient_string, null_default};
use super::deck::ArenaDeck;
use crate::error::ArenaLogError;
use crate::extract::decode_segment;
use crate::segment::Segment;

/// 카드 오브젝트 타입
pub const CARD_OBJECT_TYPE: &str = "GameObjectType_Card";

/// 매치 단위 결과 스코프
pub const MATCH_SCOPE: &str = "MatchScope_Match";

/// 매치 시작 푸시
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchCreated {
    #[serde(deserialize_with = "lenient_string")]
    pub match_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub opponent_screen_name: String,
    /// 상대가 하우스 계정인지
    #[serde(deserialize_with = "null_default")]
    pub opponent_is_wotc: bool,
    #[serde(deserialize_with = "lenient_string")]
    pub opponent_ranking_class: String,
    #[serde(deserialize_with = "null_default")]
    pub opponent_ranking_tier: i64,
    #[serde(deserialize_with = "null_default")]
    pub opponent_mythic_percentile: f64,
    #[serde(deserialize_with = "null_default")]
    pub opponent_mythic_leaderboard_place: i64,
    #[serde(deserialize_with = "lenient_string")]
    pub event_id: String,
}

/// 게임 내 오브젝트
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameObject {
    #[serde(deserialize_with = "null_default")]
    pub instance_id: u32,
    /// 카드 ID (토큰/능력 등은 없을 수 있음)
    pub grp_id: Option<u32>,
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub object_type: String,
    #[serde(deserialize_with = "null_default")]
    pub zone_id: u32,
    #[serde(deserialize_with = "lenient_string")]
    pub visibility: String,
    #[serde(deserialize_with = "null_default")]
    pub owner_seat_id: u32,
}

impl GameObject {
    /// 카드 ID가 있는 카드 오브젝트인지
    pub fn is_card(&self) -> bool {
        self.object_type == CARD_OBJECT_TYPE && self.grp_id.is_some_and(|id| id != 0)
    }
}

/// 턴 이벤트 (GRE -> 클라이언트 메시지 묶음)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GreEvent {
    #[serde(deserialize_with = "lenient_string")]
    pub transaction_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub timestamp: String,
    #[serde(deserialize_with = "null_default")]
    pub gre_to_client_event: GreToClientEvent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GreToClientEvent {
    #[serde(deserialize_with = "null_default")]
    pub gre_to_client_messages: Vec<GreMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GreMessage {
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub message_type: String,
    pub game_state_message: Option<GameStateMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameStateMessage {
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub state_type: String,
    pub game_info: Option<GameInfo>,
    #[serde(deserialize_with = "null_default")]
    pub game_objects: Vec<GameObject>,
    pub turn_info: Option<TurnInfo>,
    #[serde(deserialize_with = "null_default")]
    pub players: Vec<PlayerState>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameInfo {
    #[serde(alias = "matchID", deserialize_with = "lenient_string")]
    pub match_id: String,
    pub game_number: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TurnInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub phase: String,
    #[serde(deserialize_with = "lenient_string")]
    pub step: String,
    #[serde(deserialize_with = "null_default")]
    pub turn_number: u32,
    #[serde(deserialize_with = "null_default")]
    pub active_player: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerState {
    #[serde(deserialize_with = "null_default")]
    pub life_total: i64,
    #[serde(deserialize_with = "null_default")]
    pub system_seat_number: u32,
    #[serde(deserialize_with = "null_default")]
    pub team_id: u32,
    #[serde(deserialize_with = "null_default")]
    pub controller_seat_id: u32,
}

impl GreEvent {
    /// 메시지에 포함된 카드 오브젝트
    pub fn card_objects(&self) -> impl Iterator<Item = &GameObject> {
        self.game_states()
            .flat_map(|gsm| gsm.game_objects.iter())
            .filter(|obj| obj.is_card())
    }

    /// 메시지가 가리키는 매치 ID (게임 정보가 있는 첫 메시지 기준)
    pub fn match_id(&self) -> Option<&str> {
        self.game_states()
            .filter_map(|gsm| gsm.game_info.as_ref())
            .map(|info| info.match_id.as_str())
            .find(|id| !id.is_empty())
    }

    fn game_states(&self) -> impl Iterator<Item = &GameStateMessage> {
        self.gre_to_client_event
            .gre_to_client_messages
            .iter()
            .filter_map(|m| m.game_state_message.as_ref())
    }
}

/// 게임 종료 결과 (`DuelScene.GameStop`의 `params.payloadObject`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameResult {
    #[serde(deserialize_with = "lenient_string")]
    pub match_id: String,
    pub seat_id: Option<u32>,
    pub team_id: Option<u32>,
    pub game_number: Option<u32>,
    pub winning_team_id: Option<u32>,
    pub winning_reason: Option<String>,
    pub turn_count: Option<u32>,
    pub seconds_count: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameStop {
    params: GameStopParams,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameStopParams {
    payload_object: GameResult,
}

/// 매치 단위 결과 항목
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchResult {
    /// `MatchScope_Game` 또는 `MatchScope_Match`
    #[serde(deserialize_with = "lenient_string")]
    pub scope: String,
    #[serde(deserialize_with = "lenient_string")]
    pub result: String,
    pub winning_team_id: Option<u32>,
}

/// 매치 종료 (게임룸 상태 `MatchCompleted`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCompleted {
    pub match_id: String,
    pub reason: String,
    pub results: Vec<MatchResult>,
}

impl MatchCompleted {
    /// 매치 스코프 승리 팀
    pub fn match_winner(&self) -> Option<u32> {
        self.results
            .iter()
            .find(|r| r.scope == MATCH_SCOPE)
            .and_then(|r| r.winning_team_id)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoomStateChanged {
    match_game_room_state_changed_event: RoomEvent,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoomEvent {
    game_room_info: RoomInfo,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RoomInfo {
    game_room_config: Option<RoomConfig>,
    final_match_result: Option<FinalMatchResult>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RoomConfig {
    #[serde(deserialize_with = "lenient_string")]
    match_id: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct FinalMatchResult {
    #[serde(deserialize_with = "lenient_string")]
    match_id: String,
    #[serde(deserialize_with = "lenient_string")]
    match_completed_reason: String,
    #[serde(deserialize_with = "null_default")]
    result_list: Vec<MatchResult>,
}

/// 좌석별 관찰 오브젝트
///
/// `(소유 좌석, 카드 ID)`로 중복을 제거합니다. 같은 카드가 여러 인스턴스로
/// 여러 번 보여도 한 항목만 남습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SeenObjects(BTreeMap<u32, Vec<GameObject>>);

impl SeenObjects {
    /// 카드 오브젝트를 추가합니다. 새 항목이면 `true`.
    pub fn insert(&mut self, object: &GameObject) -> bool {
        if !object.is_card() {
            return false;
        }
        let seat = self.0.entry(object.owner_seat_id).or_default();
        if seat.iter().any(|o| o.grp_id == object.grp_id) {
            return false;
        }
        seat.push(object.clone());
        true
    }

    /// 전체 항목 수
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 해당 좌석의 관찰 오브젝트
    pub fn seat(&self, seat: u32) -> &[GameObject] {
        self.0.get(&seat).map(Vec::as_slice).unwrap_or_default()
    }

    /// 관찰 오브젝트가 있는 좌석
    pub fn seats(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.keys().copied()
    }

    /// 자신의 좌석을 제외하고 상대 오브젝트만 남깁니다.
    pub fn retain_opponents(&mut self, own_seat: u32) {
        self.0.remove(&own_seat);
    }
}

/// 매치 내 개별 게임
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// 매치 내 게임 번호 (1부터 시작)
    pub game_number: u32,
    pub seat_id: Option<u32>,
    pub team_id: Option<u32>,
    pub winning_team_id: Option<u32>,
    pub winning_reason: Option<String>,
    /// 플레이어 팀의 승리 여부 (팀 정보가 없으면 `None`)
    pub won: Option<bool>,
    pub turn_count: Option<u32>,
    pub seconds_count: Option<u32>,
    pub seen_objects: SeenObjects,
}

impl Game {
    pub fn new(game_number: u32) -> Self {
        Self {
            game_number,
            ..Default::default()
        }
    }

    /// 게임 종료 결과를 반영합니다.
    pub fn finish(&mut self, result: &GameResult) {
        if let Some(number) = result.game_number {
            self.game_number = number;
        }
        self.seat_id = result.seat_id;
        self.team_id = result.team_id;
        self.winning_team_id = result.winning_team_id;
        self.winning_reason = result.winning_reason.clone();
        self.turn_count = result.turn_count;
        self.seconds_count = result.seconds_count;
        self.won = match (result.winning_team_id, result.team_id) {
            (Some(winner), Some(team)) => Some(winner == team),
            _ => None,
        };
        if let Some(seat) = result.seat_id {
            self.seen_objects.retain_opponents(seat);
        }
    }
}

/// 매치
///
/// 결과 필드(`seat_id` ~ `seconds_count`)는 마지막으로 끝난 게임 기준이며,
/// 매치 종료 세그먼트가 있으면 `winning_team_id`는 매치 스코프 결과로 덮어씁니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArenaMatch {
    pub match_id: String,
    /// 매치 시작 시각 (시작 세그먼트의 마커 라인)
    pub game_start: Option<DateTime<Utc>>,
    pub opponent_screen_name: String,
    pub opponent_is_wotc: bool,
    pub opponent_ranking_class: String,
    pub opponent_ranking_tier: i64,
    pub opponent_mythic_percentile: f64,
    pub opponent_mythic_leaderboard_place: i64,
    pub event_id: String,
    pub seat_id: Option<u32>,
    pub team_id: Option<u32>,
    pub game_number: Option<u32>,
    pub winning_team_id: Option<u32>,
    pub winning_reason: Option<String>,
    pub turn_count: Option<u32>,
    pub seconds_count: Option<u32>,
    /// 매치에 사용한 덱 (직전 코스/덱 제출 세그먼트에서 복원)
    #[serde(rename = "CourseDeck")]
    pub course_deck: Option<ArenaDeck>,
    /// 끝난 게임 (게임 순서)
    pub games: Vec<Game>,
    /// 매치 전체의 관찰 오브젝트
    pub seen_objects: SeenObjects,
    /// 매치 종료 세그먼트를 봤는지
    pub completed: bool,
}

impl ArenaMatch {
    /// 매치 시작 레코드로 진행 중인 매치를 생성합니다.
    pub fn from_created(created: MatchCreated, game_start: Option<DateTime<Utc>>) -> Self {
        Self {
            match_id: created.match_id,
            game_start,
            opponent_screen_name: created.opponent_screen_name,
            opponent_is_wotc: created.opponent_is_wotc,
            opponent_ranking_class: created.opponent_ranking_class,
            opponent_ranking_tier: created.opponent_ranking_tier,
            opponent_mythic_percentile: created.opponent_mythic_percentile,
            opponent_mythic_leaderboard_place: created.opponent_mythic_leaderboard_place,
            event_id: created.event_id,
            ..Default::default()
        }
    }

    /// 끝난 게임을 추가하고 결과 필드를 갱신합니다.
    pub fn push_game(&mut self, game: Game) {
        self.seat_id = game.seat_id;
        self.team_id = game.team_id;
        self.game_number = Some(game.game_number);
        self.winning_team_id = game.winning_team_id;
        self.winning_reason = game.winning_reason.clone();
        self.turn_count = game.turn_count;
        self.seconds_count = game.seconds_count;
        self.games.push(game);
    }

    /// 끝난 게임이 하나라도 있는지
    pub fn has_finished_game(&self) -> bool {
        !self.games.is_empty()
    }

    /// 다음 게임 번호
    pub fn next_game_number(&self) -> u32 {
        u32::try_from(self.games.len()).map_or(u32::MAX, |n| n.saturating_add(1))
    }

    /// 자신의 좌석을 알면 자신의 관찰 오브젝트를 제거합니다.
    pub fn condense(&mut self) {
        if let Some(seat) = self.seat_id {
            self.seen_objects.retain_opponents(seat);
        }
    }
}

/// 매치 시작 세그먼트를 디코딩합니다. 시작 시각은 마커 라인에서 가져옵니다.
pub fn parse_match_start(segment: &Segment) -> Result<ArenaMatch, ArenaLogError> {
    let created: MatchCreated = decode_segment(segment)?;
    Ok(ArenaMatch::from_created(created, segment.timestamp))
}

/// 턴 이벤트 세그먼트를 디코딩합니다.
pub fn parse_match_event(segment: &Segment) -> Result<GreEvent, ArenaLogError> {
    decode_segment(segment)
}

/// 게임 종료 세그먼트를 디코딩합니다.
pub fn parse_match_end(segment: &Segment) -> Result<GameResult, ArenaLogError> {
    let stop: GameStop = decode_segment(segment)?;
    Ok(stop.params.payload_object)
}

/// 매치 종료 세그먼트를 디코딩합니다.
///
/// 매치 ID는 `finalMatchResult`에서, 없으면 `gameRoomConfig`에서 가져옵니다.
pub fn parse_match_completed(segment: &Segment) -> Result<MatchCompleted, ArenaLogError> {
    let state: RoomStateChanged = decode_segment(segment)?;
    let info = state.match_game_room_state_changed_event.game_room_info;
    let config_id = info.game_room_config.map(|c| c.match_id).unwrap_or_default();
    let final_result = info.final_match_result.unwrap_or_default();

    let match_id = if final_result.match_id.is_empty() {
        config_id
    } else {
        final_result.match_id
    };

    Ok(MatchCompleted {
        match_id,
        reason: final_result.match_completed_reason,
        results: final_result.result_list,
    })
}
