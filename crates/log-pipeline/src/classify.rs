//! 세그먼트 분류 -- 우선순위 정규식 테이블
//!
//! [`Classifier`]는 세그먼트 본문을 정확히 하나의 [`SegmentType`]으로 분류합니다.
//! 테이블은 `(SegmentType, Regex)` 쌍의 순서 있는 목록이며, 처음 매칭된 항목이
//! 이깁니다. 어느 패턴에도 맞지 않으면 [`SegmentType::Unknown`]입니다.
//!
//! 기본 테이블은 프로세스당 한 번만 컴파일됩니다 ([`Classifier::builtin`]).
//!
//! # 사용 예시
//! ```
//! use gathering_log_pipeline::classify::{Classifier, SegmentType};
//!
//! let classifier = Classifier::builtin();
//! let kind = classifier.classify("<== PlayerInventory.GetPlayerCardsV3(57)\n{}");
//! assert_eq!(kind, SegmentType::CollectionSnapshot);
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ArenaLogError;

/// 세그먼트 페이로드 분류 (닫힌 열거형)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SegmentType {
    /// 카드 컬렉션 스냅샷
    CollectionSnapshot,
    /// 인벤토리 스냅샷
    InventorySnapshot,
    /// 인벤토리 변경분
    InventoryDelta,
    /// 랭크 스냅샷
    RankSnapshot,
    /// 랭크 변경분
    RankDelta,
    /// 덱 목록
    DeckList,
    /// 플레이어 인증 (화면 이름)
    Auth,
    /// 매치 생성
    MatchStart,
    /// 게임 상태 메시지
    MatchTurnEvent,
    /// 게임 종료
    MatchEnd,
    /// 매치 완료 (게임룸 상태)
    MatchCompleted,
    /// 이벤트 참가
    EventJoin,
    /// 이벤트 참가비 지불
    EventPayEntry,
    /// 이벤트 코스 조회
    EventGetCourse,
    /// 이벤트 덱 제출
    EventDeckSubmit,
    /// 이벤트 보상 수령
    EventClaimPrize,
    /// 부스터 개봉
    BoosterCrack,
    /// 분류 불가
    Unknown,
}

impl SegmentType {
    /// 모든 분류 값 (선언 순서)
    pub const ALL: [SegmentType; 18] = [
        Self::CollectionSnapshot,
        Self::InventorySnapshot,
        Self::InventoryDelta,
        Self::RankSnapshot,
        Self::RankDelta,
        Self::DeckList,
        Self::Auth,
        Self::MatchStart,
        Self::MatchTurnEvent,
        Self::MatchEnd,
        Self::MatchCompleted,
        Self::EventJoin,
        Self::EventPayEntry,
        Self::EventGetCourse,
        Self::EventDeckSubmit,
        Self::EventClaimPrize,
        Self::BoosterCrack,
        Self::Unknown,
    ];

    /// 분류 이름 (kebab-case, 로그/메트릭 레이블용)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CollectionSnapshot => "collection-snapshot",
            Self::InventorySnapshot => "inventory-snapshot",
            Self::InventoryDelta => "inventory-delta",
            Self::RankSnapshot => "rank-snapshot",
            Self::RankDelta => "rank-delta",
            Self::DeckList => "deck-list",
            Self::Auth => "auth",
            Self::MatchStart => "match-start",
            Self::MatchTurnEvent => "match-turn-event",
            Self::MatchEnd => "match-end",
            Self::MatchCompleted => "match-completed",
            Self::EventJoin => "event-join",
            Self::EventPayEntry => "event-pay-entry",
            Self::EventGetCourse => "event-get-course",
            Self::EventDeckSubmit => "event-deck-submit",
            Self::EventClaimPrize => "event-claim-prize",
            Self::BoosterCrack => "booster-crack",
            Self::Unknown => "unknown",
        }
    }

    /// 코스 덱을 담고 있는 세그먼트인지 (매치 시작 시 역방향 탐색 대상)
    pub fn carries_course_deck(&self) -> bool {
        matches!(self, Self::EventGetCourse | Self::EventDeckSubmit)
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 기본 분류 테이블 (우선순위 순서)
///
/// RPC 응답(`<==`)을 먼저 보고, 푸시 알림(`Incoming`), GRE 메시지,
/// 마지막으로 인증 순서로 검사합니다.
pub const BUILTIN_PATTERNS: &[(SegmentType, &str)] = &[
    (
        SegmentType::CollectionSnapshot,
        r"<==\s*PlayerInventory\.GetPlayerCards(?:V\d+)?\(\d*\)",
    ),
    (
        SegmentType::InventorySnapshot,
        r"<==\s*PlayerInventory\.GetPlayerInventory\(\d*\)",
    ),
    (
        SegmentType::BoosterCrack,
        r"<==\s*PlayerInventory\.CrackBoosters(?:V\d+)?\(\d*\)",
    ),
    (
        SegmentType::RankSnapshot,
        r"<==\s*Event\.GetCombinedRankInfo\(\d*\)",
    ),
    (SegmentType::DeckList, r"<==\s*Deck\.GetDeckLists(?:V\d+)?\(\d*\)"),
    (SegmentType::EventJoin, r"<==\s*Event\.Join(?:V\d+)?\(\d*\)"),
    (SegmentType::EventPayEntry, r"<==\s*Event\.PayEntry(?:V\d+)?\(\d*\)"),
    (
        SegmentType::EventGetCourse,
        r"<==\s*Event\.GetPlayerCourse(?:V\d+)?\(\d*\)",
    ),
    (
        SegmentType::EventDeckSubmit,
        r"<==\s*Event\.DeckSubmit(?:V\d+)?\(\d*\)",
    ),
    (SegmentType::EventClaimPrize, r"<==\s*Event\.ClaimPrize\(\d*\)"),
    (SegmentType::MatchStart, r"Incoming\s+Event\.MatchCreated"),
    (SegmentType::RankDelta, r"Incoming\s+Rank\.Updated"),
    (SegmentType::InventoryDelta, r"Incoming\s+Inventory\.Updated"),
    (
        SegmentType::MatchCompleted,
        r"MatchGameRoomStateType_MatchCompleted",
    ),
    (SegmentType::MatchEnd, r"DuelScene\.GameStop"),
    (
        SegmentType::MatchTurnEvent,
        r#""GREMessageType_GameStateMessage"|GameStateType_Diff"#,
    ),
    (
        SegmentType::Auth,
        r#""screenName"\s*:\s*"|"PlayerName"\s*:\s*""#,
    ),
];

static BUILTIN: LazyLock<Classifier> = LazyLock::new(|| {
    Classifier::new(BUILTIN_PATTERNS).expect("built-in classifier patterns are valid regexes")
});

/// 세그먼트 분류기 -- 컴파일된 정규식 테이블
///
/// 생성 후 불변이며 여러 스레드에서 공유할 수 있습니다.
pub struct Classifier {
    /// 컴파일된 (분류, 정규식) 목록 (순서대로 시도)
    table: Vec<(SegmentType, Regex)>,
}

impl Classifier {
    /// 패턴 목록을 컴파일하여 분류기를 생성합니다.
    pub fn new(patterns: &[(SegmentType, &str)]) -> Result<Self, ArenaLogError> {
        let mut table = Vec::with_capacity(patterns.len());
        for (kind, pattern) in patterns {
            table.push((*kind, Regex::new(pattern)?));
        }
        Ok(Self { table })
    }

    /// 프로세스 전역 기본 분류기를 반환합니다. 첫 호출 시 한 번 컴파일됩니다.
    pub fn builtin() -> &'static Classifier {
        &BUILTIN
    }

    /// 본문 텍스트를 분류합니다. 처음 매칭된 패턴이 이깁니다.
    pub fn classify(&self, body: &str) -> SegmentType {
        self.table
            .iter()
            .find(|(_, regex)| regex.is_match(body))
            .map(|(kind, _)| *kind)
            .unwrap_or(SegmentType::Unknown)
    }

    /// 등록된 패턴 목록 (우선순위 순서)
    pub fn patterns(&self) -> impl Iterator<Item = (SegmentType, &str)> {
        self.table.iter().map(|(kind, regex)| (*kind, regex.as_str()))
    }
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("patterns", &self.table.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(body: &str) -> SegmentType {
        Classifier::builtin().classify(body)
    }

    #[test]
    fn builtin_patterns_compile() {
        let classifier = Classifier::new(BUILTIN_PATTERNS).unwrap();
        assert_eq!(classifier.patterns().count(), BUILTIN_PATTERNS.len());
    }

    #[test]
    fn every_type_except_unknown_has_a_pattern() {
        for kind in SegmentType::ALL {
            let has_pattern = BUILTIN_PATTERNS.iter().any(|(k, _)| *k == kind);
            assert_eq!(has_pattern, kind != SegmentType::Unknown, "{kind}");
        }
    }

    #[test]
    fn classifies_rpc_responses() {
        assert_eq!(
            classify("<== PlayerInventory.GetPlayerCardsV3(57)\n{\"1\":1}"),
            SegmentType::CollectionSnapshot
        );
        assert_eq!(
            classify("<== PlayerInventory.GetPlayerInventory(12)\n{}"),
            SegmentType::InventorySnapshot
        );
        assert_eq!(
            classify("<== PlayerInventory.CrackBoostersV3(276)\n{}"),
            SegmentType::BoosterCrack
        );
        assert_eq!(
            classify("<== Event.GetCombinedRankInfo(5)\n{}"),
            SegmentType::RankSnapshot
        );
        assert_eq!(classify("<== Deck.GetDeckLists(9) []"), SegmentType::DeckList);
        assert_eq!(classify("<== Deck.GetDeckListsV3(9) []"), SegmentType::DeckList);
        assert_eq!(classify("<== Event.Join(57)\n{}"), SegmentType::EventJoin);
        assert_eq!(classify("<== Event.PayEntry(58)\n{}"), SegmentType::EventPayEntry);
        assert_eq!(
            classify("<== Event.GetPlayerCourse(63)\n{}"),
            SegmentType::EventGetCourse
        );
        assert_eq!(
            classify("<== Event.DeckSubmit(70)\n{}"),
            SegmentType::EventDeckSubmit
        );
        assert_eq!(
            classify("<== Event.ClaimPrize(80)\n{}"),
            SegmentType::EventClaimPrize
        );
    }

    #[test]
    fn request_echo_is_not_a_response() {
        assert_eq!(
            classify("==> PlayerInventory.GetPlayerCardsV3(57):\n{\"method\":\"x\"}"),
            SegmentType::Unknown
        );
    }

    #[test]
    fn plural_courses_is_not_get_player_course() {
        assert_eq!(
            classify("<== Event.GetPlayerCoursesV2(63)\n[]"),
            SegmentType::Unknown
        );
    }

    #[test]
    fn classifies_push_notifications() {
        assert_eq!(
            classify(" (-1) Incoming Event.MatchCreated {}"),
            SegmentType::MatchStart
        );
        assert_eq!(classify("(-1) Incoming Rank.Updated {}"), SegmentType::RankDelta);
        assert_eq!(
            classify("(-1) Incoming Inventory.Updated {}"),
            SegmentType::InventoryDelta
        );
    }

    #[test]
    fn classifies_gre_messages() {
        assert_eq!(
            classify(r#"{"type": "GREMessageType_GameStateMessage"}"#),
            SegmentType::MatchTurnEvent
        );
        assert_eq!(
            classify(r#"{"stateType": "MatchGameRoomStateType_MatchCompleted"}"#),
            SegmentType::MatchCompleted
        );
        assert_eq!(
            classify(r#"{"params":{"messageName":"DuelScene.GameStop"}}"#),
            SegmentType::MatchEnd
        );
    }

    #[test]
    fn classifies_auth() {
        assert_eq!(
            classify(r#"{"screenName": "Player#12345"}"#),
            SegmentType::Auth
        );
        assert_eq!(
            classify(r#"{"Payload":{"PlayerName":"Player#12345"}}"#),
            SegmentType::Auth
        );
    }

    #[test]
    fn opponent_screen_name_is_not_auth() {
        assert_eq!(
            classify(r#"{"opponentScreenName": "Rival#1"}"#),
            SegmentType::Unknown
        );
    }

    #[test]
    fn match_start_wins_over_auth() {
        // 우선순위: 매치 생성 패턴이 인증 패턴보다 앞섬
        let body = r#"Incoming Event.MatchCreated {"screenName": "x"}"#;
        assert_eq!(classify(body), SegmentType::MatchStart);
    }

    #[test]
    fn unmatched_body_is_unknown() {
        assert_eq!(classify(""), SegmentType::Unknown);
        assert_eq!(classify("Initialize engine version"), SegmentType::Unknown);
    }

    #[test]
    fn custom_table_respects_order() {
        let classifier = Classifier::new(&[
            (SegmentType::Auth, "abc"),
            (SegmentType::DeckList, "a"),
        ])
        .unwrap();
        assert_eq!(classifier.classify("abc"), SegmentType::Auth);
        assert_eq!(classifier.classify("a"), SegmentType::DeckList);
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let result = Classifier::new(&[(SegmentType::Auth, "(unclosed")]);
        assert!(matches!(result, Err(ArenaLogError::Regex(_))));
    }

    #[test]
    fn display_uses_kebab_case() {
        assert_eq!(SegmentType::EventClaimPrize.to_string(), "event-claim-prize");
        let json = serde_json::to_string(&SegmentType::MatchTurnEvent).unwrap();
        assert_eq!(json, "\"match-turn-event\"");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn classification_is_total(body in ".{0,400}") {
                let kind = classify(&body);
                prop_assert!(SegmentType::ALL.contains(&kind));
            }

            #[test]
            fn classification_is_deterministic(body in ".{0,200}") {
                prop_assert_eq!(classify(&body), classify(&body));
            }
        }
    }
}
