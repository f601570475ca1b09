#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use gathering_log_pipeline::{ArenaLog, LogConfig};

/// 퍼저용 구조적 입력: 실제 마커와 RPC 헤더로 감싼 임의 본문
#[derive(Arbitrary, Debug)]
struct FuzzLog {
    preamble: String,
    segments: Vec<FuzzSegment>,
    prize_window: u8,
    course_lookback: Option<u8>,
}

#[derive(Arbitrary, Debug)]
struct FuzzSegment {
    secondary: bool,
    header: FuzzHeader,
    body: String,
}

#[derive(Arbitrary, Debug)]
enum FuzzHeader {
    Collection,
    Inventory,
    InventoryUpdated,
    Rank,
    RankUpdated,
    Decks,
    Course,
    ClaimPrize,
    MatchCreated,
    GameState,
    GameStop,
    MatchCompleted,
    Booster,
    Auth,
    None,
}

impl FuzzHeader {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Collection => "<== PlayerInventory.GetPlayerCardsV3(1)\n",
            Self::Inventory => "<== PlayerInventory.GetPlayerInventory(2)\n",
            Self::InventoryUpdated => "(-1) Incoming Inventory.Updated ",
            Self::Rank => "<== Event.GetCombinedRankInfo(3)\n",
            Self::RankUpdated => "(-1) Incoming Rank.Updated ",
            Self::Decks => "<== Deck.GetDeckLists(4)\n",
            Self::Course => "<== Event.GetPlayerCourse(5)\n",
            Self::ClaimPrize => "<== Event.ClaimPrize(6)\n",
            Self::MatchCreated => "(-1) Incoming Event.MatchCreated ",
            Self::GameState => "\"GREMessageType_GameStateMessage\"\n",
            Self::GameStop => "DuelScene.GameStop\n",
            Self::MatchCompleted => "MatchGameRoomStateType_MatchCompleted\n",
            Self::Booster => "<== PlayerInventory.CrackBoostersV3(7)\n",
            Self::Auth => "\"screenName\": \"",
            Self::None => "",
        }
    }
}

fuzz_target!(|input: FuzzLog| {
    let mut text = input.preamble.replace('[', "(");
    for segment in &input.segments {
        text.push_str(if segment.secondary {
            "[Client GRE]1/8/2019 2:07:00 PM\n"
        } else {
            "[UnityCrossThreadLogger]1/8/2019 2:07:00 PM\n"
        });
        text.push_str(segment.header.as_str());
        text.push_str(&segment.body);
        text.push('\n');
    }

    let config = LogConfig {
        prize_window: usize::from(input.prize_window.max(1)),
        course_lookback: input.course_lookback.map(|n| usize::from(n.max(1))),
        ..Default::default()
    };
    let log = ArenaLog::parse_with(&text, config);
    assert_eq!(log.reassemble(), text);

    // 모든 조회는 panic 없이 끝나야 함
    let scan = log.match_scan();
    for m in &scan.matches {
        assert!(!m.games.is_empty() || m.completed);
    }
    let _ = log.snapshot(false);
    let _ = log.event_courses();
});
