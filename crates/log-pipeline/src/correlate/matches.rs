//! 매치 재구성 -- 명시적 상태 머신
//!
//! ```text
//!            Start                TurnEvent
//!   Idle ───────────▶ MatchOpen ───────────▶ GameOpen
//!    ▲                 │  ▲                    │
//!    │   Completed     │  └──── GameEnd ───────┘
//!    └─────────────────┘
//! ```
//!
//! [`MatchState::advance`]는 현재 상태와 신호를 받아 다음 상태와 외부로 내보낼
//! [`Transition`]을 반환합니다. 상태는 값으로 전달되므로 전체 스캔 없이도
//! 전이 하나하나를 단위 테스트할 수 있습니다.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::classify::SegmentType;
use crate::records::{
    ArenaDeck, ArenaMatch, Game, GameResult, GreEvent, MatchCompleted, parse_event_course,
    parse_match_completed, parse_match_end, parse_match_event, parse_match_start,
};
use crate::segment::Segment;

use super::log_malformed;

/// 매치 상태 머신 입력
#[derive(Debug, Clone)]
pub enum Signal {
    /// 매치 시작 (코스 덱 결합 완료)
    Start(ArenaMatch),
    /// 턴 이벤트
    TurnEvent(GreEvent),
    /// 게임 종료
    GameEnd(GameResult),
    /// 매치 종료
    Completed(MatchCompleted),
}

/// 세그먼트 간 불일치 기록
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inconsistency {
    /// 문제가 된 세그먼트의 마커 라인 번호
    pub line: usize,
    /// 진행 중이던 매치 ID (없으면 `None`)
    pub expected: Option<String>,
    /// 세그먼트가 가리킨 매치 ID
    pub found: String,
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expected {
            Some(expected) => write!(
                f,
                "match id '{}' does not match in-flight match '{}'",
                self.found, expected
            ),
            None => write!(f, "match id '{}' seen with no match in flight", self.found),
        }
    }
}

/// 상태 전이 결과
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// 내보낼 것 없음
    None,
    /// 결과 집합에 매치를 추가하거나 교체
    Upsert(ArenaMatch),
    /// 끝난 게임 없이 새 매치가 시작되어 버려진 매치
    Abandoned { match_id: String },
    /// 불일치 (세그먼트 폐기)
    Inconsistent(Inconsistency),
}

/// 매치 상태
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MatchState {
    /// 진행 중인 매치 없음
    #[default]
    Idle,
    /// 매치 진행 중, 활성 게임 없음
    MatchOpen(ArenaMatch),
    /// 매치 진행 중, `game`이 활성 게임
    GameOpen { record: ArenaMatch, game: Game },
}

impl MatchState {
    /// 진행 중인 매치 ID
    pub fn in_flight(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::MatchOpen(record) | Self::GameOpen { record, .. } => Some(&record.match_id),
        }
    }

    /// 신호를 적용해 다음 상태와 전이를 반환합니다. `line`은 신호를 만든 세그먼트의 라인 번호입니다.
    pub fn advance(self, signal: Signal, line: usize) -> (MatchState, Transition) {
        match signal {
            Signal::Start(next) => {
                let transition = match self.into_open() {
                    Some((stale, _)) if !stale.has_finished_game() => Transition::Abandoned {
                        match_id: stale.match_id,
                    },
                    _ => Transition::None,
                };
                (Self::MatchOpen(next), transition)
            }

            Signal::TurnEvent(event) => match self.into_open() {
                None => (Self::Idle, Transition::None),
                Some((mut record, game)) => {
                    let mut game = game.unwrap_or_else(|| Game::new(record.next_game_number()));
                    for object in event.card_objects() {
                        record.seen_objects.insert(object);
                        game.seen_objects.insert(object);
                    }
                    (Self::GameOpen { record, game }, Transition::None)
                }
            },

            Signal::GameEnd(result) => {
                if let Some(inconsistency) = self.check_id(&result.match_id, line) {
                    return (self, Transition::Inconsistent(inconsistency));
                }
                let Some((mut record, game)) = self.into_open() else {
                    return (Self::Idle, Transition::None);
                };
                let mut game = game.unwrap_or_else(|| Game::new(record.next_game_number()));
                game.finish(&result);
                record.push_game(game);
                record.condense();
                let emitted = record.clone();
                (Self::MatchOpen(record), Transition::Upsert(emitted))
            }

            Signal::Completed(completed) => {
                if let Some(inconsistency) = self.check_id(&completed.match_id, line) {
                    return (self, Transition::Inconsistent(inconsistency));
                }
                let Some((mut record, _unfinished)) = self.into_open() else {
                    return (Self::Idle, Transition::None);
                };
                record.completed = true;
                if let Some(winner) = completed.match_winner() {
                    record.winning_team_id = Some(winner);
                }
                record.condense();
                (Self::Idle, Transition::Upsert(record))
            }
        }
    }

    fn check_id(&self, found: &str, line: usize) -> Option<Inconsistency> {
        let expected = self.in_flight();
        (expected != Some(found)).then(|| Inconsistency {
            line,
            expected: expected.map(str::to_owned),
            found: found.to_owned(),
        })
    }

    fn into_open(self) -> Option<(ArenaMatch, Option<Game>)> {
        match self {
            Self::Idle => None,
            Self::MatchOpen(record) => Some((record, None)),
            Self::GameOpen { record, game } => Some((record, Some(game))),
        }
    }
}

/// 매치 결과 집합 -- 처음 결과가 나온 순서를 유지하며 같은 ID는 제자리 교체
#[derive(Debug, Clone, Default)]
pub struct MatchSet {
    matches: Vec<ArenaMatch>,
    index: HashMap<String, usize>,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 매치를 추가하거나 같은 ID의 기존 항목을 교체합니다.
    pub fn upsert(&mut self, record: ArenaMatch) {
        match self.index.get(&record.match_id) {
            Some(&pos) => self.matches[pos] = record,
            None => {
                self.index.insert(record.match_id.clone(), self.matches.len());
                self.matches.push(record);
            }
        }
    }

    pub fn get(&self, match_id: &str) -> Option<&ArenaMatch> {
        self.index.get(match_id).map(|&pos| &self.matches[pos])
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn into_vec(self) -> Vec<ArenaMatch> {
        self.matches
    }
}

/// 매치 스캔 결과
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchScan {
    /// 재구성된 매치 (첫 결과 순서)
    pub matches: Vec<ArenaMatch>,
    /// 폐기된 불일치 세그먼트
    pub inconsistencies: Vec<Inconsistency>,
    /// 끝난 게임 없이 버려진 매치 ID
    pub abandoned: Vec<String>,
    /// 디코딩에 실패한 매치 관련 세그먼트 수
    pub malformed: usize,
}

/// 세그먼트 목록을 순방향으로 스캔해 매치를 재구성합니다.
///
/// `course_lookback`은 매치 시작에서 코스 덱을 찾을 때 되돌아볼 최대 세그먼트 수입니다
/// (`None` = 로그 처음까지).
pub fn scan_matches(segments: &[Segment], course_lookback: Option<usize>) -> MatchScan {
    let mut scan = MatchScan::default();
    let mut set = MatchSet::new();
    let mut state = MatchState::Idle;

    for (i, segment) in segments.iter().enumerate() {
        let decoded = match segment.kind {
            SegmentType::MatchStart => parse_match_start(segment).map(|mut record| {
                record.course_deck = find_course_deck(segments, i, course_lookback);
                Signal::Start(record)
            }),
            SegmentType::MatchTurnEvent if state.in_flight().is_some() => {
                parse_match_event(segment).map(Signal::TurnEvent)
            }
            SegmentType::MatchEnd => parse_match_end(segment).map(Signal::GameEnd),
            SegmentType::MatchCompleted => parse_match_completed(segment).map(Signal::Completed),
            _ => continue,
        };

        let signal = match decoded {
            Ok(signal) => signal,
            Err(e) => {
                log_malformed(segment, &e);
                scan.malformed += 1;
                continue;
            }
        };

        let (next, transition) = state.advance(signal, segment.line());
        state = next;

        match transition {
            Transition::None => {}
            Transition::Upsert(record) => {
                tracing::debug!(
                    match_id = %record.match_id,
                    games = record.games.len(),
                    completed = record.completed,
                    "match result recorded"
                );
                set.upsert(record);
            }
            Transition::Abandoned { match_id } => {
                tracing::warn!(
                    match_id = %match_id,
                    line = segment.line(),
                    "match abandoned without a finished game"
                );
                scan.abandoned.push(match_id);
            }
            Transition::Inconsistent(inconsistency) => {
                tracing::warn!(
                    line = inconsistency.line,
                    kind = %segment.kind,
                    reason = %inconsistency,
                    "discarding inconsistent match segment"
                );
                scan.inconsistencies.push(inconsistency);
            }
        }
    }

    if let Some(match_id) = state.in_flight() {
        tracing::debug!(match_id, "match still in flight at end of log");
    }

    scan.matches = set.into_vec();
    scan
}

/// 매치 시작 직전의 가장 가까운 코스/덱 제출 세그먼트에서 덱을 복원합니다.
///
/// 처음 찾은 세그먼트에서 멈추며, 디코딩에 실패하면 덱은 `None`입니다.
fn find_course_deck(
    segments: &[Segment],
    start: usize,
    lookback: Option<usize>,
) -> Option<ArenaDeck> {
    let segment = segments[..start]
        .iter()
        .rev()
        .take(lookback.unwrap_or(usize::MAX))
        .find(|s| s.kind.carries_course_deck())?;
    parse_event_course(segment)
        .inspect_err(|e| log_malformed(segment, e))
        .ok()
        .and_then(|course| course.course_deck)
}
