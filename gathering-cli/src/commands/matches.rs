//! `gathering matches` command handler

use std::io::Write;

use serde::Serialize;
use tracing::{info, warn};

use gathering_core::config::GatheringConfig;
use gathering_log_pipeline::{Inconsistency, MatchScan};
use gathering_log_pipeline::records::ArenaMatch;

use crate::cli::MatchesArgs;
use crate::commands::read_log;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, or_dash};

/// Execute the `matches` command.
pub async fn execute(
    args: MatchesArgs,
    config: &GatheringConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let log = read_log(&args.file, config).await?;
    let scan = log.match_scan();

    if !scan.inconsistencies.is_empty() || !scan.abandoned.is_empty() {
        warn!(
            inconsistencies = scan.inconsistencies.len(),
            abandoned = scan.abandoned.len(),
            "match replay discarded segments"
        );
    }
    info!(matches = scan.matches.len(), "match replay finished");

    let report = MatchReport::build(args.file.display().to_string(), &scan, args.verbose);
    writer.render(&report)?;

    Ok(())
}

/// Reconstructed matches for one log snapshot.
#[derive(Serialize)]
pub struct MatchReport {
    pub source: String,
    pub matches: Vec<MatchEntry>,
    pub malformed: usize,
    /// Only filled in verbose mode.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inconsistencies: Vec<Inconsistency>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub abandoned: Vec<String>,
}

/// One row of the match table.
#[derive(Serialize)]
pub struct MatchEntry {
    pub match_id: String,
    pub event_id: String,
    pub opponent: String,
    pub games: usize,
    pub games_won: usize,
    pub completed: bool,
    pub deck: Option<String>,
    pub seen_objects: usize,
}

impl MatchEntry {
    fn from_match(record: &ArenaMatch) -> Self {
        Self {
            match_id: record.match_id.clone(),
            event_id: record.event_id.clone(),
            opponent: record.opponent_screen_name.clone(),
            games: record.games.len(),
            games_won: record
                .games
                .iter()
                .filter(|game| game.won == Some(true))
                .count(),
            completed: record.completed,
            deck: record.course_deck.as_ref().map(|deck| deck.name.clone()),
            seen_objects: record.seen_objects.len(),
        }
    }
}

impl MatchReport {
    pub fn build(source: String, scan: &MatchScan, verbose: bool) -> Self {
        Self {
            source,
            matches: scan.matches.iter().map(MatchEntry::from_match).collect(),
            malformed: scan.malformed,
            inconsistencies: if verbose {
                scan.inconsistencies.clone()
            } else {
                Vec::new()
            },
            abandoned: if verbose {
                scan.abandoned.clone()
            } else {
                Vec::new()
            },
        }
    }
}

impl Render for MatchReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Matches: {} ({} reconstructed)",
            self.source.bold(),
            self.matches.len()
        )?;

        if self.matches.is_empty() {
            writeln!(w, "  No matches found.")?;
        } else {
            writeln!(w)?;
            writeln!(
                w,
                "  {:<38} {:<24} {:<20} {:>5} {:<10}",
                "MATCH ID", "EVENT", "OPPONENT", "W-G", "STATUS"
            )?;
            writeln!(w, "  {}", "-".repeat(101))?;
            for entry in &self.matches {
                let status = if entry.completed {
                    "completed".green()
                } else {
                    "partial".yellow()
                };
                writeln!(
                    w,
                    "  {:<38} {:<24} {:<20} {:>5} {:<10}",
                    entry.match_id,
                    entry.event_id,
                    entry.opponent,
                    format!("{}-{}", entry.games_won, entry.games),
                    status
                )?;
                writeln!(
                    w,
                    "  {:<38} deck: {}, seen objects: {}",
                    "",
                    or_dash(entry.deck.as_deref()),
                    entry.seen_objects
                )?;
            }
        }

        if self.malformed > 0 {
            writeln!(w)?;
            writeln!(
                w,
                "  {} malformed match segment(s) skipped",
                self.malformed.to_string().yellow()
            )?;
        }

        if !self.inconsistencies.is_empty() {
            writeln!(w)?;
            writeln!(w, "  {}", "Inconsistent segments:".yellow().bold())?;
            for inconsistency in &self.inconsistencies {
                writeln!(w, "    {}", inconsistency)?;
            }
        }

        if !self.abandoned.is_empty() {
            writeln!(w)?;
            writeln!(w, "  {}", "Abandoned matches:".yellow().bold())?;
            for match_id in &self.abandoned {
                writeln!(w, "    {}", match_id)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gathering_log_pipeline::ArenaLog;

    const LOG: &str = r#"[UnityCrossThreadLogger]1/8/2019 2:07:00 PM
Incoming Event.MatchCreated {"matchId": "abc", "opponentScreenName": "Rival", "eventId": "Ladder"}
[UnityCrossThreadLogger]1/8/2019 2:20:00 PM
DuelScene.GameStop {"params": {"payloadObject": {"matchId": "abc", "mulliganedHands": [], "seatId": 1, "teamId": 1, "winningTeamId": 1, "winningReason": "ResultReason_Game", "turnCount": 9, "secondsCount": 700}}}
[UnityCrossThreadLogger]1/8/2019 2:30:00 PM
DuelScene.GameStop {"params": {"payloadObject": {"matchId": "zzz", "mulliganedHands": [], "seatId": 1, "teamId": 1, "winningTeamId": 2, "winningReason": "ResultReason_Game", "turnCount": 3, "secondsCount": 100}}}
"#;

    fn render(report: &MatchReport) -> String {
        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");
        String::from_utf8(buffer).expect("valid UTF-8")
    }

    #[test]
    fn test_match_report_lists_matches() {
        let scan = ArenaLog::parse(LOG).match_scan();
        let report = MatchReport::build("log.txt".to_owned(), &scan, false);

        assert_eq!(report.matches.len(), 1);
        let entry = &report.matches[0];
        assert_eq!(entry.match_id, "abc");
        assert_eq!(entry.opponent, "Rival");
        assert_eq!(entry.games, 1);
        assert_eq!(entry.games_won, 1);

        let output = render(&report);
        assert!(output.contains("abc"));
        assert!(output.contains("1-1"));
        assert!(!output.contains("Inconsistent segments"));
    }

    #[test]
    fn test_match_report_verbose_shows_inconsistencies() {
        let scan = ArenaLog::parse(LOG).match_scan();
        let report = MatchReport::build("log.txt".to_owned(), &scan, true);

        assert_eq!(report.inconsistencies.len(), 1);
        let output = render(&report);
        assert!(output.contains("Inconsistent segments"));
        assert!(output.contains("zzz"));
    }

    #[test]
    fn test_match_report_empty() {
        let report = MatchReport::build("log.txt".to_owned(), &MatchScan::default(), false);
        let output = render(&report);
        assert!(output.contains("No matches found"));

        let json = serde_json::to_value(&report).expect("serialize");
        assert!(json.get("inconsistencies").is_none());
        assert_eq!(json["malformed"], 0);
    }
}
