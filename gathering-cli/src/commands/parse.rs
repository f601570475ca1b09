//! `gathering parse` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use gathering_core::config::GatheringConfig;
use gathering_log_pipeline::UploadData;

use crate::cli::ParseArgs;
use crate::commands::read_log;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `parse` command.
pub async fn execute(
    args: ParseArgs,
    config: &GatheringConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let log = read_log(&args.file, config).await?;
    let data = log.snapshot(args.playing);

    info!(
        matches = data.matches.len(),
        events = data.events.len(),
        boosters = data.boosters.len(),
        missing = data.missing().len(),
        "snapshot built"
    );

    let report = ParseReport {
        source: args.file.display().to_string(),
        data,
    };
    writer.render(&report)?;

    Ok(())
}

/// Upload aggregate for one log snapshot.
///
/// Serialises as the bare upload payload; `source` is only used for text output.
#[derive(Serialize)]
pub struct ParseReport {
    #[serde(skip)]
    pub source: String,
    #[serde(flatten)]
    pub data: UploadData,
}

impl Render for ParseReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let data = &self.data;
        writeln!(w, "Snapshot: {}", self.source.bold())?;
        writeln!(
            w,
            "  Playing:     {}",
            if data.is_playing { "yes" } else { "no" }
        )?;

        let player = data
            .auth
            .as_ref()
            .map(|auth| auth.player_name().to_owned());
        writeln!(w, "  Player:      {}", missing_or(player))?;

        let collection = data.collection.as_ref().map(|cards| {
            let copies: u64 = cards.values().map(|&n| u64::from(n)).sum();
            format!("{} cards ({} copies)", cards.len(), copies)
        });
        writeln!(w, "  Collection:  {}", missing_or(collection))?;

        let decks = data.deck.as_ref().map(|decks| format!("{} decks", decks.len()));
        writeln!(w, "  Decks:       {}", missing_or(decks))?;

        let inventory = data.inventory.as_ref().map(|inv| {
            format!(
                "{} gold, {} gems, wildcards {}/{}/{}/{}",
                inv.gold, inv.gems, inv.wc_common, inv.wc_uncommon, inv.wc_rare, inv.wc_mythic
            )
        });
        writeln!(w, "  Inventory:   {}", missing_or(inventory))?;

        let rank = data.rank.as_ref().map(|rank| {
            format!(
                "constructed {} {}, limited {} {}",
                rank.constructed_class.as_deref().unwrap_or("-"),
                crate::output::or_dash(rank.constructed_level),
                rank.limited_class.as_deref().unwrap_or("-"),
                crate::output::or_dash(rank.limited_level),
            )
        });
        writeln!(w, "  Rank:        {}", missing_or(rank))?;

        writeln!(w, "  Matches:     {}", data.matches.len())?;
        writeln!(w, "  Events:      {}", data.events.len())?;
        writeln!(w, "  Boosters:    {}", data.boosters.len())?;

        let missing = data.missing();
        if !missing.is_empty() {
            writeln!(w)?;
            writeln!(w, "  Not found in log: {}", missing.join(", ").yellow())?;
        }

        Ok(())
    }
}

fn missing_or(value: Option<String>) -> String {
    use colored::Colorize;

    value.unwrap_or_else(|| "MISSING".red().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gathering_log_pipeline::ArenaLog;

    const LOG: &str = "[UnityCrossThreadLogger]1/8/2019 2:07:00 PM\n\
<== PlayerInventory.GetPlayerCardsV3(57)\n\
{\"66001\": 2, \"67003\": 4}\n\
[UnityCrossThreadLogger]1/8/2019 2:07:05 PM\n\
<== PlayerInventory.GetPlayerInventory(58)\n\
{\"playerId\": \"P1\", \"gold\": 1500, \"gems\": 200, \"wcCommon\": 5, \"wcUncommon\": 4, \"wcRare\": 3, \"wcMythic\": 1}\n";

    fn report(text: &str) -> ParseReport {
        ParseReport {
            source: "output_log.txt".to_owned(),
            data: ArenaLog::parse(text).snapshot(false),
        }
    }

    fn render(report: &ParseReport) -> String {
        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");
        String::from_utf8(buffer).expect("valid UTF-8")
    }

    #[test]
    fn test_parse_report_text_summarises_aggregates() {
        let output = render(&report(LOG));
        assert!(output.contains("output_log.txt"));
        assert!(output.contains("2 cards (6 copies)"));
        assert!(output.contains("1500 gold, 200 gems"));
        assert!(output.contains("Matches:     0"));
    }

    #[test]
    fn test_parse_report_text_lists_missing_aggregates() {
        let output = render(&report(LOG));
        assert!(output.contains("Not found in log"));
        assert!(output.contains("rank"));
        assert!(output.contains("auth"));
    }

    #[test]
    fn test_parse_report_json_is_upload_payload() {
        let json = serde_json::to_value(report(LOG)).expect("serialize");
        assert!(json.get("source").is_none(), "source is text-only");
        assert_eq!(json["isPlaying"], false);
        assert_eq!(json["collection"]["66001"], 2);
        assert!(json["rank"].is_null());
        assert!(json["matches"].as_array().is_some_and(Vec::is_empty));
    }

    #[test]
    fn test_parse_report_empty_log() {
        let output = render(&report(""));
        assert!(output.contains("MISSING"));
        assert!(output.contains("collection, deck, inventory, rank, auth"));
    }
}
