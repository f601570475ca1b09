//! `gathering segments` command handler

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use gathering_core::config::GatheringConfig;
use gathering_log_pipeline::{ArenaLog, SegmentType};

use crate::cli::SegmentsArgs;
use crate::commands::read_log;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `segments` command.
pub async fn execute(
    args: SegmentsArgs,
    config: &GatheringConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let filter = args.kind.as_deref().map(parse_kind).transpose()?;
    let log = read_log(&args.file, config).await?;

    let report = SegmentReport::build(args.file.display().to_string(), &log, filter);
    writer.render(&report)?;

    Ok(())
}

fn parse_kind(name: &str) -> Result<SegmentType, CliError> {
    SegmentType::ALL
        .into_iter()
        .find(|kind| kind.as_str() == name)
        .ok_or_else(|| {
            let names: Vec<&str> = SegmentType::ALL.iter().map(SegmentType::as_str).collect();
            CliError::Command(format!(
                "unknown segment kind: {} (expected one of: {})",
                name,
                names.join(", ")
            ))
        })
}

/// Classification histogram for one log snapshot.
#[derive(Serialize)]
pub struct SegmentReport {
    pub source: String,
    pub preamble_bytes: usize,
    pub total: usize,
    /// Count per segment kind, kinds with no segments omitted.
    pub kinds: BTreeMap<String, usize>,
    /// Marker line numbers (0-based) when filtering by one kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<usize>>,
}

impl SegmentReport {
    pub fn build(source: String, log: &ArenaLog, filter: Option<SegmentType>) -> Self {
        let kinds = log
            .kind_counts()
            .into_iter()
            .filter(|(kind, _)| filter.is_none_or(|f| f == *kind))
            .map(|(kind, count)| (kind.as_str().to_owned(), count))
            .collect();

        let lines = filter.map(|f| {
            log.segments()
                .iter()
                .filter(|segment| segment.kind == f)
                .map(|segment| segment.line())
                .collect()
        });

        Self {
            source,
            preamble_bytes: log.preamble().len(),
            total: log.segments().len(),
            kinds,
            lines,
        }
    }
}

impl Render for SegmentReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Segments: {} ({} total, {} preamble bytes)",
            self.source.bold(),
            self.total,
            self.preamble_bytes
        )?;
        writeln!(w)?;
        writeln!(w, "  {:<22} {:>8}", "KIND", "COUNT")?;
        writeln!(w, "  {}", "-".repeat(31))?;

        for (kind, count) in &self.kinds {
            let label = if kind == SegmentType::Unknown.as_str() {
                kind.dimmed()
            } else {
                kind.normal()
            };
            writeln!(w, "  {:<22} {:>8}", label, count)?;
        }

        if let Some(lines) = &self.lines {
            writeln!(w)?;
            let joined: Vec<String> = lines.iter().map(ToString::to_string).collect();
            writeln!(w, "  Marker lines: {}", joined.join(", "))?;
        }

        Ok(())
    }
}
