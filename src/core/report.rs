use crate::domain::model::ReportLine;
use std::io::{self, Write};

pub const HEADER: &str = "repo, current, previous";

/// A repository left out of the report, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRepository {
    pub repo: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    lines: Vec<ReportLine>,
    skipped: Vec<SkippedRepository>,
}

impl Report {
    /// Orders lines by their rendered text, which starts with the repo name.
    pub fn new(lines: Vec<ReportLine>, mut skipped: Vec<SkippedRepository>) -> Self {
        let mut keyed: Vec<(String, ReportLine)> = lines
            .into_iter()
            .map(|line| (line.to_string(), line))
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        skipped.sort_by(|a, b| a.repo.cmp(&b.repo));

        Self {
            lines: keyed.into_iter().map(|(_, line)| line).collect(),
            skipped,
        }
    }

    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    pub fn skipped(&self) -> &[SkippedRepository] {
        &self.skipped
    }

    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        out.write_all(self.render().as_bytes())
    }

    /// One `"<repo>: could not get releases: <reason>"` line per skip.
    pub fn write_diagnostics<W: Write>(&self, mut out: W) -> io::Result<()> {
        for skipped in &self.skipped {
            writeln!(
                out,
                "{}: could not get releases: {}",
                skipped.repo, skipped.reason
            )?;
        }
        Ok(())
    }

    pub fn render(&self) -> String {
        let mut out = format!("{}\n", HEADER);
        for line in &self.lines {
            out.push_str(&format!("{}\n", line));
        }
        out
    }
}
