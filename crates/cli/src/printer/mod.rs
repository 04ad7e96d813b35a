use std::io::{self, IsTerminal, Write};

use chrono::DateTime;
use glflite_engine::{
    CheckMode, CheckRun, DuplicateGroup, FileOutcome, Manifests, StaleReason, Status,
    UpdateAction, UpdateRun,
};
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with optional colors.
    #[default]
    Human,
    /// NDJSON (newline-delimited JSON) for machine consumption.
    Json,
}

/// Color handling strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Automatically detect TTY and enable colors if appropriate.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PrinterConfig {
    pub format: OutputFormat,
    pub color: ColorChoice,
    /// Only the summary, no per-file lines or duplicate listings.
    pub quiet: bool,
}

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Renders the outcome of a `check` or `update` run.
pub trait ReportPrinter {
    fn print_check(&mut self, run: &CheckRun) -> io::Result<()>;
    fn print_update(&mut self, run: &UpdateRun) -> io::Result<()>;
}

/// Human-readable printer. Reports go to `out`, hints to `err`.
pub struct HumanPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
    use_color: bool,
}

impl<W: Write, E: Write> HumanPrinter<W, E> {
    /// `ColorChoice::Auto` means no color, since arbitrary writers cannot be
    /// probed for a terminal.
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        let use_color = cfg.color == ColorChoice::Always;
        Self {
            out,
            err,
            cfg,
            use_color,
        }
    }

    #[inline]
    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_owned()
        }
    }

    fn status_line(&mut self, file: &FileOutcome<Status>) -> io::Result<()> {
        let label = match &file.outcome {
            Status::Missing => self.paint(RED, "Missing"),
            Status::Unlinked => self.paint(RED, "Unlinked"),
            Status::UpToDate => self.paint(GREEN, "Up to date"),
            Status::Stale(_) => self.paint(RED, "Not up to date"),
        };
        writeln!(self.out, "{}: {label}", file.path)?;

        if let Status::Stale(reasons) = &file.outcome {
            for reason in reasons {
                writeln!(self.out, "    {}", describe_reason(reason))?;
            }
        }

        Ok(())
    }

    fn action_line(&mut self, file: &FileOutcome<UpdateAction>) -> io::Result<()> {
        let label = match file.outcome {
            UpdateAction::Created => self.paint(GREEN, "record created"),
            UpdateAction::Refreshed => self.paint(GREEN, "record refreshed"),
            UpdateAction::Unchanged => "up to date".to_owned(),
            UpdateAction::SkippedMissing => self.paint(RED, "Missing, skipped"),
        };
        writeln!(self.out, "{}: {label}", file.path)
    }

    fn duplicates(&mut self, groups: &[DuplicateGroup]) -> io::Result<()> {
        writeln!(self.out, "Duplicate groups: {}", groups.len())?;
        if self.cfg.quiet {
            return Ok(());
        }

        for group in groups {
            let canonical = group.canonical();
            writeln!(self.out, "{}", self.paint(YELLOW, canonical))?;
            for dup in group.duplicates() {
                writeln!(self.out, "    duplicate: {dup}")?;
                writeln!(
                    self.out,
                    "    mv \"{dup}\" ~/duplicatedFiles && ln -s \"{canonical}\" \"{dup}\""
                )?;
            }
        }

        Ok(())
    }

    fn manifests(&mut self, manifests: Option<&Manifests>) -> io::Result<()> {
        match manifests {
            Some(m) if !self.cfg.quiet => {
                writeln!(self.err, "[manifest] wrote {}", m.rsync.display())?;
                writeln!(self.err, "[manifest] wrote {}", m.rsync_local.display())?;
                writeln!(self.err, "[manifest] wrote {}", m.hashes.display())
            }
            Some(_) => Ok(()),
            None => writeln!(self.err, "[manifest] scoped run, manifests left untouched"),
        }
    }
}

impl HumanPrinter<io::Stdout, io::Stderr> {
    /// Printer on stdout and stderr with TTY detection.
    pub fn stdout(cfg: PrinterConfig) -> Self {
        let use_color = match cfg.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => io::stdout().is_terminal(),
        };

        HumanPrinter {
            out: io::stdout(),
            err: io::stderr(),
            cfg,
            use_color,
        }
    }
}

fn format_secs(secs: i64) -> String {
    match DateTime::from_timestamp(secs, 0) {
        Some(t) => t.to_rfc3339(),
        None => secs.to_string(),
    }
}

fn describe_reason(reason: &StaleReason) -> String {
    match reason {
        StaleReason::Modified { recorded, actual } => format!(
            "modified: recorded {} != actual {}",
            format_secs(*recorded),
            format_secs(*actual)
        ),
        StaleReason::Size { recorded, actual } => {
            format!("size: recorded {recorded} != actual {actual} bytes")
        }
        StaleReason::Content { recorded, actual } => {
            format!("content: recorded {recorded} != actual {actual}")
        }
    }
}

impl<W: Write, E: Write> ReportPrinter for HumanPrinter<W, E> {
    fn print_check(&mut self, run: &CheckRun) -> io::Result<()> {
        if !self.cfg.quiet {
            for file in &run.report.files {
                self.status_line(file)?;
            }
        }

        let c = run.report.counts();
        writeln!(
            self.out,
            "Missing: {}, Unlinked: {}, Up to date: {}, Not up to date: {}",
            c.missing, c.unlinked, c.up_to_date, c.stale
        )?;
        self.duplicates(&run.duplicates)?;
        self.manifests(run.manifests.as_ref())?;

        if run.report.mode == CheckMode::Fast {
            writeln!(
                self.err,
                "Checked modification time and size only; use --force to compare content hashes"
            )?;
        }

        Ok(())
    }

    fn print_update(&mut self, run: &UpdateRun) -> io::Result<()> {
        if !self.cfg.quiet {
            for file in &run.report.files {
                self.action_line(file)?;
            }
        }

        let c = run.report.counts();
        writeln!(
            self.out,
            "Created: {}, Refreshed: {}, Unchanged: {}, Skipped (missing): {}",
            c.created, c.refreshed, c.unchanged, c.skipped
        )?;
        self.duplicates(&run.duplicates)?;
        self.manifests(run.manifests.as_ref())
    }
}

/// NDJSON printer: one object per file, per duplicate group, then a summary.
///
/// Always complete; `quiet` does not apply to machine output.
pub struct JsonPrinter<W: Write> {
    out: W,
}

impl<W: Write> JsonPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[inline]
    fn emit(&mut self, obj: &Value) -> io::Result<()> {
        writeln!(self.out, "{obj}")
    }

    fn duplicates(&mut self, groups: &[DuplicateGroup]) -> io::Result<()> {
        for group in groups {
            self.emit(&json!({
                "type": "duplicates",
                "hash": group.hash,
                "canonical": group.canonical(),
                "duplicates": group.duplicates(),
            }))?;
        }
        Ok(())
    }
}

impl JsonPrinter<io::Stdout> {
    pub fn stdout() -> Self {
        JsonPrinter { out: io::stdout() }
    }
}

fn status_json(status: &Status) -> (&'static str, Vec<Value>) {
    match status {
        Status::Missing => ("missing", Vec::new()),
        Status::Unlinked => ("unlinked", Vec::new()),
        Status::UpToDate => ("up_to_date", Vec::new()),
        Status::Stale(reasons) => ("stale", reasons.iter().map(reason_json).collect()),
    }
}

fn reason_json(reason: &StaleReason) -> Value {
    match reason {
        StaleReason::Modified { recorded, actual } => {
            json!({ "kind": "modified", "recorded": recorded, "actual": actual })
        }
        StaleReason::Size { recorded, actual } => {
            json!({ "kind": "size", "recorded": recorded, "actual": actual })
        }
        StaleReason::Content { recorded, actual } => {
            json!({ "kind": "content", "recorded": recorded, "actual": actual })
        }
    }
}

fn action_name(action: UpdateAction) -> &'static str {
    match action {
        UpdateAction::Created => "created",
        UpdateAction::Refreshed => "refreshed",
        UpdateAction::Unchanged => "unchanged",
        UpdateAction::SkippedMissing => "skipped_missing",
    }
}

impl<W: Write> ReportPrinter for JsonPrinter<W> {
    fn print_check(&mut self, run: &CheckRun) -> io::Result<()> {
        for file in &run.report.files {
            let (status, reasons) = status_json(&file.outcome);
            self.emit(&json!({
                "type": "file",
                "path": file.path,
                "status": status,
                "reasons": reasons,
            }))?;
        }
        self.duplicates(&run.duplicates)?;

        let c = run.report.counts();
        self.emit(&json!({
            "type": "summary",
            "command": "check",
            "mode": match run.report.mode {
                CheckMode::Fast => "fast",
                CheckMode::Thorough => "thorough",
            },
            "missing": c.missing,
            "unlinked": c.unlinked,
            "up_to_date": c.up_to_date,
            "stale": c.stale,
            "duplicate_groups": run.duplicates.len(),
            "manifests_written": run.manifests.is_some(),
        }))
    }

    fn print_update(&mut self, run: &UpdateRun) -> io::Result<()> {
        for file in &run.report.files {
            self.emit(&json!({
                "type": "file",
                "path": file.path,
                "action": action_name(file.outcome),
            }))?;
        }
        self.duplicates(&run.duplicates)?;

        let c = run.report.counts();
        self.emit(&json!({
            "type": "summary",
            "command": "update",
            "created": c.created,
            "refreshed": c.refreshed,
            "unchanged": c.unchanged,
            "skipped": c.skipped,
            "duplicate_groups": run.duplicates.len(),
            "manifests_written": run.manifests.is_some(),
        }))
    }
}

#[cfg(test)]
#[path = "printer_tests.rs"]
mod tests;
