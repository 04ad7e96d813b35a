use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::Path,
};

use glflite_runtime::config::{DEFAULT_IGNORE_CONTENT, RULES_MARKER};
use log::debug;

use crate::rules::RuleSet;

#[inline]
fn is_marker(line: &str) -> bool {
    line.trim() == RULES_MARKER
}

/// Rules following the marker line, or `None` when the marker is absent.
pub fn parse_rules_section(content: &str) -> Option<RuleSet> {
    let mut lines = content.lines();
    lines.by_ref().find(|l| is_marker(l))?;

    Some(RuleSet::from_lines(lines.filter(|l| !is_marker(l))))
}

/// Load the tracked-rules section from an ignore file.
///
/// Returns `Ok(None)` when the file exists but carries no marker.
pub fn load_rules(ignore_file: &Path) -> io::Result<Option<RuleSet>> {
    let meta = fs::metadata(ignore_file)?;
    if meta.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("the file {} is a directory", ignore_file.display()),
        ));
    }

    let content = fs::read_to_string(ignore_file)?;
    let rules = parse_rules_section(&content);

    if let Some(rules) = &rules {
        debug!(
            "[rules] loaded {} rules from {}",
            rules.len(),
            ignore_file.display()
        );
    }

    Ok(rules)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The ignore file did not exist and was written with the default section.
    Created,
    /// The ignore file existed without a marker; one was appended.
    MarkerAppended,
    /// Nothing to do.
    AlreadyConfigured,
}

/// Make sure `ignore_file` exists and contains the rules marker.
pub fn ensure_rules_section(ignore_file: &Path) -> io::Result<InitOutcome> {
    if !ignore_file.exists() {
        fs::write(ignore_file, DEFAULT_IGNORE_CONTENT)?;
        return Ok(InitOutcome::Created);
    }

    if load_rules(ignore_file)?.is_some() {
        return Ok(InitOutcome::AlreadyConfigured);
    }

    let mut file = OpenOptions::new().append(true).open(ignore_file)?;
    writeln!(file)?;
    writeln!(file, "{RULES_MARKER}")?;

    Ok(InitOutcome::MarkerAppended)
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
