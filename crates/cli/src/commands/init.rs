use std::{path::Path, process::ExitCode};

use anyhow::{Context, Result};
use glflite_fs::{InitOutcome, ensure_rules_section};
use glflite_runtime::{IGNORE_FILE_NAME, RULES_MARKER};
use log::error;

use crate::commands::GlobalArgs;

pub fn run(global: &GlobalArgs) -> ExitCode {
    match execute(global) {
        Ok(code) => code,
        Err(e) => {
            error!("[init] {e:#}");
            eprintln!("[init] {e:#}");
            ExitCode::from(2)
        }
    }
}

pub(crate) fn execute(global: &GlobalArgs) -> Result<ExitCode> {
    let root = global.repo_root()?;
    let ignore_file = root.join(IGNORE_FILE_NAME);

    let outcome = ensure_rules_section(&ignore_file)
        .with_context(|| format!("cannot set up {}", ignore_file.display()))?;

    println!("{}", describe(outcome, &ignore_file));

    Ok(ExitCode::SUCCESS)
}

pub(crate) fn describe(outcome: InitOutcome, ignore_file: &Path) -> String {
    match outcome {
        InitOutcome::Created => format!("created {}", ignore_file.display()),
        InitOutcome::MarkerAppended => {
            format!("added {RULES_MARKER} to {}", ignore_file.display())
        }
        InitOutcome::AlreadyConfigured => {
            format!("{} already has a {RULES_MARKER} section", ignore_file.display())
        }
    }
}
