pub mod check;
pub mod init;
pub mod update;

use std::{
    env, io,
    path::{Component, Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use glflite_engine::{CheckMode, RunOptions};
use glflite_runtime::current_repo_root;

pub use check::CheckArgs;
pub use update::UpdateArgs;

use crate::printer::{
    ColorChoice, HumanPrinter, JsonPrinter, OutputFormat, PrinterConfig, ReportPrinter,
};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report tracked files that are missing, unlinked or out of date.
    ///
    /// Example:
    ///   glflite check
    ///   glflite check --force --file assets/video
    Check(CheckArgs),

    /// Write or refresh metadata records for tracked files.
    ///
    /// Example:
    ///   glflite update
    ///   glflite update --force
    Update(UpdateArgs),

    /// Add the #GitLFSLite section to the repository's .gitignore.
    Init,
}

/// Options shared by every command.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Repository root; discovered from the current directory by default
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); overrides GLFLITE_LOG_LEVEL
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl GlobalArgs {
    pub fn repo_root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(root) => root
                .canonicalize()
                .with_context(|| format!("repository root {} is not accessible", root.display())),
            None => current_repo_root().context("not inside a git repository"),
        }
    }
}

#[derive(Debug, Args)]
pub struct OutputOptions {
    /// Output results as NDJSON (one JSON object per line)
    #[arg(long)]
    pub json: bool,

    /// When to use colors: auto, always, never
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: String,
}

impl OutputOptions {
    pub fn make_printer(&self, quiet: bool) -> Box<dyn ReportPrinter> {
        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        };

        let color = match self.color.as_str() {
            "always" => ColorChoice::Always,
            "never" => ColorChoice::Never,
            _ => ColorChoice::Auto,
        };

        let cfg = PrinterConfig {
            format,
            color,
            quiet,
        };

        match format {
            OutputFormat::Human => Box::new(HumanPrinter::<io::Stdout, io::Stderr>::stdout(cfg)),
            OutputFormat::Json => Box::new(JsonPrinter::<io::Stdout>::stdout()),
        }
    }
}

/// Flags shared by `check` and `update`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Compare content hashes instead of modification time and size
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Print summaries only
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Only consider this file or the tracked files below this directory
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputOptions,
}

impl RunArgs {
    pub fn options(&self, global: &GlobalArgs) -> Result<RunOptions> {
        let root = global.repo_root()?;

        let scope = match &self.file {
            Some(file) => {
                let cwd = env::current_dir().context("cannot read the current directory")?;
                scope_key(&root, &cwd, file)?
            }
            None => None,
        };

        Ok(RunOptions {
            mode: CheckMode::from_force(self.force),
            scope,
            ..RunOptions::new(root)
        })
    }
}

/// Root-relative `/`-joined key for `file`, resolved against `cwd`.
///
/// The path need not exist (missing files can be scoped too), so it is
/// normalized lexically. `None` when it names the root itself.
pub fn scope_key(root: &Path, cwd: &Path, file: &Path) -> Result<Option<String>> {
    let joined = cwd.join(file);

    let mut normalized = PathBuf::new();
    for comp in joined.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    let Ok(rel) = normalized.strip_prefix(root) else {
        bail!(
            "{} is outside the repository at {}",
            file.display(),
            root.display()
        );
    };

    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if parts.is_empty() {
        Ok(None)
    } else {
        Ok(Some(parts.join("/")))
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
