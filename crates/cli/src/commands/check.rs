use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use glflite_engine::run_check;
use log::error;

use crate::commands::{GlobalArgs, RunArgs};

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Exit with status 1 when any tracked file is missing, unlinked or not up to date
    #[arg(long)]
    pub strict: bool,
}

pub fn run(global: &GlobalArgs, args: CheckArgs) -> ExitCode {
    match execute(global, args) {
        Ok(code) => code,
        Err(e) => {
            error!("[check] {e:#}");
            eprintln!("[check] {e:#}");
            ExitCode::from(2)
        }
    }
}

fn execute(global: &GlobalArgs, args: CheckArgs) -> Result<ExitCode> {
    let opts = args.run.options(global)?;
    let result = run_check(&opts).context("check failed")?;

    let mut printer = args.run.output.make_printer(args.run.quiet);
    printer.print_check(&result)?;

    if args.strict && result.report.has_problems() {
        return Ok(ExitCode::from(1));
    }

    Ok(ExitCode::SUCCESS)
}
