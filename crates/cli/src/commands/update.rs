use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use glflite_engine::run_update;
use log::error;

use crate::commands::{GlobalArgs, RunArgs};

#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

pub fn run(global: &GlobalArgs, args: UpdateArgs) -> ExitCode {
    match execute(global, args) {
        Ok(code) => code,
        Err(e) => {
            error!("[update] {e:#}");
            eprintln!("[update] {e:#}");
            ExitCode::from(2)
        }
    }
}

fn execute(global: &GlobalArgs, args: UpdateArgs) -> Result<ExitCode> {
    let opts = args.run.options(global)?;
    let result = run_update(&opts).context("update failed")?;

    let mut printer = args.run.output.make_printer(args.run.quiet);
    printer.print_update(&result)?;

    Ok(ExitCode::SUCCESS)
}
