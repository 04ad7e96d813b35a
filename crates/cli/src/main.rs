use std::process::ExitCode;

use clap::Parser;

mod commands;
mod printer;

use commands::{Command, GlobalArgs};
use glflite_runtime::logging;

#[derive(Debug, Parser)]
#[command(
    name = "glflite",
    version,
    about = "Track large files next to git with metadata sidecars",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_with(cli.global.log_level.as_deref()).ok();

    match cli.command {
        Command::Check(args) => commands::check::run(&cli.global, args),
        Command::Update(args) => commands::update::run(&cli.global, args),
        Command::Init => commands::init::run(&cli.global),
    }
}
