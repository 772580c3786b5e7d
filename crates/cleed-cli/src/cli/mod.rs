mod commands;
mod logging;

use anyhow::Context;
use clap::Parser;
use cleed_core::domain::PhaseError;

pub fn run_from_env() -> i32 {
    match parse_and_dispatch(std::env::args().collect()) {
        Ok(code) => code,
        Err(error) => {
            let phase_error = error.as_phase_error();
            eprintln!("{}", phase_error.diagnostic_line());
            eprintln!("{}", phase_error.fatal_exit_line());
            phase_error.exit_code()
        }
    }
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            logging::init_tracing(cli.verbose).context("failed to install log subscriber")?;
            dispatch_parsed(cli.command)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(name = "cleed-phs", version, about = "LEED phase-shift table loader")]
struct Cli {
    /// Log each file read and dump loaded tables
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Load phase-shift files through one repository and summarize them
    Load(commands::LoadArgs),
    /// Print the energy/phase-shift table of one file
    Table(commands::TableArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Load(args) => commands::run_load_command(args),
        CliCommand::Table(args) => commands::run_table_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Phase(PhaseError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_phase_error(&self) -> PhaseError {
        match self {
            Self::Usage(message) => {
                PhaseError::configuration("CONFIG.CLI_USAGE", message.trim_end().to_string())
            }
            Self::Phase(error) => error.clone(),
            Self::Internal(error) => PhaseError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
