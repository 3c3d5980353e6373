//! tadist - grading distribution for course staff
//!
//! Splits the groups of each assignment part among teaching assistants,
//! honouring per-TA blacklists and load offsets, and keeps grading sheets
//! in step with the official distribution.

mod cli;
mod commands;

use std::env;
use std::process::ExitCode;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::Parser;

use cli::{Cli, OutputFormat};
use tadist_core::error::{ExitCode as Status, TadistError};
use tadist_core::logging;

fn main() -> ExitCode {
    let start = Instant::now();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Scripts asking for JSON get a JSON envelope even when parsing fails
        Err(err) if !is_informational(&err) && wants_json(env::args().skip(1)) => {
            return fail(&parse_error(&err), OutputFormat::Json, false);
        }
        Err(err) => err.exit(),
    };

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("warning: logging disabled: {}", e);
    }
    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(()) => ExitCode::from(Status::Success as u8),
        Err(e) => fail(&e, cli.format, cli.quiet),
    }
}

fn is_informational(err: &clap::Error) -> bool {
    matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

fn parse_error(err: &clap::Error) -> TadistError {
    match err.kind() {
        ErrorKind::ArgumentConflict => TadistError::DuplicateFormat,
        ErrorKind::ValueValidation
        | ErrorKind::InvalidValue
        | ErrorKind::InvalidSubcommand
        | ErrorKind::UnknownArgument
        | ErrorKind::MissingRequiredArgument
        | ErrorKind::MissingSubcommand
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            TadistError::UsageError(err.to_string())
        }
        _ => TadistError::Other(err.to_string()),
    }
}

fn fail(err: &TadistError, format: OutputFormat, quiet: bool) -> ExitCode {
    match format {
        OutputFormat::Json => eprintln!("{}", err.to_json()),
        OutputFormat::Human if !quiet => eprintln!("error: {}", err),
        OutputFormat::Human => {}
    }
    ExitCode::from(err.exit_code() as u8)
}

/// `--format json` or `--format=json` anywhere on the command line
fn wants_json(mut args: impl Iterator<Item = String>) -> bool {
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--format=json" => return true,
            "--format" if args.next().as_deref() == Some("json") => return true,
            _ => {}
        }
    }
    false
}
