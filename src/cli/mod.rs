//! Command-line interface: argument parsing, command handlers and
//! cargo-style terminal output.

use std::process::ExitCode;

use anyhow::Result;

pub mod args;
pub mod commands;
mod outcome;
mod report;
mod run;

pub use args::{Arguments, Command};
pub use outcome::Outcome;

pub fn run_cli(args: Arguments) -> Result<ExitCode> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(Outcome::Clean.into());
    };

    let result = run::run(args)?;
    report::print(&result);

    Ok(Outcome::of(&result).into())
}
