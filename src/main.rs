use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use transcheck::cli::{Arguments, Outcome};

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "TRANSCHECK_LOG";

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,transcheck=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Arguments::parse();
    init_logging(args.verbose());

    match transcheck::cli::run_cli(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            Outcome::Aborted.into()
        }
    }
}
