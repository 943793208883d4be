use std::process::ExitCode;

use anyhow::Result;

use recsys_lab::errors::EngineError;
use recsys_lab::{execute, interpret};

fn main() -> ExitCode {
    setup_logging();
    match parse_and_execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_code_for(&e)
        }
    }
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let cli = interpret();
    execute(cli)
}

/// Usage errors (bad parameters, unknown names, too few users) exit with 2
fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    let usage = error
        .downcast_ref::<EngineError>()
        .is_some_and(EngineError::is_usage_error);
    if usage { ExitCode::from(2) } else { ExitCode::FAILURE }
}
