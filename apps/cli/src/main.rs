//! `duka` binary entry point.

use clap::Parser;
use duka_cli::cli::Cli;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    duka_cli::init_tracing(cli.verbose);

    match duka_cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error[{}]: {}", err.code, err.message);
            ExitCode::from(err.code.exit_status())
        }
    }
}
