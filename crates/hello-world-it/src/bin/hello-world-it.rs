//! Hello-world extension contract runner

use clap::Parser;
use extension_it::telemetry;
use hello_world_it::cli::{Cli, run};
use log::error;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init();
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(report) => {
            println!("{report}");
            if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            error!("Suite aborted: {e}");
            ExitCode::from(2)
        }
    }
}
