use std::process::ExitCode;

use clap::Parser;

use wms_cli::{Cli, run};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    wms_observability::init_with(cli.log_format.into());

    match run(&cli) {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to render output");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            tracing::error!("command failed: {err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
