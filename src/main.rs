use std::process::ExitCode;

use netota::cli::{self, Cli};
use netota::{APP_NAME, VERSION, exit_code};
use netota::utils::logging::init_cli_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    if let Err(e) = init_cli_logging(cli.quiet) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    log::debug!("{} {} starting", APP_NAME, VERSION);
    let result = cli::run(&cli).await;
    match &result {
        Ok(report) => {
            for warning in report.warnings() {
                log::warn!("{}", warning);
            }
            log::debug!("Run finished: {:?}", report);
        }
        Err(e) => {
            if cli.verbose {
                println!("❌ {}", e);
                log::debug!("Run failed: {:#}", e);
            } else {
                log::error!("{:#}", e);
            }
        }
    }

    ExitCode::from(exit_code(&result))
}
