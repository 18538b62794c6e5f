use std::io::Write;
use std::process::ExitCode;

use coztrail_summary::config::API_KEY_VAR;
use coztrail_summary::{Cli, Error};
use dotenv::dotenv;
use log::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let result = match Cli::try_from_args(std::env::args_os()) {
        Ok(cli) => coztrail_summary::run(cli, std::env::var(API_KEY_VAR).ok()).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(content) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = stdout.write_all(content.as_bytes()).and_then(|_| stdout.flush()) {
                error!("Failed to write output: {}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e @ Error::Argument(_)) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
