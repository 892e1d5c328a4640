use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use lab1918_shell::cli::Cli;
use lab1918_shell::error::display_message;
use lab1918_shell::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init(cli.log_file.as_deref()) {
        eprintln!("{} {}", "✗".red(), display_message(&err));
        return ExitCode::FAILURE;
    }

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("{} {}", "✗".red(), display_message(&err));
            ExitCode::FAILURE
        }
    }
}
