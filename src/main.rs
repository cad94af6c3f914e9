use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use dayna::{cli::Cli, runtime::Orchestrator, utils::init_logger, DaynaError};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(cli.verbose);

    let outcome = match Orchestrator::new(cli) {
        Ok(orchestrator) => orchestrator.run().await,
        Err(e) => Err(e),
    };

    if let Err(e) = outcome {
        // Configuration problems get remediation text, not a backtrace
        if let Some(err) = e.downcast_ref::<DaynaError>().filter(|err| err.is_fatal()) {
            eprintln!("{} {}", "ERROR:".red().bold(), err);
            std::process::exit(1);
        }
        return Err(e);
    }

    Ok(())
}
