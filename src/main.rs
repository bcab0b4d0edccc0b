use anyhow::Result;
use clap::Parser;
use rouilleshd::config::Config;
use rouilleshd::core_cli::Cli;
use rouilleshd::helpers::init_logger;
use rouilleshd::server;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    init_logger(if args.verbose { "debug" } else { "info" });

    // Defaults, then the configuration file, then flags and environment
    let config = Config::from_cli(&args)?;

    // Run the shell server
    server::run(config).await?;

    Ok(())
}
