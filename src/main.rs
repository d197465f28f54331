use clap::Parser;
use gdev_kit::cli::{self, Cli, Command};
use gdev_kit::config::AppConfig;
use gdev_kit::infrastructure::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    match cli.command {
        Command::Serve => cli::serve::run(&config).await,
        Command::Copy(args) => cli::copy::run(args).await,
        Command::Token(args) => cli::token::run(&config, args),
    }
}
