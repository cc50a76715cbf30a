//! shopbot CLI: run the Telegram assistant, chat with it on the console, or query the catalog.
//! Config from env (after `.env`) and optional CLI args.

mod app;
mod config;
mod console;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::BotConfig;

#[derive(Parser)]
#[command(name = "shopbot")]
#[command(about = "Catalog-grounded shop assistant: run, chat, search", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the assistant on Telegram (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Chat with the assistant on stdin/stdout, as one customer.
    Chat {
        #[arg(short, long, default_value = "console")]
        user: String,
    },
    /// Fetch the catalog and print the products block the model would get for QUERY.
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = BotConfig::load()?;
    config.validate()?;
    shopbot_core::init_tracing(Some(&config.log_file))?;

    match cli.command {
        Commands::Run { token } => app::run_telegram(&config, token).await,
        Commands::Chat { user } => app::run_console(&config, &user).await,
        Commands::Search { query } => app::print_search(&config, &query.join(" ")).await,
    }
}
