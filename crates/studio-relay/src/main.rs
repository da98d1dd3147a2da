//! Studio relay daemon

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use studio_relay::StudioError;
use studio_relay::config::Config;
use studio_relay::contact::HttpMailer;
use studio_relay::error::Result;
use studio_relay::prompt::PromptBuilder;
use studio_relay::server::{AppState, RelayServer};

/// Studio relay - streaming chat and contact-form backend
#[derive(Parser)]
#[command(name = "studio-relay")]
#[command(about = "Streams redacted LLM chat to the browser and delivers contact-form mail")]
#[command(version)]
pub struct Cli {
    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the relay server (default command)
    #[command(name = "serve")]
    Serve,

    /// Print the system prompt the chat endpoint would send
    #[command(name = "prompt")]
    Prompt {
        /// JSON file with a game-name to stats mapping
        #[arg(long)]
        stats: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        None | Some(Command::Serve) => serve(cli.config).await,
        Some(Command::Prompt { stats }) => print_prompt(cli.config, stats),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,studio_relay=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    let mut config = Config::load(config_path.as_deref())?;
    config.apply_env_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}

async fn serve(config_path: Option<PathBuf>) -> Result<()> {
    tracing::info!("Starting studio relay");

    let config = load_config(config_path)?;
    tracing::debug!("Config loaded: {:?}", config);

    let api_key = config
        .upstream
        .resolve_api_key(|key| std::env::var(key).ok())?;

    let mailer = Arc::new(HttpMailer::new(&config.mail)?);
    let state = AppState::from_config(&config, &api_key, mailer)?;

    RelayServer::new(&config, state).serve().await
}

fn print_prompt(config_path: Option<PathBuf>, stats_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let builder = PromptBuilder::from_config(&config.studio)?;

    let stats = match stats_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)?;
            let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
                StudioError::Serialization(format!(
                    "Failed to parse stats file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            Some(value)
        }
        None => None,
    };

    println!("{}", builder.build(stats.as_ref()));
    Ok(())
}
