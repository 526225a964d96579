//! Beatsmith - terminal studio for engineering Suno prompts
//!
#![doc = "Main entry point for the Beatsmith application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use beatsmith::cli::{Cli, Commands};
use beatsmith::commands;
use beatsmith::commands::auth::resolve_api_key;
use beatsmith::config::Config;
use beatsmith::providers::create_provider;
use beatsmith::session::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse_args();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)?;
    config.validate()?;

    match cli.command {
        Commands::Chat {
            thinking,
            search,
            beef_up,
            resume,
        } => {
            tracing::info!("Starting interactive chat session");
            let api_key = resolve_api_key(&config)?;
            let provider = create_provider(&config.provider, api_key)?;
            let store = open_store(&config)?;
            let options = commands::ChatOptions {
                thinking,
                search,
                beef_up,
                resume,
            };
            commands::run_chat(&config, &store, provider.as_ref(), options).await?;
            Ok(())
        }
        Commands::Auth { clear } => {
            commands::handle_auth(clear)?;
            Ok(())
        }
        Commands::Sessions { command } => {
            let store = open_store(&config)?;
            commands::handle_sessions(&store, command)?;
            Ok(())
        }
        Commands::Templates { command } => {
            commands::handle_templates(command)?;
            Ok(())
        }
        Commands::Presets { beef_up } => {
            commands::handle_presets(beef_up)?;
            Ok(())
        }
        Commands::Analyze { file, description } => {
            tracing::info!("Starting audio audit for {}", file);
            let api_key = resolve_api_key(&config)?;
            let provider = create_provider(&config.provider, api_key)?;
            commands::handle_analyze(provider.as_ref(), &file, &description).await?;
            Ok(())
        }
    }
}

fn open_store(config: &Config) -> Result<SessionStore> {
    let data_dir = config.storage.resolve_data_dir()?;
    SessionStore::new(data_dir.join("sessions.db"))
}

/// Initialize tracing subscriber with environment filter
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("beatsmith=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
