//! InterMAX - terminal chat client
//!
//! Main entry point for the InterMAX client application.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use intermax::cli::{Cli, Commands};
use intermax::commands;
use intermax::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    // Load configuration (file, then env vars, then CLI overrides)
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;
    config.validate()?;

    match cli.command {
        Commands::Login { username, password } => {
            tracing::info!("Starting user login");
            commands::auth::run_login(config, username, password)?;
            Ok(())
        }
        Commands::Logout => {
            commands::auth::run_logout(config)?;
            Ok(())
        }
        Commands::Chat { model } => {
            tracing::info!("Starting interactive chat terminal");
            if let Some(m) = &model {
                tracing::debug!("Using model override: {}", m);
            }
            commands::chat::run_chat(config, model).await?;
            Ok(())
        }
        Commands::Projects { command } => {
            commands::projects::handle_projects(config, command)?;
            Ok(())
        }
        Commands::Models { command } => {
            commands::models::handle_models(config, command)?;
            Ok(())
        }
        Commands::Admin { command } => {
            tracing::info!("Starting admin console command");
            commands::admin::handle_admin(config, command)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "intermax=debug"
    } else {
        "intermax=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
