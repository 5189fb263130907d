//! cruise-signage: message service for the cruise's digital signage.
//!
//! Single-binary Tokio application that:
//! 1. Loads configuration (.env, config.toml, environment)
//! 2. Caches live weather for the pier
//! 3. Selects a scenario from the venue clock and event calendar
//! 4. Asks the text provider for one short message
//! 5. Serves seat availability and the static front end

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use cruise_signage::config;
use cruise_signage::{router, AppState};

/// Cruise signage message service
#[derive(Parser)]
#[command(name = "cruise-signage", about = "Cruise digital-signage message service")]
struct Cli {
    /// Config file (defaults to ./config.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the request for the current moment and exit without calling the provider.
    #[arg(long)]
    print_prompt: bool,

    /// With --print-prompt, build the restaurant recommendation instead.
    #[arg(long, requires = "print_prompt")]
    restaurant_mode: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cruise_signage=info,weather_client=info,seat_client=info,content_client=info,scenario=info,tower_http=info".into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let cfg = match config::load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState::from_config(&cfg).context("failed to build service state")?;

    let today = state.now().date;
    let calendar = state.selector.calendar();
    match calendar.next_event_day(today) {
        Some(day) => info!("Event days: {} configured, next on {}", calendar.len(), day),
        None => info!("Event days: {} configured, none upcoming", calendar.len()),
    }

    if cli.print_prompt {
        let prepared = if cli.restaurant_mode {
            state.prepare_recommendation().await?
        } else {
            state.prepare_signage().await
        };
        info!(scenario = prepared.descriptor.scenario.name(), "Compiled request");
        println!("{}", prepared.prompt);
        return Ok(());
    }

    let app = router(state, Some(&cfg.server.static_dir));

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", cfg.server.host, cfg.server.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening at http://{}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
