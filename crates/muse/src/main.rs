//! Muse - chat-driven music assistant for Spotify-compatible providers.
//!
//! Main entry point for the muse CLI.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

mod commands;

use commands::{chat, devices, login, logout, play, profile, status, transfer, volume};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Muse - chat-driven music assistant for Spotify-compatible providers
#[derive(Parser)]
#[command(name = "muse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in to the streaming provider via OAuth
    Login(login::LoginArgs),

    /// Clear stored credentials
    Logout(logout::LogoutArgs),

    /// Show authentication status
    Status(status::StatusArgs),

    /// Show the signed-in user's profile
    Profile(profile::ProfileArgs),

    /// List available playback devices
    Devices(devices::DevicesArgs),

    /// Play a track or playlist URI
    Play(play::PlayArgs),

    /// Transfer playback to another device
    Transfer(transfer::TransferArgs),

    /// Show or set the persisted playback volume
    Volume(volume::VolumeArgs),

    /// Enter interactive chat mode
    Chat(chat::ChatArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing — console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "muse=debug,muse_auth=debug,muse_client=debug,muse_player=debug,muse_config=debug,info"
    } else {
        "muse=info,muse_auth=info,muse_client=info,muse_player=info,warn"
    };

    let log_dir = muse_config::config_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "muse.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "muse=trace,muse_auth=trace,muse_client=trace,muse_player=trace,muse_config=trace,info",
                )),
        )
        .init();

    let loaded = muse_config::load_config().context("failed to load configuration")?;
    if let Some(source) = &loaded.source {
        tracing::debug!("configuration loaded from {}", source.display());
    }

    let data_dir = muse_config::data_dir().context("could not determine data directory")?;

    let ctx = commands::Context {
        config: loaded.config,
        data_dir,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    // Dispatch to command handlers
    match cli.command {
        Commands::Login(args) => login::run(args, &ctx).await,
        Commands::Logout(args) => logout::run(args, &ctx).await,
        Commands::Status(args) => status::run(args, &ctx).await,
        Commands::Profile(args) => profile::run(args, &ctx).await,
        Commands::Devices(args) => devices::run(args, &ctx).await,
        Commands::Play(args) => play::run(args, &ctx).await,
        Commands::Transfer(args) => transfer::run(args, &ctx).await,
        Commands::Volume(args) => volume::run(args, &ctx).await,
        Commands::Chat(args) => chat::run(args, &ctx).await,
    }
}
