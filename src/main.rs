use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bevy::prelude::*;
use bevy_pairmatch::{load_log, replay_session, GameConfig, PairMatchPlugin, PairMatchSettings};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bevy_pairmatch", about = "Spot which bottom icon matches the top one, fast")]
struct Cli {
    /// TOML file overriding the default timings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the game window (default)
    Play,
    /// Re-judge a recorded session from its JSON-lines round log
    Verify { log: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Play) {
        Command::Play => play(cli.config.as_deref()),
        Command::Verify { log } => verify(cli.config.as_deref(), &log),
    }
}

fn play(config: Option<&Path>) -> ExitCode {
    // Bevy installs the log subscriber, so report config problems directly.
    let config = match GameConfig::load_or_default(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let exit = App::new()
        .insert_resource(PairMatchSettings { config })
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Pair Match".into(),
                    resolution: (720., 560.).into(),
                    resizable: true,
                    ..default()
                }),
                ..default()
            }),
            PairMatchPlugin,
        ))
        .run();
    if exit.is_error() { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

fn verify(config: Option<&Path>, log: &Path) -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bevy_pairmatch=info")),
        )
        .init();

    let config = match GameConfig::load_or_default(config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };
    let rounds = match load_log(log) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to load {}: {e}", log.display());
            return ExitCode::FAILURE;
        }
    };
    match replay_session(&rounds, &config.timing) {
        Ok(game_points) => {
            tracing::info!("Replay OK: {} rounds, {} game points", rounds.len(), game_points);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Replay FAILED: {e}");
            ExitCode::FAILURE
        }
    }
}
