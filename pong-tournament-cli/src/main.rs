mod config;
mod history;
mod logger;
mod play;
mod store;
mod utils;

use std::io;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use thiserror::Error;

use config::Config;
use store::JsonStore;

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Path to the config file. A missing file falls back to the defaults.
    #[arg(short, long, default_value = "pong-tournament.toml")]
    config: PathBuf,
    #[arg(short, long)]
    loglevel: Option<LevelFilter>,
    /// Path to the tournament history file.
    #[arg(long)]
    history: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a new tournament.
    Play(play::Command),
    /// Inspect or clear past tournaments.
    History {
        #[command(subcommand)]
        command: history::Command,
    },
}

fn main() {
    let args = Args::parse();

    let mut config = match Config::load(&args.config) {
        Ok(config) => config.with_environment(),
        Err(err) => {
            eprintln!("Failed to load config {}: {}", args.config.display(), err);
            process::exit(1);
        }
    };

    if let Some(loglevel) = args.loglevel {
        config.loglevel = loglevel;
    }

    if let Some(history) = args.history {
        config.history = history;
    }

    logger::init(config.loglevel);
    log::debug!("Using config: {:?}", config);

    let mut store = JsonStore::new(&config.history);

    let res = match args.command {
        Command::Play(command) => command.run(&config, &mut store),
        Command::History { command } => command.run(&mut store),
    };

    if let Err(err) = res {
        eprintln!("{}", err);
        process::exit(1);
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid history file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Tournament(#[from] pong_tournament_core::Error),
    #[error("unexpected end of input")]
    Eof,
}
