use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::game::{Game, GameError};

const DEFAULT_ROWS: i32 = 21;
const DEFAULT_COLUMNS: i32 = 31;
const DEFAULT_HISTORY: usize = 4;

/// Two-player race through a randomly generated maze
#[derive(Parser, Debug)]
#[command(name = "maze-race", version, about, long_about = None)]
pub struct Args {
    /// Board rows, rounded up to an odd number
    #[arg(long, env = "MAZE_RACE_ROWS", default_value_t = DEFAULT_ROWS, allow_negative_numbers = true)]
    pub rows: i32,

    /// Board columns, rounded up to an odd number
    #[arg(long, env = "MAZE_RACE_COLUMNS", default_value_t = DEFAULT_COLUMNS, allow_negative_numbers = true)]
    pub columns: i32,

    /// Random seed; the same seed always produces the same boards
    #[arg(long, env = "MAZE_RACE_SEED")]
    pub seed: Option<u64>,

    /// Number of past moves shown under the board
    #[arg(long, env = "MAZE_RACE_HISTORY", default_value_t = DEFAULT_HISTORY)]
    pub history: usize,

    /// Write logs to this file (filtered by RUST_LOG, default info)
    #[arg(long, env = "MAZE_RACE_LOG")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Board(#[from] GameError),
    #[error("history length must be at least 1")]
    EmptyHistory,
    #[error("cannot open log file {}: {source}", .path.display())]
    LogFile { path: PathBuf, source: io::Error },
}

/// Validated run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub rows: i32,
    pub columns: i32,
    pub seed: Option<u64>,
    pub history: usize,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        Game::new(args.rows, args.columns)?;
        if args.history == 0 {
            return Err(ConfigError::EmptyHistory);
        }
        Ok(Self {
            rows: args.rows,
            columns: args.columns,
            seed: args.seed,
            history: args.history,
            log_file: args.log_file,
        })
    }

    pub fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

/// Sends tracing output to the configured log file. The terminal belongs to
/// the game, so nothing is installed without one.
pub fn init_logging(settings: &Settings) -> Result<(), ConfigError> {
    let Some(path) = &settings.log_file else {
        return Ok(());
    };
    let file = File::create(path).map_err(|source| ConfigError::LogFile {
        path: path.clone(),
        source,
    })?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
