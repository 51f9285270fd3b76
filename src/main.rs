mod buffer;
mod config;
mod error;
mod food;
mod game;
mod snake;
mod term;

use std::fs::File;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::builder::TypedValueParser as _;
use clap::Parser;
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::config::{Difficulty, EngineConfig};

pub type TermInt = u16;

/// Terminal snake. The snake speeds up as it eats.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Initial snake length
    #[arg(
        long,
        value_name = "CELLS",
        default_value_t = config::DEFAULT_INITIAL_LENGTH,
        value_parser = clap::value_parser!(u64).range(1..).map(|n| n as usize)
    )]
    length: usize,

    /// Delay between automatic moves at score 0
    #[arg(long, value_name = "MS", default_value_t = config::DEFAULT_BASE_INTERVAL_MS)]
    base_interval: u64,

    /// Exponential speed-up per point scored
    #[arg(long, value_name = "RATE", default_value_t = config::DEFAULT_DECAY_RATE)]
    decay: f64,

    /// Fastest allowed delay between moves
    #[arg(long, value_name = "MS", default_value_t = config::DEFAULT_MIN_INTERVAL_MS)]
    min_interval: u64,

    /// Write logs to this file; logging is off without it
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[arg(long, value_name = "LEVEL", default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            initial_length: self.length,
            difficulty: Difficulty {
                base_interval_ms: self.base_interval,
                decay_rate: self.decay,
                min_interval_ms: self.min_interval,
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let file = File::create(path).with_context(|| format!("cannot create log file {}", path.display()))?;
        WriteLogger::init(cli.log_level, Config::default(), file)
            .map_err(|e| anyhow!("failed to initialize logger: {}", e))?;
    }

    let config = cli.engine_config();
    config.validate()?;
    info!("Starting with {:?}", config);

    let mut game = game::SnakeGame::new(config);
    game.initialize()?;
    let res = run(&mut game);
    // Leave raw mode before anything gets printed
    game.restore()?;
    res
}

fn run(game: &mut game::SnakeGame) -> Result<()> {
    if !game.show_intro()? {
        return Ok(());
    }

    // Play until the player quits
    while let Some(over) = game.play()? {
        info!("Session ended: {} Final score {}", over.reason, over.score);
        if !game.wants_rematch(over)? {
            break;
        }
    }

    info!("Bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_flag_sets_initial_length() {
        let cli = Cli::try_parse_from(["snake", "--length", "5"]).unwrap();
        assert_eq!(cli.engine_config().initial_length, 5);

        let cli = Cli::try_parse_from(["snake"]).unwrap();
        assert_eq!(cli.engine_config(), EngineConfig::default());
    }

    #[test]
    fn zero_length_is_refused() {
        assert!(Cli::try_parse_from(["snake", "--length", "0"]).is_err());
    }
}
