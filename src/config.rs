use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_INITIAL_LENGTH: usize = 3;
pub const DEFAULT_BASE_INTERVAL_MS: u64 = 200;
pub const DEFAULT_DECAY_RATE: f64 = 0.05;
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 30;

/// Speed curve: the delay between automatic moves shrinks exponentially
/// with the score, never going below `min_interval_ms`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Difficulty {
    pub base_interval_ms: u64,
    pub decay_rate: f64,
    pub min_interval_ms: u64,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty {
            base_interval_ms: DEFAULT_BASE_INTERVAL_MS,
            decay_rate: DEFAULT_DECAY_RATE,
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
        }
    }
}

impl Difficulty {
    pub fn tick_interval_ms(&self, score: u32) -> u64 {
        let scaled = self.base_interval_ms as f64 * (-self.decay_rate * score as f64).exp();
        (scaled.round() as u64).max(self.min_interval_ms)
    }

    pub fn tick_interval(&self, score: u32) -> Duration {
        Duration::from_millis(self.tick_interval_ms(score))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.decay_rate.is_finite() || self.decay_rate < 0.0 {
            return Err(Error::InvalidDecayRate(self.decay_rate));
        }

        if self.min_interval_ms == 0 || self.min_interval_ms > self.base_interval_ms {
            return Err(Error::InvalidMinInterval {
                min: self.min_interval_ms,
                base: self.base_interval_ms,
            });
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub initial_length: usize,
    pub difficulty: Difficulty,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { initial_length: DEFAULT_INITIAL_LENGTH, difficulty: Difficulty::default() }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.initial_length == 0 {
            return Err(Error::ZeroLength);
        }

        self.difficulty.validate()
    }
}
