//! Configuration for the simulation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

/// Simulation configuration.
///
/// A run is governed by two external parameters (the time-unit scale and
/// the total simulated duration) plus sizing knobs defaulting to the
/// reference scenario. Parsed once at startup; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Length of one simulated time unit, in milliseconds.
    pub time_unit_ms: u64,

    /// Total simulated duration, in time units.
    pub total_time: u64,

    /// Worker threads settling each bank's queue.
    pub processors_per_bank: usize,

    /// Client accounts opened per bank at setup.
    pub accounts_per_bank: usize,

    /// Upper bound for random opening balances and overdraft limits.
    pub initial_balance_max: i64,

    /// Lower bound for random reserve seeding.
    pub reserve_seed_min: i64,

    /// Upper bound for random reserve seeding.
    pub reserve_seed_max: i64,

    /// Smallest generated transfer amount, in minor units.
    pub amount_min: i64,

    /// Largest generated transfer amount, in minor units.
    pub amount_max: i64,

    /// Settlement latency applied after each transaction, in time units.
    pub processing_delay_units: u32,

    /// Seed for generators and setup randomness; `None` uses OS entropy.
    pub rng_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_unit_ms: 100,                 // 0.1s per simulated unit
            total_time: 60,                    // 60 units per run
            processors_per_bank: 10,
            accounts_per_bank: 100,
            initial_balance_max: 100_000,
            reserve_seed_min: 100_000_000,
            reserve_seed_max: 10_000_000_000,
            amount_min: 100,
            amount_max: 1_000_000,
            processing_delay_units: 3,
            rng_seed: None,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(value) = std::env::var("SIM_TIME_UNIT_MS") {
            config.time_unit_ms = parse_env("SIM_TIME_UNIT_MS", &value)?;
        }
        if let Ok(value) = std::env::var("SIM_TOTAL_TIME") {
            config.total_time = parse_env("SIM_TOTAL_TIME", &value)?;
        }
        if let Ok(value) = std::env::var("SIM_PROCESSORS_PER_BANK") {
            config.processors_per_bank = parse_env("SIM_PROCESSORS_PER_BANK", &value)?;
        }
        if let Ok(value) = std::env::var("SIM_ACCOUNTS_PER_BANK") {
            config.accounts_per_bank = parse_env("SIM_ACCOUNTS_PER_BANK", &value)?;
        }
        if let Ok(value) = std::env::var("SIM_RNG_SEED") {
            config.rng_seed = Some(parse_env("SIM_RNG_SEED", &value)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.time_unit_ms == 0 {
            return Err(Error::Config("time_unit_ms must be positive".into()));
        }
        if self.processors_per_bank == 0 {
            return Err(Error::Config("processors_per_bank must be positive".into()));
        }
        if self.accounts_per_bank == 0 {
            return Err(Error::Config("accounts_per_bank must be positive".into()));
        }
        if self.initial_balance_max < 0 {
            return Err(Error::Config(
                "initial_balance_max must be non-negative".into(),
            ));
        }
        if self.amount_min <= 0 || self.amount_max < self.amount_min {
            return Err(Error::Config(format!(
                "invalid amount range {}..={}",
                self.amount_min, self.amount_max
            )));
        }
        if self.reserve_seed_min <= 0 || self.reserve_seed_max < self.reserve_seed_min {
            return Err(Error::Config(format!(
                "invalid reserve seed range {}..={}",
                self.reserve_seed_min, self.reserve_seed_max
            )));
        }
        Ok(())
    }

    /// Length of one simulated time unit.
    pub fn time_unit(&self) -> Duration {
        Duration::from_millis(self.time_unit_ms)
    }

    /// Settlement latency applied after each transaction.
    pub fn processing_delay(&self) -> Duration {
        self.time_unit() * self.processing_delay_units
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e| Error::Config(format!("invalid {key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.processors_per_bank, 10);
        assert_eq!(config.accounts_per_bank, 100);
        assert_eq!(config.processing_delay(), Duration::from_millis(300));
    }

    #[test]
    fn test_validate_rejects_zero_time_unit() {
        let config = Config {
            time_unit_ms: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_amount_range() {
        let config = Config {
            amount_min: 500,
            amount_max: 100,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let config = Config {
            processors_per_bank: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("SIM_TIME_UNIT_MS", "5");
        std::env::set_var("SIM_TOTAL_TIME", "7");
        std::env::set_var("SIM_RNG_SEED", "42");
        let config = Config::from_env().unwrap();
        std::env::remove_var("SIM_TIME_UNIT_MS");
        std::env::remove_var("SIM_TOTAL_TIME");
        std::env::remove_var("SIM_RNG_SEED");

        assert_eq!(config.time_unit_ms, 5);
        assert_eq!(config.total_time, 7);
        assert_eq!(config.rng_seed, Some(42));
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let config = Config::default();
        let encoded = toml::to_string(&config).unwrap();
        let decoded: Config = toml::from_str(&encoded).unwrap();
        assert_eq!(decoded.total_time, config.total_time);
        assert_eq!(decoded.rng_seed, config.rng_seed);
    }
}
