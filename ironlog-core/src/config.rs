//! Process configuration, read from the environment.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::training::{DEFAULT_PLATE_STEP, DeloadPolicy};

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const PLATE_STEP: &str = "IRONLOG_PLATE_STEP";
pub const DELOAD_REDUCTION: &str = "IRONLOG_DELOAD_REDUCTION";
pub const DELOAD_RIR: &str = "IRONLOG_DELOAD_RIR";
pub const POOL_SIZE: &str = "IRONLOG_POOL_SIZE";

const DEFAULT_POOL_SIZE: u32 = 4;

/// Knobs of the training-load engine used by the service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub plate_step: f64,
    pub deload: DeloadPolicy,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            plate_step: DEFAULT_PLATE_STEP,
            deload: DeloadPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub pool_size: u32,
    pub training: TrainingConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "{} must be specified or present in the environment",
                    DATABASE_URL
                )
            })?;

        let defaults = TrainingConfig::default();
        let plate_step = parse_or(&lookup, PLATE_STEP, defaults.plate_step)?;
        if !(plate_step.is_finite() && plate_step > 0.0) {
            return Err(anyhow!("{} must be a positive number, got {}", PLATE_STEP, plate_step));
        }
        let load_reduction = parse_or(&lookup, DELOAD_REDUCTION, defaults.deload.load_reduction)?;
        if !(0.0..=100.0).contains(&load_reduction) {
            return Err(anyhow!(
                "{} must be between 0 and 100, got {}",
                DELOAD_REDUCTION,
                load_reduction
            ));
        }
        let rir = parse_or(&lookup, DELOAD_RIR, defaults.deload.rir)?;
        if rir < 0 {
            return Err(anyhow!("{} must not be negative, got {}", DELOAD_RIR, rir));
        }
        let pool_size = parse_or(&lookup, POOL_SIZE, DEFAULT_POOL_SIZE)?;

        Ok(Config {
            database_url,
            pool_size,
            training: TrainingConfig {
                plate_step,
                deload: DeloadPolicy {
                    load_reduction,
                    rir,
                },
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        _ => Ok(default),
    }
}
