//! Engine configuration loaded from the environment.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{EngineError, Result};

/// Attempts considered when estimating recent accuracy.
pub const DEFAULT_RECENT_WINDOW: usize = 10;

pub const ENV_DATABASE_PATH: &str = "PRACTICE_DATABASE_PATH";
pub const ENV_RECENT_WINDOW: &str = "PRACTICE_RECENT_WINDOW";
pub const ENV_DAILY_RESET_HOUR: &str = "PRACTICE_DAILY_RESET_HOUR";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub database_path: PathBuf,
    pub recent_window: usize,
    pub daily_reset_hour: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            recent_window: DEFAULT_RECENT_WINDOW,
            daily_reset_hour: 0,
        }
    }
}

impl EngineConfig {
    /// Load `.env` (if any) and read configuration from process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_path = lookup(ENV_DATABASE_PATH)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        let recent_window = parse_var(&lookup, ENV_RECENT_WINDOW)?.unwrap_or(defaults.recent_window);
        if recent_window == 0 {
            return Err(EngineError::InvalidInput(format!(
                "{ENV_RECENT_WINDOW} must be at least 1"
            )));
        }

        let daily_reset_hour =
            parse_var(&lookup, ENV_DAILY_RESET_HOUR)?.unwrap_or(defaults.daily_reset_hour);
        if daily_reset_hour > 23 {
            return Err(EngineError::InvalidInput(format!(
                "{ENV_DAILY_RESET_HOUR} must be between 0 and 23, got {daily_reset_hour}"
            )));
        }

        Ok(Self {
            database_path,
            recent_window,
            daily_reset_hour,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| EngineError::InvalidInput(format!("{name}={raw:?}: {e}"))),
        None => Ok(None),
    }
}

fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("practice-engine")
        .join("practice.db")
}
