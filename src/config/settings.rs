// wpsync/src/config/settings.rs
use std::env;
use std::path::PathBuf;

use crate::errors::{AppError, Result};

pub const CONFIG_DIR_VAR: &str = "WPSYNC_CONFIG_DIR";
pub const MAX_ATTEMPTS_VAR: &str = "WPSYNC_MAX_ATTEMPTS";
const DEFAULT_CONFIG_DIR_NAME: &str = ".wpsync";

/// How many full manual-entry rounds may be declined before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    Unbounded,
    Limited(u32),
}

impl RetryPolicy {
    /// Whether round number `attempt` (1-based) may start.
    pub fn allows(&self, attempt: u32) -> bool {
        match self {
            RetryPolicy::Unbounded => true,
            RetryPolicy::Limited(max) => attempt <= *max,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub config_root: PathBuf,
    pub retry_policy: RetryPolicy,
}

impl Settings {
    /// Reads settings from the process environment, after an optional `.env` file.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(dirs::home_dir(), |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(home: Option<PathBuf>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_root = match lookup(CONFIG_DIR_VAR).filter(|s| !s.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => home.ok_or(AppError::NoHomeDir)?.join(DEFAULT_CONFIG_DIR_NAME),
        };

        let retry_policy = match lookup(MAX_ATTEMPTS_VAR).filter(|s| !s.trim().is_empty()) {
            None => RetryPolicy::Unbounded,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => RetryPolicy::Limited(n),
                _ => {
                    return Err(AppError::Settings(format!(
                        "{} must be a positive integer, got '{}'",
                        MAX_ATTEMPTS_VAR, raw
                    )));
                }
            },
        };

        Ok(Settings {
            config_root,
            retry_policy,
        })
    }
}
