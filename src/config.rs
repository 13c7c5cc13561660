//! Runtime settings read from the environment by the binaries.

use anyhow::{Context, Result};
use std::time::Duration;

use crate::provider::Backend;
use crate::util::DEFAULT_COMMAND_TIMEOUT;

pub const BACKEND_VAR: &str = "NOWPLAYING_BACKEND";
pub const TIMEOUT_VAR: &str = "NOWPLAYING_TIMEOUT_SECS";

/// Largest accepted subprocess deadline (one hour)
pub const MAX_TIMEOUT_SECS: u64 = 3600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend: Backend,

    /// Deadline for subprocess backends (osascript, playerctl)
    pub command_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default_for_platform(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get(BACKEND_VAR) {
            config.backend = value
                .parse()
                .with_context(|| format!("invalid {BACKEND_VAR}"))?;
        }

        if let Some(value) = get(TIMEOUT_VAR) {
            let secs: u64 = value
                .trim()
                .parse()
                .with_context(|| format!("invalid {TIMEOUT_VAR} '{value}'"))?;
            if secs == 0 {
                anyhow::bail!("invalid {TIMEOUT_VAR} '{value}': must be at least 1");
            }
            if secs > MAX_TIMEOUT_SECS {
                anyhow::bail!("invalid {TIMEOUT_VAR} '{value}': must be at most {MAX_TIMEOUT_SECS}");
            }
            config.command_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
