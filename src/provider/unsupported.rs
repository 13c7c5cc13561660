//! Provider for platforms without a now-playing source.

use super::{Backend, NowPlayingProvider, RawNowPlaying};
use anyhow::Result;

pub struct UnsupportedProvider {
    reason: String,
}

impl UnsupportedProvider {
    pub fn new() -> Self {
        Self {
            reason: format!(
                "no now-playing source is available on {}",
                std::env::consts::OS
            ),
        }
    }

    pub fn for_backend(backend: Backend) -> Self {
        Self {
            reason: format!(
                "backend '{backend}' is not available on {}",
                std::env::consts::OS
            ),
        }
    }
}

impl Default for UnsupportedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl NowPlayingProvider for UnsupportedProvider {
    fn name(&self) -> &'static str {
        "none"
    }

    fn query_now_playing(&self) -> Result<RawNowPlaying> {
        anyhow::bail!("{}", self.reason)
    }
}
