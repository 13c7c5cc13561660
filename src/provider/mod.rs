//! Now-playing providers
//!
//! A provider does the OS-specific part of a query: find the active player,
//! find the current item, and read the info keys. It returns raw values and
//! leaves conversion to [`crate::normalize`].
//!
//! Backends:
//! - `jxa` (macOS): MediaRemote via `osascript -l JavaScript`
//! - `framework` (macOS): MediaRemote in-process via `objc2`
//! - `adapter` (macOS): the `mediaremote-rs` adapter
//! - `playerctl` (Linux): MPRIS via `playerctl`
//! - `gsmtc` (Windows): the shell's media session manager
//! - `none`: always fails

pub mod gsmtc;
pub mod jxa;
pub mod playerctl;
pub mod unsupported;

#[cfg(target_os = "macos")]
pub mod adapter;
#[cfg(target_os = "macos")]
pub mod media_remote;

use anyhow::Result;
use std::fmt;
use std::str::FromStr;

use crate::config::Config;
use crate::convert::ForeignValue;
use crate::info_bag::InfoBag;

/// Unconverted result of walking the OS now-playing state.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNowPlaying {
    /// Bundle identifier of the active player, as the OS reported it
    pub player: ForeignValue,
    pub info: InfoBag,
}

/// Source of now-playing state.
pub trait NowPlayingProvider {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Resolve the active player and its current item.
    ///
    /// Fails when the OS source is unavailable, when no player is active, or
    /// when there is no current item. A key missing from the item is not a
    /// failure.
    fn query_now_playing(&self) -> Result<RawNowPlaying>;
}

/// Selectable provider implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Jxa,
    Framework,
    Adapter,
    Playerctl,
    Gsmtc,
    Unsupported,
}

impl Backend {
    pub const ALL: [Backend; 6] = [
        Backend::Jxa,
        Backend::Framework,
        Backend::Adapter,
        Backend::Playerctl,
        Backend::Gsmtc,
        Backend::Unsupported,
    ];

    pub fn default_for_platform() -> Self {
        if cfg!(target_os = "macos") {
            Backend::Jxa
        } else if cfg!(target_os = "linux") {
            Backend::Playerctl
        } else if cfg!(target_os = "windows") {
            Backend::Gsmtc
        } else {
            Backend::Unsupported
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Jxa => "jxa",
            Backend::Framework => "framework",
            Backend::Adapter => "adapter",
            Backend::Playerctl => "playerctl",
            Backend::Gsmtc => "gsmtc",
            Backend::Unsupported => "none",
        }
    }

    /// Whether this backend is compiled in and can work on this platform.
    pub fn is_available(self) -> bool {
        match self {
            Backend::Jxa | Backend::Framework | Backend::Adapter => cfg!(target_os = "macos"),
            Backend::Playerctl => cfg!(target_os = "linux"),
            Backend::Gsmtc => cfg!(target_os = "windows"),
            Backend::Unsupported => true,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Backend::ALL
            .into_iter()
            .find(|backend| backend.as_str() == wanted)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown backend '{s}' (expected one of: jxa, framework, adapter, playerctl, gsmtc, none)"
                )
            })
    }
}

/// Build the provider for `backend`.
///
/// A backend that cannot run on this platform yields an
/// [`unsupported::UnsupportedProvider`] naming it.
pub fn create(backend: Backend, config: &Config) -> Box<dyn NowPlayingProvider> {
    if !backend.is_available() {
        return Box::new(unsupported::UnsupportedProvider::for_backend(backend));
    }

    match backend {
        Backend::Jxa => Box::new(jxa::JxaProvider::new(config.command_timeout)),
        Backend::Playerctl => Box::new(playerctl::PlayerctlProvider::new(config.command_timeout)),
        #[cfg(target_os = "macos")]
        Backend::Framework => Box::new(media_remote::MediaRemoteProvider::new()),
        #[cfg(target_os = "macos")]
        Backend::Adapter => Box::new(adapter::AdapterProvider::new()),
        #[cfg(target_os = "windows")]
        Backend::Gsmtc => Box::new(gsmtc::GsmtcProvider::new()),
        _ => Box::new(unsupported::UnsupportedProvider::new()),
    }
}

/// Provider for this platform with default settings.
pub fn system_provider() -> Box<dyn NowPlayingProvider> {
    create(Backend::default_for_platform(), &Config::default())
}
