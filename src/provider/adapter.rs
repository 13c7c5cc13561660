//! MediaRemote via the `mediaremote-rs` adapter.
//!
//! The crate works around the macOS 15.4+ entitlement check with a helper
//! process, and hands back an already-typed snapshot. Empty strings in that
//! snapshot stand for missing values.

use anyhow::Result;
use log::debug;

use super::{NowPlayingProvider, RawNowPlaying};
use crate::convert::ForeignValue;
use crate::info_bag::{InfoBag, InfoKey};

#[derive(Default)]
pub struct AdapterProvider;

impl AdapterProvider {
    pub fn new() -> Self {
        Self
    }
}

impl NowPlayingProvider for AdapterProvider {
    fn name(&self) -> &'static str {
        "adapter"
    }

    fn query_now_playing(&self) -> Result<RawNowPlaying> {
        let Some(info) = mediaremote_rs::get_now_playing() else {
            anyhow::bail!("no now playing item");
        };

        if info.bundle_identifier.is_empty() {
            anyhow::bail!("no active player");
        }

        debug!(
            "mediaremote-rs: {} playing={} rate={:?}",
            info.bundle_identifier, info.playing, info.playback_rate
        );

        let title = if info.title.is_empty() {
            ForeignValue::Null
        } else {
            ForeignValue::Text(info.title)
        };

        let bag = InfoBag::from_iter([
            (InfoKey::Title, title),
            (InfoKey::Album, ForeignValue::from(info.album)),
            (InfoKey::Artist, ForeignValue::from(info.artist)),
            (InfoKey::Duration, ForeignValue::from(info.duration)),
            (InfoKey::PlaybackRate, ForeignValue::from(info.playback_rate)),
            (InfoKey::ElapsedTime, ForeignValue::from(info.elapsed_time)),
        ]);

        Ok(RawNowPlaying {
            player: ForeignValue::Text(info.bundle_identifier),
            info: bag,
        })
    }
}
