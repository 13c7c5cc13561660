//! Windows media sessions through GSMTC.
//!
//! `GlobalSystemMediaTransportControlsSessionManager` exposes the session the
//! shell considers current, together with its media properties, timeline and
//! playback info. WinRT reports times as `TimeSpan` ticks (100 ns) and a
//! status enum instead of a rate; both are mapped onto the MediaRemote
//! conventions here, the same way the playerctl backend maps MPRIS.

use crate::convert::ForeignValue;

const TICKS_PER_SECOND: f64 = 10_000_000.0;

/// `TimeSpan` ticks to seconds.
#[allow(clippy::cast_precision_loss)]
pub fn ticks_to_seconds(ticks: i64) -> f64 {
    ticks as f64 / TICKS_PER_SECOND
}

/// Track length from the timeline end. Sessions without a timeline report 0.
pub fn duration_value(end_ticks: i64) -> ForeignValue {
    if end_ticks <= 0 {
        ForeignValue::Null
    } else {
        ForeignValue::Number(ticks_to_seconds(end_ticks))
    }
}

/// Session status name onto a playback rate, as playerctl statuses are mapped.
pub fn playback_rate(status: &str) -> ForeignValue {
    match status {
        "Playing" => ForeignValue::Number(1.0),
        "Paused" | "Stopped" => ForeignValue::Number(0.0),
        other => ForeignValue::Unsupported(format!("status {other}")),
    }
}

/// Some apps only fill the album artist.
pub fn artist_or_album_artist(artist: String, album_artist: String) -> String {
    if artist.is_empty() {
        album_artist
    } else {
        artist
    }
}

/// GSMTC leaves unset fields as empty strings.
pub fn text(value: String) -> ForeignValue {
    if value.is_empty() {
        ForeignValue::Null
    } else {
        ForeignValue::Text(value)
    }
}

#[cfg(target_os = "windows")]
pub use session::GsmtcProvider;

#[cfg(target_os = "windows")]
mod session {
    use anyhow::{Context, Result};
    use log::debug;
    use windows::Media::Control::{
        GlobalSystemMediaTransportControlsSessionManager as SessionManager,
        GlobalSystemMediaTransportControlsSessionPlaybackStatus as PlaybackStatus,
    };

    use super::{artist_or_album_artist, duration_value, playback_rate, text, ticks_to_seconds};
    use crate::convert::ForeignValue;
    use crate::info_bag::{InfoBag, InfoKey};
    use crate::provider::{NowPlayingProvider, RawNowPlaying};

    #[derive(Default)]
    pub struct GsmtcProvider;

    impl GsmtcProvider {
        pub fn new() -> Self {
            Self
        }
    }

    impl NowPlayingProvider for GsmtcProvider {
        fn name(&self) -> &'static str {
            "gsmtc"
        }

        fn query_now_playing(&self) -> Result<RawNowPlaying> {
            let manager = SessionManager::RequestAsync()
                .and_then(|operation| operation.get())
                .context("media session manager is not available")?;

            let session = manager.GetCurrentSession().context("no active player")?;

            let player = session.SourceAppUserModelId()?.to_string();
            if player.is_empty() {
                anyhow::bail!("no active player");
            }
            debug!("GSMTC player: {player}");

            let properties = session
                .TryGetMediaPropertiesAsync()
                .and_then(|operation| operation.get())
                .context("no now playing item")?;

            let artist = artist_or_album_artist(
                properties.Artist()?.to_string(),
                properties.AlbumArtist()?.to_string(),
            );

            let mut info = InfoBag::from_iter([
                (InfoKey::Title, text(properties.Title()?.to_string())),
                (InfoKey::Album, text(properties.AlbumTitle()?.to_string())),
                (InfoKey::Artist, text(artist)),
            ]);

            // Timeline and status are optional per session; leave the keys out
            // when the app does not publish them.
            match session.GetTimelineProperties() {
                Ok(timeline) => {
                    if let Ok(end) = timeline.EndTime() {
                        info.insert(InfoKey::Duration, duration_value(end.Duration));
                    }
                    if let Ok(position) = timeline.Position() {
                        info.insert(
                            InfoKey::ElapsedTime,
                            ForeignValue::Number(ticks_to_seconds(position.Duration)),
                        );
                    }
                }
                Err(err) => debug!("GSMTC timeline unavailable: {err}"),
            }

            match session.GetPlaybackInfo().and_then(|playback| playback.PlaybackStatus()) {
                Ok(status) => {
                    info.insert(InfoKey::PlaybackRate, playback_rate(status_name(status)));
                }
                Err(err) => debug!("GSMTC playback info unavailable: {err}"),
            }

            Ok(RawNowPlaying {
                player: ForeignValue::Text(player),
                info,
            })
        }
    }

    fn status_name(status: PlaybackStatus) -> &'static str {
        if status == PlaybackStatus::Playing {
            "Playing"
        } else if status == PlaybackStatus::Paused {
            "Paused"
        } else if status == PlaybackStatus::Stopped {
            "Stopped"
        } else if status == PlaybackStatus::Changing {
            "Changing"
        } else if status == PlaybackStatus::Opened {
            "Opened"
        } else {
            "Closed"
        }
    }
}
