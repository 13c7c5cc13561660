//! Now-playing snapshot as JSON
//!
//! Asks the operating system what is playing right now and reduces the answer
//! to one of two fixed record shapes: a [`NowPlayingInfo`] with seven nullable
//! fields, or a [`NowPlayingError`] with `player: "none"` and a diagnostic.
//! [`query`] never fails and never panics past its own boundary, so callers
//! always get something they can print.
//!
//! The OS side sits behind [`provider::NowPlayingProvider`]; see
//! [`provider`] for the available backends.

use log::debug;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

pub mod config;
pub mod convert;
pub mod info_bag;
pub mod provider;
pub mod record;
pub mod util;

pub use config::Config;
pub use convert::ForeignValue;
pub use info_bag::{InfoBag, InfoKey};
pub use provider::{Backend, NowPlayingProvider, RawNowPlaying};
pub use record::{NowPlaying, NowPlayingError, NowPlayingInfo, NO_PLAYER};

use convert::{to_number, to_text};

/// Take one snapshot from `provider`.
///
/// Any provider error, and any panic inside the provider, becomes a
/// [`NowPlaying::Failed`] record. Field values the provider reports with an
/// unexpected type come out as `None`; they never fail the query.
pub fn query(provider: &dyn NowPlayingProvider) -> NowPlaying {
    debug!("Querying now playing via {}", provider.name());

    match panic::catch_unwind(AssertUnwindSafe(|| provider.query_now_playing())) {
        Ok(Ok(raw)) => NowPlaying::Playing(normalize(&raw)),
        Ok(Err(err)) => {
            let message = format!("{err:#}");
            debug!("{} failed: {message}", provider.name());
            NowPlaying::failure(message)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            debug!("{} panicked: {message}", provider.name());
            NowPlaying::failure(message)
        }
    }
}

/// Take one snapshot from the default provider for this platform.
pub fn query_system() -> NowPlaying {
    query(provider::system_provider().as_ref())
}

/// Extract and convert the seven output fields from a raw snapshot.
pub fn normalize(raw: &RawNowPlaying) -> NowPlayingInfo {
    let info = &raw.info;
    NowPlayingInfo {
        title: to_text("title", info.lookup(InfoKey::Title)),
        album: to_text("album", info.lookup(InfoKey::Album)),
        artist: to_text("artist", info.lookup(InfoKey::Artist)),
        duration: to_number("duration", info.lookup(InfoKey::Duration)),
        playback_status: to_number("playbackStatus", info.lookup(InfoKey::PlaybackRate)),
        elapsed: to_number("elapsed", info.lookup(InfoKey::ElapsedTime)),
        player: to_text("player", &raw.player),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned());

    match detail {
        Some(detail) => format!("provider panicked: {detail}"),
        None => "provider panicked".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};
    use serde_json::{json, Value};

    enum Fake {
        Snapshot(RawNowPlaying),
        Fails(&'static str),
        FailsWithContext(&'static str, &'static str),
        Panics,
    }

    impl NowPlayingProvider for Fake {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn query_now_playing(&self) -> Result<RawNowPlaying> {
            match self {
                Fake::Snapshot(raw) => Ok(raw.clone()),
                Fake::Fails(message) => anyhow::bail!("{message}"),
                Fake::FailsWithContext(outer, inner) => {
                    Err(anyhow::anyhow!("{inner}")).context(*outer)
                }
                Fake::Panics => panic!("framework went away"),
            }
        }
    }

    fn song_a() -> RawNowPlaying {
        RawNowPlaying {
            player: ForeignValue::from("com.apple.Music"),
            info: InfoBag::from_iter([
                (InfoKey::Title, ForeignValue::from("Song A")),
                (InfoKey::Artist, ForeignValue::from("Band B")),
                (InfoKey::PlaybackRate, ForeignValue::Number(1.0)),
                (InfoKey::ElapsedTime, ForeignValue::Number(12.5)),
                (InfoKey::Duration, ForeignValue::Number(200.0)),
            ]),
        }
    }

    fn json_of(record: &NowPlaying) -> Value {
        serde_json::from_str(&record.to_json()).unwrap()
    }

    #[test]
    fn test_song_a_example() {
        let record = query(&Fake::Snapshot(song_a()));
        assert!(record.is_playing());
        assert_eq!(
            json_of(&record),
            json!({
                "title": "Song A",
                "album": null,
                "artist": "Band B",
                "duration": 200,
                "playbackStatus": 1,
                "elapsed": 12.5,
                "player": "com.apple.Music"
            })
        );
    }

    #[test]
    fn test_no_now_playing_item_example() {
        let record = query(&Fake::Fails("no now playing item"));
        assert_eq!(
            json_of(&record),
            json!({ "player": "none", "error": "no now playing item" })
        );
    }

    #[test]
    fn test_no_active_player_is_failure_not_empty_success() {
        let record = query(&Fake::Fails("no active player"));
        assert!(!record.is_playing());
        assert_eq!(record.player(), Some(NO_PLAYER));
    }

    #[test]
    fn test_unreachable_provider_is_failure() {
        let record = query(&provider::unsupported::UnsupportedProvider::new());
        let value = json_of(&record);
        assert_eq!(value["player"], "none");
        assert!(!value["error"].as_str().unwrap().is_empty());
    }

    #[test]
    fn test_error_chain_is_rendered() {
        let record = query(&Fake::FailsWithContext(
            "playerctl query failed",
            "No players found",
        ));
        let NowPlaying::Failed(err) = record else {
            panic!("expected failure");
        };
        assert_eq!(err.message(), "playerctl query failed: No players found");
    }

    #[test]
    fn test_panicking_provider_is_failure() {
        let record = query(&Fake::Panics);
        let NowPlaying::Failed(err) = record else {
            panic!("expected failure");
        };
        assert_eq!(err.message(), "provider panicked: framework went away");
    }

    #[test]
    fn test_empty_bag_gives_all_null_fields_but_player() {
        let raw = RawNowPlaying {
            player: ForeignValue::from("com.spotify.client"),
            info: InfoBag::new(),
        };
        let info = normalize(&raw);
        assert_eq!(
            info,
            NowPlayingInfo {
                player: Some("com.spotify.client".to_string()),
                ..NowPlayingInfo::default()
            }
        );
    }

    #[test]
    fn test_malformed_values_drop_only_their_field() {
        let mut raw = song_a();
        raw.info
            .insert(InfoKey::Title, ForeignValue::Unsupported("NSData".to_string()));
        raw.info.insert(InfoKey::Duration, ForeignValue::from("200"));
        raw.info
            .insert(InfoKey::ElapsedTime, ForeignValue::Number(f64::NAN));

        let info = normalize(&raw);
        assert_eq!(info.title, None);
        assert_eq!(info.duration, None);
        assert_eq!(info.elapsed, None);
        assert_eq!(info.artist.as_deref(), Some("Band B"));
        assert_eq!(info.playback_status, Some(1.0));
        assert_eq!(info.player.as_deref(), Some("com.apple.Music"));
    }

    #[test]
    fn test_non_text_player_becomes_null() {
        let mut raw = song_a();
        raw.player = ForeignValue::Number(7.0);
        let record = query(&Fake::Snapshot(raw));
        assert!(record.is_playing());
        assert_eq!(json_of(&record)["player"], Value::Null);
    }

    #[test]
    fn test_playback_rate_is_kept_raw() {
        let mut raw = song_a();
        raw.info.insert(InfoKey::PlaybackRate, ForeignValue::Number(2.0));
        assert_eq!(normalize(&raw).playback_status, Some(2.0));
    }

    #[test]
    fn test_panic_message_without_text() {
        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(payload.as_ref()), "provider panicked");
    }
}
