//! Result records and their JSON shape.
//!
//! Both variants serialize as a flat JSON object. Absent values are written as
//! `null`, never skipped, so consumers always see the same keys.

use serde::{Deserialize, Serialize, Serializer};

/// Value of `player` in a failure record.
pub const NO_PLAYER: &str = "none";

/// Largest magnitude below which a whole `f64` is written as a JSON integer.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Snapshot of the current now-playing item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlayingInfo {
    pub title: Option<String>,
    pub album: Option<String>,
    pub artist: Option<String>,

    /// Track length in seconds
    #[serde(serialize_with = "serialize_number")]
    pub duration: Option<f64>,

    /// Raw playback rate: 0 paused, 1 playing, other values as reported
    #[serde(serialize_with = "serialize_number")]
    pub playback_status: Option<f64>,

    /// Play position in seconds
    #[serde(serialize_with = "serialize_number")]
    pub elapsed: Option<f64>,

    /// Bundle identifier of the owning application
    pub player: Option<String>,
}

/// Why no snapshot could be taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ErrorFields")]
pub struct NowPlayingError {
    player: String,
    error: String,
}

#[derive(Deserialize)]
struct ErrorFields {
    player: String,
    error: String,
}

impl TryFrom<ErrorFields> for NowPlayingError {
    type Error = String;

    fn try_from(fields: ErrorFields) -> Result<Self, Self::Error> {
        if fields.player != NO_PLAYER {
            return Err(format!(
                "failure record must have player \"{NO_PLAYER}\", got \"{}\"",
                fields.player
            ));
        }
        Ok(Self::new(fields.error))
    }
}

impl NowPlayingError {
    pub fn new(message: impl Into<String>) -> Self {
        let mut error = message.into();
        if error.trim().is_empty() {
            error = "unknown error".to_string();
        }
        Self {
            player: NO_PLAYER.to_string(),
            error,
        }
    }

    pub fn message(&self) -> &str {
        &self.error
    }
}

/// Outcome of one query: exactly one of the two record shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NowPlaying {
    // Tried first when deserializing: only this shape has `error`.
    Failed(NowPlayingError),
    Playing(NowPlayingInfo),
}

impl NowPlaying {
    pub fn failure(message: impl Into<String>) -> Self {
        NowPlaying::Failed(NowPlayingError::new(message))
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, NowPlaying::Playing(_))
    }

    /// Player identifier, or the failure sentinel.
    pub fn player(&self) -> Option<&str> {
        match self {
            NowPlaying::Playing(info) => info.player.as_deref(),
            NowPlaying::Failed(err) => Some(&err.player),
        }
    }

    /// Compact single-line JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| fallback_json(&err.to_string()))
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|err| fallback_json(&err.to_string()))
    }
}

impl From<NowPlayingInfo> for NowPlaying {
    fn from(info: NowPlayingInfo) -> Self {
        NowPlaying::Playing(info)
    }
}

impl From<NowPlayingError> for NowPlaying {
    fn from(err: NowPlayingError) -> Self {
        NowPlaying::Failed(err)
    }
}

// serde_json only fails here on non-string map keys or a failing custom
// serializer, neither of which these types have. Still emit a valid record.
fn fallback_json(message: &str) -> String {
    let error = serde_json::Value::String(message.to_string());
    format!(r#"{{"player":"{NO_PLAYER}","error":{error}}}"#)
}

/// Write whole numbers as JSON integers (`200`, not `200.0`), like
/// JavaScript's `JSON.stringify`.
#[allow(clippy::trivially_copy_pass_by_ref, clippy::cast_possible_truncation)]
fn serialize_number<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER => {
            serializer.serialize_some(&(*n as i64))
        }
        Some(n) if n.is_finite() => serializer.serialize_some(n),
        _ => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn song_a() -> NowPlayingInfo {
        NowPlayingInfo {
            title: Some("Song A".to_string()),
            album: None,
            artist: Some("Band B".to_string()),
            duration: Some(200.0),
            playback_status: Some(1.0),
            elapsed: Some(12.5),
            player: Some("com.apple.Music".to_string()),
        }
    }

    #[test]
    fn test_success_record_json() {
        let value: Value = serde_json::from_str(&NowPlaying::from(song_a()).to_json()).unwrap();
        assert_eq!(
            value,
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
    fn test_whole_numbers_written_as_integers() {
        let json = NowPlaying::from(song_a()).to_json();
        assert!(json.contains(r#""duration":200,"#));
        assert!(json.contains(r#""playbackStatus":1,"#));
        assert!(json.contains(r#""elapsed":12.5,"#));
    }

    #[test]
    fn test_absent_fields_are_null_not_omitted() {
        let value: Value =
            serde_json::from_str(&NowPlaying::from(NowPlayingInfo::default()).to_json()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 7);
        assert!(object.values().all(Value::is_null));
    }

    #[test]
    fn test_failure_record_json() {
        let value: Value =
            serde_json::from_str(&NowPlaying::failure("no now playing item").to_json()).unwrap();
        assert_eq!(value, json!({ "player": "none", "error": "no now playing item" }));
    }

    #[test]
    fn test_empty_diagnostic_is_replaced() {
        let err = NowPlayingError::new("  ");
        assert_eq!(err.message(), "unknown error");
    }

    #[test]
    fn test_player_accessor() {
        assert_eq!(NowPlaying::from(song_a()).player(), Some("com.apple.Music"));
        assert_eq!(NowPlaying::failure("x").player(), Some(NO_PLAYER));
        assert_eq!(NowPlaying::from(NowPlayingInfo::default()).player(), None);
    }

    #[test]
    fn test_parse_back_both_variants() {
        let playing = NowPlaying::from(song_a());
        let failed = NowPlaying::failure("MediaRemote not found");
        assert_eq!(serde_json::from_str::<NowPlaying>(&playing.to_json()).unwrap(), playing);
        assert_eq!(serde_json::from_str::<NowPlaying>(&failed.to_json()).unwrap(), failed);
    }

    #[test]
    fn test_failure_needs_sentinel_player() {
        let json = r#"{"player":"com.apple.Music","error":"y"}"#;
        let err = serde_json::from_str::<NowPlayingError>(json).unwrap_err();
        assert!(err.to_string().contains("must have player"));

        let parsed = serde_json::from_str::<NowPlaying>(json).unwrap();
        assert!(!matches!(parsed, NowPlaying::Failed(_)));
        assert_eq!(parsed.player(), Some("com.apple.Music"));
    }

    #[test]
    fn test_parsed_failure_keeps_message_rule() {
        let parsed: NowPlayingError =
            serde_json::from_str(r#"{"player":"none","error":""}"#).unwrap();
        assert_eq!(parsed, NowPlayingError::new("unknown error"));
    }

    #[test]
    fn test_negative_zero_and_large_values() {
        let info = NowPlayingInfo {
            elapsed: Some(-0.0),
            duration: Some(1.0e20),
            ..NowPlayingInfo::default()
        };
        let value: Value = serde_json::from_str(&NowPlaying::from(info).to_json()).unwrap();
        assert_eq!(value["elapsed"], json!(0));
        assert_eq!(value["duration"].as_f64(), Some(1.0e20));
    }

    #[test]
    fn test_fallback_json_is_valid() {
        let value: Value = serde_json::from_str(&fallback_json("bad \"quote\"")).unwrap();
        assert_eq!(value, json!({ "player": "none", "error": "bad \"quote\"" }));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::option;
    use proptest::prelude::*;
    use serde_json::Value;

    const SUCCESS_KEYS: [&str; 7] = [
        "title",
        "album",
        "artist",
        "duration",
        "playbackStatus",
        "elapsed",
        "player",
    ];

    // Multiples of 0.25 survive a JSON round trip exactly.
    #[allow(clippy::cast_precision_loss)]
    fn quarters(range: std::ops::Range<i64>) -> impl Strategy<Value = f64> {
        range.prop_map(|n| n as f64 / 4.0)
    }

    fn any_info() -> impl Strategy<Value = NowPlayingInfo> {
        (
            option::of(".{0,20}"),
            option::of(".{0,20}"),
            option::of(".{0,20}"),
            option::of(quarters(-4_000_000..4_000_000)),
            option::of(quarters(-16..16)),
            option::of(quarters(0..4_000_000)),
            option::of("[a-z]{1,8}(\\.[a-z]{1,8}){1,3}"),
        )
            .prop_map(|(title, album, artist, duration, playback_status, elapsed, player)| {
                NowPlayingInfo {
                    title,
                    album,
                    artist,
                    duration,
                    playback_status,
                    elapsed,
                    player,
                }
            })
    }

    fn any_record() -> impl Strategy<Value = NowPlaying> {
        prop_oneof![
            any_info().prop_map(NowPlaying::Playing),
            ".*".prop_map(|message: String| NowPlaying::failure(message)),
        ]
    }

    proptest! {
        #[test]
        fn prop_exactly_one_shape(record in any_record()) {
            let value: Value = serde_json::from_str(&record.to_json()).unwrap();
            let object = value.as_object().unwrap();
            if object.contains_key("error") {
                prop_assert_eq!(object.len(), 2);
                prop_assert_eq!(&object["player"], "none");
                prop_assert!(!object["error"].as_str().unwrap().trim().is_empty());
            } else {
                prop_assert_eq!(object.len(), SUCCESS_KEYS.len());
                for key in SUCCESS_KEYS {
                    prop_assert!(object.contains_key(key));
                }
            }
        }

        #[test]
        fn prop_numbers_survive_serialization(info in any_info()) {
            let json = NowPlaying::from(info.clone()).to_json();
            let value: Value = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(value["duration"].as_f64(), info.duration);
            prop_assert_eq!(value["playbackStatus"].as_f64(), info.playback_status);
            prop_assert_eq!(value["elapsed"].as_f64(), info.elapsed);
        }
    }
}
