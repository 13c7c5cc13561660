//! MPRIS through `playerctl`.
//!
//! One `playerctl metadata` call with a custom format returns the player
//! instance and every field we need on a single line. MPRIS reports times in
//! microseconds and a status string instead of a rate, so both are mapped onto
//! the MediaRemote conventions here.

use anyhow::{Context, Result};
use log::debug;
use std::process::Command;
use std::time::Duration;

use super::{NowPlayingProvider, RawNowPlaying};
use crate::convert::ForeignValue;
use crate::info_bag::{InfoBag, InfoKey};
use crate::util;

const SEPARATOR: char = '\u{1f}';

/// `playerctl` template; field order matches [`parse_line`]
const FORMAT: &str = "{{playerInstance}}\u{1f}{{xesam:title}}\u{1f}{{xesam:album}}\u{1f}\
                      {{xesam:artist}}\u{1f}{{mpris:length}}\u{1f}{{status}}\u{1f}{{position}}";

const FIELD_COUNT: usize = 7;

const MPRIS_BUS_PREFIX: &str = "org.mpris.MediaPlayer2.";

pub struct PlayerctlProvider {
    timeout: Duration,
}

impl PlayerctlProvider {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for PlayerctlProvider {
    fn default() -> Self {
        Self::new(util::DEFAULT_COMMAND_TIMEOUT)
    }
}

impl NowPlayingProvider for PlayerctlProvider {
    fn name(&self) -> &'static str {
        "playerctl"
    }

    fn query_now_playing(&self) -> Result<RawNowPlaying> {
        let stdout = util::run_checked(
            Command::new("playerctl").args(["metadata", "--format", FORMAT]),
            self.timeout,
        )
        .context("playerctl query failed")?;

        let line = stdout.strip_suffix('\n').unwrap_or(&stdout);
        debug!("playerctl: {}", line.replace(SEPARATOR, " | "));
        parse_line(line)
    }
}

/// Parse one formatted `playerctl metadata` line.
pub fn parse_line(line: &str) -> Result<RawNowPlaying> {
    let fields: Vec<&str> = line.split(SEPARATOR).collect();
    let [instance, title, album, artist, length, status, position] = fields[..] else {
        anyhow::bail!(
            "unexpected playerctl output: expected {FIELD_COUNT} fields, got {}",
            fields.len()
        );
    };

    if instance.is_empty() {
        anyhow::bail!("no active player");
    }

    let info = InfoBag::from_iter([
        (InfoKey::Title, text(title)),
        (InfoKey::Album, text(album)),
        (InfoKey::Artist, text(artist)),
        (InfoKey::Duration, microseconds(length)),
        (InfoKey::PlaybackRate, playback_rate(status)),
        (InfoKey::ElapsedTime, microseconds(position)),
    ]);

    Ok(RawNowPlaying {
        player: ForeignValue::Text(format!("{MPRIS_BUS_PREFIX}{instance}")),
        info,
    })
}

fn text(field: &str) -> ForeignValue {
    if field.is_empty() {
        ForeignValue::Null
    } else {
        ForeignValue::from(field)
    }
}

// Unparsable values stay text so conversion drops them like any other
// mistyped field.
fn microseconds(field: &str) -> ForeignValue {
    if field.is_empty() {
        return ForeignValue::Null;
    }
    match field.trim().parse::<f64>() {
        Ok(micros) => ForeignValue::Number(micros / 1_000_000.0),
        Err(_) => ForeignValue::from(field),
    }
}

fn playback_rate(status: &str) -> ForeignValue {
    match status {
        "" => ForeignValue::Null,
        "Playing" => ForeignValue::Number(1.0),
        "Paused" | "Stopped" => ForeignValue::Number(0.0),
        other => ForeignValue::Unsupported(format!("status {other}")),
    }
}
