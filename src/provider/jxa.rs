//! MediaRemote through JavaScript for Automation.
//!
//! Runs the `MRNowPlayingRequest` traversal inside `osascript`. Since macOS
//! 15.4, MediaRemote only answers Apple-signed processes, and `osascript` is
//! one, so this is the default macOS backend.

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::process::Command;
use std::time::Duration;

use super::{NowPlayingProvider, RawNowPlaying};
use crate::convert::ForeignValue;
use crate::info_bag::{InfoBag, InfoKey};
use crate::util;

const SCRIPT: &str = include_str!("now_playing.js");

/// What the script prints on success
#[derive(Debug, Deserialize)]
struct ScriptOutput {
    #[serde(default)]
    player: Value,
    #[serde(default)]
    info: HashMap<String, Value>,
}

pub struct JxaProvider {
    timeout: Duration,
}

impl JxaProvider {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for JxaProvider {
    fn default() -> Self {
        Self::new(util::DEFAULT_COMMAND_TIMEOUT)
    }
}

impl NowPlayingProvider for JxaProvider {
    fn name(&self) -> &'static str {
        "jxa"
    }

    fn query_now_playing(&self) -> Result<RawNowPlaying> {
        let mut cmd = Command::new("osascript");
        cmd.args(["-l", "JavaScript", "-e", SCRIPT])
            .args(InfoKey::ALL.map(InfoKey::media_remote_key));

        let output = util::run_command_with_timeout(&mut cmd, self.timeout)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("{}", clean_script_error(&stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("osascript returned {} bytes", stdout.len());
        parse_output(&stdout)
    }
}

/// Parse the script's JSON line into a raw snapshot.
pub fn parse_output(stdout: &str) -> Result<RawNowPlaying> {
    let output: ScriptOutput =
        serde_json::from_str(stdout.trim()).context("osascript printed unexpected output")?;

    let info: InfoBag = output
        .info
        .iter()
        .filter_map(|(key, value)| {
            InfoKey::from_media_remote_key(key).map(|key| (key, foreign_from_json(value)))
        })
        .collect();

    Ok(RawNowPlaying {
        player: foreign_from_json(&output.player),
        info,
    })
}

fn foreign_from_json(value: &Value) -> ForeignValue {
    match value {
        Value::Null => ForeignValue::Null,
        Value::String(text) => ForeignValue::Text(text.clone()),
        Value::Number(n) => n
            .as_f64()
            .map_or_else(|| ForeignValue::Unsupported("number".to_string()), ForeignValue::Number),
        Value::Bool(b) => ForeignValue::Bool(*b),
        Value::Object(map) => ForeignValue::Unsupported(
            map.get("unsupported")
                .and_then(Value::as_str)
                .unwrap_or("object")
                .to_string(),
        ),
        Value::Array(_) => ForeignValue::Unsupported("array".to_string()),
    }
}

/// Reduce osascript's error line to the thrown message.
///
/// `execution error: Error: no active player (-2700)` becomes
/// `no active player`.
fn clean_script_error(stderr: &str) -> String {
    let mut message = stderr.trim();
    if let Some(rest) = message.split_once("execution error: ").map(|(_, rest)| rest) {
        message = rest;
    }
    message = message.strip_prefix("Error: ").unwrap_or(message);
    if let Some((head, code)) = message.rsplit_once(" (") {
        if code.strip_suffix(')').is_some_and(|c| c.parse::<i64>().is_ok()) {
            message = head;
        }
    }

    if message.is_empty() {
        "osascript failed without a message".to_string()
    } else {
        message.to_string()
    }
}
