//! Shared helpers for the subprocess-backed providers and the probe binary.

use anyhow::{Context, Result};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

/// Default deadline for external commands (osascript, playerctl)
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Unicode-safe string truncation
// ---------------------------------------------------------------------------

/// Truncate a string to at most `max_chars` Unicode characters.
///
/// If truncated, appends "..." so the total character count is ≤ `max_chars`.
/// Never panics on multi-byte characters (unlike byte-index slicing).
pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

// ---------------------------------------------------------------------------
// Command execution with timeout
// ---------------------------------------------------------------------------

/// Run a command with a timeout. Kills the child if it exceeds the deadline.
///
/// Drains stdout/stderr in background threads to avoid pipe-buffer deadlocks
/// (a common issue when the child's output exceeds the OS pipe capacity).
pub fn run_command_with_timeout(cmd: &mut Command, timeout: Duration) -> Result<Output> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    let deadline = Instant::now()
        .checked_add(timeout)
        .with_context(|| format!("timeout {timeout:?} for {program} is too large"))?;

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to spawn {program}"))?;

    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();

    let stdout_thread = std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout_handle {
            std::io::Read::read_to_end(&mut out, &mut buf).ok();
        }
        buf
    });
    let stderr_thread = std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr_handle {
            std::io::Read::read_to_end(&mut err, &mut buf).ok();
        }
        buf
    });

    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None => {
                if Instant::now() >= deadline {
                    child.kill().ok();
                    child.wait().ok();
                    anyhow::bail!("{program} timed out after {timeout:?}");
                }
                std::thread::sleep(Duration::from_millis(20));
            }
        }
    };

    let stdout = stdout_thread.join().unwrap_or_default();
    let stderr = stderr_thread.join().unwrap_or_default();

    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

/// Run a command and return its stdout, turning a non-zero exit into an error
/// that carries the command's stderr.
pub fn run_checked(cmd: &mut Command, timeout: Duration) -> Result<String> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    let output = run_command_with_timeout(cmd, timeout)?;
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if !output.status.success() {
        if stderr.is_empty() {
            anyhow::bail!("{program} exited with {}", output.status);
        }
        anyhow::bail!("{stderr}");
    }

    if !stderr.is_empty() {
        log::warn!("{program} wrote to stderr: {stderr}");
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
