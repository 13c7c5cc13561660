//! `nowplaying-json`: print the current now-playing snapshot as one JSON line.
//!
//! Stdout only ever carries the record. Logs go to stderr (`RUST_LOG`).

use log::{debug, error};
use nowplaying_json::{provider, query, Config, NowPlaying};
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let record = match Config::from_env() {
        Ok(config) => {
            debug!("Using backend {}", config.backend);
            let provider = provider::create(config.backend, &config);
            query(provider.as_ref())
        }
        Err(err) => NowPlaying::failure(format!("{err:#}")),
    };

    let mut stdout = std::io::stdout().lock();
    match writeln!(stdout, "{}", record.to_json()).and_then(|()| stdout.flush()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Failed to write result: {err}");
            ExitCode::FAILURE
        }
    }
}
