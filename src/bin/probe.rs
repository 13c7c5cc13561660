//! Now-playing probe
//!
//! Runs every backend available on this platform and shows what each one
//! reports. Useful when the main binary returns `"player": "none"` and it is
//! not obvious which layer is refusing.
//! Run with: cargo run --bin nowplaying-probe
//!
//! Make sure something is playing before running this.

use nowplaying_json::util::truncate;
use nowplaying_json::{provider, query, Backend, Config, NowPlaying};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .format_timestamp(None)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("❌ {err:#}");
            Config::default()
        }
    };

    println!("🔬 Now Playing probe ({})", std::env::consts::OS);
    println!("==============================\n");

    for backend in Backend::ALL {
        if backend == Backend::Unsupported || !backend.is_available() {
            continue;
        }

        let marker = if backend == config.backend { " (selected)" } else { "" };
        println!("▶️  {backend}{marker}");

        let record = query(provider::create(backend, &config).as_ref());
        print_summary(&record);
        println!("{}\n", record.to_json_pretty());
    }

    if !Backend::ALL
        .iter()
        .any(|backend| *backend != Backend::Unsupported && backend.is_available())
    {
        println!("⚠️  No now-playing backend is available on this platform.");
    }
}

fn print_summary(record: &NowPlaying) {
    match record {
        NowPlaying::Playing(info) => {
            let status = match info.playback_status {
                Some(rate) if rate > 0.0 => "▶️ ",
                Some(_) => "⏸️ ",
                None => "❔",
            };
            println!(
                "   ✅ {} {} — {} ({})",
                status,
                truncate(info.title.as_deref().unwrap_or("(no title)"), 30),
                truncate(info.artist.as_deref().unwrap_or("?"), 20),
                info.player.as_deref().unwrap_or("?")
            );
            if let (Some(elapsed), Some(duration)) = (info.elapsed, info.duration) {
                println!("   ⏱️  {elapsed:.1}s / {duration:.1}s");
            }
        }
        NowPlaying::Failed(err) => {
            println!("   ❌ {}", truncate(err.message(), 70));
        }
    }
}
