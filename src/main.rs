//! huedial - Rotary-Knob Lighting Bridge Daemon
//!
//! Reads knob and scene-button presses from a kernel input device and drives
//! a Hue-style lighting bridge over its v1 or v2 HTTP API.

use anyhow::{Context, Result};
use clap::{Arg, Command};
use huedial::config::{
    parse_scenes, ApiGeneration, Config, DEFAULT_DEVICE_PATH, DEFAULT_TIMEOUT_SECS,
    DEFAULT_TOGGLE_CODE,
};
use huedial::Application;
use log::info;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // Parse command-line arguments; every flag falls back to its HUE_*
    // environment variable before the default applies.
    let matches = Command::new("huedial")
        .version(huedial::VERSION)
        .about("Drives a Hue lighting bridge from a rotary knob input device")
        .arg(
            Arg::new("host")
                .long("host")
                .env("HUE_BRIDGE_IP")
                .required(true)
                .help("Bridge host or IP address"),
        )
        .arg(
            Arg::new("username")
                .long("username")
                .env("HUE_USERNAME")
                .required(true)
                .help("v1 username / v2 application key"),
        )
        .arg(
            Arg::new("group")
                .long("group")
                .env("HUE_GROUP_ID")
                .required(true)
                .help("Target light group: integer id for v1, resource id for v2"),
        )
        .arg(
            Arg::new("api")
                .long("api")
                .env("HUE_API")
                .default_value("v2")
                .help("Bridge API generation to speak: v1 or v2"),
        )
        .arg(
            Arg::new("key-code")
                .long("key-code")
                .env("HUE_KEY_CODE")
                .help("Raw key code bound to toggle-power (default 187, KEY_F17)"),
        )
        .arg(
            Arg::new("device")
                .long("device")
                .env("HUE_DEVICE_PATH")
                .default_value(DEFAULT_DEVICE_PATH)
                .help("Path to the evdev input node"),
        )
        .arg(
            Arg::new("scenes")
                .long("scenes")
                .env("HUE_SCENE_IDS")
                .help("Comma-separated scene ids; empty disables scene features"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .env("HUE_TIMEOUT_SECS")
                .help("Per-request timeout against the bridge, in seconds"),
        )
        .get_matches();

    let toggle_code = match matches.get_one::<String>("key-code") {
        Some(raw) => raw
            .parse::<u16>()
            .with_context(|| format!("invalid key code '{raw}'"))?,
        None => DEFAULT_TOGGLE_CODE,
    };
    let timeout_secs = match matches.get_one::<String>("timeout") {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("invalid timeout '{raw}'"))?,
        None => DEFAULT_TIMEOUT_SECS,
    };

    let config = Config {
        host: matches.get_one::<String>("host").cloned().unwrap_or_default(),
        username: matches
            .get_one::<String>("username")
            .cloned()
            .unwrap_or_default(),
        group: matches
            .get_one::<String>("group")
            .cloned()
            .unwrap_or_default(),
        api: ApiGeneration::parse(
            matches
                .get_one::<String>("api")
                .map(String::as_str)
                .unwrap_or("v2"),
        )?,
        toggle_code,
        device_path: PathBuf::from(
            matches
                .get_one::<String>("device")
                .map(String::as_str)
                .unwrap_or(DEFAULT_DEVICE_PATH),
        ),
        scenes: parse_scenes(
            matches
                .get_one::<String>("scenes")
                .map(String::as_str)
                .unwrap_or(""),
        ),
        request_timeout: Duration::from_secs(timeout_secs),
    };

    let app = Application::new(&config)
        .await
        .context("failed to initialize")?;

    // The event loop runs in its own task; this one only waits for a
    // termination signal and flags the input thread to stop.
    let mut sigint = signal(SignalKind::interrupt()).context("install SIGINT handler")?;
    let mut sigterm = signal(SignalKind::terminate()).context("install SIGTERM handler")?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let event_loop = app.run(Arc::clone(&shutdown));
    tokio::pin!(event_loop);

    tokio::select! {
        _ = sigint.recv() => {}
        _ = sigterm.recv() => {}
        result = &mut event_loop => result.context("event loop failed")?,
    }

    shutdown.store(true, Ordering::SeqCst);
    info!("Shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_version_constant() {
        // Ensure version is accessible
        assert!(!huedial::VERSION.is_empty());
    }
}
