//! `lgremote`: touch-friendly terminal remote for LG WebOS televisions.
//!
//! Built on [ratatui](https://ratatui.rs). Buttons respond to taps, mouse
//! clicks, and keyboard shortcuts; each press runs one command through
//! `lgremote-core` against the device named by `--device`.
//!
//! Logs are written to a file (default `/tmp/lgremote.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod button;
mod component;
mod event;
mod layout;
mod pad;
mod theme;
mod tui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use lgremote_core::{LanWake, Remote, Settings, WebOsConnector};

use crate::app::App;

/// Terminal remote control for LG WebOS televisions.
#[derive(Parser, Debug)]
#[command(name = "lgremote", version, about)]
struct Cli {
    /// Settings file (defaults to ~/.lgtv.yaml)
    #[arg(short, long, env = "LGTV_CONFIG")]
    config: Option<PathBuf>,

    /// Device entry to control
    #[arg(short, long, default_value = "living_room", env = "LGTV_DEVICE")]
    device: String,

    /// Seconds to wait for the television on each request
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Log file path
    #[arg(long, default_value = "/tmp/lgremote.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing; stdout belongs to the terminal UI. Hold the guard
/// until exit so buffered lines are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "lgremote={level},lgremote_core={level},lgremote_api={level},lgremote_config={level}"
        ))
    });

    let dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("."));
    let file = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("lgremote.log"));

    let appender = tracing_appender::rolling::never(dir, file);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    // Settings problems end startup here, before the terminal is taken over.
    let path = cli.config.clone().unwrap_or_else(lgremote_config::default_path);
    let settings = Settings::load(&path)
        .wrap_err_with(|| format!("loading settings from {}", path.display()))?;
    settings.get(&cli.device).wrap_err_with(|| {
        let known: Vec<_> = settings.device_names().collect();
        format!("configured devices: {}", known.join(", "))
    })?;

    info!(device = %cli.device, path = %path.display(), "starting lgremote");

    let connector = WebOsConnector::new(Duration::from_secs(cli.timeout));
    let remote = Remote::new(settings, connector, LanWake);
    App::new(remote, cli.device).run().await
}
