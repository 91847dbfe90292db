//! Log file setup.
//!
//! The terminal is in raw mode while the demo runs, so logs only go to a daily rolling file:
//! `<logs_dir>/mdedit.log`. `RUST_LOG` overrides the default `debug` filter.

use std::path::Path;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init(logs_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(logs_dir)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let file_appender = tracing_appender::rolling::daily(logs_dir, "mdedit.log");

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_filter(filter);

    tracing_subscriber::registry().with(file_layer).try_init()?;
    Ok(())
}
