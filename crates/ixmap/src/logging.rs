//! Log subscriber construction.
//!
//! The library only emits `tracing` events. Whoever drives a run builds a
//! subscriber here and decides where it goes: the binary installs one
//! globally on stderr, tests scope one to a capture buffer with
//! `tracing::subscriber::with_default`.

use std::io::IsTerminal;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Timestamp layout for every log line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Filter from `RUST_LOG` if set, otherwise `level` (e.g. `info`, `debug`).
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Build a human-readable, timestamped subscriber writing to `writer`.
pub fn subscriber<W>(
    filter: EnvFilter,
    writer: W,
    ansi: bool,
) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer)
        .finish()
}

/// Install a stderr subscriber as the process-wide default.
pub fn init(level: &str) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let ansi = std::io::stderr().is_terminal();
    tracing::subscriber::set_global_default(subscriber(env_filter(level), std::io::stderr, ansi))
}
