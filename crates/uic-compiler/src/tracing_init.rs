//! Process-wide logging setup (§1.1).
//!
//! No metrics/OpenTelemetry exporter is wired in here; this only installs a
//! `tracing_subscriber::fmt` layer driven by `RUST_LOG`, the same env-filter
//! idiom the teacher's services use ahead of their OTLP layer.

use tracing_subscriber::EnvFilter;

/// Install a format subscriber as the global default, reading `RUST_LOG`
/// (defaulting to `info`) for per-target verbosity.
pub fn init_tracing() {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
