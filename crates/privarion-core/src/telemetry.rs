use tracing_subscriber::EnvFilter;

/// Installs a process-wide `tracing` subscriber: human-readable formatting
/// plus an `RUST_LOG`-driven filter, falling back to `info` when unset.
///
/// This is deliberately thin, with no file rotation, no platform event log
/// sinks, and no crash-reporter breadcrumbs. Those concerns are out of scope
/// for a privacy daemon whose own log output is itself sensitive surface
/// area; callers that need them compose their own `tracing_subscriber::Layer`s
/// instead of going through this helper.
///
/// Safe to call more than once; later calls are no-ops.
pub fn telemetry_init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
