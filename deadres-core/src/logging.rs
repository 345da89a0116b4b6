//! Structured logging using **tracing**.
//!
//! The library only emits events; the binary decides how they are written.
//! Both subscribers write to stderr so stdout stays clean for the report.

/// Log output flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact human-readable lines
    #[default]
    Human,
    /// One JSON object per event, for log collectors
    Json,
}

/// Initializes the global tracing subscriber.
///
/// Call *once* at startup. Filtering follows `RUST_LOG`
/// (e.g. `RUST_LOG=deadres_core=debug`) and defaults to `warn`.
/// A second call is ignored.
pub fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Json => builder
            .json()
            .with_ansi(false)
            .with_level(true)
            .with_target(true)
            .with_current_span(true)
            .try_init(),
        LogFormat::Human => builder.compact().with_target(false).try_init(),
    };

    if let Err(e) = result {
        eprintln!("[WARN] logging already initialized: {}", e);
    }
}
