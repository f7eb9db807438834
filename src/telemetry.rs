//! Log output for the `digitize` binary.
//!
//! Library code only emits `tracing` events (dropped import points, traces on
//! an incomplete calibration, saved files). Embedding applications install
//! their own subscriber; the binary calls [`init_default_tracing`] so those
//! events reach stderr while stdout carries command results.

/// Filter used when `RUST_LOG` is unset: warnings from dependencies, info
/// from this crate.
pub const DEFAULT_LOG_FILTER: &str = "warn,chart_digitizer=info";

/// Installs a compact stderr subscriber filtered by `RUST_LOG`, falling back
/// to [`DEFAULT_LOG_FILTER`]. Requires the `telemetry` feature.
///
/// Returns `false` when the feature is off or a global subscriber already
/// exists.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
