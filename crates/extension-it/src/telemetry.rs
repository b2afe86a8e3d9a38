//! Log output for harness runs.

use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the stderr subscriber with an `info` default.
///
/// `RUST_LOG` takes precedence when set, e.g. `extension_it=debug` to see each
/// request the harness sends. Records emitted through the `log` macros are
/// routed into the same subscriber. Stdout is left to the suite report. Only
/// the first call in a process has any effect.
pub fn init() {
    init_with_default("info");
}

/// Like [`init`], with `default_directives` used when `RUST_LOG` is unset.
pub fn init_with_default(default_directives: &str) {
    let _ = LogTracer::init();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
