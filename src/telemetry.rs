//! Console logging setup.
//!
//! The library itself only emits `tracing` events. Binaries that want them printed call
//! [`init_tracing`] once at startup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_FILTER: &str = "info";

/// Install a global subscriber writing timestamped, level-tagged lines to stderr.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`. Returns `false` if a global
/// subscriber was already installed, in which case nothing changes.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter)
}

/// Same as [`init_tracing`] with an explicit filter directive such as
/// `"chat_completion=debug"`.
pub fn init_tracing_with_filter(directive: &str) -> bool {
    install(EnvFilter::new(directive))
}

fn install(filter: EnvFilter) -> bool {
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .is_ok()
}
