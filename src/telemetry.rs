//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "voltpath=info,tower_http=info";

/// Installs the global `fmt` subscriber writing to stderr.
///
/// `RUST_LOG` overrides [`DEFAULT_FILTER`]. Calling this twice is harmless;
/// the second call leaves the first subscriber in place.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_ok() {
        tracing::debug!("tracing initialised");
    }
}
