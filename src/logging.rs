//! Tracing subscriber setup for binaries and tests.
use std::sync::Once;

use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,dungeon=info,pixel_crawler=info";

/// Install a compact fmt subscriber. Idempotent: the first call wins, and an
/// already-installed global subscriber is left in place.
pub fn init_tracing(default_filter: &str) {
    let filter_str = default_filter.to_string();
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .compact();
        let _ = subscriber.try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_tracing(DEFAULT_FILTER);
        init_tracing("trace");
        tracing::info!("still alive");
    }
}
