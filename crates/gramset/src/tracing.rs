//! Logging setup for binaries and tests embedding gramset.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing with gramset defaults.
///
/// Sets up tracing-subscriber with:
/// - Environment filter (RUST_LOG)
/// - Compact format suitable for terminal output
///
/// Returns `false` if a global subscriber was already installed.
pub fn init() -> bool {
    init_with_filter("info")
}

/// Initialize tracing with a custom default filter, e.g. `"gramset_core=debug"`.
pub fn init_with_filter(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        init_with_filter("gramset_core=trace");
        assert!(!init());

        let mut set = gramset_core::FuzzySet::new();
        set.add("logged");
        assert!(set.best_match("logged", 1.0).is_some());
    }
}
