//! Tracing subscriber setup.
//!
//! Logs go to stderr as JSON, filtered by `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Install the global JSON subscriber.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_repeatable() {
        init();
        assert!(!init());
    }
}
