use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Installs a test subscriber once per process. `RUST_LOG` narrows the
/// output; without it everything down to `TRACE` is shown.
pub fn logging() {
    use std::sync::Once;

    static ONCE: Once = Once::new();

    ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Level::TRACE.as_str()));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
