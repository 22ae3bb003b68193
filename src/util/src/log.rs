use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::EnvFilter;

/// Installs global stderr subscriber. Filter is taken from `RUST_LOG`,
/// `info` if unset. Calling this more than once is no-op.
pub fn setup() {
    static FLAG: AtomicBool = AtomicBool::new(false);
    if FLAG.swap(true, Ordering::SeqCst) {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let res = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
    if let Err(err) = res {
        eprintln!("failed to install logger: {}", err);
    }
}
