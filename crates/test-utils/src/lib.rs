//! # Mock Providers

pub mod verifier;
pub mod wallet;

mod identity;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

pub use verifier::Verifier;
pub use wallet::{UnavailableStore, Wallet};

static INIT: Once = Once::new();

/// Install a `tracing` subscriber for test output, configured using
/// `RUST_LOG`.
pub fn init_tracer() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
