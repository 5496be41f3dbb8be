//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - Message record fixtures
//! - A wiremock-backed store harness
//! - Tracing setup
//! - Custom assertion macros

pub mod assertions;
pub mod fixtures;
pub mod mock_server;

// Re-export commonly used utilities
pub use fixtures::*;
pub use mock_server::*;

use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test subscriber once per binary. Honours `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("courier=debug")),
            )
            .with_test_writer()
            .try_init();
    });
}
