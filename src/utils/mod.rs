//! Utility modules

pub mod memory_storage;
pub mod validation;

pub use memory_storage::*;
pub use validation::*;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` fmt subscriber once per process.
///
/// `RUST_LOG` is honoured; `gst_core=info` is added on top of it.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = match "gst_core=info".parse() {
            Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
            Err(_) => EnvFilter::from_default_env(),
        };

        let _ = fmt().with_env_filter(filter).try_init();
    });
}
