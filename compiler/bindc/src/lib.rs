//! Binding-expression compiler driver.
//!
//! ```text
//! HostBuilder ──► HostModel (registry, natives, heap)
//!     │
//!     ▼
//! Session::compile / compile_document ──► CompiledExpr
//!     │
//!     ▼
//! HostModel::delegate ──► BindingDelegate (runtime)
//! ```

pub mod commands;
mod host;
mod options;
mod session;

use std::sync::Once;

pub use bind_compile::{BindingMode, BindingUnit, CompiledExpr, TargetSlot};
pub use bind_diagnostic::{Diagnostic, DiagnosticConfig, ErrorCode};
pub use bind_runtime::{BindingDelegate, ObservableRef, Value};
pub use host::{HostBuilder, HostModel};
pub use options::CompilerOptions;
pub use session::{BindingRequest, DocumentOutput, Session};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=bind_compile=debug`
/// or `RUST_LOG=bind_runtime=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
