//! Diagnostics sink for unexpected HTTP statuses.
//!
//! Managers take a `SharedLogger` and default to `NullLogger`, so nothing is
//! written unless the caller opts in. `TracingLogger` forwards to `tracing`.

use std::sync::Arc;

/// Receives one call per unexpected status, naming the failing operation.
pub trait Logger: Send + Sync {
    fn unexpected_status(&self, operation: &str, status: u16, body: &str);
}

pub type SharedLogger = Arc<dyn Logger>;

/// Discards every entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn unexpected_status(&self, _operation: &str, _status: u16, _body: &str) {}
}

/// Emits an `error` level `tracing` event per entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn unexpected_status(&self, operation: &str, status: u16, body: &str) {
        tracing::error!(operation, code = status, message = body, "unexpected status code");
    }
}

pub(crate) fn null() -> SharedLogger {
    Arc::new(NullLogger)
}
