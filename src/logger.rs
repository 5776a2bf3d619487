// Observability sink handed in by the embedding application.
// Receives non-fatal problems; never influences control flow.

use std::fmt;

/// Notification sink for conditions worth telling the user about.
pub trait Logger: Send + Sync {
    fn error(&self, msg: &str);
    fn warning(&self, msg: &str);
}

/// Forwards notifications to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn error(&self, msg: &str) {
        tracing::error!("{}", msg);
    }

    fn warning(&self, msg: &str) {
        tracing::warn!("{}", msg);
    }
}

impl fmt::Debug for dyn Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Logger")
    }
}
