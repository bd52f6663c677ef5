use crate::error::IndexError;
use tracing::warn;

/// Receives failures from indexing and resolution.
///
/// Returns `true` when the error was handled. A declined error is returned to
/// the caller of the failing operation.
pub trait ErrorSink: Send + Sync {
    fn handle(&self, error: &IndexError) -> bool;
}

impl<F> ErrorSink for F
where
    F: Fn(&IndexError) -> bool + Send + Sync,
{
    fn handle(&self, error: &IndexError) -> bool {
        self(error)
    }
}

/// Logs and accepts every recoverable error.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAndContinue;

impl ErrorSink for LogAndContinue {
    fn handle(&self, error: &IndexError) -> bool {
        if !error.is_recoverable() {
            return false;
        }
        warn!("{}", error);
        true
    }
}
