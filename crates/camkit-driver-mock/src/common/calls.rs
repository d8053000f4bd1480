//! Record of driver invocations.

use std::sync::Arc;

use camkit_core::Operation;
use parking_lot::Mutex;

/// Shared, append-only log of the operations a mock driver ran.
///
/// Cloning shares the log, so a test can keep a handle while the driver's
/// operation table is owned by a session.
#[derive(Clone, Debug, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Operation>>>,
}

impl CallLog {
    /// Empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one invocation.
    pub fn record(&self, operation: Operation) {
        self.calls.lock().push(operation);
    }

    /// How many times `operation` ran.
    #[must_use]
    pub fn count(&self, operation: Operation) -> usize {
        self.calls.lock().iter().filter(|op| **op == operation).count()
    }

    /// Total number of driver invocations.
    #[must_use]
    pub fn total(&self) -> usize {
        self.calls.lock().len()
    }

    /// Every invocation, in order.
    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        self.calls.lock().clone()
    }

    /// Forget every recorded invocation.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_log() {
        let log = CallLog::new();
        let other = log.clone();
        other.record(Operation::Init);
        other.record(Operation::FileList);
        other.record(Operation::FileList);

        assert_eq!(log.total(), 3);
        assert_eq!(log.count(Operation::FileList), 2);
        assert_eq!(
            log.operations(),
            vec![Operation::Init, Operation::FileList, Operation::FileList]
        );

        log.clear();
        assert_eq!(other.total(), 0);
    }
}
