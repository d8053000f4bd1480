//! Error injection framework for the mock driver.
//!
//! Failures are reported as [`DriverError`]s in the driver-specific code
//! range so tests can exercise both pass-through and the session's
//! driver-error translation.

use std::collections::HashMap;
use std::sync::Arc;

use camkit_core::{DriverError, Operation};
use parking_lot::Mutex;

/// Code used for injected failures.
pub const MOCK_INJECTED_FAILURE: i32 = -1001;
/// Code used once communication has been lost.
pub const MOCK_COMMUNICATION_LOST: i32 = -1002;

/// One way for the mock driver to fail.
#[derive(Debug, Clone)]
pub enum ErrorScenario {
    /// Every call of `operation` fails with `code`.
    Fail {
        /// Operation that fails.
        operation: Operation,
        /// Driver code reported.
        code: i32,
    },
    /// Fail after N successful calls of `operation`.
    FailAfterN {
        /// Operation that fails.
        operation: Operation,
        /// Successful calls before the first failure.
        count: u32,
    },
    /// The first call of any operation loses communication; every later call fails too.
    CommunicationLoss,
}

#[derive(Default, Debug)]
struct ErrorState {
    operation_counts: HashMap<Operation, u32>,
    communication_lost: bool,
}

/// Error injection configuration.
#[derive(Clone, Debug, Default)]
pub struct ErrorConfig {
    scenarios: Arc<Vec<ErrorScenario>>,
    state: Arc<Mutex<ErrorState>>,
}

impl ErrorConfig {
    /// No injected errors.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A single scenario.
    #[must_use]
    pub fn scenario(scenario: ErrorScenario) -> Self {
        Self::scenarios(vec![scenario])
    }

    /// Several scenarios, checked in order.
    #[must_use]
    pub fn scenarios(scenarios: Vec<ErrorScenario>) -> Self {
        Self {
            scenarios: Arc::new(scenarios),
            state: Arc::new(Mutex::new(ErrorState::default())),
        }
    }

    /// Shorthand for a single [`ErrorScenario::Fail`].
    #[must_use]
    pub fn failing(operation: Operation, code: i32) -> Self {
        Self::scenario(ErrorScenario::Fail { operation, code })
    }

    /// Check whether `operation` should fail now.
    pub fn check_operation(&self, library: &str, operation: Operation) -> Result<(), DriverError> {
        let mut state = self.state.lock();

        if state.communication_lost {
            return Err(DriverError::new(
                library,
                MOCK_COMMUNICATION_LOST,
                "Communication lost",
            ));
        }

        for scenario in self.scenarios.iter() {
            match scenario {
                ErrorScenario::Fail { operation: op, code } if *op == operation => {
                    return Err(DriverError::new(
                        library,
                        *code,
                        format!("Injected failure in {operation}"),
                    ));
                }
                ErrorScenario::FailAfterN {
                    operation: op,
                    count,
                } if *op == operation => {
                    let current = state.operation_counts.entry(operation).or_insert(0);
                    *current += 1;
                    if *current > *count {
                        return Err(DriverError::new(
                            library,
                            MOCK_INJECTED_FAILURE,
                            format!("Injected failure after {count} calls of {operation}"),
                        ));
                    }
                }
                ErrorScenario::CommunicationLoss => {
                    state.communication_lost = true;
                    return Err(DriverError::new(
                        library,
                        MOCK_COMMUNICATION_LOST,
                        "Communication lost",
                    ));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Clear counters and restore communication.
    pub fn reset(&self) {
        *self.state.lock() = ErrorState::default();
    }
}
