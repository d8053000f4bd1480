//! Common infrastructure for the mock driver.
//!
//! - **errors**: error injection per operation
//! - **calls**: record of every driver invocation

pub mod calls;
pub mod errors;

pub use calls::CallLog;
pub use errors::{ErrorConfig, ErrorScenario, MOCK_COMMUNICATION_LOST, MOCK_INJECTED_FAILURE};
