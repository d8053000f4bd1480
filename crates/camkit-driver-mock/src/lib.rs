//! Mock camera driver for camkit
//!
//! This crate provides a simulated camera for exercising sessions without
//! hardware. The mock keeps its storage in memory, records every driver
//! invocation, and can fail on demand.
//!
//! # Driver Factory Pattern
//!
//! [`MockCameraFactory`] implements `DriverFactory`, so it plugs into the
//! driver registry like any other driver:
//!
//! ```rust,ignore
//! use camkit_driver_mock::{MockCamera, MockCameraFactory};
//! use camkit_hardware::DriverRegistry;
//!
//! let camera = MockCamera::builder()
//!     .with_file("/", "IMG_0001.JPG", "image/jpeg", b"...")
//!     .build();
//! let calls = camera.calls();
//!
//! let registry = DriverRegistry::with_builtin();
//! registry.register_factory(Box::new(MockCameraFactory::new(camera)));
//! ```

pub mod common;
mod mock_camera;

pub use common::{
    CallLog, ErrorConfig, ErrorScenario, MOCK_COMMUNICATION_LOST, MOCK_INJECTED_FAILURE,
};
pub use mock_camera::{MockCamera, MockCameraBuilder, MockCameraFactory, MOCK_LIBRARY};

use camkit_core::FactoryRegistry;

/// Register the default mock camera under [`MOCK_LIBRARY`].
pub fn register_all(registry: &impl FactoryRegistry) {
    registry.register_factory(Box::new(MockCameraFactory::default()));
}
