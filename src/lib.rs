//! # camkit
//!
//! Camera session management: bind a session to a camera model on a port,
//! load the model's driver, and dispatch operations to whatever the driver
//! supports.
//!
//! This crate is the facade over the workspace. It re-exports the session
//! API from `camkit-hardware` and the shared types from `camkit-core`, and
//! adds process-level setup:
//!
//! - **`config`**: [`CamkitConfig`](config::CamkitConfig), loaded from TOML
//!   plus `CAMKIT_` environment variables.
//! - **`logging`**: tracing subscriber initialization.
//! - **`setup`**: building a [`CameraContext`] from configuration.
//!
//! ## Example
//!
//! ```no_run
//! use camkit::{config::CamkitConfig, logging, setup, Camera, CameraList};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = CamkitConfig::load()?;
//! logging::init_from_config(&config)?;
//! let context = setup::build_context(&config)?;
//!
//! let camera = Camera::new(&context)?;
//! camera.set_model("Directory Browse")?;
//! camera.set_port_path("/srv/photos")?;
//! camera.init()?;
//!
//! let mut files = CameraList::new();
//! camera.file_list("/", &mut files)?;
//! for name in files.names() {
//!     println!("{name}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod logging;
pub mod setup;

pub use camkit_core::{
    error, result_as_string, CamError, CamResult, CameraAbilities, CameraFile, CameraFileInfo,
    CameraFilePath, CameraList, CameraText, CameraWidget, CaptureKind, CaptureSetting,
    DriverContext, DriverError, DriverFactory, FactoryRegistry, FileInfoDetail, FileOperations,
    FolderOperations, Frontend, InfoFields, LoadError, LogFrontend, Operation, OperationTable,
    PortConfig, PortInfo, PortKind, WidgetKind, WidgetValue,
};
pub use camkit_hardware::{
    camera_result_as_string, AbilitiesRegistry, BindStage, BindState, Camera, CameraContext,
    CameraContextBuilder, ChainedPortResolver, DriverLoader, DriverModule, DriverRegistry,
    PortResolver, SerialByIdResolver, StaticPortResolver, DIRECTORY_BROWSE_MODEL,
};

/// Scripted mock driver for tests and simulation.
#[cfg(feature = "mock")]
pub use camkit_driver_mock as mock;
