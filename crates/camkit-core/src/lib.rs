//! # camkit-core
//!
//! Shared vocabulary for the camkit workspace: the result-code taxonomy,
//! the capability records that describe supported camera models, the data
//! containers that flow through driver operations, and the driver contract
//! itself (the [`OperationTable`] of optional slots plus the
//! [`DriverFactory`] that produces one).
//!
//! Nothing in this crate knows how a session is bound to a driver; that
//! lives in `camkit-hardware`. Drivers only need to depend on this crate.
//!
//! ## Modules
//!
//! - [`error`] - [`CamError`], integer result codes and their text
//! - [`abilities`] - [`CameraAbilities`] and the operation flag sets
//! - [`port`] - port kinds, port configuration and enumeration records
//! - [`file`] - [`CameraFile`], [`CameraFileInfo`] and [`CameraFilePath`]
//! - [`list`] - the ordered name/value [`CameraList`]
//! - [`widget`] - configuration trees, text blobs and capture settings
//! - [`driver`] - [`Operation`], [`OperationTable`], [`DriverContext`], [`Frontend`]

pub mod abilities;
pub mod driver;
pub mod error;
pub mod file;
pub mod list;
pub mod port;
pub mod widget;

pub use abilities::{CameraAbilities, CaptureKind, CaptureMode, FileOperations, FolderOperations};
pub use driver::{
    DriverContext, DriverFactory, FactoryRegistry, Frontend, LogFrontend, Operation,
    OperationTable,
};
pub use error::{result_as_string, CamError, CamResult, DriverError, LoadError};
pub use file::{CameraFile, CameraFileInfo, CameraFilePath, FileInfoDetail, InfoFields};
pub use list::{CameraList, ListEntry};
pub use port::{PortConfig, PortInfo, PortKind};
pub use widget::{CameraText, CameraWidget, CaptureSetting, WidgetKind, WidgetValue};
