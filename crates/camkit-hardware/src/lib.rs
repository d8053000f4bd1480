//! # camkit-hardware
//!
//! Session management for camkit: binding a [`Camera`] to a driver,
//! dispatching operations to the bound [`OperationTable`](camkit_core::OperationTable),
//! and the collaborators binding relies on.
//!
//! ## Architecture
//!
//! ```text
//! CameraContext (Arc, shared)
//!   ├─ AbilitiesRegistry   model name → CameraAbilities
//!   ├─ PortResolver        port name → path, path → kind
//!   ├─ DriverLoader        library name → DriverModule (OperationTable)
//!   └─ Frontend            user-facing messages
//!
//! Camera (ref-counted handle) ──► Session ──► bound DriverModule
//! ```
//!
//! ## Example
//!
//! ```
//! use camkit_hardware::{AbilitiesRegistry, Camera, CameraContext, DIRECTORY_BROWSE_MODEL};
//! use camkit_core::CameraList;
//!
//! let ctx = CameraContext::builder()
//!     .abilities(AbilitiesRegistry::with_directory_browse())
//!     .build();
//!
//! let camera = Camera::new(&ctx).unwrap();
//! camera.set_model(DIRECTORY_BROWSE_MODEL).unwrap();
//! camera.set_port_path(std::env::temp_dir().to_string_lossy()).unwrap();
//! camera.init().unwrap();
//!
//! let mut folders = CameraList::new();
//! camera.folder_list("/", &mut folders).unwrap();
//! ```

pub mod abilities;
pub mod camera;
pub mod config;
pub mod context;
pub mod drivers;
pub mod fileinfo;
pub mod listing;
pub mod loader;
pub mod port_resolver;

pub use abilities::AbilitiesRegistry;
pub use camera::{camera_result_as_string, BindStage, BindState, Camera, DIRECTORY_BROWSE_MODEL};
pub use context::{CameraContext, CameraContextBuilder};
pub use loader::{DriverLoader, DriverModule, DriverRegistry};
pub use port_resolver::{
    ChainedPortResolver, PortResolveError, PortResolver, SerialByIdResolver, StaticPortResolver,
};

#[cfg(feature = "serial")]
pub use port_resolver::SystemSerialResolver;
