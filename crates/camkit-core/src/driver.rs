//! Driver contract.
//!
//! A driver is a set of optional operation slots. Which slots are filled is
//! the driver's own business: the session layer never assumes an operation
//! exists and reports [`CamError::NotSupported`] for every empty slot.
//!
//! # Architecture
//!
//! ```text
//! DriverFactory::build() ──► OperationTable ──► bound to a session
//!                               │
//!                               ├─ init / exit
//!                               ├─ config / config_get / config_set / summary / manual / about
//!                               ├─ capture / capture_preview
//!                               ├─ folder_list / file_list / folder_* ...
//!                               └─ result_as_string (driver-range codes)
//! ```
//!
//! Every slot receives the session's [`DriverContext`], which exposes the
//! resolved port, the capability snapshot, a queue of frontend messages, and
//! a type-erased slot where the driver can keep its own per-session state.
//!
//! # Example
//!
//! ```
//! use camkit_core::{CameraList, OperationTable};
//!
//! let table = OperationTable::new()
//!     .with_init(|ctx| {
//!         ctx.set_driver_data(0u32);
//!         Ok(())
//!     })
//!     .with_file_list(|_ctx, _folder, list: &mut CameraList| {
//!         list.append("IMG_0001.JPG", "");
//!         Ok(())
//!     });
//!
//! assert!(table.supports(camkit_core::Operation::FileList));
//! assert!(!table.supports(camkit_core::Operation::Capture));
//! ```

use std::any::Any;

use crate::abilities::CameraAbilities;
use crate::error::{CamError, CamResult};
use crate::file::{CameraFile, CameraFileInfo, CameraFilePath};
use crate::list::CameraList;
use crate::port::PortConfig;
use crate::widget::{CameraText, CameraWidget, CaptureSetting};

// =============================================================================
// Operation
// =============================================================================

/// Names every slot of an [`OperationTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    /// Bring the driver up after binding.
    Init,
    /// Shut the driver down before unloading.
    Exit,
    /// Interactive configuration through the frontend.
    Config,
    /// Read the camera-wide configuration tree.
    ConfigGet,
    /// Write the camera-wide configuration tree.
    ConfigSet,
    /// Status summary text.
    Summary,
    /// Driver manual text.
    Manual,
    /// Driver credits text.
    About,
    /// Trigger a capture stored on the camera.
    Capture,
    /// Capture a preview image straight into a file container.
    CapturePreview,
    /// List subfolders.
    FolderList,
    /// List files in a folder.
    FileList,
    /// Delete every file in a folder.
    FolderDeleteAll,
    /// Upload a file into a folder.
    FolderPutFile,
    /// Read a folder's configuration tree.
    FolderConfigGet,
    /// Write a folder's configuration tree.
    FolderConfigSet,
    /// Read file and preview metadata.
    FileInfoGet,
    /// Write file metadata.
    FileInfoSet,
    /// Download a file.
    FileGet,
    /// Download a file's preview.
    FileGetPreview,
    /// Read a file's configuration tree.
    FileConfigGet,
    /// Write a file's configuration tree.
    FileConfigSet,
    /// Delete one file.
    FileDelete,
    /// Describe a driver-range result code.
    ResultAsString,
}

impl Operation {
    /// Every operation, in slot order.
    pub const ALL: [Operation; 24] = [
        Operation::Init,
        Operation::Exit,
        Operation::Config,
        Operation::ConfigGet,
        Operation::ConfigSet,
        Operation::Summary,
        Operation::Manual,
        Operation::About,
        Operation::Capture,
        Operation::CapturePreview,
        Operation::FolderList,
        Operation::FileList,
        Operation::FolderDeleteAll,
        Operation::FolderPutFile,
        Operation::FolderConfigGet,
        Operation::FolderConfigSet,
        Operation::FileInfoGet,
        Operation::FileInfoSet,
        Operation::FileGet,
        Operation::FileGetPreview,
        Operation::FileConfigGet,
        Operation::FileConfigSet,
        Operation::FileDelete,
        Operation::ResultAsString,
    ];

    /// Snake-case slot name, as used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Init => "init",
            Operation::Exit => "exit",
            Operation::Config => "config",
            Operation::ConfigGet => "config_get",
            Operation::ConfigSet => "config_set",
            Operation::Summary => "summary",
            Operation::Manual => "manual",
            Operation::About => "about",
            Operation::Capture => "capture",
            Operation::CapturePreview => "capture_preview",
            Operation::FolderList => "folder_list",
            Operation::FileList => "file_list",
            Operation::FolderDeleteAll => "folder_delete_all",
            Operation::FolderPutFile => "folder_put_file",
            Operation::FolderConfigGet => "folder_config_get",
            Operation::FolderConfigSet => "folder_config_set",
            Operation::FileInfoGet => "file_info_get",
            Operation::FileInfoSet => "file_info_set",
            Operation::FileGet => "file_get",
            Operation::FileGetPreview => "file_get_preview",
            Operation::FileConfigGet => "file_config_get",
            Operation::FileConfigSet => "file_config_set",
            Operation::FileDelete => "file_delete",
            Operation::ResultAsString => "result_as_string",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Frontend
// =============================================================================

/// Sink for user-facing status messages raised by the session layer or a
/// driver (e.g. "please specify a port").
///
/// Messages are delivered after the session lock has been released, so an
/// implementation may call back into the session it is being notified about.
pub trait Frontend: Send + Sync {
    /// Show `text` to the user.
    fn message(&self, text: &str);
}

/// Frontend that forwards messages to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFrontend;

impl Frontend for LogFrontend {
    fn message(&self, text: &str) {
        tracing::info!(target: "camkit::frontend", "{}", text);
    }
}

// =============================================================================
// DriverContext
// =============================================================================

/// Per-session state handed to every driver operation.
///
/// Frontend messages raised through [`message`](Self::message) are queued
/// here; the session drains them with [`take_messages`](Self::take_messages)
/// and delivers them once the operation has returned.
pub struct DriverContext {
    session: u64,
    port: PortConfig,
    abilities: CameraAbilities,
    pending_messages: Vec<String>,
    driver_data: Option<Box<dyn Any + Send>>,
}

impl DriverContext {
    /// Context for session `session` with a default port and no abilities.
    #[must_use]
    pub fn new(session: u64) -> Self {
        Self {
            session,
            port: PortConfig::default(),
            abilities: CameraAbilities::default(),
            pending_messages: Vec::new(),
            driver_data: None,
        }
    }

    /// Numeric identity of the owning session.
    #[must_use]
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Port the session is configured for.
    #[must_use]
    pub fn port(&self) -> &PortConfig {
        &self.port
    }

    /// Mutable access to the port configuration.
    pub fn port_mut(&mut self) -> &mut PortConfig {
        &mut self.port
    }

    /// Capability snapshot taken when the session was bound.
    #[must_use]
    pub fn abilities(&self) -> &CameraAbilities {
        &self.abilities
    }

    /// Replace the capability snapshot.
    pub fn set_abilities(&mut self, abilities: CameraAbilities) {
        self.abilities = abilities;
    }

    /// Queue a status message for the frontend.
    pub fn message(&mut self, text: &str) {
        tracing::debug!(session = self.session, "Queued frontend message");
        self.pending_messages.push(text.to_string());
    }

    /// Drain queued frontend messages, oldest first.
    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_messages)
    }

    /// Store driver-private state, replacing any previous value.
    pub fn set_driver_data<T: Any + Send>(&mut self, data: T) {
        self.driver_data = Some(Box::new(data));
    }

    /// Driver-private state, if present and of type `T`.
    #[must_use]
    pub fn driver_data<T: Any + Send>(&self) -> Option<&T> {
        self.driver_data.as_ref()?.downcast_ref::<T>()
    }

    /// Mutable driver-private state, if present and of type `T`.
    pub fn driver_data_mut<T: Any + Send>(&mut self) -> Option<&mut T> {
        self.driver_data.as_mut()?.downcast_mut::<T>()
    }

    /// Like [`driver_data_mut`](Self::driver_data_mut), but reports a missing
    /// or mistyped slot as an internal error.
    pub fn require_driver_data<T: Any + Send>(&mut self) -> CamResult<&mut T> {
        let session = self.session;
        self.driver_data_mut::<T>().ok_or_else(|| {
            CamError::Internal(format!("driver state for session {session} is missing"))
        })
    }

    /// Drop driver-private state.
    pub fn clear_driver_data(&mut self) {
        self.driver_data = None;
    }
}

impl std::fmt::Debug for DriverContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverContext")
            .field("session", &self.session)
            .field("port", &self.port)
            .field("model", &self.abilities.model)
            .field("pending_messages", &self.pending_messages.len())
            .field("has_driver_data", &self.driver_data.is_some())
            .finish()
    }
}

// =============================================================================
// Operation slots
// =============================================================================

/// Slot signature for `init`, `exit` and `config`.
pub type LifecycleOp = Box<dyn FnMut(&mut DriverContext) -> CamResult<()> + Send>;
/// Slot signature for `config_get`.
pub type ConfigGetOp = Box<dyn FnMut(&mut DriverContext) -> CamResult<CameraWidget> + Send>;
/// Slot signature for `config_set`.
pub type ConfigSetOp =
    Box<dyn FnMut(&mut DriverContext, &CameraWidget) -> CamResult<()> + Send>;
/// Slot signature for `summary`, `manual` and `about`.
pub type TextOp = Box<dyn FnMut(&mut DriverContext, &mut CameraText) -> CamResult<()> + Send>;
/// Slot signature for `capture`.
pub type CaptureOp =
    Box<dyn FnMut(&mut DriverContext, &CaptureSetting) -> CamResult<CameraFilePath> + Send>;
/// Slot signature for `capture_preview`.
pub type CapturePreviewOp =
    Box<dyn FnMut(&mut DriverContext, &mut CameraFile) -> CamResult<()> + Send>;
/// Slot signature for `folder_list` and `file_list`.
pub type ListOp =
    Box<dyn FnMut(&mut DriverContext, &str, &mut CameraList) -> CamResult<()> + Send>;
/// Slot signature for `folder_delete_all`.
pub type FolderOp = Box<dyn FnMut(&mut DriverContext, &str) -> CamResult<()> + Send>;
/// Slot signature for `folder_put_file`.
pub type FolderPutOp =
    Box<dyn FnMut(&mut DriverContext, &str, &CameraFile) -> CamResult<()> + Send>;
/// Slot signature for `folder_config_get`.
pub type FolderConfigGetOp =
    Box<dyn FnMut(&mut DriverContext, &str) -> CamResult<CameraWidget> + Send>;
/// Slot signature for `folder_config_set`.
pub type FolderConfigSetOp =
    Box<dyn FnMut(&mut DriverContext, &str, &CameraWidget) -> CamResult<()> + Send>;
/// Slot signature for `file_info_get`.
pub type FileInfoGetOp =
    Box<dyn FnMut(&mut DriverContext, &str, &str) -> CamResult<CameraFileInfo> + Send>;
/// Slot signature for `file_info_set`.
pub type FileInfoSetOp =
    Box<dyn FnMut(&mut DriverContext, &str, &str, &CameraFileInfo) -> CamResult<()> + Send>;
/// Slot signature for `file_get` and `file_get_preview`.
pub type FileGetOp =
    Box<dyn FnMut(&mut DriverContext, &str, &str, &mut CameraFile) -> CamResult<()> + Send>;
/// Slot signature for `file_config_get`.
pub type FileConfigGetOp =
    Box<dyn FnMut(&mut DriverContext, &str, &str) -> CamResult<CameraWidget> + Send>;
/// Slot signature for `file_config_set`.
pub type FileConfigSetOp =
    Box<dyn FnMut(&mut DriverContext, &str, &str, &CameraWidget) -> CamResult<()> + Send>;
/// Slot signature for `file_delete`.
pub type FileOp = Box<dyn FnMut(&mut DriverContext, &str, &str) -> CamResult<()> + Send>;
/// Slot signature for `result_as_string`.
pub type ResultStringOp = Box<dyn Fn(&DriverContext, i32) -> String + Send>;

// =============================================================================
// OperationTable
// =============================================================================

/// The operations a driver provides; every slot is optional.
///
/// Built with the `with_*` methods, usually inside a [`DriverFactory::build`].
#[derive(Default)]
pub struct OperationTable {
    /// `init` slot.
    pub init: Option<LifecycleOp>,
    /// `exit` slot.
    pub exit: Option<LifecycleOp>,
    /// `config` slot.
    pub config: Option<LifecycleOp>,
    /// `config_get` slot.
    pub config_get: Option<ConfigGetOp>,
    /// `config_set` slot.
    pub config_set: Option<ConfigSetOp>,
    /// `summary` slot.
    pub summary: Option<TextOp>,
    /// `manual` slot.
    pub manual: Option<TextOp>,
    /// `about` slot.
    pub about: Option<TextOp>,
    /// `capture` slot.
    pub capture: Option<CaptureOp>,
    /// `capture_preview` slot.
    pub capture_preview: Option<CapturePreviewOp>,
    /// `folder_list` slot.
    pub folder_list: Option<ListOp>,
    /// `file_list` slot.
    pub file_list: Option<ListOp>,
    /// `folder_delete_all` slot.
    pub folder_delete_all: Option<FolderOp>,
    /// `folder_put_file` slot.
    pub folder_put_file: Option<FolderPutOp>,
    /// `folder_config_get` slot.
    pub folder_config_get: Option<FolderConfigGetOp>,
    /// `folder_config_set` slot.
    pub folder_config_set: Option<FolderConfigSetOp>,
    /// `file_info_get` slot.
    pub file_info_get: Option<FileInfoGetOp>,
    /// `file_info_set` slot.
    pub file_info_set: Option<FileInfoSetOp>,
    /// `file_get` slot.
    pub file_get: Option<FileGetOp>,
    /// `file_get_preview` slot.
    pub file_get_preview: Option<FileGetOp>,
    /// `file_config_get` slot.
    pub file_config_get: Option<FileConfigGetOp>,
    /// `file_config_set` slot.
    pub file_config_set: Option<FileConfigSetOp>,
    /// `file_delete` slot.
    pub file_delete: Option<FileOp>,
    /// `result_as_string` slot.
    pub result_as_string: Option<ResultStringOp>,
}

impl OperationTable {
    /// Create a table with every slot empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the slot for `op` is filled.
    #[must_use]
    pub fn supports(&self, op: Operation) -> bool {
        match op {
            Operation::Init => self.init.is_some(),
            Operation::Exit => self.exit.is_some(),
            Operation::Config => self.config.is_some(),
            Operation::ConfigGet => self.config_get.is_some(),
            Operation::ConfigSet => self.config_set.is_some(),
            Operation::Summary => self.summary.is_some(),
            Operation::Manual => self.manual.is_some(),
            Operation::About => self.about.is_some(),
            Operation::Capture => self.capture.is_some(),
            Operation::CapturePreview => self.capture_preview.is_some(),
            Operation::FolderList => self.folder_list.is_some(),
            Operation::FileList => self.file_list.is_some(),
            Operation::FolderDeleteAll => self.folder_delete_all.is_some(),
            Operation::FolderPutFile => self.folder_put_file.is_some(),
            Operation::FolderConfigGet => self.folder_config_get.is_some(),
            Operation::FolderConfigSet => self.folder_config_set.is_some(),
            Operation::FileInfoGet => self.file_info_get.is_some(),
            Operation::FileInfoSet => self.file_info_set.is_some(),
            Operation::FileGet => self.file_get.is_some(),
            Operation::FileGetPreview => self.file_get_preview.is_some(),
            Operation::FileConfigGet => self.file_config_get.is_some(),
            Operation::FileConfigSet => self.file_config_set.is_some(),
            Operation::FileDelete => self.file_delete.is_some(),
            Operation::ResultAsString => self.result_as_string.is_some(),
        }
    }

    /// Filled slots, in slot order.
    #[must_use]
    pub fn supported(&self) -> Vec<Operation> {
        Operation::ALL
            .iter()
            .copied()
            .filter(|op| self.supports(*op))
            .collect()
    }

    // Builder methods

    /// Fill the `init` slot.
    #[must_use]
    pub fn with_init(
        mut self,
        op: impl FnMut(&mut DriverContext) -> CamResult<()> + Send + 'static,
    ) -> Self {
        self.init = Some(Box::new(op));
        self
    }

    /// Fill the `exit` slot.
    #[must_use]
    pub fn with_exit(
        mut self,
        op: impl FnMut(&mut DriverContext) -> CamResult<()> + Send + 'static,
    ) -> Self {
        self.exit = Some(Box::new(op));
        self
    }

    /// Fill the `config` slot.
    #[must_use]
    pub fn with_config(
        mut self,
        op: impl FnMut(&mut DriverContext) -> CamResult<()> + Send + 'static,
    ) -> Self {
        self.config = Some(Box::new(op));
        self
    }

    /// Fill the `config_get` slot.
    #[must_use]
    pub fn with_config_get(
        mut self,
        op: impl FnMut(&mut DriverContext) -> CamResult<CameraWidget> + Send + 'static,
    ) -> Self {
        self.config_get = Some(Box::new(op));
        self
    }

    /// Fill the `config_set` slot.
    #[must_use]
    pub fn with_config_set(
        mut self,
        op: impl FnMut(&mut DriverContext, &CameraWidget) -> CamResult<()> + Send + 'static,
    ) -> Self {
        self.config_set = Some(Box::new(op));
        self
    }

    /// Fill the `summary` slot.
    #[must_use]
    pub fn with_summary(
        mut self,
        op: impl FnMut(&mut DriverContext, &mut CameraText) -> CamResult<()> + Send + 'static,
    ) -> Self {
        self.summary = Some(Box::new(op));
        self
    }

    /// Fill the `manual` slot.
    #[must_use]
    pub fn with_manual(
        mut self,
        op: impl FnMut(&mut DriverContext, &mut CameraText) -> CamResult<()> + Send + 'static,
    ) -> Self {
        self.manual = Some(Box::new(op));
        self
    }

    /// Fill the `about` slot.
    #[must_use]
    pub fn with_about(
        mut self,
        op: impl FnMut(&mut DriverContext, &mut CameraText) -> CamResult<()> + Send + 'static,
    ) -> Self {
        self.about = Some(Box::new(op));
        self
    }

    /// Fill the `capture` slot.
    #[must_use]
    pub fn with_capture(
        mut self,
        op: impl FnMut(&mut DriverContext, &CaptureSetting) -> CamResult<CameraFilePath>
            + Send
            + 'static,
    ) -> Self {
        self.capture = Some(Box::new(op));
        self
    }

    /// Fill the `capture_preview` slot.
    #[must_use]
    pub fn with_capture_preview(
        mut self,
        op: impl FnMut(&mut DriverContext, &mut CameraFile) -> CamResult<()> + Send + 'static,
    ) -> Self {
        self.capture_preview = Some(Box::new(op));
        self
    }

    /// Fill the `folder_list` slot.
    #[must_use]
    pub fn with_folder_list(
        mut self,
        op: impl FnMut(&mut DriverContext, &str, &mut CameraList) -> CamResult<()> + Send + 'static,
    ) -> Self {
        self.folder_list = Some(Box::new(op));
        self
    }

    /// Fill the `file_list` slot.
    #[must_use]
    pub fn with_file_list(
        mut self,
        op: impl FnMut(&mut DriverContext, &str, &mut CameraList) -> CamResult<()> + Send + 'static,
    ) -> Self {
        self.file_list = Some(Box::new(op));
        self
    }

    /// Fill the `folder_delete_all` slot.
    #[must_use]
    pub fn with_folder_delete_all(
        mut self,
        op: impl FnMut(&mut DriverContext, &str) -> CamResult<()> + Send + 'static,
    ) -> Self {
        self.folder_delete_all = Some(Box::new(op));
        self
    }

    /// Fill the `folder_put_file` slot.
    #[must_use]
    pub fn with_folder_put_file(
        mut self,
        op: impl FnMut(&mut DriverContext, &str, &CameraFile) -> CamResult<()> + Send + 'static,
    ) -> Self {
        self.folder_put_file = Some(Box::new(op));
        self
    }

    /// Fill the `folder_config_get` slot.
    #[must_use]
    pub fn with_folder_config_get(
        mut self,
        op: impl FnMut(&mut DriverContext, &str) -> CamResult<CameraWidget> + Send + 'static,
    ) -> Self {
        self.folder_config_get = Some(Box::new(op));
        self
    }

    /// Fill the `folder_config_set` slot.
    #[must_use]
    pub fn with_folder_config_set(
        mut self,
        op: impl FnMut(&mut DriverContext, &str, &CameraWidget) -> CamResult<()> + Send + 'static,
    ) -> Self {
        self.folder_config_set = Some(Box::new(op));
        self
    }

    /// Fill the `file_info_get` slot.
    #[must_use]
    pub fn with_file_info_get(
        mut self,
        op: impl FnMut(&mut DriverContext, &str, &str) -> CamResult<CameraFileInfo>
            + Send
            + 'static,
    ) -> Self {
        self.file_info_get = Some(Box::new(op));
        self
    }

    /// Fill the `file_info_set` slot.
    #[must_use]
    pub fn with_file_info_set(
        mut self,
        op: impl FnMut(&mut DriverContext, &str, &str, &CameraFileInfo) -> CamResult<()>
            + Send
            + 'static,
    ) -> Self {
        self.file_info_set = Some(Box::new(op));
        self
    }

    /// Fill the `file_get` slot.
    #[must_use]
    pub fn with_file_get(
        mut self,
        op: impl FnMut(&mut DriverContext, &str, &str, &mut CameraFile) -> CamResult<()>
            + Send
            + 'static,
    ) -> Self {
        self.file_get = Some(Box::new(op));
        self
    }

    /// Fill the `file_get_preview` slot.
    #[must_use]
    pub fn with_file_get_preview(
        mut self,
        op: impl FnMut(&mut DriverContext, &str, &str, &mut CameraFile) -> CamResult<()>
            + Send
            + 'static,
    ) -> Self {
        self.file_get_preview = Some(Box::new(op));
        self
    }

    /// Fill the `file_config_get` slot.
    #[must_use]
    pub fn with_file_config_get(
        mut self,
        op: impl FnMut(&mut DriverContext, &str, &str) -> CamResult<CameraWidget> + Send + 'static,
    ) -> Self {
        self.file_config_get = Some(Box::new(op));
        self
    }

    /// Fill the `file_config_set` slot.
    #[must_use]
    pub fn with_file_config_set(
        mut self,
        op: impl FnMut(&mut DriverContext, &str, &str, &CameraWidget) -> CamResult<()>
            + Send
            + 'static,
    ) -> Self {
        self.file_config_set = Some(Box::new(op));
        self
    }

    /// Fill the `file_delete` slot.
    #[must_use]
    pub fn with_file_delete(
        mut self,
        op: impl FnMut(&mut DriverContext, &str, &str) -> CamResult<()> + Send + 'static,
    ) -> Self {
        self.file_delete = Some(Box::new(op));
        self
    }

    /// Fill the `result_as_string` slot.
    #[must_use]
    pub fn with_result_as_string(
        mut self,
        op: impl Fn(&DriverContext, i32) -> String + Send + 'static,
    ) -> Self {
        self.result_as_string = Some(Box::new(op));
        self
    }
}

impl std::fmt::Debug for OperationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationTable")
            .field("supported", &self.supported())
            .finish()
    }
}

// =============================================================================
// Driver Factory
// =============================================================================

/// Produces operation tables for one driver library.
///
/// Factories are registered once with a driver registry and asked for a
/// fresh table every time a session binds to a model served by their
/// library. A factory must not hold mutable state across builds; state that
/// belongs to one session goes into [`DriverContext::set_driver_data`] from
/// the `init` slot.
pub trait DriverFactory: Send + Sync + 'static {
    /// Library name matched against [`CameraAbilities::library`].
    fn library(&self) -> &str;

    /// Human-readable name for logs and error messages.
    fn name(&self) -> &str;

    /// Build a fresh operation table.
    fn build(&self) -> CamResult<OperationTable>;
}

/// Registries that accept driver factories.
///
/// Lets driver crates offer a `register_all` helper without depending on the
/// crate that owns the registry.
pub trait FactoryRegistry {
    /// Register a factory, returning the one it replaced (if any).
    fn register_factory(
        &self,
        factory: Box<dyn DriverFactory>,
    ) -> Option<Box<dyn DriverFactory>>;
}
