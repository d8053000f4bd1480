//! Capability records for supported camera models.
//!
//! A [`CameraAbilities`] record names a model, the driver library that serves
//! it, and what that model can do. Records are deserializable so they can be
//! shipped as TOML tables:
//!
//! ```toml
//! [[camera]]
//! model = "Mock Camera"
//! library = "mock"
//! file_operations = "DELETE | PREVIEW"
//! folder_operations = "PUT_FILE"
//! config = true
//! capture = [{ kind = "image", name = "Still" }]
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Per-file operations a model supports.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct FileOperations: u32 {
        /// Files can be deleted.
        const DELETE = 1 << 0;
        /// Files have previews.
        const PREVIEW = 1 << 1;
        /// Files have configuration trees.
        const CONFIG = 1 << 2;
    }
}

bitflags! {
    /// Per-folder operations a model supports.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct FolderOperations: u32 {
        /// A folder can be emptied in one call.
        const DELETE_ALL = 1 << 0;
        /// Files can be uploaded.
        const PUT_FILE = 1 << 1;
        /// Folders have configuration trees.
        const CONFIG = 1 << 2;
    }
}

/// What a capture produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureKind {
    /// Still image.
    Image,
    /// Video clip.
    Video,
    /// Low-resolution preview frame.
    Preview,
}

/// A named capture mode offered by a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureMode {
    /// What the mode produces.
    pub kind: CaptureKind,
    /// Display name.
    pub name: String,
}

/// Capability record describing one camera model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraAbilities {
    /// Model name, matched exactly during binding.
    pub model: String,
    /// Name of the driver library that serves this model.
    pub library: String,
    /// Supported per-file operations.
    #[serde(default)]
    pub file_operations: FileOperations,
    /// Supported per-folder operations.
    #[serde(default)]
    pub folder_operations: FolderOperations,
    /// Whether the model exposes a camera-wide configuration tree.
    #[serde(default)]
    pub config: bool,
    /// Capture modes, in the order the model lists them.
    #[serde(default)]
    pub capture: Vec<CaptureMode>,
}

impl CameraAbilities {
    /// Record with no capabilities.
    #[must_use]
    pub fn new(model: impl Into<String>, library: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            library: library.into(),
            ..Self::default()
        }
    }

    /// Set the per-file operations.
    #[must_use]
    pub fn with_file_operations(mut self, ops: FileOperations) -> Self {
        self.file_operations = ops;
        self
    }

    /// Set the per-folder operations.
    #[must_use]
    pub fn with_folder_operations(mut self, ops: FolderOperations) -> Self {
        self.folder_operations = ops;
        self
    }

    /// Set whether a configuration tree is offered.
    #[must_use]
    pub fn with_config(mut self, config: bool) -> Self {
        self.config = config;
        self
    }

    /// Append a capture mode.
    #[must_use]
    pub fn with_capture(mut self, kind: CaptureKind, name: impl Into<String>) -> Self {
        self.capture.push(CaptureMode {
            kind,
            name: name.into(),
        });
        self
    }
}
