//! File containers and file metadata.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{CamError, CamResult};

// =============================================================================
// CameraFile
// =============================================================================

/// In-memory file transferred to or from a camera.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CameraFile {
    name: String,
    mime_type: String,
    data: Vec<u8>,
}

impl CameraFile {
    /// Empty file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// File with a name, MIME type and payload.
    #[must_use]
    pub fn with_data(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// File name, without folder.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the file name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// MIME type, empty if unknown.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Set the MIME type.
    pub fn set_mime_type(&mut self, mime_type: impl Into<String>) {
        self.mime_type = mime_type.into();
    }

    /// Payload bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Replace the payload.
    pub fn set_data(&mut self, data: Vec<u8>) {
        self.data = data;
    }

    /// Append a chunk, reporting allocation failure instead of aborting.
    pub fn append(&mut self, chunk: &[u8]) -> CamResult<()> {
        self.data
            .try_reserve(chunk.len())
            .map_err(|_| CamError::OutOfMemory)?;
        self.data.extend_from_slice(chunk);
        Ok(())
    }

    /// Size of the payload in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Reset name, type and payload.
    pub fn clean(&mut self) {
        self.name.clear();
        self.mime_type.clear();
        self.data.clear();
    }
}

// =============================================================================
// File info
// =============================================================================

bitflags! {
    /// Which fields of a [`FileInfoDetail`] carry meaningful values.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct InfoFields: u32 {
        /// `mime_type` is valid.
        const TYPE = 1 << 0;
        /// `name` is valid.
        const NAME = 1 << 1;
        /// `size` is valid.
        const SIZE = 1 << 2;
        /// `width` is valid.
        const WIDTH = 1 << 3;
        /// `height` is valid.
        const HEIGHT = 1 << 4;
    }
}

/// Metadata about either a file or its preview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfoDetail {
    /// Which of the fields below are meaningful.
    pub fields: InfoFields,
    /// Size in bytes.
    pub size: u64,
    /// MIME type.
    pub mime_type: String,
    /// File name.
    pub name: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl FileInfoDetail {
    /// Whether every flag in `fields` is set.
    #[must_use]
    pub fn has(&self, fields: InfoFields) -> bool {
        self.fields.contains(fields)
    }

    /// Size, if the size field is populated.
    #[must_use]
    pub fn size(&self) -> Option<u64> {
        self.has(InfoFields::SIZE).then_some(self.size)
    }

    /// MIME type, if the type field is populated.
    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        self.has(InfoFields::TYPE).then_some(self.mime_type.as_str())
    }
}

/// File and preview metadata for one camera file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraFileInfo {
    /// Metadata of the file itself.
    pub file: FileInfoDetail,
    /// Metadata of its preview.
    pub preview: FileInfoDetail,
}

/// Location of a file on the camera, as returned by a capture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraFilePath {
    /// Folder holding the file.
    pub folder: String,
    /// File name within the folder.
    pub name: String,
}

impl CameraFilePath {
    /// Path from folder and name.
    #[must_use]
    pub fn new(folder: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            name: name.into(),
        }
    }
}
