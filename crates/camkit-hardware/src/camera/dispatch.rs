//! Operation dispatch.
//!
//! Every camera operation follows the same contract:
//!
//! 1. If the bound driver lacks the slot (or nothing is bound), fail with
//!    [`CamError::NotSupported`] without running any driver code.
//! 2. Apply operation-specific argument checks and output resets.
//! 3. Forward to the driver and return its result unchanged, post-processing
//!    listings (sorted by name) and file info (synthesized when the driver
//!    cannot report it).

use camkit_core::error::is_driver_code;
use camkit_core::{
    result_as_string, CamError, CamResult, CameraFile, CameraFileInfo, CameraFilePath, CameraList,
    CameraText, CameraWidget, CaptureSetting, DriverContext, Operation, OperationTable,
};
use tracing::trace;

use super::{Camera, SessionInner};
use crate::fileinfo::{synthesize_file_info, FileSource};
use crate::listing::normalize_listing;

/// Text for driver-range codes whose driver offers no translation.
pub const NO_DESCRIPTION: &str = "Error description not available";

impl SessionInner {
    /// Context and slot for `op`, or `NotSupported` if the slot is empty.
    fn slot<'a, T: ?Sized + 'a>(
        &'a mut self,
        op: Operation,
        pick: impl FnOnce(&'a mut OperationTable) -> Option<&'a mut T>,
    ) -> CamResult<(&'a mut DriverContext, &'a mut T)> {
        let slot = self
            .module
            .as_mut()
            .map(|m| m.table_mut())
            .and_then(pick)
            .ok_or(CamError::NotSupported(op))?;
        trace!(session = self.driver.session(), operation = %op, "Dispatching");
        Ok((&mut self.driver, slot))
    }

    fn supports(&self, op: Operation) -> bool {
        self.module.as_ref().is_some_and(|m| m.table().supports(op))
    }

    fn config(&mut self) -> CamResult<()> {
        let (ctx, op) = self.slot(Operation::Config, |t| t.config.as_mut())?;
        op(ctx)
    }

    fn config_get(&mut self) -> CamResult<CameraWidget> {
        let (ctx, op) = self.slot(Operation::ConfigGet, |t| t.config_get.as_mut())?;
        op(ctx)
    }

    fn config_set(&mut self, window: &CameraWidget) -> CamResult<()> {
        let (ctx, op) = self.slot(Operation::ConfigSet, |t| t.config_set.as_mut())?;
        op(ctx, window)
    }

    fn text(&mut self, which: Operation) -> CamResult<CameraText> {
        let (ctx, op) = self.slot(which, |t| match which {
            Operation::Summary => t.summary.as_mut(),
            Operation::Manual => t.manual.as_mut(),
            _ => t.about.as_mut(),
        })?;
        let mut text = CameraText::new();
        op(ctx, &mut text)?;
        Ok(text)
    }

    fn capture(&mut self, setting: &CaptureSetting) -> CamResult<CameraFilePath> {
        let (ctx, op) = self.slot(Operation::Capture, |t| t.capture.as_mut())?;
        op(ctx, setting)
    }

    fn capture_preview(&mut self, file: &mut CameraFile) -> CamResult<()> {
        let (ctx, op) = self.slot(Operation::CapturePreview, |t| t.capture_preview.as_mut())?;
        op(ctx, file)
    }

    fn listing(
        &mut self,
        which: Operation,
        folder: &str,
        list: &mut CameraList,
    ) -> CamResult<()> {
        let (ctx, op) = self.slot(which, |t| match which {
            Operation::FolderList => t.folder_list.as_mut(),
            _ => t.file_list.as_mut(),
        })?;

        list.reset();
        if let Err(err) = op(ctx, folder, list) {
            list.reset();
            return Err(err);
        }
        normalize_listing(list);
        Ok(())
    }

    fn folder_delete_all(&mut self, folder: &str) -> CamResult<()> {
        let (ctx, op) =
            self.slot(Operation::FolderDeleteAll, |t| t.folder_delete_all.as_mut())?;
        op(ctx, folder)
    }

    fn folder_put_file(&mut self, folder: &str, file: &CameraFile) -> CamResult<()> {
        let (ctx, op) = self.slot(Operation::FolderPutFile, |t| t.folder_put_file.as_mut())?;
        op(ctx, folder, file)
    }

    fn folder_config_get(&mut self, folder: &str) -> CamResult<CameraWidget> {
        let (ctx, op) =
            self.slot(Operation::FolderConfigGet, |t| t.folder_config_get.as_mut())?;
        op(ctx, folder)
    }

    fn folder_config_set(&mut self, folder: &str, window: &CameraWidget) -> CamResult<()> {
        let (ctx, op) =
            self.slot(Operation::FolderConfigSet, |t| t.folder_config_set.as_mut())?;
        op(ctx, folder, window)
    }

    fn file_info_get(&mut self, folder: &str, file: &str) -> CamResult<CameraFileInfo> {
        if !self.supports(Operation::FileInfoGet) {
            trace!(folder, file, "Synthesizing file info");
            return Ok(synthesize_file_info(self, folder, file));
        }
        let (ctx, op) = self.slot(Operation::FileInfoGet, |t| t.file_info_get.as_mut())?;
        op(ctx, folder, file)
    }

    fn file_info_set(
        &mut self,
        folder: &str,
        file: &str,
        info: &CameraFileInfo,
    ) -> CamResult<()> {
        let (ctx, op) = self.slot(Operation::FileInfoSet, |t| t.file_info_set.as_mut())?;
        op(ctx, folder, file, info)
    }

    fn file_get(&mut self, folder: &str, file: &str, into: &mut CameraFile) -> CamResult<()> {
        let (ctx, op) = self.slot(Operation::FileGet, |t| t.file_get.as_mut())?;
        if folder.is_empty() {
            return Err(CamError::DirectoryNotFound("no folder specified".into()));
        }
        if file.is_empty() {
            return Err(CamError::FileNotFound("no file specified".into()));
        }
        into.clean();
        op(ctx, folder, file, into)
    }

    fn file_get_preview(
        &mut self,
        folder: &str,
        file: &str,
        into: &mut CameraFile,
    ) -> CamResult<()> {
        let (ctx, op) =
            self.slot(Operation::FileGetPreview, |t| t.file_get_preview.as_mut())?;
        into.clean();
        op(ctx, folder, file, into)
    }

    fn file_config_get(&mut self, folder: &str, file: &str) -> CamResult<CameraWidget> {
        let (ctx, op) = self.slot(Operation::FileConfigGet, |t| t.file_config_get.as_mut())?;
        op(ctx, folder, file)
    }

    fn file_config_set(
        &mut self,
        folder: &str,
        file: &str,
        window: &CameraWidget,
    ) -> CamResult<()> {
        let (ctx, op) = self.slot(Operation::FileConfigSet, |t| t.file_config_set.as_mut())?;
        op(ctx, folder, file, window)
    }

    fn file_delete(&mut self, folder: &str, file: &str) -> CamResult<()> {
        let (ctx, op) = self.slot(Operation::FileDelete, |t| t.file_delete.as_mut())?;
        op(ctx, folder, file)
    }

    fn result_text(&self, code: i32) -> String {
        if !is_driver_code(code) {
            return result_as_string(code).to_string();
        }
        match self
            .module
            .as_ref()
            .and_then(|m| m.table().result_as_string.as_ref())
        {
            Some(translate) => translate(&self.driver, code),
            None => NO_DESCRIPTION.to_string(),
        }
    }
}

impl FileSource for SessionInner {
    fn fetch_file(&mut self, folder: &str, file: &str, into: &mut CameraFile) -> CamResult<()> {
        self.file_get(folder, file, into)
    }

    fn fetch_preview(
        &mut self,
        folder: &str,
        file: &str,
        into: &mut CameraFile,
    ) -> CamResult<()> {
        self.file_get_preview(folder, file, into)
    }
}

// =============================================================================
// Public operations
// =============================================================================

impl Camera {
    /// Run the driver's interactive configuration.
    pub fn config(&self) -> CamResult<()> {
        self.locked(|s| s.config())
    }

    /// Fetch the camera-wide configuration tree.
    pub fn config_get(&self) -> CamResult<CameraWidget> {
        self.locked(|s| s.config_get())
    }

    /// Apply a modified camera-wide configuration tree.
    pub fn config_set(&self, window: &CameraWidget) -> CamResult<()> {
        self.locked(|s| s.config_set(window))
    }

    /// Human-readable summary of the camera's state.
    pub fn summary(&self) -> CamResult<CameraText> {
        self.locked(|s| s.text(Operation::Summary))
    }

    /// Driver manual text.
    pub fn manual(&self) -> CamResult<CameraText> {
        self.locked(|s| s.text(Operation::Manual))
    }

    /// Driver credits and version text.
    pub fn about(&self) -> CamResult<CameraText> {
        self.locked(|s| s.text(Operation::About))
    }

    /// Trigger a capture; returns where the result was stored on the camera.
    pub fn capture(&self, setting: &CaptureSetting) -> CamResult<CameraFilePath> {
        self.locked(|s| s.capture(setting))
    }

    /// Grab a preview frame into `file`.
    pub fn capture_preview(&self, file: &mut CameraFile) -> CamResult<()> {
        self.locked(|s| s.capture_preview(file))
    }

    /// List subfolders of `folder`, sorted by name.
    ///
    /// `list` is reset before the driver runs and left empty on failure.
    pub fn folder_list(&self, folder: &str, list: &mut CameraList) -> CamResult<()> {
        self.locked(|s| s.listing(Operation::FolderList, folder, list))
    }

    /// List files in `folder`, sorted by name.
    ///
    /// `list` is reset before the driver runs and left empty on failure.
    pub fn file_list(&self, folder: &str, list: &mut CameraList) -> CamResult<()> {
        self.locked(|s| s.listing(Operation::FileList, folder, list))
    }

    /// Delete every file in `folder`.
    pub fn folder_delete_all(&self, folder: &str) -> CamResult<()> {
        self.locked(|s| s.folder_delete_all(folder))
    }

    /// Upload `file` into `folder`.
    pub fn folder_put_file(&self, folder: &str, file: &CameraFile) -> CamResult<()> {
        self.locked(|s| s.folder_put_file(folder, file))
    }

    /// Configuration tree for `folder`.
    pub fn folder_config_get(&self, folder: &str) -> CamResult<CameraWidget> {
        self.locked(|s| s.folder_config_get(folder))
    }

    /// Apply a modified configuration tree to `folder`.
    pub fn folder_config_set(&self, folder: &str, window: &CameraWidget) -> CamResult<()> {
        self.locked(|s| s.folder_config_set(folder, window))
    }

    /// File and preview metadata.
    ///
    /// Drivers without a `file_info_get` slot get size and type synthesized
    /// from `file_get` and `file_get_preview`; fields for fetches that fail
    /// are left unset and the call still succeeds.
    pub fn file_info_get(&self, folder: &str, file: &str) -> CamResult<CameraFileInfo> {
        self.locked(|s| s.file_info_get(folder, file))
    }

    /// Write back the writable parts of a file's metadata.
    pub fn file_info_set(
        &self,
        folder: &str,
        file: &str,
        info: &CameraFileInfo,
    ) -> CamResult<()> {
        self.locked(|s| s.file_info_set(folder, file, info))
    }

    /// Download a file into `into`, which is cleaned first.
    ///
    /// Fails with [`CamError::DirectoryNotFound`] / [`CamError::FileNotFound`]
    /// for empty identifiers.
    pub fn file_get(&self, folder: &str, file: &str, into: &mut CameraFile) -> CamResult<()> {
        self.locked(|s| s.file_get(folder, file, into))
    }

    /// Download a file's preview into `into`, which is cleaned first.
    pub fn file_get_preview(
        &self,
        folder: &str,
        file: &str,
        into: &mut CameraFile,
    ) -> CamResult<()> {
        self.locked(|s| s.file_get_preview(folder, file, into))
    }

    /// Configuration tree for one file.
    pub fn file_config_get(&self, folder: &str, file: &str) -> CamResult<CameraWidget> {
        self.locked(|s| s.file_config_get(folder, file))
    }

    /// Apply a modified configuration tree to one file.
    pub fn file_config_set(
        &self,
        folder: &str,
        file: &str,
        window: &CameraWidget,
    ) -> CamResult<()> {
        self.locked(|s| s.file_config_set(folder, file, window))
    }

    /// Delete one file.
    pub fn file_delete(&self, folder: &str, file: &str) -> CamResult<()> {
        self.locked(|s| s.file_delete(folder, file))
    }

    /// Describe a result code, asking the bound driver about codes in its range.
    #[must_use]
    pub fn result_as_string(&self, code: i32) -> String {
        self.session.inner.lock().result_text(code)
    }
}

/// Describe a result code with or without a session.
#[must_use]
pub fn camera_result_as_string(camera: Option<&Camera>, code: i32) -> String {
    match camera {
        Some(camera) => camera.result_as_string(code),
        None => result_as_string(code).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CameraContext;
    use camkit_core::error::code;

    #[test]
    fn unbound_session_supports_nothing() {
        let camera = Camera::new(&CameraContext::builder().build()).unwrap();
        let mut list = CameraList::new();
        list.append("stale", "");

        let err = camera.file_list("/", &mut list).unwrap_err();
        assert!(matches!(err, CamError::NotSupported(Operation::FileList)));
        // Untouched: the slot check precedes the reset
        assert_eq!(list.count(), 1);

        assert!(camera.summary().unwrap_err().is_not_supported());
        assert!(camera.file_delete("/", "a").unwrap_err().is_not_supported());
    }

    #[test]
    fn unbound_file_info_is_synthesized_empty() {
        let camera = Camera::new(&CameraContext::builder().build()).unwrap();
        assert_eq!(
            camera.file_info_get("/", "a.jpg").unwrap(),
            CameraFileInfo::default()
        );
    }

    #[test]
    fn result_text_without_driver() {
        let camera = Camera::new(&CameraContext::builder().build()).unwrap();
        assert_eq!(camera.result_as_string(code::FILE_NOT_FOUND), "File not found");
        assert_eq!(camera.result_as_string(-1500), NO_DESCRIPTION);
        assert_eq!(
            camera_result_as_string(None, -1500),
            "Unknown camera library error"
        );
        assert_eq!(camera_result_as_string(Some(&camera), 0), "No error");
    }
}
