//! File-info synthesis.
//!
//! When a driver has no `file_info_get` slot, the session derives size and
//! MIME type by fetching the file and its preview into scratch containers.
//! Only fields for fetches that succeeded are marked valid; a failed fetch is
//! not an error.

use camkit_core::{CamResult, CameraFile, CameraFileInfo, FileInfoDetail, InfoFields};
use tracing::debug;

/// Source of file and preview contents used by [`synthesize_file_info`].
pub trait FileSource {
    /// Fetch the full file into `into`.
    fn fetch_file(&mut self, folder: &str, file: &str, into: &mut CameraFile) -> CamResult<()>;

    /// Fetch the file's preview into `into`.
    fn fetch_preview(
        &mut self,
        folder: &str,
        file: &str,
        into: &mut CameraFile,
    ) -> CamResult<()>;
}

fn fill(detail: &mut FileInfoDetail, scratch: &CameraFile) {
    detail.fields |= InfoFields::SIZE | InfoFields::TYPE;
    detail.size = scratch.size();
    detail.mime_type = scratch.mime_type().to_string();
}

/// Build file info from full and preview fetches.
pub fn synthesize_file_info<S: FileSource + ?Sized>(
    source: &mut S,
    folder: &str,
    file: &str,
) -> CameraFileInfo {
    let mut info = CameraFileInfo::default();

    let mut scratch = CameraFile::new();
    match source.fetch_file(folder, file, &mut scratch) {
        Ok(()) => fill(&mut info.file, &scratch),
        Err(err) => debug!(folder, file, error = %err, "No file data for info synthesis"),
    }

    let mut scratch = CameraFile::new();
    match source.fetch_preview(folder, file, &mut scratch) {
        Ok(()) => fill(&mut info.preview, &scratch),
        Err(err) => debug!(folder, file, error = %err, "No preview data for info synthesis"),
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use camkit_core::{CamError, Operation};

    struct Source {
        file: Option<CameraFile>,
        preview: Option<CameraFile>,
    }

    impl FileSource for Source {
        fn fetch_file(&mut self, _: &str, _: &str, into: &mut CameraFile) -> CamResult<()> {
            match &self.file {
                Some(f) => {
                    *into = f.clone();
                    Ok(())
                }
                None => Err(CamError::NotSupported(Operation::FileGet)),
            }
        }

        fn fetch_preview(&mut self, _: &str, _: &str, into: &mut CameraFile) -> CamResult<()> {
            match &self.preview {
                Some(f) => {
                    *into = f.clone();
                    Ok(())
                }
                None => Err(CamError::NotSupported(Operation::FileGetPreview)),
            }
        }
    }

    #[test]
    fn both_fetches_succeed() {
        let mut source = Source {
            file: Some(CameraFile::with_data("x.jpg", "image/jpeg", vec![0; 2048])),
            preview: Some(CameraFile::with_data("x.jpg", "image/jpeg", vec![0; 64])),
        };
        let info = synthesize_file_info(&mut source, "/", "x.jpg");
        assert_eq!(info.file.size(), Some(2048));
        assert_eq!(info.file.mime_type(), Some("image/jpeg"));
        assert_eq!(info.preview.size(), Some(64));
        assert!(!info.file.has(InfoFields::NAME));
    }

    #[test]
    fn preview_failure_leaves_preview_fields_empty() {
        let mut source = Source {
            file: Some(CameraFile::with_data("x.jpg", "image/jpeg", vec![0; 2048])),
            preview: None,
        };
        let info = synthesize_file_info(&mut source, "/", "x.jpg");
        assert_eq!(info.file.fields, InfoFields::SIZE | InfoFields::TYPE);
        assert!(info.preview.fields.is_empty());
        assert_eq!(info.preview.size(), None);
    }

    #[test]
    fn nothing_available_is_still_ok() {
        let mut source = Source {
            file: None,
            preview: None,
        };
        assert_eq!(
            synthesize_file_info(&mut source, "/", "x.jpg"),
            CameraFileInfo::default()
        );
    }
}
