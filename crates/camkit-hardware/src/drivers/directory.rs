//! Directory Browse driver.
//!
//! Presents a local directory tree as if it were camera storage. Folders
//! are paths relative to a root (`/` is the root itself). The root is the
//! session's port path when one is configured, otherwise the filesystem
//! root.
//!
//! The driver has no `file_info_get` slot, so file metadata is synthesized
//! by the session from `file_get`. MIME types come from file extensions.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use camkit_core::{
    CamError, CamResult, CameraFile, CameraList, CameraText, DriverContext, DriverFactory,
    OperationTable,
};
use tracing::debug;

/// Library name the directory driver registers under.
pub const DIRECTORY_LIBRARY: &str = "directory";

/// Per-session state: the directory standing in for camera storage.
#[derive(Debug)]
struct DirectoryState {
    root: PathBuf,
}

/// Factory for the directory driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryDriverFactory;

impl DriverFactory for DirectoryDriverFactory {
    fn library(&self) -> &str {
        DIRECTORY_LIBRARY
    }

    fn name(&self) -> &str {
        "Directory Browse"
    }

    fn build(&self) -> CamResult<OperationTable> {
        Ok(OperationTable::new()
            .with_init(init)
            .with_exit(|ctx| {
                ctx.clear_driver_data();
                Ok(())
            })
            .with_summary(|ctx, text| {
                let root = root(ctx)?;
                text.set(format!(
                    "Directory Browse Mode\nRoot: {}\n",
                    root.display()
                ));
                Ok(())
            })
            .with_manual(|_ctx, text| {
                text.set(
                    "The Directory Browse model shows the contents of a local \
                     directory as camera storage. Set the port path to choose \
                     the directory; without one, the filesystem root is used.",
                );
                Ok(())
            })
            .with_about(|_ctx, text: &mut CameraText| {
                text.set("Directory Browse driver for camkit.");
                Ok(())
            })
            .with_folder_list(|ctx, folder, list| {
                let dir = resolve(ctx, folder)?;
                list_entries(&dir, folder, list, true)
            })
            .with_file_list(|ctx, folder, list| {
                let dir = resolve(ctx, folder)?;
                list_entries(&dir, folder, list, false)
            })
            .with_file_get(|ctx, folder, name, file| {
                let path = resolve(ctx, folder)?.join(checked_name(name)?);
                let data = std::fs::read(&path).map_err(|e| not_found_as_file(e, &path))?;
                file.set_name(name);
                file.set_mime_type(mime_type_for(&path));
                file.set_data(data);
                Ok(())
            })
            .with_folder_put_file(|ctx, folder, file: &CameraFile| {
                let dir = resolve(ctx, folder)?;
                if !dir.is_dir() {
                    return Err(CamError::DirectoryNotFound(folder.to_string()));
                }
                let path = dir.join(checked_name(file.name())?);
                debug!(path = %path.display(), bytes = file.size(), "Writing file");
                std::fs::write(&path, file.data())?;
                Ok(())
            })
            .with_file_delete(|ctx, folder, name| {
                let path = resolve(ctx, folder)?.join(checked_name(name)?);
                std::fs::remove_file(&path).map_err(|e| not_found_as_file(e, &path))
            }))
    }
}

fn init(ctx: &mut DriverContext) -> CamResult<()> {
    let port = ctx.port().path.trim();
    let root = if port.is_empty() {
        PathBuf::from("/")
    } else {
        PathBuf::from(port)
    };
    if !root.is_dir() {
        return Err(CamError::DirectoryNotFound(root.display().to_string()));
    }
    debug!(root = %root.display(), "Directory browse ready");
    ctx.set_driver_data(DirectoryState { root });
    Ok(())
}

fn root(ctx: &mut DriverContext) -> CamResult<&Path> {
    Ok(ctx.require_driver_data::<DirectoryState>()?.root.as_path())
}

/// Map a camera folder onto the filesystem, refusing to leave the root.
fn resolve(ctx: &mut DriverContext, folder: &str) -> CamResult<PathBuf> {
    let mut path = root(ctx)?.to_path_buf();
    for component in Path::new(folder).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) => {
                return Err(CamError::invalid_argument(format!(
                    "folder '{folder}' escapes the browse root"
                )))
            }
        }
    }
    Ok(path)
}

fn checked_name(name: &str) -> CamResult<&str> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(CamError::invalid_argument(format!("invalid file name '{name}'")));
    }
    Ok(name)
}

fn not_found_as_file(err: std::io::Error, path: &Path) -> CamError {
    if err.kind() == ErrorKind::NotFound {
        CamError::FileNotFound(path.display().to_string())
    } else {
        CamError::Io(err)
    }
}

fn list_entries(dir: &Path, folder: &str, list: &mut CameraList, folders: bool) -> CamResult<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            CamError::DirectoryNotFound(folder.to_string())
        } else {
            CamError::Io(e)
        }
    })?;

    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let is_dir = entry.path().is_dir();
        if is_dir == folders {
            list.append(name, "");
        }
    }
    Ok(())
}

/// MIME type guessed from a file extension.
#[must_use]
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("tif" | "tiff") => "image/tiff",
        Some("pgm") => "image/x-portable-graymap",
        Some("ppm") => "image/x-portable-pixmap",
        Some("crw") => "image/x-canon-crw",
        Some("cr2") => "image/x-canon-cr2",
        Some("nef") => "image/x-nikon-nef",
        Some("raw") => "image/x-raw",
        Some("avi") => "video/x-msvideo",
        Some("mov") => "video/quicktime",
        Some("mp4") => "video/mp4",
        Some("mpg" | "mpeg") => "video/mpeg",
        Some("wav") => "audio/wav",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_types_from_extension() {
        assert_eq!(mime_type_for(Path::new("IMG_0001.JPG")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("a/b/clip.MOV")), "video/quicktime");
        assert_eq!(mime_type_for(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn names_with_separators_are_rejected() {
        assert!(checked_name("a.jpg").is_ok());
        assert!(checked_name("../a.jpg").is_err());
        assert!(checked_name("").is_err());
        assert!(checked_name("..").is_err());
    }

    #[test]
    fn factory_slots() {
        use camkit_core::Operation;
        let table = DirectoryDriverFactory.build().unwrap();
        assert!(table.supports(Operation::FileGet));
        assert!(table.supports(Operation::FolderPutFile));
        assert!(!table.supports(Operation::FileInfoGet));
        assert!(!table.supports(Operation::Capture));
    }
}
