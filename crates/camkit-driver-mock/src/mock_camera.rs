//! Mock camera driver.
//!
//! [`MockCamera`] simulates a camera with in-memory storage. Every operation
//! slot can be enabled or removed individually, every invocation is recorded
//! in a [`CallLog`], and failures can be injected per operation through an
//! [`ErrorConfig`].
//!
//! Storage, the call log and the error state are shared by every operation
//! table built from the same `MockCamera`, so a session that is re-initialized
//! sees the files it left behind, the same as a real device would.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use camkit_core::{
    CamError, CamResult, CameraFileInfo, CameraFilePath, CameraWidget, DriverContext,
    DriverFactory, FileInfoDetail, InfoFields, Operation, OperationTable, WidgetKind, WidgetValue,
};
use parking_lot::Mutex;
use tracing::debug;

use crate::common::{CallLog, ErrorConfig};

/// Library name the default mock camera registers under.
pub const MOCK_LIBRARY: &str = "mock";

// =============================================================================
// Storage
// =============================================================================

#[derive(Debug, Clone)]
struct MockFile {
    name: String,
    mime_type: String,
    data: Vec<u8>,
    preview: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default)]
struct MockFolder {
    /// Insertion order is kept so listings come back unsorted.
    subfolders: Vec<String>,
    files: Vec<MockFile>,
}

#[derive(Debug)]
struct Storage {
    folders: BTreeMap<String, MockFolder>,
    config: CameraWidget,
    captures: u32,
}

impl Storage {
    fn folder(&self, path: &str) -> CamResult<&MockFolder> {
        self.folders
            .get(path)
            .ok_or_else(|| CamError::DirectoryNotFound(path.to_string()))
    }

    fn folder_mut(&mut self, path: &str) -> CamResult<&mut MockFolder> {
        self.folders
            .get_mut(path)
            .ok_or_else(|| CamError::DirectoryNotFound(path.to_string()))
    }

    fn file(&self, folder: &str, name: &str) -> CamResult<&MockFile> {
        self.folder(folder)?
            .files
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| CamError::FileNotFound(format!("{folder}/{name}")))
    }
}

fn join(folder: &str, name: &str) -> String {
    if folder.ends_with('/') {
        format!("{folder}{name}")
    } else {
        format!("{folder}/{name}")
    }
}

fn default_config() -> CameraWidget {
    CameraWidget::new(WidgetKind::Window, "main", "Mock Camera").with_child(
        CameraWidget::new(WidgetKind::Section, "settings", "Settings")
            .with_child(
                CameraWidget::new(
                    WidgetKind::Menu {
                        choices: vec!["100".into(), "200".into(), "400".into()],
                    },
                    "iso",
                    "ISO Speed",
                )
                .with_value(WidgetValue::Text("100".into())),
            )
            .with_child(
                CameraWidget::new(WidgetKind::Text, "owner", "Owner Name")
                    .with_value(WidgetValue::Text(String::new())),
            ),
    )
}

// =============================================================================
// Shared state
// =============================================================================

struct Shared {
    library: String,
    calls: CallLog,
    errors: ErrorConfig,
    error_texts: HashMap<i32, String>,
    storage: Mutex<Storage>,
}

impl Shared {
    /// Record the call, then apply error injection.
    fn enter(&self, operation: Operation) -> CamResult<()> {
        self.calls.record(operation);
        self.errors
            .check_operation(&self.library, operation)
            .map_err(CamError::from)
    }
}

// =============================================================================
// MockCamera
// =============================================================================

/// Scripted camera driver; see the module docs.
#[derive(Clone)]
pub struct MockCamera {
    operations: BTreeSet<Operation>,
    shared: Arc<Shared>,
}

impl MockCamera {
    /// Start from the defaults of [`MockCameraBuilder`].
    #[must_use]
    pub fn builder() -> MockCameraBuilder {
        MockCameraBuilder::new()
    }

    /// Library name the factory registers under.
    #[must_use]
    pub fn library(&self) -> &str {
        &self.shared.library
    }

    /// Log of every driver invocation made through tables built from this camera.
    #[must_use]
    pub fn calls(&self) -> CallLog {
        self.shared.calls.clone()
    }

    /// Injected failures.
    #[must_use]
    pub fn errors(&self) -> &ErrorConfig {
        &self.shared.errors
    }

    /// Slots the built tables will contain.
    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        self.operations.iter().copied().collect()
    }

    /// File names currently stored in `folder`, in storage order.
    #[must_use]
    pub fn stored_files(&self, folder: &str) -> Vec<String> {
        self.shared
            .storage
            .lock()
            .folders
            .get(folder)
            .map(|f| f.files.iter().map(|file| file.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Current configuration tree.
    #[must_use]
    pub fn stored_config(&self) -> CameraWidget {
        self.shared.storage.lock().config.clone()
    }

    fn has(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }

    /// Build an operation table with the enabled slots.
    #[must_use]
    pub fn table(&self) -> OperationTable {
        let mut table = OperationTable::new();

        if self.has(Operation::Init) {
            let s = Arc::clone(&self.shared);
            table = table.with_init(move |ctx| {
                s.enter(Operation::Init)?;
                debug!(session = ctx.session(), "Mock camera initialized");
                Ok(())
            });
        }
        if self.has(Operation::Exit) {
            let s = Arc::clone(&self.shared);
            table = table.with_exit(move |_ctx| s.enter(Operation::Exit));
        }
        if self.has(Operation::Config) {
            let s = Arc::clone(&self.shared);
            table = table.with_config(move |ctx| {
                s.enter(Operation::Config)?;
                ctx.message("Mock camera has nothing to configure interactively.");
                Ok(())
            });
        }
        if self.has(Operation::ConfigGet) {
            let s = Arc::clone(&self.shared);
            table = table.with_config_get(move |_ctx| {
                s.enter(Operation::ConfigGet)?;
                Ok(s.storage.lock().config.clone())
            });
        }
        if self.has(Operation::ConfigSet) {
            let s = Arc::clone(&self.shared);
            table = table.with_config_set(move |_ctx, window| {
                s.enter(Operation::ConfigSet)?;
                s.storage.lock().config = window.clone();
                Ok(())
            });
        }
        if self.has(Operation::Summary) {
            let s = Arc::clone(&self.shared);
            table = table.with_summary(move |ctx, text| {
                s.enter(Operation::Summary)?;
                text.set(format!(
                    "Mock camera\nModel: {}\nPort: {}\n",
                    ctx.abilities().model,
                    ctx.port().path
                ));
                Ok(())
            });
        }
        if self.has(Operation::Manual) {
            let s = Arc::clone(&self.shared);
            table = table.with_manual(move |_ctx, text| {
                s.enter(Operation::Manual)?;
                text.set("The mock camera stores files in memory.");
                Ok(())
            });
        }
        if self.has(Operation::About) {
            let s = Arc::clone(&self.shared);
            table = table.with_about(move |_ctx, text| {
                s.enter(Operation::About)?;
                text.set(format!("Mock driver '{}'", s.library));
                Ok(())
            });
        }
        if self.has(Operation::Capture) {
            let s = Arc::clone(&self.shared);
            table = table.with_capture(move |_ctx, _setting| {
                s.enter(Operation::Capture)?;
                let mut storage = s.storage.lock();
                storage.captures += 1;
                let name = format!("capt{:04}.jpg", storage.captures);
                storage.folder_mut("/")?.files.push(MockFile {
                    name: name.clone(),
                    mime_type: "image/jpeg".into(),
                    data: b"mock capture".to_vec(),
                    preview: None,
                });
                Ok(CameraFilePath::new("/", name))
            });
        }
        if self.has(Operation::CapturePreview) {
            let s = Arc::clone(&self.shared);
            table = table.with_capture_preview(move |_ctx, file| {
                s.enter(Operation::CapturePreview)?;
                file.set_name("preview.jpg");
                file.set_mime_type("image/jpeg");
                file.set_data(b"mock preview".to_vec());
                Ok(())
            });
        }
        // Listings populate first and fail afterwards, leaving partial output.
        if self.has(Operation::FolderList) {
            let s = Arc::clone(&self.shared);
            table = table.with_folder_list(move |_ctx, folder, list| {
                for name in &s.storage.lock().folder(folder)?.subfolders {
                    list.append(name.as_str(), "");
                }
                s.enter(Operation::FolderList)
            });
        }
        if self.has(Operation::FileList) {
            let s = Arc::clone(&self.shared);
            table = table.with_file_list(move |_ctx, folder, list| {
                for file in &s.storage.lock().folder(folder)?.files {
                    list.append(file.name.as_str(), "");
                }
                s.enter(Operation::FileList)
            });
        }
        if self.has(Operation::FolderDeleteAll) {
            let s = Arc::clone(&self.shared);
            table = table.with_folder_delete_all(move |_ctx, folder| {
                s.enter(Operation::FolderDeleteAll)?;
                s.storage.lock().folder_mut(folder)?.files.clear();
                Ok(())
            });
        }
        if self.has(Operation::FolderPutFile) {
            let s = Arc::clone(&self.shared);
            table = table.with_folder_put_file(move |_ctx, folder, file| {
                s.enter(Operation::FolderPutFile)?;
                let mut storage = s.storage.lock();
                let target = storage.folder_mut(folder)?;
                target.files.retain(|f| f.name != file.name());
                target.files.push(MockFile {
                    name: file.name().to_string(),
                    mime_type: file.mime_type().to_string(),
                    data: file.data().to_vec(),
                    preview: None,
                });
                Ok(())
            });
        }
        if self.has(Operation::FolderConfigGet) {
            let s = Arc::clone(&self.shared);
            table = table.with_folder_config_get(move |_ctx, folder| {
                s.enter(Operation::FolderConfigGet)?;
                s.storage.lock().folder(folder)?;
                Ok(CameraWidget::new(WidgetKind::Window, "folder", folder))
            });
        }
        if self.has(Operation::FolderConfigSet) {
            let s = Arc::clone(&self.shared);
            table = table.with_folder_config_set(move |_ctx, folder, _window| {
                s.enter(Operation::FolderConfigSet)?;
                s.storage.lock().folder(folder).map(|_| ())
            });
        }
        if self.has(Operation::FileInfoGet) {
            let s = Arc::clone(&self.shared);
            table = table.with_file_info_get(move |_ctx, folder, name| {
                s.enter(Operation::FileInfoGet)?;
                let storage = s.storage.lock();
                let file = storage.file(folder, name)?;
                let mut info = CameraFileInfo {
                    file: FileInfoDetail {
                        fields: InfoFields::TYPE | InfoFields::NAME | InfoFields::SIZE,
                        size: file.data.len() as u64,
                        mime_type: file.mime_type.clone(),
                        name: file.name.clone(),
                        ..FileInfoDetail::default()
                    },
                    ..CameraFileInfo::default()
                };
                if let Some(preview) = &file.preview {
                    info.preview.fields = InfoFields::TYPE | InfoFields::SIZE;
                    info.preview.size = preview.len() as u64;
                    info.preview.mime_type = "image/jpeg".into();
                }
                Ok(info)
            });
        }
        if self.has(Operation::FileInfoSet) {
            let s = Arc::clone(&self.shared);
            table = table.with_file_info_set(move |_ctx, folder, name, info| {
                s.enter(Operation::FileInfoSet)?;
                let mut storage = s.storage.lock();
                let target = storage
                    .folder_mut(folder)?
                    .files
                    .iter_mut()
                    .find(|f| f.name == name)
                    .ok_or_else(|| CamError::FileNotFound(join(folder, name)))?;
                if info.file.has(InfoFields::NAME) {
                    target.name = info.file.name.clone();
                }
                Ok(())
            });
        }
        if self.has(Operation::FileGet) {
            let s = Arc::clone(&self.shared);
            table = table.with_file_get(move |_ctx, folder, name, out| {
                s.enter(Operation::FileGet)?;
                let storage = s.storage.lock();
                let file = storage.file(folder, name)?;
                out.set_name(file.name.as_str());
                out.set_mime_type(file.mime_type.as_str());
                out.append(&file.data)
            });
        }
        if self.has(Operation::FileGetPreview) {
            let s = Arc::clone(&self.shared);
            table = table.with_file_get_preview(move |_ctx, folder, name, out| {
                s.enter(Operation::FileGetPreview)?;
                let storage = s.storage.lock();
                let preview = storage
                    .file(folder, name)?
                    .preview
                    .as_ref()
                    .ok_or_else(|| {
                        CamError::FileNotFound(format!("{} (preview)", join(folder, name)))
                    })?;
                out.set_name(name);
                out.set_mime_type("image/jpeg");
                out.append(preview)
            });
        }
        if self.has(Operation::FileConfigGet) {
            let s = Arc::clone(&self.shared);
            table = table.with_file_config_get(move |_ctx, folder, name| {
                s.enter(Operation::FileConfigGet)?;
                let storage = s.storage.lock();
                let file = storage.file(folder, name)?;
                Ok(CameraWidget::new(WidgetKind::Window, "file", file.name.as_str()))
            });
        }
        if self.has(Operation::FileConfigSet) {
            let s = Arc::clone(&self.shared);
            table = table.with_file_config_set(move |_ctx, folder, name, _window| {
                s.enter(Operation::FileConfigSet)?;
                s.storage.lock().file(folder, name).map(|_| ())
            });
        }
        if self.has(Operation::FileDelete) {
            let s = Arc::clone(&self.shared);
            table = table.with_file_delete(move |_ctx, folder, name| {
                s.enter(Operation::FileDelete)?;
                let mut storage = s.storage.lock();
                let files = &mut storage.folder_mut(folder)?.files;
                let before = files.len();
                files.retain(|f| f.name != name);
                if files.len() == before {
                    return Err(CamError::FileNotFound(join(folder, name)));
                }
                Ok(())
            });
        }
        if self.has(Operation::ResultAsString) {
            let s = Arc::clone(&self.shared);
            table = table.with_result_as_string(move |_ctx: &DriverContext, code| {
                s.calls.record(Operation::ResultAsString);
                s.error_texts
                    .get(&code)
                    .cloned()
                    .unwrap_or_else(|| format!("Mock driver error {code}"))
            });
        }

        table
    }
}

impl std::fmt::Debug for MockCamera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCamera")
            .field("library", &self.shared.library)
            .field("operations", &self.operations)
            .finish()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`MockCamera`].
///
/// Starts with every operation enabled, library [`MOCK_LIBRARY`], and an
/// empty root folder `/`.
pub struct MockCameraBuilder {
    library: String,
    operations: BTreeSet<Operation>,
    errors: ErrorConfig,
    error_texts: HashMap<i32, String>,
    folders: BTreeMap<String, MockFolder>,
}

impl MockCameraBuilder {
    /// Builder with every slot enabled.
    #[must_use]
    pub fn new() -> Self {
        let mut folders = BTreeMap::new();
        folders.insert("/".to_string(), MockFolder::default());
        Self {
            library: MOCK_LIBRARY.to_string(),
            operations: Operation::ALL.into_iter().collect(),
            errors: ErrorConfig::none(),
            error_texts: HashMap::new(),
            folders,
        }
    }

    /// Register under `library` instead of [`MOCK_LIBRARY`].
    #[must_use]
    pub fn library(mut self, library: impl Into<String>) -> Self {
        self.library = library.into();
        self
    }

    /// Enable exactly these slots.
    #[must_use]
    pub fn only(mut self, operations: &[Operation]) -> Self {
        self.operations = operations.iter().copied().collect();
        self
    }

    /// Remove one slot.
    #[must_use]
    pub fn without(mut self, operation: Operation) -> Self {
        self.operations.remove(&operation);
        self
    }

    /// Add a subfolder `name` under `parent`, creating both as needed.
    #[must_use]
    pub fn with_folder(mut self, parent: &str, name: &str) -> Self {
        let path = join(parent, name);
        self.folders
            .entry(parent.to_string())
            .or_default()
            .subfolders
            .push(name.to_string());
        self.folders.entry(path).or_default();
        self
    }

    /// Store a file in `folder`, creating the folder as needed.
    #[must_use]
    pub fn with_file(
        mut self,
        folder: &str,
        name: &str,
        mime_type: &str,
        data: &[u8],
    ) -> Self {
        self.folders.entry(folder.to_string()).or_default().files.push(MockFile {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            data: data.to_vec(),
            preview: None,
        });
        self
    }

    /// Attach a preview to a file added earlier with [`with_file`](Self::with_file).
    #[must_use]
    pub fn with_preview(mut self, folder: &str, name: &str, data: &[u8]) -> Self {
        if let Some(file) = self
            .folders
            .get_mut(folder)
            .and_then(|f| f.files.iter_mut().find(|file| file.name == name))
        {
            file.preview = Some(data.to_vec());
        }
        self
    }

    /// Inject failures.
    #[must_use]
    pub fn with_errors(mut self, errors: ErrorConfig) -> Self {
        self.errors = errors;
        self
    }

    /// Text the driver's `result_as_string` slot returns for `code`.
    #[must_use]
    pub fn with_error_text(mut self, code: i32, text: impl Into<String>) -> Self {
        self.error_texts.insert(code, text.into());
        self
    }

    /// Finish the camera.
    #[must_use]
    pub fn build(self) -> MockCamera {
        MockCamera {
            operations: self.operations,
            shared: Arc::new(Shared {
                library: self.library,
                calls: CallLog::new(),
                errors: self.errors,
                error_texts: self.error_texts,
                storage: Mutex::new(Storage {
                    folders: self.folders,
                    config: default_config(),
                    captures: 0,
                }),
            }),
        }
    }
}

impl Default for MockCameraBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// MockCameraFactory - DriverFactory implementation
// =============================================================================

/// Factory handing out tables for one [`MockCamera`].
#[derive(Debug, Clone)]
pub struct MockCameraFactory {
    camera: MockCamera,
}

impl MockCameraFactory {
    /// Factory for `camera`.
    #[must_use]
    pub fn new(camera: MockCamera) -> Self {
        Self { camera }
    }

    /// Camera whose tables this factory builds.
    #[must_use]
    pub fn camera(&self) -> &MockCamera {
        &self.camera
    }
}

impl Default for MockCameraFactory {
    fn default() -> Self {
        Self::new(MockCamera::builder().build())
    }
}

impl DriverFactory for MockCameraFactory {
    fn library(&self) -> &str {
        self.camera.library()
    }

    fn name(&self) -> &str {
        "Mock Camera"
    }

    fn build(&self) -> CamResult<OperationTable> {
        Ok(self.camera.table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::MOCK_INJECTED_FAILURE;
    use camkit_core::{CameraFile, CameraList};

    fn ctx() -> DriverContext {
        DriverContext::new(0)
    }

    #[test]
    fn default_camera_has_every_slot() {
        let camera = MockCamera::builder().build();
        assert_eq!(camera.table().supported(), Operation::ALL.to_vec());
    }

    #[test]
    fn only_and_without_restrict_slots() {
        let camera = MockCamera::builder()
            .only(&[Operation::Init, Operation::FileGet, Operation::Exit])
            .without(Operation::Exit)
            .build();
        assert_eq!(
            camera.table().supported(),
            vec![Operation::Init, Operation::FileGet]
        );
    }

    #[test]
    fn file_list_returns_storage_order() {
        let camera = MockCamera::builder()
            .with_file("/", "b", "image/jpeg", b"")
            .with_file("/", "a", "image/jpeg", b"")
            .with_file("/", "c", "image/jpeg", b"")
            .build();
        let mut table = camera.table();
        let mut list = CameraList::new();
        (table.file_list.as_mut().unwrap())(&mut ctx(), "/", &mut list).unwrap();
        assert_eq!(list.names(), vec!["b", "a", "c"]);
        assert_eq!(camera.calls().count(Operation::FileList), 1);
    }

    #[test]
    fn injected_failure_after_partial_listing() {
        let camera = MockCamera::builder()
            .with_file("/", "x", "image/jpeg", b"")
            .with_errors(ErrorConfig::failing(Operation::FileList, MOCK_INJECTED_FAILURE))
            .build();
        let mut table = camera.table();
        let mut list = CameraList::new();
        let err = (table.file_list.as_mut().unwrap())(&mut ctx(), "/", &mut list).unwrap_err();
        assert_eq!(err.code(), MOCK_INJECTED_FAILURE);
        assert_eq!(list.count(), 1);
    }

    #[test]
    fn put_get_delete_roundtrip_through_storage() {
        let camera = MockCamera::builder().with_folder("/", "DCIM").build();
        let mut table = camera.table();
        let mut c = ctx();

        let upload = CameraFile::with_data("a.png", "image/png", vec![9; 4]);
        (table.folder_put_file.as_mut().unwrap())(&mut c, "/DCIM", &upload).unwrap();
        assert_eq!(camera.stored_files("/DCIM"), vec!["a.png"]);

        let mut out = CameraFile::new();
        (table.file_get.as_mut().unwrap())(&mut c, "/DCIM", "a.png", &mut out).unwrap();
        assert_eq!(out.data(), &[9; 4]);
        assert_eq!(out.mime_type(), "image/png");

        (table.file_delete.as_mut().unwrap())(&mut c, "/DCIM", "a.png").unwrap();
        let err = (table.file_delete.as_mut().unwrap())(&mut c, "/DCIM", "a.png").unwrap_err();
        assert!(matches!(err, CamError::FileNotFound(_)));
    }

    #[test]
    fn capture_stores_new_file() {
        let camera = MockCamera::builder().build();
        let mut table = camera.table();
        let setting = camkit_core::CaptureSetting::image();
        let path = (table.capture.as_mut().unwrap())(&mut ctx(), &setting).unwrap();
        assert_eq!(path, CameraFilePath::new("/", "capt0001.jpg"));
        assert_eq!(camera.stored_files("/"), vec!["capt0001.jpg"]);
    }

    #[test]
    fn factory_builds_tables_sharing_state() {
        let factory = MockCameraFactory::new(MockCamera::builder().library("mock-a").build());
        assert_eq!(factory.library(), "mock-a");

        let mut first = factory.build().unwrap();
        let mut second = factory.build().unwrap();
        (first.init.as_mut().unwrap())(&mut ctx()).unwrap();
        (second.init.as_mut().unwrap())(&mut ctx()).unwrap();
        assert_eq!(factory.camera().calls().count(Operation::Init), 2);
    }
}
