//! Integration tests for the mock driver
//!
//! These drive operation tables the same way a session does: build from the
//! factory, pass a driver context through every slot, and inspect the shared
//! call log and storage afterwards.

use std::collections::HashMap;

use camkit_core::{
    CamError, CameraFile, CameraFileInfo, CameraList, CameraText, DriverContext, DriverFactory,
    FactoryRegistry, InfoFields, Operation, WidgetValue,
};
use camkit_driver_mock::*;
use parking_lot::Mutex;

#[derive(Default)]
struct MapRegistry {
    factories: Mutex<HashMap<String, Box<dyn DriverFactory>>>,
}

impl FactoryRegistry for MapRegistry {
    fn register_factory(
        &self,
        factory: Box<dyn DriverFactory>,
    ) -> Option<Box<dyn DriverFactory>> {
        self.factories
            .lock()
            .insert(factory.library().to_string(), factory)
    }
}

fn ctx() -> DriverContext {
    DriverContext::new(1)
}

#[test]
fn test_register_all_adds_default_mock() {
    let registry = MapRegistry::default();
    register_all(&registry);

    let factories = registry.factories.lock();
    let factory = factories.get(MOCK_LIBRARY).unwrap();
    assert_eq!(factory.name(), "Mock Camera");
    assert_eq!(factory.build().unwrap().supported().len(), Operation::ALL.len());
}

#[test]
fn test_register_twice_replaces() {
    let registry = MapRegistry::default();
    assert!(registry
        .register_factory(Box::new(MockCameraFactory::default()))
        .is_none());
    assert!(registry
        .register_factory(Box::new(MockCameraFactory::default()))
        .is_some());
}

#[test]
fn test_text_slots() {
    let camera = MockCamera::builder().library("mock-text").build();
    let mut table = camera.table();
    let mut c = ctx();
    let mut text = CameraText::new();

    (table.about.as_mut().unwrap())(&mut c, &mut text).unwrap();
    assert_eq!(text.as_str(), "Mock driver 'mock-text'");

    (table.manual.as_mut().unwrap())(&mut c, &mut text).unwrap();
    assert!(text.as_str().contains("in memory"));

    assert_eq!(
        camera.calls().operations(),
        vec![Operation::About, Operation::Manual]
    );
}

#[test]
fn test_interactive_config_queues_a_message() {
    let camera = MockCamera::builder().build();
    let mut table = camera.table();
    let mut c = ctx();

    (table.config.as_mut().unwrap())(&mut c).unwrap();

    assert_eq!(
        c.take_messages(),
        vec!["Mock camera has nothing to configure interactively.".to_string()]
    );
    assert_eq!(camera.calls().count(Operation::Config), 1);
}

#[test]
fn test_config_set_is_persisted() {
    let camera = MockCamera::builder().build();
    let mut table = camera.table();
    let mut c = ctx();

    let mut window = (table.config_get.as_mut().unwrap())(&mut c).unwrap();
    window
        .find_mut("iso")
        .unwrap()
        .set_value(WidgetValue::Text("400".into()));
    (table.config_set.as_mut().unwrap())(&mut c, &window).unwrap();

    let stored = camera.stored_config();
    assert_eq!(
        stored.find("iso").unwrap().value(),
        &WidgetValue::Text("400".into())
    );
}

#[test]
fn test_folder_tree() {
    let camera = MockCamera::builder()
        .with_folder("/", "store_2")
        .with_folder("/", "store_1")
        .with_folder("/store_1", "DCIM")
        .build();
    let mut table = camera.table();
    let mut c = ctx();

    let mut list = CameraList::new();
    (table.folder_list.as_mut().unwrap())(&mut c, "/", &mut list).unwrap();
    assert_eq!(list.names(), vec!["store_2", "store_1"]);

    list.reset();
    (table.folder_list.as_mut().unwrap())(&mut c, "/store_1", &mut list).unwrap();
    assert_eq!(list.names(), vec!["DCIM"]);

    list.reset();
    let err = (table.folder_list.as_mut().unwrap())(&mut c, "/missing", &mut list).unwrap_err();
    assert!(matches!(err, CamError::DirectoryNotFound(_)));
}

#[test]
fn test_file_info_and_rename() {
    let camera = MockCamera::builder()
        .with_file("/", "a.jpg", "image/jpeg", &[0; 10])
        .with_preview("/", "a.jpg", &[1; 3])
        .build();
    let mut table = camera.table();
    let mut c = ctx();

    let info = (table.file_info_get.as_mut().unwrap())(&mut c, "/", "a.jpg").unwrap();
    assert_eq!(info.file.size(), Some(10));
    assert_eq!(info.file.mime_type(), Some("image/jpeg"));
    assert_eq!(info.preview.size(), Some(3));

    let mut rename = CameraFileInfo::default();
    rename.file.fields = InfoFields::NAME;
    rename.file.name = "b.jpg".into();
    (table.file_info_set.as_mut().unwrap())(&mut c, "/", "a.jpg", &rename).unwrap();
    assert_eq!(camera.stored_files("/"), vec!["b.jpg"]);

    let mut preview = CameraFile::new();
    (table.file_get_preview.as_mut().unwrap())(&mut c, "/", "b.jpg", &mut preview).unwrap();
    assert_eq!(preview.data(), &[1; 3]);
}

#[test]
fn test_folder_delete_all() {
    let camera = MockCamera::builder()
        .with_file("/", "a", "text/plain", b"a")
        .with_file("/", "b", "text/plain", b"b")
        .build();
    let mut table = camera.table();
    (table.folder_delete_all.as_mut().unwrap())(&mut ctx(), "/").unwrap();
    assert!(camera.stored_files("/").is_empty());
}

#[test]
fn test_fail_after_n_captures() {
    let camera = MockCamera::builder()
        .with_errors(ErrorConfig::scenario(ErrorScenario::FailAfterN {
            operation: Operation::Capture,
            count: 1,
        }))
        .build();
    let mut table = camera.table();
    let mut c = ctx();
    let setting = camkit_core::CaptureSetting::image();

    assert!((table.capture.as_mut().unwrap())(&mut c, &setting).is_ok());
    let err = (table.capture.as_mut().unwrap())(&mut c, &setting).unwrap_err();
    assert_eq!(err.code(), MOCK_INJECTED_FAILURE);
    assert_eq!(camera.calls().count(Operation::Capture), 2);
    assert_eq!(camera.stored_files("/"), vec!["capt0001.jpg"]);
}

#[test]
fn test_communication_loss_affects_every_slot() {
    let camera = MockCamera::builder()
        .with_errors(ErrorConfig::scenario(ErrorScenario::CommunicationLoss))
        .build();
    let mut table = camera.table();
    let mut c = ctx();

    let err = (table.init.as_mut().unwrap())(&mut c).unwrap_err();
    assert_eq!(err.code(), MOCK_COMMUNICATION_LOST);
    let err = (table.exit.as_mut().unwrap())(&mut c).unwrap_err();
    assert_eq!(err.code(), MOCK_COMMUNICATION_LOST);

    camera.errors().reset();
    // The scenario is still configured, so the next call loses it again.
    assert!((table.init.as_mut().unwrap())(&mut c).is_err());
}

#[test]
fn test_error_text_table() {
    let camera = MockCamera::builder()
        .with_error_text(-1042, "Lens cap on")
        .build();
    let table = camera.table();
    let translate = table.result_as_string.as_ref().unwrap();
    let c = ctx();

    assert_eq!(translate(&c, -1042), "Lens cap on");
    assert_eq!(translate(&c, -1043), "Mock driver error -1043");
    assert_eq!(camera.calls().count(Operation::ResultAsString), 2);
}
