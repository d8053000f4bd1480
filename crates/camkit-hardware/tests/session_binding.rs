//! Binding sessions to drivers: stage ordering and per-stage failures.

mod common;

use std::sync::atomic::Ordering;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use camkit_core::{CamError, CamResult, Operation, PortConfig, PortKind};
use camkit_driver_mock::{ErrorConfig, MockCamera, MOCK_INJECTED_FAILURE};
use camkit_hardware::{BindStage, BindState, Camera, CameraContext, DriverRegistry};
use common::*;
use tracing_test::traced_test;

fn failed_stage(camera: &Camera) -> Option<BindStage> {
    match camera.state() {
        BindState::Failed { stage, .. } => Some(stage),
        _ => None,
    }
}

#[test]
fn test_bind_runs_init_once() {
    let mock = MockCamera::builder().build();
    let camera = bound(&mock);

    assert_eq!(camera.state(), BindState::Initialized);
    assert!(camera.is_initialized());
    assert_eq!(mock.calls().count(Operation::Init), 1);
    assert_eq!(camera.port().kind, PortKind::Serial);
    assert_eq!(camera.abilities().model, MOCK_MODEL);
}

#[test]
fn test_pre_resolved_usb_port_skips_enumeration() {
    let mock = MockCamera::builder()
        .only(&[Operation::Init, Operation::FileList])
        .build();
    let (resolver, lookups) = CountingResolver::new(ports());
    let context = CameraContext::builder()
        .abilities(abilities())
        .port_resolver(resolver)
        .loader(registry_with(&mock))
        .build();

    let camera = Camera::new(&context).unwrap();
    camera.set_model(MOCK_MODEL).unwrap();
    camera.set_port(PortConfig::new(PortKind::Usb, USB_PATH)).unwrap();
    camera.init().unwrap();

    assert_eq!(lookups.load(Ordering::SeqCst), 0);
    assert_eq!(mock.calls().count(Operation::Init), 1);
    assert_eq!(
        camera.supported_operations(),
        vec![Operation::Init, Operation::FileList]
    );
}

#[test]
fn test_port_name_resolves_to_path() {
    let mock = MockCamera::builder().build();
    let camera = Camera::new(&context_with(&mock)).unwrap();
    camera.set_model(MOCK_MODEL).unwrap();
    camera.set_port_name("Universal Serial Bus").unwrap();
    camera.init().unwrap();

    let port = camera.port();
    assert_eq!(port.path, USB_PATH);
    assert_eq!(port.kind, PortKind::Usb);
}

#[test]
fn test_unknown_port_name_fails_port_stage() {
    let mock = MockCamera::builder().build();
    let camera = Camera::new(&context_with(&mock)).unwrap();
    camera.set_model(MOCK_MODEL).unwrap();
    camera.set_port_name("Bluetooth").unwrap();

    let err = camera.init().unwrap_err();
    assert!(matches!(err, CamError::InvalidArgument(_)));
    assert_eq!(failed_stage(&camera), Some(BindStage::Port));
    assert!(!camera.is_bound());
    assert_eq!(mock.calls().total(), 0);
}

#[test]
fn test_missing_port_tells_frontend() {
    let mock = MockCamera::builder().build();
    let messages = Arc::new(Messages::default());
    let context = CameraContext::builder()
        .abilities(abilities())
        .port_resolver(ports())
        .loader(registry_with(&mock))
        .frontend(messages.clone())
        .build();
    let camera = Camera::new(&context).unwrap();
    camera.set_model(MOCK_MODEL).unwrap();

    let err = camera.init().unwrap_err();
    assert!(matches!(err, CamError::InvalidArgument(_)));
    assert_eq!(failed_stage(&camera), Some(BindStage::Port));
    assert_eq!(
        messages.all(),
        vec!["Auto-probe for port has not yet been implemented! Please specify a port!"]
    );
}

/// Run `op` on another thread, failing the test if it does not return.
fn within_deadline<T: Send + 'static>(op: impl FnOnce() -> T + Send + 'static) -> T {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(op());
    });
    rx.recv_timeout(Duration::from_secs(5))
        .expect("session stayed locked while the frontend was notified")
}

#[test]
fn test_frontend_can_query_session_during_bind_message() {
    let mock = MockCamera::builder().build();
    let watcher = Arc::new(SessionWatcher::default());
    let context = CameraContext::builder()
        .abilities(abilities())
        .port_resolver(ports())
        .loader(registry_with(&mock))
        .frontend(watcher.clone())
        .build();
    let camera = Camera::new(&context).unwrap();
    camera.set_model(MOCK_MODEL).unwrap();
    watcher.watch(&camera);

    let worker = camera.clone();
    let result: CamResult<()> = within_deadline(move || worker.init());

    assert!(matches!(result, Err(CamError::InvalidArgument(_))));
    let seen = watcher.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0].0,
        "Auto-probe for port has not yet been implemented! Please specify a port!"
    );
    assert!(matches!(
        seen[0].1,
        BindState::Failed {
            stage: BindStage::Port,
            ..
        }
    ));
    watcher.release();
}

#[test]
fn test_frontend_can_query_session_during_driver_message() {
    let mock = MockCamera::builder().build();
    let watcher = Arc::new(SessionWatcher::default());
    let context = CameraContext::builder()
        .abilities(abilities())
        .port_resolver(ports())
        .loader(registry_with(&mock))
        .frontend(watcher.clone())
        .build();
    let camera = configured(&context);
    camera.init().unwrap();
    assert!(watcher.seen().is_empty());
    watcher.watch(&camera);

    let worker = camera.clone();
    within_deadline(move || worker.config()).unwrap();

    assert_eq!(
        watcher.seen(),
        vec![(
            "Mock camera has nothing to configure interactively.".to_string(),
            BindState::Initialized
        )]
    );
    assert_eq!(mock.calls().count(Operation::Config), 1);
    watcher.release();
}

#[test]
fn test_unlisted_path_fails_port_stage() {
    let mock = MockCamera::builder().build();
    let camera = Camera::new(&context_with(&mock)).unwrap();
    camera.set_model(MOCK_MODEL).unwrap();
    camera.set_port_path("/dev/ttyACM3").unwrap();

    assert!(matches!(camera.init(), Err(CamError::InvalidArgument(_))));
    assert_eq!(failed_stage(&camera), Some(BindStage::Port));
}

#[test]
fn test_empty_model_fails_model_stage() {
    let mock = MockCamera::builder().build();
    let messages = Arc::new(Messages::default());
    let context = CameraContext::builder()
        .abilities(abilities())
        .port_resolver(ports())
        .loader(registry_with(&mock))
        .frontend(messages.clone())
        .build();
    let camera = Camera::new(&context).unwrap();
    camera.set_port_path(SERIAL_PATH).unwrap();

    assert!(matches!(camera.init(), Err(CamError::InvalidArgument(_))));
    assert_eq!(failed_stage(&camera), Some(BindStage::Model));
    assert_eq!(
        messages.all(),
        vec!["Auto-probe for model has not yet been implemented! Please specify a model!"]
    );
}

#[test]
fn test_unknown_model_fails_with_model_not_found() {
    let mock = MockCamera::builder().build();
    let camera = configured(&context_with(&mock));
    camera.set_model("Canon PowerShot G2").unwrap();

    let err = camera.init().unwrap_err();
    assert!(matches!(err, CamError::ModelNotFound(ref m) if m == "Canon PowerShot G2"));
    assert_eq!(failed_stage(&camera), Some(BindStage::Model));
    assert_eq!(mock.calls().total(), 0);
}

#[test]
fn test_unregistered_library_fails_driver_load() {
    let mock = MockCamera::builder().build();
    let context = CameraContext::builder()
        .abilities(abilities())
        .port_resolver(ports())
        .loader(DriverRegistry::with_builtin())
        .build();
    let camera = configured(&context);

    let err = camera.init().unwrap_err();
    assert!(matches!(err, CamError::Library(_)));
    assert_eq!(failed_stage(&camera), Some(BindStage::DriverLoad));
    assert!(!camera.is_bound());
    // Abilities were resolved before the load failed.
    assert_eq!(camera.abilities().model, MOCK_MODEL);
    assert_eq!(mock.calls().total(), 0);
}

#[test]
#[traced_test]
fn test_failed_init_keeps_module_bound() {
    let mock = MockCamera::builder()
        .with_errors(ErrorConfig::failing(Operation::Init, MOCK_INJECTED_FAILURE))
        .build();
    let camera = configured(&context_with(&mock));

    let err = camera.init().unwrap_err();
    assert_eq!(err.code(), MOCK_INJECTED_FAILURE);
    assert_eq!(failed_stage(&camera), Some(BindStage::DriverInit));
    assert!(camera.is_bound());
    assert!(!camera.is_initialized());
    assert!(logs_contain("Binding failed"));

    camera.exit().unwrap();
    assert!(!camera.is_bound());
    assert_eq!(mock.calls().count(Operation::Exit), 1);
}

#[test]
fn test_driver_without_init_binds() {
    let mock = MockCamera::builder().only(&[Operation::About]).build();
    let camera = bound(&mock);

    assert!(camera.is_initialized());
    assert!(camera.about().is_ok());
}

#[test]
fn test_reinit_unbinds_first() {
    let mock = MockCamera::builder().build();
    let camera = bound(&mock);
    camera.init().unwrap();

    assert_eq!(
        mock.calls().operations(),
        vec![Operation::Init, Operation::Exit, Operation::Init]
    );
}

#[test]
fn test_configuration_frozen_while_bound() {
    let mock = MockCamera::builder().build();
    let camera = bound(&mock);

    assert!(matches!(camera.set_model("Other"), Err(CamError::InvalidArgument(_))));
    assert!(matches!(
        camera.set_port_path("/dev/ttyS1"),
        Err(CamError::InvalidArgument(_))
    ));

    camera.exit().unwrap();
    camera.set_port_path(USB_PATH).unwrap();
    camera.set_port_kind(PortKind::None).unwrap();
    camera.init().unwrap();
    assert_eq!(camera.port().kind, PortKind::Usb);
}

#[test]
fn test_exit_without_exit_slot_still_unloads() {
    let mock = MockCamera::builder().without(Operation::Exit).build();
    let camera = bound(&mock);

    let err = camera.exit().unwrap_err();
    assert!(matches!(err, CamError::NotSupported(Operation::Exit)));
    assert!(!camera.is_bound());
    assert_eq!(camera.state(), BindState::Unbound);

    // Nothing left to unbind.
    assert!(camera.exit().unwrap_err().is_not_supported());
}

#[test]
fn test_directory_browse_needs_no_port() {
    let (resolver, lookups) = CountingResolver::new(ports());
    let context = CameraContext::builder()
        .abilities(abilities())
        .port_resolver(resolver)
        .build();
    let dir = tempfile::tempdir().unwrap();

    let camera = Camera::new(&context).unwrap();
    camera.set_model(camkit_hardware::DIRECTORY_BROWSE_MODEL).unwrap();
    camera.set_port_path(dir.path().to_string_lossy()).unwrap();
    camera.init().unwrap();

    assert_eq!(lookups.load(Ordering::SeqCst), 0);
    assert_eq!(camera.port().kind, PortKind::None);
    assert!(camera.summary().unwrap().as_str().contains("Directory Browse"));
}
