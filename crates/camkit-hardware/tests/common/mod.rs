//! Shared fixtures for session integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use camkit_core::{CamResult, CameraAbilities, Frontend, PortInfo, PortKind};
use camkit_driver_mock::{MockCamera, MockCameraFactory};
use camkit_hardware::{
    AbilitiesRegistry, BindState, Camera, CameraContext, DriverRegistry, PortResolver,
    StaticPortResolver,
};

pub const MOCK_MODEL: &str = "Mock Camera";
pub const SERIAL_PATH: &str = "/dev/ttyS0";
pub const USB_PATH: &str = "usb:001,004";

/// Frontend that keeps every message.
#[derive(Default)]
pub struct Messages(Mutex<Vec<String>>);

impl Messages {
    pub fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Frontend for Messages {
    fn message(&self, text: &str) {
        self.0.lock().unwrap().push(text.to_string());
    }
}

/// Frontend that looks at the session it is being told about.
///
/// Each message is recorded together with the session state read from
/// inside the callback.
#[derive(Default)]
pub struct SessionWatcher {
    camera: Mutex<Option<Camera>>,
    seen: Mutex<Vec<(String, BindState)>>,
}

impl SessionWatcher {
    pub fn watch(&self, camera: &Camera) {
        *self.camera.lock().unwrap() = Some(camera.r#ref());
    }

    /// Drop the watched handle so the session can be torn down.
    pub fn release(&self) {
        self.camera.lock().unwrap().take();
    }

    pub fn seen(&self) -> Vec<(String, BindState)> {
        self.seen.lock().unwrap().clone()
    }
}

impl Frontend for SessionWatcher {
    fn message(&self, text: &str) {
        let camera = self.camera.lock().unwrap().clone();
        let state = camera.map_or(BindState::Unbound, |c| c.state());
        self.seen.lock().unwrap().push((text.to_string(), state));
    }
}

/// Port resolver that counts lookups.
pub struct CountingResolver {
    inner: StaticPortResolver,
    lookups: Arc<AtomicUsize>,
}

impl CountingResolver {
    pub fn new(inner: StaticPortResolver) -> (Self, Arc<AtomicUsize>) {
        let lookups = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                lookups: Arc::clone(&lookups),
            },
            lookups,
        )
    }
}

impl PortResolver for CountingResolver {
    fn count(&self) -> CamResult<usize> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.count()
    }

    fn info(&self, index: usize) -> CamResult<PortInfo> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.info(index)
    }
}

pub fn ports() -> StaticPortResolver {
    StaticPortResolver::new(vec![
        PortInfo::new(PortKind::Serial, "Serial Port 0", SERIAL_PATH),
        PortInfo::new(PortKind::Usb, "Universal Serial Bus", USB_PATH),
    ])
}

pub fn abilities() -> AbilitiesRegistry {
    let mut registry = AbilitiesRegistry::with_directory_browse();
    registry.push(CameraAbilities::new(MOCK_MODEL, camkit_driver_mock::MOCK_LIBRARY));
    registry
}

pub fn registry_with(camera: &MockCamera) -> DriverRegistry {
    let registry = DriverRegistry::with_builtin();
    registry.register_factory(Box::new(MockCameraFactory::new(camera.clone())));
    registry
}

/// Context with the mock camera registered and the default port list.
pub fn context_with(camera: &MockCamera) -> Arc<CameraContext> {
    CameraContext::builder()
        .abilities(abilities())
        .port_resolver(ports())
        .loader(registry_with(camera))
        .build()
}

/// Session configured for the mock model on the serial port, not yet bound.
pub fn configured(context: &Arc<CameraContext>) -> Camera {
    let camera = Camera::new(context).unwrap();
    camera.set_model(MOCK_MODEL).unwrap();
    camera.set_port_path(SERIAL_PATH).unwrap();
    camera
}

/// Bound mock session.
pub fn bound(mock: &MockCamera) -> Camera {
    let camera = configured(&context_with(mock));
    camera.init().unwrap();
    camera
}
