//! Camera sessions.
//!
//! A [`Camera`] is a reference-counted handle to one session: the model and
//! port it is configured for, the abilities snapshot, and (once bound) the
//! driver's operation table.
//!
//! # Lifecycle
//!
//! ```text
//! Camera::new ─► set_model / set_port ─► init ─► operations ... ─► last handle dropped
//!                                         │                          │
//!                                         └─ bind: port → model →    └─ exit + unload
//!                                            driver load → init
//! ```
//!
//! Cloning a handle (or calling [`Camera::r#ref`]) adds a reference;
//! dropping it (or [`Camera::unref`]) removes one. When the last reference
//! goes away the session is torn down exactly once: the driver's `exit`
//! runs (if bound and provided) and the module is returned to the loader.
//!
//! # Thread Safety
//!
//! Handles are `Send + Sync`. Each session serializes its own binding and
//! dispatch behind a mutex; operations on different sessions never contend.
//! A driver operation must not call back into the same session.
//!
//! Frontend messages raised during an operation (by the binding stages or by
//! the driver) are queued on the [`DriverContext`] and delivered once the
//! session lock has been released, so a [`Frontend`] may inspect the session
//! it is being told about.

mod bind;
mod dispatch;

use std::any::Any;
use std::sync::Arc;

use camkit_core::{
    CamError, CamResult, CameraAbilities, DriverContext, Frontend, Operation, PortConfig,
    PortKind,
};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::context::CameraContext;
use crate::loader::DriverModule;

pub use bind::{BindStage, BindState, DIRECTORY_BROWSE_MODEL};
pub use dispatch::camera_result_as_string;

// =============================================================================
// Session
// =============================================================================

struct Session {
    id: u64,
    context: Arc<CameraContext>,
    inner: Mutex<SessionInner>,
}

/// Mutable session state; only touched with the session lock held.
struct SessionInner {
    model: String,
    driver: DriverContext,
    module: Option<DriverModule>,
    state: BindState,
    caller_data: Option<Box<dyn Any + Send>>,
}

impl SessionInner {
    fn is_bound(&self) -> bool {
        self.module.is_some()
    }

    fn ensure_unbound(&self, what: &str) -> CamResult<()> {
        if self.is_bound() {
            return Err(CamError::invalid_argument(format!(
                "cannot change {what} while a driver is bound; call exit first"
            )));
        }
        Ok(())
    }
}

impl Session {
    /// Hand queued messages to the frontend; the session lock must not be held.
    fn deliver(&self, messages: Vec<String>) {
        let frontend: &dyn Frontend = self.context.frontend().as_ref();
        for text in messages {
            frontend.message(&text);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let inner = self.inner.get_mut();
        if inner.is_bound() {
            if let Err(err) = inner.unbind(self.context.loader()) {
                if !err.is_not_supported() {
                    warn!(session = self.id, error = %err, "Driver exit failed during teardown");
                }
            }
        }
        let messages = inner.driver.take_messages();
        self.deliver(messages);
        debug!(session = self.id, "Session released");
    }
}

// =============================================================================
// Camera
// =============================================================================

/// Handle to a camera session.
///
/// `Clone` shares the session (it is the same as [`r#ref`](Self::r#ref)).
#[derive(Clone)]
pub struct Camera {
    session: Arc<Session>,
}

impl Camera {
    /// Create an unbound session with a reference count of 1.
    pub fn new(context: &Arc<CameraContext>) -> CamResult<Self> {
        let id = context.next_session_id();
        let driver = DriverContext::new(id);
        debug!(session = id, "Session created");

        Ok(Self {
            session: Arc::new(Session {
                id,
                context: Arc::clone(context),
                inner: Mutex::new(SessionInner {
                    model: String::new(),
                    driver,
                    module: None,
                    state: BindState::Unbound,
                    caller_data: None,
                }),
            }),
        })
    }

    /// Take another reference to this session.
    #[must_use]
    pub fn r#ref(&self) -> Camera {
        self.clone()
    }

    /// Release this reference. The last release tears the session down.
    pub fn unref(self) {
        drop(self);
    }

    /// Number of live references to this session.
    #[must_use]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.session)
    }

    /// Session identity, unique within the owning context.
    #[must_use]
    pub fn session(&self) -> u64 {
        self.session.id
    }

    /// Context the session was created in.
    #[must_use]
    pub fn context(&self) -> &Arc<CameraContext> {
        &self.session.context
    }

    /// Whether two handles refer to the same session.
    #[must_use]
    pub fn same_session(&self, other: &Camera) -> bool {
        Arc::ptr_eq(&self.session, &other.session)
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Model name configured for binding.
    #[must_use]
    pub fn model(&self) -> String {
        self.session.inner.lock().model.clone()
    }

    /// Select the model to bind on the next [`init`](Self::init).
    pub fn set_model(&self, model: impl Into<String>) -> CamResult<()> {
        let mut inner = self.session.inner.lock();
        inner.ensure_unbound("the model")?;
        inner.model = model.into();
        Ok(())
    }

    /// Current port configuration, including anything binding resolved.
    #[must_use]
    pub fn port(&self) -> PortConfig {
        self.session.inner.lock().driver.port().clone()
    }

    /// Replace the whole port configuration.
    pub fn set_port(&self, port: PortConfig) -> CamResult<()> {
        let mut inner = self.session.inner.lock();
        inner.ensure_unbound("the port")?;
        *inner.driver.port_mut() = port;
        Ok(())
    }

    /// Set the port path, e.g. `/dev/ttyUSB0` or `usb:001,004`.
    pub fn set_port_path(&self, path: impl Into<String>) -> CamResult<()> {
        let mut inner = self.session.inner.lock();
        inner.ensure_unbound("the port")?;
        inner.driver.port_mut().path = path.into();
        Ok(())
    }

    /// Set the human-readable port name, resolved to a path on `init`.
    pub fn set_port_name(&self, name: impl Into<String>) -> CamResult<()> {
        let mut inner = self.session.inner.lock();
        inner.ensure_unbound("the port")?;
        inner.driver.port_mut().name = Some(name.into());
        Ok(())
    }

    /// Set the port kind; left as [`PortKind::None`] it is looked up on `init`.
    pub fn set_port_kind(&self, kind: PortKind) -> CamResult<()> {
        let mut inner = self.session.inner.lock();
        inner.ensure_unbound("the port")?;
        inner.driver.port_mut().kind = kind;
        Ok(())
    }

    /// Abilities snapshot taken at the last successful model lookup.
    #[must_use]
    pub fn abilities(&self) -> CameraAbilities {
        self.session.inner.lock().driver.abilities().clone()
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    /// Where the session is in the binding process.
    #[must_use]
    pub fn state(&self) -> BindState {
        self.session.inner.lock().state.clone()
    }

    /// True once `init` has completed successfully.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        matches!(self.session.inner.lock().state, BindState::Initialized)
    }

    /// Whether a driver module is currently bound (initialized or not).
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.session.inner.lock().is_bound()
    }

    /// Operations the bound driver provides; empty when unbound.
    #[must_use]
    pub fn supported_operations(&self) -> Vec<Operation> {
        self.session
            .inner
            .lock()
            .module
            .as_ref()
            .map(|m| m.table().supported())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Binding
    // -------------------------------------------------------------------------

    /// Bind the configured model and port to a driver and initialize it.
    ///
    /// A session that is already bound is unbound first. Frontend messages
    /// raised while binding are delivered after the session is unlocked.
    pub fn init(&self) -> CamResult<()> {
        let context = &self.session.context;
        self.locked(|inner| inner.bind(context))
    }

    /// Run the driver's `exit` and unload it.
    ///
    /// Fails with [`CamError::NotSupported`] when nothing is bound or the
    /// driver has no `exit` slot; the module is unloaded either way.
    pub fn exit(&self) -> CamResult<()> {
        let loader = self.session.context.loader();
        self.locked(|inner| inner.unbind(loader))
    }

    /// Run `f` under the session lock, then deliver the frontend messages it
    /// queued with the lock released.
    fn locked<R>(&self, f: impl FnOnce(&mut SessionInner) -> R) -> R {
        let (result, messages) = {
            let mut inner = self.session.inner.lock();
            let result = f(&mut inner);
            (result, inner.driver.take_messages())
        };
        self.session.deliver(messages);
        result
    }

    // -------------------------------------------------------------------------
    // Caller data
    // -------------------------------------------------------------------------

    /// Attach caller-private state, replacing any previous value.
    pub fn set_caller_data<T: Any + Send>(&self, data: T) {
        self.session.inner.lock().caller_data = Some(Box::new(data));
    }

    /// Run `f` with mutable access to caller-private state of type `T`.
    pub fn with_caller_data<T: Any + Send, R>(&self, f: impl FnOnce(Option<&mut T>) -> R) -> R {
        let mut inner = self.session.inner.lock();
        f(inner
            .caller_data
            .as_mut()
            .and_then(|data| data.downcast_mut::<T>()))
    }

    /// Remove and return caller-private state of type `T`.
    ///
    /// State of another type is left in place.
    #[must_use]
    pub fn take_caller_data<T: Any + Send>(&self) -> Option<T> {
        let mut inner = self.session.inner.lock();
        match inner.caller_data.take()?.downcast::<T>() {
            Ok(data) => Some(*data),
            Err(other) => {
                inner.caller_data = Some(other);
                None
            }
        }
    }
}

impl std::fmt::Debug for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.session.inner.lock();
        f.debug_struct("Camera")
            .field("session", &self.session.id)
            .field("model", &inner.model)
            .field("port", inner.driver.port())
            .field("state", &inner.state)
            .finish()
    }
}
