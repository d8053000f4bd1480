//! Shared camera context.
//!
//! A [`CameraContext`] bundles the collaborators every session needs: the
//! capability registry, the port resolver, the driver loader and the frontend
//! message sink. It also hands out session identities. Build one with
//! [`CameraContext::builder`] and share it as `Arc<CameraContext>`.
//!
//! ```
//! use camkit_hardware::{AbilitiesRegistry, CameraContext};
//!
//! let ctx = CameraContext::builder()
//!     .abilities(AbilitiesRegistry::with_directory_browse())
//!     .build();
//! assert_eq!(ctx.abilities().count(), 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use camkit_core::{Frontend, LogFrontend};

use crate::abilities::AbilitiesRegistry;
use crate::loader::{DriverLoader, DriverRegistry};
use crate::port_resolver::{PortResolver, StaticPortResolver};

/// Collaborators shared by all sessions.
pub struct CameraContext {
    abilities: AbilitiesRegistry,
    ports: Box<dyn PortResolver>,
    loader: Box<dyn DriverLoader>,
    frontend: Arc<dyn Frontend>,
    next_session: AtomicU64,
}

impl CameraContext {
    /// Start building a context.
    #[must_use]
    pub fn builder() -> CameraContextBuilder {
        CameraContextBuilder::default()
    }

    /// Capability registry consulted on model lookup.
    #[must_use]
    pub fn abilities(&self) -> &AbilitiesRegistry {
        &self.abilities
    }

    /// Resolver for port names and kinds.
    #[must_use]
    pub fn ports(&self) -> &dyn PortResolver {
        self.ports.as_ref()
    }

    /// Loader that turns library names into driver modules.
    #[must_use]
    pub fn loader(&self) -> &dyn DriverLoader {
        self.loader.as_ref()
    }

    /// Sink for user-facing messages.
    #[must_use]
    pub fn frontend(&self) -> &Arc<dyn Frontend> {
        &self.frontend
    }

    /// Allocate the next session identity (starting at 0).
    pub(crate) fn next_session_id(&self) -> u64 {
        self.next_session.fetch_add(1, Ordering::Relaxed)
    }
}

impl std::fmt::Debug for CameraContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraContext")
            .field("models", &self.abilities.count())
            .field("next_session", &self.next_session.load(Ordering::Relaxed))
            .finish()
    }
}

/// Builder for [`CameraContext`].
///
/// Unset collaborators default to: an empty registry, no ports, a
/// [`DriverRegistry`] with the built-in drivers, and [`LogFrontend`].
#[derive(Default)]
pub struct CameraContextBuilder {
    abilities: AbilitiesRegistry,
    ports: Option<Box<dyn PortResolver>>,
    loader: Option<Box<dyn DriverLoader>>,
    frontend: Option<Arc<dyn Frontend>>,
}

impl CameraContextBuilder {
    /// Use `abilities` as the capability registry.
    #[must_use]
    pub fn abilities(mut self, abilities: AbilitiesRegistry) -> Self {
        self.abilities = abilities;
        self
    }

    /// Use `ports` to resolve port names and kinds.
    #[must_use]
    pub fn port_resolver(mut self, ports: impl PortResolver + 'static) -> Self {
        self.ports = Some(Box::new(ports));
        self
    }

    /// Like [`port_resolver`](Self::port_resolver), for an already boxed resolver.
    #[must_use]
    pub fn boxed_port_resolver(mut self, ports: Box<dyn PortResolver>) -> Self {
        self.ports = Some(ports);
        self
    }

    /// Use `loader` to load driver modules.
    #[must_use]
    pub fn loader(mut self, loader: impl DriverLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    /// Deliver user-facing messages to `frontend`.
    #[must_use]
    pub fn frontend(mut self, frontend: Arc<dyn Frontend>) -> Self {
        self.frontend = Some(frontend);
        self
    }

    /// Finish the context, filling unset collaborators with defaults.
    #[must_use]
    pub fn build(self) -> Arc<CameraContext> {
        Arc::new(CameraContext {
            abilities: self.abilities,
            ports: self
                .ports
                .unwrap_or_else(|| Box::new(StaticPortResolver::empty())),
            loader: self
                .loader
                .unwrap_or_else(|| Box::new(DriverRegistry::with_builtin())),
            frontend: self.frontend.unwrap_or_else(|| Arc::new(LogFrontend)),
            next_session: AtomicU64::new(0),
        })
    }
}
