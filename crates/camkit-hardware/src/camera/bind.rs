//! Binding a session to a driver.
//!
//! Stages, in order:
//!
//! 1. **Port** - fill in the port path from its name and the port kind from
//!    its path (skipped for [`DIRECTORY_BROWSE_MODEL`]).
//! 2. **Model** - look the model up in the abilities registry and snapshot
//!    the record into the session.
//! 3. **Driver load** - ask the loader for the model's library.
//! 4. **Driver init** - run the driver's `init` slot.
//!
//! Stages 1 to 3 leave nothing bound when they fail. A failing `init` leaves
//! the module bound so that `exit` and teardown can still release it.
//!
//! Messages meant for the user are queued on the driver context; the session
//! delivers them after it lets go of its lock.

use camkit_core::{CamError, CamResult, DriverContext, Operation, PortInfo, PortKind};
use tracing::{debug, info, warn};

use super::SessionInner;
use crate::context::CameraContext;
use crate::loader::DriverLoader;
use crate::port_resolver::PortResolver;

/// Pseudo-model that browses the local filesystem; needs no port.
pub const DIRECTORY_BROWSE_MODEL: &str = "Directory Browse";

/// Binding stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindStage {
    /// Port name and kind resolution.
    Port,
    /// Abilities lookup for the configured model.
    Model,
    /// Loading the model's driver library.
    DriverLoad,
    /// The driver's own `init`.
    DriverInit,
}

impl std::fmt::Display for BindStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BindStage::Port => "port",
            BindStage::Model => "model",
            BindStage::DriverLoad => "driver-load",
            BindStage::DriverInit => "driver-init",
        };
        write!(f, "{}", label)
    }
}

/// Where a session is in the binding process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindState {
    /// No driver bound.
    Unbound,
    /// Binding has started; the port is being resolved.
    PortResolving,
    /// The model's abilities have been copied into the session.
    AbilitiesResolved,
    /// The driver module is loaded but not yet initialized.
    DriverLoaded,
    /// The driver is initialized and ready for operations.
    Initialized,
    /// The last binding attempt failed.
    Failed {
        /// Stage that failed.
        stage: BindStage,
        /// Error text.
        reason: String,
    },
}

impl SessionInner {
    fn fail<T>(&mut self, stage: BindStage, err: CamError) -> CamResult<T> {
        warn!(
            session = self.driver.session(),
            model = %self.model,
            stage = %stage,
            error = %err,
            "Binding failed"
        );
        self.state = BindState::Failed {
            stage,
            reason: err.to_string(),
        };
        Err(err)
    }

    pub(super) fn bind(&mut self, context: &CameraContext) -> CamResult<()> {
        if self.is_bound() {
            debug!(
                session = self.driver.session(),
                "Rebinding; unbinding current driver first"
            );
            if let Err(err) = self.unbind(context.loader()) {
                if !err.is_not_supported() {
                    debug!(error = %err, "Driver exit failed during rebind");
                }
            }
        }

        self.state = BindState::PortResolving;

        if self.model != DIRECTORY_BROWSE_MODEL {
            if let Err(err) = resolve_port(&mut self.driver, context.ports()) {
                return self.fail(BindStage::Port, err);
            }
        }

        if self.model.is_empty() {
            self.driver.message(
                "Auto-probe for model has not yet been implemented! Please specify a model!",
            );
            return self.fail(
                BindStage::Model,
                CamError::invalid_argument(
                    "no model specified; model auto-detection is not implemented",
                ),
            );
        }

        debug!("Looking up abilities for model {}", self.model);
        let abilities = match context.abilities().by_name(&self.model) {
            Ok(abilities) => abilities.clone(),
            Err(err) => return self.fail(BindStage::Model, err),
        };
        if let Ok(dump) = serde_json::to_string(&abilities) {
            debug!(abilities = %dump, "Resolved abilities");
        }
        let library = abilities.library.clone();
        self.driver.set_abilities(abilities);
        self.state = BindState::AbilitiesResolved;

        debug!("Loading library {}", library);
        let module = match context.loader().load(&library) {
            Ok(module) => module,
            Err(err) => return self.fail(BindStage::DriverLoad, CamError::Library(err)),
        };
        self.module = Some(module);
        self.state = BindState::DriverLoaded;

        let init = self
            .module
            .as_mut()
            .and_then(|m| m.table_mut().init.as_mut());
        let result = match init {
            Some(init) => init(&mut self.driver),
            None => Ok(()),
        };

        match result {
            Ok(()) => {
                self.state = BindState::Initialized;
                info!(
                    session = self.driver.session(),
                    model = %self.model,
                    library = %library,
                    port = %self.driver.port().path,
                    "Camera initialized"
                );
                Ok(())
            }
            Err(err) => self.fail(BindStage::DriverInit, err),
        }
    }

    /// Run the driver's `exit` slot, then unload the module.
    ///
    /// The module is unloaded whether or not `exit` exists or succeeds.
    pub(super) fn unbind(&mut self, loader: &dyn DriverLoader) -> CamResult<()> {
        let Some(mut module) = self.module.take() else {
            return Err(CamError::NotSupported(Operation::Exit));
        };

        let result = match module.table_mut().exit.as_mut() {
            Some(exit) => exit(&mut self.driver),
            None => Err(CamError::NotSupported(Operation::Exit)),
        };

        loader.unload(module);
        self.driver.clear_driver_data();
        self.state = BindState::Unbound;
        debug!(session = self.driver.session(), "Driver unbound");
        result
    }
}

/// First enumerated port matching `pred`; entries that fail to resolve are skipped.
fn find_port(
    resolver: &dyn PortResolver,
    pred: impl Fn(&PortInfo) -> bool,
) -> CamResult<Option<PortInfo>> {
    let count = resolver.count()?;
    for index in 0..count {
        match resolver.info(index) {
            Ok(info) if pred(&info) => return Ok(Some(info)),
            Ok(_) => {}
            Err(err) => debug!(index, error = %err, "Skipping port entry"),
        }
    }
    Ok(None)
}

/// Fill in the port path from its name, then the port kind from its path.
fn resolve_port(driver: &mut DriverContext, resolver: &dyn PortResolver) -> CamResult<()> {
    let port = driver.port_mut();
    if port.path.is_empty() {
        if let Some(name) = port.name.as_deref().filter(|n| !n.is_empty()) {
            debug!("Resolving port name {}", name);
            let info = find_port(resolver, |info| info.name == name)?.ok_or_else(|| {
                CamError::invalid_argument(format!("no port named '{name}'"))
            })?;
            port.path = info.path;
        }
    }

    if port.path.is_empty() {
        driver.message("Auto-probe for port has not yet been implemented! Please specify a port!");
        return Err(CamError::invalid_argument(
            "no port specified; port auto-detection is not implemented",
        ));
    }

    if port.kind == PortKind::None {
        debug!("Resolving port kind for {}", port.path);
        let path = port.path.as_str();
        let info = find_port(resolver, |info| info.path == path)?.ok_or_else(|| {
            CamError::invalid_argument(format!("port '{path}' is not among the available ports"))
        })?;
        port.kind = info.kind;
    }

    Ok(())
}
