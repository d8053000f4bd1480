//! Driver loading.
//!
//! A [`DriverLoader`] turns a library name (from
//! [`CameraAbilities::library`](camkit_core::CameraAbilities::library)) into a
//! [`DriverModule`]: the library's [`OperationTable`] plus the name it was
//! loaded under. Loading and unloading are paired; the session calls
//! [`DriverLoader::unload`] exactly once for every module it obtained.
//!
//! [`DriverRegistry`] is the in-process loader. Drivers register a
//! [`DriverFactory`] under their library name and a fresh table is built on
//! every load.

use std::collections::HashMap;

use camkit_core::{DriverFactory, FactoryRegistry, LoadError, OperationTable};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::drivers::directory::DirectoryDriverFactory;

// =============================================================================
// DriverModule
// =============================================================================

/// A loaded driver: library name plus its operation table.
#[derive(Debug)]
pub struct DriverModule {
    library: String,
    table: OperationTable,
}

impl DriverModule {
    /// Module loaded as `library`.
    #[must_use]
    pub fn new(library: impl Into<String>, table: OperationTable) -> Self {
        Self {
            library: library.into(),
            table,
        }
    }

    /// Library name the module was loaded under.
    #[must_use]
    pub fn library(&self) -> &str {
        &self.library
    }

    /// The driver's operation slots.
    #[must_use]
    pub fn table(&self) -> &OperationTable {
        &self.table
    }

    /// Mutable access to the operation slots, needed to call them.
    pub fn table_mut(&mut self) -> &mut OperationTable {
        &mut self.table
    }
}

// =============================================================================
// DriverLoader
// =============================================================================

/// Resolves library names to driver modules.
pub trait DriverLoader: Send + Sync {
    /// Load the driver library named `library`.
    fn load(&self, library: &str) -> Result<DriverModule, LoadError>;

    /// Release a module obtained from [`load`](Self::load).
    fn unload(&self, module: DriverModule) {
        debug!(library = %module.library(), "Unloading driver");
        drop(module);
    }
}

// =============================================================================
// DriverRegistry
// =============================================================================

/// In-process [`DriverLoader`] backed by registered factories.
#[derive(Default)]
pub struct DriverRegistry {
    factories: RwLock<HashMap<String, Box<dyn DriverFactory>>>,
}

impl DriverRegistry {
    /// Registry with no drivers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in directory driver registered.
    #[must_use]
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register_factory(Box::new(DirectoryDriverFactory));
        registry
    }

    /// Register a factory under its library name.
    ///
    /// # Returns
    /// The previous factory for this library, if any was registered.
    pub fn register_factory(
        &self,
        factory: Box<dyn DriverFactory>,
    ) -> Option<Box<dyn DriverFactory>> {
        let library = factory.library().to_string();
        info!(
            library = %library,
            name = %factory.name(),
            "Registering driver factory"
        );
        self.factories.write().insert(library, factory)
    }

    /// Remove and return the factory for `library`.
    #[must_use]
    pub fn unregister_factory(&self, library: &str) -> Option<Box<dyn DriverFactory>> {
        self.factories.write().remove(library)
    }

    /// Whether a factory is registered for `library`.
    #[must_use]
    pub fn has_factory(&self, library: &str) -> bool {
        self.factories.read().contains_key(library)
    }

    /// Registered library names, sorted.
    #[must_use]
    pub fn libraries(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl FactoryRegistry for DriverRegistry {
    fn register_factory(
        &self,
        factory: Box<dyn DriverFactory>,
    ) -> Option<Box<dyn DriverFactory>> {
        DriverRegistry::register_factory(self, factory)
    }
}

impl DriverLoader for DriverRegistry {
    fn load(&self, library: &str) -> Result<DriverModule, LoadError> {
        let factories = self.factories.read();
        let factory = factories
            .get(library)
            .ok_or_else(|| LoadError::UnknownLibrary(library.to_string()))?;

        debug!(library, name = %factory.name(), "Building driver operation table");
        let table = factory.build().map_err(|e| LoadError::Failed {
            library: library.to_string(),
            message: e.to_string(),
        })?;

        Ok(DriverModule::new(library, table))
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("libraries", &self.libraries())
            .finish()
    }
}
