//! Capability registry.
//!
//! [`AbilitiesRegistry`] is the catalogue of known camera models. It is
//! assembled once (from built-in records and abilities files) and then shared
//! read-only through the camera context, so lookups need no locking.

use camkit_core::{CamError, CamResult, CameraAbilities, FileOperations, FolderOperations};
use tracing::debug;

use crate::camera::DIRECTORY_BROWSE_MODEL;
use crate::drivers::directory::DIRECTORY_LIBRARY;

/// Ordered catalogue of [`CameraAbilities`] records.
///
/// Lookup by name is an exact, case-sensitive match. If two records share a
/// model name the first one wins.
#[derive(Debug, Clone, Default)]
pub struct AbilitiesRegistry {
    entries: Vec<CameraAbilities>,
}

impl AbilitiesRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `entries` in order.
    #[must_use]
    pub fn from_entries(entries: Vec<CameraAbilities>) -> Self {
        Self { entries }
    }

    /// Registry pre-populated with the built-in "Directory Browse" model.
    #[must_use]
    pub fn with_directory_browse() -> Self {
        let mut registry = Self::new();
        registry.push(directory_browse_abilities());
        registry
    }

    /// Append one record.
    pub fn push(&mut self, abilities: CameraAbilities) {
        if self.entries.iter().any(|e| e.model == abilities.model) {
            debug!(model = %abilities.model, "Duplicate model; earlier record takes precedence");
        }
        self.entries.push(abilities);
    }

    /// Append records in order.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = CameraAbilities>) {
        for abilities in entries {
            self.push(abilities);
        }
    }

    /// Number of registered models.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Whether no models are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record at `index`.
    pub fn by_index(&self, index: usize) -> CamResult<&CameraAbilities> {
        self.entries
            .get(index)
            .ok_or_else(|| CamError::ModelNotFound(format!("model index {index}")))
    }

    /// Model name at `index`.
    pub fn model_name(&self, index: usize) -> CamResult<&str> {
        self.entries.get(index).map(|a| a.model.as_str()).ok_or_else(|| {
            CamError::invalid_argument(format!(
                "model index {index} out of range ({} models)",
                self.entries.len()
            ))
        })
    }

    /// Record for an exact model name.
    pub fn by_name(&self, model: &str) -> CamResult<&CameraAbilities> {
        self.entries
            .iter()
            .find(|a| a.model == model)
            .ok_or_else(|| CamError::ModelNotFound(model.to_string()))
    }

    /// Records in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, CameraAbilities> {
        self.entries.iter()
    }
}

/// Capability record of the built-in directory driver.
#[must_use]
pub fn directory_browse_abilities() -> CameraAbilities {
    CameraAbilities::new(DIRECTORY_BROWSE_MODEL, DIRECTORY_LIBRARY)
        .with_file_operations(FileOperations::DELETE)
        .with_folder_operations(FolderOperations::PUT_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AbilitiesRegistry {
        AbilitiesRegistry::from_entries(vec![
            CameraAbilities::new("Canon EOS", "ptp2"),
            CameraAbilities::new("Nikon D70", "ptp2").with_config(true),
        ])
    }

    #[test]
    fn lookup_by_index_and_name() {
        let reg = registry();
        assert_eq!(reg.count(), 2);
        assert_eq!(reg.model_name(1).unwrap(), "Nikon D70");
        assert!(reg.by_name("Nikon D70").unwrap().config);
        assert!(matches!(reg.by_index(2), Err(CamError::ModelNotFound(_))));
        assert!(matches!(reg.model_name(2), Err(CamError::InvalidArgument(_))));
    }

    #[test]
    fn name_lookup_is_exact() {
        let reg = registry();
        assert!(matches!(
            reg.by_name("nikon d70"),
            Err(CamError::ModelNotFound(name)) if name == "nikon d70"
        ));
        assert!(reg.by_name("Nikon").is_err());
    }

    #[test]
    fn first_duplicate_wins() {
        let mut reg = registry();
        reg.push(CameraAbilities::new("Canon EOS", "other"));
        assert_eq!(reg.count(), 3);
        assert_eq!(reg.by_name("Canon EOS").unwrap().library, "ptp2");
    }

    #[test]
    fn directory_browse_is_built_in() {
        let reg = AbilitiesRegistry::with_directory_browse();
        let abilities = reg.by_name(DIRECTORY_BROWSE_MODEL).unwrap();
        assert_eq!(abilities.library, DIRECTORY_LIBRARY);
        assert!(abilities.capture.is_empty());
    }
}
