//! Assembling a [`CameraContext`] from configuration.
//!
//! Mirrors what an application does at startup: read the abilities files,
//! put configured ports ahead of discovered ones, and register the built-in
//! drivers. Callers that ship their own drivers take the
//! [`CameraContextBuilder`] from [`context_builder`] and swap the loader.

use std::sync::Arc;

use anyhow::{Context, Result};
use camkit_core::CameraAbilities;
use camkit_hardware::config::{load_abilities_dir, load_abilities_file};
use camkit_hardware::port_resolver::PortResolveError;
use camkit_hardware::{
    AbilitiesRegistry, CameraContext, CameraContextBuilder, ChainedPortResolver,
    SerialByIdResolver, StaticPortResolver,
};
use tracing::{debug, info, warn};

use crate::config::CamkitConfig;

/// Abilities registry described by `[abilities]`.
///
/// Directories are loaded file by file, skipping files that fail to parse;
/// an explicitly listed file that fails is an error.
pub fn build_abilities(config: &CamkitConfig) -> Result<AbilitiesRegistry> {
    let mut registry = if config.abilities.include_directory_browse {
        AbilitiesRegistry::with_directory_browse()
    } else {
        AbilitiesRegistry::new()
    };

    for path in config.abilities_paths() {
        let entries: Vec<CameraAbilities> = if path.is_dir() {
            load_abilities_dir(&path)
        } else {
            load_abilities_file(&path)
        }
        .with_context(|| format!("Failed to load abilities from {}", path.display()))?;

        debug!(path = %path.display(), models = entries.len(), "Loaded abilities");
        registry.extend(entries);
    }

    info!(models = registry.count(), "Abilities registry ready");
    Ok(registry)
}

/// Port enumeration: configured ports first, then discovered ones.
#[must_use]
pub fn build_port_resolver(config: &CamkitConfig) -> ChainedPortResolver {
    let mut chain = ChainedPortResolver::new();

    if !config.ports.is_empty() {
        chain.push(Box::new(StaticPortResolver::new(config.static_ports())));
    }

    if config.ports_discovery.serial_by_id {
        match SerialByIdResolver::scan() {
            Ok(resolver) => chain.push(Box::new(resolver)),
            Err(PortResolveError::ByIdNotAvailable(dir)) => {
                debug!(dir = %dir, "No serial by-id directory; skipping");
            }
            Err(err) => warn!(error = %err, "Serial by-id scan failed"),
        }
    }

    #[cfg(feature = "serial")]
    if config.ports_discovery.system_serial {
        match camkit_hardware::SystemSerialResolver::scan() {
            Ok(resolver) => chain.push(Box::new(resolver)),
            Err(err) => warn!(error = %err, "System serial enumeration failed"),
        }
    }

    chain
}

/// Context builder with abilities and ports from `config`.
///
/// The loader defaults to the built-in drivers and the frontend to logging.
pub fn context_builder(config: &CamkitConfig) -> Result<CameraContextBuilder> {
    Ok(CameraContext::builder()
        .abilities(build_abilities(config)?)
        .port_resolver(build_port_resolver(config)))
}

/// Ready-to-use context for `config`.
pub fn build_context(config: &CamkitConfig) -> Result<Arc<CameraContext>> {
    config.validate()?;
    Ok(context_builder(config)?.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camkit_hardware::PortResolver;
    use std::fs;

    fn without_discovery() -> CamkitConfig {
        let mut config = CamkitConfig::default();
        config.ports_discovery.serial_by_id = false;
        config.ports_discovery.system_serial = false;
        config
    }

    #[test]
    fn test_default_registry_has_directory_browse() {
        let registry = build_abilities(&without_discovery()).unwrap();
        assert_eq!(registry.count(), 1);
        assert!(registry
            .by_name(camkit_hardware::DIRECTORY_BROWSE_MODEL)
            .is_ok());
    }

    #[test]
    fn test_abilities_files_are_merged() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("canon.toml"),
            r#"
            [[camera]]
            model = "Canon PowerShot A70"
            library = "canon"
            "#,
        )
        .unwrap();

        let mut config = without_discovery();
        config.abilities.include_directory_browse = false;
        config.abilities.files = vec!["canon.toml".into()];
        config.base_dir = Some(dir.path().to_path_buf());

        let registry = build_abilities(&config).unwrap();
        assert_eq!(registry.model_name(0).unwrap(), "Canon PowerShot A70");
    }

    #[test]
    fn test_missing_abilities_file_is_error() {
        let mut config = without_discovery();
        config.abilities.files = vec!["/nonexistent/abilities.toml".into()];
        assert!(build_abilities(&config).is_err());
    }

    #[test]
    fn test_configured_ports_come_first() {
        let mut config = without_discovery();
        config.ports.push(crate::config::PortEntry {
            name: "Bench".into(),
            path: "/dev/ttyUSB7".into(),
            kind: camkit_core::PortKind::Serial,
        });

        let resolver = build_port_resolver(&config);
        assert_eq!(resolver.count().unwrap(), 1);
        assert_eq!(resolver.info(0).unwrap().path, "/dev/ttyUSB7");
    }
}
