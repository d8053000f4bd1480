//! Loading capability records from TOML.
//!
//! # Usage
//!
//! ```rust,ignore
//! use camkit_hardware::config::loader::{load_abilities_file, load_abilities_dir};
//! use std::path::Path;
//!
//! let models = load_abilities_file(Path::new("config/abilities/mock.toml"))?;
//! let all = load_abilities_dir(Path::new("config/abilities/"))?;
//! ```
//!
//! # File format
//!
//! ```toml
//! [[camera]]
//! model = "Mock Camera"
//! library = "mock"
//! file_operations = "DELETE | PREVIEW"
//! config = true
//! ```

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use camkit_core::CameraAbilities;
use figment::{
    providers::{Format, Toml},
    Figment,
};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Error types for abilities loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    /// The file or directory does not exist.
    #[error("Abilities file not found: {0}")]
    NotFound(String),

    /// Records parsed but are inconsistent; one line per problem.
    #[error("Abilities validation failed: {0}")]
    ValidationError(String),
}

#[derive(Debug, Deserialize)]
struct AbilitiesFile {
    #[serde(default)]
    camera: Vec<CameraAbilities>,
}

fn validate(entries: &[CameraAbilities]) -> Result<()> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, abilities) in entries.iter().enumerate() {
        if abilities.model.trim().is_empty() {
            errors.push(format!("camera[{index}]: model must not be empty"));
        }
        if abilities.library.trim().is_empty() {
            errors.push(format!(
                "camera[{index}] ({}): library must not be empty",
                abilities.model
            ));
        }
        if !seen.insert(abilities.model.as_str()) {
            errors.push(format!(
                "camera[{index}]: model '{}' is listed twice",
                abilities.model
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigLoadError::ValidationError(errors.join("\n")).into())
    }
}

/// Load every `[[camera]]` record from a TOML file.
pub fn load_abilities_file(path: &Path) -> Result<Vec<CameraAbilities>> {
    if !path.exists() {
        return Err(ConfigLoadError::NotFound(path.display().to_string()).into());
    }

    debug!("Loading abilities from: {}", path.display());

    let file: AbilitiesFile = Figment::new()
        .merge(Toml::file(path))
        .extract()
        .with_context(|| format!("Failed to parse abilities file: {}", path.display()))?;

    validate(&file.camera)
        .with_context(|| format!("Invalid abilities file: {}", path.display()))?;

    info!(
        "Loaded {} camera models from {}",
        file.camera.len(),
        path.display()
    );

    Ok(file.camera)
}

/// Load every `.toml` file in a directory, in file-name order.
///
/// Files that fail to load are logged and skipped.
pub fn load_abilities_dir(dir: &Path) -> Result<Vec<CameraAbilities>> {
    if !dir.exists() {
        return Err(ConfigLoadError::NotFound(dir.display().to_string()).into());
    }

    if !dir.is_dir() {
        return Err(anyhow::anyhow!(
            "Path is not a directory: {}",
            dir.display()
        ));
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut models = Vec::new();
    for path in paths {
        match load_abilities_file(&path) {
            Ok(entries) => models.extend(entries),
            Err(e) => warn!("Failed to load abilities {}: {:#}", path.display(), e),
        }
    }

    Ok(models)
}

/// Parse records from a TOML string.
pub fn load_abilities_from_str(toml_content: &str) -> Result<Vec<CameraAbilities>> {
    let file: AbilitiesFile = Figment::new()
        .merge(Toml::string(toml_content))
        .extract()
        .with_context(|| "Failed to parse abilities TOML")?;

    validate(&file.camera)?;
    Ok(file.camera)
}
