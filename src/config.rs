//! Process configuration using Figment
//!
//! Configuration is loaded from:
//! 1. `config/camkit.toml` (or an explicit path)
//! 2. Environment variables prefixed with `CAMKIT_`; nested keys are
//!    separated by a double underscore, e.g. `CAMKIT_APPLICATION__LOG_LEVEL=debug`
//!
//! # Example
//! ```no_run
//! use camkit::config::CamkitConfig;
//!
//! let config = CamkitConfig::load()?;
//! config.validate()?;
//! println!("Application: {}", config.application.name);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! # File Format
//!
//! ```toml
//! [application]
//! name = "camkit"
//! log_level = "info"
//!
//! [abilities]
//! files = ["abilities/canon.toml", "abilities"]
//! include_directory_browse = true
//!
//! [[ports]]
//! name = "Bench camera"
//! path = "/dev/ttyUSB0"
//! kind = "serial"
//!
//! [ports_discovery]
//! serial_by_id = true
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use camkit_core::{PortInfo, PortKind};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/camkit.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "CAMKIT_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CamkitConfig {
    /// `[application]` section
    #[serde(default)]
    pub application: ApplicationConfig,
    /// `[abilities]` section
    #[serde(default)]
    pub abilities: AbilitiesConfig,
    /// Ports added to the enumeration ahead of discovered ones
    #[serde(default)]
    pub ports: Vec<PortEntry>,
    /// `[ports_discovery]` section
    #[serde(default)]
    pub ports_discovery: PortDiscoveryConfig,
    /// Directory relative paths are resolved against; set by [`CamkitConfig::load_from`].
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name, used in log output
    #[serde(default = "default_name")]
    pub name: String,
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

/// Where camera model records come from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilitiesConfig {
    /// Abilities files or directories, merged in order
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// Register the "Directory Browse" pseudo-model
    #[serde(default = "default_true")]
    pub include_directory_browse: bool,
}

impl Default for AbilitiesConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            include_directory_browse: true,
        }
    }
}

/// A statically configured port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortEntry {
    /// Name a session can be configured with
    pub name: String,
    /// Device path the name resolves to
    pub path: String,
    /// Port kind; serial when omitted
    #[serde(default = "default_port_kind")]
    pub kind: PortKind,
}

impl From<&PortEntry> for PortInfo {
    fn from(entry: &PortEntry) -> Self {
        PortInfo::new(entry.kind, entry.name.as_str(), entry.path.as_str())
    }
}

/// System port discovery toggles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortDiscoveryConfig {
    /// Scan `/dev/serial/by-id`
    #[serde(default = "default_true")]
    pub serial_by_id: bool,
    /// Enumerate through the operating system (needs the `serial` feature)
    #[serde(default = "default_true")]
    pub system_serial: bool,
}

impl Default for PortDiscoveryConfig {
    fn default() -> Self {
        Self {
            serial_by_id: true,
            system_serial: true,
        }
    }
}

// Default value functions
fn default_name() -> String {
    "camkit".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_port_kind() -> PortKind {
    PortKind::Serial
}

impl CamkitConfig {
    /// Load from [`DEFAULT_CONFIG_PATH`] and the environment.
    ///
    /// With the `user_config` feature, `camkit/camkit.toml` under the user's
    /// configuration directory is used when the default file does not exist.
    pub fn load() -> Result<Self> {
        let default = Path::new(DEFAULT_CONFIG_PATH);
        #[cfg(feature = "user_config")]
        if !default.exists() {
            if let Some(path) = user_config_path().filter(|p| p.exists()) {
                return Self::load_from(path);
            }
        }
        Self::load_from(default)
    }

    /// Load from a specific file merged with the environment.
    ///
    /// A missing file is not an error; defaults and environment apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config: Self = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parse TOML text without consulting the environment.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Figment::new()
            .merge(Toml::string(toml))
            .extract()
            .context("Failed to parse configuration")
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<()> {
        let level = self.application.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            bail!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.application.log_level,
                LOG_LEVELS.join(", ")
            );
        }

        let mut names = HashSet::new();
        for port in &self.ports {
            if port.path.trim().is_empty() {
                bail!("Port '{}' has an empty path", port.name);
            }
            if !names.insert(port.name.as_str()) {
                bail!("Duplicate port name: {}", port.name);
            }
        }

        Ok(())
    }

    /// Abilities sources with relative paths resolved against [`base_dir`](Self::base_dir).
    #[must_use]
    pub fn abilities_paths(&self) -> Vec<PathBuf> {
        self.abilities
            .files
            .iter()
            .map(|path| match &self.base_dir {
                Some(base) if path.is_relative() => base.join(path),
                _ => path.clone(),
            })
            .collect()
    }

    /// Configured ports as enumeration entries.
    #[must_use]
    pub fn static_ports(&self) -> Vec<PortInfo> {
        self.ports.iter().map(PortInfo::from).collect()
    }
}

/// `camkit/camkit.toml` under the user's configuration directory.
#[cfg(feature = "user_config")]
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("camkit").join("camkit.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CamkitConfig::from_toml_str("").unwrap();
        assert_eq!(config.application.name, "camkit");
        assert_eq!(config.application.log_level, "info");
        assert!(config.abilities.include_directory_browse);
        assert!(config.ports_discovery.serial_by_id);
        assert!(config.ports.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let config = CamkitConfig::from_toml_str(
            r#"
            [application]
            name = "bench"
            log_level = "debug"

            [abilities]
            files = ["abilities"]
            include_directory_browse = false

            [[ports]]
            name = "Bench camera"
            path = "/dev/ttyUSB0"

            [[ports]]
            name = "Tether"
            path = "usb:001,004"
            kind = "usb"

            [ports_discovery]
            serial_by_id = false
            "#,
        )
        .unwrap();

        assert_eq!(config.application.name, "bench");
        assert!(!config.abilities.include_directory_browse);
        assert_eq!(config.ports[0].kind, PortKind::Serial);
        assert_eq!(config.ports[1].kind, PortKind::Usb);
        assert!(!config.ports_discovery.serial_by_id);
        assert!(config.ports_discovery.system_serial);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = CamkitConfig::default();
        config.application.log_level = "verbose".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_port_names() {
        let mut config = CamkitConfig::default();
        let entry = PortEntry {
            name: "cam".into(),
            path: "/dev/ttyS0".into(),
            kind: PortKind::Serial,
        };
        config.ports = vec![entry.clone(), entry];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Duplicate port name"));
    }

    #[test]
    fn test_empty_port_path() {
        let mut config = CamkitConfig::default();
        config.ports.push(PortEntry {
            name: "cam".into(),
            path: " ".into(),
            kind: PortKind::Serial,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_relative_abilities_paths() {
        let mut config = CamkitConfig::default();
        config.abilities.files = vec![
            PathBuf::from("abilities"),
            PathBuf::from("/etc/camkit.toml"),
        ];
        config.base_dir = Some(PathBuf::from("/opt/camkit/config"));

        assert_eq!(
            config.abilities_paths(),
            vec![
                PathBuf::from("/opt/camkit/config/abilities"),
                PathBuf::from("/etc/camkit.toml"),
            ]
        );
    }
}
