//! Port descriptions.
//!
//! [`PortConfig`] is what a session is told about its connection;
//! [`PortInfo`] is one entry reported by a port enumerator.

use serde::{Deserialize, Serialize};

/// Transport class of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortKind {
    /// Not yet determined; binding fills it in from the path.
    #[default]
    None,
    /// Serial line, e.g. `/dev/ttyUSB0`.
    Serial,
    /// USB device, e.g. `usb:001,004`.
    Usb,
    /// Anything else the enumerator reports.
    Other,
}

impl std::fmt::Display for PortKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PortKind::None => "none",
            PortKind::Serial => "serial",
            PortKind::Usb => "usb",
            PortKind::Other => "other",
        };
        write!(f, "{}", label)
    }
}

/// Connection settings held by a session.
///
/// Either `path` or `name` must be set before binding. An empty `path` with a
/// `name` is resolved through the port enumerator; a [`PortKind::None`] kind
/// is resolved from the path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortConfig {
    /// Transport class; [`PortKind::None`] until resolved.
    #[serde(default)]
    pub kind: PortKind,
    /// Path used to open the port.
    #[serde(default)]
    pub path: String,
    /// Human-readable name, resolved to a path when `path` is empty.
    #[serde(default)]
    pub name: Option<String>,
}

impl PortConfig {
    /// Port with a known kind and path.
    #[must_use]
    pub fn new(kind: PortKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            name: None,
        }
    }

    /// Port known only by its human-readable name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// One enumerated port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortInfo {
    /// Transport class.
    pub kind: PortKind,
    /// Human-readable name (e.g. "Universal Serial Bus").
    pub name: String,
    /// Path used to open the port (e.g. "usb:001,004" or "/dev/ttyUSB0").
    pub path: String,
}

impl PortInfo {
    /// Enumeration entry.
    #[must_use]
    pub fn new(kind: PortKind, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            path: path.into(),
        }
    }
}
