//! Port enumeration.
//!
//! Binding needs two lookups: a port name to its path, and a path to its
//! [`PortKind`]. Both are answered by a [`PortResolver`], which exposes the
//! system's ports as an indexed list of [`PortInfo`] entries.
//!
//! # Resolvers
//!
//! - [`StaticPortResolver`] - fixed list, typically from configuration
//! - [`SerialByIdResolver`] - Linux `/dev/serial/by-id/` symlinks
//! - [`SystemSerialResolver`] - OS enumeration via `serialport` (feature `serial`)
//! - [`ChainedPortResolver`] - concatenation of several resolvers
//!
//! # Linux `/dev/serial/by-id/` Format
//!
//! udev creates stable symlinks in `/dev/serial/by-id/` with the format:
//! ```text
//! usb-{VENDOR}_{MODEL}_{SERIAL}-if{INTERFACE}-port{PORT}
//! ```
//!
//! The symlink name becomes the port name and the canonical device node
//! (`/dev/ttyUSB0`) becomes the path, so a session can be configured with
//! the stable name and still open the right device after a reboot.

use std::path::{Path, PathBuf};

use camkit_core::{CamError, CamResult, PortInfo, PortKind};
use thiserror::Error;
use tracing::debug;

/// Default location of the udev by-id symlinks.
pub const SERIAL_BY_ID_DIR: &str = "/dev/serial/by-id";

/// Errors raised while scanning the system for ports.
#[derive(Debug, Error)]
pub enum PortResolveError {
    /// The by-id directory is not available (not Linux or no serial devices).
    #[error("Serial by-id directory not available: {0}")]
    ByIdNotAvailable(String),

    /// Reading the directory failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Indexed view of the available ports.
pub trait PortResolver: Send + Sync {
    /// Number of known ports.
    fn count(&self) -> CamResult<usize>;

    /// Entry at `index`; fails for indices at or beyond [`count`](Self::count).
    fn info(&self, index: usize) -> CamResult<PortInfo>;

    /// Every entry, skipping indices that fail to resolve.
    fn list(&self) -> CamResult<Vec<PortInfo>> {
        let count = self.count()?;
        let mut ports = Vec::with_capacity(count);
        for index in 0..count {
            match self.info(index) {
                Ok(info) => ports.push(info),
                Err(err) => debug!(index, error = %err, "Skipping unreadable port entry"),
            }
        }
        Ok(ports)
    }
}

fn out_of_range(index: usize, count: usize) -> CamError {
    CamError::invalid_argument(format!("port index {index} out of range ({count} ports)"))
}

// =============================================================================
// StaticPortResolver
// =============================================================================

/// Fixed list of ports.
#[derive(Debug, Clone, Default)]
pub struct StaticPortResolver {
    ports: Vec<PortInfo>,
}

impl StaticPortResolver {
    /// Resolver over `ports`, in order.
    #[must_use]
    pub fn new(ports: Vec<PortInfo>) -> Self {
        Self { ports }
    }

    /// Resolver with no ports.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a port.
    #[must_use]
    pub fn with_port(mut self, info: PortInfo) -> Self {
        self.ports.push(info);
        self
    }
}

impl PortResolver for StaticPortResolver {
    fn count(&self) -> CamResult<usize> {
        Ok(self.ports.len())
    }

    fn info(&self, index: usize) -> CamResult<PortInfo> {
        self.ports
            .get(index)
            .cloned()
            .ok_or_else(|| out_of_range(index, self.ports.len()))
    }
}

// =============================================================================
// SerialByIdResolver
// =============================================================================

/// Ports discovered from udev's by-id symlinks.
///
/// The directory is scanned once at construction; call [`rescan`](Self::rescan)
/// to pick up hot-plugged adapters.
#[derive(Debug, Clone)]
pub struct SerialByIdResolver {
    dir: PathBuf,
    ports: Vec<PortInfo>,
}

impl SerialByIdResolver {
    /// Scan [`SERIAL_BY_ID_DIR`].
    pub fn scan() -> Result<Self, PortResolveError> {
        Self::scan_dir(SERIAL_BY_ID_DIR)
    }

    /// Scan an arbitrary directory of by-id style symlinks.
    pub fn scan_dir(dir: impl AsRef<Path>) -> Result<Self, PortResolveError> {
        let dir = dir.as_ref().to_path_buf();
        let ports = list_by_id(&dir)?;
        Ok(Self { dir, ports })
    }

    /// Re-read the directory this resolver was built from.
    pub fn rescan(&mut self) -> Result<(), PortResolveError> {
        self.ports = list_by_id(&self.dir)?;
        Ok(())
    }

    /// Ports found by the last scan, sorted by device path.
    #[must_use]
    pub fn ports(&self) -> &[PortInfo] {
        &self.ports
    }
}

impl PortResolver for SerialByIdResolver {
    fn count(&self) -> CamResult<usize> {
        Ok(self.ports.len())
    }

    fn info(&self, index: usize) -> CamResult<PortInfo> {
        self.ports
            .get(index)
            .cloned()
            .ok_or_else(|| out_of_range(index, self.ports.len()))
    }
}

fn list_by_id(dir: &Path) -> Result<Vec<PortInfo>, PortResolveError> {
    if !dir.exists() {
        return Err(PortResolveError::ByIdNotAvailable(format!(
            "Directory {} does not exist",
            dir.display()
        )));
    }

    let mut ports = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let by_id_name = entry.file_name().to_string_lossy().into_owned();

        // Resolve the symlink to get the actual device path
        let device_path = match std::fs::canonicalize(entry.path()) {
            Ok(path) => path.to_string_lossy().into_owned(),
            Err(err) => {
                debug!(name = %by_id_name, error = %err, "Dangling by-id link");
                continue;
            }
        };

        ports.push(PortInfo::new(PortKind::Serial, by_id_name, device_path));
    }

    // Sort by device path for consistent indices
    ports.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(ports)
}

// =============================================================================
// SystemSerialResolver
// =============================================================================

/// Ports reported by the operating system through `serialport`.
#[cfg(feature = "serial")]
#[derive(Debug, Clone)]
pub struct SystemSerialResolver {
    ports: Vec<PortInfo>,
}

#[cfg(feature = "serial")]
impl SystemSerialResolver {
    /// Ask the operating system for its serial ports.
    pub fn scan() -> CamResult<Self> {
        let available = serialport::available_ports()
            .map_err(|e| CamError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

        let ports = available
            .into_iter()
            .map(|p| {
                let name = match &p.port_type {
                    serialport::SerialPortType::UsbPort(usb) => usb
                        .product
                        .clone()
                        .unwrap_or_else(|| p.port_name.clone()),
                    _ => p.port_name.clone(),
                };
                PortInfo::new(PortKind::Serial, name, p.port_name)
            })
            .collect();

        Ok(Self { ports })
    }
}

#[cfg(feature = "serial")]
impl PortResolver for SystemSerialResolver {
    fn count(&self) -> CamResult<usize> {
        Ok(self.ports.len())
    }

    fn info(&self, index: usize) -> CamResult<PortInfo> {
        self.ports
            .get(index)
            .cloned()
            .ok_or_else(|| out_of_range(index, self.ports.len()))
    }
}

// =============================================================================
// ChainedPortResolver
// =============================================================================

/// Concatenation of several resolvers; indices run through each in order.
#[derive(Default)]
pub struct ChainedPortResolver {
    resolvers: Vec<Box<dyn PortResolver>>,
}

impl ChainedPortResolver {
    /// Chain with no resolvers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resolver.
    #[must_use]
    pub fn with(mut self, resolver: impl PortResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    /// Append an already boxed resolver.
    pub fn push(&mut self, resolver: Box<dyn PortResolver>) {
        self.resolvers.push(resolver);
    }

    /// Whether the chain has no resolvers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl PortResolver for ChainedPortResolver {
    fn count(&self) -> CamResult<usize> {
        let mut total = 0;
        for resolver in &self.resolvers {
            total += resolver.count()?;
        }
        Ok(total)
    }

    fn info(&self, index: usize) -> CamResult<PortInfo> {
        let mut offset = index;
        for resolver in &self.resolvers {
            let count = resolver.count()?;
            if offset < count {
                return resolver.info(offset);
            }
            offset -= count;
        }
        Err(out_of_range(index, index - offset))
    }
}

impl std::fmt::Debug for ChainedPortResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainedPortResolver")
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}
