//! Built-in drivers.

pub mod directory;

pub use directory::{DirectoryDriverFactory, DIRECTORY_LIBRARY};
