//! Abilities files.
//!
//! Camera models are described in TOML files holding an array of `[[camera]]`
//! tables, one [`CameraAbilities`](camkit_core::CameraAbilities) record each.
//! See [`loader`] for the loading functions.

pub mod loader;

pub use loader::{load_abilities_dir, load_abilities_file, load_abilities_from_str, ConfigLoadError};
