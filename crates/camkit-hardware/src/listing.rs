//! Listing normalization.
//!
//! Drivers return folder and file listings in whatever order the device
//! reports them. Callers always see them sorted by name (byte-wise
//! lexicographic, stable for equal names).

use camkit_core::CameraList;

/// Sort `list` by entry name in place.
pub fn normalize_listing(list: &mut CameraList) {
    list.entries_mut().sort_by(|a, b| a.name.cmp(&b.name));
}
