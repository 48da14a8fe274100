//! Host-level feature flags.

use serde::{Deserialize, Serialize};

/// Boolean feature flags persisted independently of the definition cache.
///
/// Never invalidated by an index refresh; callers replace the whole record
/// when a flag changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub allow_keyboard_key_remapping: bool,
    pub show_design_tab: bool,
    pub disable_fast_remap: bool,
    pub disable_hardware_acceleration: bool,
}
