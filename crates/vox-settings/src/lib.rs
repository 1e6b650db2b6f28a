//! # vox-settings
//!
//! Configuration for vox skill services, loaded from three layers (in
//! priority order):
//! 1. **Compiled defaults**: [`VoxSettings::default()`]
//! 2. **User file**: `~/.vox/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `VOX_*` overrides (highest priority)
//!
//! Components take settings by value or reference; [`get_settings`] exists for
//! binaries that want a process-wide copy.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

use std::sync::OnceLock;

static SETTINGS: OnceLock<VoxSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads settings from `~/.vox/settings.json` with env var
/// overrides. If loading fails, returns compiled defaults.
pub fn get_settings() -> &'static VoxSettings {
    SETTINGS.get_or_init(|| load_settings().unwrap_or_default())
}

/// Initialize the global settings with a specific value.
///
/// Returns the provided settings back if the global was already initialized.
#[allow(clippy::result_large_err)]
pub fn init_settings(settings: VoxSettings) -> std::result::Result<(), VoxSettings> {
    SETTINGS.set(settings)
}
