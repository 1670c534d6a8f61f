//! Shell configuration loaded from `lumen.toml`.

use std::path::Path;

use serde::Deserialize;

use lumen_types::error::Result;
use lumen_types::geometry::Size;
use lumen_wm::Viewport;

/// Top-level configuration. Every field has a default so an empty (or
/// absent) file yields a working desktop.
#[derive(Debug, Clone, Deserialize)]
pub struct LumenConfig {
    #[serde(default = "default_screen_width")]
    pub screen_width: u32,
    #[serde(default = "default_screen_height")]
    pub screen_height: u32,
    #[serde(default = "default_top_bar_height")]
    pub top_bar_height: u32,
    #[serde(default = "default_dock_height")]
    pub dock_height: u32,
    /// Directory for the local key-value store; `None` keeps guest state in
    /// memory only.
    #[serde(default)]
    pub data_dir: Option<String>,
    /// Remote document holding the identity-to-profile map.
    #[serde(default = "default_remote_document")]
    pub remote_document: String,
    /// How long an app stays unlocked after a correct passcode.
    #[serde(default = "default_unlock_ttl_secs")]
    pub unlock_ttl_secs: u64,
}

fn default_screen_width() -> u32 {
    1280
}
fn default_screen_height() -> u32 {
    800
}
fn default_top_bar_height() -> u32 {
    28
}
fn default_dock_height() -> u32 {
    70
}
fn default_remote_document() -> String {
    "profiles.json".to_string()
}
fn default_unlock_ttl_secs() -> u64 {
    300
}

impl Default for LumenConfig {
    fn default() -> Self {
        toml::from_str("").expect("empty config is valid")
    }
}

impl LumenConfig {
    /// Parse from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a file; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Window-manager viewport metrics.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            Size::new(self.screen_width, self.screen_height),
            self.top_bar_height,
            self.dock_height,
        )
    }
}
