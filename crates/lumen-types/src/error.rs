//! Error types for LUMEN_OS.

use std::io;

/// Errors produced by the LUMEN_OS framework.
#[derive(Debug, thiserror::Error)]
pub enum LumenError {
    #[error("VFS error: {0}")]
    Vfs(String),

    #[error("window manager error: {0}")]
    Wm(String),

    #[error("profile error: {0}")]
    Profile(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("registry error: {0}")]
    Registry(String),

    #[error("manifest error: {0}")]
    Manifest(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, LumenError>;
