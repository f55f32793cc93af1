//! BIG-IP Common Library
//!
//! Shared types, configuration and errors for the BIG-IP provider and CLI.

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::ProviderConfig;
pub use error::{Error, Result};
pub use types::*;

/// Default config path for the CLI
pub fn default_config_path() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".bigip")
        .join("config.toml")
}

/// Home directory helper
mod dirs {
    pub fn home_dir() -> Option<std::path::PathBuf> {
        std::env::var_os("HOME").map(std::path::PathBuf::from)
    }
}
