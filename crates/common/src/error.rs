//! Error types for the BIG-IP provider

use thiserror::Error;

/// Result type alias using the provider Error
pub type Result<T> = std::result::Result<T, Error>;

/// BIG-IP error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    /// Non-success response from the device, decoded from its error body
    #[error("HTTP {status} :: {message}")]
    Api { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Status code of a device-side failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = Error::Api {
            status: 409,
            message: "01020066:3: The requested folder (/Common/app) already exists".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP 409 :: 01020066:3: The requested folder (/Common/app) already exists"
        );
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_status_absent_for_local_errors() {
        assert_eq!(Error::InvalidConfig("address".into()).status(), None);
        assert_eq!(Error::Auth("bad token".into()).status(), None);
    }
}
