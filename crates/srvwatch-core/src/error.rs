//! Error types for srvwatch

use thiserror::Error;

/// Main error type for srvwatch
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Service-record or host-address lookup failed
    #[error("Resolution failed for {target}: {reason}")]
    Resolution {
        /// Name that was being resolved
        target: String,
        /// Underlying failure as reported by the name service
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DiscoveryError {
    /// Build a resolution failure for `target`
    pub fn resolution(target: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        DiscoveryError::Resolution {
            target: target.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for srvwatch operations
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

impl From<toml::de::Error> for DiscoveryError {
    fn from(err: toml::de::Error) -> Self {
        DiscoveryError::Config(err.to_string())
    }
}
