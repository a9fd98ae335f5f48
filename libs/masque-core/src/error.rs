//! Error types for Masque operations

use thiserror::Error;

/// Masque error types
#[derive(Debug, Error)]
pub enum MasqueError {
    /// A rule declared an unparsable regular expression
    #[error("Invalid pattern in {rule}: {message}")]
    InvalidPattern {
        /// Which rule declared it (e.g. "response #3")
        rule: String,
        /// Regex compiler diagnostic
        message: String,
    },

    /// A rule declared a frequence outside [0, 1]
    #[error("Invalid frequence in {rule}: {value} (must be within [0, 1])")]
    InvalidFrequence {
        /// Which rule declared it
        rule: String,
        /// The offending value
        value: f64,
    },

    /// A routine declared a malformed time window
    #[error("Invalid time window in {rule}: {value} (expected HH:MM)")]
    InvalidWindow {
        /// Which rule declared it
        rule: String,
        /// The offending time string
        value: String,
    },

    /// Parse error (TOML, JSON)
    #[error("Parse error: {0}")]
    ParseError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for Masque operations
pub type Result<T> = std::result::Result<T, MasqueError>;

impl MasqueError {
    /// Check if this error points at a specific rule in the configuration
    pub fn is_rule_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPattern { .. } | Self::InvalidFrequence { .. } | Self::InvalidWindow { .. }
        )
    }
}
