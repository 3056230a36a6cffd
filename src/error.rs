//! Error types and handling infrastructure for huedial.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! custom error types and `anyhow` for application-level error handling with context.
//!
//! ## Design Principles
//!
//! - **Containment**: errors from a single action or device read are logged and
//!   discarded; only startup failures terminate the process
//! - **Distinct capability gaps**: a backend generation lacking a capability
//!   reports `Unsupported` rather than silently succeeding
//! - **Consistency**: standardized Result type across all modules

use thiserror::Error;

/// The main error type for huedial operations.
///
/// This enum covers all error conditions that can occur while talking to the
/// lighting bridge, reading the input device, or parsing configuration.
#[derive(Error, Debug)]
pub enum HuedialError {
    /// Transport-level failure talking to the bridge (timeout, refused
    /// connection, malformed response)
    #[error("Bridge unreachable: {message}")]
    Unreachable { message: String },

    /// The bridge rejected a scene or resource identifier
    #[error("Not found on bridge: {id}")]
    NotFound { id: String },

    /// A required target identifier has not been bound
    #[error("Bridge not configured: {message}")]
    NotConfigured { message: String },

    /// Capability not offered by the active backend generation
    #[error("Unsupported by this bridge API: {capability}")]
    Unsupported { capability: String },

    /// I/O failure reading the input device
    #[error("Input device error: {message}")]
    Device {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration values
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Standard Result type for huedial operations.
///
/// This type alias provides a consistent error handling interface across
/// all modules in the huedial codebase.
pub type Result<T> = std::result::Result<T, HuedialError>;

impl HuedialError {
    /// Create an Unreachable error with a descriptive message
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }

    /// Create a NotFound error for a rejected identifier
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a NotConfigured error with a descriptive message
    pub fn not_configured(message: impl Into<String>) -> Self {
        Self::NotConfigured {
            message: message.into(),
        }
    }

    /// Create an Unsupported error naming the missing capability
    pub fn unsupported(capability: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: capability.into(),
        }
    }

    /// Create a Device error from an io::Error with additional context
    pub fn device(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Device {
            message: message.into(),
            source,
        }
    }

    /// Create a Config error with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True when this error signals a capability the active backend simply
    /// does not offer, as opposed to a failure.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

// Automatic conversion from reqwest::Error: every transport failure is
// Unreachable from the core's point of view.
impl From<reqwest::Error> for HuedialError {
    fn from(err: reqwest::Error) -> Self {
        Self::Unreachable {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let unreachable = HuedialError::unreachable("connection refused");
        assert_eq!(
            unreachable.to_string(),
            "Bridge unreachable: connection refused"
        );

        let not_found = HuedialError::not_found("scene-abc");
        assert_eq!(not_found.to_string(), "Not found on bridge: scene-abc");

        let unsupported = HuedialError::unsupported("scene dynamics");
        assert_eq!(
            unsupported.to_string(),
            "Unsupported by this bridge API: scene dynamics"
        );
    }

    #[test]
    fn test_error_constructors() {
        let cfg_err = HuedialError::config("bad group id");
        matches!(cfg_err, HuedialError::Config { .. });

        let nc_err = HuedialError::not_configured("no group bound");
        matches!(nc_err, HuedialError::NotConfigured { .. });
    }

    #[test]
    fn test_is_unsupported() {
        assert!(HuedialError::unsupported("dynamics").is_unsupported());
        assert!(!HuedialError::unreachable("timeout").is_unsupported());
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<String> {
            Ok("success".to_string())
        }

        let result = returns_result();
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "success");
    }
}
