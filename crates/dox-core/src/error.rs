//! Error types for manual assembly and policy store operations.
//!
//! Every failure is reported synchronously to the immediate caller. The
//! protocol layer maps each variant onto a JSON-RPC error code through
//! [`DoxError::rpc_code`].

use thiserror::Error;

/// JSON-RPC code for invalid parameters.
pub const RPC_INVALID_PARAMS: i32 = -32602;

/// JSON-RPC code for internal failures.
pub const RPC_INTERNAL_ERROR: i32 = -32603;

/// Error types that can occur while selecting, rendering or persisting manuals.
///
/// # Examples
///
/// ```rust
/// use dox_core::{DoxError, RPC_INVALID_PARAMS};
///
/// let err = DoxError::EmptySelection;
/// assert_eq!(err.rpc_code(), RPC_INVALID_PARAMS);
/// assert_eq!(err.to_string(), "No policies found matching the criteria");
/// ```
#[derive(Error, Debug)]
pub enum DoxError {
    /// A referenced policy, manual, sport or template id has no match.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What was looked up ("Policy", "Manual", "Sport", "Template").
        kind: &'static str,
        /// The identifier that failed to resolve.
        id: String,
    },

    /// The selection filters matched zero policies.
    #[error("No policies found matching the criteria")]
    EmptySelection,

    /// Malformed arguments, URIs or domain values.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// The backing store reported an error; the message is passed through.
    #[error("Store error: {0}")]
    Upstream(String),

    /// The document writer failed.
    #[error("Render error: {0}")]
    Render(String),

    /// Configuration could not be resolved.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O error (seed files, config files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML config parse error.
    #[error("TOML error: {0}")]
    Toml(Box<toml::de::Error>),
}

impl From<toml::de::Error> for DoxError {
    #[inline]
    fn from(err: toml::de::Error) -> Self {
        Self::Toml(Box::new(err))
    }
}

impl DoxError {
    /// Shorthand for [`DoxError::NotFound`].
    #[inline]
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// JSON-RPC error code for this failure.
    ///
    /// Caller-side problems (unknown ids, empty selections, bad arguments)
    /// are invalid-parameter failures; everything else is internal.
    #[inline]
    #[must_use]
    pub const fn rpc_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } | Self::EmptySelection | Self::InvalidParams(_) => {
                RPC_INVALID_PARAMS
            }
            Self::Upstream(_)
            | Self::Render(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Toml(_) => RPC_INTERNAL_ERROR,
        }
    }
}

/// Type alias for [`Result<T, DoxError>`].
pub type Result<T> = std::result::Result<T, DoxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let error = DoxError::not_found("Manual", "m-42");
        assert_eq!(error.to_string(), "Manual not found: m-42");
        assert_eq!(error.rpc_code(), RPC_INVALID_PARAMS);
    }

    #[test]
    fn test_empty_selection_is_invalid_params() {
        let error = DoxError::EmptySelection;
        assert_eq!(error.rpc_code(), RPC_INVALID_PARAMS);
        assert!(error.to_string().contains("No policies"));
    }

    #[test]
    fn test_upstream_passes_message_through() {
        let error = DoxError::Upstream("connection reset".to_string());
        assert_eq!(error.to_string(), "Store error: connection reset");
        assert_eq!(error.rpc_code(), RPC_INTERNAL_ERROR);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "seed.json");
        let err: DoxError = io_err.into();
        match err {
            DoxError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_json_error_is_internal() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err: DoxError = json_err.into();
        assert_eq!(err.rpc_code(), RPC_INTERNAL_ERROR);
    }

    #[test]
    fn test_error_size() {
        let size = std::mem::size_of::<DoxError>();
        assert!(
            size < 128,
            "DoxError size is {size} bytes, consider boxing large variants"
        );
    }
}
