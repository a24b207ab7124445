//! Error types for the widget library.
//!
//! Only *configuration* mistakes are errors: an unsupported field type, an
//! unparsable pattern, a transformer override missing a required entry. User
//! input is never an error — malformed input degrades to `Value::Null` plus a
//! validity flag (see [`crate::validate`]).

/// Result type alias for fieldset operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring a widget.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured field type is not part of the supported vocabulary.
    #[error("Unsupported field type '{name}'")]
    UnsupportedType { name: String },

    /// A validation pattern failed to compile.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The repeatable list was configured with impossible bounds.
    #[error("Invalid item bounds: minimum {minimum} exceeds maximum {maximum}")]
    InvalidItemBounds { minimum: usize, maximum: usize },
}

impl Error {
    /// Create an unsupported-type error.
    pub fn unsupported_type(name: impl Into<String>) -> Self {
        Self::UnsupportedType { name: name.into() }
    }

    /// Create an invalid-pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}
