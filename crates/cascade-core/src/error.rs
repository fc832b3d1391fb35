//! Error types for cascade-core.

use crate::animation::EasingParseError;
use crate::color::ColorParseError;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    /// YAML could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A color field held an invalid hex string.
    #[error("invalid color for `{field}`: {source}")]
    Color {
        /// Dotted path of the offending field
        field: String,
        /// Underlying parse error
        #[source]
        source: ColorParseError,
    },

    /// An easing field held an invalid timing function.
    #[error("invalid easing for `{field}`: {source}")]
    Easing {
        /// Dotted path of the offending field
        field: String,
        /// Underlying parse error
        #[source]
        source: EasingParseError,
    },

    /// A numeric or string field was out of range.
    #[error("invalid value for `{field}`: {message}")]
    InvalidValue {
        /// Dotted path of the offending field
        field: String,
        /// What was wrong with it
        message: String,
    },
}

impl CoreError {
    /// The configuration field this error refers to, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Color { field, .. } | Self::Easing { field, .. } | Self::InvalidValue { field, .. } => {
                Some(field)
            }
            Self::Yaml(_) | Self::Json(_) => None,
        }
    }
}

/// Result alias for configuration operations.
pub type CoreResult<T> = Result<T, CoreError>;
