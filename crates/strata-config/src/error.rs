//! Errors raised while loading and checking configuration.

use std::fmt;

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failure to load, parse or validate a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A named entry (convention set, curve) is missing.
    #[error("No configuration entry for '{key}'")]
    NotFound {
        /// Requested key.
        key: String,
    },

    /// One or more fields failed validation.
    #[error("Invalid configuration: {}", join(.0))]
    Invalid(Vec<ValidationError>),

    /// Writing JSON or TOML failed.
    #[error("Cannot serialize configuration: {0}")]
    Serialization(String),

    /// Reading JSON or TOML failed.
    #[error("Cannot parse configuration: {0}")]
    Deserialization(String),

    /// The file could not be read.
    #[error("Cannot read '{path}': {message}")]
    Io {
        /// File path.
        path: String,
        /// OS error text.
        message: String,
    },
}

impl ConfigError {
    /// Validation failures carried by this error, if any.
    #[must_use]
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// One failed field check, addressed by a dotted path such as `sabr.beta`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field path.
    pub field: String,
    /// What is wrong.
    pub message: String,
    /// Short rule name, e.g. `range`.
    pub rule: Option<String>,
}

impl ValidationError {
    /// Failure without a rule name.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Failure tagged with a rule name.
    pub fn with_rule(field: impl Into<String>, message: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            rule: Some(rule.into()),
            ..Self::new(field, message)
        }
    }

    /// Moves the field under `parent`.
    #[must_use]
    pub fn nested(mut self, parent: &str) -> Self {
        self.field.insert(0, '.');
        self.field.insert_str(0, parent);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)?;
        if let Some(rule) = &self.rule {
            write!(f, " [{rule}]")?;
        }
        Ok(())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Io => Self::Serialization(err.to_string()),
            _ => Self::Deserialization(err.to_string()),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Deserialization(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Configuration sections that can check their own fields.
pub trait Validate {
    /// All failed checks; empty when valid.
    fn validate(&self) -> Vec<ValidationError>;

    /// True when [`validate`](Self::validate) finds nothing.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Converts failed checks into [`ConfigError::Invalid`].
    fn validate_or_error(&self) -> ConfigResult<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}
