//! Error types shared across the listshare crates.
//!
//! - [`StoreError`] - a store operation was rejected; state is unchanged
//! - [`ValidationError`] / [`ValidationErrors`] - caller-level form checks
//! - [`PersistenceError`] - the persistence port failed to load or save
//! - [`ConfigError`] - configuration could not be read or parsed
//! - [`AppError`] - what an [`crate::app::App`] operation can fail with

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A single failed form or payload check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every violation found by one validator, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(ValidationError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn for_field(&self, field: &str) -> Option<&ValidationError> {
        self.0.iter().find(|err| err.field == field)
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for err in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Broad class of a rejected operation, used by shells to pick a message style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Validation => "validation",
        }
    }
}

/// A store operation that was rejected. Not-found ids are never errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation(message) => message,
        }
    }
}

impl From<ValidationErrors> for StoreError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("storage io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode or decode stored data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to render yaml export: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid configuration value for '{key}': {reason}")]
    Invalid { key: String, reason: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn validation_errors_render_in_order() {
        let mut errors = ValidationErrors::default();
        errors.push("username", "Username is required");
        errors.push("password", "Password is required");
        assert_eq!(
            errors.to_string(),
            "username: Username is required; password: Password is required"
        );
        assert!(errors.for_field("password").is_some());
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn store_error_reports_validation_category() {
        let err = StoreError::validation("Please enter a task title");
        assert_eq!(err.category().label(), "validation");
        assert_eq!(err.message(), "Please enter a task title");
    }
}
