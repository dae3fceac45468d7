//! Unified error types for the domain layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of domain errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Data directory or `config.json` missing or unreadable.
    Setup,
    /// Declared table or file (or its sidecar manifest) not found.
    NotFound,
    /// Argument has the wrong type or shape (e.g. a string where a list is required).
    InvalidType,
    /// Argument has the right type but an unacceptable value.
    InvalidValue,
    /// Internal error (I/O, serialization).
    Internal,
}

/// Domain-level error with structured context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KbcError {
    /// The kind of error.
    pub kind: ErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional context.
    pub context: Option<String>,
}

impl KbcError {
    /// Creates a new `KbcError`.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: None,
        }
    }

    /// Adds context to the error.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Creates a setup error.
    pub fn setup(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Setup, message)
    }

    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Creates an invalid-type error.
    pub fn invalid_type(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidType, message)
    }

    /// Creates an invalid-value error.
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidValue, message)
    }

    /// Returns `true` for type/shape violations.
    pub fn is_type_error(&self) -> bool {
        self.kind == ErrorKind::InvalidType
    }

    /// Returns `true` for value violations.
    pub fn is_value_error(&self) -> bool {
        self.kind == ErrorKind::InvalidValue
    }
}

impl fmt::Display for KbcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, " ({})", ctx)?;
        }
        Ok(())
    }
}

impl std::error::Error for KbcError {}

/// Transforms technical errors into user-actionable diagnostics.
///
/// Implementors provide optional `hint` (cause explanation) and `fix`
/// (concrete remediation step) for each error variant.
pub trait DiagnosticError {
    /// A human-readable explanation of the likely cause.
    fn hint(&self) -> Option<String> {
        None
    }
    /// A concrete fix the user can apply.
    fn fix(&self) -> Option<String> {
        None
    }
}

impl DiagnosticError for KbcError {
    fn hint(&self) -> Option<String> {
        match self.kind {
            ErrorKind::InvalidType => {
                Some("A manifest argument has the wrong JSON type.".into())
            }
            ErrorKind::InvalidValue => {
                Some("A manifest argument is missing a required key or value.".into())
            }
            _ => None,
        }
    }
}
