//! Error handling for annokit
//!
//! Annotation operations fail in one of five ways:
//! - `NotFound`: a lookup or mutation named a shape id that is not cached
//! - `Conflict`: an insert reused an id that is already cached
//! - `InvalidOperand`: an unknown event name, JSON type tag, color or matrix
//! - `PreconditionViolation`: the call cannot produce any sensible result
//! - `NotInitialized`: a geometry query ran before the shape was rendered
//!
//! Only `PreconditionViolation` is fatal to the call. The other kinds are
//! logged by the caller and the offending item is skipped.

use thiserror::Error;

/// Annotation error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnotationError {
    /// Unknown shape id
    #[error("There is no shape with ID {id}")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    /// Duplicate shape id on insert
    #[error("ID {id} already in use")]
    Conflict {
        /// The id that is already cached.
        id: String,
    },

    /// Value the operation does not understand
    #[error("Invalid {what}: {value}")]
    InvalidOperand {
        /// Kind of operand (event name, shape type, color, ...).
        what: String,
        /// The rejected value.
        value: String,
    },

    /// The call has no sensible fallback result
    #[error("Precondition violated: {reason}")]
    PreconditionViolation {
        /// Why the precondition does not hold.
        reason: String,
    },

    /// Geometry query before the renderable exists
    #[error("{what} not initialized")]
    NotInitialized {
        /// What was queried.
        what: String,
    },
}

impl AnnotationError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn conflict(id: impl Into<String>) -> Self {
        Self::Conflict { id: id.into() }
    }

    pub fn invalid_operand(what: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidOperand {
            what: what.into(),
            value: value.into(),
        }
    }

    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::PreconditionViolation {
            reason: reason.into(),
        }
    }

    pub fn not_initialized(what: impl Into<String>) -> Self {
        Self::NotInitialized { what: what.into() }
    }

    /// Fatal errors abort the call; every other kind is skipped by batches.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::PreconditionViolation { .. })
    }
}

/// Main error type for annokit
#[derive(Error, Debug)]
pub enum Error {
    /// Annotation error
    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this wraps an annotation precondition violation
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::Annotation(AnnotationError::PreconditionViolation { .. })
        )
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
