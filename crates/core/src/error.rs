//! Domain error type shared by the db and api crates.

use crate::types::DbId;

/// Errors raised by domain rules and the logic layer.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A record addressed by id does not exist (or is no longer listed).
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Submitted fields failed a publish or interaction rule.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A uniqueness rule was violated, e.g. a project uri already taken.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::Validation`] with a borrowed message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
