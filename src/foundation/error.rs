use crate::foundation::core::TargetId;

/// Convenience result type used across the engine.
pub type ActionResult<T> = Result<T, ActionError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ActionError {
    /// Invalid constructor input (negative duration, too few control points, zero counts, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// An action was driven out of order (started twice, stepped before start, ...).
    #[error("state error: {0}")]
    State(String),

    /// `reverse()` was requested on an action that has no canonical inverse.
    #[error("action is not reversible: {0}")]
    NotReversible(&'static str),

    /// The target handle did not resolve through the supplied `Targets`.
    #[error("unknown target: {0}")]
    UnknownTarget(TargetId),

    /// Errors bubbling up from callers' own code (callbacks, CLI IO, ...).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ActionError {
    /// Build a [`ActionError::Validation`] error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ActionError::State`] error.
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
