//! Structural compile errors.
//!
//! These abort a compile invocation. They signal a malformed view tree or
//! selection declaration, not a user-facing condition the compiler can work
//! around; those are [`CompileWarning`](crate::diagnostics::CompileWarning)s.

use thiserror::Error;

/// Result type of the compiler passes.
pub type Result<T> = std::result::Result<T, CompileError>;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("view '{view}' is malformed: {reason}")]
    MalformedView { view: String, reason: String },

    #[error("duplicate view name '{0}'")]
    DuplicateView(String),

    #[error("view '{view}' references repeat {reference} outside of a repeated {reference}")]
    UnresolvedRepeat { view: String, reference: &'static str },

    #[error(
        "selection '{name}' is declared in '{first}' and '{second}' with conflicting definitions"
    )]
    ConflictingSelection {
        name: String,
        first: String,
        second: String,
    },

    #[error("selection '{selection}' in view '{view}' projects onto no field")]
    EmptyProjection { selection: String, view: String },

    #[error("view '{0}' is not a unit view")]
    NotAUnit(String),
}
