//! Error types returned by the lineage traversal engine.

use thiserror::Error;

/// Errors that can terminate a [`crate::engine::get_lineage`] call.
///
/// `DeadlineReached` and an empty registry lookup are deliberately **not**
/// modeled here: both are normal, silent outcomes handled inline by the
/// engine rather than surfaced as errors. See the crate-level docs for the
/// full error-handling policy.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A [`crate::query::Criterion`] used a condition other than `EQUAL`.
    #[error("invalid filter condition on field `{field}`: only EQUAL is supported")]
    InvalidFilterCondition {
        /// The field the unsupported condition was attached to.
        field: String,
    },

    /// The injected search backend returned an error for a batch.
    #[error("search backend error: {0}")]
    SearchBackendError(String),

    /// Cloning an accumulated path failed.
    ///
    /// Paths contain only urns, so this should be practically unreachable;
    /// it exists to keep the error type total rather than panicking.
    #[error("failed to clone path during traversal")]
    PathCloneFailure,
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, EngineError>;
