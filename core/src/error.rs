//! Error types for ledger operations.

use thiserror::Error;

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Error taxonomy for the registration ledger.
///
/// Every precondition failure is reported synchronously as one of these
/// three kinds and causes zero mutation. The ledger never panics on bad
/// input; mapping kinds to transport-level codes is the caller's concern,
/// which is why the kinds stay distinguishable via the `is_*` predicates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A referenced record or entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What kind of entity was looked up (e.g. "registration")
        kind: &'static str,
        /// The identifier that failed to resolve
        id: String,
    },

    /// An input field is malformed or referentially invalid.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// The offending input field
        field: &'static str,
        /// Why the field was rejected
        reason: String,
    },

    /// The operation would violate a ledger invariant.
    #[error("conflict: {reason}")]
    Conflict {
        /// The invariant that would be violated
        reason: String,
    },
}

impl LedgerError {
    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }

    /// Returns `true` if this error is a missing-entity error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this error is a bad-input error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns `true` if this error is an invariant conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
