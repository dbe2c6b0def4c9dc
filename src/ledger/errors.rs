//! Ledger error types
//!
//! | Variant | Code | Meaning |
//! |---|---|---|
//! | `NotFound` | SHELF_NOT_FOUND | identifier resolves to no (active) record |
//! | `InvalidInput` | SHELF_INVALID_INPUT | operator supplied an unusable value |
//! | `PreconditionViolated` | SHELF_PRECONDITION_VIOLATED | state forbids the operation |
//! | `Storage` | storage code | filesystem failure, propagated unmodified |
//!
//! Every variant aborts only the current operation.

use std::fmt;

use thiserror::Error;

use crate::storage::StorageError;

/// Entity kinds, for error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Book,
    Member,
    Loan,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Book => "book",
            Entity::Member => "member",
            Entity::Loan => "loan",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: u32 },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("precondition violated: {0}")]
    PreconditionViolated(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LedgerError {
    pub fn not_found(entity: Entity, id: u32) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::PreconditionViolated(msg.into())
    }

    /// Stable error code for responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "SHELF_NOT_FOUND",
            Self::InvalidInput(_) => "SHELF_INVALID_INPUT",
            Self::PreconditionViolated(_) => "SHELF_PRECONDITION_VIOLATED",
            Self::Storage(e) => e.code().code(),
        }
    }

    /// Domain rejections, as opposed to I/O failures
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
