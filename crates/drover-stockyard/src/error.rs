use std::fmt;

/// Errors produced by stockyard operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StockyardError {
    #[error("validation failed on {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("conflict on {field}: {value:?} already exists")]
    Conflict { field: &'static str, value: String },

    #[error("{field} references missing {entity} {id}")]
    Referential {
        field: &'static str,
        entity: &'static str,
        id: String,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("transfer transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl StockyardError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn conflict(field: &'static str, value: impl Into<String>) -> Self {
        Self::Conflict {
            field,
            value: value.into(),
        }
    }

    pub fn referential(field: &'static str, entity: &'static str, id: impl fmt::Display) -> Self {
        Self::Referential {
            field,
            entity,
            id: id.to_string(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub type StockResult<T> = Result<T, StockyardError>;
