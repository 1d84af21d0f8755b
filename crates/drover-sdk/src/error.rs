use drover_registry::RegistryError;
use drover_stockyard::StockyardError;
use drover_types::TypeError;

/// Unified error for the high-level API.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DroverError {
    #[error("invalid {field}: {source}")]
    InvalidDate {
        field: &'static str,
        source: TypeError,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Stockyard(#[from] StockyardError),
}

/// Coarse classification used at the service boundary to pick a response
/// shape without matching every inner variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    Referential,
    NotFound,
    Transaction,
    Internal,
}

impl DroverError {
    pub fn invalid_date(field: &'static str) -> impl FnOnce(TypeError) -> Self {
        move |source| Self::InvalidDate { field, source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDate { .. } => ErrorKind::Validation,
            Self::Registry(RegistryError::EmptyName) => ErrorKind::Validation,
            Self::Registry(RegistryError::Conflict { .. }) => ErrorKind::Conflict,
            Self::Registry(RegistryError::NotFound(_)) => ErrorKind::NotFound,
            Self::Registry(RegistryError::Poisoned) => ErrorKind::Internal,
            Self::Stockyard(StockyardError::Validation { .. }) => ErrorKind::Validation,
            Self::Stockyard(StockyardError::Conflict { .. }) => ErrorKind::Conflict,
            Self::Stockyard(StockyardError::Referential { .. }) => ErrorKind::Referential,
            Self::Stockyard(StockyardError::NotFound { .. }) => ErrorKind::NotFound,
            Self::Stockyard(StockyardError::TransactionFailed { .. }) => ErrorKind::Transaction,
            Self::Stockyard(StockyardError::Internal(_)) => ErrorKind::Internal,
        }
    }
}

pub type DroverResult<T> = Result<T, DroverError>;
