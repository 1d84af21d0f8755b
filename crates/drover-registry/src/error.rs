/// Errors produced by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("name is empty after normalization")]
    EmptyName,

    #[error("conflict on {field}: {value:?} already exists")]
    Conflict { field: &'static str, value: String },

    #[error("registry row not found: {0:?}")]
    NotFound(String),

    #[error("registry lock poisoned")]
    Poisoned,
}

pub type RegistryResult<T> = Result<T, RegistryError>;
