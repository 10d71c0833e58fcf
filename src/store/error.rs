use crate::store::backend::BackendError;
use crate::store::record::FieldError;

/// Failure of a record store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A business-equal record is already stored.
    #[error("a business-equal record already exists")]
    Conflict,

    /// The address resolved to no record.
    #[error("address matched no record")]
    NotFound,

    /// The address resolved to more than one record.
    #[error("address matched {0} records")]
    Ambiguous(usize),

    #[error(transparent)]
    InvalidField(#[from] FieldError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("stored value under `{key}` could not be decoded: {source}")]
    Codec {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Short label used for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            StoreError::Conflict => "conflict",
            StoreError::NotFound => "not_found",
            StoreError::Ambiguous(_) => "ambiguous",
            StoreError::InvalidField(_) => "invalid",
            StoreError::Backend(_) | StoreError::Codec { .. } => "storage_error",
        }
    }
}
