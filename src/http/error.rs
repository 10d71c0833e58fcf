//! Request error taxonomy.
//!
//! Every variant maps to a distinct status code and message so clients can
//! tell them apart from status plus body alone.

use axum::http::StatusCode;

use crate::http::response::Response;
use crate::store::StoreError;

/// Terminal failure of a single request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("authorization required")]
    AuthInvalid,

    #[error("route not found")]
    RouteNotFound,

    #[error("route inconclusive")]
    RouteAmbiguous,

    /// Body could not be read as the target record shape.
    #[error("failed to interpret json as {0}")]
    DecodeFailed(&'static str),

    #[error("{0} already exists")]
    CreateConflict(&'static str),

    #[error("match not found")]
    RecordNotFound,

    #[error("match inconclusive")]
    AddressAmbiguous,

    #[error("failed to encode data")]
    EncodeFailed,

    #[error("storage failure")]
    StorageFailed,

    /// The transport could not buffer the body as UTF-8 text.
    #[error("unable to read request body")]
    BodyRejected,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::AuthInvalid => StatusCode::UNAUTHORIZED,
            ApiError::RouteNotFound | ApiError::RecordNotFound => StatusCode::NOT_FOUND,
            ApiError::RouteAmbiguous | ApiError::EncodeFailed | ApiError::StorageFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::DecodeFailed(_) | ApiError::AddressAmbiguous | ApiError::BodyRejected => {
                StatusCode::BAD_REQUEST
            }
            ApiError::CreateConflict(_) => StatusCode::CONFLICT,
        }
    }

    pub fn into_response(self) -> Response {
        match self {
            ApiError::AuthInvalid => Response::unauthorized(),
            other => Response::for_status(other.status(), &other.to_string()),
        }
    }

    /// Map a store failure for a record named `record`.
    pub fn from_store(err: StoreError, record: &'static str) -> Self {
        match err {
            StoreError::Conflict => ApiError::CreateConflict(record),
            StoreError::NotFound => ApiError::RecordNotFound,
            StoreError::Ambiguous(_) => ApiError::AddressAmbiguous,
            StoreError::InvalidField(_) => ApiError::DecodeFailed(record),
            StoreError::Backend(_) | StoreError::Codec { .. } => {
                tracing::error!(error = %err, "Record store failure");
                ApiError::StorageFailed
            }
        }
    }
}
