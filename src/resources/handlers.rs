//! Generic CRUD handlers for one resource key.
//!
//! # Responsibilities
//! - GET: list / filter by query and path segment
//! - PUT: decode a draft and create
//! - PATCH: merge a partial JSON object into one addressed record
//! - DELETE: remove one addressed record
//!
//! # Design Decisions
//! - Bodies must be JSON objects; anything else is a decode failure
//! - An empty PATCH body is an empty partial

use axum::http::{Method, StatusCode};
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::http::{ApiError, Request, Response};
use crate::routing::Route;
use crate::store::{Record, RecordStore, StoreError, ID_FIELD};

/// Handlers for the collection of `R` stored under `key`.
pub struct Resource<R> {
    key: String,
    store: Arc<RecordStore>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Resource<R> {
    pub fn new(key: impl Into<String>, store: Arc<RecordStore>) -> Self {
        Self {
            key: key.into(),
            store,
            _record: PhantomData,
        }
    }

    /// Route prefix, `/<key>`.
    pub fn path(&self) -> String {
        format!("/{}", self.key)
    }

    /// The four routes serving this resource.
    pub fn routes(self) -> Vec<Route> {
        let path = self.path();
        let this = Arc::new(self);

        let get = Arc::clone(&this);
        let create = Arc::clone(&this);
        let update = Arc::clone(&this);
        let delete = this;

        vec![
            Route::new(Method::GET, path.clone(), move |req: &Request| get.get(req)),
            Route::new(Method::PUT, path.clone(), move |req: &Request| create.create(req)),
            Route::new(Method::PATCH, path.clone(), move |req: &Request| update.update(req)),
            Route::new(Method::DELETE, path, move |req: &Request| delete.delete(req)),
        ]
    }

    pub fn get(&self, request: &Request) -> Response {
        let params = request.address(ID_FIELD);
        match self.store.find_matching::<R>(&self.key, &params) {
            Ok(records) => Response::for_records(&records),
            Err(e) => self.failure(e),
        }
    }

    pub fn create(&self, request: &Request) -> Response {
        let draft = match self.decode_object(&request.body).and_then(|object| {
            serde_json::from_value::<R::Draft>(Value::Object(object)).map_err(|e| e.to_string())
        }) {
            Ok(draft) => draft,
            Err(reason) => {
                tracing::debug!(key = %self.key, reason = %reason, "Rejected create body");
                return ApiError::DecodeFailed(R::NAME).into_response();
            }
        };

        match self.store.create::<R>(&self.key, draft) {
            Ok(_) => Response::for_status(StatusCode::OK, &format!("{} successfully created", R::NAME)),
            Err(e) => self.failure(e),
        }
    }

    pub fn update(&self, request: &Request) -> Response {
        let partial = if request.body.trim().is_empty() {
            Map::new()
        } else {
            match self.decode_object(&request.body) {
                Ok(object) => object,
                Err(reason) => {
                    tracing::debug!(key = %self.key, reason = %reason, "Rejected update body");
                    return ApiError::DecodeFailed(R::NAME).into_response();
                }
            }
        };

        let address = request.address(ID_FIELD);
        match self.store.update::<R>(&self.key, &address, &partial) {
            Ok(()) => Response::for_status(StatusCode::OK, &format!("{} successfully updated", R::NAME)),
            Err(e) => self.failure(e),
        }
    }

    pub fn delete(&self, request: &Request) -> Response {
        let address = request.address(ID_FIELD);
        match self.store.delete::<R>(&self.key, &address) {
            Ok(()) => Response::for_status(StatusCode::OK, &format!("{} successfully deleted", R::NAME)),
            Err(e) => self.failure(e),
        }
    }

    fn decode_object(&self, body: &str) -> Result<Map<String, Value>, String> {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(object)) => Ok(object),
            Ok(_) => Err("body is not a JSON object".to_string()),
            Err(e) => Err(e.to_string()),
        }
    }

    fn failure(&self, err: StoreError) -> Response {
        tracing::debug!(key = %self.key, error = %err, "Store operation failed");
        ApiError::from_store(err, R::NAME).into_response()
    }
}
