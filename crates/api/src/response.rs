//! Response envelope for API handlers.
//!
//! Every successful body is `{ "data": ... }`; errors use the
//! `{ "error", "code" }` shape from [`crate::error::AppError`].

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// `{ "data": T }` envelope, returned directly from handlers.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for DataResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
