use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use distill_common::DistillError;
use std::fmt;
use tracing::error;

use crate::types::ErrorResponse;

/// [`DistillError`] rendered as a JSON HTTP response
#[derive(Debug)]
pub struct ApiError(pub DistillError);

impl From<DistillError> for ApiError {
    fn from(err: DistillError) -> Self {
        Self(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }
        HttpResponse::build(status).json(ErrorResponse {
            error: self.0.to_string(),
        })
    }
}
