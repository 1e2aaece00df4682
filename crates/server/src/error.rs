use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use semsearch_common::SemSearchError;
use serde::Serialize;
use std::fmt;

/// JSON body for error responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Wrapper mapping `SemSearchError` onto HTTP responses
#[derive(Debug)]
pub struct ApiError(pub SemSearchError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<SemSearchError> for ApiError {
    fn from(err: SemSearchError) -> Self {
        Self(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.0.to_string(),
        })
    }
}
