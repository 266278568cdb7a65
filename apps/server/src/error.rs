use std::io::Error as IoError;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;
use watches::WatchError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0:#}")]
    Io(#[from] IoError),
    #[error("Address parsing error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),
    #[error(transparent)]
    Watch(#[from] WatchError),
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Watch(error) if error.is_invalid_argument() => StatusCode::BAD_REQUEST,
            Self::Watch(error) if error.is_not_found() => StatusCode::NOT_FOUND,
            Self::Watch(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Io(_) | Self::AddrParse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detail = match self {
            Self::Watch(WatchError::NotFound(_)) => "Watch not found".to_string(),
            Self::Watch(WatchError::Storage(error)) => {
                tracing::error!("Storage unavailable: {error}");
                "Storage unavailable".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorBody { detail })
    }
}
