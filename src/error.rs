use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeismicError {
    #[error("Dataset not found: {dataset}")]
    DatasetNotFound { dataset: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("No data found for the requested time range in dataset {dataset}")]
    NoData { dataset: String },

    #[error("Malformed waveform file {filename}: {message}")]
    MalformedFile { filename: String, message: String },

    #[error("Unknown method: {method}")]
    UnknownMethod { method: String },

    #[error("Missing required parameter: {name}")]
    MissingParameter { name: String },

    #[error("Invalid parameter {name}: {message}")]
    InvalidParameter { name: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<std::io::Error> for SeismicError {
    fn from(err: std::io::Error) -> Self {
        SeismicError::Io {
            message: err.to_string(),
        }
    }
}

impl IntoResponse for SeismicError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            SeismicError::DatasetNotFound { .. }
            | SeismicError::FileNotFound { .. }
            | SeismicError::NoData { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            SeismicError::MalformedFile { .. }
            | SeismicError::UnknownMethod { .. }
            | SeismicError::MissingParameter { .. }
            | SeismicError::InvalidParameter { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            SeismicError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            SeismicError::Io { ref message } => {
                tracing::error!("IO error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An IO error occurred".to_string(),
                )
            }
            SeismicError::Config { ref message } | SeismicError::Internal { ref message } => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": message,
                "status": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}
