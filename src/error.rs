use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Taxonomía de fallos de la aplicación. Ninguno es fatal: todos quedan
// acotados al request que los produjo.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("no se encontró {0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("no tienes permiso para hacer eso")]
    Forbidden,

    #[error("{0}")]
    Validation(String),

    #[error("{0} ya existe")]
    Conflict(&'static str),

    #[error("{0}")]
    Internal(String),

    #[error("error de base de datos: {0}")]
    Store(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(msg) => {
                tracing::error!("Error interno: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Store(e) => {
                tracing::error!("Error de base de datos: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
