//! Error types for the cabida server

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cabida_engine::extractors::ExtractionError;
use cabida_engine::InputError;
use serde::Serialize;
use thiserror::Error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Formato de archivo no permitido: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Extraction(String),

    #[error("Archivo demasiado grande. Tamaño máximo: {max_mb:.1}MB")]
    PayloadTooLarge { max_mb: f64 },

    #[error("Solicitud inválida: {0}")]
    InvalidRequest(String),

    #[error("Error interno: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl From<ExtractionError> for ServerError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::UnsupportedFormat(name) => ServerError::UnsupportedFormat(name),
            other => ServerError::Extraction(other.to_string()),
        }
    }
}

// Malformed request shapes share the JSON error body with every other failure
impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        ServerError::InvalidRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for ServerError {
    fn from(rejection: MultipartRejection) -> Self {
        ServerError::InvalidRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ServerError {
    fn from(err: MultipartError) -> Self {
        ServerError::InvalidRequest(err.body_text())
    }
}

impl ServerError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ServerError::Input(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            ServerError::UnsupportedFormat(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FORMAT")
            }
            ServerError::Extraction(_) => (StatusCode::BAD_REQUEST, "EXTRACTION_FAILED"),
            ServerError::PayloadTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE")
            }
            ServerError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_bad_requests() {
        let err = ServerError::from(InputError::MissingSurfaceArea);
        assert_eq!(err.status_and_code().0, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "No se pudo extraer la superficie del terreno del certificado"
        );
    }

    #[test]
    fn test_extraction_error_mapping() {
        let unsupported = ServerError::from(ExtractionError::UnsupportedFormat("a.doc".into()));
        assert_eq!(
            unsupported.status_and_code(),
            (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FORMAT")
        );

        let not_cert = ServerError::from(ExtractionError::NotACertificate);
        assert_eq!(
            not_cert.status_and_code(),
            (StatusCode::BAD_REQUEST, "EXTRACTION_FAILED")
        );
    }

    #[test]
    fn test_missing_json_content_type_is_invalid_request() {
        let err = ServerError::from(JsonRejection::MissingJsonContentType(Default::default()));
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, "INVALID_REQUEST")
        );
        assert!(err.to_string().starts_with("Solicitud inválida: "));
    }

    #[test]
    fn test_oversized_message() {
        let err = ServerError::PayloadTooLarge { max_mb: 10.0 };
        assert_eq!(err.to_string(), "Archivo demasiado grande. Tamaño máximo: 10.0MB");
    }
}
