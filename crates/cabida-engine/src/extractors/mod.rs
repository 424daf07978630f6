//! Certificate ingestion
//!
//! `document` turns an uploaded file into text, `certificate` pulls the
//! structured fields out of that text and `numeric` parses the Chilean
//! number formats found on certificates.

pub mod certificate;
pub mod document;
pub mod numeric;

use thiserror::Error;

pub use certificate::{extract_additional_data, extract_certificate_data, looks_like_certificate};
pub use document::{process_file, DocumentFormat, SUPPORTED_EXTENSIONS};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Formato de archivo no soportado: {0}")]
    UnsupportedFormat(String),

    #[error("Las imágenes requieren OCR, que no está disponible; suba el certificado en PDF")]
    OcrUnavailable,

    #[error("Error procesando PDF: {0}")]
    InvalidPdf(String),

    #[error("El archivo de texto no está codificado en UTF-8")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),

    #[error("El documento no parece ser un Certificado de Informaciones Previas válido")]
    NotACertificate,
}
