//! Uploaded file to certificate text

use oguc_types::CertificateData;
use tracing::{debug, info, warn};

use super::certificate::{extract_certificate_data, looks_like_certificate};
use super::ExtractionError;

/// Extensions accepted by [`process_file`]
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".pdf", ".txt", ".jpg", ".jpeg", ".png"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Text,
    Image,
}

impl DocumentFormat {
    /// Detect the format from the file extension (case-insensitive)
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let lower = filename.to_lowercase();
        let extension = lower
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or_default();

        match extension {
            "pdf" => Ok(DocumentFormat::Pdf),
            "txt" => Ok(DocumentFormat::Text),
            "jpg" | "jpeg" | "png" => Ok(DocumentFormat::Image),
            _ => Err(ExtractionError::UnsupportedFormat(filename.to_string())),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Text => "text/plain",
            DocumentFormat::Image => "image/*",
        }
    }
}

/// Raw text of the document, without any field parsing
pub fn extract_text(data: &[u8], format: DocumentFormat) -> Result<String, ExtractionError> {
    match format {
        DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(data)
            .map_err(|e| ExtractionError::InvalidPdf(e.to_string())),
        DocumentFormat::Text => Ok(String::from_utf8(data.to_vec())?),
        DocumentFormat::Image => Err(ExtractionError::OcrUnavailable),
    }
}

/// Read an uploaded certificate and extract its fields
pub fn process_file(data: &[u8], filename: &str) -> Result<CertificateData, ExtractionError> {
    let format = DocumentFormat::from_filename(filename)?;
    info!(filename, ?format, size = data.len(), "processing certificate upload");

    let text = extract_text(data, format)?;
    debug!(chars = text.len(), "text extracted");

    if !looks_like_certificate(&text) {
        warn!(filename, "upload does not look like a certificate");
        return Err(ExtractionError::NotACertificate);
    }

    Ok(extract_certificate_data(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            DocumentFormat::from_filename("cip.PDF").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_filename("notas.v2.txt").unwrap(),
            DocumentFormat::Text
        );
        assert_eq!(
            DocumentFormat::from_filename("scan.jpeg").unwrap(),
            DocumentFormat::Image
        );
        assert!(matches!(
            DocumentFormat::from_filename("planilla.xlsx"),
            Err(ExtractionError::UnsupportedFormat(_))
        ));
        assert!(DocumentFormat::from_filename("sin_extension").is_err());
    }

    #[test]
    fn test_process_text_certificate() {
        let text = "Municipalidad de Providencia\nRol: 321-7\nSuperficie terreno: 450 m²\n";
        let data = process_file(text.as_bytes(), "certificado.txt").unwrap();

        assert_eq!(data.rol.as_deref(), Some("321-7"));
        assert_eq!(data.superficie_terreno, Some(450.0));
    }

    #[test]
    fn test_images_need_ocr() {
        let result = process_file(&[0xFF, 0xD8, 0xFF], "foto.jpg");
        assert!(matches!(result, Err(ExtractionError::OcrUnavailable)));
    }

    #[test]
    fn test_non_certificate_text() {
        let result = process_file(b"Lista de compras: pan, leche", "notas.txt");
        assert!(matches!(result, Err(ExtractionError::NotACertificate)));
    }

    #[test]
    fn test_invalid_utf8_text() {
        let result = process_file(&[0xC3, 0x28], "certificado.txt");
        assert!(matches!(result, Err(ExtractionError::InvalidEncoding(_))));
    }

    #[test]
    fn test_garbage_pdf() {
        let result = process_file(b"not a pdf at all", "certificado.pdf");
        assert!(matches!(result, Err(ExtractionError::InvalidPdf(_))));
    }
}
