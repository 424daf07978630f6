//! Field extraction for "Certificado de Informaciones Previas"
//!
//! Certificates are issued by each municipality with slightly different
//! layouts; the patterns only rely on the "Label: value" lines that all of
//! them share.

use lazy_static::lazy_static;
use oguc_types::{AdditionalData, CertificateData};
use regex::Regex;
use tracing::debug;

use super::numeric::parse_decimal;

lazy_static! {
    static ref ROL_PATTERN: Regex = Regex::new(r"(?i)Rol:\s*(\d+-\d+)").unwrap();
    static ref SURFACE_PATTERN: Regex =
        Regex::new(r"(?i)Superficie\s*(?:terreno|del terreno):\s*([\d.,]+)\s*m[²2]").unwrap();
    static ref ADDRESS_PATTERN: Regex = Regex::new(r"(?i)Dirección:\s*([^\n]+)").unwrap();
    static ref COMUNA_PATTERN: Regex = Regex::new(r"(?i)Comuna:\s*([^\n]+)").unwrap();
    static ref OWNER_PATTERN: Regex = Regex::new(r"(?i)Propietario:\s*([^\n]+)").unwrap();
    static ref LAND_USE_PATTERN: Regex = Regex::new(r"(?i)Uso\s*de\s*suelo:\s*([^\n]+)").unwrap();
    static ref ZONE_PATTERN: Regex = Regex::new(r"(?i)Zona:\s*([^\n]+)").unwrap();
    static ref HEIGHT_PATTERN: Regex =
        Regex::new(r"(?i)Altura\s*máxima:\s*([\d.,]+)\s*m").unwrap();
    static ref COEFFICIENT_PATTERN: Regex =
        Regex::new(r"(?i)Coeficiente\s*de\s*constructibilidad:\s*([\d.,]+)").unwrap();
    static ref OCCUPATION_PATTERN: Regex =
        Regex::new(r"(?i)Porcentaje\s*de\s*ocupación:\s*([\d.,]+)%").unwrap();

    static ref COORDINATES_PATTERN: Regex =
        Regex::new(r"(\d+°\d+'\d+[NS])\s*(\d+°\d+'\d+[WE])").unwrap();
    static ref DATE_PATTERN: Regex = Regex::new(
        r"(?i)(\d{1,2})\s*de\s*(enero|febrero|marzo|abril|mayo|junio|julio|agosto|septiembre|octubre|noviembre|diciembre)\s*de\s*(\d{4})"
    )
    .unwrap();
    static ref CERTIFICATE_NUMBER_PATTERN: Regex = Regex::new(r"N[°o]\s*(\d+/\d{4})").unwrap();
}

/// Phrases that identify a certificate; one match is enough
pub const CERTIFICATE_KEYWORDS: &[&str] = &[
    "certificado de informaciones previas",
    "municipalidad",
    "rol",
    "superficie",
];

pub fn looks_like_certificate(text: &str) -> bool {
    let text_lower = text.to_lowercase();
    CERTIFICATE_KEYWORDS
        .iter()
        .any(|keyword| text_lower.contains(keyword))
}

fn capture_text(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| !v.is_empty())
}

fn capture_number(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| parse_decimal(m.as_str()))
}

/// Pull every recognised field out of the certificate text. Fields that are
/// absent or unreadable stay `None`.
pub fn extract_certificate_data(text: &str) -> CertificateData {
    let additional = extract_additional_data(text);

    let data = CertificateData {
        rol: capture_text(&ROL_PATTERN, text),
        comuna: capture_text(&COMUNA_PATTERN, text),
        superficie_terreno: capture_number(&SURFACE_PATTERN, text),
        direccion: capture_text(&ADDRESS_PATTERN, text),
        nombre_propietario: capture_text(&OWNER_PATTERN, text),
        uso_suelo: capture_text(&LAND_USE_PATTERN, text),
        zona: capture_text(&ZONE_PATTERN, text),
        altura_maxima: capture_number(&HEIGHT_PATTERN, text),
        coeficiente_constructibilidad: capture_number(&COEFFICIENT_PATTERN, text),
        porcentaje_ocupacion: capture_number(&OCCUPATION_PATTERN, text),
        raw_text: Some(text.to_string()),
        additional_data: (!additional.is_empty()).then_some(additional),
    };

    debug!(
        rol = ?data.rol,
        superficie = ?data.superficie_terreno,
        "certificate fields extracted"
    );

    data
}

/// Coordinates, issue date and certificate number, when printed
pub fn extract_additional_data(text: &str) -> AdditionalData {
    let coordinates = COORDINATES_PATTERN
        .captures(text)
        .map(|c| format!("{} {}", &c[1], &c[2]));

    let certificate_date = DATE_PATTERN
        .captures(text)
        .map(|c| format!("{} {} {}", &c[1], &c[2], &c[3]));

    let certificate_number = CERTIFICATE_NUMBER_PATTERN
        .captures(text)
        .map(|c| c[1].to_string());

    AdditionalData {
        coordinates,
        certificate_date,
        certificate_number,
    }
}
