//! Data read from a "Certificado de Informaciones Previas"
//!
//! Every field is optional: extraction is best-effort and callers decide
//! which gaps are fatal.

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_CONSTRUCTIBILITY_COEF, DEFAULT_MAX_HEIGHT, DEFAULT_OCCUPATION_PERCENTAGE};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateData {
    pub rol: Option<String>,
    pub comuna: Option<String>,
    pub superficie_terreno: Option<f64>,
    pub direccion: Option<String>,
    pub nombre_propietario: Option<String>,
    pub uso_suelo: Option<String>,
    pub zona: Option<String>,
    pub altura_maxima: Option<f64>,
    pub coeficiente_constructibilidad: Option<f64>,
    pub porcentaje_ocupacion: Option<f64>,
    pub raw_text: Option<String>,
    pub additional_data: Option<AdditionalData>,
}

/// Secondary references found anywhere in the certificate text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionalData {
    pub coordinates: Option<String>,
    pub certificate_date: Option<String>,
    pub certificate_number: Option<String>,
}

impl AdditionalData {
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_none()
            && self.certificate_date.is_none()
            && self.certificate_number.is_none()
    }
}

// A zero read from a certificate means the value was not filled in.
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

fn present_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl CertificateData {
    /// Parcel surface, `None` when missing or zero
    pub fn surface_area(&self) -> Option<f64> {
        present(self.superficie_terreno)
    }

    pub fn max_height_or_default(&self) -> f64 {
        present(self.altura_maxima).unwrap_or(DEFAULT_MAX_HEIGHT)
    }

    pub fn coefficient_or_default(&self) -> f64 {
        present(self.coeficiente_constructibilidad).unwrap_or(DEFAULT_CONSTRUCTIBILITY_COEF)
    }

    pub fn occupation_or_default(&self) -> f64 {
        present(self.porcentaje_ocupacion).unwrap_or(DEFAULT_OCCUPATION_PERCENTAGE)
    }

    /// True when the calculation will run on the default coefficient,
    /// either because none was extracted or because it equals the default.
    pub fn uses_default_coefficient(&self) -> bool {
        match present(self.coeficiente_constructibilidad) {
            None => true,
            Some(coef) => coef == DEFAULT_CONSTRUCTIBILITY_COEF,
        }
    }

    pub fn has_rol(&self) -> bool {
        present_text(&self.rol)
    }

    pub fn has_comuna(&self) -> bool {
        present_text(&self.comuna)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values_fall_back_to_defaults() {
        let cert = CertificateData::default();
        assert_eq!(cert.surface_area(), None);
        assert_eq!(cert.max_height_or_default(), 23.0);
        assert_eq!(cert.coefficient_or_default(), 1.0);
        assert_eq!(cert.occupation_or_default(), 60.0);
        assert!(cert.uses_default_coefficient());
    }

    #[test]
    fn test_zero_values_count_as_missing() {
        let cert = CertificateData {
            superficie_terreno: Some(0.0),
            altura_maxima: Some(0.0),
            coeficiente_constructibilidad: Some(0.0),
            ..Default::default()
        };
        assert_eq!(cert.surface_area(), None);
        assert_eq!(cert.max_height_or_default(), 23.0);
        assert_eq!(cert.coefficient_or_default(), 1.0);
    }

    #[test]
    fn test_extracted_values_win_over_defaults() {
        let cert = CertificateData {
            superficie_terreno: Some(500.0),
            altura_maxima: Some(14.0),
            coeficiente_constructibilidad: Some(1.6),
            porcentaje_ocupacion: Some(40.0),
            ..Default::default()
        };
        assert_eq!(cert.surface_area(), Some(500.0));
        assert_eq!(cert.max_height_or_default(), 14.0);
        assert_eq!(cert.coefficient_or_default(), 1.6);
        assert_eq!(cert.occupation_or_default(), 40.0);
        assert!(!cert.uses_default_coefficient());
    }

    #[test]
    fn test_blank_identifiers_are_missing() {
        let cert = CertificateData {
            rol: Some("  ".to_string()),
            comuna: Some("Ñuñoa".to_string()),
            ..Default::default()
        };
        assert!(!cert.has_rol());
        assert!(cert.has_comuna());
    }

    #[test]
    fn test_deserializes_partial_payload() {
        let cert: CertificateData =
            serde_json::from_str(r#"{"rol": "123-4", "superficie_terreno": 320.5}"#).unwrap();
        assert_eq!(cert.rol.as_deref(), Some("123-4"));
        assert_eq!(cert.surface_area(), Some(320.5));
        assert!(cert.additional_data.is_none());
    }
}
