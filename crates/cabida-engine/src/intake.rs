//! Turning a certificate-backed project request into engine parameters
//!
//! Shape problems (a field we cannot compute without, or a value outside the
//! accepted request bounds) are reported as [`InputError`] before the engine
//! runs. Everything else is left to the rules.

use oguc_types::{CalculationParameters, CertificateData, DEFAULT_MIN_DWELLING_AREA};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_FLOORS: u32 = 1;
pub const MAX_FLOORS: u32 = 50;

/// Smallest minimum-dwelling-area a request may ask for (m²)
pub const MIN_DWELLING_AREA_FLOOR: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("No se pudo extraer la superficie del terreno del certificado")]
    MissingSurfaceArea,

    #[error("Número de pisos inválido ({0}): debe estar entre 1 y 50")]
    FloorsOutOfRange(u32),

    #[error("Superficie mínima por vivienda inválida ({0}m²): debe ser al menos 20m²")]
    MinDwellingAreaTooSmall(f64),
}

/// A project evaluated against the data of one certificate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRequest {
    pub certificate_data: CertificateData,
    pub floors: u32,
    pub zone_type: String,
    #[serde(default = "default_min_dwelling_area")]
    pub min_dwelling_area: f64,
}

fn default_min_dwelling_area() -> f64 {
    DEFAULT_MIN_DWELLING_AREA
}

impl ProjectRequest {
    pub fn new(
        certificate_data: CertificateData,
        floors: u32,
        zone_type: impl Into<String>,
    ) -> Self {
        Self {
            certificate_data,
            floors,
            zone_type: zone_type.into(),
            min_dwelling_area: DEFAULT_MIN_DWELLING_AREA,
        }
    }

    /// Reject requests outside the accepted floor and dwelling-area bounds
    pub fn check_bounds(&self) -> Result<(), InputError> {
        if !(MIN_FLOORS..=MAX_FLOORS).contains(&self.floors) {
            return Err(InputError::FloorsOutOfRange(self.floors));
        }
        if self.min_dwelling_area.is_nan() || self.min_dwelling_area < MIN_DWELLING_AREA_FLOOR {
            return Err(InputError::MinDwellingAreaTooSmall(self.min_dwelling_area));
        }
        Ok(())
    }

    /// Build engine parameters, applying certificate defaults for the
    /// optional values. Fails only when the surface could not be read.
    pub fn to_parameters(&self) -> Result<CalculationParameters, InputError> {
        let surface_area = self
            .certificate_data
            .surface_area()
            .ok_or(InputError::MissingSurfaceArea)?;
        Ok(self.parameters_for_surface(surface_area))
    }

    pub(crate) fn parameters_for_surface(&self, surface_area: f64) -> CalculationParameters {
        let cert = &self.certificate_data;
        CalculationParameters {
            surface_area,
            floors: self.floors,
            max_height: cert.max_height_or_default(),
            constructibility_coefficient: cert.coefficient_or_default(),
            occupation_percentage: cert.occupation_or_default(),
            zone_type: self.zone_type.clone(),
            min_dwelling_area: self.min_dwelling_area,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn certificate(surface: Option<f64>) -> CertificateData {
        CertificateData {
            superficie_terreno: surface,
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_surface_is_an_input_error() {
        let request = ProjectRequest::new(certificate(None), 3, "residencial");
        assert_eq!(request.to_parameters(), Err(InputError::MissingSurfaceArea));

        let request = ProjectRequest::new(certificate(Some(0.0)), 3, "residencial");
        assert_eq!(request.to_parameters(), Err(InputError::MissingSurfaceArea));
    }

    #[test]
    fn test_parameters_use_certificate_defaults() {
        let request = ProjectRequest::new(certificate(Some(500.0)), 3, "comercial");
        let params = request.to_parameters().unwrap();

        assert_eq!(
            params,
            CalculationParameters {
                surface_area: 500.0,
                floors: 3,
                max_height: 23.0,
                constructibility_coefficient: 1.0,
                occupation_percentage: 60.0,
                zone_type: "comercial".to_string(),
                min_dwelling_area: 40.0,
            }
        );
    }

    #[test]
    fn test_bounds() {
        let mut request = ProjectRequest::new(certificate(Some(500.0)), 0, "residencial");
        assert_eq!(request.check_bounds(), Err(InputError::FloorsOutOfRange(0)));

        request.floors = 51;
        assert_eq!(request.check_bounds(), Err(InputError::FloorsOutOfRange(51)));

        request.floors = 50;
        request.min_dwelling_area = 15.0;
        assert_eq!(
            request.check_bounds(),
            Err(InputError::MinDwellingAreaTooSmall(15.0))
        );

        request.min_dwelling_area = 20.0;
        assert_eq!(request.check_bounds(), Ok(()));
    }

    #[test]
    fn test_request_deserializes_with_default_dwelling_area() {
        let request: ProjectRequest = serde_json::from_str(
            r#"{"certificate_data": {"superficie_terreno": 500.0}, "floors": 3, "zone_type": "mixto"}"#,
        )
        .unwrap();
        assert_eq!(request.min_dwelling_area, 40.0);
        assert_eq!(request.certificate_data.surface_area(), Some(500.0));
    }
}
