use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::DEFAULT_MIN_DWELLING_AREA;

/// Inputs for one cabida calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationParameters {
    pub surface_area: f64, // Parcel total (m²)
    pub floors: u32,       // Requested floor count
    pub max_height: f64,   // Allowed ceiling (m)
    #[serde(rename = "constructibility_coef")]
    pub constructibility_coefficient: f64,
    pub occupation_percentage: f64, // 0-100
    pub zone_type: String,
    #[serde(default = "default_min_dwelling_area")]
    pub min_dwelling_area: f64,
}

fn default_min_dwelling_area() -> f64 {
    DEFAULT_MIN_DWELLING_AREA
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceStatus {
    #[serde(rename = "APROBADO")]
    Approved,
    #[serde(rename = "RECHAZADO")]
    Rejected,
}

impl ComplianceStatus {
    /// Label printed on reports and summaries
    pub fn label(&self) -> &'static str {
        match self {
            ComplianceStatus::Approved => "APROBADO",
            ComplianceStatus::Rejected => "RECHAZADO",
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, ComplianceStatus::Approved)
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which OGUC rule a rejection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionCategory {
    Surface,
    Coefficient,
    Height,
    Occupation,
}

/// A failed OGUC rule together with the values that failed it.
///
/// The rendered message is the user-facing prose; consumers that need to
/// branch on the kind of failure use [`RejectionReason::category`].
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    SurfaceTooSmall {
        surface: f64,
        minimum: f64,
    },
    CoefficientOutOfRange {
        coefficient: f64,
    },
    HeightExceedsLimit {
        height: f64,
        limit: f64,
    },
    OccupationExceedsZoneMax {
        occupation: f64,
        zone: String,
        max_percentage: f64,
    },
}

impl RejectionReason {
    pub fn category(&self) -> RejectionCategory {
        match self {
            RejectionReason::SurfaceTooSmall { .. } => RejectionCategory::Surface,
            RejectionReason::CoefficientOutOfRange { .. } => RejectionCategory::Coefficient,
            RejectionReason::HeightExceedsLimit { .. } => RejectionCategory::Height,
            RejectionReason::OccupationExceedsZoneMax { .. } => RejectionCategory::Occupation,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::SurfaceTooSmall { surface, minimum } => write!(
                f,
                "Superficie del terreno ({}m²) inferior al mínimo legal ({}m²)",
                decimal(*surface),
                decimal(*minimum)
            ),
            RejectionReason::CoefficientOutOfRange { coefficient } => write!(
                f,
                "Coeficiente de constructibilidad ({}) fuera de rango válido (0.1 - 3.0)",
                decimal(*coefficient)
            ),
            RejectionReason::HeightExceedsLimit { height, limit } => write!(
                f,
                "Altura máxima ({}m) excede límites razonables ({:.0}m)",
                decimal(*height),
                limit
            ),
            RejectionReason::OccupationExceedsZoneMax {
                occupation,
                zone,
                max_percentage,
            } => write!(
                f,
                "Porcentaje de ocupación ({}%) excede máximo para zona {} ({}%)",
                decimal(*occupation),
                zone,
                decimal(*max_percentage)
            ),
        }
    }
}

/// On the wire a reason is just its message; the category stays in-process.
impl Serialize for RejectionReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Renders a measurement the way certificates print it: whole values keep
/// one decimal ("40.0"), very small or very large magnitudes switch to a
/// two-digit exponent ("1e-07", "1.5e+16"), everything else uses the
/// shortest exact form.
pub fn decimal(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return value.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return exponent_form(value);
    }
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn exponent_form(value: f64) -> String {
    let rendered = format!("{:e}", value);
    match rendered.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => rendered,
    }
}

/// Output of one engine run. Metrics are filled in even when rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResult {
    pub total_surface: f64,
    pub max_building_surface: f64,
    pub max_occupation_surface: f64,
    pub allowed_floors: u32,
    pub max_height: f64,
    pub constructibility_utilization: f64,
    pub dwelling_units_max: u64,
    pub compliance_status: ComplianceStatus,
    pub rejection_reasons: Vec<RejectionReason>,
}

impl CalculationResult {
    pub fn is_approved(&self) -> bool {
        self.compliance_status.is_approved()
    }

    pub fn has_reason(&self, category: RejectionCategory) -> bool {
        self.rejection_reasons
            .iter()
            .any(|r| r.category() == category)
    }

    pub fn reason_messages(&self) -> Vec<String> {
        self.rejection_reasons.iter().map(|r| r.message()).collect()
    }
}

/// Calculation result handed to the reporting layer: every reason and
/// recommendation is already final prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationReport {
    pub total_surface: f64,
    pub max_building_surface: f64,
    pub max_occupation_surface: f64,
    pub allowed_floors: u32,
    pub max_height: f64,
    pub constructibility_utilization: f64,
    pub dwelling_units_max: u64,
    pub compliance_status: ComplianceStatus,
    #[serde(default)]
    pub rejection_reasons: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl CalculationReport {
    pub fn new(result: &CalculationResult, recommendations: Vec<String>) -> Self {
        Self {
            total_surface: result.total_surface,
            max_building_surface: result.max_building_surface,
            max_occupation_surface: result.max_occupation_surface,
            allowed_floors: result.allowed_floors,
            max_height: result.max_height,
            constructibility_utilization: result.constructibility_utilization,
            dwelling_units_max: result.dwelling_units_max,
            compliance_status: result.compliance_status,
            rejection_reasons: result.reason_messages(),
            recommendations,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A single validator observation about one input field or rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationFinding {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationFinding {
    pub fn new(field: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity,
        }
    }

    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, Severity::Error)
    }

    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, Severity::Warning)
    }

    pub fn info(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, Severity::Info)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decimal_keeps_one_digit_for_whole_values() {
        assert_eq!(decimal(35.0), "35.0");
        assert_eq!(decimal(500.5), "500.5");
        assert_eq!(decimal(0.0), "0.0");
        assert_eq!(decimal(-2.0), "-2.0");
    }

    #[test]
    fn test_rejection_messages() {
        let surface = RejectionReason::SurfaceTooSmall {
            surface: 35.0,
            minimum: 40.0,
        };
        assert_eq!(
            surface.message(),
            "Superficie del terreno (35.0m²) inferior al mínimo legal (40.0m²)"
        );

        let height = RejectionReason::HeightExceedsLimit {
            height: 60.0,
            limit: 50.0,
        };
        assert_eq!(
            height.message(),
            "Altura máxima (60.0m) excede límites razonables (50m)"
        );

        let occupation = RejectionReason::OccupationExceedsZoneMax {
            occupation: 85.0,
            zone: "residencial".to_string(),
            max_percentage: 60.0,
        };
        assert_eq!(
            occupation.message(),
            "Porcentaje de ocupación (85.0%) excede máximo para zona residencial (60.0%)"
        );
    }

    #[test]
    fn test_rejection_reason_serializes_as_message() {
        let reason = RejectionReason::CoefficientOutOfRange { coefficient: 5.0 };
        assert_eq!(reason.category(), RejectionCategory::Coefficient);
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(
            json,
            serde_json::json!(
                "Coeficiente de constructibilidad (5.0) fuera de rango válido (0.1 - 3.0)"
            )
        );
    }

    #[test]
    fn test_decimal_matches_certificate_notation() {
        assert_eq!(decimal(40.0), "40.0");
        assert_eq!(decimal(0.0), "0.0");
        assert_eq!(decimal(-3.0), "-3.0");
        assert_eq!(decimal(2.5), "2.5");
        assert_eq!(decimal(0.0001), "0.0001");
        assert_eq!(decimal(1e15), "1000000000000000.0");
    }

    #[test]
    fn test_decimal_uses_exponent_outside_plain_range() {
        assert_eq!(decimal(1e-7), "1e-07");
        assert_eq!(decimal(2.5e-5), "2.5e-05");
        assert_eq!(decimal(-1e-7), "-1e-07");
        assert_eq!(decimal(1e16), "1e+16");
        assert_eq!(decimal(1.5e16), "1.5e+16");
        assert_eq!(decimal(1e300), "1e+300");
        assert_eq!(decimal(f64::INFINITY), "inf");
        assert_eq!(decimal(f64::NAN), "nan");
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&ComplianceStatus::Approved).unwrap(),
            "\"APROBADO\""
        );
        let parsed: ComplianceStatus = serde_json::from_str("\"RECHAZADO\"").unwrap();
        assert_eq!(parsed, ComplianceStatus::Rejected);
    }

    #[test]
    fn test_parameters_default_min_dwelling_area() {
        let params: CalculationParameters = serde_json::from_str(
            r#"{"surface_area": 500.0, "floors": 3, "max_height": 23.0,
                "constructibility_coef": 1.2, "occupation_percentage": 60.0,
                "zone_type": "residencial"}"#,
        )
        .unwrap();
        assert_eq!(params.min_dwelling_area, 40.0);
        assert_eq!(params.constructibility_coefficient, 1.2);
    }
}
