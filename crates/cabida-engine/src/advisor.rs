//! Human-facing guidance derived from a calculation

use oguc_types::{CalculationParameters, CalculationResult, RejectionCategory};

/// Utilization below this percentage triggers an optimization tip
pub const LOW_UTILIZATION_THRESHOLD: f64 = 70.0;

/// Minimum dwelling area above which subdivision is suggested (m²)
const SUBDIVISION_AREA_THRESHOLD: f64 = 40.0;

const REJECTION_TIPS: [(RejectionCategory, &str); 4] = [
    (
        RejectionCategory::Surface,
        "Verifique que la superficie del terreno sea correcta. \
         El mínimo legal para vivienda en Chile es de 40m².",
    ),
    (
        RejectionCategory::Coefficient,
        "Revise el coeficiente de constructibilidad. \
         Valores típicos van desde 0.5 hasta 3.0 según la zona.",
    ),
    (
        RejectionCategory::Height,
        "Verifique la altura máxima permitida. \
         Considere reducir el número de pisos o consultar el plano regulador local.",
    ),
    (
        RejectionCategory::Occupation,
        "Ajuste el porcentaje de ocupación de suelo según el tipo de zona. \
         Valores típicos: Residencial 60%, Comercial 80%.",
    ),
];

/// Produces remediation tips for rejected projects and optimization tips
/// for approved ones
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationAdvisor;

impl RecommendationAdvisor {
    pub fn new() -> Self {
        Self
    }

    /// Pick the branch matching the result's status
    pub fn recommend(
        &self,
        result: &CalculationResult,
        params: &CalculationParameters,
    ) -> Vec<String> {
        if result.is_approved() {
            self.optimization_tips(result, params)
        } else {
            self.rejection_tips(result)
        }
    }

    /// One tip per failed rule category, in rule order
    pub fn rejection_tips(&self, result: &CalculationResult) -> Vec<String> {
        REJECTION_TIPS
            .iter()
            .filter(|(category, _)| result.has_reason(*category))
            .map(|(_, tip)| tip.to_string())
            .collect()
    }

    pub fn optimization_tips(
        &self,
        result: &CalculationResult,
        params: &CalculationParameters,
    ) -> Vec<String> {
        let mut tips = Vec::new();

        if result.constructibility_utilization < LOW_UTILIZATION_THRESHOLD {
            tips.push(format!(
                "Está utilizando solo el {:.1}% del coeficiente de constructibilidad. \
                 Podría considerar aumentar la superficie de edificación.",
                result.constructibility_utilization
            ));
        }

        if result.allowed_floors < params.floors {
            tips.push(format!(
                "Según la altura máxima, solo puede construir {} pisos \
                 en lugar de los {} solicitados.",
                result.allowed_floors, params.floors
            ));
        }

        if result.dwelling_units_max > 1 && params.min_dwelling_area > SUBDIVISION_AREA_THRESHOLD {
            tips.push(format!(
                "Podría construir hasta {} unidades de vivienda. \
                 Considere subdividir para mayor rentabilidad.",
                result.dwelling_units_max
            ));
        }

        tips
    }
}
