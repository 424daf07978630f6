//! OGUC cabida engine
//!
//! Turns parcel and zoning parameters into a buildable-capacity calculation
//! with an approve/reject verdict:
//!
//! - [`ComplianceEngine`] runs the OGUC rules and derives the metrics
//! - [`advisor::RecommendationAdvisor`] turns a result into guidance
//! - [`validator::ComplianceValidator`] adds certificate pre-checks and scoring
//! - [`extractors`] read certificate data from PDF or plain text
//! - [`report`] assembles the data handed to the reporting layer

pub mod advisor;
pub mod extractors;
pub mod intake;
pub mod metrics;
pub mod report;
pub mod rules;
pub mod validator;
pub mod zones;

use std::sync::Arc;

use oguc_types::{
    CalculationParameters, CalculationReport, CalculationResult, ComplianceStatus,
};

pub use advisor::RecommendationAdvisor;
pub use intake::{InputError, ProjectRequest};
pub use validator::{ComplianceValidator, QuickValidation, ValidationResult};
pub use zones::{ZoneRule, ZoneRulesTable, ZoneType, OGUC_ZONES};

/// ComplianceEngine entry point
///
/// Holds a shared, read-only zone table; cloning the engine is cheap and
/// every method is a pure function of its arguments.
#[derive(Debug, Clone)]
pub struct ComplianceEngine {
    zones: Arc<ZoneRulesTable>,
}

impl ComplianceEngine {
    pub fn new() -> Self {
        Self::with_zones(Arc::clone(&OGUC_ZONES))
    }

    pub fn with_zones(zones: Arc<ZoneRulesTable>) -> Self {
        Self { zones }
    }

    pub fn zones(&self) -> &ZoneRulesTable {
        &self.zones
    }

    /// Evaluate every rule and compute the cabida metrics.
    ///
    /// Out-of-range values never fail the call; they become rejection
    /// reasons and the metrics are still reported.
    pub fn compute(&self, params: &CalculationParameters) -> CalculationResult {
        let rejection_reasons = rules::check_all(params, &self.zones);

        let max_building_surface = metrics::max_building_surface(
            params.surface_area,
            params.constructibility_coefficient,
        );
        let max_occupation_surface =
            metrics::max_occupation_surface(params.surface_area, params.occupation_percentage);
        let allowed_floors = metrics::allowed_floors(params.floors, params.max_height);
        let dwelling_units_max =
            metrics::dwelling_units(max_building_surface, params.min_dwelling_area);
        let constructibility_utilization = metrics::constructibility_utilization(
            params.surface_area,
            params.constructibility_coefficient,
            max_building_surface,
        );

        let compliance_status = if rejection_reasons.is_empty() {
            ComplianceStatus::Approved
        } else {
            ComplianceStatus::Rejected
        };

        CalculationResult {
            total_surface: params.surface_area,
            max_building_surface,
            max_occupation_surface,
            allowed_floors,
            max_height: params.max_height,
            constructibility_utilization,
            dwelling_units_max,
            compliance_status,
            rejection_reasons,
        }
    }

    /// Full certificate-backed calculation: intake, rules and recommendations
    pub fn calculate(&self, request: &ProjectRequest) -> Result<CalculationReport, InputError> {
        request.check_bounds()?;
        let params = request.to_parameters()?;
        Ok(self.report(&params))
    }

    /// Compute and attach the advisor's recommendations
    pub fn report(&self, params: &CalculationParameters) -> CalculationReport {
        let result = self.compute(params);
        let recommendations = RecommendationAdvisor::new().recommend(&result, params);
        CalculationReport::new(&result, recommendations)
    }

    pub fn dwelling_meets_minimum(&self, dwelling_area: f64, min_required: f64) -> bool {
        metrics::dwelling_meets_minimum(dwelling_area, min_required)
    }

    pub fn density(&self, total_surface: f64, building_surface: f64) -> f64 {
        metrics::density(total_surface, building_surface)
    }

    /// Limits for a zone name, residential when the name is unknown
    pub fn zone_restrictions(&self, zone_type: &str) -> ZoneRule {
        *self.zones.lookup(zone_type)
    }
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use oguc_types::CalculationParameters;

    /// Three residential floors with the default dwelling area
    pub fn params(
        surface_area: f64,
        coefficient: f64,
        max_height: f64,
        occupation: f64,
    ) -> CalculationParameters {
        params_in_zone(surface_area, coefficient, max_height, occupation, "residencial")
    }

    pub fn params_in_zone(
        surface_area: f64,
        coefficient: f64,
        max_height: f64,
        occupation: f64,
        zone: &str,
    ) -> CalculationParameters {
        CalculationParameters {
            surface_area,
            floors: 3,
            max_height,
            constructibility_coefficient: coefficient,
            occupation_percentage: occupation,
            zone_type: zone.to_string(),
            min_dwelling_area: 40.0,
        }
    }
}
