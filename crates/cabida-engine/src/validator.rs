//! Certificate-backed compliance validation
//!
//! Runs in stages: certificate checks, an early reject when any of them is
//! fatal, the OGUC rules, then advisory findings and a 0-100 score.

use oguc_types::{
    CalculationParameters, CalculationResult, ComplianceStatus, ValidationFinding,
};
use serde::Serialize;
use tracing::debug;

use crate::advisor::LOW_UTILIZATION_THRESHOLD;
use crate::intake::ProjectRequest;
use crate::rules::MIN_LEGAL_SURFACE;
use crate::ComplianceEngine;

/// Utilization below this percentage is worth a warning
pub const POOR_UTILIZATION_THRESHOLD: f64 = 50.0;

const WARNING_PENALTY: f64 = 10.0;
const POOR_UTILIZATION_PENALTY: f64 = 20.0;
const LOW_UTILIZATION_PENALTY: f64 = 10.0;

const FIX_CRITICAL_ERRORS: &str = "Corrija los errores críticos antes de continuar";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub validation_score: f64,
    /// Certificate findings of any severity plus failed OGUC rules
    pub errors: Vec<ValidationFinding>,
    /// Advisory findings raised after the rules ran
    pub warnings: Vec<ValidationFinding>,
    pub recommendations: Vec<String>,
    pub compliance_summary: ComplianceSummary,
}

impl ValidationResult {
    pub fn error_count(&self) -> usize {
        self.errors.iter().filter(|f| f.is_error()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComplianceSummary {
    /// The certificate could not be evaluated
    EarlyReject {
        status: ComplianceStatus,
        critical_errors: usize,
    },
    Evaluated {
        status: ComplianceStatus,
        validation_score: f64,
        total_errors: usize,
        total_warnings: usize,
        max_building_surface: f64,
        dwelling_units_max: u64,
        constructibility_utilization: f64,
    },
}

/// Pass/fail outcome of the certificate-less path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickValidation {
    pub is_valid: bool,
    pub status: ComplianceStatus,
    pub rejection_reasons: Vec<String>,
    pub validation_score: f64,
    pub summary: QuickSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickSummary {
    pub max_building_surface: f64,
    pub dwelling_units_max: u64,
    pub allowed_floors: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ComplianceValidator {
    engine: ComplianceEngine,
}

impl ComplianceValidator {
    pub fn new(engine: ComplianceEngine) -> Self {
        Self { engine }
    }

    pub fn validate(&self, request: &ProjectRequest) -> ValidationResult {
        let mut errors = check_certificate(request);
        let critical_errors = errors.iter().filter(|f| f.is_error()).count();

        let surface_area = match request.certificate_data.surface_area() {
            Some(surface) if critical_errors == 0 => surface,
            _ => {
                debug!(critical_errors, "certificate rejected before rule evaluation");
                return early_reject(errors, critical_errors);
            }
        };

        let params = request.parameters_for_surface(surface_area);
        let result = self.engine.compute(&params);
        debug!(status = %result.compliance_status, "rules evaluated");

        errors.extend(
            result
                .rejection_reasons
                .iter()
                .map(|reason| ValidationFinding::error("compliance", reason.message())),
        );

        let warnings = advisory_findings(&result, &params, request);
        let recommendations = validation_recommendations(&result);
        let validation_score = score(&errors, &warnings, &result);

        let total_errors = errors.len();
        let is_valid = !errors.iter().any(|f| f.is_error());

        ValidationResult {
            is_valid,
            validation_score,
            compliance_summary: ComplianceSummary::Evaluated {
                status: result.compliance_status,
                validation_score,
                total_errors,
                total_warnings: warnings.len(),
                max_building_surface: result.max_building_surface,
                dwelling_units_max: result.dwelling_units_max,
                constructibility_utilization: result.constructibility_utilization,
            },
            errors,
            warnings,
            recommendations,
        }
    }

    /// Binary check without certificate findings or scoring nuance
    pub fn quick_validate(&self, params: &CalculationParameters) -> QuickValidation {
        let result = self.engine.compute(params);
        let is_valid = result.is_approved();

        QuickValidation {
            is_valid,
            status: result.compliance_status,
            rejection_reasons: result.reason_messages(),
            validation_score: if is_valid { 100.0 } else { 0.0 },
            summary: QuickSummary {
                max_building_surface: result.max_building_surface,
                dwelling_units_max: result.dwelling_units_max,
                allowed_floors: result.allowed_floors,
            },
        }
    }
}

fn check_certificate(request: &ProjectRequest) -> Vec<ValidationFinding> {
    let cert = &request.certificate_data;
    let mut findings = Vec::new();

    match cert.surface_area() {
        None => findings.push(ValidationFinding::error(
            "superficie_terreno",
            "No se pudo extraer la superficie del terreno",
        )),
        Some(surface) if surface < MIN_LEGAL_SURFACE => {
            findings.push(ValidationFinding::error(
                "superficie_terreno",
                format!(
                    "Superficie del terreno ({}m²) inferior al mínimo legal ({:.0}m²)",
                    oguc_types::decimal(surface),
                    MIN_LEGAL_SURFACE
                ),
            ))
        }
        Some(_) => {}
    }

    if !cert.has_rol() {
        findings.push(ValidationFinding::warning(
            "rol",
            "No se pudo extraer el rol del predio",
        ));
    }

    if !cert.has_comuna() {
        findings.push(ValidationFinding::warning(
            "comuna",
            "No se pudo extraer la comuna",
        ));
    }

    findings
}

fn early_reject(errors: Vec<ValidationFinding>, critical_errors: usize) -> ValidationResult {
    ValidationResult {
        is_valid: false,
        validation_score: 0.0,
        errors,
        warnings: Vec::new(),
        recommendations: vec![FIX_CRITICAL_ERRORS.to_string()],
        compliance_summary: ComplianceSummary::EarlyReject {
            status: ComplianceStatus::Rejected,
            critical_errors,
        },
    }
}

fn advisory_findings(
    result: &CalculationResult,
    params: &CalculationParameters,
    request: &ProjectRequest,
) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    if result.constructibility_utilization < POOR_UTILIZATION_THRESHOLD {
        findings.push(ValidationFinding::warning(
            "optimization",
            format!(
                "Baja utilización del coeficiente de constructibilidad ({:.1}%)",
                result.constructibility_utilization
            ),
        ));
    }

    if result.allowed_floors < params.floors {
        findings.push(ValidationFinding::warning(
            "height",
            format!(
                "Altura máxima permite solo {} pisos ({} solicitados)",
                result.allowed_floors, params.floors
            ),
        ));
    }

    if request.certificate_data.uses_default_coefficient() {
        findings.push(ValidationFinding::info(
            "constructibility",
            "Usando coeficiente de constructibilidad por defecto (1.0)",
        ));
    }

    findings
}

fn validation_recommendations(result: &CalculationResult) -> Vec<String> {
    if !result.is_approved() {
        return vec![
            "❌ El proyecto no cumple con las normativas OGUC".to_string(),
            "📋 Revise los motivos de rechazo indicados".to_string(),
            "🔄 Realice los ajustes necesarios y vuelva a validar".to_string(),
        ];
    }

    let mut recommendations = vec![
        "✅ El proyecto cumple con las normativas OGUC básicas".to_string(),
        format!(
            "📊 Cabida máxima permitida: {:.1}m²",
            result.max_building_surface
        ),
        format!(
            "🏠 Unidades de vivienda máximas: {}",
            result.dwelling_units_max
        ),
    ];

    if result.constructibility_utilization < LOW_UTILIZATION_THRESHOLD {
        recommendations
            .push("💡 Considere optimizar el uso del coeficiente de constructibilidad".to_string());
    }

    recommendations
}

/// 100 minus penalties, floored at zero; any error forces zero
fn score(
    errors: &[ValidationFinding],
    warnings: &[ValidationFinding],
    result: &CalculationResult,
) -> f64 {
    if errors.iter().any(|f| f.is_error()) {
        return 0.0;
    }

    let mut score = 100.0 - WARNING_PENALTY * warnings.len() as f64;

    if result.constructibility_utilization < POOR_UTILIZATION_THRESHOLD {
        score -= POOR_UTILIZATION_PENALTY;
    } else if result.constructibility_utilization < LOW_UTILIZATION_THRESHOLD {
        score -= LOW_UTILIZATION_PENALTY;
    }

    score.max(0.0)
}
