//! Report data for cabida calculations
//!
//! Builds the content of the "Informe de Cálculo de Cabidas": every table,
//! status line and legal note is assembled here as plain data so that any
//! renderer (JSON API, PDF, HTML) prints the same report.

use chrono::{DateTime, Utc};
use oguc_types::{
    decimal, CalculationParameters, CalculationReport, CertificateData, ComplianceStatus,
    DEFAULT_MIN_DWELLING_AREA,
};
use serde::{Deserialize, Serialize};

pub const REPORT_TITLE: &str = "INFORME DE CÁLCULO DE CABIDAS OGUC";
pub const SUMMARY_TITLE: &str = "RESUMEN DE CÁLCULOS DE CABIDA";
pub const REPORT_FOOTER: &str = "Sistema Arquitect Assistant - Cálculo OGUC v1.0";

const NOT_SPECIFIED: &str = "No especificado";
const NOT_SPECIFIED_F: &str = "No especificada";

/// Parameters as the caller supplied them; anything missing prints a default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportParameters {
    pub floors: Option<u32>,
    pub zone_type: Option<String>,
    pub min_dwelling_area: Option<f64>,
    pub max_height: Option<f64>,
    #[serde(rename = "constructibility_coef")]
    pub constructibility_coefficient: Option<f64>,
    pub occupation_percentage: Option<f64>,
}

impl From<&CalculationParameters> for ReportParameters {
    fn from(params: &CalculationParameters) -> Self {
        Self {
            floors: Some(params.floors),
            zone_type: Some(params.zone_type.clone()),
            min_dwelling_area: Some(params.min_dwelling_area),
            max_height: Some(params.max_height),
            constructibility_coefficient: Some(params.constructibility_coefficient),
            occupation_percentage: Some(params.occupation_percentage),
        }
    }
}

/// Everything needed to produce or preview a single-project report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub certificate_data: CertificateData,
    pub calculation_result: CalculationReport,
    #[serde(default)]
    pub parameters: ReportParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub label: String,
    pub value: String,
}

fn row(label: &str, value: impl Into<String>) -> ReportRow {
    ReportRow {
        label: label.to_string(),
        value: value.into(),
    }
}

/// One two-column table of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    pub title: String,
    pub header: [&'static str; 2],
    pub rows: Vec<ReportRow>,
}

impl ReportSection {
    /// Value of the row with the given label
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegalBasis {
    pub sources: Vec<&'static str>,
    pub applied_articles: Vec<&'static str>,
    pub general_provisions: Vec<&'static str>,
    pub disclaimer: &'static str,
}

impl LegalBasis {
    pub fn oguc() -> Self {
        Self {
            sources: vec![
                "Ordenanza General de Urbanismo y Construcciones (OGUC)",
                "Decreto Supremo N° 47 de 1992, MINVU",
                "Plan Regulador Comunal respectivo",
            ],
            applied_articles: vec![
                "Artículo 2.6.3. del OGUC: Coeficiente de constructibilidad",
                "Artículo 2.6.4. del OGUC: Superficie de emplazamiento",
                "Artículo 2.6.5. del OGUC: Altura de edificación",
                "Artículo 4.1.2. del OGUC: Superficie mínima de vivienda",
            ],
            general_provisions: vec![
                "Los cálculos se basan en la información proporcionada en el Certificado de Informaciones Previas",
                "Se aplican las restricciones específicas según tipo de zona",
                "Los resultados están sujetos a verificación municipal",
            ],
            disclaimer: "Este informe es una herramienta de apoyo y no reemplaza la evaluación \
                         profesional ni la aprobación municipal. Se recomienda consultar con un \
                         arquitecto o ingeniero civil para la validación final del proyecto.",
        }
    }
}

/// Full single-project report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CabidaReport {
    pub title: &'static str,
    pub certificate: ReportSection,
    pub parameters: ReportSection,
    pub results: ReportSection,
    pub compliance_status: ComplianceStatus,
    pub status_label: String,
    pub rejection_reasons: Vec<String>,
    pub recommendations: Vec<String>,
    pub legal_basis: LegalBasis,
    pub generated_at: DateTime<Utc>,
    pub footer: &'static str,
}

impl CabidaReport {
    pub fn build(
        certificate: &CertificateData,
        parameters: &ReportParameters,
        calculation: &CalculationReport,
    ) -> Self {
        Self {
            title: REPORT_TITLE,
            certificate: certificate_section(certificate),
            parameters: parameters_section(parameters),
            results: results_section(calculation),
            compliance_status: calculation.compliance_status,
            status_label: status_label(calculation.compliance_status),
            rejection_reasons: calculation.rejection_reasons.clone(),
            recommendations: calculation.recommendations.clone(),
            legal_basis: LegalBasis::oguc(),
            generated_at: Utc::now(),
            footer: REPORT_FOOTER,
        }
    }

    pub fn from_request(request: &ReportRequest) -> Self {
        Self::build(
            &request.certificate_data,
            &request.parameters,
            &request.calculation_result,
        )
    }

    /// "Reporte generado el: dd/mm/yyyy HH:MM:SS"
    pub fn generated_label(&self) -> String {
        format!(
            "Reporte generado el: {}",
            self.generated_at.format("%d/%m/%Y %H:%M:%S")
        )
    }
}

fn status_label(status: ComplianceStatus) -> String {
    match status {
        ComplianceStatus::Approved => format!("✅ {}", status.label()),
        ComplianceStatus::Rejected => format!("❌ {}", status.label()),
    }
}

fn text_or(value: &Option<String>, fallback: &str) -> String {
    value.clone().unwrap_or_else(|| fallback.to_string())
}

fn certificate_section(cert: &CertificateData) -> ReportSection {
    ReportSection {
        title: "DATOS DEL CERTIFICADO DE INFORMACIONES PREVIAS".to_string(),
        header: ["Campo", "Valor"],
        rows: vec![
            row("Rol del Predio", text_or(&cert.rol, NOT_SPECIFIED)),
            row("Dirección", text_or(&cert.direccion, NOT_SPECIFIED_F)),
            row("Comuna", text_or(&cert.comuna, NOT_SPECIFIED_F)),
            row(
                "Superficie Terreno",
                format!("{:.1} m²", cert.superficie_terreno.unwrap_or(0.0)),
            ),
            row("Uso de Suelo", text_or(&cert.uso_suelo, NOT_SPECIFIED)),
            row("Zona", text_or(&cert.zona, NOT_SPECIFIED_F)),
            row(
                "Propietario",
                text_or(&cert.nombre_propietario, NOT_SPECIFIED),
            ),
        ],
    }
}

fn parameters_section(params: &ReportParameters) -> ReportSection {
    let zone = params.zone_type.as_deref().unwrap_or(NOT_SPECIFIED);
    ReportSection {
        title: "PARÁMETROS DE CÁLCULO".to_string(),
        header: ["Parámetro", "Valor"],
        rows: vec![
            row("Pisos Solicitados", params.floors.unwrap_or(0).to_string()),
            row("Tipo de Zona", title_case(zone)),
            row(
                "Superficie Mínima Vivienda",
                format!(
                    "{:.1} m²",
                    params.min_dwelling_area.unwrap_or(DEFAULT_MIN_DWELLING_AREA)
                ),
            ),
            row(
                "Altura Máxima",
                format!("{:.1} m", params.max_height.unwrap_or(0.0)),
            ),
            row(
                "Coeficiente Constructibilidad",
                decimal(params.constructibility_coefficient.unwrap_or(0.0)),
            ),
            row(
                "Porcentaje Ocupación",
                format!("{:.1}%", params.occupation_percentage.unwrap_or(0.0)),
            ),
        ],
    }
}

fn results_section(calc: &CalculationReport) -> ReportSection {
    ReportSection {
        title: "RESULTADOS DEL CÁLCULO".to_string(),
        header: ["Indicador", "Resultado"],
        rows: vec![
            row(
                "Superficie Total Terreno",
                format!("{:.1} m²", calc.total_surface),
            ),
            row(
                "Cabida Máxima Edificación",
                format!("{:.1} m²", calc.max_building_surface),
            ),
            row(
                "Superficie Máxima Emplazamiento",
                format!("{:.1} m²", calc.max_occupation_surface),
            ),
            row("Pisos Permitidos", calc.allowed_floors.to_string()),
            row(
                "Altura Máxima Permitida",
                format!("{:.1} m", calc.max_height),
            ),
            row(
                "Unidades Vivienda Máximas",
                calc.dwelling_units_max.to_string(),
            ),
            row(
                "Utilización Coeficiente",
                format!("{:.1}%", calc.constructibility_utilization),
            ),
        ],
    }
}

/// Capitalize the first letter of every word, lowercase the rest
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for c in value.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificateInfo {
    pub rol: Option<String>,
    pub direccion: Option<String>,
    pub comuna: Option<String>,
    pub superficie_terreno: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationSummary {
    pub compliance_status: ComplianceStatus,
    pub max_building_surface: f64,
    pub dwelling_units_max: u64,
    pub allowed_floors: u32,
}

/// What a report would contain, without rendering it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPreview {
    pub certificate_info: CertificateInfo,
    pub calculation_summary: CalculationSummary,
    pub parameters: ReportParameters,
    pub rejection_reasons: Vec<String>,
    pub recommendations: Vec<String>,
    pub estimated_pages: u32,
}

impl ReportPreview {
    pub fn from_request(request: &ReportRequest) -> Self {
        let cert = &request.certificate_data;
        let calc = &request.calculation_result;

        // Rejection reasons get their own section, which spills onto a second page
        let estimated_pages = if calc.rejection_reasons.is_empty() {
            1
        } else {
            2
        };

        Self {
            certificate_info: CertificateInfo {
                rol: cert.rol.clone(),
                direccion: cert.direccion.clone(),
                comuna: cert.comuna.clone(),
                superficie_terreno: cert.superficie_terreno,
            },
            calculation_summary: CalculationSummary {
                compliance_status: calc.compliance_status,
                max_building_surface: calc.max_building_surface,
                dwelling_units_max: calc.dwelling_units_max,
                allowed_floors: calc.allowed_floors,
            },
            parameters: request.parameters.clone(),
            rejection_reasons: calc.rejection_reasons.clone(),
            recommendations: calc.recommendations.clone(),
            estimated_pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub calculations: Vec<CalculationReport>,
    #[serde(default)]
    pub project_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub project_name: String,
    pub compliance_status: ComplianceStatus,
    pub max_building_surface: f64,
    pub dwelling_units_max: u64,
}

impl SummaryRow {
    pub fn as_section(&self, index: usize) -> ReportSection {
        ReportSection {
            title: format!("CÁLCULO #{}", index + 1),
            header: ["Campo", "Valor"],
            rows: vec![
                row("Proyecto", self.project_name.clone()),
                row("Estado", self.compliance_status.label()),
                row(
                    "Cabida Máxima",
                    format!("{:.1} m²", self.max_building_surface),
                ),
                row("Unidades Máximas", self.dwelling_units_max.to_string()),
            ],
        }
    }
}

/// Side-by-side comparison of several calculations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub title: &'static str,
    pub rows: Vec<SummaryRow>,
    pub generated_at: DateTime<Utc>,
}

impl SummaryReport {
    /// Projects without a supplied name are called "Proyecto N" (1-based)
    pub fn build(calculations: &[CalculationReport], project_names: &[String]) -> Self {
        let rows = calculations
            .iter()
            .enumerate()
            .map(|(i, calc)| SummaryRow {
                project_name: project_names
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("Proyecto {}", i + 1)),
                compliance_status: calc.compliance_status,
                max_building_surface: calc.max_building_surface,
                dwelling_units_max: calc.dwelling_units_max,
            })
            .collect();

        Self {
            title: SUMMARY_TITLE,
            rows,
            generated_at: Utc::now(),
        }
    }

    pub fn from_request(request: &SummaryRequest) -> Self {
        Self::build(&request.calculations, &request.project_names)
    }

    pub fn sections(&self) -> Vec<ReportSection> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, r)| r.as_section(i))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub sections: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomizationOptions {
    pub include_legal_info: bool,
    pub include_recommendations: bool,
    pub company_logo: bool,
    pub custom_watermark: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportCatalogue {
    pub available_reports: Vec<ReportTemplate>,
    pub output_formats: Vec<&'static str>,
    pub customization_options: CustomizationOptions,
}

/// Report types this crate can assemble
pub fn report_templates() -> ReportCatalogue {
    ReportCatalogue {
        available_reports: vec![
            ReportTemplate {
                key: "cabida_report",
                name: "Informe de Cálculo de Cabidas",
                description: "Reporte completo con datos del certificado, parámetros, \
                              resultados y recomendaciones",
                sections: vec![
                    "Datos del Certificado",
                    "Parámetros de Cálculo",
                    "Resultados del Cálculo",
                    "Estado de Cumplimiento",
                    "Recomendaciones",
                    "Información Legal",
                ],
            },
            ReportTemplate {
                key: "summary_report",
                name: "Reporte Resumen",
                description: "Reporte comparativo de múltiples cálculos de cabida",
                sections: vec!["Tabla resumen por proyecto"],
            },
        ],
        output_formats: vec!["JSON"],
        customization_options: CustomizationOptions {
            include_legal_info: true,
            include_recommendations: true,
            company_logo: false,
            custom_watermark: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::params;
    use crate::ComplianceEngine;
    use pretty_assertions::assert_eq;

    fn sample_request(surface: f64) -> ReportRequest {
        let calc_params = params(surface, 1.2, 23.0, 60.0);
        let calculation = ComplianceEngine::new().report(&calc_params);
        ReportRequest {
            certificate_data: CertificateData {
                rol: Some("1234-56".to_string()),
                comuna: Some("Ñuñoa".to_string()),
                superficie_terreno: Some(surface),
                ..Default::default()
            },
            calculation_result: calculation,
            parameters: ReportParameters::from(&calc_params),
        }
    }

    #[test]
    fn test_report_sections() {
        let report = CabidaReport::from_request(&sample_request(500.0));

        assert_eq!(report.title, REPORT_TITLE);
        assert_eq!(report.status_label, "✅ APROBADO");
        assert_eq!(report.certificate.value("Rol del Predio"), Some("1234-56"));
        assert_eq!(report.certificate.value("Dirección"), Some("No especificada"));
        assert_eq!(report.certificate.value("Propietario"), Some("No especificado"));
        assert_eq!(
            report.certificate.value("Superficie Terreno"),
            Some("500.0 m²")
        );
        assert_eq!(report.parameters.value("Tipo de Zona"), Some("Residencial"));
        assert_eq!(
            report.parameters.value("Coeficiente Constructibilidad"),
            Some("1.2")
        );
        assert_eq!(
            report.results.value("Cabida Máxima Edificación"),
            Some("600.0 m²")
        );
        assert_eq!(report.results.value("Unidades Vivienda Máximas"), Some("15"));
        assert_eq!(report.legal_basis.applied_articles.len(), 4);
    }

    #[test]
    fn test_rejected_report_lists_reasons() {
        let report = CabidaReport::from_request(&sample_request(30.0));

        assert_eq!(report.status_label, "❌ RECHAZADO");
        assert_eq!(report.rejection_reasons.len(), 1);
        assert!(report.rejection_reasons[0].contains("inferior al mínimo legal"));
        assert!(!report.recommendations.is_empty());
    }

    #[test]
    fn test_missing_parameters_use_defaults() {
        let section = parameters_section(&ReportParameters::default());
        assert_eq!(section.value("Pisos Solicitados"), Some("0"));
        assert_eq!(section.value("Tipo de Zona"), Some("No Especificado"));
        assert_eq!(section.value("Superficie Mínima Vivienda"), Some("40.0 m²"));
    }

    #[test]
    fn test_generated_label_format() {
        let report = CabidaReport::from_request(&sample_request(500.0));
        let label = report.generated_label();
        assert!(label.starts_with("Reporte generado el: "));
        assert_eq!(label.len(), "Reporte generado el: ".len() + 19);
    }

    #[test]
    fn test_preview_page_estimate() {
        let approved = ReportPreview::from_request(&sample_request(500.0));
        assert_eq!(approved.estimated_pages, 1);
        assert_eq!(approved.certificate_info.rol.as_deref(), Some("1234-56"));
        assert_eq!(approved.calculation_summary.dwelling_units_max, 15);

        let rejected = ReportPreview::from_request(&sample_request(30.0));
        assert_eq!(rejected.estimated_pages, 2);
    }

    #[test]
    fn test_summary_names_default_to_position() {
        let first = sample_request(500.0).calculation_result;
        let second = sample_request(30.0).calculation_result;
        let summary = SummaryReport::build(&[first, second], &["Edificio Norte".to_string()]);

        assert_eq!(summary.rows[0].project_name, "Edificio Norte");
        assert_eq!(summary.rows[1].project_name, "Proyecto 2");
        assert_eq!(summary.rows[1].compliance_status, ComplianceStatus::Rejected);

        let sections = summary.sections();
        assert_eq!(sections[1].title, "CÁLCULO #2");
        assert_eq!(sections[0].value("Cabida Máxima"), Some("600.0 m²"));
    }

    #[test]
    fn test_report_request_deserializes_partial_parameters() {
        let request: ReportRequest = serde_json::from_value(serde_json::json!({
            "certificate_data": {"rol": "1-1"},
            "calculation_result": {
                "total_surface": 500.0,
                "max_building_surface": 600.0,
                "max_occupation_surface": 300.0,
                "allowed_floors": 3,
                "max_height": 23.0,
                "constructibility_utilization": 100.0,
                "dwelling_units_max": 15,
                "compliance_status": "APROBADO"
            },
            "parameters": {"floors": 3, "constructibility_coef": 1.5}
        }))
        .unwrap();

        assert_eq!(request.parameters.floors, Some(3));
        assert_eq!(request.parameters.constructibility_coefficient, Some(1.5));
        assert!(request.calculation_result.recommendations.is_empty());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("residencial"), "Residencial");
        assert_eq!(title_case("zona MIXTA-norte"), "Zona Mixta-Norte");
    }

    #[test]
    fn test_catalogue() {
        let catalogue = report_templates();
        assert_eq!(catalogue.available_reports.len(), 2);
        assert_eq!(catalogue.available_reports[0].sections.len(), 6);
        assert!(catalogue.customization_options.include_legal_info);
    }
}
