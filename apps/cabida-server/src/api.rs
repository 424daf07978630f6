//! API handlers for the cabida server
//!
//! Provides REST endpoints for:
//! - Cabida calculation
//! - Compliance validation
//! - Certificate upload
//! - Report data

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use cabida_engine::extractors::{
    self, document::extract_text, DocumentFormat, ExtractionError, SUPPORTED_EXTENSIONS,
};
use cabida_engine::report::{
    report_templates, CabidaReport, ReportCatalogue, ReportPreview, ReportRequest, SummaryReport,
    SummaryRequest,
};
use cabida_engine::{ProjectRequest, QuickValidation, ValidationResult, ZoneRule};
use oguc_types::{
    CalculationParameters, CalculationReport, CalculationResult, CertificateData,
    DEFAULT_CONSTRUCTIBILITY_COEF, DEFAULT_MAX_HEIGHT, DEFAULT_MIN_DWELLING_AREA,
    DEFAULT_OCCUPATION_PERCENTAGE, DEFAULT_ZONE,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ServerError;
use crate::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "cabida-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler: POST /api/v1/calculate/cabida
pub async fn handle_calculate_cabida(
    State(state): State<AppState>,
    payload: Result<Json<ProjectRequest>, JsonRejection>,
) -> Result<Json<CalculationReport>, ServerError> {
    let Json(req) = payload?;
    info!(
        "Cabida request: floors={}, zone={}",
        req.floors, req.zone_type
    );
    debug!("Certificate: {:?}", req.certificate_data);

    let report = state.engine.calculate(&req)?;

    info!(
        "Cabida result: {} ({} reasons)",
        report.compliance_status,
        report.rejection_reasons.len()
    );
    Ok(Json(report))
}

/// Query parameters for the certificate-less endpoints
#[derive(Debug, Deserialize)]
pub struct QuickParams {
    pub surface_area: f64,
    pub floors: u32,
    #[serde(default = "default_zone")]
    pub zone_type: String,
    #[serde(default = "default_coefficient")]
    pub constructibility_coef: f64,
    #[serde(default = "default_occupation")]
    pub occupation_percentage: f64,
    #[serde(default = "default_height")]
    pub max_height: f64,
}

fn default_zone() -> String {
    DEFAULT_ZONE.to_string()
}

fn default_coefficient() -> f64 {
    DEFAULT_CONSTRUCTIBILITY_COEF
}

fn default_occupation() -> f64 {
    DEFAULT_OCCUPATION_PERCENTAGE
}

fn default_height() -> f64 {
    DEFAULT_MAX_HEIGHT
}

impl From<QuickParams> for CalculationParameters {
    fn from(q: QuickParams) -> Self {
        CalculationParameters {
            surface_area: q.surface_area,
            floors: q.floors,
            max_height: q.max_height,
            constructibility_coefficient: q.constructibility_coef,
            occupation_percentage: q.occupation_percentage,
            zone_type: q.zone_type,
            min_dwelling_area: DEFAULT_MIN_DWELLING_AREA,
        }
    }
}

#[derive(Serialize)]
pub struct QuickCalculateResponse {
    pub success: bool,
    pub result: CalculationResult,
    pub parameters: CalculationParameters,
}

/// Handler: POST /api/v1/calculate/quick-calculate
pub async fn handle_quick_calculate(
    State(state): State<AppState>,
    query: Result<Query<QuickParams>, QueryRejection>,
) -> Result<Json<QuickCalculateResponse>, ServerError> {
    let Query(query) = query?;
    debug!("Quick calculate: {:?}", query);
    let parameters = CalculationParameters::from(query);
    let result = state.engine.compute(&parameters);

    Ok(Json(QuickCalculateResponse {
        success: true,
        result,
        parameters,
    }))
}

#[derive(Serialize)]
pub struct ZoneRestrictionsResponse {
    pub zone_type: String,
    pub restrictions: ZoneRule,
}

/// Handler: GET /api/v1/calculate/zone-restrictions/:zone_type
pub async fn handle_zone_restrictions(
    State(state): State<AppState>,
    Path(zone_type): Path<String>,
) -> Json<ZoneRestrictionsResponse> {
    let restrictions = state.engine.zone_restrictions(&zone_type);
    Json(ZoneRestrictionsResponse {
        zone_type,
        restrictions,
    })
}

/// Handler: POST /api/v1/validate/compliance
pub async fn handle_validate_compliance(
    State(state): State<AppState>,
    payload: Result<Json<ProjectRequest>, JsonRejection>,
) -> Result<Json<ValidationResult>, ServerError> {
    let Json(req) = payload?;
    info!(
        "Validation request: floors={}, zone={}",
        req.floors, req.zone_type
    );
    req.check_bounds()?;

    let result = state.validator.validate(&req);
    info!(
        "Validation result: valid={}, score={}",
        result.is_valid, result.validation_score
    );
    Ok(Json(result))
}

/// Handler: POST /api/v1/validate/quick-validate
pub async fn handle_quick_validate(
    State(state): State<AppState>,
    query: Result<Query<QuickParams>, QueryRejection>,
) -> Result<Json<QuickValidation>, ServerError> {
    let Query(query) = query?;
    debug!("Quick validate: {:?}", query);
    let parameters = CalculationParameters::from(query);
    Ok(Json(state.validator.quick_validate(&parameters)))
}

/// A file part of a multipart upload
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

/// Parsed multipart form: the `file` part plus its text fields
#[derive(Default)]
pub struct UploadForm {
    file: Option<UploadedFile>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Drain a multipart body. Unknown parts are skipped.
    async fn read(state: &AppState, mut multipart: Multipart) -> Result<Self, ServerError> {
        let mut form = UploadForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| form_error(state, e))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(|e| form_error(state, e))?;
                form.file = Some(UploadedFile { filename, data });
            } else if name.is_empty() {
                debug!("Skipping unnamed form part");
            } else {
                let value = field.text().await.map_err(|e| form_error(state, e))?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    fn take_file(&mut self, state: &AppState) -> Result<UploadedFile, ServerError> {
        let file = self
            .file
            .take()
            .filter(|f| !f.filename.trim().is_empty())
            .ok_or_else(|| {
                ServerError::InvalidRequest("No se proporcionó ningún archivo".to_string())
            })?;
        check_upload(state, &file)?;
        Ok(file)
    }

    fn text(&self, name: &str) -> Result<&str, ServerError> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .ok_or_else(|| ServerError::InvalidRequest(format!("Falta el campo '{}'", name)))
    }

    fn number<T: FromStr>(&self, name: &str) -> Result<T, ServerError> {
        let raw = self.text(name)?;
        raw.parse().map_err(|_| {
            ServerError::InvalidRequest(format!("Valor inválido para '{}': {}", name, raw))
        })
    }

    fn number_or<T: FromStr>(&self, name: &str, default: T) -> Result<T, ServerError> {
        if self.fields.contains_key(name) {
            self.number(name)
        } else {
            Ok(default)
        }
    }
}

/// Limit overruns while streaming a part still answer with the JSON 413
fn form_error(state: &AppState, err: MultipartError) -> ServerError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge {
            max_mb: state.max_upload_mb(),
        }
    } else {
        ServerError::from(err)
    }
}

#[derive(Serialize)]
pub struct UploadParameters {
    pub floors: u32,
    pub zone_type: String,
    pub min_dwelling_area: f64,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: &'static str,
    pub certificate_data: CertificateData,
    /// Seconds spent reading the file
    pub processing_time: f64,
    pub parameters: UploadParameters,
}

fn check_upload(state: &AppState, file: &UploadedFile) -> Result<(), ServerError> {
    if file.data.len() > state.max_upload_bytes {
        warn!(
            "Upload rejected: {} bytes exceeds {}",
            file.data.len(),
            state.max_upload_bytes
        );
        return Err(ServerError::PayloadTooLarge {
            max_mb: state.max_upload_mb(),
        });
    }
    Ok(())
}

/// PDF parsing is CPU-bound; keep it off the async workers
async fn run_blocking<T, F>(job: F) -> Result<T, ServerError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| ServerError::Internal(format!("Error procesando el archivo: {}", e)))
}

/// Handler: POST /api/v1/upload/certificate
///
/// Multipart form with `file`, `floors`, `zone_type` and an optional
/// `min_dwelling_area`.
pub async fn handle_upload_certificate(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ServerError> {
    let start = Instant::now();
    let mut form = UploadForm::read(&state, multipart?).await?;
    let file = form.take_file(&state)?;
    info!(
        "Upload request: filename={}, size={} bytes",
        file.filename,
        file.data.len()
    );

    let parameters = UploadParameters {
        floors: form.number("floors")?,
        zone_type: form.text("zone_type")?.to_string(),
        min_dwelling_area: form.number_or("min_dwelling_area", DEFAULT_MIN_DWELLING_AREA)?,
    };

    let UploadedFile { filename, data } = file;
    let certificate_data =
        run_blocking(move || extractors::process_file(&data, &filename)).await??;

    let processing_time = start.elapsed().as_secs_f64();
    info!("Certificate processed in {:.3}s", processing_time);

    Ok(Json(UploadResponse {
        success: true,
        message: "Certificado procesado exitosamente",
        certificate_data,
        processing_time,
        parameters,
    }))
}

#[derive(Serialize)]
pub struct FormatValidationResponse {
    pub valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_data: Option<CertificateData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_formats: Option<&'static [&'static str]>,
}

impl FormatValidationResponse {
    fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
            preview_data: None,
            supported_formats: None,
        }
    }
}

fn inspect_document(data: &[u8], format: DocumentFormat) -> FormatValidationResponse {
    match extract_text(data, format) {
        Ok(text) if extractors::looks_like_certificate(&text) => FormatValidationResponse {
            valid: true,
            message: "Formato válido".to_string(),
            preview_data: Some(extractors::extract_certificate_data(&text)),
            supported_formats: None,
        },
        Ok(_) => FormatValidationResponse::invalid(
            "No parece ser un Certificado de Informaciones Previas",
        ),
        Err(e) => FormatValidationResponse::invalid(format!("Error validando archivo: {}", e)),
    }
}

/// Handler: POST /api/v1/upload/validate-format
///
/// Takes a multipart `file` part. Problems with the file itself are
/// reported in the body, not as errors.
pub async fn handle_validate_format(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<FormatValidationResponse>, ServerError> {
    let UploadedFile { filename, data } = UploadForm::read(&state, multipart?)
        .await?
        .take_file(&state)?;

    let format = match DocumentFormat::from_filename(&filename) {
        Ok(format) => format,
        Err(ExtractionError::UnsupportedFormat(_)) => {
            return Ok(Json(FormatValidationResponse {
                supported_formats: Some(SUPPORTED_EXTENSIONS),
                ..FormatValidationResponse::invalid("Formato de archivo no soportado")
            }));
        }
        Err(e) => return Ok(Json(FormatValidationResponse::invalid(e.to_string()))),
    };

    let response = run_blocking(move || inspect_document(&data, format)).await?;
    debug!("Format check for {}: valid={}", filename, response.valid);
    Ok(Json(response))
}

#[derive(Serialize)]
pub struct SupportedFormatsResponse {
    pub supported_formats: &'static [&'static str],
    pub max_file_size_mb: f64,
    pub description: &'static str,
}

/// Handler: GET /api/v1/upload/supported-formats
pub async fn handle_supported_formats(
    State(state): State<AppState>,
) -> Json<SupportedFormatsResponse> {
    Json(SupportedFormatsResponse {
        supported_formats: SUPPORTED_EXTENSIONS,
        max_file_size_mb: state.max_upload_mb(),
        description: "Se aceptan Certificados de Informaciones Previas en formato PDF o texto",
    })
}

#[derive(Serialize)]
pub struct PreviewResponse {
    pub success: bool,
    pub preview: ReportPreview,
    pub report_ready: bool,
}

/// Handler: POST /api/v1/reports/preview-report (alias /reports/preview)
pub async fn handle_report_preview(
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<PreviewResponse>, ServerError> {
    let Json(req) = payload?;
    Ok(Json(PreviewResponse {
        success: true,
        preview: ReportPreview::from_request(&req),
        report_ready: true,
    }))
}

/// Handler: POST /api/v1/reports/generate-pdf (alias /reports/cabida)
///
/// Answers with the structured report; page layout is left to the client.
pub async fn handle_cabida_report(
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<CabidaReport>, ServerError> {
    let Json(req) = payload?;
    let report = CabidaReport::from_request(&req);
    info!("Report generated: {}", report.compliance_status);
    Ok(Json(report))
}

/// Handler: POST /api/v1/reports/generate-summary (alias /reports/summary)
pub async fn handle_summary_report(
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> Result<Json<SummaryReport>, ServerError> {
    let Json(req) = payload?;
    if req.calculations.is_empty() {
        return Err(ServerError::InvalidRequest(
            "Debe incluir al menos un cálculo".to_string(),
        ));
    }
    info!("Summary report for {} calculations", req.calculations.len());
    Ok(Json(SummaryReport::from_request(&req)))
}

/// Handler: GET /api/v1/reports/report-templates (alias /reports/templates)
pub async fn handle_report_templates() -> Json<ReportCatalogue> {
    Json(report_templates())
}
