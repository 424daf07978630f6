//! Cabida Server
//!
//! REST API over the OGUC cabida engine:
//!
//! - Cabida calculation from certificate data or bare parameters
//! - Compliance validation with scoring
//! - Certificate upload and field extraction (PDF / text)
//! - Report data for single projects and multi-project summaries
//!
//! Per-IP rate limiting via tower-governor, permissive CORS for the
//! browser frontend.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use cabida_engine::{ComplianceEngine, ComplianceValidator};
use clap::Parser;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;

use api::{
    handle_calculate_cabida, handle_cabida_report, handle_health, handle_quick_calculate,
    handle_quick_validate, handle_report_preview, handle_report_templates, handle_summary_report,
    handle_supported_formats, handle_upload_certificate, handle_validate_compliance,
    handle_validate_format, handle_zone_restrictions,
};

const BYTES_PER_MB: usize = 1024 * 1024;

/// Room for multipart boundaries and the text fields next to the file
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Command-line arguments for the cabida server
#[derive(Parser, Debug)]
#[command(name = "cabida-server")]
#[command(about = "OGUC cabida calculation API")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "CABIDA_PORT", default_value = "8000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "CABIDA_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Rate limit: requests per second per IP
    #[arg(long, env = "CABIDA_RATE_LIMIT", default_value = "10")]
    rate_limit: u32,

    /// Largest accepted certificate upload, in MB
    #[arg(long, env = "CABIDA_MAX_UPLOAD_MB", default_value = "10")]
    max_upload_mb: usize,

    /// Enable verbose logging
    #[arg(short, long, env = "CABIDA_VERBOSE")]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: ComplianceEngine,
    pub validator: ComplianceValidator,
    /// Upload size limit in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(max_upload_bytes: usize) -> Self {
        let engine = ComplianceEngine::new();
        Self {
            validator: ComplianceValidator::new(engine.clone()),
            engine,
            max_upload_bytes,
        }
    }

    pub fn max_upload_mb(&self) -> f64 {
        self.max_upload_bytes as f64 / BYTES_PER_MB as f64
    }
}

/// All API routes with CORS and request tracing; rate limiting is added by
/// `main` since it needs the peer address.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // The file part itself is checked against the limit by the upload
    // handlers, which answer with a JSON 413.
    let body_limit =
        DefaultBodyLimit::max(state.max_upload_bytes.saturating_add(FORM_OVERHEAD_BYTES));

    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // Calculation
        .route("/api/v1/calculate/cabida", post(handle_calculate_cabida))
        .route(
            "/api/v1/calculate/quick-calculate",
            post(handle_quick_calculate),
        )
        .route(
            "/api/v1/calculate/zone-restrictions/:zone_type",
            get(handle_zone_restrictions),
        )
        // Validation
        .route(
            "/api/v1/validate/compliance",
            post(handle_validate_compliance),
        )
        .route(
            "/api/v1/validate/quick-validate",
            post(handle_quick_validate),
        )
        // Certificate upload
        .route(
            "/api/v1/upload/certificate",
            post(handle_upload_certificate),
        )
        .route(
            "/api/v1/upload/validate-format",
            post(handle_validate_format),
        )
        .route(
            "/api/v1/upload/supported-formats",
            get(handle_supported_formats),
        )
        // Reports
        .route(
            "/api/v1/reports/preview-report",
            post(handle_report_preview),
        )
        .route("/api/v1/reports/generate-pdf", post(handle_cabida_report))
        .route(
            "/api/v1/reports/generate-summary",
            post(handle_summary_report),
        )
        .route(
            "/api/v1/reports/report-templates",
            get(handle_report_templates),
        )
        // Short report aliases
        .route("/api/v1/reports/preview", post(handle_report_preview))
        .route("/api/v1/reports/cabida", post(handle_cabida_report))
        .route("/api/v1/reports/summary", post(handle_summary_report))
        .route("/api/v1/reports/templates", get(handle_report_templates))
        // Apply middleware
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cabida server on {}:{}", args.host, args.port);

    // Create rate limiter configuration
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.into())
            .burst_size(args.rate_limit.saturating_mul(2))
            .finish()
            .ok_or_else(|| anyhow::anyhow!("invalid rate limit: {}", args.rate_limit))?,
    );

    let state = AppState::new(args.max_upload_mb.saturating_mul(BYTES_PER_MB));

    let app = build_router(state).layer(GovernorLayer {
        config: governor_conf,
    });

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);
    info!("Upload limit: {}MB", args.max_upload_mb);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
