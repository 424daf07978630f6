pub mod certificate;
pub mod types;

pub use certificate::{AdditionalData, CertificateData};
pub use types::{
    CalculationParameters, CalculationReport, CalculationResult, ComplianceStatus,
    decimal, RejectionCategory, RejectionReason, Severity, ValidationFinding,
};

/// Height assumed when a certificate does not state one (meters)
pub const DEFAULT_MAX_HEIGHT: f64 = 23.0;

/// Constructibility coefficient assumed when a certificate does not state one
pub const DEFAULT_CONSTRUCTIBILITY_COEF: f64 = 1.0;

/// Occupation percentage assumed when a certificate does not state one
pub const DEFAULT_OCCUPATION_PERCENTAGE: f64 = 60.0;

/// Minimum dwelling area used when the caller does not provide one (m²)
pub const DEFAULT_MIN_DWELLING_AREA: f64 = 40.0;

/// Zone used by the certificate-less endpoints when none is given
pub const DEFAULT_ZONE: &str = "residencial";
