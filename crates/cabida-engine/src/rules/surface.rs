// Minimum parcel surface per OGUC art. 4.1.2
use oguc_types::{CalculationParameters, RejectionReason};

/// Smallest parcel that can host a dwelling (m²)
pub const MIN_LEGAL_SURFACE: f64 = 40.0;

pub fn check_minimum_surface(params: &CalculationParameters) -> Option<RejectionReason> {
    (params.surface_area < MIN_LEGAL_SURFACE).then(|| RejectionReason::SurfaceTooSmall {
        surface: params.surface_area,
        minimum: MIN_LEGAL_SURFACE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::params;

    #[test]
    fn test_flags_parcel_below_minimum() {
        let reason = check_minimum_surface(&params(35.0, 1.0, 15.0, 60.0)).unwrap();
        assert!(reason.message().contains("35.0m²"));
        assert!(reason.message().contains("40.0m²"));
    }

    #[test]
    fn test_accepts_parcel_at_minimum() {
        assert!(check_minimum_surface(&params(40.0, 1.0, 23.0, 60.0)).is_none());
    }

    #[test]
    fn test_flags_zero_surface() {
        assert!(check_minimum_surface(&params(0.0, 1.0, 23.0, 60.0)).is_some());
    }
}
