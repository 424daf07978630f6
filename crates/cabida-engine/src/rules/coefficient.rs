// Constructibility coefficient band per OGUC art. 2.6.3
use oguc_types::{CalculationParameters, RejectionReason};

/// Largest coefficient any communal plan grants
pub const MAX_CONSTRUCTIBILITY_COEF: f64 = 3.0;

/// The coefficient must lie in (0, 3.0]
pub fn check_constructibility_coefficient(
    params: &CalculationParameters,
) -> Option<RejectionReason> {
    let coefficient = params.constructibility_coefficient;
    (coefficient <= 0.0 || coefficient > MAX_CONSTRUCTIBILITY_COEF)
        .then_some(RejectionReason::CoefficientOutOfRange { coefficient })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::params;

    #[test]
    fn test_flags_coefficient_above_band() {
        let reason = check_constructibility_coefficient(&params(500.0, 5.0, 23.0, 60.0)).unwrap();
        assert!(reason.message().contains("(5.0)"));
        assert!(reason.message().contains("0.1 - 3.0"));
    }

    #[test]
    fn test_flags_zero_and_negative_coefficients() {
        assert!(check_constructibility_coefficient(&params(500.0, 0.0, 23.0, 60.0)).is_some());
        assert!(check_constructibility_coefficient(&params(500.0, -1.0, 23.0, 60.0)).is_some());
    }

    #[test]
    fn test_upper_bound_is_inclusive() {
        assert!(check_constructibility_coefficient(&params(500.0, 3.0, 23.0, 60.0)).is_none());
        assert!(check_constructibility_coefficient(&params(500.0, 0.05, 23.0, 60.0)).is_none());
    }
}
