// Building height cap per OGUC art. 2.6.5
use oguc_types::{CalculationParameters, RejectionReason};

/// Heights above this are not plausible for any Chilean zoning plan (m)
pub const MAX_REASONABLE_HEIGHT: f64 = 50.0;

pub fn check_max_height(params: &CalculationParameters) -> Option<RejectionReason> {
    (params.max_height > MAX_REASONABLE_HEIGHT).then(|| RejectionReason::HeightExceedsLimit {
        height: params.max_height,
        limit: MAX_REASONABLE_HEIGHT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::params;

    #[test]
    fn test_flags_excessive_height() {
        let reason = check_max_height(&params(500.0, 1.2, 60.0, 60.0)).unwrap();
        assert_eq!(
            reason.message(),
            "Altura máxima (60.0m) excede límites razonables (50m)"
        );
    }

    #[test]
    fn test_accepts_height_at_limit() {
        assert!(check_max_height(&params(500.0, 1.2, 50.0, 60.0)).is_none());
    }
}
