// Ground occupation per zone, OGUC art. 2.6.4
use oguc_types::{CalculationParameters, RejectionReason};

use crate::zones::ZoneRulesTable;

/// Compare the requested occupation against the zone's limit. Unknown zones
/// are held to the residential limit; the message names the zone as given.
pub fn check_occupation(
    params: &CalculationParameters,
    zones: &ZoneRulesTable,
) -> Option<RejectionReason> {
    let max_percentage = zones.lookup(&params.zone_type).max_occupation_percentage();

    (params.occupation_percentage > max_percentage).then(|| {
        RejectionReason::OccupationExceedsZoneMax {
            occupation: params.occupation_percentage,
            zone: params.zone_type.clone(),
            max_percentage,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{params, params_in_zone};

    #[test]
    fn test_flags_occupation_above_residential_limit() {
        let zones = ZoneRulesTable::oguc();
        let reason = check_occupation(&params(500.0, 1.2, 23.0, 85.0), &zones).unwrap();
        assert_eq!(
            reason.message(),
            "Porcentaje de ocupación (85.0%) excede máximo para zona residencial (60.0%)"
        );
    }

    #[test]
    fn test_commercial_zone_allows_higher_occupation() {
        let zones = ZoneRulesTable::oguc();
        let request = params_in_zone(1000.0, 2.5, 28.0, 75.0, "comercial");
        assert!(check_occupation(&request, &zones).is_none());
    }

    #[test]
    fn test_unknown_zone_uses_residential_limit() {
        let zones = ZoneRulesTable::oguc();
        let request = params_in_zone(500.0, 1.0, 23.0, 65.0, "Rural");
        let reason = check_occupation(&request, &zones).unwrap();
        assert!(reason.message().contains("zona Rural (60.0%)"));
    }

    #[test]
    fn test_zone_lookup_ignores_case() {
        let zones = ZoneRulesTable::oguc();
        let request = params_in_zone(500.0, 1.0, 23.0, 80.0, "COMERCIAL");
        assert!(check_occupation(&request, &zones).is_none());
    }
}
