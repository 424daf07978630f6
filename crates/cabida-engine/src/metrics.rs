//! Derived cabida metrics
//!
//! These are computed for every request, approved or not, so a rejected
//! project still shows how far it is from compliance.

/// Standard storey height used to turn a height limit into floors (m)
pub const FLOOR_HEIGHT: f64 = 2.6;

/// Maximum buildable floor area: parcel × constructibility coefficient
pub fn max_building_surface(surface_area: f64, coefficient: f64) -> f64 {
    surface_area * coefficient
}

/// Maximum ground footprint for the requested occupation percentage
pub fn max_occupation_surface(surface_area: f64, occupation_percentage: f64) -> f64 {
    surface_area * (occupation_percentage / 100.0)
}

/// Floors that fit under the height limit, capped at the requested count
pub fn allowed_floors(requested: u32, max_height: f64) -> u32 {
    let by_height = (max_height / FLOOR_HEIGHT).floor();
    if by_height.is_nan() || by_height <= 0.0 {
        return 0;
    }
    // Saturating cast: heights beyond u32 floors still cap at `requested`
    requested.min(by_height as u32)
}

/// Whole dwelling units that fit in the buildable area
pub fn dwelling_units(max_building_surface: f64, min_dwelling_area: f64) -> u64 {
    if min_dwelling_area <= 0.0 {
        return 0;
    }
    let units = (max_building_surface / min_dwelling_area).floor();
    if units.is_nan() || units <= 0.0 {
        0
    } else {
        units as u64
    }
}

/// Share of the coefficient the project uses.
///
/// The buildable area is compared against `surface × coefficient`, which is
/// the same product, so any positive denominator yields 100.
// TODO: compare against the zone's max_constructibility once the product
// owners confirm that is the intended cap.
pub fn constructibility_utilization(
    surface_area: f64,
    coefficient: f64,
    max_building_surface: f64,
) -> f64 {
    let denominator = surface_area * coefficient;
    if denominator > 0.0 {
        (max_building_surface / denominator) * 100.0
    } else {
        0.0
    }
}

/// Building density as a percentage of the parcel
pub fn density(total_surface: f64, building_surface: f64) -> f64 {
    if total_surface == 0.0 {
        return 0.0;
    }
    (building_surface / total_surface) * 100.0
}

pub fn dwelling_meets_minimum(dwelling_area: f64, min_required: f64) -> bool {
    dwelling_area >= min_required
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_floors_by_height() {
        assert_eq!(allowed_floors(10, 15.0), 5);
        assert_eq!(allowed_floors(3, 23.0), 3);
        assert_eq!(allowed_floors(20, 23.0), 8);
    }

    #[test]
    fn test_allowed_floors_below_one_storey() {
        assert_eq!(allowed_floors(2, 2.5), 0);
        assert_eq!(allowed_floors(2, 0.0), 0);
        assert_eq!(allowed_floors(2, -5.0), 0);
    }

    #[test]
    fn test_dwelling_units_floor_divide() {
        assert_eq!(dwelling_units(600.0, 40.0), 15);
        assert_eq!(dwelling_units(639.9, 40.0), 15);
        assert_eq!(dwelling_units(39.0, 40.0), 0);
    }

    #[test]
    fn test_dwelling_units_never_negative() {
        assert_eq!(dwelling_units(-500.0, 40.0), 0);
        assert_eq!(dwelling_units(500.0, 0.0), 0);
    }

    #[test]
    fn test_dwelling_units_beyond_u32_range() {
        let building = max_building_surface(1e12, 1.2);
        assert_eq!(dwelling_units(building, 40.0), 30_000_000_000);
    }

    #[test]
    fn test_utilization_is_full_when_denominator_positive() {
        assert_eq!(constructibility_utilization(500.0, 1.2, 600.0), 100.0);
    }

    #[test]
    fn test_utilization_zero_when_denominator_not_positive() {
        assert_eq!(constructibility_utilization(0.0, 1.0, 0.0), 0.0);
        assert_eq!(constructibility_utilization(500.0, -1.0, -500.0), 0.0);
    }

    #[test]
    fn test_density() {
        assert_eq!(density(500.0, 300.0), 60.0);
        assert_eq!(density(0.0, 300.0), 0.0);
    }

    #[test]
    fn test_dwelling_meets_minimum() {
        assert!(dwelling_meets_minimum(50.0, 40.0));
        assert!(dwelling_meets_minimum(40.0, 40.0));
        assert!(!dwelling_meets_minimum(35.0, 40.0));
    }
}
