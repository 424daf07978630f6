//! OGUC admissibility rules
//!
//! Each rule inspects the calculation parameters on its own and reports at
//! most one [`RejectionReason`]. All rules always run so a rejected project
//! lists every failed rule, in the order below.

pub mod coefficient;
pub mod height;
pub mod occupation;
pub mod surface;

use oguc_types::{CalculationParameters, RejectionReason};

use crate::zones::ZoneRulesTable;

pub use coefficient::{check_constructibility_coefficient, MAX_CONSTRUCTIBILITY_COEF};
pub use height::{check_max_height, MAX_REASONABLE_HEIGHT};
pub use occupation::check_occupation;
pub use surface::{check_minimum_surface, MIN_LEGAL_SURFACE};

/// Run every rule, collecting the failures in evaluation order
pub fn check_all(params: &CalculationParameters, zones: &ZoneRulesTable) -> Vec<RejectionReason> {
    [
        check_minimum_surface(params),
        check_constructibility_coefficient(params),
        check_max_height(params),
        check_occupation(params, zones),
    ]
    .into_iter()
    .flatten()
    .collect()
}
