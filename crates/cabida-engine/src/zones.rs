//! Zone limits from the OGUC and the communal regulatory plans
//!
//! The table is configuration data: it is built once and shared read-only
//! between every engine instance.

use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Table used by [`crate::ComplianceEngine::new`]
    pub static ref OGUC_ZONES: Arc<ZoneRulesTable> = Arc::new(ZoneRulesTable::oguc());
}

/// Zoning categories that have their own limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneType {
    Residential,
    Commercial,
    Industrial,
    Mixed,
}

impl ZoneType {
    pub const ALL: [ZoneType; 4] = [
        ZoneType::Residential,
        ZoneType::Commercial,
        ZoneType::Industrial,
        ZoneType::Mixed,
    ];

    /// Key used on certificates and in API requests
    pub fn key(&self) -> &'static str {
        match self {
            ZoneType::Residential => "residencial",
            ZoneType::Commercial => "comercial",
            ZoneType::Industrial => "industrial",
            ZoneType::Mixed => "mixto",
        }
    }

    /// Case-insensitive parse of either the Spanish key or the English name
    pub fn parse(value: &str) -> Option<ZoneType> {
        match value.to_lowercase().as_str() {
            "residencial" | "residential" => Some(ZoneType::Residential),
            "comercial" | "commercial" => Some(ZoneType::Commercial),
            "industrial" => Some(ZoneType::Industrial),
            "mixto" | "mixed" => Some(ZoneType::Mixed),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        match self {
            ZoneType::Residential => 0,
            ZoneType::Commercial => 1,
            ZoneType::Industrial => 2,
            ZoneType::Mixed => 3,
        }
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Limits for one zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneRule {
    pub max_height: f64,
    pub max_constructibility: f64,
    /// Fraction of the parcel footprint (0.0 - 1.0)
    #[serde(rename = "max_occupation")]
    pub max_occupation_fraction: f64,
}

impl ZoneRule {
    /// Occupation limit on the same 0-100 scale as the request
    pub fn max_occupation_percentage(&self) -> f64 {
        self.max_occupation_fraction * 100.0
    }
}

/// One [`ZoneRule`] per [`ZoneType`]. Unknown zone names resolve to the
/// residential rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneRulesTable {
    rules: [ZoneRule; 4],
}

impl ZoneRulesTable {
    pub fn new(
        residential: ZoneRule,
        commercial: ZoneRule,
        industrial: ZoneRule,
        mixed: ZoneRule,
    ) -> Self {
        Self {
            rules: [residential, commercial, industrial, mixed],
        }
    }

    /// General limits applied when no communal plan overrides them
    pub fn oguc() -> Self {
        Self::new(
            ZoneRule {
                max_height: 23.0,
                max_constructibility: 2.0,
                max_occupation_fraction: 0.6,
            },
            ZoneRule {
                max_height: 30.0,
                max_constructibility: 3.0,
                max_occupation_fraction: 0.8,
            },
            ZoneRule {
                max_height: 25.0,
                max_constructibility: 2.5,
                max_occupation_fraction: 0.7,
            },
            ZoneRule {
                max_height: 28.0,
                max_constructibility: 2.5,
                max_occupation_fraction: 0.7,
            },
        )
    }

    pub fn rule(&self, zone: ZoneType) -> &ZoneRule {
        &self.rules[zone.index()]
    }

    /// Resolve a free-form zone name, falling back to residential
    pub fn lookup(&self, zone_type: &str) -> &ZoneRule {
        self.rule(ZoneType::parse(zone_type).unwrap_or(ZoneType::Residential))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ZoneType, &ZoneRule)> {
        ZoneType::ALL.into_iter().map(move |zone| (zone, self.rule(zone)))
    }
}

impl Default for ZoneRulesTable {
    fn default() -> Self {
        Self::oguc()
    }
}
