use serde::{Deserialize, Serialize};

use super::classifier::FeatureType;

/// Minimum separation per feature type, in meters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Thresholds {
    /// Standalone points.
    pub point_m: f64,
    /// Ways that fall through to the default feature type.
    pub way_m: f64,
    pub indoor_m: f64,
    pub building_m: f64,
    pub path_m: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            point_m: 0.2,
            way_m: 2.0,
            indoor_m: 0.01,
            building_m: 0.05,
            path_m: 0.1,
        }
    }
}

impl Thresholds {
    /// Allowed separation between consecutive vertices. Boundaries are exempt
    /// from scanning altogether, so they have none.
    pub fn for_feature(&self, feature: FeatureType) -> Option<f64> {
        match feature {
            FeatureType::Boundary => None,
            FeatureType::Indoor => Some(self.indoor_m),
            FeatureType::Building => Some(self.building_m),
            FeatureType::Path => Some(self.path_m),
            FeatureType::Other => Some(self.way_m),
        }
    }
}
