use crate::key::GeoLevel;

use super::layer::FeatureLayer;

/// Boundary features for every level the dashboard can show.
#[derive(Debug, Clone)]
pub struct Boundaries {
    pub states: FeatureLayer,
    pub counties: FeatureLayer,
}

impl Default for Boundaries {
    fn default() -> Self {
        Self {
            states: FeatureLayer::new(GeoLevel::State),
            counties: FeatureLayer::new(GeoLevel::County),
        }
    }
}

impl Boundaries {
    pub fn new(states: FeatureLayer, counties: FeatureLayer) -> Self {
        Self { states, counties }
    }

    /// County boundaries only; state units come from the FIPS name table.
    pub fn from_counties(counties: FeatureLayer) -> Self {
        Self { states: FeatureLayer::from_state_names(), counties }
    }

    pub fn get_layer(&self, ty: GeoLevel) -> &FeatureLayer {
        match ty {
            GeoLevel::State => &self.states,
            GeoLevel::County => &self.counties,
        }
    }
}
