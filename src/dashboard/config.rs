use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{aggregate::AggregatorKind, classify::BucketTable, key::GeoLevel};

/// Quantity shown on the ranking chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    /// Irradiation as measured, mW/m².
    Irradiance,
    /// UV index: erythemal irradiance in W/m² times 40.
    #[default]
    UvIndex,
}

impl Measure {
    pub fn convert(&self, irradiance: f64) -> f64 {
        match self {
            Measure::Irradiance => irradiance,
            Measure::UvIndex => irradiance * 0.001 * 40.0,
        }
    }
}

/// Display configuration. Every field is optional in JSON and defaults to the
/// county map with a state-average UV index ranking, switching to county
/// irradiation once a county is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Level of the choropleth units.
    pub map_level: GeoLevel,
    /// Level the ranking rolls records up to while nothing is selected.
    pub rollup_level: GeoLevel,
    pub aggregator: AggregatorKind,
    pub map_table: BucketTable,
    /// Measure and colors of the rollup ranking.
    pub ranking_measure: Measure,
    pub ranking_table: BucketTable,
    /// Measure and colors of the ranking of a selected unit's siblings.
    pub sibling_measure: Measure,
    pub sibling_table: BucketTable,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            map_level: GeoLevel::County,
            rollup_level: GeoLevel::State,
            aggregator: AggregatorKind::Mean,
            map_table: BucketTable::irradiance_2017(),
            ranking_measure: Measure::UvIndex,
            ranking_table: BucketTable::uv_index_who(),
            sibling_measure: Measure::Irradiance,
            sibling_table: BucketTable::county_chart(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("[dashboard::config] Failed to parse dashboard config")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("[dashboard::config] Failed to read config file: {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("[dashboard::config] Invalid config in {}", path.display()))
    }
}
