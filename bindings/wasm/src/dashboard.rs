use serde_json::json;
use uvmap_core::{
    io::{self, FeatureProps}, Boundaries, CsvLayout, Dashboard, DashboardConfig, GeoLevel, RecordFormat,
};
use wasm_bindgen::{JsValue, prelude::wasm_bindgen};

use crate::common::*;

#[wasm_bindgen]
pub struct WasmDashboard {
    inner: Dashboard,
}

#[wasm_bindgen]
impl WasmDashboard {
    /// Construct a dashboard from an optional JSON config string.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<WasmDashboard, JsValue> {
        let config = match config {
            Some(json) => DashboardConfig::from_json_str(&json).map_err(|e| js_err(format!("{e:#}")))?,
            None => DashboardConfig::default(),
        };
        Ok(WasmDashboard { inner: Dashboard::new(config) })
    }

    /// Load measurements and boundaries:
    /// records: CSV text, counties/states: GeoJSON FeatureCollection bytes,
    /// format: optional JSON record format (defaults to County,CountyFIPS,value).
    /// Returns { records, skipped, unmatched_names }.
    pub fn load(
        &mut self,
        records: String,
        counties: Vec<u8>,
        states: Option<Vec<u8>>,
        format: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let format = match format {
            Some(json) => serde_json::from_str::<RecordFormat>(&json)
                .map_err(|e| js_err(format!("Invalid record format: {e}")))?,
            None => RecordFormat::Csv(CsvLayout::county_fips()),
        };

        let props = FeatureProps::default();
        let counties = io::read_features_bytes(&counties, GeoLevel::County, &props)
            .map_err(|e| js_err(format!("{e:#}")))?;
        let boundaries = match states {
            Some(bytes) => {
                let states = io::read_features_bytes(&bytes, GeoLevel::State, &props)
                    .map_err(|e| js_err(format!("{e:#}")))?;
                Boundaries::new(states, counties)
            }
            None => Boundaries::from_counties(counties),
        };

        let report = self.inner.load_text(&records, &format, boundaries).map_err(js_err)?;
        let skipped: Vec<String> = report.skipped.iter()
            .map(|s| format!("row {}: {}", s.row, s.reason))
            .collect();
        to_js_json(&json!({
            "records": report.records,
            "skipped": skipped,
            "unmatched_names": report.unmatched_names,
        }))
    }

    pub fn is_ready(&self) -> bool { self.inner.is_ready() }

    /// Click a map unit by FIPS code, e.g. "06037".
    pub fn on_unit_clicked(&mut self, code: String) -> Result<(), JsValue> {
        let key = parse_key(&code)?;
        self.inner.on_unit_clicked(&key).map_err(js_err)?;
        Ok(())
    }

    pub fn on_reset_selection(&mut self) -> Result<(), JsValue> {
        self.inner.on_reset_selection().map_err(js_err)?;
        Ok(())
    }

    /// Flip the ranking order; returns true when it is now descending.
    pub fn on_toggle_sort(&mut self) -> Result<bool, JsValue> {
        let snapshot = self.inner.on_toggle_sort().map_err(js_err)?;
        Ok(snapshot.ranking().order() == uvmap_core::SortOrder::Descending)
    }

    /// FIPS code of the selected unit, if any.
    pub fn selected(&self) -> Option<String> {
        self.inner.snapshot().selection().selected().map(|key| key.to_string())
    }

    /// Display name of the selected unit, if any.
    pub fn selected_name(&self) -> Option<String> {
        self.inner.selected_name().map(str::to_string)
    }

    /// Array of { key, display_name, value, color, selected } per map unit.
    pub fn map_styles(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.map_styles()).map_err(|e| e.into())
    }

    /// Styled map as a GeoJSON FeatureCollection object.
    #[wasm_bindgen(js_name = "to_geojson")]
    pub fn to_geojson(&self) -> Result<JsValue, JsValue> {
        let layer = self.inner.map_layer().ok_or_else(|| js_err("dashboard has no data loaded yet"))?;
        to_js_json(&io::styles_to_geojson(layer, &self.inner.map_styles()))
    }

    /// Array of { display_name, value, color, fill, border } in the current order.
    pub fn ranking(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.ranking()).map_err(|e| e.into())
    }

    /// Legend entries of the table used at `level`: the map table for the map
    /// level, the table of the ranking currently shown otherwise. Defaults to "county".
    pub fn legend(&self, level: Option<String>) -> Result<JsValue, JsValue> {
        let level = parse_level(level).map_err(js_err)?;
        let legend = if level == self.inner.config().map_level {
            self.inner.map_legend()
        } else {
            self.inner.ranking_legend()
        };
        serde_wasm_bindgen::to_value(&legend).map_err(|e| e.into())
    }
}
