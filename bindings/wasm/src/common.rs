use anyhow::{anyhow, Result};
use serde::Serialize;
use wasm_bindgen::JsValue;

pub(crate) fn js_err(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

pub(crate) fn parse_level(level: Option<String>) -> Result<uvmap_core::GeoLevel> {
    let level = level.as_deref().unwrap_or("county");
    uvmap_core::GeoLevel::from_str(level)
        .ok_or_else(|| anyhow!("Unknown level {:?}. Expected one of: state, county", level))
}

pub(crate) fn parse_key(code: &str) -> Result<uvmap_core::RegionKey, JsValue> {
    uvmap_core::RegionKey::from_geoid(code).map_err(js_err)
}

/// Serialize through a JSON string and parse on the JS side; large feature
/// collections convert faster this way than value by value.
pub(crate) fn to_js_json(value: &impl Serialize) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value)
        .map_err(|e| js_err(format!("Failed to serialize to JSON: {e}")))?;
    js_sys::JSON::parse(&json)
}
