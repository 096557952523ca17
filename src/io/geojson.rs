use std::{fs, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::{dashboard::UnitStyle, key::{GeoLevel, RegionKey}, map::FeatureLayer, types::GeoFeature};

/// Names of the feature properties holding the administrative codes. Defaults match
/// the census cartographic boundary files (`STATE`, `COUNTY`, `NAME`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureProps {
    pub state: String,
    pub county: String,
    pub name: String,
    /// Combined code property, used instead of `state`/`county` when set.
    /// Census `GEO_ID` values such as `0500000US06037` are accepted.
    pub geoid: Option<String>,
}

impl Default for FeatureProps {
    fn default() -> Self {
        Self { state: "STATE".into(), county: "COUNTY".into(), name: "NAME".into(), geoid: None }
    }
}

/// Reads a GeoJSON FeatureCollection file into a feature layer.
pub fn read_features(path: &Path, level: GeoLevel, props: &FeatureProps) -> Result<FeatureLayer> {
    let bytes = fs::read(path)
        .with_context(|| format!("[io::geojson] Failed to open boundary file: {}", path.display()))?;
    read_features_bytes(&bytes, level, props)
        .with_context(|| format!("[io::geojson] Failed to read features from {}", path.display()))
}

/// Reads a GeoJSON FeatureCollection into a feature layer. Keys go through the same
/// constructors as measurement keys; a feature with a malformed code or a duplicate
/// key fails the whole read.
pub fn read_features_bytes(bytes: &[u8], level: GeoLevel, props: &FeatureProps) -> Result<FeatureLayer> {
    let value: Value = serde_json::from_slice(bytes).context("[io::geojson] Failed to parse GeoJSON bytes")?;
    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("[io::geojson] Expected a FeatureCollection with a features array"))?;

    let mut layer = FeatureLayer::new(level);
    for (idx, feature) in features.iter().enumerate() {
        let empty = Map::new();
        let properties = feature["properties"].as_object().unwrap_or(&empty);

        let key = feature_key(properties, level, props)
            .with_context(|| format!("[io::geojson] Feature {idx} has no usable {} key", level.to_str()))?;
        let name = property(properties, &props.name).unwrap_or_else(|| key.to_string());

        let mut out = GeoFeature::new(key, name);
        match &feature["geometry"] {
            Value::Null => {}
            geometry => match parse_geometry(geometry) {
                Ok(mp) => out = out.with_geometry(mp),
                Err(e) => log::warn!("[io::geojson] Failed to convert geometry for feature {idx}: {e}"),
            },
        }
        layer.push(out).with_context(|| format!("[io::geojson] Feature {idx} rejected"))?;
    }

    log::info!("[io::geojson] read {} {} feature(s)", layer.len(), level.to_str());
    Ok(layer)
}

/// Styled FeatureCollection for the map renderer: one feature per style, with the
/// geometry of the matching layer feature and `key`, `name`, `value`, `color`,
/// `selected` properties. `value` is null for units without data.
pub fn styles_to_geojson(layer: &FeatureLayer, styles: &[UnitStyle]) -> Value {
    let features: Vec<Value> = styles.iter().map(|style| {
        let geometry = layer.get(&style.key)
            .and_then(|feature| feature.geometry.as_ref())
            .map_or(Value::Null, multipolygon_to_geojson);

        json!({
            "type": "Feature",
            "id": style.key.id(),
            "geometry": geometry,
            "properties": {
                "key": style.key.id(),
                "name": style.display_name,
                "value": style.value,
                "color": style.color.to_string(),
                "selected": style.selected,
            },
        })
    }).collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// A property as a string. Numbers are formatted as-is, so an unpadded numeric
/// code is rejected by the key constructors instead of being padded here.
fn property(properties: &Map<String, Value>, name: &str) -> Option<String> {
    match properties.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn feature_key(properties: &Map<String, Value>, level: GeoLevel, props: &FeatureProps) -> Result<RegionKey> {
    if let Some(geoid_prop) = &props.geoid {
        let geoid = property(properties, geoid_prop)
            .ok_or_else(|| anyhow!("missing property {geoid_prop:?}"))?;
        let code = geoid.rsplit_once("US").map_or(geoid.as_str(), |(_, code)| code);
        return Ok(RegionKey::from_geoid(code)?);
    }

    let state = property(properties, &props.state)
        .ok_or_else(|| anyhow!("missing property {:?}", props.state))?;
    match level {
        GeoLevel::State => Ok(RegionKey::state(&state)?),
        GeoLevel::County => {
            let county = property(properties, &props.county)
                .ok_or_else(|| anyhow!("missing property {:?}", props.county))?;
            Ok(RegionKey::county(&state, &county)?)
        }
    }
}

/// Parse a GeoJSON Polygon or MultiPolygon geometry into a geo::MultiPolygon.
fn parse_geometry(geometry: &Value) -> Result<MultiPolygon<f64>> {
    let coords = geometry["coordinates"].as_array()
        .ok_or_else(|| anyhow!("geometry has no coordinates"))?;

    match geometry["type"].as_str() {
        Some("Polygon") => Ok(MultiPolygon(vec![parse_polygon(coords)?])),
        Some("MultiPolygon") => coords.iter()
            .map(|polygon| {
                let rings = polygon.as_array().ok_or_else(|| anyhow!("invalid MultiPolygon member"))?;
                parse_polygon(rings)
            })
            .collect::<Result<Vec<_>>>()
            .map(MultiPolygon),
        other => bail!("unsupported geometry type {other:?}"),
    }
}

/// Parse polygon rings: exterior first, then holes.
fn parse_polygon(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        let coords = ring.as_array().ok_or_else(|| anyhow!("invalid ring"))?;
        parse_ring(coords)
    });
    let exterior = rings.next().ok_or_else(|| anyhow!("polygon is missing its exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring from GeoJSON coordinates: [[x, y], [x, y], ...]
fn parse_ring(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = Vec::with_capacity(coords.len());

    for coord_pair in coords {
        let pair = coord_pair.as_array().filter(|a| a.len() >= 2)
            .ok_or_else(|| anyhow!("invalid coordinate: expected [x, y]"))?;
        let x = pair[0].as_f64().ok_or_else(|| anyhow!("invalid coordinate: x must be a number"))?;
        let y = pair[1].as_f64().ok_or_else(|| anyhow!("invalid coordinate: y must be a number"))?;
        points.push(Coord { x, y });
    }

    // Ensure ring is closed (first point == last point)
    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }

    Ok(LineString(points))
}

fn multipolygon_to_geojson(mp: &MultiPolygon<f64>) -> Value {
    let ring = |ls: &LineString<f64>| -> Vec<[f64; 2]> { ls.coords().map(|c| [c.x, c.y]).collect() };
    let polygons: Vec<Vec<Vec<[f64; 2]>>> = mp.0.iter()
        .map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()).map(ring).collect())
        .collect();

    json!({
        "type": "MultiPolygon",
        "coordinates": polygons,
    })
}
