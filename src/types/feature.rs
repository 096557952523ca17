use geo::MultiPolygon;

use crate::key::RegionKey;

/// One boundary polygon. The geometry is carried for the renderer and never read here.
#[derive(Debug, Clone)]
pub struct GeoFeature {
    pub key: RegionKey,
    pub display_name: String,
    pub geometry: Option<MultiPolygon<f64>>,
}

impl GeoFeature {
    pub fn new(key: RegionKey, display_name: impl Into<String>) -> Self {
        Self { key, display_name: display_name.into(), geometry: None }
    }

    pub fn with_geometry(mut self, geometry: MultiPolygon<f64>) -> Self {
        self.geometry = Some(geometry);
        self
    }
}
