use ahash::AHashMap;

use crate::{error::KeyError, key::{state_name, GeoLevel, RegionKey, STATE_NAMES}, types::GeoFeature};

/// All boundary features of one level, indexed by key.
#[derive(Debug, Clone)]
pub struct FeatureLayer {
    ty: GeoLevel,
    index: AHashMap<RegionKey, u32>, // Map between keys and positions in `features`.
    features: Vec<GeoFeature>,
}

impl FeatureLayer {
    pub fn new(ty: GeoLevel) -> Self {
        Self { ty, index: AHashMap::new(), features: Vec::new() }
    }

    /// Build a layer, rejecting features of another level and duplicate keys.
    pub fn from_features(ty: GeoLevel, features: impl IntoIterator<Item = GeoFeature>) -> Result<Self, KeyError> {
        let mut layer = Self::new(ty);
        for feature in features { layer.push(feature)? }
        Ok(layer)
    }

    /// State layer synthesized from the FIPS name table, without geometry.
    pub fn from_state_names() -> Self {
        let mut layer = Self::new(GeoLevel::State);
        for (code, name) in STATE_NAMES {
            if let Ok(key) = RegionKey::state(code) {
                layer.index.insert(key.clone(), layer.features.len() as u32);
                layer.features.push(GeoFeature::new(key, *name));
            }
        }
        layer
    }

    pub fn push(&mut self, feature: GeoFeature) -> Result<(), KeyError> {
        let found = feature.key.level();
        if found != self.ty {
            return Err(KeyError::LevelMismatch { key: feature.key, expected: self.ty, found });
        }
        if self.index.contains_key(&feature.key) {
            return Err(KeyError::DuplicateFeature(feature.key));
        }
        self.index.insert(feature.key.clone(), self.features.len() as u32);
        self.features.push(feature);
        Ok(())
    }

    #[inline] pub fn level(&self) -> GeoLevel { self.ty }
    #[inline] pub fn len(&self) -> usize { self.features.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }
    #[inline] pub fn features(&self) -> &[GeoFeature] { &self.features }

    #[inline]
    pub fn position(&self, key: &RegionKey) -> Option<usize> {
        self.index.get(key).map(|&i| i as usize)
    }

    #[inline]
    pub fn contains(&self, key: &RegionKey) -> bool { self.index.contains_key(key) }

    pub fn get(&self, key: &RegionKey) -> Option<&GeoFeature> {
        self.position(key).map(|i| &self.features[i])
    }

    /// Display name of `key`, falling back to the FIPS table for states.
    pub fn display_name(&self, key: &RegionKey) -> Option<&str> {
        match self.get(key) {
            Some(feature) => Some(feature.display_name.as_str()),
            None if key.level() == GeoLevel::State => state_name(key.id()),
            None => None,
        }
    }

    /// Name join: exact, case-sensitive match on display names. State layers only;
    /// county names repeat across states and never identify a unit.
    pub fn key_by_name(&self, name: &str) -> Option<&RegionKey> {
        if self.ty != GeoLevel::State { return None }
        self.features.iter()
            .find(|feature| feature.display_name == name)
            .map(|feature| &feature.key)
    }
}
