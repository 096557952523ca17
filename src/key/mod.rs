//! Region keys and the rules for deriving them.
//!
//! `RegionKey` is the join key shared by measurement records and boundary features.
//! Its fields are private: the constructors in this module are the only way to build
//! one, so both sides of a join are always normalized by the same rules.

mod normalize;
mod states;

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::error::KeyError;

pub use normalize::{normalize_rows, Normalized, Rejection};
pub use states::{state_name, STATE_NAMES};

/// Administrative level of a geographic unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoLevel {
    State,      // Highest-level entity
    County,     // County -> State
}

impl GeoLevel {
    /// Width of the full FIPS code at this level.
    pub fn key_len(&self) -> usize {
        match self {
            GeoLevel::State => 2,
            GeoLevel::County => 5,
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            GeoLevel::State => "state",
            GeoLevel::County => "county",
        }
    }

    pub fn from_str(s: &str) -> Option<GeoLevel> {
        match s {
            "state" => Some(GeoLevel::State),
            "county" => Some(GeoLevel::County),
            _ => None,
        }
    }
}

/// Stable join key for a state or county: the zero-padded FIPS code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionKey {
    level: GeoLevel,
    id: Arc<str>, // e.g. "06" for a state, "06037" for a county
}

const STATE_WIDTH: usize = 2;
const COUNTY_WIDTH: usize = 3;

impl RegionKey {
    /// Key of a state from its 2-digit FIPS code.
    pub fn state(state: &str) -> Result<Self, KeyError> {
        let state = fixed_width("state", state, STATE_WIDTH)?;
        Ok(Self { level: GeoLevel::State, id: Arc::from(state) })
    }

    /// Key of a county from its 2-digit state and 3-digit county FIPS codes.
    pub fn county(state: &str, county: &str) -> Result<Self, KeyError> {
        let state = fixed_width("state", state, STATE_WIDTH)?;
        let county = fixed_width("county", county, COUNTY_WIDTH)?;
        Ok(Self { level: GeoLevel::County, id: Arc::from(format!("{state}{county}")) })
    }

    /// Key from a combined GEOID: 2 digits for a state, 5 for a county.
    pub fn from_geoid(geoid: &str) -> Result<Self, KeyError> {
        let geoid = geoid.trim();
        ensure_digits("geoid", geoid)?;
        match geoid.len() {
            2 => Self::state(geoid),
            5 => Self::county(&geoid[..STATE_WIDTH], &geoid[STATE_WIDTH..]),
            _ => Err(KeyError::AmbiguousKey {
                field: "geoid",
                value: geoid.to_string(),
                expected: "2 or 5 digits",
            }),
        }
    }

    pub fn level(&self) -> GeoLevel { self.level }

    pub fn id(&self) -> &str { &self.id }

    /// Returns the key of the enclosing unit at `parent` level, or `None` when
    /// `parent` is finer than this key's own level.
    pub fn to_parent(&self, parent: GeoLevel) -> Option<RegionKey> {
        if parent > self.level { return None }
        if parent == self.level { return Some(self.clone()) }

        Some(RegionKey {
            level: parent,
            id: Arc::from(&self.id[..parent.key_len()]),
        })
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl Serialize for RegionKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id)
    }
}

impl<'de> Deserialize<'de> for RegionKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        RegionKey::from_geoid(&s).map_err(serde::de::Error::custom)
    }
}

fn ensure_digits(field: &'static str, value: &str) -> Result<(), KeyError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(KeyError::NotNumeric { field, value: value.to_string() });
    }
    Ok(())
}

/// Trims `value` and checks it is exactly `width` ASCII digits. An unpadded code
/// ("6" for California) is a caller defect and is rejected, never padded here.
fn fixed_width<'a>(field: &'static str, value: &'a str, width: usize) -> Result<&'a str, KeyError> {
    let value = value.trim();
    ensure_digits(field, value)?;
    if value.len() != width {
        return Err(KeyError::AmbiguousKey {
            field,
            value: value.to_string(),
            expected: if width == STATE_WIDTH { "2 digits" } else { "3 digits" },
        });
    }
    Ok(value)
}
