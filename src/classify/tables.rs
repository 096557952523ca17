//! Built-in classification tables.

use super::{Bucket, BucketTable, Floor, Rgb};

const NO_DATA: Rgb = Rgb::new(150, 150, 150);

fn bucket(upper: f64, color: Rgb, label: &str) -> Bucket {
    Bucket { upper, color, label: label.to_string() }
}

impl BucketTable {
    pub const IRRADIANCE_2017: &'static str = "irradiance-2017";
    pub const UV_INDEX_WHO: &'static str = "uv-index-who";
    pub const COUNTY_CHART: &'static str = "county-chart";

    /// Yearly mean UV irradiation in mW/m², as drawn on the 2017 county map legend.
    pub fn irradiance_2017() -> Self {
        Self {
            version: Self::IRRADIANCE_2017.into(),
            floor: Some(Floor { below: 74.0, color: Rgb::new(255, 255, 240), label: "< 74".into() }),
            buckets: vec![
                bucket(131.0, Rgb::new(255, 255, 224), "74 - 131"),
                bucket(165.0, Rgb::new(255, 215, 0), "> 131 - 165"),
                bucket(186.0, Rgb::new(255, 165, 0), "> 165 - 186"),
                bucket(198.0, Rgb::new(255, 140, 0), "> 186 - 198"),
                bucket(247.0, Rgb::new(255, 69, 0), "> 198 - 247"),
            ],
            no_data: NO_DATA,
        }
    }

    /// UV index exposure categories (low, moderate, high, very high, extreme).
    pub fn uv_index_who() -> Self {
        Self {
            version: Self::UV_INDEX_WHO.into(),
            floor: None,
            buckets: vec![
                bucket(2.0, Rgb::new(32, 25, 245), "Low (≤ 2)"),
                bucket(5.0, Rgb::new(96, 29, 240), "Moderate (> 2 - 5)"),
                bucket(7.0, Rgb::new(154, 26, 240), "High (> 5 - 7)"),
                bucket(10.0, Rgb::new(192, 26, 218), "Very high (> 7 - 10)"),
                bucket(11.0, Rgb::new(240, 19, 188), "Extreme (> 10)"),
            ],
            no_data: NO_DATA,
        }
    }

    /// Bar colors of the county ranking, over irradiation in mW/m². Values above
    /// 186 all share the last color.
    pub fn county_chart() -> Self {
        Self {
            version: Self::COUNTY_CHART.into(),
            floor: Some(Floor { below: 74.0, color: Rgb::new(255, 215, 0), label: "< 74".into() }),
            buckets: vec![
                bucket(131.0, Rgb::new(255, 204, 0), "74 - 131"),
                bucket(165.0, Rgb::new(255, 153, 0), "> 131 - 165"),
                bucket(186.0, Rgb::new(255, 102, 0), "> 165 - 186"),
                bucket(247.0, Rgb::new(255, 0, 0), "> 186"),
            ],
            no_data: NO_DATA,
        }
    }

    /// Looks up a built-in table by version name.
    pub fn builtin(version: &str) -> Option<Self> {
        match version {
            Self::IRRADIANCE_2017 => Some(Self::irradiance_2017()),
            Self::UV_INDEX_WHO => Some(Self::uv_index_who()),
            Self::COUNTY_CHART => Some(Self::county_chart()),
            _ => None,
        }
    }
}
