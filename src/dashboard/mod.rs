//! The coordinating component: owns the loaded dataset, the selection and the sort
//! order, and recomputes a complete [`Snapshot`] on every trigger.

mod config;

use std::sync::Arc;

use serde::Serialize;

use crate::{
    aggregate::{AggregateQuery, Aggregation, Grouping},
    classify::{LegendEntry, Rgb},
    error::DashboardError,
    key::{normalize_rows, RegionKey},
    map::{Boundaries, FeatureLayer},
    parse::{parse_records, RecordFormat, SkippedRow},
    rank::{RankedEntry, Ranking, SortOrder},
    selection::SelectionState,
    types::MeasurementRecord,
};

pub use config::{DashboardConfig, Measure};

/// Styling of one map unit. `value` is `None` for units without data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitStyle {
    pub key: RegionKey,
    pub display_name: String,
    pub value: Option<f64>,
    pub color: Rgb,
    pub selected: bool,
}

/// One complete, internally consistent result. Replaced wholesale, never mutated.
#[derive(Debug, Clone)]
pub struct Snapshot {
    map: Arc<Aggregation>,
    secondary: Arc<Aggregation>,
    styles: Vec<UnitStyle>,
    ranking: Ranking,
    selection: SelectionState,
}

impl Snapshot {
    /// Unit-level aggregation behind the choropleth.
    pub fn map(&self) -> &Aggregation { &self.map }
    /// Aggregation behind the ranking: the rollup, or the selected unit's siblings.
    pub fn secondary(&self) -> &Aggregation { &self.secondary }
    pub fn map_styles(&self) -> &[UnitStyle] { &self.styles }
    pub fn ranking(&self) -> &Ranking { &self.ranking }
    pub fn ranked(&self) -> Vec<&RankedEntry> { self.ranking.entries() }
    pub fn selection(&self) -> &SelectionState { &self.selection }
}

/// Counts reported by [`Dashboard::load_text`].
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub records: usize,
    pub skipped: Vec<SkippedRow>,
    pub unmatched_names: Vec<(usize, String)>,
}

struct Dataset {
    records: Vec<MeasurementRecord>,
    boundaries: Boundaries,
}

pub struct Dashboard {
    config: DashboardConfig,
    data: Option<Dataset>,
    selection: SelectionState,
    order: SortOrder,
    snapshot: Arc<Snapshot>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        let empty = |level| Arc::new(Aggregation::empty(level));
        let snapshot = Snapshot {
            map: empty(config.map_level),
            secondary: empty(config.rollup_level),
            styles: Vec::new(),
            ranking: Ranking::default(),
            selection: SelectionState::Unselected,
        };
        Self {
            config,
            data: None,
            selection: SelectionState::Unselected,
            order: SortOrder::Natural,
            snapshot: Arc::new(snapshot),
        }
    }

    pub fn config(&self) -> &DashboardConfig { &self.config }

    pub fn is_ready(&self) -> bool { self.data.is_some() }

    /// Features of the map level, once a dataset is loaded.
    pub fn map_layer(&self) -> Option<&FeatureLayer> {
        self.data.as_ref().map(|data| data.boundaries.get_layer(self.config.map_level))
    }

    /// The latest result.
    pub fn snapshot(&self) -> Arc<Snapshot> { self.snapshot.clone() }

    /// Replaces the dataset, clears the selection and recomputes.
    pub fn load(&mut self, records: Vec<MeasurementRecord>, boundaries: Boundaries) -> Arc<Snapshot> {
        log::info!(
            "[dashboard] loading {} record(s) over {} state and {} county feature(s)",
            records.len(), boundaries.states.len(), boundaries.counties.len(),
        );
        self.data = Some(Dataset { records, boundaries });
        self.selection = SelectionState::Unselected;
        self.recompute()
    }

    /// Parses and normalizes `input`, then loads it. Fails without touching the
    /// current dataset when any row carries an ambiguous key.
    pub fn load_text(&mut self, input: &str, format: &RecordFormat, boundaries: Boundaries) -> Result<LoadReport, DashboardError> {
        let parsed = parse_records(input, format);
        let normalized = normalize_rows(&parsed.rows, &boundaries.states);

        if let Some(first) = normalized.first_rejection() {
            return Err(DashboardError::AmbiguousKeys {
                count: normalized.rejected.len(),
                first: first.error.clone(),
            });
        }

        let report = LoadReport {
            records: normalized.records.len(),
            skipped: parsed.skipped,
            unmatched_names: normalized.unmatched_names,
        };
        self.load(normalized.records, boundaries);
        Ok(report)
    }

    pub fn on_unit_clicked(&mut self, key: &RegionKey) -> Result<Arc<Snapshot>, DashboardError> {
        let data = self.data.as_ref().ok_or(DashboardError::NotReady)?;
        if !data.boundaries.get_layer(self.config.map_level).contains(key) {
            return Err(DashboardError::UnknownUnit(key.clone()));
        }

        let change = self.selection.click(key.clone());
        log::debug!("[dashboard] click {key}: {change:?}");
        Ok(self.recompute())
    }

    pub fn on_reset_selection(&mut self) -> Result<Arc<Snapshot>, DashboardError> {
        if self.data.is_none() { return Err(DashboardError::NotReady) }

        let change = self.selection.reset();
        if !change.is_change() { return Ok(self.snapshot()) }

        log::debug!("[dashboard] reset: {change:?}");
        Ok(self.recompute())
    }

    /// Flips the ranking between natural and descending order. The aggregations
    /// are shared with the previous snapshot; only the ranking view changes.
    pub fn on_toggle_sort(&mut self) -> Result<Arc<Snapshot>, DashboardError> {
        if self.data.is_none() { return Err(DashboardError::NotReady) }

        self.order = self.order.toggled();
        let mut next = (*self.snapshot).clone();
        next.ranking.set_order(self.order);
        self.snapshot = Arc::new(next);
        Ok(self.snapshot())
    }

    pub fn map_styles(&self) -> Vec<UnitStyle> { self.snapshot.styles.clone() }

    pub fn ranking(&self) -> Vec<RankedEntry> {
        self.snapshot.ranked().into_iter().cloned().collect()
    }

    pub fn map_legend(&self) -> Vec<LegendEntry> { self.config.map_table.legend() }

    /// Legend of the ranking currently shown: the rollup table, or the sibling
    /// table while a unit is selected.
    pub fn ranking_legend(&self) -> Vec<LegendEntry> {
        match self.selection {
            SelectionState::Unselected => self.config.ranking_table.legend(),
            SelectionState::Selected(_) => self.config.sibling_table.legend(),
        }
    }

    /// Display name of the selected unit. State units missing from the layer fall
    /// back to the FIPS name table.
    pub fn selected_name(&self) -> Option<&str> {
        let key = self.selection.selected()?;
        let data = self.data.as_ref()?;
        data.boundaries.get_layer(key.level()).display_name(key)
    }

    /// Runs the full pipeline on the current dataset and publishes the result.
    fn recompute(&mut self) -> Arc<Snapshot> {
        let Some(data) = &self.data else { return self.snapshot() };
        let config = &self.config;

        let map_layer = data.boundaries.get_layer(config.map_level);
        let map = AggregateQuery::new(&data.records, map_layer)
            .group_by(Grouping::Parent(config.map_level))
            .aggregator(&config.aggregator)
            .run();

        let (secondary, measure, table) = match self.selection.sibling_filter() {
            None => {
                let rollup = config.rollup_level;
                let rollup = AggregateQuery::new(&data.records, data.boundaries.get_layer(rollup))
                    .group_by(Grouping::Parent(rollup))
                    .aggregator(&config.aggregator)
                    .run();
                (rollup, config.ranking_measure, &config.ranking_table)
            }
            Some(siblings) => {
                let filter = |record: &MeasurementRecord| siblings.matches(record);
                let siblings = AggregateQuery::new(&data.records, &data.boundaries.counties)
                    .filter(&filter)
                    .aggregator(&config.aggregator)
                    .run();
                (siblings, config.sibling_measure, &config.sibling_table)
            }
        };

        let selected = self.selection.selected();
        let styles = map_layer.features().iter()
            .map(|feature| {
                let value = map.value_of(&feature.key);
                UnitStyle {
                    key: feature.key.clone(),
                    display_name: feature.display_name.clone(),
                    value,
                    color: config.map_table.color(value),
                    selected: selected == Some(&feature.key),
                }
            })
            .collect();

        let entries = secondary.units().iter()
            .map(|unit| {
                let value = measure.convert(unit.aggregate_value);
                RankedEntry::new(unit.display_name.clone(), value, table.color(Some(value)))
            })
            .collect();

        self.snapshot = Arc::new(Snapshot {
            map: Arc::new(map),
            secondary: Arc::new(secondary),
            styles,
            ranking: Ranking::new(entries, self.order),
            selection: self.selection.clone(),
        });
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{classify::BucketTable, key::GeoLevel, types::GeoFeature};

    fn key(geoid: &str) -> RegionKey { RegionKey::from_geoid(geoid).unwrap() }

    fn boundaries() -> Boundaries {
        let counties = FeatureLayer::from_features(GeoLevel::County, [
            GeoFeature::new(key("06037"), "Los Angeles"),
            GeoFeature::new(key("06073"), "San Diego"),
            GeoFeature::new(key("06059"), "Orange"),
            GeoFeature::new(key("48201"), "Harris"),
        ]).unwrap();
        Boundaries::from_counties(counties)
    }

    fn records() -> Vec<MeasurementRecord> {
        [("06037", 150.0), ("06037", 170.0), ("06073", 80.0), ("48201", 200.0)]
            .into_iter()
            .map(|(geoid, value)| MeasurementRecord::new(geoid, key(geoid), value))
            .collect()
    }

    fn ready() -> Dashboard {
        let mut dashboard = Dashboard::new(DashboardConfig::default());
        dashboard.load(records(), boundaries());
        dashboard
    }

    #[test]
    fn events_before_load_are_rejected() {
        let mut dashboard = Dashboard::new(DashboardConfig::default());
        assert!(!dashboard.is_ready());
        assert_eq!(dashboard.on_unit_clicked(&key("06037")).unwrap_err(), DashboardError::NotReady);
        assert_eq!(dashboard.on_reset_selection().unwrap_err(), DashboardError::NotReady);
        assert_eq!(dashboard.on_toggle_sort().unwrap_err(), DashboardError::NotReady);
        assert!(dashboard.map_styles().is_empty());
    }

    #[test]
    fn map_styles_cover_every_feature() {
        let dashboard = ready();
        let styles = dashboard.map_styles();
        let table = &dashboard.config().map_table;

        assert_eq!(styles.len(), 4);
        assert_eq!(styles[0].value, Some(160.0));
        assert_eq!(styles[0].color, table.color(Some(160.0)));
        assert_eq!(styles[2].display_name, "Orange");
        assert_eq!(styles[2].value, None);
        assert_eq!(styles[2].color, table.no_data_color());
        assert!(styles.iter().all(|s| !s.selected));
    }

    #[test]
    fn unselected_ranking_is_the_state_rollup() {
        let dashboard = ready();
        let ranking = dashboard.ranking();

        let names: Vec<_> = ranking.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["California", "Texas"]);
        // California: mean of 150, 170, 80 = 133.33 mW/m²
        assert!((ranking[0].value - 133.333_333 * 0.04).abs() < 1e-4);
    }

    #[test]
    fn click_shows_siblings_and_second_click_restores() {
        let mut dashboard = ready();
        let before = dashboard.ranking();

        let snapshot = dashboard.on_unit_clicked(&key("06073")).unwrap();
        assert_eq!(snapshot.selection(), &SelectionState::Selected(key("06073")));
        let names: Vec<_> = snapshot.ranked().iter().map(|e| e.display_name.clone()).collect();
        assert_eq!(names, vec!["Los Angeles", "San Diego"]);
        assert_eq!(snapshot.secondary().filtered_out(), 1);
        assert!(snapshot.map_styles().iter().any(|s| s.selected && s.key == key("06073")));

        let snapshot = dashboard.on_unit_clicked(&key("06073")).unwrap();
        assert_eq!(snapshot.selection(), &SelectionState::Unselected);
        assert_eq!(dashboard.ranking(), before);
    }

    #[test]
    fn siblings_rank_irradiance_while_rollup_ranks_uv_index() {
        let mut dashboard = ready();
        assert_eq!(dashboard.ranking_legend(), BucketTable::uv_index_who().legend());
        assert!(dashboard.ranking()[0].value < 11.0);

        let snapshot = dashboard.on_unit_clicked(&key("06037")).unwrap();
        let la = snapshot.ranked()[0].clone();
        assert_eq!(la.display_name, "Los Angeles");
        assert_eq!(la.value, 160.0);
        assert_eq!(la.color, BucketTable::county_chart().color(Some(160.0)));
        assert_eq!(la.fill, "rgba(255,153,0,0.6)");
        assert_eq!(dashboard.ranking_legend(), BucketTable::county_chart().legend());
        assert_eq!(dashboard.selected_name(), Some("Los Angeles"));

        dashboard.on_reset_selection().unwrap();
        assert!((dashboard.ranking()[0].value - 133.333_333 * 0.04).abs() < 1e-4);
        assert_eq!(dashboard.selected_name(), None);
    }

    #[test]
    fn clicking_a_no_data_unit_still_selects_it() {
        let mut dashboard = ready();
        let snapshot = dashboard.on_unit_clicked(&key("06059")).unwrap();
        assert_eq!(snapshot.selection().selected(), Some(&key("06059")));
        assert_eq!(snapshot.ranked().len(), 2);
    }

    #[test]
    fn unknown_unit_is_an_error() {
        let mut dashboard = ready();
        assert_eq!(
            dashboard.on_unit_clicked(&key("17031")).unwrap_err(),
            DashboardError::UnknownUnit(key("17031")),
        );
    }

    #[test]
    fn reset_without_selection_keeps_the_snapshot() {
        let mut dashboard = ready();
        let before = dashboard.snapshot();
        let after = dashboard.on_reset_selection().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn sort_order_survives_selection_changes() {
        let mut dashboard = ready();
        dashboard.on_toggle_sort().unwrap();
        let names: Vec<_> = dashboard.ranking().into_iter().map(|e| e.display_name).collect();
        assert_eq!(names, vec!["Texas", "California"]);

        dashboard.on_unit_clicked(&key("06037")).unwrap();
        let names: Vec<_> = dashboard.ranking().into_iter().map(|e| e.display_name).collect();
        assert_eq!(names, vec!["Los Angeles", "San Diego"]);

        dashboard.on_toggle_sort().unwrap();
        assert_eq!(dashboard.snapshot().ranking().order(), SortOrder::Natural);
    }

    #[test]
    fn old_snapshots_are_not_mutated() {
        let mut dashboard = ready();
        let first = dashboard.snapshot();
        dashboard.on_unit_clicked(&key("06037")).unwrap();
        dashboard.on_toggle_sort().unwrap();

        assert_eq!(first.selection(), &SelectionState::Unselected);
        assert_eq!(first.ranking().order(), SortOrder::Natural);
        assert_eq!(first.ranked().len(), 2);
    }

    #[test]
    fn load_text_rejects_ambiguous_keys() {
        let mut dashboard = ready();
        let input = "County,CountyFIPS,value\nLos Angeles,6037,150\nSan Diego,06073,80\n";
        let err = dashboard.load_text(input, &RecordFormat::Csv(crate::parse::CsvLayout::county_fips()), boundaries()).unwrap_err();

        assert!(matches!(err, DashboardError::AmbiguousKeys { count: 1, .. }));
        // previous dataset still in place
        assert_eq!(dashboard.map_styles()[0].value, Some(160.0));
    }
}
