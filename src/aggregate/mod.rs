//! Join measurement records to boundary features and aggregate them per unit.
//!
//! Every run is a full pass over the record set. Filtered runs (the selection-driven
//! secondary dataset) re-execute the whole pass rather than patching an earlier result.

mod aggregator;

use ahash::AHashMap;

use crate::{key::{GeoLevel, RegionKey}, map::FeatureLayer, types::{AggregatedUnit, MeasurementRecord}};

pub use aggregator::{Aggregator, AggregatorKind, Mean, Median, Sum};

/// How records are assigned to groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grouping {
    /// Group by the record's own key (unit-level choropleth).
    #[default]
    Unit,
    /// Group by the enclosing unit at the given level (e.g. state rollup of counties).
    Parent(GeoLevel),
}

impl Grouping {
    fn group_key(&self, record: &MeasurementRecord) -> Option<RegionKey> {
        match self {
            Grouping::Unit => Some(record.key.clone()),
            Grouping::Parent(level) => record.key.to_parent(*level),
        }
    }
}

pub type RecordFilter<'a> = &'a dyn Fn(&MeasurementRecord) -> bool;

/// One aggregation pass over `records`, joined to the features of `layer`.
pub struct AggregateQuery<'a> {
    records: &'a [MeasurementRecord],
    layer: &'a FeatureLayer,
    grouping: Grouping,
    filter: Option<RecordFilter<'a>>,
    aggregator: &'a dyn Aggregator,
}

impl<'a> AggregateQuery<'a> {
    pub fn new(records: &'a [MeasurementRecord], layer: &'a FeatureLayer) -> Self {
        Self { records, layer, grouping: Grouping::Unit, filter: None, aggregator: &Mean }
    }

    pub fn group_by(mut self, grouping: Grouping) -> Self {
        self.grouping = grouping;
        self
    }

    /// Only records for which `filter` returns true contribute.
    pub fn filter(mut self, filter: RecordFilter<'a>) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn aggregator(mut self, aggregator: &'a dyn Aggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn run(&self) -> Aggregation {
        let mut groups: Vec<Vec<f64>> = vec![Vec::new(); self.layer.len()];
        let mut orphaned = 0;
        let mut filtered_out = 0;

        for record in self.records {
            if let Some(filter) = self.filter {
                if !filter(record) {
                    filtered_out += 1;
                    continue;
                }
            }

            let position = self.grouping.group_key(record)
                .and_then(|key| self.layer.position(&key));
            match position {
                Some(i) => groups[i].push(record.value),
                None => {
                    log::debug!("[aggregate] record {} ({}) has no {} feature", record.key, record.region_name, self.layer.level().to_str());
                    orphaned += 1;
                }
            }
        }

        let mut units = Vec::new();
        let mut unjoined = Vec::new();
        for (feature, values) in self.layer.features().iter().zip(&groups) {
            if values.is_empty() {
                unjoined.push(feature.key.clone());
                continue;
            }
            units.push(AggregatedUnit {
                key: feature.key.clone(),
                display_name: feature.display_name.clone(),
                aggregate_value: self.aggregator.aggregate(values),
                contributing_count: values.len(),
            });
        }

        if orphaned > 0 {
            log::warn!("[aggregate] {orphaned} record(s) matched no {} feature", self.layer.level().to_str());
        }
        log::info!(
            "[aggregate] {} {} unit(s) from {} record(s), {} without data, {} filtered out",
            units.len(), self.layer.level().to_str(), self.records.len(), unjoined.len(), filtered_out,
        );

        Aggregation::new(self.layer.level(), units, unjoined, orphaned, filtered_out)
    }
}

/// Result of one aggregation pass. Units follow the feature order of the layer.
#[derive(Debug, Clone)]
pub struct Aggregation {
    level: GeoLevel,
    units: Vec<AggregatedUnit>,
    /// Features with no contributing records ("no data").
    unjoined: Vec<RegionKey>,
    /// Records whose group key matched no feature.
    orphaned: usize,
    /// Records excluded by the filter predicate.
    filtered_out: usize,
    index: AHashMap<RegionKey, usize>,
}

impl Aggregation {
    fn new(level: GeoLevel, units: Vec<AggregatedUnit>, unjoined: Vec<RegionKey>, orphaned: usize, filtered_out: usize) -> Self {
        let index = units.iter().enumerate().map(|(i, unit)| (unit.key.clone(), i)).collect();
        Self { level, units, unjoined, orphaned, filtered_out, index }
    }

    /// An aggregation with no units, used before any data is loaded.
    pub fn empty(level: GeoLevel) -> Self {
        Self::new(level, Vec::new(), Vec::new(), 0, 0)
    }

    #[inline] pub fn level(&self) -> GeoLevel { self.level }
    #[inline] pub fn units(&self) -> &[AggregatedUnit] { &self.units }
    #[inline] pub fn unjoined(&self) -> &[RegionKey] { &self.unjoined }
    #[inline] pub fn orphaned(&self) -> usize { self.orphaned }
    #[inline] pub fn filtered_out(&self) -> usize { self.filtered_out }
    #[inline] pub fn len(&self) -> usize { self.units.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.units.is_empty() }

    pub fn get(&self, key: &RegionKey) -> Option<&AggregatedUnit> {
        self.index.get(key).map(|&i| &self.units[i])
    }

    /// The aggregate value of `key`, or `None` when the unit has no data.
    pub fn value_of(&self, key: &RegionKey) -> Option<f64> {
        self.get(key).map(|unit| unit.aggregate_value)
    }

    /// Number of records that contributed to some unit.
    pub fn contributing_total(&self) -> usize {
        self.units.iter().map(|unit| unit.contributing_count).sum()
    }
}
