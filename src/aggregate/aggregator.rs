use serde::{Deserialize, Serialize};

/// Reduces the values of one group to a single statistic.
/// Callers guarantee `values` is non-empty.
pub trait Aggregator {
    fn aggregate(&self, values: &[f64]) -> f64;
}

/// Arithmetic mean, summed in input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mean;

#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

/// Median; the mean of the two middle values for even-sized groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct Median;

impl Aggregator for Mean {
    fn aggregate(&self, values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

impl Aggregator for Sum {
    fn aggregate(&self, values: &[f64]) -> f64 {
        values.iter().sum()
    }
}

impl Aggregator for Median {
    fn aggregate(&self, values: &[f64]) -> f64 {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        }
    }
}

/// Configurable choice of aggregator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregatorKind {
    #[default]
    Mean,
    Sum,
    Median,
}

impl Aggregator for AggregatorKind {
    fn aggregate(&self, values: &[f64]) -> f64 {
        match self {
            AggregatorKind::Mean => Mean.aggregate(values),
            AggregatorKind::Sum => Sum.aggregate(values),
            AggregatorKind::Median => Median.aggregate(values),
        }
    }
}
