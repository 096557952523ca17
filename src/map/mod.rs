mod layer;
mod map;

pub use layer::FeatureLayer;
pub use map::Boundaries;
