pub mod hash_grid;
pub mod strategy;
pub mod sweep_and_prune;

pub use common::error::{IndexError, IndexResult};
pub use common::shapes;
pub use common::spatial_index::{BoundsMap, BoundsSource, EntityHandle, SpatialIndex};

pub use hash_grid::HashGrid;
pub use strategy::Strategy;
pub use sweep_and_prune::SweepAndPrune;
