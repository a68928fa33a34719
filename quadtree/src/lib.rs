pub mod quadtree;

pub use common::error::{IndexError, IndexResult};
pub use common::shapes;
pub use common::spatial_index::{BoundsMap, BoundsSource, EntityHandle, SpatialIndex};
