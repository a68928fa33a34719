pub mod error;
pub mod object_pool;
pub mod shapes;
pub mod spatial_index;

pub use error::{IndexError, IndexResult};
pub use object_pool::{ObjectPool, Resettable};
pub use shapes::Rectangle;
pub use spatial_index::{BoundsMap, BoundsSource, EntityHandle, SpatialIndex};
