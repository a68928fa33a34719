use crate::error::IndexResult;
use crate::shapes::Rectangle;

use fxhash::FxHashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Opaque, cheaply copyable identifier for a collidable entity.
pub trait EntityHandle: Copy + Eq + Hash + Debug {}

impl<T> EntityHandle for T where T: Copy + Eq + Hash + Debug {}

/// Supplies the current world-space bounding box of an entity.
///
/// Must be side-effect free and return finite boxes. Indexes call it any
/// number of times per step.
pub trait BoundsSource<H> {
    fn world_bounds(&self, handle: H) -> Rectangle;
}

impl<H, F> BoundsSource<H> for F
where
    F: Fn(H) -> Rectangle,
{
    fn world_bounds(&self, handle: H) -> Rectangle {
        self(handle)
    }
}

/// Boxes kept by the caller in a map, keyed by handle.
///
/// Handles missing from the map report an empty rectangle at the origin.
#[derive(Debug, Clone)]
pub struct BoundsMap<H: EntityHandle>(pub FxHashMap<H, Rectangle>);

impl<H: EntityHandle> BoundsMap<H> {
    pub fn new() -> Self {
        Self(FxHashMap::default())
    }

    pub fn insert(&mut self, handle: H, bbox: Rectangle) -> Option<Rectangle> {
        self.0.insert(handle, bbox)
    }

    pub fn remove(&mut self, handle: H) -> Option<Rectangle> {
        self.0.remove(&handle)
    }

    pub fn get_mut(&mut self, handle: H) -> Option<&mut Rectangle> {
        self.0.get_mut(&handle)
    }
}

impl<H: EntityHandle> Default for BoundsMap<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: EntityHandle> BoundsSource<H> for BoundsMap<H> {
    fn world_bounds(&self, handle: H) -> Rectangle {
        self.0.get(&handle).copied().unwrap_or_default()
    }
}

/// Broad-phase contract shared by every strategy.
///
/// Boxes are cached on `add` and refreshed on `update`; pair iteration and
/// region queries read the cache.
pub trait SpatialIndex<H: EntityHandle> {
    /// Inserts `handle` using its current box. Rejects live handles.
    fn add(&mut self, handle: H, source: &dyn BoundsSource<H>) -> IndexResult<()>;

    /// Returns whether the handle was present.
    fn remove(&mut self, handle: H) -> bool;

    fn clear(&mut self);

    /// Re-reads every box and re-buckets the entities that moved.
    fn update(&mut self, source: &dyn BoundsSource<H>);

    /// Visits each unordered candidate pair at most once.
    fn for_each_pair(&self, f: &mut dyn FnMut(H, H));

    /// Visits each entity whose cached box overlaps `region`, once.
    fn query(&self, region: Rectangle, f: &mut dyn FnMut(H));

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, handle: H) -> bool {
        self.bounds_of(handle).is_some()
    }

    fn bounds_of(&self, handle: H) -> Option<Rectangle>;

    fn collect_pairs(&self, pairs: &mut Vec<(H, H)>) {
        self.for_each_pair(&mut |a, b| pairs.push((a, b)));
    }

    fn collect_query(&self, region: Rectangle, found: &mut Vec<H>) {
        self.query(region, &mut |handle| found.push(handle));
    }
}
