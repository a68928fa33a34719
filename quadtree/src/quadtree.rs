use common::error::{IndexError, IndexResult};
use common::object_pool::{ObjectPool, Resettable};
use common::shapes::Rectangle;
use common::spatial_index::{BoundsSource, EntityHandle, SpatialIndex};

use fxhash::FxHashMap;
use smallvec::SmallVec;
use std::cell::RefCell;

mod collision_pairs;
mod config;
mod core;
mod extents;
mod maintenance;
mod query_rect;
mod types;
mod update_entities;

pub use collision_pairs::CollisionPairs;
pub use config::Config;
pub use types::{NodeView, Quadrant};

use types::*;

/// Region quadtree used as a collision broad phase.
///
/// Every entity lives in exactly one node: the deepest one whose bounds fully
/// contain its box. Nodes live in an arena and refer to their four children
/// by the index of the first child.
pub struct QuadTree<H: EntityHandle> {
    nodes: Vec<Node<H>>,
    free_blocks: Vec<u32>,
    entities: FxHashMap<H, EntityRecord>,
    config: Config,
    needs_grow: bool,
    rebuilds: usize,
    scratch: RefCell<ObjectPool<Scratch<H>>>,
}

pub(crate) struct Node<H> {
    pub(crate) bounds: Rectangle,
    pub(crate) level: u32,
    pub(crate) parent: u32,
    pub(crate) first_child: u32,
    pub(crate) objects: SmallVec<[H; 8]>,
}

impl<H> Node<H> {
    fn new(bounds: Rectangle, level: u32, parent: u32) -> Self {
        Self {
            bounds,
            level,
            parent,
            first_child: NO_CHILDREN,
            objects: SmallVec::new(),
        }
    }

    #[inline(always)]
    pub(crate) fn is_leaf(&self) -> bool {
        self.first_child == NO_CHILDREN
    }

    #[inline(always)]
    pub(crate) fn child(&self, quadrant: Quadrant) -> u32 {
        self.first_child + quadrant.index() as u32
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct EntityRecord {
    pub(crate) node: u32,
    pub(crate) bounds: Rectangle,
}

// Traversal state borrowed from the pool by iteration, queries and updates.
pub(crate) struct Scratch<H> {
    pub(crate) stack: NodeStack,
    pub(crate) handles: Vec<H>,
    pub(crate) relocations: Vec<(H, Rectangle)>,
    pub(crate) memo: Vec<Memo>,
}

impl<H> Default for Scratch<H> {
    fn default() -> Self {
        Self {
            stack: NodeStack::new(),
            handles: Vec::new(),
            relocations: Vec::new(),
            memo: Vec::new(),
        }
    }
}

impl<H> Resettable for Scratch<H> {
    fn reset(&mut self) {
        self.stack.clear();
        self.handles.clear();
        self.relocations.clear();
        self.memo.clear();
    }
}

impl<H: EntityHandle> SpatialIndex<H> for QuadTree<H> {
    fn add(&mut self, handle: H, source: &dyn BoundsSource<H>) -> IndexResult<()> {
        self.insert(handle, source.world_bounds(handle))
    }

    fn remove(&mut self, handle: H) -> bool {
        QuadTree::remove(self, handle)
    }

    fn clear(&mut self) {
        QuadTree::clear(self);
    }

    fn update(&mut self, source: &dyn BoundsSource<H>) {
        QuadTree::update(self, source);
    }

    fn for_each_pair(&self, f: &mut dyn FnMut(H, H)) {
        for (a, b) in self.pairs() {
            f(a, b);
        }
    }

    fn query(&self, region: Rectangle, f: &mut dyn FnMut(H)) {
        self.query_with(region, f);
    }

    fn len(&self) -> usize {
        QuadTree::len(self)
    }

    fn bounds_of(&self, handle: H) -> Option<Rectangle> {
        QuadTree::bounds_of(self, handle)
    }
}

pub(crate) fn validate_bounds(bounds: &Rectangle) -> IndexResult<()> {
    if bounds.is_finite() {
        Ok(())
    } else {
        Err(IndexError::InvalidBounds {
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
        })
    }
}
