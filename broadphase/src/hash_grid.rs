use common::error::{IndexError, IndexResult};
use common::object_pool::{ObjectPool, Resettable};
use common::shapes::Rectangle;
use common::spatial_index::{BoundsSource, EntityHandle, SpatialIndex};

use fxhash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::ops::RangeInclusive;

pub const DEFAULT_CELL_SIZE: f32 = 64.0;
const POOL_SIZE: usize = 4;

/// Uniform grid broad phase over a sparse cell map.
///
/// Entities live in a flat list. The cell map is built from scratch by every
/// pair iteration, so `add`, `remove` and `update` never touch cells.
pub struct HashGrid<H: EntityHandle> {
    cell_size: f32,
    objects: Vec<(H, Rectangle)>,
    slots: FxHashMap<H, usize>,
    scratch: RefCell<ObjectPool<GridScratch>>,
}

#[derive(Default)]
struct GridScratch {
    // Occupants are slots into `objects`.
    cells: FxHashMap<(i32, i32), Vec<usize>>,
    checked: FxHashSet<usize>,
}

impl Resettable for GridScratch {
    fn reset(&mut self) {
        self.cells.clear();
        self.checked.clear();
    }
}

impl<H: EntityHandle> HashGrid<H> {
    pub fn new(cell_size: f32) -> IndexResult<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(IndexError::InvalidCellSize { cell_size });
        }
        Ok(Self {
            cell_size,
            objects: Vec::new(),
            slots: FxHashMap::default(),
            scratch: RefCell::new(ObjectPool::new(POOL_SIZE)),
        })
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn insert(&mut self, handle: H, bbox: Rectangle) -> IndexResult<()> {
        if self.slots.contains_key(&handle) {
            log::warn!("rejected duplicate insert of {:?}", handle);
            return Err(IndexError::DuplicateEntity);
        }
        debug_assert!(bbox.is_finite(), "bounding box of {:?} is not finite", handle);
        self.slots.insert(handle, self.objects.len());
        self.objects.push((handle, bbox.normalized()));
        Ok(())
    }

    pub fn remove(&mut self, handle: H) -> bool {
        let slot = match self.slots.remove(&handle) {
            Some(slot) => slot,
            None => return false,
        };
        self.objects.swap_remove(slot);
        if let Some((moved, _)) = self.objects.get(slot) {
            self.slots.insert(*moved, slot);
        }
        true
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.slots.clear();
    }

    pub fn update(&mut self, source: &dyn BoundsSource<H>) {
        for (handle, bbox) in self.objects.iter_mut() {
            let fresh = source.world_bounds(*handle);
            debug_assert!(fresh.is_finite(), "bounding box of {:?} is not finite", handle);
            *bbox = fresh.normalized();
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn bounds_of(&self, handle: H) -> Option<Rectangle> {
        self.slots.get(&handle).map(|slot| self.objects[*slot].1)
    }

    pub fn query_with<F>(&self, region: Rectangle, mut f: F)
    where
        F: FnMut(H),
    {
        for (handle, bbox) in &self.objects {
            if bbox.intersects(&region) {
                f(*handle);
            }
        }
    }

    pub fn pairs(&self) -> GridPairs<'_, H> {
        GridPairs {
            grid: self,
            scratch: Some(self.scratch.borrow_mut().get()),
            next_object: 0,
            cursor: None,
        }
    }

    // Inclusive cell span of `bbox` on both axes.
    fn cell_range(&self, bbox: &Rectangle) -> (RangeInclusive<i32>, RangeInclusive<i32>) {
        let cell = |v: f32| v / self.cell_size;
        (
            cell(bbox.left()).floor() as i32..=cell(bbox.right()).ceil() as i32,
            cell(bbox.top()).floor() as i32..=cell(bbox.bottom()).ceil() as i32,
        )
    }
}

impl<H: EntityHandle> Default for HashGrid<H> {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            objects: Vec::new(),
            slots: FxHashMap::default(),
            scratch: RefCell::new(ObjectPool::new(POOL_SIZE)),
        }
    }
}

// Position of the entity being registered inside its cell span.
struct Cursor {
    object: usize,
    x: i32,
    x_end: i32,
    y: i32,
    y_start: i32,
    y_end: i32,
    occupant: usize,
}

/// Lazy pair sequence over a freshly built cell map.
///
/// Entities are registered one at a time; each is paired with the occupants
/// already in the cells it covers. An occupant met in several shared cells is
/// reported once.
pub struct GridPairs<'a, H: EntityHandle> {
    grid: &'a HashGrid<H>,
    scratch: Option<GridScratch>,
    next_object: usize,
    cursor: Option<Cursor>,
}

impl<'a, H: EntityHandle> Iterator for GridPairs<'a, H> {
    type Item = (H, H);

    fn next(&mut self) -> Option<(H, H)> {
        let grid = self.grid;
        let scratch = self.scratch.as_mut()?;
        loop {
            if let Some(cursor) = self.cursor.as_mut() {
                let key = (cursor.x, cursor.y);
                if let Some(occupants) = scratch.cells.get(&key) {
                    while cursor.occupant < occupants.len() {
                        let other = occupants[cursor.occupant];
                        cursor.occupant += 1;
                        if scratch.checked.insert(other) {
                            return Some((grid.objects[cursor.object].0, grid.objects[other].0));
                        }
                    }
                }
                scratch.cells.entry(key).or_default().push(cursor.object);

                cursor.occupant = 0;
                if cursor.y < cursor.y_end {
                    cursor.y += 1;
                    continue;
                }
                if cursor.x < cursor.x_end {
                    cursor.x += 1;
                    cursor.y = cursor.y_start;
                    continue;
                }
                self.cursor = None;
            }

            let object = self.next_object;
            let (_, bbox) = grid.objects.get(object)?;
            self.next_object += 1;
            scratch.checked.clear();

            let (xs, ys) = grid.cell_range(bbox);
            self.cursor = Some(Cursor {
                object,
                x: *xs.start(),
                x_end: *xs.end(),
                y: *ys.start(),
                y_start: *ys.start(),
                y_end: *ys.end(),
                occupant: 0,
            });
        }
    }
}

impl<'a, H: EntityHandle> std::iter::FusedIterator for GridPairs<'a, H> {}

impl<'a, H: EntityHandle> Drop for GridPairs<'a, H> {
    fn drop(&mut self) {
        if let Some(scratch) = self.scratch.take() {
            self.grid.scratch.borrow_mut().release(scratch);
        }
    }
}

impl<H: EntityHandle> SpatialIndex<H> for HashGrid<H> {
    fn add(&mut self, handle: H, source: &dyn BoundsSource<H>) -> IndexResult<()> {
        self.insert(handle, source.world_bounds(handle))
    }

    fn remove(&mut self, handle: H) -> bool {
        HashGrid::remove(self, handle)
    }

    fn clear(&mut self) {
        HashGrid::clear(self);
    }

    fn update(&mut self, source: &dyn BoundsSource<H>) {
        HashGrid::update(self, source);
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
        HashGrid::len(self)
    }

    fn bounds_of(&self, handle: H) -> Option<Rectangle> {
        HashGrid::bounds_of(self, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_range_is_inclusive_of_both_ends() {
        let grid = HashGrid::<u32>::new(10.0).unwrap();
        let (xs, ys) = grid.cell_range(&Rectangle::new(5.0, -5.0, 10.0, 10.0));
        assert_eq!(xs, 0..=2);
        assert_eq!(ys, -1..=1);

        // Aligned edges still reach the neighbouring cell.
        let (xs, ys) = grid.cell_range(&Rectangle::new(10.0, 10.0, 10.0, 0.0));
        assert_eq!(xs, 1..=2);
        assert_eq!(ys, 1..=1);
    }

    #[test]
    fn keeps_configured_cell_size() {
        assert_eq!(HashGrid::<u32>::default().cell_size(), DEFAULT_CELL_SIZE);
        assert_eq!(HashGrid::<u32>::new(2.5).unwrap().cell_size(), 2.5);
    }

    #[test]
    fn rejects_bad_cell_sizes() {
        for cell_size in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                HashGrid::<u32>::new(cell_size),
                Err(IndexError::InvalidCellSize { .. })
            ));
        }
    }

    #[test]
    fn wide_entity_is_reported_once_per_neighbour() {
        let mut grid = HashGrid::new(1.0).unwrap();
        grid.insert(0u32, Rectangle::new(0.0, 0.0, 20.0, 20.0)).unwrap();
        grid.insert(1u32, Rectangle::new(2.0, 2.0, 10.0, 10.0)).unwrap();
        assert_eq!(grid.pairs().collect::<Vec<_>>(), vec![(1, 0)]);
    }

    #[test]
    fn remove_keeps_slots_consistent() {
        let mut grid = HashGrid::default();
        for id in 0..4u32 {
            grid.insert(id, Rectangle::new(id as f32, 0.0, 1.0, 1.0)).unwrap();
        }
        assert!(grid.remove(1));
        assert!(!grid.remove(1));
        assert_eq!(grid.bounds_of(3), Some(Rectangle::new(3.0, 0.0, 1.0, 1.0)));
        assert_eq!(grid.bounds_of(1), None);
        assert_eq!(grid.len(), 3);
    }
}
