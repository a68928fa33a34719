use common::error::{IndexError, IndexResult};
use common::shapes::Rectangle;
use common::spatial_index::{BoundsSource, EntityHandle, SpatialIndex};

use fxhash::FxHashSet;

/// One-axis sweep: entries stay sorted by their left edge and every run of
/// x-overlapping neighbours is a candidate group.
pub struct SweepAndPrune<H: EntityHandle> {
    entries: Vec<(H, Rectangle)>,
    members: FxHashSet<H>,
}

impl<H: EntityHandle> SweepAndPrune<H> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            members: FxHashSet::default(),
        }
    }

    pub fn insert(&mut self, handle: H, bbox: Rectangle) -> IndexResult<()> {
        if !self.members.insert(handle) {
            log::warn!("rejected duplicate insert of {:?}", handle);
            return Err(IndexError::DuplicateEntity);
        }
        debug_assert!(bbox.is_finite(), "bounding box of {:?} is not finite", handle);
        let bbox = bbox.normalized();
        let at = self
            .entries
            .partition_point(|(_, other)| other.left() <= bbox.left());
        self.entries.insert(at, (handle, bbox));
        Ok(())
    }

    pub fn remove(&mut self, handle: H) -> bool {
        if !self.members.remove(&handle) {
            return false;
        }
        if let Some(pos) = self.entries.iter().position(|(held, _)| *held == handle) {
            self.entries.remove(pos);
        }
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.members.clear();
    }

    /// Refreshes every box, then restores the order with an insertion sort,
    /// which is close to linear when little moved since the last step.
    pub fn update(&mut self, source: &dyn BoundsSource<H>) {
        for (handle, bbox) in self.entries.iter_mut() {
            let fresh = source.world_bounds(*handle);
            debug_assert!(fresh.is_finite(), "bounding box of {:?} is not finite", handle);
            *bbox = fresh.normalized();
        }

        for i in 1..self.entries.len() {
            let mut j = i;
            while j > 0 && self.entries[j - 1].1.left() > self.entries[j].1.left() {
                self.entries.swap(j - 1, j);
                j -= 1;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn bounds_of(&self, handle: H) -> Option<Rectangle> {
        if !self.members.contains(&handle) {
            return None;
        }
        self.entries
            .iter()
            .find(|(held, _)| *held == handle)
            .map(|(_, bbox)| *bbox)
    }

    pub fn query_with<F>(&self, region: Rectangle, mut f: F)
    where
        F: FnMut(H),
    {
        for (handle, bbox) in &self.entries {
            if bbox.left() > region.right() {
                break;
            }
            if bbox.intersects(&region) {
                f(*handle);
            }
        }
    }

    pub fn pairs(&self) -> SweepPairs<'_, H> {
        SweepPairs {
            entries: &self.entries,
            i: 0,
            j: 1,
        }
    }
}

impl<H: EntityHandle> Default for SweepAndPrune<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Pairs every entry with the later entries whose left edge does not pass
/// its right edge.
pub struct SweepPairs<'a, H> {
    entries: &'a [(H, Rectangle)],
    i: usize,
    j: usize,
}

impl<'a, H: Copy> Iterator for SweepPairs<'a, H> {
    type Item = (H, H);

    fn next(&mut self) -> Option<(H, H)> {
        while self.i < self.entries.len() {
            let (a, bbox) = self.entries[self.i];
            if let Some((b, other)) = self.entries.get(self.j) {
                if other.left() <= bbox.right() {
                    self.j += 1;
                    return Some((a, *b));
                }
            }
            self.i += 1;
            self.j = self.i + 1;
        }
        None
    }
}

impl<'a, H: Copy> std::iter::FusedIterator for SweepPairs<'a, H> {}

impl<H: EntityHandle> SpatialIndex<H> for SweepAndPrune<H> {
    fn add(&mut self, handle: H, source: &dyn BoundsSource<H>) -> IndexResult<()> {
        self.insert(handle, source.world_bounds(handle))
    }

    fn remove(&mut self, handle: H) -> bool {
        SweepAndPrune::remove(self, handle)
    }

    fn clear(&mut self) {
        SweepAndPrune::clear(self);
    }

    fn update(&mut self, source: &dyn BoundsSource<H>) {
        SweepAndPrune::update(self, source);
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
        SweepAndPrune::len(self)
    }

    fn bounds_of(&self, handle: H) -> Option<Rectangle> {
        SweepAndPrune::bounds_of(self, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lefts(sap: &SweepAndPrune<u32>) -> Vec<f32> {
        sap.entries.iter().map(|(_, bbox)| bbox.left()).collect()
    }

    #[test]
    fn insert_keeps_entries_sorted() {
        let mut sap = SweepAndPrune::new();
        for (id, x) in [(0u32, 30.0), (1, 10.0), (2, 20.0), (3, 10.0)] {
            sap.insert(id, Rectangle::new(x, 0.0, 1.0, 1.0)).unwrap();
        }
        assert_eq!(lefts(&sap), vec![10.0, 10.0, 20.0, 30.0]);
    }

    #[test]
    fn update_resorts_moved_entries() {
        let mut sap = SweepAndPrune::new();
        for id in 0..5u32 {
            sap.insert(id, Rectangle::new(id as f32, 0.0, 1.0, 1.0)).unwrap();
        }
        sap.update(&|id: u32| Rectangle::new(10.0 - id as f32, 0.0, 1.0, 1.0));
        assert_eq!(lefts(&sap), vec![6.0, 7.0, 8.0, 9.0, 10.0]);
        assert_eq!(sap.entries[0].0, 4);
    }

    #[test]
    fn sweep_stops_at_first_gap() {
        let mut sap = SweepAndPrune::new();
        sap.insert(0u32, Rectangle::new(0.0, 0.0, 10.0, 1.0)).unwrap();
        sap.insert(1u32, Rectangle::new(10.0, 50.0, 1.0, 1.0)).unwrap();
        sap.insert(2u32, Rectangle::new(12.0, 0.0, 1.0, 1.0)).unwrap();
        assert_eq!(sap.pairs().collect::<Vec<_>>(), vec![(0, 1)]);
    }
}
