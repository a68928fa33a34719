use super::*;

impl<H: EntityHandle> QuadTree<H> {
    /// Re-reads every entity's box and re-buckets the ones that moved.
    ///
    /// Grows the root when anything left it. Otherwise each node is visited
    /// once; objects that left their node or now fit a child are detached
    /// during the pass and reinserted from the root afterwards, then
    /// emptied subtrees collapse. With no movement the shape is unchanged.
    pub fn update(&mut self, source: &dyn BoundsSource<H>) {
        for (handle, record) in self.entities.iter_mut() {
            let bbox = source.world_bounds(*handle);
            debug_assert!(bbox.is_finite(), "bounding box of {:?} is not finite", handle);
            record.bounds = bbox.normalized();
        }

        let mut scratch = self.scratch.get_mut().get();
        if self.needs_grow || self.has_out_of_bounds(&mut scratch.memo) {
            self.embiggen(&mut scratch);
        } else {
            self.collect_relocations(&mut scratch);
            self.apply_relocations(&mut scratch);
            self.merge();
        }
        self.scratch.get_mut().release(scratch);
    }

    fn collect_relocations(&mut self, scratch: &mut Scratch<H>) {
        scratch.relocations.clear();
        scratch.stack.clear();
        scratch.stack.push((ROOT, 0));

        while let Some((node_idx, _)) = scratch.stack.pop() {
            let (bounds, is_leaf, first_child) = {
                let node = &self.nodes[node_idx as usize];
                (node.bounds, node.is_leaf(), node.first_child)
            };

            let mut i = 0;
            while i < self.nodes[node_idx as usize].objects.len() {
                let handle = self.nodes[node_idx as usize].objects[i];
                let bbox = match self.entities.get(&handle) {
                    Some(record) => record.bounds,
                    None => {
                        i += 1;
                        continue;
                    }
                };
                let fits_here = bounds.contains_rectangle(&bbox);
                let fits_child = !is_leaf && Quadrant::containing(&bounds, &bbox).is_some();
                if fits_here && !fits_child {
                    i += 1;
                    continue;
                }
                // Fast removal: no collapse while the pass is still running.
                self.nodes[node_idx as usize].objects.swap_remove(i);
                scratch.relocations.push((handle, bbox));
            }

            if !is_leaf {
                for quadrant in Quadrant::ALL {
                    scratch
                        .stack
                        .push((first_child + quadrant.index() as u32, 0));
                }
            }
        }
    }

    fn apply_relocations(&mut self, scratch: &mut Scratch<H>) {
        let root_bounds = self.bounds();
        if scratch
            .relocations
            .iter()
            .any(|(_, bbox)| !root_bounds.contains_rectangle(bbox))
        {
            scratch.relocations.clear();
            self.embiggen(scratch);
            return;
        }

        for (handle, bbox) in scratch.relocations.drain(..) {
            let node = self.insert_into(ROOT, handle, &bbox);
            if let Some(record) = self.entities.get_mut(&handle) {
                record.node = node;
            }
        }
    }
}
