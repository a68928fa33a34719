use super::*;

impl<H: EntityHandle> QuadTree<H> {
    /// Removes `handle`, collapsing nodes that drop to `max_objects` or fewer.
    ///
    /// Returns `false` and leaves the tree untouched when the handle is absent.
    pub fn remove(&mut self, handle: H) -> bool {
        self.remove_entity(handle, false)
    }

    // `fast` skips the collapse, for callers that re-insert right away.
    pub(crate) fn remove_entity(&mut self, handle: H, fast: bool) -> bool {
        let record = match self.entities.remove(&handle) {
            Some(record) => record,
            None => return false,
        };
        self.detach(record.node, handle);
        if !fast {
            self.collapse_upwards(record.node);
        }
        true
    }

    pub(crate) fn detach(&mut self, node_idx: u32, handle: H) {
        let objects = &mut self.nodes[node_idx as usize].objects;
        if let Some(pos) = objects.iter().position(|held| *held == handle) {
            objects.swap_remove(pos);
        }
    }

    // A removal only changes the collapse condition of the node it touched
    // and of that node's parent, so walk up until a collapse fails.
    fn collapse_upwards(&mut self, node_idx: u32) {
        let mut candidate = if self.nodes[node_idx as usize].is_leaf() {
            self.nodes[node_idx as usize].parent
        } else {
            node_idx
        };
        while candidate != NO_PARENT && self.try_collapse(candidate) {
            candidate = self.nodes[candidate as usize].parent;
        }
    }

    /// Collapses every underpopulated subtree, children first.
    pub fn merge(&mut self) {
        self.merge_node(ROOT);
    }

    fn merge_node(&mut self, node_idx: u32) {
        let node = &self.nodes[node_idx as usize];
        if node.is_leaf() {
            return;
        }
        let first_child = node.first_child;
        for quadrant in Quadrant::ALL {
            self.merge_node(first_child + quadrant.index() as u32);
        }
        self.try_collapse(node_idx);
    }

    fn try_collapse(&mut self, node_idx: u32) -> bool {
        let node = &self.nodes[node_idx as usize];
        if node.is_leaf() {
            return false;
        }
        let first_child = node.first_child;
        let mut count = node.objects.len();
        for quadrant in Quadrant::ALL {
            let child = &self.nodes[first_child as usize + quadrant.index()];
            if !child.is_leaf() {
                return false;
            }
            count += child.objects.len();
        }
        if count > self.config.max_objects {
            return false;
        }

        for quadrant in Quadrant::ALL {
            let child = first_child as usize + quadrant.index();
            let moved = std::mem::take(&mut self.nodes[child].objects);
            for handle in moved {
                if let Some(record) = self.entities.get_mut(&handle) {
                    record.node = node_idx;
                }
                self.nodes[node_idx as usize].objects.push(handle);
            }
        }
        self.nodes[node_idx as usize].first_child = NO_CHILDREN;
        self.free_blocks.push(first_child);
        log::trace!("collapsed node {} holding {} objects", node_idx, count);
        true
    }

    /// Drops every entity and all structure below the root. The root keeps
    /// its bounds and the arena keeps its nodes for later splits.
    pub fn clear(&mut self) {
        self.release_structure();
        self.entities.clear();
        self.needs_grow = false;
    }

    // Throws away the structure and reinserts everything under `bounds`.
    pub(crate) fn rebuild(&mut self, bounds: Rectangle, scratch: &mut Scratch<H>) {
        scratch.relocations.clear();
        scratch
            .relocations
            .extend(self.entities.iter().map(|(handle, record)| (*handle, record.bounds)));

        self.release_structure();
        self.nodes[ROOT as usize].bounds = bounds;
        self.needs_grow = false;

        for (handle, bbox) in scratch.relocations.drain(..) {
            let node = self.insert_into(ROOT, handle, &bbox);
            if let Some(record) = self.entities.get_mut(&handle) {
                record.node = node;
            }
        }
    }

    // Empties the nodes that hold entities and turns every child block into a
    // free block. Blocks are laid out in fours after the root, and
    // `alloc_block` resets a block when it hands it out again.
    fn release_structure(&mut self) {
        for record in self.entities.values() {
            self.nodes[record.node as usize].objects.clear();
        }
        let root = &mut self.nodes[ROOT as usize];
        root.objects.clear();
        root.first_child = NO_CHILDREN;

        self.free_blocks.clear();
        self.free_blocks
            .extend((ROOT + 1..self.nodes.len() as u32).step_by(4).rev());
    }
}
