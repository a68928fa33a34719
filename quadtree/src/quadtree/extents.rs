use super::*;

// Children bordering each root edge, checked when that edge is in question.
const EDGE_CHILDREN: [(u8, [Quadrant; 2]); 4] = [
    (FLAG_LEFT, [Quadrant::TopLeft, Quadrant::BottomLeft]),
    (FLAG_RIGHT, [Quadrant::TopRight, Quadrant::BottomRight]),
    (FLAG_TOP, [Quadrant::TopLeft, Quadrant::TopRight]),
    (FLAG_BOTTOM, [Quadrant::BottomLeft, Quadrant::BottomRight]),
];

impl<H: EntityHandle> QuadTree<H> {
    /// True when some entity stored along the root's rim crosses a root edge.
    ///
    /// Each direction is checked on its own and only descends into the
    /// children bordering that edge. `memo` caches per-node answers for this
    /// call; a child is always asked about the same edge subset, so one slot
    /// per node is enough.
    pub(crate) fn has_out_of_bounds(&self, memo: &mut Vec<Memo>) -> bool {
        memo.clear();
        memo.resize(self.nodes.len(), Memo::Unknown);
        let root_bounds = self.bounds();
        self.node_out_of_bounds(ROOT, FLAG_ALL, &root_bounds, memo)
    }

    fn node_out_of_bounds(
        &self,
        node_idx: u32,
        directions: u8,
        root_bounds: &Rectangle,
        memo: &mut Vec<Memo>,
    ) -> bool {
        match memo[node_idx as usize] {
            Memo::Yes => return true,
            Memo::No => return false,
            Memo::Unknown => {}
        }

        let node = &self.nodes[node_idx as usize];
        let mut found = node.objects.iter().any(|handle| {
            self.entities.get(handle).map_or(false, |record| {
                out_of_bounds_flags(root_bounds, &record.bounds) & directions != 0
            })
        });

        if !found && !node.is_leaf() {
            'edges: for (flag, children) in EDGE_CHILDREN {
                if directions & flag == 0 {
                    continue;
                }
                for quadrant in children {
                    let child_directions = directions & quadrant.edge_flags();
                    if self.node_out_of_bounds(
                        node.child(quadrant),
                        child_directions,
                        root_bounds,
                        memo,
                    ) {
                        found = true;
                        break 'edges;
                    }
                }
            }
        }

        memo[node_idx as usize] = if found { Memo::Yes } else { Memo::No };
        found
    }

    /// Smallest region enclosing every entity's cached box, `None` when empty.
    pub fn bbox_union(&self) -> Option<Rectangle> {
        let mut records = self.entities.values();
        let first = records.next()?.bounds;
        let (mut left, mut top) = (first.left(), first.top());
        let (mut right, mut bottom) = (first.right(), first.bottom());
        for record in records {
            left = left.min(record.bounds.left());
            top = top.min(record.bounds.top());
            right = right.max(record.bounds.right());
            bottom = bottom.max(record.bounds.bottom());
        }
        Some(Rectangle::covering(left, top, right, bottom))
    }

    // Re-roots the tree on the union of all boxes and reinserts everything.
    pub(crate) fn embiggen(&mut self, scratch: &mut Scratch<H>) {
        let old_bounds = self.bounds();
        let new_bounds = match self.bbox_union() {
            Some(union) => union,
            None => {
                self.needs_grow = false;
                return;
            }
        };
        log::debug!(
            "growing quadtree from {:?} to {:?} for {} entities",
            old_bounds,
            new_bounds,
            self.entities.len()
        );
        self.rebuilds += 1;
        self.rebuild(new_bounds, scratch);
    }

    /// Number of times the tree has been re-rooted to fit its entities.
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }
}
