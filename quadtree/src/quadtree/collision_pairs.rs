use super::*;

/// Lazy sequence of candidate pairs, produced by [`QuadTree::pairs`].
///
/// Depth-first over the nodes with the objects of all ancestors kept on a
/// side list. Each node pairs its objects with the later objects of the same
/// node and with every ancestor object, which covers every pair whose boxes
/// can overlap exactly once. Traversal buffers come from the tree's scratch
/// pool and go back to it on drop.
pub struct CollisionPairs<'a, H: EntityHandle> {
    tree: &'a QuadTree<H>,
    scratch: Option<Scratch<H>>,
    node: Option<u32>,
    ancestors_len: usize,
    i: usize,
    j: usize,
}

impl<H: EntityHandle> QuadTree<H> {
    pub fn pairs(&self) -> CollisionPairs<'_, H> {
        let mut scratch = self.scratch.borrow_mut().get();
        scratch.stack.push((ROOT, 0));
        CollisionPairs {
            tree: self,
            scratch: Some(scratch),
            node: None,
            ancestors_len: 0,
            i: 0,
            j: 1,
        }
    }

    pub fn for_each_collision_pair<F>(&self, mut f: F)
    where
        F: FnMut(H, H),
    {
        for (a, b) in self.pairs() {
            f(a, b);
        }
    }
}

impl<'a, H: EntityHandle> Iterator for CollisionPairs<'a, H> {
    type Item = (H, H);

    fn next(&mut self) -> Option<(H, H)> {
        let scratch = self.scratch.as_mut()?;
        loop {
            if let Some(node_idx) = self.node {
                let node = &self.tree.nodes[node_idx as usize];
                let local = node.objects.len();
                // `j` walks the later local objects, then the ancestors.
                let span = local + self.ancestors_len;
                while self.i < local {
                    if self.j < span {
                        let a = node.objects[self.i];
                        let b = if self.j < local {
                            node.objects[self.j]
                        } else {
                            scratch.handles[self.j - local]
                        };
                        self.j += 1;
                        return Some((a, b));
                    }
                    self.i += 1;
                    self.j = self.i + 1;
                }

                if !node.is_leaf() {
                    scratch.handles.extend_from_slice(&node.objects);
                    let ancestors_len = scratch.handles.len();
                    for quadrant in Quadrant::ALL.iter().rev() {
                        scratch.stack.push((node.child(*quadrant), ancestors_len));
                    }
                }
                self.node = None;
            }

            let (node_idx, ancestors_len) = scratch.stack.pop()?;
            scratch.handles.truncate(ancestors_len);
            self.node = Some(node_idx);
            self.ancestors_len = ancestors_len;
            self.i = 0;
            self.j = 1;
        }
    }
}

impl<'a, H: EntityHandle> std::iter::FusedIterator for CollisionPairs<'a, H> {}

impl<'a, H: EntityHandle> Drop for CollisionPairs<'a, H> {
    fn drop(&mut self) {
        if let Some(scratch) = self.scratch.take() {
            self.tree.scratch.borrow_mut().release(scratch);
        }
    }
}
