use super::*;

impl<H: EntityHandle> QuadTree<H> {
    /// Collects every entity whose cached box overlaps `region`.
    pub fn query(&self, region: Rectangle, found: &mut Vec<H>) {
        self.query_with(region, |handle| found.push(handle));
    }

    pub fn query_with<F>(&self, region: Rectangle, mut f: F)
    where
        F: FnMut(H),
    {
        let mut scratch = self.scratch.borrow_mut().get();
        scratch.stack.push((ROOT, 0));

        while let Some((node_idx, _)) = scratch.stack.pop() {
            let node = &self.nodes[node_idx as usize];
            for handle in node.objects.iter() {
                if let Some(record) = self.entities.get(handle) {
                    if record.bounds.intersects(&region) {
                        f(*handle);
                    }
                }
            }

            if !node.is_leaf() {
                for quadrant in Quadrant::ALL {
                    let child = node.child(quadrant);
                    // Children hold only boxes they fully contain.
                    if self.nodes[child as usize].bounds.intersects(&region) {
                        scratch.stack.push((child, 0));
                    }
                }
            }
        }

        self.scratch.borrow_mut().release(scratch);
    }
}
