use super::*;

impl<H: EntityHandle> QuadTree<H> {
    /// Tree over `bounds` with the default configuration.
    ///
    /// `bounds` may start small; the tree grows to fit its entities on
    /// `update`.
    pub fn new(bounds: Rectangle) -> Self {
        debug_assert!(bounds.is_finite(), "quadtree bounds must be finite");
        Self::from_parts(bounds.normalized(), Config::default())
    }

    pub fn new_with_config(bounds: Rectangle, config: Config) -> IndexResult<Self> {
        validate_bounds(&bounds)?;
        config.validate()?;
        Ok(Self::from_parts(bounds.normalized(), config))
    }

    fn from_parts(bounds: Rectangle, config: Config) -> Self {
        let scratch = ObjectPool::prefilled(config.pool_size, config.pool_size, Scratch::default);
        Self {
            nodes: vec![Node::new(bounds, 0, NO_PARENT)],
            free_blocks: Vec::new(),
            entities: FxHashMap::default(),
            config,
            needs_grow: false,
            rebuilds: 0,
            scratch: RefCell::new(scratch),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Inserts `handle` with an explicit box.
    ///
    /// Boxes outside the current bounds are kept at the root until the next
    /// `update` grows the tree around them.
    pub fn insert(&mut self, handle: H, bbox: Rectangle) -> IndexResult<()> {
        if self.entities.contains_key(&handle) {
            log::warn!("rejected duplicate insert of {:?}", handle);
            return Err(IndexError::DuplicateEntity);
        }
        debug_assert!(bbox.is_finite(), "bounding box of {:?} is not finite", handle);
        let bbox = bbox.normalized();
        self.insert_entity(handle, bbox);
        Ok(())
    }

    pub(crate) fn insert_entity(&mut self, handle: H, bbox: Rectangle) {
        if !self.nodes[ROOT as usize].bounds.contains_rectangle(&bbox) {
            self.needs_grow = true;
        }
        let node = self.insert_into(ROOT, handle, &bbox);
        self.entities.insert(handle, EntityRecord { node, bounds: bbox });
    }

    // Walks down from `node_idx`, splitting full leaves on the way, and
    // returns the node that ends up holding the handle.
    pub(crate) fn insert_into(&mut self, mut node_idx: u32, handle: H, bbox: &Rectangle) -> u32 {
        loop {
            let node = &self.nodes[node_idx as usize];
            if node.is_leaf()
                && node.objects.len() >= self.config.max_objects
                && (node.level as usize) < self.config.max_levels
            {
                self.subdivide(node_idx);
            }

            let node = &self.nodes[node_idx as usize];
            if !node.is_leaf() {
                if let Some(quadrant) = Quadrant::containing(&node.bounds, bbox) {
                    node_idx = node.child(quadrant);
                    continue;
                }
            }

            self.nodes[node_idx as usize].objects.push(handle);
            return node_idx;
        }
    }

    // Splits a leaf into four and pushes down every held object that fits a
    // single child. Straddling objects stay put.
    fn subdivide(&mut self, node_idx: u32) {
        let (bounds, level) = {
            let node = &self.nodes[node_idx as usize];
            (node.bounds, node.level)
        };
        let first_child = self.alloc_block(node_idx, &bounds, level + 1);
        let held = {
            let node = &mut self.nodes[node_idx as usize];
            node.first_child = first_child;
            std::mem::take(&mut node.objects)
        };
        log::trace!(
            "subdividing node {} at level {} holding {} objects",
            node_idx,
            level,
            held.len()
        );

        for handle in held {
            let bbox = match self.entities.get(&handle) {
                Some(record) => record.bounds,
                None => {
                    debug_assert!(false, "held handle {:?} has no record", handle);
                    self.nodes[node_idx as usize].objects.push(handle);
                    continue;
                }
            };
            match Quadrant::containing(&bounds, &bbox) {
                Some(quadrant) => {
                    let child = first_child + quadrant.index() as u32;
                    let dest = self.insert_into(child, handle, &bbox);
                    if let Some(record) = self.entities.get_mut(&handle) {
                        record.node = dest;
                    }
                }
                None => self.nodes[node_idx as usize].objects.push(handle),
            }
        }
    }

    fn alloc_block(&mut self, parent: u32, bounds: &Rectangle, level: u32) -> u32 {
        match self.free_blocks.pop() {
            Some(first_child) => {
                for quadrant in Quadrant::ALL {
                    let child = &mut self.nodes[first_child as usize + quadrant.index()];
                    child.bounds = quadrant.bounds_within(bounds);
                    child.level = level;
                    child.parent = parent;
                    child.first_child = NO_CHILDREN;
                    child.objects.clear();
                }
                first_child
            }
            None => {
                let first_child = self.nodes.len() as u32;
                for quadrant in Quadrant::ALL {
                    self.nodes
                        .push(Node::new(quadrant.bounds_within(bounds), level, parent));
                }
                first_child
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, handle: H) -> bool {
        self.entities.contains_key(&handle)
    }

    /// Box cached for `handle` at its last insert or update.
    pub fn bounds_of(&self, handle: H) -> Option<Rectangle> {
        self.entities.get(&handle).map(|record| record.bounds)
    }

    /// Region currently covered by the root.
    pub fn bounds(&self) -> Rectangle {
        self.nodes[ROOT as usize].bounds
    }

    /// Live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_blocks.len() * 4
    }

    /// Deepest level holding a live node.
    pub fn depth(&self) -> u32 {
        let mut depth = 0;
        self.for_each_node(|view| depth = depth.max(view.level));
        depth
    }

    pub fn all_node_bounding_boxes(&self, bounding_boxes: &mut Vec<Rectangle>) {
        self.for_each_node(|view| bounding_boxes.push(view.bounds));
    }

    /// Visits every live node top-down.
    pub fn for_each_node<F>(&self, mut f: F)
    where
        F: FnMut(NodeView<'_, H>),
    {
        let mut stack: NodeStack = SmallVec::new();
        stack.push((ROOT, 0));
        while let Some((node_idx, _)) = stack.pop() {
            let node = &self.nodes[node_idx as usize];
            f(NodeView {
                bounds: node.bounds,
                level: node.level,
                is_leaf: node.is_leaf(),
                objects: &node.objects,
            });
            if !node.is_leaf() {
                for quadrant in Quadrant::ALL {
                    stack.push((node.child(quadrant), 0));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scratch_pool_starts_full() {
        let config = Config {
            pool_size: 5,
            ..Config::default()
        };
        let qt = QuadTree::<u32>::new_with_config(Rectangle::new(0.0, 0.0, 8.0, 8.0), config)
            .unwrap();
        assert_eq!(qt.scratch.borrow().available(), 5);

        let pairs = qt.pairs();
        assert_eq!(qt.scratch.borrow().available(), 4);
        drop(pairs);
        assert_eq!(qt.scratch.borrow().available(), 5);
    }
}
