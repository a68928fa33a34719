use common::error::{IndexError, IndexResult};

#[derive(Debug, Clone)]
pub struct Config {
    /// Object count at which a leaf splits on the next insertion.
    pub max_objects: usize,
    /// Depth at which nodes stop splitting; the root is level 0.
    pub max_levels: usize,
    /// Traversal scratch buffers kept for reuse between iterations.
    pub pool_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_objects: 8,
            max_levels: 4,
            pool_size: 16,
        }
    }
}

impl Config {
    pub(crate) fn validate(&self) -> IndexResult<()> {
        if self.max_objects == 0 {
            return Err(IndexError::InvalidConfig {
                max_objects: self.max_objects,
                max_levels: self.max_levels,
            });
        }
        Ok(())
    }
}
