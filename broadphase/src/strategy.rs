use crate::hash_grid::{HashGrid, DEFAULT_CELL_SIZE};
use crate::sweep_and_prune::SweepAndPrune;

use common::error::IndexResult;
use common::shapes::Rectangle;
use common::spatial_index::{EntityHandle, SpatialIndex};
use quadtree::quadtree::{Config, QuadTree};

/// Broad phase picked by the simulation at startup.
#[derive(Debug, Clone)]
pub enum Strategy {
    QuadTree { bounds: Rectangle, config: Config },
    HashGrid { cell_size: f32 },
    SweepAndPrune,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::HashGrid {
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl Strategy {
    pub fn build<H: EntityHandle + 'static>(&self) -> IndexResult<Box<dyn SpatialIndex<H>>> {
        log::debug!("building broad phase {:?}", self);
        let index: Box<dyn SpatialIndex<H>> = match self {
            Strategy::QuadTree { bounds, config } => {
                Box::new(QuadTree::new_with_config(*bounds, config.clone())?)
            }
            Strategy::HashGrid { cell_size } => Box::new(HashGrid::new(*cell_size)?),
            Strategy::SweepAndPrune => Box::new(SweepAndPrune::new()),
        };
        Ok(index)
    }
}
