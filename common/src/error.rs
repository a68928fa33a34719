use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndexError {
    DuplicateEntity,
    InvalidConfig {
        max_objects: usize,
        max_levels: usize,
    },
    InvalidBounds {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    InvalidCellSize {
        cell_size: f32,
    },
}

pub type IndexResult<T> = Result<T, IndexError>;

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::DuplicateEntity => {
                write!(f, "entity is already present in the spatial index")
            }
            IndexError::InvalidConfig {
                max_objects,
                max_levels,
            } => {
                write!(
                    f,
                    "max_objects must be at least 1 (max_objects: {}, max_levels: {})",
                    max_objects, max_levels
                )
            }
            IndexError::InvalidBounds {
                x,
                y,
                width,
                height,
            } => {
                write!(
                    f,
                    "bounds must be finite (x: {}, y: {}, width: {}, height: {})",
                    x, y, width, height
                )
            }
            IndexError::InvalidCellSize { cell_size } => {
                write!(
                    f,
                    "cell size must be finite and positive (cell_size: {})",
                    cell_size
                )
            }
        }
    }
}

impl std::error::Error for IndexError {}
