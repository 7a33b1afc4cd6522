/// Tile grid coordinates
///
/// Tiles on the remote server are addressed by integer (x, y) positions in a
/// global map grid. One archival run covers a fixed rectangular range of
/// those positions, configured as inclusive bounds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of one tile in the server's global grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Inclusive rectangular range of tile coordinates
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

impl GridBounds {
    /// Number of tile columns covered by the grid
    pub fn cols(&self) -> u32 {
        (self.x_max - self.x_min + 1).max(0) as u32
    }

    /// Number of tile rows covered by the grid
    pub fn rows(&self) -> u32 {
        (self.y_max - self.y_min + 1).max(0) as u32
    }

    /// Total number of tiles in the grid
    pub fn len(&self) -> usize {
        self.cols() as usize * self.rows() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enumerate every coordinate in the grid.
    ///
    /// The order is deterministic: column by column (x ascending), and
    /// within a column top to bottom (y ascending). Fetching, assembly and
    /// the README preview all rely on this order being stable.
    pub fn coords(&self) -> Vec<TileCoord> {
        let mut coords = Vec::with_capacity(self.len());
        for x in self.x_min..=self.x_max {
            for y in self.y_min..=self.y_max {
                coords.push(TileCoord { x, y });
            }
        }
        coords
    }
}
