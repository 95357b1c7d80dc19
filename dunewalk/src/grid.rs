//! Tile coordinates for level layout.
//!
//! Layouts place walls and floor tiles on regular lattices; this converts
//! between lattice coordinates and world positions.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// A cell on a tile lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Regular lattice anchored at `origin` with square cells.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileLattice {
    pub origin: Vec2,
    pub cell_size: f32,
}

impl TileLattice {
    pub fn new(origin: Vec2, cell_size: f32) -> Self {
        Self { origin, cell_size }
    }

    /// World position of a cell's anchor point.
    pub fn to_world(&self, coord: GridCoord) -> Vec2 {
        Vec2::new(
            self.origin.x + coord.x as f32 * self.cell_size,
            self.origin.y + coord.y as f32 * self.cell_size,
        )
    }

    /// Cell containing a world position.
    pub fn world_to_grid(&self, world_pos: Vec2) -> GridCoord {
        GridCoord {
            x: ((world_pos.x - self.origin.x) / self.cell_size).floor() as i32,
            y: ((world_pos.y - self.origin.y) / self.cell_size).floor() as i32,
        }
    }

    /// Cells covering `extent` world units from the origin, row by row.
    pub fn cells_covering(&self, extent: Vec2) -> impl Iterator<Item = GridCoord> {
        let cols = (extent.x / self.cell_size).ceil().max(0.0) as i32;
        let rows = (extent.y / self.cell_size).ceil().max(0.0) as i32;
        (0..cols).flat_map(move |x| (0..rows).map(move |y| GridCoord::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_world_and_back() {
        let lattice = TileLattice::new(Vec2::new(1024.0, 1024.0), 44.0);
        let coord = GridCoord::new(-5, -10);
        let world = lattice.to_world(coord);
        assert_eq!(world, Vec2::new(804.0, 584.0));
        assert_eq!(lattice.world_to_grid(world + Vec2::new(1.0, 1.0)), coord);
    }

    #[test]
    fn covering_rounds_up_partial_cells() {
        let lattice = TileLattice::new(Vec2::ZERO, 64.0);
        let cells: Vec<_> = lattice.cells_covering(Vec2::new(2000.0, 2000.0)).collect();
        assert_eq!(cells.len(), 32 * 32);
        assert_eq!(cells.first(), Some(&GridCoord::new(0, 0)));
        assert_eq!(cells.last(), Some(&GridCoord::new(31, 31)));
    }
}
