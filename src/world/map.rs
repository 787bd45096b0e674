//! Tile grid geometry
//!
//! The mine floor is a rectangle of equally sized square tiles. Positions are
//! expressed in pixels, tiles in column/row indices.

use serde::{Deserialize, Serialize};

use crate::ecs::Position;

/// Dimensions of a mine floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    pub columns: i32,
    pub rows: i32,
    pub tile_size: i32,
}

impl TileGrid {
    pub fn new(columns: i32, rows: i32, tile_size: i32) -> Self {
        Self { columns, rows, tile_size }
    }

    /// Largest grid fitting a pixel area when the shorter side holds
    /// `tile_amount` tiles
    pub fn fit(map_width: i32, map_height: i32, tile_amount: i32) -> Self {
        let tile_size = if tile_amount > 0 {
            map_width.min(map_height) / tile_amount
        } else {
            0
        };
        if tile_size <= 0 {
            return Self::new(0, 0, 0);
        }
        Self::new(map_width / tile_size, map_height / tile_size, tile_size)
    }

    /// Pixel width of the grid
    pub fn pixel_width(&self) -> i32 {
        self.columns * self.tile_size
    }

    /// Pixel height of the grid
    pub fn pixel_height(&self) -> i32 {
        self.rows * self.tile_size
    }

    pub fn tile_count(&self) -> usize {
        (self.columns.max(0) * self.rows.max(0)) as usize
    }

    /// Check if pixel coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.pixel_width() && pos.y >= 0 && pos.y < self.pixel_height()
    }

    /// Check that a position sits on a tile corner
    #[inline]
    pub fn is_aligned(&self, pos: Position) -> bool {
        self.tile_size > 0 && pos.x % self.tile_size == 0 && pos.y % self.tile_size == 0
    }

    /// Pixel position of a tile
    #[inline]
    pub fn tile_to_pos(&self, column: i32, row: i32) -> Position {
        Position::new(column * self.tile_size, row * self.tile_size)
    }

    /// Tile containing a pixel position
    #[inline]
    pub fn pos_to_tile(&self, pos: Position) -> (i32, i32) {
        if self.tile_size <= 0 {
            return (0, 0);
        }
        (pos.x.div_euclid(self.tile_size), pos.y.div_euclid(self.tile_size))
    }
}
