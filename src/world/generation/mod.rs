//! Procedural placement
//!
//! Scatters entities over random free tiles of the grid.

use std::collections::HashSet;

use rand::Rng;
use thiserror::Error;

use super::TileGrid;
use crate::ecs::Position;

/// Failures while building a level
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// More distinct tiles were requested than the grid has free
    #[error("requested {requested} free tiles but only {available} are available")]
    CapacityExceeded { requested: usize, available: usize },
    /// Tile size is zero or negative
    #[error("grid has no usable tiles (tile size {tile_size})")]
    EmptyGrid { tile_size: i32 },
}

impl TileGrid {
    /// Number of tiles random placement may use that are not yet occupied.
    ///
    /// Placement samples columns `1..=columns-1` and rows `1..=rows-1`, so
    /// the first column and the first row are never used.
    pub fn free_placement_tiles(&self, occupied: &HashSet<Position>) -> usize {
        if self.columns < 2 || self.rows < 2 {
            return 0;
        }
        let region = ((self.columns - 1) * (self.rows - 1)) as usize;
        let taken = occupied
            .iter()
            .filter(|pos| self.in_placement_region(**pos))
            .count();
        region.saturating_sub(taken)
    }

    fn in_placement_region(&self, pos: Position) -> bool {
        if !self.in_bounds(pos) || !self.is_aligned(pos) {
            return false;
        }
        let (column, row) = self.pos_to_tile(pos);
        column >= 1 && row >= 1
    }

    /// Pick `count` distinct random tiles that are not in `occupied`.
    ///
    /// Tiles are returned in the order they were drawn.
    pub fn place_random_tiles(
        &self,
        rng: &mut impl Rng,
        count: usize,
        occupied: &HashSet<Position>,
    ) -> Result<Vec<Position>, GenerationError> {
        if self.tile_size <= 0 {
            return Err(GenerationError::EmptyGrid { tile_size: self.tile_size });
        }
        if count == 0 {
            return Ok(Vec::new());
        }

        let available = self.free_placement_tiles(occupied);
        if count > available {
            return Err(GenerationError::CapacityExceeded { requested: count, available });
        }

        let mut reserved: HashSet<Position> = HashSet::with_capacity(count);
        let mut placed = Vec::with_capacity(count);
        while placed.len() < count {
            let column = rng.gen_range(1..=self.columns - 1);
            let row = rng.gen_range(1..=self.rows - 1);
            let pos = self.tile_to_pos(column, row);
            if occupied.contains(&pos) || !reserved.insert(pos) {
                continue;
            }
            placed.push(pos);
        }

        Ok(placed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_tiles_are_distinct_aligned_and_free() {
        let mut rng = StdRng::seed_from_u64(42);
        let grid = TileGrid::new(10, 8, 20);
        let occupied: HashSet<Position> = [Position::new(20, 20), Position::new(40, 60)].into_iter().collect();

        let tiles = grid.place_random_tiles(&mut rng, 30, &occupied).unwrap();
        assert_eq!(tiles.len(), 30);

        let unique: HashSet<Position> = tiles.iter().copied().collect();
        assert_eq!(unique.len(), 30);
        for pos in tiles {
            assert!(grid.in_bounds(pos));
            assert!(grid.is_aligned(pos));
            assert!(pos.x >= 20 && pos.y >= 20);
            assert!(!occupied.contains(&pos));
        }
    }

    #[test]
    fn test_fills_every_free_tile() {
        let mut rng = StdRng::seed_from_u64(3);
        let grid = TileGrid::new(4, 4, 10);
        let tiles = grid.place_random_tiles(&mut rng, 9, &HashSet::new()).unwrap();
        assert_eq!(tiles.iter().collect::<HashSet<_>>().len(), 9);
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut rng = StdRng::seed_from_u64(3);
        let grid = TileGrid::new(3, 2, 20);
        let occupied: HashSet<Position> = [Position::new(20, 20)].into_iter().collect();
        assert_eq!(grid.free_placement_tiles(&occupied), 1);

        let err = grid.place_random_tiles(&mut rng, 2, &occupied).unwrap_err();
        assert_eq!(err, GenerationError::CapacityExceeded { requested: 2, available: 1 });
        assert_eq!(grid.place_random_tiles(&mut rng, 1, &occupied).unwrap(), vec![Position::new(40, 20)]);
    }

    #[test]
    fn test_occupied_outside_region_does_not_count() {
        let grid = TileGrid::new(3, 3, 20);
        let occupied: HashSet<Position> = [Position::new(0, 0), Position::new(20, 0)].into_iter().collect();
        assert_eq!(grid.free_placement_tiles(&occupied), 4);
    }

    #[test]
    fn test_zero_count_and_bad_grid() {
        let mut rng = StdRng::seed_from_u64(0);
        let grid = TileGrid::new(1, 1, 20);
        assert!(grid.place_random_tiles(&mut rng, 0, &HashSet::new()).unwrap().is_empty());
        assert!(matches!(
            TileGrid::new(5, 5, 0).place_random_tiles(&mut rng, 1, &HashSet::new()),
            Err(GenerationError::EmptyGrid { .. })
        ));
    }
}
