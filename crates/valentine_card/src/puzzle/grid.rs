use std::fmt::{self, Display, Formatter};

use bevy::prelude::*;
use thiserror::Error;

pub const GRID_SIDE: usize = 3;
pub const SLOT_COUNT: usize = GRID_SIDE * GRID_SIDE;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GridError {
    #[error("Tile {tile} is outside the 3x3 grid")]
    TileOutOfRange { tile: usize },

    #[error("Tile {tile} appears more than once")]
    DuplicateTile { tile: usize },
}

/// The 3x3 arrangement, stored as `tiles[slot] = home slot of the tile sitting there`.
///
/// The only mutation is [`TileGrid::swap`], so the arrangement stays a
/// permutation of `0..9` for its whole life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    tiles: [usize; SLOT_COUNT],
}

impl TileGrid {
    /// Fisher-Yates shuffle that never hands back an already solved grid.
    pub fn shuffled(rng: &mut fastrand::Rng) -> Self {
        let mut tiles: [usize; SLOT_COUNT] = core::array::from_fn(|slot| slot);
        for i in (1..SLOT_COUNT).rev() {
            let j = rng.usize(..=i);
            tiles.swap(i, j);
        }
        Self::scrambled(tiles)
    }

    fn scrambled(mut tiles: [usize; SLOT_COUNT]) -> Self {
        let grid = Self { tiles };
        if grid.is_solved() {
            tiles.swap(0, 1);
            return Self { tiles };
        }
        grid
    }

    pub fn from_tiles(tiles: [usize; SLOT_COUNT]) -> Result<Self, GridError> {
        let mut seen = [false; SLOT_COUNT];
        for &tile in &tiles {
            let Some(slot_seen) = seen.get_mut(tile) else {
                return Err(GridError::TileOutOfRange { tile });
            };
            if *slot_seen {
                return Err(GridError::DuplicateTile { tile });
            }
            *slot_seen = true;
        }
        Ok(Self { tiles })
    }

    pub const fn tiles(&self) -> &[usize; SLOT_COUNT] {
        &self.tiles
    }

    pub fn tile_at(&self, slot: usize) -> Option<usize> {
        self.tiles.get(slot).copied()
    }

    pub fn slot_of(&self, tile: usize) -> Option<usize> {
        self.tiles.iter().position(|&t| t == tile)
    }

    /// Exchanges the tiles in two slots.
    ///
    /// Returns `false` without touching the grid when the slots are equal or
    /// either one is off the board.
    pub fn swap(&mut self, source: usize, target: usize) -> bool {
        if source == target || source >= SLOT_COUNT || target >= SLOT_COUNT {
            return false;
        }
        self.tiles.swap(source, target);
        true
    }

    pub fn is_solved(&self) -> bool {
        self.tiles.iter().enumerate().all(|(slot, &tile)| slot == tile)
    }
}

/// Column and row of a tile's piece in the source image. Depends only on the
/// tile's home slot, never on where the tile currently sits.
pub const fn crop_cell(tile: usize) -> UVec2 {
    UVec2::new((tile % GRID_SIDE) as u32, (tile / GRID_SIDE) as u32)
}

/// Region of the source image showing `tile`, for an image split into an exact 3x3 grid.
pub fn crop_rect(tile: usize, image_size: Vec2) -> Rect {
    let cell_size = image_size / GRID_SIDE as f32;
    let min = crop_cell(tile).as_vec2() * cell_size;
    Rect::from_corners(min, min + cell_size)
}

impl Display for TileGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(GRID_SIDE) {
            for tile in row {
                write!(f, "{tile} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_permutation(grid: &TileGrid) -> bool {
        let mut sorted = *grid.tiles();
        sorted.sort_unstable();
        sorted == core::array::from_fn(|slot| slot)
    }

    #[test]
    fn shuffle_is_a_permutation_and_never_solved() {
        for seed in 0..2_000 {
            let mut rng = fastrand::Rng::with_seed(seed);
            let grid = TileGrid::shuffled(&mut rng);
            assert!(is_permutation(&grid), "seed {seed} produced {grid:?}");
            assert!(!grid.is_solved(), "seed {seed} produced a solved grid");
        }
    }

    #[test]
    fn identity_shuffle_gets_first_two_slots_swapped() {
        let grid = TileGrid::scrambled([0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(grid.tiles(), &[1, 0, 2, 3, 4, 5, 6, 7, 8]);
        assert!(!grid.is_solved());
    }

    #[test]
    fn scrambled_leaves_unsolved_input_alone() {
        let grid = TileGrid::scrambled([8, 7, 6, 5, 4, 3, 2, 1, 0]);
        assert_eq!(grid.tiles(), &[8, 7, 6, 5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn swap_twice_restores_arrangement() {
        let mut grid = TileGrid::from_tiles([2, 5, 1, 0, 8, 3, 4, 7, 6]).unwrap();
        let before = grid;
        assert!(grid.swap(1, 7));
        assert_ne!(grid, before);
        assert!(grid.swap(1, 7));
        assert_eq!(grid, before);
    }

    #[test]
    fn swap_with_itself_is_rejected() {
        let mut grid = TileGrid::from_tiles([2, 5, 1, 0, 8, 3, 4, 7, 6]).unwrap();
        let before = grid;
        assert!(!grid.swap(4, 4));
        assert_eq!(grid, before);
    }

    #[test]
    fn swap_off_the_board_is_rejected() {
        let mut grid = TileGrid::from_tiles([2, 5, 1, 0, 8, 3, 4, 7, 6]).unwrap();
        let before = grid;
        assert!(!grid.swap(0, 9));
        assert!(!grid.swap(12, 3));
        assert_eq!(grid, before);
    }

    #[test]
    fn random_swaps_keep_the_permutation() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut grid = TileGrid::shuffled(&mut rng);
        for _ in 0..500 {
            grid.swap(rng.usize(..SLOT_COUNT + 2), rng.usize(..SLOT_COUNT + 2));
            assert!(is_permutation(&grid), "swap broke the grid: {grid:?}");
        }
    }

    #[test]
    fn swapping_the_last_pair_solves() {
        let mut grid = TileGrid::from_tiles([1, 0, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert!(!grid.is_solved());
        assert!(grid.swap(0, 1));
        assert!(grid.is_solved());
    }

    #[test]
    fn from_tiles_rejects_invalid_arrangements() {
        assert_eq!(
            TileGrid::from_tiles([0, 1, 2, 3, 4, 5, 6, 7, 9]),
            Err(GridError::TileOutOfRange { tile: 9 })
        );
        assert_eq!(
            TileGrid::from_tiles([0, 1, 2, 3, 4, 5, 6, 7, 7]),
            Err(GridError::DuplicateTile { tile: 7 })
        );
    }

    #[test]
    fn lookups_follow_the_arrangement() {
        let grid = TileGrid::from_tiles([4, 0, 1, 2, 3, 5, 6, 7, 8]).unwrap();
        assert_eq!(grid.tile_at(0), Some(4));
        assert_eq!(grid.slot_of(4), Some(0));
        assert_eq!(grid.slot_of(0), Some(1));
        assert_eq!(grid.tile_at(9), None);
    }

    #[test]
    fn crop_follows_home_slot() {
        assert_eq!(crop_cell(0), UVec2::new(0, 0));
        assert_eq!(crop_cell(5), UVec2::new(2, 1));
        assert_eq!(crop_cell(7), UVec2::new(1, 2));

        let rect = crop_rect(5, Vec2::splat(750.0));
        assert_eq!(rect.min, Vec2::new(500.0, 250.0));
        assert_eq!(rect.max, Vec2::new(750.0, 500.0));
    }

    #[test]
    fn display_prints_rows() {
        let grid = TileGrid::from_tiles([1, 0, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(grid.to_string(), "1 0 2 \n3 4 5 \n6 7 8 \n");
    }
}
