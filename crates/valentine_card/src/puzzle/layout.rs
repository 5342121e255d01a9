use bevy::prelude::*;

use super::grid::{GRID_SIDE, SLOT_COUNT};

/// World-space geometry of the board: where each slot sits and how big the tiles are.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    /// Center of the board in world space
    pub center: Vec2,
    /// Side length of the whole board, gaps included
    pub board_size: f32,
    /// Space between neighbouring tiles
    pub gap: f32,
}

impl BoardLayout {
    pub fn tile_size(&self) -> f32 {
        self.gap.mul_add(-(GRID_SIDE as f32 - 1.0), self.board_size) / GRID_SIDE as f32
    }

    fn pitch(&self) -> f32 {
        self.tile_size() + self.gap
    }

    /// Center of a slot. Rows grow downwards on screen, which is -y in world space.
    pub fn slot_center(&self, slot: usize) -> Vec2 {
        let col = (slot % GRID_SIDE) as f32;
        let row = (slot / GRID_SIDE) as f32;
        let half = (GRID_SIDE as f32 - 1.0) / 2.0;
        self.center + Vec2::new(col - half, half - row) * self.pitch()
    }

    /// Slot under a world position, or `None` for gaps and anything off the board.
    pub fn slot_at(&self, world: Vec2) -> Option<usize> {
        let half_tile = self.tile_size() / 2.0;
        (0..SLOT_COUNT).find(|&slot| {
            let offset = (world - self.slot_center(slot)).abs();
            offset.x <= half_tile && offset.y <= half_tile
        })
    }
}
