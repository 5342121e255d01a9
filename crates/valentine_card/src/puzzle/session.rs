use core::time::Duration;

use bevy::prelude::*;

use super::grid::TileGrid;

/// A drag in progress. At most one exists, and it lives only between pick-up and drop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragContext {
    /// Home slot of the dragged tile, which is also its identity
    pub tile: usize,
    /// Slot the tile was picked up from
    pub source: usize,
    /// Latest pointer position in world space
    pub pointer: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing changed: same slot, off the board, no drag, or the puzzle is already solved
    Ignored,
    Moved,
    /// This move completed the picture
    Solved,
}

/// One visit to the puzzle screen: the arrangement, the open drag and the settle timer.
///
/// Dropping the resource tears everything down, pending settle timer included.
#[derive(Resource, Debug)]
pub struct PuzzleSession {
    grid: TileGrid,
    solved: bool,
    drag: Option<DragContext>,
    settle: Option<Timer>,
    settle_delay: Duration,
}

impl PuzzleSession {
    pub const fn new(grid: TileGrid, settle_delay: Duration) -> Self {
        Self {
            grid,
            solved: false,
            drag: None,
            settle: None,
            settle_delay,
        }
    }

    pub const fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub const fn is_solved(&self) -> bool {
        self.solved
    }

    pub const fn drag(&self) -> Option<&DragContext> {
        self.drag.as_ref()
    }

    /// Picks up `tile` from `source`. Refused while another drag is open, once
    /// solved, or when `tile` is not the one sitting in `source`.
    pub fn start_drag(&mut self, tile: usize, source: usize, pointer: Vec2) -> bool {
        if self.solved || self.drag.is_some() || self.grid.tile_at(source) != Some(tile) {
            return false;
        }
        self.drag = Some(DragContext {
            tile,
            source,
            pointer,
        });
        true
    }

    pub fn track(&mut self, pointer: Vec2) {
        if let Some(drag) = &mut self.drag {
            drag.pointer = pointer;
        }
    }

    /// Ends the drag. Dropping on another slot swaps the two tiles; dropping
    /// outside the board or back on the source slot changes nothing.
    pub fn drop_on(&mut self, target: Option<usize>) -> MoveOutcome {
        let Some(drag) = self.drag.take() else {
            return MoveOutcome::Ignored;
        };
        match target {
            Some(target) => self.move_tile(drag.source, target),
            None => MoveOutcome::Ignored,
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    pub fn move_tile(&mut self, source: usize, target: usize) -> MoveOutcome {
        if self.solved || !self.grid.swap(source, target) {
            return MoveOutcome::Ignored;
        }
        if !self.grid.is_solved() {
            return MoveOutcome::Moved;
        }
        self.solved = true;
        self.drag = None;
        self.settle = Some(Timer::new(self.settle_delay, TimerMode::Once));
        MoveOutcome::Solved
    }

    /// Advances the settle timer. Returns `true` exactly once, on the tick the
    /// delay runs out after the solving move.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let Some(timer) = &mut self.settle else {
            return false;
        };
        if !timer.tick(delta).finished() {
            return false;
        }
        self.settle = None;
        true
    }

    pub fn settle_pending(&self) -> bool {
        self.settle.is_some()
    }
}
