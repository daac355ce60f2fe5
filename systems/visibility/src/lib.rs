#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Direction-gated field of view.
//!
//! A cell is seen when the angle between the player's facing and the vector
//! from the player to the cell is within the configured half-angle. The result
//! is a pure predicate; callers rebuild it after every position, facing or
//! aperture change rather than patching previous results.

use chroma_maze_core::{CellCoord, Direction, Event, MazeMap};
use glam::DVec2;

/// Opacity target for cells inside the cone.
pub const VISIBLE: f32 = 1.0;

/// Opacity target for cells outside the cone and for walls.
pub const HIDDEN: f32 = 0.0;

/// Visibility predicate for one origin, facing and aperture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityCone {
    origin: CellCoord,
    facing: DVec2,
    cos_threshold: f64,
}

/// Builds the visibility cone for a player at `origin`.
///
/// `half_angle_degrees` is measured from the facing direction to the cone edge,
/// so a full aperture of 180 degrees corresponds to a half-angle of 90.
#[must_use]
pub fn compute_visibility(
    origin: CellCoord,
    facing: Direction,
    half_angle_degrees: f32,
) -> VisibilityCone {
    let (dx, dy) = facing.delta();
    VisibilityCone {
        origin,
        facing: DVec2::new(f64::from(dx), f64::from(dy)),
        cos_threshold: f64::from(half_angle_degrees).to_radians().cos(),
    }
}

impl VisibilityCone {
    /// Reports whether the cell lies inside the cone. The origin is always visible.
    #[must_use]
    pub fn is_visible(&self, cell: CellCoord) -> bool {
        let offset = DVec2::new(
            f64::from(cell.column()) - f64::from(self.origin.column()),
            f64::from(cell.row()) - f64::from(self.origin.row()),
        );
        if offset.length_squared() == 0.0 {
            return true;
        }

        self.facing.dot(offset.normalize()) >= self.cos_threshold
    }

    /// Cosine every visible cell's direction must reach.
    #[must_use]
    pub const fn cos_threshold(&self) -> f64 {
        self.cos_threshold
    }

    /// Opacity target for a single cell.
    #[must_use]
    pub fn target(&self, cell: CellCoord) -> f32 {
        if self.is_visible(cell) {
            VISIBLE
        } else {
            HIDDEN
        }
    }

    /// Rewrites `targets` with one opacity per cell of `maze` in row-major order.
    ///
    /// Walls are always [`HIDDEN`].
    pub fn write_targets(&self, maze: &MazeMap, targets: &mut Vec<f32>) {
        targets.clear();
        targets.extend(maze.iter().map(|(cell, kind)| {
            if kind.is_walkable() {
                self.target(cell)
            } else {
                HIDDEN
            }
        }));
    }
}

/// Reports whether any event invalidates previously computed visibility.
#[must_use]
pub fn needs_recompute(events: &[Event]) -> bool {
    events.iter().any(|event| {
        matches!(
            event,
            Event::PlayerMoveStarted { .. }
                | Event::PlayerMoveFinished { .. }
                | Event::FacingChanged { .. }
                | Event::ViewAngleChanged { .. }
                | Event::LevelRestarted
        )
    })
}
