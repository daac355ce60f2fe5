use std::time::Duration;

use chroma_maze_core::{CellCoord, Direction};
use glam::Vec3;

use crate::Level;

/// Order in which neighbours are tried when picking the initial facing.
const INITIAL_FACING_ORDER: [Direction; 4] = [
    Direction::East,
    Direction::South,
    Direction::West,
    Direction::North,
];

/// Smoothstep ease `3a² - 2a³` over a clamped `a`.
#[must_use]
pub fn ease_in_out(t: f32) -> f32 {
    let a = t.clamp(0.0, 1.0);
    a * a * (3.0 - 2.0 * a)
}

/// Discrete grid token with a presentational movement tween.
///
/// The logical cell flips the instant a step is accepted; only the world-space
/// position lags behind while the tween runs.
#[derive(Clone, Debug)]
pub struct Player {
    cell: CellCoord,
    facing: Direction,
    motion: Motion,
    position: Vec3,
    height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Motion {
    Idle,
    Moving(Tween),
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Tween {
    from: Vec3,
    to: Vec3,
    progress: f32,
}

impl Player {
    /// Places the player on the level's start cell, facing the first open neighbour.
    #[must_use]
    pub fn spawn(level: &Level, height: f32) -> Self {
        let start = level.start();
        let facing = INITIAL_FACING_ORDER
            .into_iter()
            .find(|direction| {
                start
                    .step(*direction)
                    .map_or(false, |cell| level.can_walk(cell))
            })
            .unwrap_or(Direction::North);

        Self {
            cell: start,
            facing,
            motion: Motion::Idle,
            position: lift(level.grid_to_world(start), height),
            height,
        }
    }

    /// Authoritative logical cell.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Direction the player faces.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Reports whether a tween is in flight.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        matches!(self.motion, Motion::Moving(_))
    }

    /// Raw tween progress, `None` while idle. May exceed one only transiently inside [`Player::advance`].
    #[must_use]
    pub fn progress(&self) -> Option<f32> {
        match self.motion {
            Motion::Idle => None,
            Motion::Moving(tween) => Some(tween.progress),
        }
    }

    /// Interpolated world-space position.
    #[must_use]
    pub const fn world_position(&self) -> Vec3 {
        self.position
    }

    /// Turns the player instantly. Allowed while moving.
    pub fn set_direction(&mut self, direction: Direction) {
        self.facing = direction;
    }

    /// Starts a one-cell move if the player is idle and the destination is walkable.
    ///
    /// Returns `true` when the step was accepted.
    pub fn try_step(&mut self, level: &Level, direction: Direction) -> bool {
        if self.is_moving() {
            return false;
        }

        let Some(destination) = self.cell.step(direction) else {
            return false;
        };
        if !level.can_walk(destination) {
            return false;
        }

        self.motion = Motion::Moving(Tween {
            from: self.position,
            to: lift(level.grid_to_world(destination), self.height),
            progress: 0.0,
        });
        self.cell = destination;
        true
    }

    /// Advances the tween and reports whether the move finished during this call.
    pub fn advance(&mut self, dt: Duration, move_duration: Duration) -> bool {
        let Motion::Moving(mut tween) = self.motion else {
            return false;
        };

        let duration = move_duration.as_secs_f32();
        tween.progress = if duration > 0.0 {
            tween.progress + dt.as_secs_f32() / duration
        } else {
            1.0
        };

        let a = tween.progress.min(1.0);
        self.position = tween.from.lerp(tween.to, ease_in_out(a));

        if a >= 1.0 {
            self.position = tween.to;
            self.motion = Motion::Idle;
            true
        } else {
            self.motion = Motion::Moving(tween);
            false
        }
    }

    /// Snaps back to the start facing north, dropping any tween in flight.
    pub fn reset(&mut self, level: &Level) {
        self.cell = level.start();
        self.facing = Direction::North;
        self.motion = Motion::Idle;
        self.position = lift(level.grid_to_world(self.cell), self.height);
    }
}

fn lift(floor: Vec3, height: f32) -> Vec3 {
    Vec3::new(floor.x, height, floor.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_maze_core::{ColorMap, MazeMap, MovementColor};

    fn level(rows: &[[u8; 5]]) -> Level {
        let maze = MazeMap::from_codes(rows).expect("valid layout");
        let mut colors = ColorMap::empty(maze.columns(), maze.rows());
        for (cell, kind) in maze.iter() {
            if kind.is_walkable() {
                colors.paint(cell, MovementColor::Red.into());
            }
        }
        Level::new(maze, colors, 1.0).expect("valid level")
    }

    fn corridor() -> Level {
        level(&[
            [1, 1, 1, 1, 1],
            [1, 2, 0, 3, 1],
            [1, 1, 1, 1, 1],
        ])
    }

    #[test]
    fn ease_is_smoothstep() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert_eq!(ease_in_out(0.5), 0.5);
        assert!((ease_in_out(0.25) - 0.156_25).abs() < 1e-6);
        assert_eq!(ease_in_out(2.0), 1.0);
        assert_eq!(ease_in_out(-1.0), 0.0);
    }

    #[test]
    fn spawn_faces_first_open_neighbour() {
        assert_eq!(Player::spawn(&corridor(), 0.5).facing(), Direction::East);

        let south_only = level(&[
            [1, 1, 1, 1, 1],
            [1, 2, 1, 1, 1],
            [1, 3, 1, 1, 1],
        ]);
        assert_eq!(Player::spawn(&south_only, 0.5).facing(), Direction::South);

        let west_only = level(&[
            [1, 1, 1, 1, 1],
            [1, 3, 2, 1, 1],
            [1, 1, 1, 1, 1],
        ]);
        assert_eq!(Player::spawn(&west_only, 0.5).facing(), Direction::West);

        let north_only = level(&[
            [1, 3, 1, 1, 1],
            [1, 2, 1, 1, 1],
            [1, 1, 1, 1, 1],
        ]);
        assert_eq!(Player::spawn(&north_only, 0.5).facing(), Direction::North);
    }

    #[test]
    fn spawn_prefers_west_over_north() {
        let west_and_north = level(&[
            [1, 1, 3, 1, 1],
            [1, 0, 2, 1, 1],
            [1, 1, 1, 1, 1],
        ]);
        assert_eq!(
            Player::spawn(&west_and_north, 0.5).facing(),
            Direction::West
        );
    }

    #[test]
    fn enclosed_spawn_faces_north() {
        let enclosed = level(&[
            [1, 1, 1, 1, 1],
            [1, 2, 1, 3, 1],
            [1, 1, 1, 1, 1],
        ]);
        assert_eq!(Player::spawn(&enclosed, 0.5).facing(), Direction::North);
    }

    #[test]
    fn logical_cell_flips_before_the_tween_finishes() {
        let level = corridor();
        let mut player = Player::spawn(&level, 0.5);
        let duration = Duration::from_millis(200);

        assert!(player.try_step(&level, Direction::East));
        assert_eq!(player.cell(), CellCoord::new(2, 1));
        assert!(player.is_moving());

        assert!(!player.advance(Duration::from_millis(100), duration));
        let halfway = player.world_position();
        assert!((halfway.x - -0.5).abs() < 1e-5);
        assert_eq!(halfway.y, 0.5);

        assert!(player.advance(Duration::from_millis(100), duration));
        assert!(!player.is_moving());
        assert_eq!(
            player.world_position(),
            Vec3::new(0.0, 0.5, 0.0)
        );
        assert!(!player.advance(Duration::from_millis(100), duration));
    }

    #[test]
    fn second_step_is_rejected_while_moving() {
        let level = corridor();
        let mut player = Player::spawn(&level, 0.0);

        assert!(player.try_step(&level, Direction::East));
        assert!(!player.try_step(&level, Direction::East));
        assert_eq!(player.cell(), CellCoord::new(2, 1));
    }

    #[test]
    fn walls_reject_steps() {
        let level = corridor();
        let mut player = Player::spawn(&level, 0.0);

        assert!(!player.try_step(&level, Direction::North));
        assert!(!player.try_step(&level, Direction::West));
        assert!(!player.is_moving());
        assert_eq!(player.cell(), level.start());
    }

    #[test]
    fn reset_drops_tween_and_faces_north() {
        let level = corridor();
        let mut player = Player::spawn(&level, 0.0);
        assert!(player.try_step(&level, Direction::East));
        let _ = player.advance(Duration::from_millis(10), Duration::from_millis(180));

        player.reset(&level);

        assert_eq!(player.cell(), level.start());
        assert_eq!(player.facing(), Direction::North);
        assert!(!player.is_moving());
        assert_eq!(player.progress(), None);
        assert_eq!(player.world_position(), level.grid_to_world(level.start()));
    }
}
