#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Chroma Maze.

mod level;
mod player;

use std::time::Duration;

use chroma_maze_core::{
    admits_auto_step, is_valid_speed_multiplier, Command, Direction, Event, GameConfig,
    TileColor,
};

pub use level::Level;
pub use player::{ease_in_out, Player};

/// Largest accepted visibility aperture in degrees.
pub const MAX_VIEW_ANGLE: f32 = 360.0;

/// Represents the authoritative Chroma Maze world state.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    level: Level,
    player: Player,
    selected: TileColor,
    cleared: bool,
    idle_for: Duration,
    speed_multiplier: f32,
    view_angle_degrees: f32,
}

impl World {
    /// Creates a world in the playing state with the player on the start cell.
    #[must_use]
    pub fn new(level: Level, config: GameConfig) -> Self {
        let player = Player::spawn(&level, config.player_height);
        Self {
            selected: TileColor::Movement(config.default_color),
            cleared: false,
            idle_for: Duration::ZERO,
            speed_multiplier: config.speed_multiplier,
            view_angle_degrees: config.view_angle_degrees.clamp(0.0, MAX_VIEW_ANGLE),
            player,
            level,
            config,
        }
    }

    fn move_duration(&self) -> Duration {
        scale(self.config.move_duration(), self.speed_multiplier)
    }

    fn move_interval(&self) -> Duration {
        scale(self.config.move_interval(), self.speed_multiplier)
    }

    fn input_locked(&self) -> bool {
        self.cleared || self.player.is_moving()
    }

    fn evaluate_goal(&mut self, out_events: &mut Vec<Event>) {
        if self.cleared || self.player.cell() != self.level.goal() {
            return;
        }

        self.cleared = true;
        log::info!("level cleared at {:?}", self.player.cell());
        out_events.push(Event::LevelCleared {
            cell: self.player.cell(),
        });
    }

    fn step_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.input_locked() {
            log::debug!("step {direction:?} rejected: input locked");
            return;
        }

        let from = self.player.cell();
        let Some(destination) = from.step(direction) else {
            return;
        };
        if !admits_auto_step(self.selected, self.level.color(destination)) {
            log::debug!(
                "step {direction:?} rejected: {destination:?} does not admit {:?}",
                self.selected
            );
            return;
        }
        if !self.player.try_step(&self.level, direction) {
            log::debug!("step {direction:?} rejected: {destination:?} is not walkable");
            return;
        }

        self.idle_for = Duration::ZERO;
        out_events.push(Event::PlayerMoveStarted {
            from,
            to: destination,
        });
        self.evaluate_goal(out_events);
    }
}

/// Scales a base timing, saturating at [`Duration::MAX`] instead of overflowing.
fn scale(base: Duration, factor: f32) -> Duration {
    Duration::try_from_secs_f64(base.as_secs_f64() * f64::from(factor)).unwrap_or(Duration::MAX)
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Rejected commands leave the world untouched and emit no events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });

            let move_duration = world.move_duration();
            if world.player.advance(dt, move_duration) {
                out_events.push(Event::PlayerMoveFinished {
                    cell: world.player.cell(),
                });
            }

            if !world.cleared && !world.player.is_moving() {
                world.idle_for = world.idle_for.saturating_add(dt);
            }

            world.evaluate_goal(out_events);
        }
        Command::Rotate { direction } => {
            if world.input_locked() {
                log::debug!("rotate {direction:?} rejected: input locked");
                return;
            }
            world.player.set_direction(direction);
            out_events.push(Event::FacingChanged { direction });
        }
        Command::StepPlayer { direction } => world.step_player(direction, out_events),
        Command::SelectColor { color } => {
            if world.input_locked() {
                log::debug!("color {color:?} rejected: input locked");
                return;
            }
            world.selected = TileColor::Movement(color);
            out_events.push(Event::SelectedColorChanged {
                color: world.selected,
            });
        }
        Command::SetSpeedMultiplier { factor } => {
            if !is_valid_speed_multiplier(factor) {
                log::debug!("speed multiplier {factor} rejected");
                return;
            }
            world.speed_multiplier = factor;
            out_events.push(Event::SpeedChanged { factor });
        }
        Command::SetViewAngle { degrees } => {
            if !degrees.is_finite() {
                log::debug!("view angle {degrees} rejected");
                return;
            }
            let degrees = degrees.clamp(0.0, MAX_VIEW_ANGLE);
            world.view_angle_degrees = degrees;
            out_events.push(Event::ViewAngleChanged { degrees });
        }
        Command::Restart => {
            world.cleared = false;
            world.player.reset(&world.level);
            world.selected = TileColor::Movement(world.config.default_color);
            world.idle_for = Duration::ZERO;
            log::info!("level restarted");
            out_events.push(Event::LevelRestarted);
            out_events.push(Event::FacingChanged {
                direction: world.player.facing(),
            });
            out_events.push(Event::SelectedColorChanged {
                color: world.selected,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use chroma_maze_core::{PlayerSnapshot, TileColor};

    use super::{Level, Player, World};

    /// Provides read-only access to the level layout.
    #[must_use]
    pub fn level(world: &World) -> &Level {
        &world.level
    }

    /// Provides read-only access to the player token.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Captures the player's state for systems.
    #[must_use]
    pub fn player_snapshot(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: world.player.cell(),
            facing: world.player.facing(),
            moving: world.player.is_moving(),
            color: world.selected,
            cleared: world.cleared,
            idle_for: world.idle_for,
            ready_for_step: world.idle_for >= world.move_interval(),
        }
    }

    /// Reports whether the player reached the goal.
    #[must_use]
    pub fn is_cleared(world: &World) -> bool {
        world.cleared
    }

    /// Color the player currently is.
    #[must_use]
    pub fn selected_color(world: &World) -> TileColor {
        world.selected
    }

    /// Full visibility aperture in degrees.
    #[must_use]
    pub fn view_angle_degrees(world: &World) -> f32 {
        world.view_angle_degrees
    }

    /// Active speed multiplier.
    #[must_use]
    pub fn speed_multiplier(world: &World) -> f32 {
        world.speed_multiplier
    }

    /// Idle time required before the next automatic step at the current speed.
    #[must_use]
    pub fn move_interval(world: &World) -> Duration {
        world.move_interval()
    }

    /// Tween duration at the current speed.
    #[must_use]
    pub fn move_duration(world: &World) -> Duration {
        world.move_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_maze_core::{CellCoord, ColorMap, MazeMap, MovementColor, MAX_SPEED_MULTIPLIER};

    fn corridor_world() -> World {
        let maze = MazeMap::from_codes(&[
            [1u8, 1, 1, 1, 1],
            [1, 2, 0, 3, 1],
            [1, 1, 1, 1, 1],
        ])
        .expect("valid layout");
        let mut colors = ColorMap::empty(5, 3);
        colors.paint(CellCoord::new(2, 1), MovementColor::Red.into());
        colors.paint_reserved(CellCoord::new(1, 1), CellCoord::new(3, 1));
        let level = Level::new(maze, colors, 1.0).expect("valid level");
        World::new(level, GameConfig::default())
    }

    fn tick(world: &mut World, millis: u64) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::Tick {
                dt: Duration::from_millis(millis),
            },
            &mut events,
        );
        events
    }

    #[test]
    fn idle_timer_accumulates_until_ready() {
        let mut world = corridor_world();
        let _ = tick(&mut world, 300);
        assert!(!query::player_snapshot(&world).ready_for_step);

        let _ = tick(&mut world, 300);
        let snapshot = query::player_snapshot(&world);
        assert_eq!(snapshot.idle_for, Duration::from_millis(600));
        assert!(snapshot.ready_for_step);
    }

    #[test]
    fn step_onto_mismatched_color_emits_nothing() {
        let mut world = corridor_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SelectColor {
                color: MovementColor::Blue,
            },
            &mut events,
        );
        events.clear();

        apply(
            &mut world,
            Command::StepPlayer {
                direction: Direction::East,
            },
            &mut events,
        );

        assert!(events.is_empty());
        assert_eq!(query::player(&world).cell(), CellCoord::new(1, 1));
    }

    #[test]
    fn stepping_onto_goal_clears_immediately() {
        let mut world = corridor_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StepPlayer {
                direction: Direction::East,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::PlayerMoveStarted {
                from: CellCoord::new(1, 1),
                to: CellCoord::new(2, 1),
            }]
        );

        let finished = tick(&mut world, 500);
        assert!(finished.contains(&Event::PlayerMoveFinished {
            cell: CellCoord::new(2, 1)
        }));

        events.clear();
        apply(
            &mut world,
            Command::StepPlayer {
                direction: Direction::East,
            },
            &mut events,
        );
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            Event::LevelCleared {
                cell: CellCoord::new(3, 1)
            }
        );
        assert!(query::is_cleared(&world));
    }

    #[test]
    fn cleared_world_locks_input_but_accepts_restart() {
        let mut world = corridor_world();
        let mut events = Vec::new();
        for _ in 0..2 {
            apply(
                &mut world,
                Command::StepPlayer {
                    direction: Direction::East,
                },
                &mut events,
            );
            let _ = tick(&mut world, 500);
        }
        assert!(query::is_cleared(&world));

        events.clear();
        apply(
            &mut world,
            Command::Rotate {
                direction: Direction::West,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SelectColor {
                color: MovementColor::Yellow,
            },
            &mut events,
        );
        assert!(events.is_empty());

        let ticked = tick(&mut world, 500);
        assert_eq!(ticked, vec![Event::TimeAdvanced { dt: Duration::from_millis(500) }]);
        assert_eq!(query::player_snapshot(&world).idle_for, Duration::ZERO);

        apply(&mut world, Command::Restart, &mut events);
        assert_eq!(events[0], Event::LevelRestarted);
        assert!(!query::is_cleared(&world));
        assert_eq!(query::player(&world).cell(), CellCoord::new(1, 1));
        assert_eq!(query::player(&world).facing(), Direction::North);
        assert_eq!(
            query::selected_color(&world),
            TileColor::Movement(MovementColor::Red)
        );
    }

    #[test]
    fn speed_multiplier_scales_both_timings() {
        let mut world = corridor_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetSpeedMultiplier { factor: 2.0 },
            &mut events,
        );
        assert_eq!(query::move_interval(&world), Duration::from_millis(1200));
        assert_eq!(query::move_duration(&world), Duration::from_millis(360));

        events.clear();
        apply(
            &mut world,
            Command::SetSpeedMultiplier { factor: 0.0 },
            &mut events,
        );
        apply(
            &mut world,
            Command::SetSpeedMultiplier { factor: f32::NAN },
            &mut events,
        );
        assert!(events.is_empty());
        assert_eq!(query::speed_multiplier(&world), 2.0);
    }

    #[test]
    fn oversized_speed_multiplier_is_rejected() {
        let mut world = corridor_world();
        let mut events = Vec::new();
        for factor in [1.0e20, f32::INFINITY, 10.5, 0.05] {
            apply(
                &mut world,
                Command::SetSpeedMultiplier { factor },
                &mut events,
            );
        }
        assert!(events.is_empty());
        assert_eq!(query::speed_multiplier(&world), 1.0);

        let _ = tick(&mut world, 16);
        assert_eq!(query::move_interval(&world), Duration::from_millis(600));
    }

    #[test]
    fn huge_timings_saturate_instead_of_overflowing() {
        assert_eq!(scale(Duration::MAX, MAX_SPEED_MULTIPLIER), Duration::MAX);
        assert_eq!(scale(Duration::from_millis(600), 2.0), Duration::from_millis(1200));

        let maze = MazeMap::from_codes(&[[2u8, 0, 3]]).expect("valid layout");
        let mut colors = ColorMap::empty(3, 1);
        colors.paint(CellCoord::new(1, 0), MovementColor::Red.into());
        colors.paint_reserved(CellCoord::new(0, 0), CellCoord::new(2, 0));
        let level = Level::new(maze, colors, 1.0).expect("valid level");
        let config = GameConfig {
            move_interval_ms: u64::MAX,
            speed_multiplier: MAX_SPEED_MULTIPLIER,
            ..GameConfig::default()
        };
        let mut world = World::new(level, config);

        let _ = tick(&mut world, 16);
        assert!(query::move_interval(&world) >= Duration::from_millis(u64::MAX));
        assert!(!query::player_snapshot(&world).ready_for_step);
    }

    #[test]
    fn view_angle_is_clamped() {
        let mut world = corridor_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetViewAngle { degrees: 720.0 },
            &mut events,
        );
        assert_eq!(events, vec![Event::ViewAngleChanged { degrees: 360.0 }]);
        assert_eq!(query::view_angle_degrees(&world), 360.0);
    }
}
