#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-driven orchestration of a Chroma Maze level.
//!
//! [`Game`] owns the authoritative world and every system. Hosts call
//! [`Game::tick`] once per frame and submit player intent through the command
//! methods, each of which reports whether the world accepted it. Within a tick
//! the order is fixed: the movement tween advances, the idle timer grows, the
//! auto-advance system may take one step, the goal is checked, and only then
//! are visibility and the ahead-tile highlight rebuilt.

use std::{collections::VecDeque, time::Duration};

use chroma_maze_core::{
    CellCoord, CellKind, ColorMap, Command, ConfigError, Direction, Event, GameConfig,
    LayoutError, MazeMap, MovementColor, TileColor,
};
use chroma_maze_system_auto_advance::AutoAdvance;
use chroma_maze_system_maze_generation::generate_level;
use chroma_maze_system_visibility::{compute_visibility, needs_recompute, HIDDEN};
use chroma_maze_world::{self as world, query, Level, World};
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Most events kept for [`Game::drain_events`]; older ones are dropped first.
pub const EVENT_BACKLOG: usize = 256;

/// Reasons a level cannot be started.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GameError {
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The maze or its colors are inconsistent.
    #[error("invalid level layout: {0}")]
    Layout(#[from] LayoutError),
}

/// Everything a renderer needs to build the scene for a fresh level.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelSnapshot {
    /// Maze layout.
    pub maze: MazeMap,
    /// Tile colors including the reserved start and goal colors.
    pub colors: ColorMap,
    /// Start cell.
    pub start: CellCoord,
    /// Goal cell.
    pub goal: CellCoord,
    /// Player cell.
    pub player: CellCoord,
    /// Player facing.
    pub facing: Direction,
    /// Player world-space position.
    pub player_position: Vec3,
    /// Side length of a tile in world units.
    pub tile_length: f32,
}

/// Orthographic framing that fits the whole maze on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFraming {
    /// Half-height of the orthographic view volume.
    pub view_size: f32,
    /// Distance of the camera from the maze centre.
    pub radius: f32,
}

/// Authoritative game session for one level.
#[derive(Debug)]
pub struct Game {
    world: World,
    auto_advance: AutoAdvance,
    visibility: Vec<f32>,
    ahead: Option<CellCoord>,
    outbox: VecDeque<Event>,
}

impl Game {
    /// Generates a level of the requested size from `seed` and starts playing it.
    ///
    /// Even or undersized dimensions are rounded up to valid odd sizes.
    pub fn init(config: GameConfig, columns: u32, rows: u32, seed: u64) -> Result<Self, GameError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let generated = generate_level(columns, rows, &mut rng);
        let level = Level::new(generated.maze, generated.colors, config.tile_length)?;
        Ok(Self::start(level, config))
    }

    /// Starts playing a prepared layout. Start and goal are repainted with their reserved colors.
    pub fn from_layout(
        config: GameConfig,
        maze: MazeMap,
        mut colors: ColorMap,
    ) -> Result<Self, GameError> {
        config.validate()?;
        if let (Some(start), Some(goal)) = (maze.find(CellKind::Start), maze.find(CellKind::Goal)) {
            colors.paint_reserved(start, goal);
        }
        let level = Level::new(maze, colors, config.tile_length)?;
        Ok(Self::start(level, config))
    }

    fn start(level: Level, config: GameConfig) -> Self {
        let mut game = Self {
            world: World::new(level, config),
            auto_advance: AutoAdvance::new(),
            visibility: Vec::new(),
            ahead: None,
            outbox: VecDeque::new(),
        };
        game.refresh_visibility();
        game.refresh_ahead_tile();
        game
    }

    /// Describes the level as it stands now.
    #[must_use]
    pub fn snapshot(&self) -> LevelSnapshot {
        let level = query::level(&self.world);
        let player = query::player(&self.world);
        LevelSnapshot {
            maze: level.maze().clone(),
            colors: level.colors().clone(),
            start: level.start(),
            goal: level.goal(),
            player: player.cell(),
            facing: player.facing(),
            player_position: player.world_position(),
            tile_length: level.tile_length(),
        }
    }

    /// Advances the simulation by one frame.
    pub fn tick(&mut self, dt: Duration) {
        let _ = self.dispatch(Command::Tick { dt });
    }

    /// Turns the player. Rejected while a move is in flight or after the level is cleared.
    pub fn rotate(&mut self, direction: Direction) -> bool {
        self.dispatch(Command::Rotate { direction })
    }

    /// Changes the player's color. Rejected while a move is in flight or after the level is cleared.
    pub fn select_color(&mut self, color: MovementColor) -> bool {
        self.dispatch(Command::SelectColor { color })
    }

    /// Scales the auto-step interval and the move duration. Rejects factors outside
    /// [`MIN_SPEED_MULTIPLIER`](chroma_maze_core::MIN_SPEED_MULTIPLIER) to
    /// [`MAX_SPEED_MULTIPLIER`](chroma_maze_core::MAX_SPEED_MULTIPLIER).
    pub fn set_speed_multiplier(&mut self, factor: f32) -> bool {
        self.dispatch(Command::SetSpeedMultiplier { factor })
    }

    /// Sets the full visibility aperture in degrees.
    pub fn set_view_angle(&mut self, degrees: f32) -> bool {
        self.dispatch(Command::SetViewAngle { degrees })
    }

    /// Returns to the start with the default color; the layout is kept.
    pub fn restart(&mut self) -> bool {
        self.dispatch(Command::Restart)
    }

    /// Authoritative player cell.
    #[must_use]
    pub fn player_cell(&self) -> CellCoord {
        query::player(&self.world).cell()
    }

    /// Direction the player faces.
    #[must_use]
    pub fn facing(&self) -> Direction {
        query::player(&self.world).facing()
    }

    /// Interpolated player position for rendering.
    #[must_use]
    pub fn player_position(&self) -> Vec3 {
        query::player(&self.world).world_position()
    }

    /// Reports whether a move tween is in flight.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        query::player(&self.world).is_moving()
    }

    /// Reports whether the goal was reached.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        query::is_cleared(&self.world)
    }

    /// Color the player currently is.
    #[must_use]
    pub fn selected_color(&self) -> TileColor {
        query::selected_color(&self.world)
    }

    /// Full visibility aperture in degrees.
    #[must_use]
    pub fn view_angle(&self) -> f32 {
        query::view_angle_degrees(&self.world)
    }

    /// Target opacity of a cell. Walls and out-of-bounds cells are hidden.
    #[must_use]
    pub fn visibility(&self, cell: CellCoord) -> f32 {
        let maze = query::level(&self.world).maze();
        if cell.column() >= maze.columns() || cell.row() >= maze.rows() {
            return HIDDEN;
        }
        let index = cell.row() as usize * maze.columns() as usize + cell.column() as usize;
        self.visibility.get(index).copied().unwrap_or(HIDDEN)
    }

    /// Walkable tile directly in front of the player, absent once the level is cleared.
    #[must_use]
    pub fn ahead_tile(&self) -> Option<CellCoord> {
        self.ahead
    }

    /// Read-only level layout.
    #[must_use]
    pub fn level(&self) -> &Level {
        query::level(&self.world)
    }

    /// Camera framing that keeps the whole maze in view.
    #[must_use]
    pub fn camera_framing(&self) -> CameraFraming {
        let level = query::level(&self.world);
        let extent = level.maze().columns().max(level.maze().rows()) as f32 * level.tile_length();
        CameraFraming {
            view_size: extent * 0.6,
            radius: extent * 1.4,
        }
    }

    /// Hands over the events emitted since the previous call, oldest first.
    ///
    /// Frame ticks are not recorded, and at most [`EVENT_BACKLOG`] events are kept, so hosts
    /// that never drain do not accumulate history.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.outbox.drain(..).collect()
    }

    fn dispatch(&mut self, command: Command) -> bool {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        let accepted = !events.is_empty();
        self.pump(events);
        accepted
    }

    fn pump(&mut self, mut events: Vec<Event>) {
        let mut stale = needs_recompute(&events);

        while !events.is_empty() {
            let snapshot = query::player_snapshot(&self.world);
            let mut commands = Vec::new();
            self.auto_advance.handle(&events, &snapshot, &mut commands);
            self.record(&mut events);

            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
            stale |= needs_recompute(&events);
        }

        if stale {
            self.refresh_visibility();
        }
        self.refresh_ahead_tile();
    }

    fn record(&mut self, events: &mut Vec<Event>) {
        for event in events.drain(..) {
            if matches!(event, Event::TimeAdvanced { .. }) {
                continue;
            }
            if self.outbox.len() == EVENT_BACKLOG {
                let _ = self.outbox.pop_front();
            }
            self.outbox.push_back(event);
        }
    }

    fn refresh_visibility(&mut self) {
        let player = query::player(&self.world);
        let half_angle = query::view_angle_degrees(&self.world) * 0.5;
        let cone = compute_visibility(player.cell(), player.facing(), half_angle);
        cone.write_targets(query::level(&self.world).maze(), &mut self.visibility);
        log::debug!(
            "visibility rebuilt from {:?} facing {:?}: {} cells visible",
            player.cell(),
            player.facing(),
            self.visibility.iter().filter(|target| **target > HIDDEN).count()
        );
    }

    fn refresh_ahead_tile(&mut self) {
        if query::is_cleared(&self.world) {
            self.ahead = None;
            return;
        }

        let player = query::player(&self.world);
        let level = query::level(&self.world);
        self.ahead = player
            .cell()
            .step(player.facing())
            .filter(|cell| level.can_walk(*cell));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_rounds_dimensions_and_places_player_on_start() {
        let game = Game::init(GameConfig::default(), 10, 12, 42).expect("valid level");
        let snapshot = game.snapshot();

        assert_eq!(snapshot.maze.columns(), 11);
        assert_eq!(snapshot.maze.rows(), 13);
        assert_eq!(snapshot.player, snapshot.start);
        assert_eq!(snapshot.colors.color(snapshot.start), Some(TileColor::Start));
        assert_eq!(snapshot.colors.color(snapshot.goal), Some(TileColor::Goal));
        assert_eq!(
            game.selected_color(),
            TileColor::Movement(MovementColor::Red)
        );
        assert_eq!(game.visibility(snapshot.start), 1.0);
    }

    #[test]
    fn init_refuses_invalid_configuration() {
        let config = GameConfig {
            speed_multiplier: -1.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            Game::init(config, 9, 9, 1),
            Err(GameError::Config(_))
        ));
    }

    #[test]
    fn camera_framing_scales_with_largest_axis() {
        let game = Game::init(GameConfig::default(), 31, 33, 3).expect("valid level");
        let framing = game.camera_framing();
        assert!((framing.view_size - 33.0 * 2.2 * 0.6).abs() < 1e-4);
        assert!((framing.radius - 33.0 * 2.2 * 1.4).abs() < 1e-4);
    }
}
