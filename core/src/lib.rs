#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Chroma Maze simulation.
//!
//! This crate defines the message surface that connects hosts, the
//! authoritative world, and pure systems. Hosts submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. A command the world refuses produces no events
//! at all, which is how callers learn it was rejected.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Chroma Maze.";

/// Smallest accepted speed multiplier.
pub const MIN_SPEED_MULTIPLIER: f32 = 0.1;

/// Largest accepted speed multiplier.
pub const MAX_SPEED_MULTIPLIER: f32 = 10.0;

/// Reports whether `factor` lies inside the accepted speed multiplier range.
#[must_use]
pub fn is_valid_speed_multiplier(factor: f32) -> bool {
    (MIN_SPEED_MULTIPLIER..=MAX_SPEED_MULTIPLIER).contains(&factor)
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Turns the player to face the provided direction without moving.
    Rotate {
        /// Direction the player should face.
        direction: Direction,
    },
    /// Requests that the player advance a single cell in the specified direction.
    StepPlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Changes the color the player currently is. Reserved tile colors cannot be selected.
    SelectColor {
        /// Palette color to adopt.
        color: MovementColor,
    },
    /// Scales both the auto-step interval and the move tween duration.
    SetSpeedMultiplier {
        /// Linear factor applied to the configured base timings.
        factor: f32,
    },
    /// Changes the full aperture of the visibility cone.
    SetViewAngle {
        /// Full cone aperture in degrees.
        degrees: f32,
    },
    /// Returns the player to the start without regenerating the level.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player accepted a step; the logical cell already changed.
    PlayerMoveStarted {
        /// Cell the player occupied before the step.
        from: CellCoord,
        /// Cell the player occupies from now on.
        to: CellCoord,
    },
    /// Reports that the movement tween reached its destination.
    PlayerMoveFinished {
        /// Cell the player rests on.
        cell: CellCoord,
    },
    /// Announces that the player now faces a new direction.
    FacingChanged {
        /// Direction the player faces after the change.
        direction: Direction,
    },
    /// Announces that the selected player color changed.
    SelectedColorChanged {
        /// Color that became active.
        color: TileColor,
    },
    /// Announces that the speed multiplier changed.
    SpeedChanged {
        /// Multiplier that became active.
        factor: f32,
    },
    /// Announces that the visibility aperture changed.
    ViewAngleChanged {
        /// Full aperture in degrees after clamping.
        degrees: f32,
    },
    /// Reports that the player reached the goal and input is now locked.
    LevelCleared {
        /// Goal cell the player stands on.
        cell: CellCoord,
    },
    /// Reports that the level returned to its initial playing state.
    LevelRestarted,
}

/// Cardinal facing directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction ordered by its numeric index.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Normalizes an arbitrary rotation index into a direction modulo four.
    #[must_use]
    pub fn from_index(index: i64) -> Self {
        let normalized = index.rem_euclid(4);
        Self::ALL[normalized as usize]
    }

    /// Unit grid delta expressed as `(columns, rows)`.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Neighbouring cell one step away, or `None` when the step leaves the positive quadrant.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (dx, dy) = direction.delta();
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(Self::new(column, row))
    }
}

/// Classification of a maze grid entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Solid cell that can never be entered.
    Wall,
    /// Carved walkable cell.
    Path,
    /// Walkable cell where the player begins.
    Start,
    /// Walkable cell that clears the level when reached.
    Goal,
}

impl CellKind {
    /// Decodes the compact numeric encoding `0 = path, 1 = wall, 2 = start, 3 = goal`.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Path),
            1 => Some(Self::Wall),
            2 => Some(Self::Start),
            3 => Some(Self::Goal),
            _ => None,
        }
    }

    /// Reports whether the player may stand on the cell.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::Wall)
    }
}

/// Palette colors that gate automatic forward motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementColor {
    /// Red tiles.
    Red,
    /// Yellow tiles.
    Yellow,
    /// Blue tiles.
    Blue,
}

impl MovementColor {
    /// Every movement color in palette order.
    pub const ALL: [MovementColor; 3] = [
        MovementColor::Red,
        MovementColor::Yellow,
        MovementColor::Blue,
    ];
}

/// Color label carried by every walkable tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileColor {
    /// One of the movement palette colors.
    Movement(MovementColor),
    /// Reserved color painted on the start tile.
    Start,
    /// Reserved color painted on the goal tile.
    Goal,
}

impl TileColor {
    /// Movement color carried by the tile, if it is not a reserved color.
    #[must_use]
    pub const fn movement(self) -> Option<MovementColor> {
        match self {
            Self::Movement(color) => Some(color),
            Self::Start | Self::Goal => None,
        }
    }
}

impl From<MovementColor> for TileColor {
    fn from(color: MovementColor) -> Self {
        Self::Movement(color)
    }
}

/// Decides whether an automatic step onto a tile of `destination` color is allowed.
///
/// The player must currently be a movement color, and the destination must either
/// share that color or be the goal tile. Wall cells carry no color and never admit.
#[must_use]
pub fn admits_auto_step(selected: TileColor, destination: Option<TileColor>) -> bool {
    if selected.movement().is_none() {
        return false;
    }

    match destination {
        Some(TileColor::Goal) => true,
        Some(color) => color == selected,
        None => false,
    }
}

/// Dense row-major grid of cell kinds describing a maze.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeMap {
    columns: u32,
    rows: u32,
    cells: Vec<CellKind>,
}

impl MazeMap {
    /// Creates a maze where every cell holds the provided kind.
    #[must_use]
    pub fn filled(columns: u32, rows: u32, kind: CellKind) -> Self {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![kind; capacity],
        }
    }

    /// Parses rows of compact cell codes (`0 = path, 1 = wall, 2 = start, 3 = goal`).
    ///
    /// The grid must be non-empty and rectangular and contain exactly one start and
    /// one goal cell.
    pub fn from_codes<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, LayoutError> {
        let expected = rows.first().map_or(0, |row| row.as_ref().len());
        if expected == 0 {
            return Err(LayoutError::Empty);
        }

        let mut cells = Vec::with_capacity(expected * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != expected {
                return Err(LayoutError::Ragged {
                    row: row_index,
                    expected,
                    found: row.len(),
                });
            }
            for (column_index, code) in row.iter().copied().enumerate() {
                let kind = CellKind::from_code(code).ok_or(LayoutError::UnknownCell {
                    code,
                    column: column_index,
                    row: row_index,
                })?;
                cells.push(kind);
            }
        }

        let columns = u32::try_from(expected).map_err(|_| LayoutError::Empty)?;
        let row_count = u32::try_from(rows.len()).map_err(|_| LayoutError::Empty)?;
        let maze = Self {
            columns,
            rows: row_count,
            cells,
        };

        let starts = maze.count(CellKind::Start);
        if starts != 1 {
            return Err(LayoutError::StartCount(starts));
        }
        let goals = maze.count(CellKind::Goal);
        if goals != 1 {
            return Err(LayoutError::GoalCount(goals));
        }

        Ok(maze)
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Kind of the provided cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn kind(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Overwrites the kind of an in-bounds cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, cell: CellCoord, kind: CellKind) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = kind;
            }
        }
    }

    /// Reports whether the cell is in bounds and not a wall.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.kind(cell).map_or(false, CellKind::is_walkable)
    }

    /// First cell of the given kind in row-major order.
    #[must_use]
    pub fn find(&self, kind: CellKind) -> Option<CellCoord> {
        self.iter()
            .find(|(_, candidate)| *candidate == kind)
            .map(|(cell, _)| cell)
    }

    /// Iterates every cell with its kind in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellKind)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().copied().enumerate().map(move |(index, kind)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), kind)
        })
    }

    /// Number of cells that are not walls.
    #[must_use]
    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|kind| kind.is_walkable()).count()
    }

    fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|candidate| **candidate == kind).count()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        grid_index(cell, self.columns, self.rows)
    }
}

/// Dense row-major grid of tile colors parallel to a [`MazeMap`].
///
/// Walls carry no color.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorMap {
    columns: u32,
    rows: u32,
    cells: Vec<Option<TileColor>>,
}

impl ColorMap {
    /// Creates a color map without any colored cells.
    #[must_use]
    pub fn empty(columns: u32, rows: u32) -> Self {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![None; capacity],
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Color of the provided cell, `None` for walls and out-of-bounds cells.
    #[must_use]
    pub fn color(&self, cell: CellCoord) -> Option<TileColor> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Paints an in-bounds cell. Out-of-bounds writes are ignored.
    pub fn paint(&mut self, cell: CellCoord, color: TileColor) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = Some(color);
            }
        }
    }

    /// Overrides the start and goal cells with their reserved colors.
    pub fn paint_reserved(&mut self, start: CellCoord, goal: CellCoord) {
        self.paint(start, TileColor::Start);
        self.paint(goal, TileColor::Goal);
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        grid_index(cell, self.columns, self.rows)
    }
}

fn grid_index(cell: CellCoord, columns: u32, rows: u32) -> Option<usize> {
    if cell.column() < columns && cell.row() < rows {
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(columns).ok()?;
        Some(row * width + column)
    } else {
        None
    }
}

/// Immutable representation of the player's state used by systems.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Authoritative logical cell of the player.
    pub cell: CellCoord,
    /// Direction the player faces.
    pub facing: Direction,
    /// Indicates whether a movement tween is in flight.
    pub moving: bool,
    /// Color the player currently is.
    pub color: TileColor,
    /// Indicates whether the level was cleared.
    pub cleared: bool,
    /// Time the player has spent idle since the last accepted step.
    pub idle_for: Duration,
    /// Indicates whether the idle timer reached the speed-scaled step interval.
    pub ready_for_step: bool,
}

/// Immutable tuning values handed to every component at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of a tile in world units.
    pub tile_length: f32,
    /// Height at which the player token floats above the floor.
    pub player_height: f32,
    /// Duration of one movement tween at a speed multiplier of one, in milliseconds.
    pub move_duration_ms: u64,
    /// Idle time required before an automatic step at a speed multiplier of one, in milliseconds.
    pub move_interval_ms: u64,
    /// Full aperture of the visibility cone in degrees.
    pub view_angle_degrees: f32,
    /// Initial multiplier applied to both timings.
    pub speed_multiplier: f32,
    /// Color the player adopts on start and after every restart.
    pub default_color: MovementColor,
    /// Requested maze width before odd rounding.
    pub maze_columns: u32,
    /// Requested maze height before odd rounding.
    pub maze_rows: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_length: 2.2,
            player_height: 0.6,
            move_duration_ms: 180,
            move_interval_ms: 600,
            view_angle_degrees: 60.0,
            speed_multiplier: 1.0,
            default_color: MovementColor::Red,
            maze_columns: 31,
            maze_rows: 33,
        }
    }
}

impl GameConfig {
    /// Checks that every tunable lies in its valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("move_duration_ms", self.move_duration_ms),
            ("move_interval_ms", self.move_interval_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroDuration { field });
            }
        }

        if !self.tile_length.is_finite() || self.tile_length <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "tile_length",
                value: self.tile_length,
            });
        }
        if !is_valid_speed_multiplier(self.speed_multiplier) {
            return Err(ConfigError::OutOfRange {
                field: "speed_multiplier",
                value: self.speed_multiplier,
                min: MIN_SPEED_MULTIPLIER,
                max: MAX_SPEED_MULTIPLIER,
            });
        }

        if !self.player_height.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "player_height",
                value: self.player_height,
            });
        }
        if !self.view_angle_degrees.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "view_angle_degrees",
                value: self.view_angle_degrees,
            });
        }

        Ok(())
    }

    /// Base tween duration before the speed multiplier is applied.
    #[must_use]
    pub fn move_duration(&self) -> Duration {
        Duration::from_millis(self.move_duration_ms)
    }

    /// Base auto-step interval before the speed multiplier is applied.
    #[must_use]
    pub fn move_interval(&self) -> Duration {
        Duration::from_millis(self.move_interval_ms)
    }
}

/// Reasons a [`GameConfig`] is refused.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A value that must be strictly positive was zero, negative or not finite.
    #[error("`{field}` must be a positive finite number, got {value}")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was supplied.
        value: f32,
    },
    /// A value fell outside its accepted range.
    #[error("`{field}` must lie within {min}..={max}, got {value}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was supplied.
        value: f32,
        /// Smallest accepted value.
        min: f32,
        /// Largest accepted value.
        max: f32,
    },
    /// A timing was configured as zero milliseconds.
    #[error("`{field}` must be at least one millisecond")]
    ZeroDuration {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A value that must be finite was NaN or infinite.
    #[error("`{field}` must be finite, got {value}")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was supplied.
        value: f32,
    },
}

/// Reasons a maze or color layout is refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The grid contained no cells.
    #[error("layout contains no cells")]
    Empty,
    /// A row had a different length from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A cell used a code outside `0..=3`.
    #[error("unknown cell code {code} at ({column}, {row})")]
    UnknownCell {
        /// Code that was encountered.
        code: u8,
        /// Column of the offending cell.
        column: usize,
        /// Row of the offending cell.
        row: usize,
    },
    /// The layout did not contain exactly one start cell.
    #[error("expected exactly one start cell, found {0}")]
    StartCount(usize),
    /// The layout did not contain exactly one goal cell.
    #[error("expected exactly one goal cell, found {0}")]
    GoalCount(usize),
    /// The color map does not cover the maze.
    #[error("color map is {colors:?} but maze is {maze:?}")]
    DimensionMismatch {
        /// Maze dimensions as `(columns, rows)`.
        maze: (u32, u32),
        /// Color map dimensions as `(columns, rows)`.
        colors: (u32, u32),
    },
    /// A walkable cell has no color.
    #[error("walkable cell {0:?} has no color")]
    UncoloredTile(CellCoord),
    /// A wall cell carries a color.
    #[error("wall cell {0:?} carries a color")]
    ColoredWall(CellCoord),
}

#[cfg(test)]
mod tests {
    use super::{
        admits_auto_step, CellCoord, CellKind, ColorMap, ConfigError, Direction, GameConfig,
        LayoutError, MazeMap, MovementColor, TileColor, MAX_SPEED_MULTIPLIER,
        MIN_SPEED_MULTIPLIER,
    };

    #[test]
    fn direction_index_normalizes_modulo_four() {
        assert_eq!(Direction::from_index(0), Direction::North);
        assert_eq!(Direction::from_index(5), Direction::East);
        assert_eq!(Direction::from_index(-1), Direction::West);
        assert_eq!(Direction::from_index(-6), Direction::South);
    }

    #[test]
    fn step_refuses_to_underflow() {
        let origin = CellCoord::new(0, 3);
        assert_eq!(origin.step(Direction::West), None);
        assert_eq!(origin.step(Direction::North), Some(CellCoord::new(0, 2)));
        assert_eq!(origin.step(Direction::East), Some(CellCoord::new(1, 3)));
    }

    #[test]
    fn from_codes_parses_fixed_layout() {
        let maze = MazeMap::from_codes(&[
            [1u8, 1, 1, 1],
            [1, 2, 3, 1],
            [1, 1, 1, 1],
        ])
        .expect("valid layout");

        assert_eq!(maze.columns(), 4);
        assert_eq!(maze.rows(), 3);
        assert_eq!(maze.find(CellKind::Start), Some(CellCoord::new(1, 1)));
        assert_eq!(maze.find(CellKind::Goal), Some(CellCoord::new(2, 1)));
        assert!(!maze.is_walkable(CellCoord::new(0, 0)));
        assert!(!maze.is_walkable(CellCoord::new(9, 9)));
        assert_eq!(maze.walkable_count(), 2);
    }

    #[test]
    fn from_codes_rejects_ragged_rows() {
        let rows: Vec<Vec<u8>> = vec![vec![2, 3], vec![1]];
        assert_eq!(
            MazeMap::from_codes(&rows),
            Err(LayoutError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn from_codes_requires_single_start_and_goal() {
        assert_eq!(
            MazeMap::from_codes(&[[0u8, 3]]),
            Err(LayoutError::StartCount(0))
        );
        assert_eq!(
            MazeMap::from_codes(&[[2u8, 3, 3]]),
            Err(LayoutError::GoalCount(2))
        );
        assert_eq!(
            MazeMap::from_codes(&[[2u8, 7]]),
            Err(LayoutError::UnknownCell {
                code: 7,
                column: 1,
                row: 0
            })
        );
    }

    #[test]
    fn reserved_paint_overrides_palette_colors() {
        let mut colors = ColorMap::empty(3, 1);
        for column in 0..3 {
            colors.paint(CellCoord::new(column, 0), MovementColor::Blue.into());
        }
        colors.paint_reserved(CellCoord::new(0, 0), CellCoord::new(2, 0));

        assert_eq!(colors.color(CellCoord::new(0, 0)), Some(TileColor::Start));
        assert_eq!(
            colors.color(CellCoord::new(1, 0)),
            Some(TileColor::Movement(MovementColor::Blue))
        );
        assert_eq!(colors.color(CellCoord::new(2, 0)), Some(TileColor::Goal));
    }

    #[test]
    fn auto_step_admits_matching_and_goal_tiles_only() {
        let red = TileColor::Movement(MovementColor::Red);
        let blue = TileColor::Movement(MovementColor::Blue);

        assert!(admits_auto_step(red, Some(red)));
        assert!(admits_auto_step(red, Some(TileColor::Goal)));
        assert!(!admits_auto_step(red, Some(blue)));
        assert!(!admits_auto_step(red, Some(TileColor::Start)));
        assert!(!admits_auto_step(red, None));
        assert!(!admits_auto_step(TileColor::Start, Some(TileColor::Goal)));
        assert!(!admits_auto_step(TileColor::Goal, Some(TileColor::Goal)));
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn config_rejects_non_positive_timings() {
        let config = GameConfig {
            move_interval_ms: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            tile_length: f32::NAN,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_bounds_the_speed_multiplier() {
        for speed_multiplier in [1.0e20, f32::INFINITY, 0.0, -1.0, 0.05, 10.5] {
            let config = GameConfig {
                speed_multiplier,
                ..GameConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::OutOfRange { .. })),
                "{speed_multiplier} accepted"
            );
        }

        for speed_multiplier in [MIN_SPEED_MULTIPLIER, 2.0, MAX_SPEED_MULTIPLIER] {
            let config = GameConfig {
                speed_multiplier,
                ..GameConfig::default()
            };
            assert_eq!(config.validate(), Ok(()));
        }
    }

    #[test]
    fn maze_round_trips_through_bincode() {
        let maze = MazeMap::from_codes(&[[2u8, 0, 3]]).expect("valid layout");
        let bytes = bincode::serialize(&maze).expect("serialize");
        let restored: MazeMap = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, maze);
    }
}
