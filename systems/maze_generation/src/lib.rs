#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural level generation: perfect mazes and biased tile coloring.
//!
//! Both passes draw from a caller-provided random number generator so hosts
//! can reproduce a level from a seed.

use chroma_maze_core::{CellCoord, CellKind, ColorMap, Direction, MazeMap, MovementColor, TileColor};
use rand::{seq::SliceRandom, Rng};

/// Smallest extent of either maze axis.
pub const MIN_DIMENSION: u32 = 3;

/// Probability that a tile inherits the color of an already painted neighbour.
pub const INHERIT_PROBABILITY: f64 = 0.7;

/// Freshly generated level ready to be handed to the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedLevel {
    /// Carved maze with start and goal marked.
    pub maze: MazeMap,
    /// Tile colors with the reserved start and goal colors applied.
    pub colors: ColorMap,
    /// Cell the player begins on.
    pub start: CellCoord,
    /// Cell that clears the level.
    pub goal: CellCoord,
}

/// Generates a maze, colors it and paints the reserved start and goal colors.
pub fn generate_level<R: Rng + ?Sized>(columns: u32, rows: u32, rng: &mut R) -> GeneratedLevel {
    let maze = generate_maze(columns, rows, rng);
    let mut colors = assign_colors(&maze, rng);

    let start = maze
        .find(CellKind::Start)
        .unwrap_or(CellCoord::new(1, 1));
    let goal = maze.find(CellKind::Goal).unwrap_or(CellCoord::new(
        maze.columns().saturating_sub(2),
        maze.rows().saturating_sub(2),
    ));
    colors.paint_reserved(start, goal);

    log::info!(
        "generated {}x{} level, start {:?}, goal {:?}",
        maze.columns(),
        maze.rows(),
        start,
        goal
    );

    GeneratedLevel {
        maze,
        colors,
        start,
        goal,
    }
}

/// Rounds a requested size up to the odd dimensions the carver requires.
///
/// Sizes below [`MIN_DIMENSION`] are raised to it. A 3x3 request is widened to
/// 5x3 so the start and goal never coincide.
#[must_use]
pub fn normalize_dimensions(columns: u32, rows: u32) -> (u32, u32) {
    let columns = round_up_to_odd(columns.max(MIN_DIMENSION));
    let rows = round_up_to_odd(rows.max(MIN_DIMENSION));
    if columns == MIN_DIMENSION && rows == MIN_DIMENSION {
        (MIN_DIMENSION + 2, rows)
    } else {
        (columns, rows)
    }
}

fn round_up_to_odd(value: u32) -> u32 {
    if value % 2 == 0 {
        value.saturating_add(1)
    } else {
        value
    }
}

/// Carves a perfect maze with a randomized depth-first backtracker.
///
/// Rooms live on odd coordinates; the even cells between two rooms are removed
/// when the rooms are joined. Carving starts at `(1, 1)`, which becomes the
/// start, and `(columns - 2, rows - 2)` becomes the goal.
pub fn generate_maze<R: Rng + ?Sized>(columns: u32, rows: u32, rng: &mut R) -> MazeMap {
    let (columns, rows) = normalize_dimensions(columns, rows);
    let mut maze = MazeMap::filled(columns, rows, CellKind::Wall);

    let origin = CellCoord::new(1, 1);
    maze.set(origin, CellKind::Path);
    let mut stack = vec![CarveFrame::new(origin, rng)];

    while let Some(frame) = stack.last_mut() {
        let Some(direction) = frame.next_direction() else {
            let _ = stack.pop();
            continue;
        };

        let room = frame.cell;
        let Some((between, neighbour)) = two_steps(room, direction) else {
            continue;
        };
        if !is_interior(neighbour, columns, rows) || maze.kind(neighbour) != Some(CellKind::Wall) {
            continue;
        }

        maze.set(between, CellKind::Path);
        maze.set(neighbour, CellKind::Path);
        stack.push(CarveFrame::new(neighbour, rng));
    }

    maze.set(origin, CellKind::Start);
    maze.set(CellCoord::new(columns - 2, rows - 2), CellKind::Goal);

    log::debug!(
        "carved {columns}x{rows} maze with {} walkable cells",
        maze.walkable_count()
    );
    maze
}

#[derive(Debug)]
struct CarveFrame {
    cell: CellCoord,
    directions: [Direction; 4],
    next: usize,
}

impl CarveFrame {
    fn new<R: Rng + ?Sized>(cell: CellCoord, rng: &mut R) -> Self {
        let mut directions = Direction::ALL;
        directions.shuffle(rng);
        Self {
            cell,
            directions,
            next: 0,
        }
    }

    fn next_direction(&mut self) -> Option<Direction> {
        let direction = self.directions.get(self.next).copied()?;
        self.next += 1;
        Some(direction)
    }
}

fn two_steps(cell: CellCoord, direction: Direction) -> Option<(CellCoord, CellCoord)> {
    let between = cell.step(direction)?;
    let neighbour = between.step(direction)?;
    Some((between, neighbour))
}

fn is_interior(cell: CellCoord, columns: u32, rows: u32) -> bool {
    cell.column() > 0
        && cell.row() > 0
        && cell.column() < columns - 1
        && cell.row() < rows - 1
}

/// Labels every walkable cell with a movement color.
///
/// Cells are visited row by row. Each one inherits its left neighbour's color
/// with [`INHERIT_PROBABILITY`], otherwise its upper neighbour's color with the
/// same probability, otherwise a uniformly random palette color. Regions are
/// biased towards contiguity but may fragment. Start and goal are painted like
/// any other tile; [`ColorMap::paint_reserved`] overrides them afterwards.
pub fn assign_colors<R: Rng + ?Sized>(maze: &MazeMap, rng: &mut R) -> ColorMap {
    let mut colors = ColorMap::empty(maze.columns(), maze.rows());

    for (cell, kind) in maze.iter() {
        if !kind.is_walkable() {
            continue;
        }

        let inherited = inherit_from(maze, &colors, cell.step(Direction::West), rng)
            .or_else(|| inherit_from(maze, &colors, cell.step(Direction::North), rng));
        let color = match inherited {
            Some(color) => color,
            None => MovementColor::ALL[rng.gen_range(0..MovementColor::ALL.len())],
        };

        colors.paint(cell, TileColor::Movement(color));
    }

    colors
}

fn inherit_from<R: Rng + ?Sized>(
    maze: &MazeMap,
    colors: &ColorMap,
    neighbour: Option<CellCoord>,
    rng: &mut R,
) -> Option<MovementColor> {
    let neighbour = neighbour?;
    if !maze.is_walkable(neighbour) {
        return None;
    }
    let color = colors.color(neighbour)?;
    if !rng.gen_bool(INHERIT_PROBABILITY) {
        return None;
    }
    color.movement()
}
