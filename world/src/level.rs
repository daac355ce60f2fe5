use chroma_maze_core::{CellCoord, CellKind, ColorMap, LayoutError, MazeMap, TileColor};
use glam::Vec3;

/// Read-only facade over a maze and its tile colors.
///
/// World-space coordinates place the maze centre at the origin on the XZ plane
/// with one tile per `tile_length` units.
#[derive(Clone, Debug)]
pub struct Level {
    maze: MazeMap,
    colors: ColorMap,
    start: CellCoord,
    goal: CellCoord,
    tile_length: f32,
}

impl Level {
    /// Composes a level, checking that the color map covers exactly the walkable cells.
    pub fn new(maze: MazeMap, colors: ColorMap, tile_length: f32) -> Result<Self, LayoutError> {
        if (maze.columns(), maze.rows()) != (colors.columns(), colors.rows()) {
            return Err(LayoutError::DimensionMismatch {
                maze: (maze.columns(), maze.rows()),
                colors: (colors.columns(), colors.rows()),
            });
        }

        for (cell, kind) in maze.iter() {
            match (kind.is_walkable(), colors.color(cell)) {
                (true, None) => return Err(LayoutError::UncoloredTile(cell)),
                (false, Some(_)) => return Err(LayoutError::ColoredWall(cell)),
                _ => {}
            }
        }

        let start = maze
            .find(CellKind::Start)
            .ok_or(LayoutError::StartCount(0))?;
        let goal = maze.find(CellKind::Goal).ok_or(LayoutError::GoalCount(0))?;

        Ok(Self {
            maze,
            colors,
            start,
            goal,
            tile_length,
        })
    }

    /// Reports whether the cell is inside the grid and not a wall.
    #[must_use]
    pub fn can_walk(&self, cell: CellCoord) -> bool {
        self.maze.is_walkable(cell)
    }

    /// Maps a grid cell to the centre of its tile in world space, on the floor plane.
    #[must_use]
    pub fn grid_to_world(&self, cell: CellCoord) -> Vec3 {
        let offset_x = (self.maze.columns() as f32 - 1.0) * self.tile_length * 0.5;
        let offset_z = (self.maze.rows() as f32 - 1.0) * self.tile_length * 0.5;
        Vec3::new(
            cell.column() as f32 * self.tile_length - offset_x,
            0.0,
            cell.row() as f32 * self.tile_length - offset_z,
        )
    }

    /// First cell of the given kind in row-major order.
    #[must_use]
    pub fn find_tile(&self, kind: CellKind) -> Option<CellCoord> {
        self.maze.find(kind)
    }

    /// Kind of the cell, `None` outside the grid.
    #[must_use]
    pub fn kind(&self, cell: CellCoord) -> Option<CellKind> {
        self.maze.kind(cell)
    }

    /// Color of the tile, `None` for walls and cells outside the grid.
    #[must_use]
    pub fn color(&self, cell: CellCoord) -> Option<TileColor> {
        self.colors.color(cell)
    }

    /// Cell the player begins on.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Cell that clears the level.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }

    /// Underlying maze layout.
    #[must_use]
    pub const fn maze(&self) -> &MazeMap {
        &self.maze
    }

    /// Underlying tile colors.
    #[must_use]
    pub const fn colors(&self) -> &ColorMap {
        &self.colors
    }

    /// Side length of a tile in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }
}
