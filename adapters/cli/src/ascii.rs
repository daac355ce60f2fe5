use chroma_maze_core::{CellCoord, CellKind, MovementColor, TileColor};
use chroma_maze_game::Game;

const WALL: char = '#';
const PLAYER: char = '@';
const HIDDEN: char = '.';

/// Renders the maze as text, one row per line.
///
/// Walls are always drawn; walkable tiles appear only while visible.
pub(crate) fn render_frame(game: &Game) -> String {
    let maze = game.level().maze();
    let player = game.player_cell();
    let mut frame = String::with_capacity((maze.columns() as usize + 1) * maze.rows() as usize);

    for row in 0..maze.rows() {
        for column in 0..maze.columns() {
            let cell = CellCoord::new(column, row);
            frame.push(glyph(game, cell, player));
        }
        frame.push('\n');
    }

    frame
}

fn glyph(game: &Game, cell: CellCoord, player: CellCoord) -> char {
    if cell == player {
        return PLAYER;
    }
    match game.level().kind(cell) {
        Some(CellKind::Wall) | None => WALL,
        Some(_) if game.visibility(cell) <= 0.0 => HIDDEN,
        Some(_) => game.level().color(cell).map_or(HIDDEN, color_initial),
    }
}

/// Single-letter label for a tile color.
const fn color_initial(color: TileColor) -> char {
    match color {
        TileColor::Movement(MovementColor::Red) => 'R',
        TileColor::Movement(MovementColor::Yellow) => 'Y',
        TileColor::Movement(MovementColor::Blue) => 'B',
        TileColor::Start => 'S',
        TileColor::Goal => 'G',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_maze_core::{ColorMap, GameConfig, MazeMap};

    fn corridor() -> Game {
        let maze = MazeMap::from_codes(&[
            [1u8, 1, 1, 1, 1, 1],
            [1, 2, 0, 0, 3, 1],
            [1, 0, 1, 1, 1, 1],
            [1, 1, 1, 1, 1, 1],
        ])
        .expect("valid layout");
        let mut colors = ColorMap::empty(maze.columns(), maze.rows());
        colors.paint(CellCoord::new(2, 1), MovementColor::Yellow.into());
        colors.paint(CellCoord::new(3, 1), MovementColor::Blue.into());
        colors.paint(CellCoord::new(1, 2), MovementColor::Red.into());
        Game::from_layout(GameConfig::default(), maze, colors).expect("valid level")
    }

    #[test]
    fn frame_hides_tiles_outside_the_cone() {
        let frame = render_frame(&corridor());
        assert_eq!(frame, "######\n#@YBG#\n#.####\n######\n");
    }

    #[test]
    fn full_aperture_reveals_tiles_behind() {
        let mut game = corridor();
        assert!(game.set_view_angle(360.0));
        let frame = render_frame(&game);
        assert_eq!(frame, "######\n#@YBG#\n#R####\n######\n");
    }
}
