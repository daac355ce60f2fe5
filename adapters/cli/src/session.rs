use std::{io::Write, time::Duration};

use anyhow::{Context, Result};
use chroma_maze_core::Event;
use chroma_maze_game::Game;

use crate::{
    ascii::render_frame,
    script::{ScriptCommand, RUN_RATE_HZ},
};

/// Drives a game from host input lines and reports each outcome.
pub(crate) struct Session<W> {
    game: Game,
    out: W,
}

impl<W: Write> Session<W> {
    pub(crate) fn new(game: Game, out: W) -> Self {
        Self { game, out }
    }

    /// Parses and executes one line.
    ///
    /// Malformed lines are reported to the output and, when `strict`, also fail the session.
    pub(crate) fn feed(&mut self, line_number: usize, line: &str, strict: bool) -> Result<()> {
        match ScriptCommand::parse(line) {
            Ok(Some(command)) => self.execute(command),
            Ok(None) => Ok(()),
            Err(error) if strict => {
                Err(error).with_context(|| format!("line {line_number}: '{}'", line.trim()))
            }
            Err(error) => {
                writeln!(self.out, "line {line_number}: {error}")?;
                Ok(())
            }
        }
    }

    fn execute(&mut self, command: ScriptCommand) -> Result<()> {
        let outcome = match command {
            ScriptCommand::Tick(dt) => {
                self.game.tick(dt);
                self.status()
            }
            ScriptCommand::Run { frames } => {
                let dt = Duration::from_secs(1) / RUN_RATE_HZ;
                for _ in 0..frames {
                    self.game.tick(dt);
                }
                self.status()
            }
            ScriptCommand::Rotate(direction) => verdict(self.game.rotate(direction)),
            ScriptCommand::Color(color) => verdict(self.game.select_color(color)),
            ScriptCommand::Speed(factor) => verdict(self.game.set_speed_multiplier(factor)),
            ScriptCommand::Angle(degrees) => verdict(self.game.set_view_angle(degrees)),
            ScriptCommand::Restart => verdict(self.game.restart()),
            ScriptCommand::Show => render_frame(&self.game),
        };

        for event in self.game.drain_events() {
            match event {
                Event::LevelCleared { cell } => writeln!(self.out, "level cleared at {cell:?}")?,
                other => log::debug!("{other:?}"),
            }
        }

        writeln!(self.out, "{}", outcome.trim_end()).context("failed to write session output")
    }

    fn status(&self) -> String {
        let cell = self.game.player_cell();
        format!(
            "player at ({}, {}) facing {:?}, color {:?}{}",
            cell.column(),
            cell.row(),
            self.game.facing(),
            self.game.selected_color(),
            if self.game.is_cleared() { ", cleared" } else { "" }
        )
    }

    /// Consumes the session, returning the output sink.
    pub(crate) fn into_output(self) -> W {
        self.out
    }
}

fn verdict(accepted: bool) -> String {
    let word = if accepted { "ok" } else { "rejected" };
    word.to_owned()
}
