#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that walks the player forward while its color matches the path.

use chroma_maze_core::{Command, Event, PlayerSnapshot};

/// Emits a forward step whenever the player has idled long enough.
///
/// The system only decides *when* to try; the world decides whether the tile
/// ahead admits the player's color.
#[derive(Debug, Default)]
pub struct AutoAdvance {
    cleared: bool,
}

impl AutoAdvance {
    /// Creates a new auto-advance system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self { cleared: false }
    }

    /// Consumes world events and the player snapshot to emit step commands.
    pub fn handle(&mut self, events: &[Event], player: &PlayerSnapshot, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::LevelCleared { .. } => self.cleared = true,
                Event::LevelRestarted => self.cleared = false,
                _ => {}
            }
        }

        if self.cleared || player.cleared {
            return;
        }

        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        if player.moving || !player.ready_for_step || player.color.movement().is_none() {
            return;
        }

        out.push(Command::StepPlayer {
            direction: player.facing,
        });
    }
}
