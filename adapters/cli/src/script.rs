use std::{error::Error, fmt, num::ParseFloatError, time::Duration};

use chroma_maze_core::{Direction, MovementColor};

/// Tick rate used by the `run` command.
pub(crate) const RUN_RATE_HZ: u32 = 60;

/// Longest span of simulated time a single `run` may cover.
pub(crate) const MAX_RUN_SECONDS: f64 = 600.0;

/// Marker that starts a comment line.
const COMMENT_MARKER: char = '#';

/// One line of host input.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ScriptCommand {
    /// Advance the simulation by a single frame of the given length.
    Tick(Duration),
    /// Advance the simulation by `frames` ticks of `1 / RUN_RATE_HZ` seconds.
    Run {
        /// Number of ticks to apply.
        frames: u32,
    },
    /// Turn the player.
    Rotate(Direction),
    /// Change the player's color.
    Color(MovementColor),
    /// Change the speed multiplier.
    Speed(f32),
    /// Change the visibility aperture.
    Angle(f32),
    /// Return to the start of the level.
    Restart,
    /// Print the current frame.
    Show,
}

impl ScriptCommand {
    /// Parses a single input line. Blank lines and `#` comments yield `None`.
    pub(crate) fn parse(line: &str) -> Result<Option<Self>, ScriptError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
            return Ok(None);
        }

        let mut words = trimmed.split_whitespace();
        let verb = words.next().unwrap_or_default();
        let argument = words.next();
        if let Some(extra) = words.next() {
            return Err(ScriptError::UnexpectedArgument(extra.to_owned()));
        }

        let command = match verb {
            "tick" => Self::Tick(parse_seconds(required(verb, argument)?)?),
            "run" => {
                let word = required(verb, argument)?;
                let seconds = parse_seconds(word)?.as_secs_f64();
                if seconds > MAX_RUN_SECONDS {
                    return Err(ScriptError::RunTooLong(word.to_owned()));
                }
                Self::Run {
                    frames: (seconds * f64::from(RUN_RATE_HZ)).round() as u32,
                }
            }
            "rotate" => Self::Rotate(parse_direction(required(verb, argument)?)?),
            "color" => Self::Color(parse_color(required(verb, argument)?)?),
            "speed" => Self::Speed(parse_number(required(verb, argument)?)?),
            "angle" => Self::Angle(parse_number(required(verb, argument)?)?),
            "restart" => no_argument(Self::Restart, argument)?,
            "show" => no_argument(Self::Show, argument)?,
            other => return Err(ScriptError::UnknownCommand(other.to_owned())),
        };

        Ok(Some(command))
    }
}

/// Errors that can occur while parsing host input.
#[derive(Debug)]
pub(crate) enum ScriptError {
    /// The first word did not name a command.
    UnknownCommand(String),
    /// The command needs an argument that was not given.
    MissingArgument(String),
    /// The line carried more words than the command accepts.
    UnexpectedArgument(String),
    /// The argument could not be parsed as a number.
    InvalidNumber(String, ParseFloatError),
    /// The duration was negative or not finite.
    InvalidDuration(String),
    /// A `run` asked for more simulated time than one command may cover.
    RunTooLong(String),
    /// The argument did not name a direction.
    UnknownDirection(String),
    /// The argument did not name a movement color.
    UnknownColor(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(verb) => write!(f, "unknown command '{verb}'"),
            Self::MissingArgument(verb) => write!(f, "command '{verb}' needs an argument"),
            Self::UnexpectedArgument(word) => write!(f, "unexpected argument '{word}'"),
            Self::InvalidNumber(word, _) => write!(f, "could not parse '{word}' as a number"),
            Self::InvalidDuration(word) => write!(f, "'{word}' is not a valid duration"),
            Self::RunTooLong(word) => {
                write!(f, "run of {word} s exceeds the {MAX_RUN_SECONDS} s limit")
            }
            Self::UnknownDirection(word) => {
                write!(f, "'{word}' is not one of north, east, south, west")
            }
            Self::UnknownColor(word) => write!(f, "'{word}' is not one of red, yellow, blue"),
        }
    }
}

impl Error for ScriptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidNumber(_, error) => Some(error),
            _ => None,
        }
    }
}

fn required<'a>(verb: &str, argument: Option<&'a str>) -> Result<&'a str, ScriptError> {
    argument.ok_or_else(|| ScriptError::MissingArgument(verb.to_owned()))
}

fn no_argument(command: ScriptCommand, argument: Option<&str>) -> Result<ScriptCommand, ScriptError> {
    match argument {
        Some(word) => Err(ScriptError::UnexpectedArgument(word.to_owned())),
        None => Ok(command),
    }
}

fn parse_number(word: &str) -> Result<f32, ScriptError> {
    word.parse::<f32>()
        .map_err(|error| ScriptError::InvalidNumber(word.to_owned(), error))
}

fn parse_seconds(word: &str) -> Result<Duration, ScriptError> {
    let seconds = word
        .parse::<f64>()
        .map_err(|error| ScriptError::InvalidNumber(word.to_owned(), error))?;
    Duration::try_from_secs_f64(seconds).map_err(|_| ScriptError::InvalidDuration(word.to_owned()))
}

fn parse_direction(word: &str) -> Result<Direction, ScriptError> {
    match word.to_ascii_lowercase().as_str() {
        "north" | "n" => Ok(Direction::North),
        "east" | "e" => Ok(Direction::East),
        "south" | "s" => Ok(Direction::South),
        "west" | "w" => Ok(Direction::West),
        _ => Err(ScriptError::UnknownDirection(word.to_owned())),
    }
}

fn parse_color(word: &str) -> Result<MovementColor, ScriptError> {
    match word.to_ascii_lowercase().as_str() {
        "red" => Ok(MovementColor::Red),
        "yellow" => Ok(MovementColor::Yellow),
        "blue" => Ok(MovementColor::Blue),
        _ => Err(ScriptError::UnknownColor(word.to_owned())),
    }
}
