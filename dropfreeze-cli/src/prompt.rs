//! Line-oriented operator input.
//!
//! The key letters mirror the original keyboard bindings: `a`/`s` step
//! back and forward, `p`/`l` add and remove a tallied freeze.

use dropfreeze_core::{Command, PixelPoint};
use std::path::PathBuf;
use thiserror::Error;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// A command for the session.
    Edit(Command),
    /// Redraw the current frame.
    View,
    /// Finalize and write the table, optionally to another file.
    Done(Option<PathBuf>),
    /// Abandon the session without writing anything.
    Quit,
    /// Show the command list.
    Help,
    /// Blank line.
    Empty,
}

/// Reasons an input line is rejected.
#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("click needs two coordinates: click X Y")]
    MissingCoordinates,

    #[error("not a pixel coordinate: '{0}'")]
    BadCoordinate(String),
}

/// Command summary shown by `help`.
pub const USAGE: &str = "\
commands:
  click X Y | c X Y   mark or unmark a frozen droplet at pixel (X, Y)
  next | s            next frame
  prev | a            previous frame
  inc | p             add one freeze to this frame's tally
  dec | l             remove one freeze from this frame's tally
  view                show the current frame again
  done [FILE]         write the fraction-frozen table and exit
  quit                exit without writing anything";

/// Parses one line of operator input.
///
/// # Errors
/// Returns an `InputError` for unknown words and malformed clicks.
pub fn parse_line(line: &str) -> Result<Input, InputError> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(Input::Empty);
    };

    let input = match word.to_ascii_lowercase().as_str() {
        "click" | "c" => {
            let x = coordinate(words.next())?;
            let y = coordinate(words.next())?;
            Input::Edit(Command::Click(PixelPoint::new(x, y)))
        }
        "next" | "s" => Input::Edit(Command::Next),
        "prev" | "a" => Input::Edit(Command::Previous),
        "inc" | "p" => Input::Edit(Command::IncrementTally),
        "dec" | "l" => Input::Edit(Command::DecrementTally),
        "view" => Input::View,
        "done" => Input::Done(words.next().map(PathBuf::from)),
        "quit" | "q" => Input::Quit,
        "help" | "?" => Input::Help,
        _ => return Err(InputError::Unknown(word.to_string())),
    };
    Ok(input)
}

fn coordinate(word: Option<&str>) -> Result<f64, InputError> {
    let word = word.ok_or(InputError::MissingCoordinates)?;
    match word.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputError::BadCoordinate(word.to_string())),
    }
}
