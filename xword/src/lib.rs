//! This crate is meant to be used as the engine of a crossword puzzle app.
//! It provides no UI itself, but see `xwordtui` for an example of how you can use it
//! to produce a crossword app.
//!
//! Puzzles are loaded from JSON documents (see [RawPuzzle]). Once loaded, a
//! [PuzzleState] tracks the cursor and every guess, and each keyboard or mouse
//! [Input] produces a new state through [PuzzleState::apply].

use Direction::{Across, Down};
use serde::Deserialize;
use std::fmt::Display;
use std::ops::Not;

mod clue;
mod grid;
mod mutation;
mod navigation;
mod payload;
mod session;
mod state;

pub use clue::{Clue, ClueIndex, DefaultClues, cell_number_in_clue, clue_range, get_any_related, step_size};
pub use grid::{Cell, CellClues};
pub use mutation::{Scope, Transform, change_cells, get_cell_change, is_puzzle_solved, scope_cells};
pub use navigation::{
  Move, Placement, get_cell_click, get_click_clue_number, get_guess_cell_number,
  get_move_cell_number, get_move_clue_number, get_remove_guess_cell_number,
};
pub use payload::{PuzzleData, PuzzleMeta, RawClue, RawPuzzle};
pub use session::Sessions;
pub use state::{Input, PuzzleState};

/// The two crossword directions: `Across` and `Down`
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, PartialOrd, Ord)]
pub enum Direction {
  Across,
  Down,
}

impl Direction {
  /// Both directions, across first.
  pub const ALL: [Direction; 2] = [Across, Down];

  /// The single-letter abbreviation used in clue labels, e.g. the "A" in "12A".
  pub fn letter(self) -> char {
    match self {
      Across => 'A',
      Down => 'D',
    }
  }
}

impl Not for Direction {
  type Output = Self;
  fn not(self) -> Self {
    match self {
      Across => Down,
      Down => Across,
    }
  }
}

impl Display for Direction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Across => write!(f, "Across"),
      Down => write!(f, "Down"),
    }
  }
}

/// A pair of values, one per [Direction]. Puzzle documents key these by the
/// direction letters `"A"` and `"D"`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct ByDirection<T> {
  #[serde(rename = "A", alias = "across", default)]
  pub across: T,
  #[serde(rename = "D", alias = "down", default)]
  pub down: T,
}

impl<T> ByDirection<T> {
  pub fn get(&self, direction: Direction) -> &T {
    match direction {
      Across => &self.across,
      Down => &self.down,
    }
  }

  pub fn get_mut(&mut self, direction: Direction) -> &mut T {
    match direction {
      Across => &mut self.across,
      Down => &mut self.down,
    }
  }
}

/// The errors that may be produced by functions in this crate.
#[derive(Debug)]
pub enum Error {
  /// An [I/O error](std::io::Error) occurred.
  IoError(std::io::Error),
  /// The puzzle document is not valid JSON, or doesn't have the expected shape.
  JsonError(serde_json::Error),
  /// The puzzle document parsed, but breaks one of the structural rules of a
  /// crossword grid (for instance a clue that runs over a closed cell).
  Malformed(String),
  /// No cell exists at the given index.
  CellNotFound(usize),
  /// The cell exists, but isn't part of any clue in the given direction.
  NoClue(usize, Direction),
  /// No clue with the given number exists in the given direction.
  ClueNotFound(Direction, u32),
  /// No puzzle is loaded under the given identifier.
  PuzzleNotFound(String),
  /// The input can't be applied, e.g. a guess that isn't a letter.
  InvalidInput(String),
}

impl Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::IoError(e) => write!(f, "I/O error: {}", e),
      Self::JsonError(e) => write!(f, "invalid puzzle document: {}", e),
      Self::Malformed(msg) => write!(f, "malformed puzzle: {}", msg),
      Self::CellNotFound(n) => write!(f, "no cell at index {}", n),
      Self::NoClue(n, direction) => write!(f, "cell {} has no {} clue", n, direction),
      Self::ClueNotFound(direction, n) => write!(f, "no clue {}{}", n, direction.letter()),
      Self::PuzzleNotFound(id) => write!(f, "no puzzle loaded with id '{}'", id),
      Self::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
    }
  }
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::IoError(e) => Some(e),
      Self::JsonError(e) => Some(e),
      _ => None,
    }
  }
}

impl From<std::io::Error> for Error {
  fn from(e: std::io::Error) -> Self {
    Self::IoError(e)
  }
}

impl From<serde_json::Error> for Error {
  fn from(e: serde_json::Error) -> Self {
    Self::JsonError(e)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn direction_not() {
    assert_eq!(!Across, Down);
    assert_eq!(!Down, Across);
    assert_eq!(!!Across, Across);
  }

  #[test]
  fn by_direction_keys() {
    let pair: ByDirection<Vec<u32>> = serde_json::from_str(r#"{"A": [1, 4], "down": [2]}"#).unwrap();
    assert_eq!(pair.get(Across), &vec![1, 4]);
    assert_eq!(pair.get(Down), &vec![2]);

    let missing: ByDirection<Vec<u32>> = serde_json::from_str(r#"{"D": [3]}"#).unwrap();
    assert!(missing.get(Across).is_empty());
  }

  #[test]
  fn error_display() {
    assert_eq!(Error::ClueNotFound(Down, 12).to_string(), "no clue 12D");
    assert_eq!(Error::CellNotFound(30).to_string(), "no cell at index 30");
    assert_eq!(Error::NoClue(0, Across).to_string(), "cell 0 has no Across clue");
  }
}
