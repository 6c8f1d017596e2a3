use crate::{Error, Input, PuzzleState, RawPuzzle};
use log::debug;
use std::collections::HashMap;

/// The puzzles currently open, by puzzle identifier. Each puzzle's state is
/// owned here and only replaced as a whole.
#[derive(Debug, Default)]
pub struct Sessions {
  puzzles: HashMap<String, PuzzleState>,
}

impl Sessions {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builds a puzzle from `raw` and stores it under `id`, replacing any puzzle
  /// previously stored there.
  pub fn load(&mut self, id: impl Into<String>, raw: RawPuzzle) -> Result<&PuzzleState, Error> {
    let id = id.into();
    let state = PuzzleState::new(raw)?;
    if self.puzzles.contains_key(&id) {
      debug!("Replacing puzzle '{}'", id);
    }
    let entry = self.puzzles.entry(id).insert_entry(state);
    Ok(entry.into_mut())
  }

  pub fn get(&self, id: &str) -> Result<&PuzzleState, Error> {
    self
      .puzzles
      .get(id)
      .ok_or_else(|| Error::PuzzleNotFound(id.to_string()))
  }

  pub fn remove(&mut self, id: &str) -> Option<PuzzleState> {
    self.puzzles.remove(id)
  }

  pub fn contains(&self, id: &str) -> bool {
    self.puzzles.contains_key(id)
  }

  pub fn len(&self) -> usize {
    self.puzzles.len()
  }

  pub fn is_empty(&self) -> bool {
    self.puzzles.is_empty()
  }

  /// Applies `input` to the puzzle stored under `id`. The stored state is only
  /// replaced if the input succeeds.
  pub fn dispatch(&mut self, id: &str, input: Input) -> Result<&PuzzleState, Error> {
    let state = self
      .puzzles
      .get_mut(id)
      .ok_or_else(|| Error::PuzzleNotFound(id.to_string()))?;
    *state = state.apply(input)?;
    Ok(state)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::clue::tests::CORNERS;

  fn raw() -> RawPuzzle {
    RawPuzzle::from_json(CORNERS).unwrap()
  }

  #[test]
  fn puzzles_are_independent() {
    let mut sessions = Sessions::new();
    sessions.load("monday", raw()).unwrap();
    sessions.load("tuesday", raw()).unwrap();
    assert_eq!(sessions.len(), 2);

    sessions.dispatch("monday", Input::Letter('S')).unwrap();
    assert_eq!(sessions.get("monday").unwrap().filled_cells(), 1);
    assert_eq!(sessions.get("tuesday").unwrap().filled_cells(), 0);
  }

  #[test]
  fn load_replaces() {
    let mut sessions = Sessions::new();
    sessions.load("monday", raw()).unwrap();
    sessions.dispatch("monday", Input::Letter('S')).unwrap();
    let state = sessions.load("monday", raw()).unwrap();
    assert_eq!(state.filled_cells(), 0);
    assert_eq!(sessions.len(), 1);
  }

  #[test]
  fn failed_input_keeps_state() {
    let mut sessions = Sessions::new();
    sessions.load("monday", raw()).unwrap();
    sessions.dispatch("monday", Input::Letter('S')).unwrap();
    assert!(sessions.dispatch("monday", Input::Letter('?')).is_err());
    let state = sessions.get("monday").unwrap();
    assert_eq!(state.filled_cells(), 1);
    assert_eq!(state.active_cell_number(), 2);
  }

  #[test]
  fn unknown_puzzle() {
    let mut sessions = Sessions::new();
    assert!(matches!(sessions.get("nope"), Err(Error::PuzzleNotFound(_))));
    assert!(matches!(
      sessions.dispatch("nope", Input::Tick),
      Err(Error::PuzzleNotFound(_))
    ));
    sessions.load("yes", raw()).unwrap();
    assert!(sessions.contains("yes"));
    assert!(sessions.remove("yes").is_some());
    assert!(sessions.is_empty());
  }
}
