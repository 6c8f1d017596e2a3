//! Check, reveal and clear, applied to a square, a word, or the whole puzzle.
//!
//! This happens in two steps: [scope_cells] works out which cells are touched,
//! then [change_cells] applies a [Transform] to just those cells.

use crate::{Cell, ClueIndex, Direction, Error, clue_range};
use log::debug;
use std::fmt::Display;

/// What to do to each cell in scope.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Transform {
  /// Marks correct guesses as solved, and wrong ones as cheated.
  Check,
  /// Fills in the answer.
  Reveal,
  /// Removes the guess, unless it's already known to be right.
  Clear,
}

impl Transform {
  /// The new state of `cell` after this transform. Closed cells are never changed.
  pub fn apply(self, cell: &Cell) -> Cell {
    if !cell.open {
      return cell.clone();
    }

    match self {
      Self::Check => Cell {
        cheated: cell.cheated || (cell.guess.is_some() && cell.guess != cell.answer),
        solved: cell.solved || cell.guess == cell.answer,
        ..cell.clone()
      },
      Self::Reveal => Cell {
        cheated: cell.cheated || cell.guess != cell.answer,
        solved: true,
        revealed: true,
        guess: cell.answer,
        ..cell.clone()
      },
      Self::Clear => Cell {
        guess: if cell.solved { cell.guess } else { None },
        ..cell.clone()
      },
    }
  }
}

impl Display for Transform {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Check => write!(f, "check"),
      Self::Reveal => write!(f, "reveal"),
      Self::Clear => write!(f, "clear"),
    }
  }
}

/// Which cells a [Transform] applies to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Scope {
  /// The active cell.
  Square,
  /// The active clue.
  Word,
  /// The cells of the active clue whose crossing clue isn't completely filled in.
  Incomplete,
  /// Every cell.
  Puzzle,
}

impl Display for Scope {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Square => write!(f, "square"),
      Self::Word => write!(f, "word"),
      Self::Incomplete => write!(f, "incomplete"),
      Self::Puzzle => write!(f, "puzzle"),
    }
  }
}

/// The indices of the cells in `scope`, in ascending order.
pub fn scope_cells(
  scope: Scope,
  cells: &[Cell],
  clues: &ClueIndex,
  width: usize,
  active_cell_number: usize,
  active_direction: Direction,
) -> Result<Vec<usize>, Error> {
  match scope {
    Scope::Square => {
      if active_cell_number >= cells.len() {
        return Err(Error::CellNotFound(active_cell_number));
      }
      Ok(vec![active_cell_number])
    }
    Scope::Word => {
      let clue = clues.clue_at(cells, active_cell_number, active_direction)?;
      Ok(clue_range(clue, active_direction, width))
    }
    Scope::Incomplete => {
      let clue = clues.clue_at(cells, active_cell_number, active_direction)?;
      let cross_direction = !active_direction;
      let mut in_scope = Vec::new();
      for cell_number in clue_range(clue, active_direction, width) {
        let cross_clue = clues.clue_at(cells, cell_number, cross_direction)?;
        let cross_filled = clue_range(cross_clue, cross_direction, width)
          .into_iter()
          .all(|n| cells.get(n).is_some_and(Cell::is_filled));
        if !cross_filled {
          in_scope.push(cell_number);
        }
      }
      Ok(in_scope)
    }
    Scope::Puzzle => Ok((0..cells.len()).collect()),
  }
}

/// A copy of `cells` with `transform` applied to the cells listed in
/// `cell_range`, which must be in ascending order. Every other cell is unchanged.
pub fn change_cells(cell_range: &[usize], cells: &[Cell], transform: Transform) -> Vec<Cell> {
  let mut targets = cell_range.iter().peekable();
  cells
    .iter()
    .enumerate()
    .map(|(cell_number, cell)| {
      if targets.next_if_eq(&&cell_number).is_some() {
        transform.apply(cell)
      } else {
        cell.clone()
      }
    })
    .collect()
}

/// Applies `transform` to the cells in `scope`, returning the new cells.
pub fn get_cell_change(
  transform: Transform,
  cells: &[Cell],
  clues: &ClueIndex,
  width: usize,
  active_cell_number: usize,
  active_direction: Direction,
  scope: Scope,
) -> Result<Vec<Cell>, Error> {
  let cell_range = scope_cells(scope, cells, clues, width, active_cell_number, active_direction)?;
  debug!("Applying {} to {} cells ({})", transform, cell_range.len(), scope);
  Ok(change_cells(&cell_range, cells, transform))
}

/// Whether every open cell holds its answer.
pub fn is_puzzle_solved(cells: &[Cell]) -> bool {
  cells.iter().all(Cell::is_correct)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Direction::{Across, Down};
  use crate::clue::tests::corners;

  fn open_cell(answer: char, guess: Option<char>) -> Cell {
    Cell {
      open: true,
      answer: Some(answer),
      guess,
      ..Cell::default()
    }
  }

  #[test]
  fn check() {
    let right = Transform::Check.apply(&open_cell('A', Some('A')));
    assert!(right.solved);
    assert!(!right.cheated);

    let wrong = Transform::Check.apply(&open_cell('A', Some('B')));
    assert!(!wrong.solved);
    assert!(wrong.cheated);
    assert_eq!(wrong.guess, Some('B'));

    let empty = Transform::Check.apply(&open_cell('A', None));
    assert!(!empty.solved);
    assert!(!empty.cheated);

    // Once cheated, always cheated.
    let mut fixed = wrong.clone();
    fixed.guess = Some('A');
    let fixed = Transform::Check.apply(&fixed);
    assert!(fixed.solved);
    assert!(fixed.cheated);
  }

  #[test]
  fn reveal() {
    for guess in [None, Some('A'), Some('Z')] {
      let cell = Transform::Reveal.apply(&open_cell('A', guess));
      assert!(cell.solved);
      assert!(cell.revealed);
      assert_eq!(cell.guess, Some('A'));
      assert_eq!(cell.cheated, guess != Some('A'));
    }
  }

  #[test]
  fn clear() {
    assert_eq!(Transform::Clear.apply(&open_cell('A', Some('B'))).guess, None);

    let mut solved = open_cell('A', Some('A'));
    solved.solved = true;
    assert_eq!(Transform::Clear.apply(&solved), solved);
  }

  #[test]
  fn closed_cells_unchanged() {
    let closed = Cell::default();
    for transform in [Transform::Check, Transform::Reveal, Transform::Clear] {
      assert_eq!(transform.apply(&closed), closed);
    }
  }

  #[test]
  fn scopes() {
    let (mut cells, clues) = corners();
    assert_eq!(scope_cells(Scope::Square, &cells, &clues, 5, 7, Across).unwrap(), vec![7]);
    assert_eq!(
      scope_cells(Scope::Word, &cells, &clues, 5, 7, Across).unwrap(),
      vec![5, 6, 7, 8, 9]
    );
    assert_eq!(
      scope_cells(Scope::Word, &cells, &clues, 5, 7, Down).unwrap(),
      vec![2, 7, 12, 17, 22]
    );
    assert_eq!(scope_cells(Scope::Puzzle, &cells, &clues, 5, 7, Down).unwrap().len(), 25);

    // Fill in 4-Down completely, and 1-Down partially.
    for n in [5, 10, 15, 1, 6] {
      cells[n].guess = cells[n].answer;
    }
    assert_eq!(
      scope_cells(Scope::Incomplete, &cells, &clues, 5, 7, Across).unwrap(),
      vec![6, 7, 8, 9]
    );

    assert!(matches!(
      scope_cells(Scope::Square, &cells, &clues, 5, 30, Across),
      Err(Error::CellNotFound(30))
    ));
    assert!(matches!(
      scope_cells(Scope::Word, &cells, &clues, 5, 0, Across),
      Err(Error::NoClue(0, Across))
    ));
  }

  #[test]
  fn change_only_touches_range() {
    let (mut cells, _) = corners();
    for cell in cells.iter_mut() {
      cell.guess = cell.answer;
    }
    let changed = change_cells(&[6, 8], &cells, Transform::Clear);
    for (n, cell) in changed.iter().enumerate() {
      if n == 6 || n == 8 {
        assert_eq!(cell.guess, None);
      } else {
        assert_eq!(cell, &cells[n]);
      }
    }
  }

  #[test]
  fn check_word() {
    let (mut cells, clues) = corners();
    // CLEAR, typed as CLEAN.
    for (n, c) in [(5, 'C'), (6, 'L'), (7, 'E'), (8, 'A'), (9, 'N')] {
      cells[n].guess = Some(c);
    }
    let checked = get_cell_change(Transform::Check, &cells, &clues, 5, 5, Across, Scope::Word).unwrap();
    for n in 5..9 {
      assert!(checked[n].solved);
      assert!(!checked[n].cheated);
    }
    assert!(!checked[9].solved);
    assert!(checked[9].cheated);
    assert_eq!(checked[9].guess, Some('N'));
    assert!(!checked[10].solved);
  }

  #[test]
  fn reveal_then_clear_puzzle() {
    let (cells, clues) = corners();
    let revealed = get_cell_change(Transform::Reveal, &cells, &clues, 5, 1, Across, Scope::Puzzle).unwrap();
    assert!(is_puzzle_solved(&revealed));
    assert!(revealed.iter().filter(|c| c.open).all(|c| c.revealed && c.cheated));

    let cleared = get_cell_change(Transform::Clear, &revealed, &clues, 5, 1, Across, Scope::Puzzle).unwrap();
    assert_eq!(cleared, revealed);
  }

  fn all_open(answers: &str) -> Vec<Cell> {
    answers.chars().map(|c| open_cell(c, Some(c))).collect()
  }

  #[test]
  fn solved_puzzle() {
    let mut cells = all_open("CLEARAIDESNEARSSPADEDELLS");
    assert_eq!(cells.len(), 25);
    assert!(is_puzzle_solved(&cells));

    cells[12].guess = Some('X');
    assert!(!is_puzzle_solved(&cells));

    cells[12].guess = None;
    assert!(!is_puzzle_solved(&cells));

    cells[12].open = false;
    assert!(is_puzzle_solved(&cells));
  }
}
