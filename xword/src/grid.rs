use crate::{ByDirection, Direction, RawPuzzle};
use std::fmt::{Debug, Display};

/// For each direction, the number of the clue passing through a cell.
/// Closed cells have neither.
pub type CellClues = ByDirection<Option<u32>>;

/// One square of the grid. Cells are stored in a flat `Vec`, left to right and
/// top to bottom, so a cell's index is its linear grid position.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Cell {
  /// Whether this square is part of a clue. Closed squares never hold a letter.
  pub open: bool,
  pub answer: Option<char>,
  pub guess: Option<char>,
  pub clues: CellClues,
  /// The number printed in the corner of the square, if a clue starts here.
  pub number: Option<u32>,
  /// Set by a check or a reveal once the guess is known to be right.
  pub solved: bool,
  /// Set if the guess was ever found to be wrong.
  pub cheated: bool,
  pub revealed: bool,
}

impl Cell {
  fn closed() -> Self {
    Self::default()
  }

  fn open(answer: Option<char>) -> Self {
    Self {
      open: true,
      answer,
      ..Self::default()
    }
  }

  pub fn is_filled(&self) -> bool {
    self.guess.is_some()
  }

  /// Whether the guess matches the answer. Vacuously true for closed cells.
  pub fn is_correct(&self) -> bool {
    !self.open || self.guess == self.answer
  }

  pub fn clue(&self, direction: Direction) -> Option<u32> {
    *self.clues.get(direction)
  }
}

impl Debug for Cell {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match (self.open, self.guess) {
      (false, _) => write!(f, "■"),
      (true, None) => write!(f, " "),
      (true, Some(c)) => write!(f, "{}", c),
    }
  }
}

impl Display for Cell {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:?}", self)
  }
}

/// Creates one cell per layout marker, copying answers into the open ones.
/// Clue membership is filled in afterwards by [ClueIndex::build](crate::ClueIndex::build).
pub(crate) fn cells_from_layout(raw: &RawPuzzle) -> Vec<Cell> {
  raw
    .puzzle_data
    .layout
    .iter()
    .enumerate()
    .map(|(index, &open)| {
      if open {
        Cell::open(raw.answer_letter(index))
      } else {
        Cell::closed()
      }
    })
    .collect()
}

/// Draws the guesses in `cells` as rows of text, one line per grid row.
pub(crate) fn render_cells(cells: &[Cell], width: usize) -> String {
  let mut out = String::with_capacity(cells.len() + cells.len() / width.max(1));
  for row in cells.chunks(width.max(1)) {
    for cell in row {
      out.push_str(&cell.to_string());
    }
    out.push('\n');
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  fn raw(layout: &str, answers: &str) -> RawPuzzle {
    RawPuzzle::from_json(&format!(
      r#"{{ "puzzle_meta": {{ "width": 3 }},
           "puzzle_data": {{ "layout": {}, "answers": {}, "clues": {{}} }} }}"#,
      layout, answers
    ))
    .unwrap()
  }

  #[test]
  fn layout_to_cells() {
    let raw = raw(
      "[1, 1, 0, 1, 1, 1, 0, 1, 1]",
      r#"["a", "b", "", "c", "d", "e", "", "f", "g"]"#,
    );
    let mut cells = cells_from_layout(&raw);

    assert_eq!(cells.len(), 9);
    assert_eq!(cells.iter().filter(|c| c.open).count(), 7);
    assert_eq!(cells[0].answer, Some('A'));
    assert!(!cells[2].open);
    assert_eq!(cells[2].answer, None);
    assert!(cells[2].is_correct());
    assert!(!cells[0].is_correct());

    cells[4].guess = Some('D');
    assert!(cells[4].is_filled());
    assert!(cells[4].is_correct());

    #[rustfmt::skip]
    assert_eq!(
      render_cells(&cells, 3),
      concat!(
        "  ■\n",
        " D \n",
        "■  \n",
      )
    );
  }
}
