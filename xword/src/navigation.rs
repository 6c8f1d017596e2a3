//! Cursor movement. Every function here is pure: it takes the current cursor
//! and grid, and returns where the cursor should go next.

use crate::Direction::{Across, Down};
use crate::{Cell, ClueIndex, Direction, Error, clue_range, step_size};

/// An arrow key.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Move {
  Left,
  Right,
  Up,
  Down,
}

impl Move {
  fn is_lateral(self) -> bool {
    matches!(self, Move::Left | Move::Right)
  }

  fn is_positive(self) -> bool {
    matches!(self, Move::Right | Move::Down)
  }
}

/// Where the cursor is: the active cell, and the direction of the word being entered.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Placement {
  pub cell_number: usize,
  pub direction: Direction,
}

impl Placement {
  pub fn new(cell_number: usize, direction: Direction) -> Self {
    Self {
      cell_number,
      direction,
    }
  }
}

fn cell(cells: &[Cell], cell_number: usize) -> Result<&Cell, Error> {
  cells.get(cell_number).ok_or(Error::CellNotFound(cell_number))
}

fn check_width(width: usize) -> Result<(), Error> {
  if width == 0 {
    return Err(Error::InvalidInput("grid width must be positive".to_string()));
  }
  Ok(())
}

/// The first open cell without a guess among `candidates`.
fn first_empty(cells: &[Cell], candidates: impl IntoIterator<Item = usize>) -> Option<usize> {
  candidates
    .into_iter()
    .find(|&i| cells.get(i).is_some_and(|c| c.open && !c.is_filled()))
}

/// Handles an arrow key.
///
/// An arrow perpendicular to the current direction only swaps the direction.
/// Otherwise the cursor jumps to the next open cell in the row (or column),
/// skipping closed cells, and stays put if there is none.
pub fn get_move_cell_number(
  active_cell_number: usize,
  active_direction: Direction,
  cells: &[Cell],
  width: usize,
  arrow: Move,
) -> Result<Placement, Error> {
  check_width(width)?;
  cell(cells, active_cell_number)?;

  match (active_direction, arrow.is_lateral()) {
    (Across, false) => return Ok(Placement::new(active_cell_number, Down)),
    (Down, true) => return Ok(Placement::new(active_cell_number, Across)),
    _ => {}
  }

  let step = step_size(active_direction, width, arrow.is_positive());
  let rows = cells.len() / width;
  let col = active_cell_number % width;
  let (first, last) = match active_direction {
    Across => {
      let row_start = active_cell_number - col;
      (row_start, row_start + width - 1)
    }
    Down => (col, col + width * rows.saturating_sub(1)),
  };

  let mut i = active_cell_number.checked_add_signed(step);
  while let Some(n) = i.filter(|&n| first <= n && n <= last) {
    if cell(cells, n)?.open {
      return Ok(Placement::new(n, active_direction));
    }
    i = n.checked_add_signed(step);
  }

  Ok(Placement::new(active_cell_number, active_direction))
}

/// Where the cursor goes after a letter is typed into the active cell.
///
/// The cursor moves to the next empty cell of the active clue, looping back to
/// the start of the clue if needed. In the last cell of a clue it stays put.
pub fn get_guess_cell_number(
  active_cell_number: usize,
  active_direction: Direction,
  cells: &[Cell],
  clues: &ClueIndex,
  width: usize,
) -> Result<usize, Error> {
  check_width(width)?;
  let active_clue = clues.clue_at(cells, active_cell_number, active_direction)?;
  let step = step_size(active_direction, width, true).unsigned_abs();

  if active_cell_number == active_clue.end {
    return Ok(active_cell_number);
  }

  // Always inside the clue, since we're not on its last cell.
  let next_cell_number = active_cell_number + step;

  if cell(cells, active_cell_number)?.solved {
    return Ok(next_cell_number);
  }

  if let Some(n) = first_empty(cells, (next_cell_number..=active_clue.end).step_by(step)) {
    return Ok(n);
  }

  if let Some(n) = first_empty(cells, (active_clue.start..active_cell_number).step_by(step)) {
    return Ok(n);
  }

  Ok(next_cell_number)
}

/// The cell whose guess a backspace removes, which is also where the cursor ends up.
///
/// That's the active cell if it holds an unchecked guess, or otherwise the cell
/// before it, without leaving the active clue.
pub fn get_remove_guess_cell_number(
  active_cell_number: usize,
  active_direction: Direction,
  cells: &[Cell],
  clues: &ClueIndex,
  width: usize,
) -> Result<usize, Error> {
  check_width(width)?;
  let active_cell = cell(cells, active_cell_number)?;
  let active_clue = clues.clue_at(cells, active_cell_number, active_direction)?;

  if active_cell.is_filled() && !active_cell.solved {
    return Ok(active_cell_number);
  }

  let previous = active_cell_number
    .checked_add_signed(step_size(active_direction, width, false))
    .filter(|&n| n >= active_clue.start);
  Ok(previous.unwrap_or(active_clue.start))
}

/// Handles Tab/Enter (`forward`) and Shift-Tab/Shift-Enter.
///
/// Moves to the first empty cell of the next clue that has one, wrapping from
/// the last across clue to the first down clue and vice versa. Once the grid is
/// full, simply moves to the start of the next clue.
pub fn get_move_clue_number(
  active_cell_number: usize,
  active_direction: Direction,
  cells: &[Cell],
  clues: &ClueIndex,
  width: usize,
  forward: bool,
) -> Result<Placement, Error> {
  check_width(width)?;
  let active_clue = clues.clue_at(cells, active_cell_number, active_direction)?;

  let (mut clue, mut direction) = clues.adjacent(active_clue, active_direction, forward)?;
  for _ in 0..clues.len().saturating_sub(1) {
    if let Some(n) = first_empty(cells, clue_range(clue, direction, width)) {
      return Ok(Placement::new(n, direction));
    }
    (clue, direction) = clues.adjacent(clue, direction, forward)?;
  }

  let (clue, direction) = clues.adjacent(active_clue, active_direction, forward)?;
  Ok(Placement::new(clue.start, direction))
}

/// Where the cursor goes when a clue is clicked in the clue list: its first
/// empty cell, or its first cell if it's full.
pub fn get_click_clue_number(
  cells: &[Cell],
  clues: &ClueIndex,
  width: usize,
  direction: Direction,
  clue_number: u32,
) -> Result<usize, Error> {
  check_width(width)?;
  let clue = clues.get(direction, clue_number)?;
  Ok(first_empty(cells, clue_range(clue, direction, width)).unwrap_or(clue.start))
}

/// Handles a click on a cell of the grid.
///
/// Clicking the active cell swaps the direction, clicking another open cell
/// moves there, and clicks on closed cells are ignored.
pub fn get_cell_click(
  active_cell_number: usize,
  active_direction: Direction,
  cells: &[Cell],
  cell_number: usize,
) -> Result<Placement, Error> {
  let clicked = cell(cells, cell_number)?;
  if !clicked.open {
    return Ok(Placement::new(active_cell_number, active_direction));
  }

  let direction = if cell_number == active_cell_number {
    !active_direction
  } else {
    active_direction
  };

  // Fall back to the other direction if the cell isn't part of a clue in this one.
  let direction = if clicked.clue(direction).is_some() {
    direction
  } else {
    !direction
  };

  Ok(Placement::new(cell_number, direction))
}
