use crate::Direction::Across;
use crate::grid::{cells_from_layout, render_cells};
use crate::navigation::Placement;
use crate::{
  Cell, Clue, ClueIndex, Direction, Error, Move, PuzzleMeta, RawPuzzle, Scope, Transform, cell_number_in_clue,
  get_any_related, get_cell_change, get_cell_click, get_click_clue_number, get_guess_cell_number,
  get_move_cell_number, get_move_clue_number, get_remove_guess_cell_number, is_puzzle_solved,
};
use log::{debug, info, trace};
use std::fmt::Display;

/// Something the player did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Input {
  /// Typed a letter into the active cell.
  Letter(char),
  Backspace,
  Arrow(Move),
  /// Tab or Enter, or with Shift held, `forward: false`.
  NextClue { forward: bool },
  /// Clicked the cell at the given index.
  CellClick(usize),
  /// Clicked a clue in the clue list.
  ClueClick(Direction, u32),
  /// Picked check, reveal or clear from the toolbar.
  Scoped(Transform, Scope),
  /// Starts the puzzle over, including the timer.
  Reset,
  /// One second has passed.
  Tick,
}

/// A crossword puzzle being solved: the grid, its clues, every guess so far, and
/// the cursor. When implementing a crossword app, this will be the main
/// structure you will use.
///
/// Nothing here mutates in place. [apply](Self::apply) returns the next state,
/// which the caller installs before handling the next input.
#[derive(Debug, Clone)]
pub struct PuzzleState {
  cells: Vec<Cell>,
  width: usize,
  clues: ClueIndex,
  meta: PuzzleMeta,
  cursor: Placement,
  available_cells: usize,
  filled_cells: usize,
  timer: u64,
  solved: bool,
}

impl PuzzleState {
  /// Validates `raw` and builds the grid and clue index from it. The cursor
  /// starts on the first across clue.
  pub fn new(raw: RawPuzzle) -> Result<Self, Error> {
    raw.validate()?;

    let mut cells = cells_from_layout(&raw);
    let clues = ClueIndex::build(&raw, &mut cells);
    let first = clues.get(Across, clues.defaults(Across).first)?.start;

    let mut state = Self {
      width: raw.width(),
      available_cells: cells.iter().filter(|c| c.open).count(),
      cells,
      clues,
      meta: raw.puzzle_meta,
      cursor: Placement::new(first, Across),
      filled_cells: 0,
      timer: 0,
      solved: false,
    };
    state.refresh();

    debug!(
      "Loaded puzzle '{}': {}x{}, {} open cells, {} clues",
      state.title(),
      state.width,
      state.height(),
      state.available_cells,
      state.clues.len()
    );
    Ok(state)
  }

  /// Parses, validates and builds a puzzle from a JSON puzzle document.
  pub fn from_json(json: &str) -> Result<Self, Error> {
    Self::new(RawPuzzle::from_json(json)?)
  }

  /// Returns the state that results from `input`.
  pub fn apply(&self, input: Input) -> Result<Self, Error> {
    trace!("Applying {:?} at {:?}", input, self.cursor);

    let mut next = self.clone();
    let Placement {
      cell_number: active,
      direction,
    } = self.cursor;

    match input {
      Input::Letter(letter) => {
        if !letter.is_ascii_alphabetic() {
          return Err(Error::InvalidInput(format!("'{}' is not a letter", letter)));
        }
        let cell = next.cell_mut(active)?;
        if !cell.solved {
          cell.guess = Some(letter.to_ascii_uppercase());
        }
        next.cursor.cell_number = get_guess_cell_number(active, direction, &next.cells, &next.clues, next.width)?;
      }
      Input::Backspace => {
        let target = get_remove_guess_cell_number(active, direction, &next.cells, &next.clues, next.width)?;
        let cell = next.cell_mut(target)?;
        if !cell.solved {
          cell.guess = None;
        }
        next.cursor.cell_number = target;
      }
      Input::Arrow(arrow) => {
        next.cursor = get_move_cell_number(active, direction, &next.cells, next.width, arrow)?;
      }
      Input::NextClue { forward } => {
        next.cursor = get_move_clue_number(active, direction, &next.cells, &next.clues, next.width, forward)?;
      }
      Input::CellClick(cell_number) => {
        next.cursor = get_cell_click(active, direction, &next.cells, cell_number)?;
      }
      Input::ClueClick(clue_direction, clue_number) => {
        let cell_number = get_click_clue_number(&next.cells, &next.clues, next.width, clue_direction, clue_number)?;
        next.cursor = Placement::new(cell_number, clue_direction);
      }
      Input::Scoped(transform, scope) => {
        next.cells = get_cell_change(transform, &next.cells, &next.clues, next.width, active, direction, scope)?;
      }
      Input::Reset => {
        for cell in next.cells.iter_mut().filter(|c| c.open) {
          *cell = Cell {
            guess: None,
            solved: false,
            cheated: false,
            revealed: false,
            ..cell.clone()
          };
        }
        let first = next.clues.get(Across, next.clues.defaults(Across).first)?.start;
        next.cursor = Placement::new(first, Across);
        next.timer = 0;
        debug!("Reset puzzle '{}'", next.title());
      }
      Input::Tick => {
        if !next.solved {
          next.timer += 1;
        }
      }
    }

    next.refresh();
    if next.solved && !self.solved {
      info!("Puzzle '{}' solved in {}s", next.title(), next.timer);
    }
    Ok(next)
  }

  /// Recomputes the counters derived from the cells.
  fn refresh(&mut self) {
    self.filled_cells = self.cells.iter().filter(|c| c.open && c.is_filled()).count();
    self.solved = is_puzzle_solved(&self.cells);
  }

  fn cell_mut(&mut self, cell_number: usize) -> Result<&mut Cell, Error> {
    self.cells.get_mut(cell_number).ok_or(Error::CellNotFound(cell_number))
  }

  pub fn cells(&self) -> &[Cell] {
    &self.cells
  }

  pub fn cell(&self, cell_number: usize) -> Result<&Cell, Error> {
    self.cells.get(cell_number).ok_or(Error::CellNotFound(cell_number))
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn height(&self) -> usize {
    self.cells.len() / self.width
  }

  pub fn clues(&self) -> &ClueIndex {
    &self.clues
  }

  pub fn meta(&self) -> &PuzzleMeta {
    &self.meta
  }

  pub fn title(&self) -> &str {
    self.meta.title.as_deref().unwrap_or("")
  }

  pub fn author(&self) -> &str {
    self.meta.author.as_deref().unwrap_or("")
  }

  pub fn active_cell_number(&self) -> usize {
    self.cursor.cell_number
  }

  pub fn active_direction(&self) -> Direction {
    self.cursor.direction
  }

  pub fn active_cell(&self) -> Result<&Cell, Error> {
    self.cell(self.cursor.cell_number)
  }

  /// The clue the cursor is in.
  pub fn active_clue(&self) -> Result<&Clue, Error> {
    self
      .clues
      .clue_at(&self.cells, self.cursor.cell_number, self.cursor.direction)
  }

  /// Whether the cell at `cell_number` is part of the clue the cursor is in.
  pub fn in_active_clue(&self, cell_number: usize) -> Result<bool, Error> {
    let clue = self.active_clue()?;
    Ok(cell_number_in_clue(cell_number, clue, self.cursor.direction, self.width))
  }

  /// Whether the cell at `cell_number` is part of a clue the active clue refers to.
  pub fn is_related(&self, cell_number: usize) -> Result<bool, Error> {
    get_any_related(cell_number, self.active_clue()?, &self.clues, self.width)
  }

  /// The number of open cells.
  pub fn available_cells(&self) -> usize {
    self.available_cells
  }

  /// The number of open cells holding a guess.
  pub fn filled_cells(&self) -> usize {
    self.filled_cells
  }

  /// Whether every open cell has a guess, right or wrong.
  pub fn is_filled(&self) -> bool {
    self.filled_cells == self.available_cells
  }

  pub fn is_solved(&self) -> bool {
    self.solved
  }

  /// Seconds spent on this puzzle.
  pub fn timer(&self) -> u64 {
    self.timer
  }
}

impl Display for PuzzleState {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", render_cells(&self.cells, self.width))
  }
}
