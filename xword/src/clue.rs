//! The clue index: every clue of the puzzle, by direction and number, plus the
//! helpers that convert between clues and cell indices.

use crate::Direction::{Across, Down};
use crate::{ByDirection, Cell, Direction, Error, RawPuzzle};
use log::debug;
use std::collections::BTreeMap;

/// One across or down entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clue {
  pub number: u32,
  /// Index of the first cell of the clue.
  pub start: usize,
  /// Index of the last cell of the clue, inclusive.
  pub end: usize,
  pub value: String,
  /// The clue before this one in the same direction.
  pub previous: Option<u32>,
  /// The clue after this one in the same direction.
  pub next: Option<u32>,
  /// Clues referenced by this one, such as "See 17-Across".
  pub related: Option<ByDirection<Vec<u32>>>,
}

/// The clues used to wrap around when navigating past either end of a direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultClues {
  pub first: u32,
  pub last: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClueIndex {
  clues: ByDirection<BTreeMap<u32, Clue>>,
  defaults: ByDirection<DefaultClues>,
}

impl ClueIndex {
  /// Indexes the clues of `raw`, linking each clue to its neighbors in the order
  /// the document lists them, and records clue membership on `cells`.
  pub(crate) fn build(raw: &RawPuzzle, cells: &mut [Cell]) -> Self {
    let width = raw.width();
    let mut index = Self::default();

    for direction in Direction::ALL {
      let raw_clues = raw.puzzle_data.clues.get(direction);
      let mut previous: Option<u32> = None;

      for raw_clue in raw_clues {
        let mut clue = Clue {
          number: raw_clue.clue_num,
          start: raw_clue.clue_start,
          end: raw_clue.clue_end,
          value: raw_clue.value.clone(),
          previous,
          next: None,
          related: raw_clue.related.clone(),
        };

        if let Some(previous) = previous.and_then(|n| index.clues.get_mut(direction).get_mut(&n)) {
          previous.next = Some(clue.number);
        }

        for cell_number in clue_range(&clue, direction, width) {
          if let Some(cell) = cells.get_mut(cell_number) {
            *cell.clues.get_mut(direction) = Some(clue.number);
          }
        }
        if let Some(cell) = cells.get_mut(clue.start) {
          cell.number = Some(clue.number);
        }

        previous = Some(clue.number);
        clue.related = clue.related.filter(|r| !r.across.is_empty() || !r.down.is_empty());
        index.clues.get_mut(direction).insert(clue.number, clue);
      }

      if let (Some(first), Some(last)) = (raw_clues.first(), raw_clues.last()) {
        *index.defaults.get_mut(direction) = DefaultClues {
          first: first.clue_num,
          last: last.clue_num,
        };
      }

      debug!("Indexed {} {} clues", raw_clues.len(), direction);
    }

    index
  }

  /// Looks up a clue by direction and number.
  pub fn get(&self, direction: Direction, number: u32) -> Result<&Clue, Error> {
    self
      .clues
      .get(direction)
      .get(&number)
      .ok_or(Error::ClueNotFound(direction, number))
  }

  /// The clue in `direction` that passes through the cell at `cell_number`.
  pub fn clue_at(&self, cells: &[Cell], cell_number: usize, direction: Direction) -> Result<&Clue, Error> {
    let cell = cells.get(cell_number).ok_or(Error::CellNotFound(cell_number))?;
    let number = cell.clue(direction).ok_or(Error::NoClue(cell_number, direction))?;
    self.get(direction, number)
  }

  /// All the clues in one direction, ordered by number.
  pub fn iter(&self, direction: Direction) -> impl Iterator<Item = &Clue> {
    self.clues.get(direction).values()
  }

  /// The total number of clues, in both directions.
  pub fn len(&self) -> usize {
    self.clues.across.len() + self.clues.down.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn defaults(&self, direction: Direction) -> DefaultClues {
    *self.defaults.get(direction)
  }

  /// The clue after (or before) `clue` in `direction`. Past the end of a direction
  /// this wraps to the first (or last) clue of the other direction.
  pub(crate) fn adjacent(&self, clue: &Clue, direction: Direction, forward: bool) -> Result<(&Clue, Direction), Error> {
    let neighbor = if forward { clue.next } else { clue.previous };
    match neighbor {
      Some(number) => Ok((self.get(direction, number)?, direction)),
      None => {
        let other = !direction;
        let defaults = self.defaults(other);
        let number = if forward { defaults.first } else { defaults.last };
        Ok((self.get(other, number)?, other))
      }
    }
  }
}

/// The distance between two consecutive cells of a clue: 1 for across, the grid
/// width for down. Negative when moving backwards.
pub fn step_size(direction: Direction, width: usize, forward: bool) -> isize {
  let step = match direction {
    Across => 1,
    Down => width as isize,
  };
  if forward { step } else { -step }
}

/// The cell indices covered by `clue`, from its first cell to its last.
pub fn clue_range(clue: &Clue, direction: Direction, width: usize) -> Vec<usize> {
  let step = step_size(direction, width, true).unsigned_abs().max(1);
  (clue.start..=clue.end).step_by(step).collect()
}

/// Whether the cell at `cell_number` is part of `clue`.
pub fn cell_number_in_clue(cell_number: usize, clue: &Clue, direction: Direction, width: usize) -> bool {
  let in_range = clue.start <= cell_number && cell_number <= clue.end;
  match direction {
    Across => in_range,
    Down => in_range && (cell_number - clue.start) % width.max(1) == 0,
  }
}

/// Whether the cell at `cell_number` belongs to any clue that `active_clue` refers to.
pub fn get_any_related(cell_number: usize, active_clue: &Clue, clues: &ClueIndex, width: usize) -> Result<bool, Error> {
  let Some(related) = &active_clue.related else {
    return Ok(false);
  };

  for direction in Direction::ALL {
    for &number in related.get(direction) {
      let clue = clues.get(direction, number)?;
      if cell_number_in_clue(cell_number, clue, direction, width) {
        return Ok(true);
      }
    }
  }

  Ok(false)
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use crate::grid::cells_from_layout;

  /// A 5x5 grid with the four corners closed:
  ///
  /// ```text
  /// ■123■
  /// 4   5
  /// 6
  /// 7
  /// ■8  ■
  /// ```
  pub(crate) const CORNERS: &str = r#"{
    "puzzle_meta": { "width": 5, "height": 5, "title": "Corners", "author": "Test" },
    "puzzle_data": {
      "layout": [0,1,1,1,0, 1,1,1,1,1, 1,1,1,1,1, 1,1,1,1,1, 0,1,1,1,0],
      "answers": ["","S","P","A","",
                  "C","L","E","A","R",
                  "A","I","D","E","S",
                  "N","E","A","R","S",
                  "","D","L","S",""],
      "clues": {
        "A": [
          { "clueNum": 1, "clueStart": 1, "clueEnd": 3, "value": "Resort with hot tubs" },
          { "clueNum": 4, "clueStart": 5, "clueEnd": 9, "value": "Transparent", "related": { "D": [5] } },
          { "clueNum": 6, "clueStart": 10, "clueEnd": 14, "value": "Assistants" },
          { "clueNum": 7, "clueStart": 15, "clueEnd": 19, "value": "Approaches" },
          { "clueNum": 8, "clueStart": 21, "clueEnd": 23, "value": "Downloadable items, briefly" }
        ],
        "D": [
          { "clueNum": 1, "clueStart": 1, "clueEnd": 21, "value": "Moved smoothly" },
          { "clueNum": 2, "clueStart": 2, "clueEnd": 22, "value": "Smartphone guts" },
          { "clueNum": 3, "clueStart": 3, "clueEnd": 23, "value": "Greek god of war, plural" },
          { "clueNum": 4, "clueStart": 5, "clueEnd": 15, "value": "Tin" },
          { "clueNum": 5, "clueStart": 9, "clueEnd": 19, "value": "Polls" }
        ]
      }
    }
  }"#;

  pub(crate) fn corners() -> (Vec<Cell>, ClueIndex) {
    let raw = RawPuzzle::from_json(CORNERS).unwrap();
    raw.validate().unwrap();
    let mut cells = cells_from_layout(&raw);
    let index = ClueIndex::build(&raw, &mut cells);
    (cells, index)
  }

  #[test]
  fn build_links_clues() {
    let (_, index) = corners();
    assert_eq!(index.len(), 10);

    let one_across = index.get(Across, 1).unwrap();
    assert_eq!(one_across.previous, None);
    assert_eq!(one_across.next, Some(4));
    let eight_across = index.get(Across, 8).unwrap();
    assert_eq!(eight_across.previous, Some(7));
    assert_eq!(eight_across.next, None);

    assert_eq!(index.defaults(Across), DefaultClues { first: 1, last: 8 });
    assert_eq!(index.defaults(Down), DefaultClues { first: 1, last: 5 });
    assert!(matches!(index.get(Down, 6), Err(Error::ClueNotFound(Down, 6))));
  }

  #[test]
  fn build_stamps_cells() {
    let (cells, index) = corners();
    assert_eq!(cells[0].clue(Across), None);
    assert_eq!(cells[7].clue(Across), Some(4));
    assert_eq!(cells[7].clue(Down), Some(2));
    assert_eq!(cells[9].number, Some(5));
    assert_eq!(cells[8].number, None);
    assert_eq!(index.clue_at(&cells, 16, Down).unwrap().number, 1);
    assert!(matches!(index.clue_at(&cells, 0, Down), Err(Error::NoClue(0, Down))));
    assert!(matches!(index.clue_at(&cells, 25, Down), Err(Error::CellNotFound(25))));
  }

  #[test]
  fn every_open_cell_in_one_clue_per_direction() {
    let (cells, index) = corners();
    for (cell_number, cell) in cells.iter().enumerate() {
      for direction in Direction::ALL {
        let count = index
          .iter(direction)
          .filter(|clue| cell_number_in_clue(cell_number, clue, direction, 5))
          .count();
        assert_eq!(count, if cell.open { 1 } else { 0 }, "cell {} {}", cell_number, direction);
      }
    }
  }

  #[test]
  fn ranges() {
    let (_, index) = corners();
    let one_down = index.get(Down, 1).unwrap();
    assert_eq!(clue_range(one_down, Down, 5), vec![1, 6, 11, 16, 21]);
    let four_across = index.get(Across, 4).unwrap();
    assert_eq!(clue_range(four_across, Across, 5), vec![5, 6, 7, 8, 9]);

    for direction in Direction::ALL {
      for clue in index.iter(direction) {
        let range = clue_range(clue, direction, 5);
        let step = step_size(direction, 5, true) as usize;
        assert_eq!(range.first(), Some(&clue.start));
        assert_eq!(range.last(), Some(&clue.end));
        assert_eq!(range.len(), (clue.end - clue.start) / step + 1);
      }
    }
  }

  #[test]
  fn step_sizes() {
    assert_eq!(step_size(Across, 15, true), 1);
    assert_eq!(step_size(Across, 15, false), -1);
    assert_eq!(step_size(Down, 15, true), 15);
    assert_eq!(step_size(Down, 15, false), -15);
  }

  #[test]
  fn down_membership_needs_same_column() {
    let (_, index) = corners();
    let two_down = index.get(Down, 2).unwrap();
    assert!(cell_number_in_clue(12, two_down, Down, 5));
    // Between start and end, but in another column.
    assert!(!cell_number_in_clue(13, two_down, Down, 5));
  }

  #[test]
  fn related_cells() {
    let (_, index) = corners();
    let four_across = index.get(Across, 4).unwrap();
    assert!(get_any_related(14, four_across, &index, 5).unwrap());
    assert!(!get_any_related(13, four_across, &index, 5).unwrap());

    let one_across = index.get(Across, 1).unwrap();
    assert!(!get_any_related(9, one_across, &index, 5).unwrap());
  }

  #[test]
  fn adjacent_wraps_direction() {
    let (_, index) = corners();
    let eight_across = index.get(Across, 8).unwrap();
    let (next, direction) = index.adjacent(eight_across, Across, true).unwrap();
    assert_eq!((next.number, direction), (1, Down));

    let one_across = index.get(Across, 1).unwrap();
    let (previous, direction) = index.adjacent(one_across, Across, false).unwrap();
    assert_eq!((previous.number, direction), (5, Down));
  }
}
