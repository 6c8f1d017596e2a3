//! Decoding of puzzle documents, as served by the puzzle store.
//!
//! A document looks like
//! `{ "puzzle_meta": { "width": 5, ... }, "puzzle_data": { "layout": [...], "answers": [...], "clues": { "A": [...], "D": [...] } } }`.

use crate::Direction::{Across, Down};
use crate::{ByDirection, Direction, Error};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;

/// A puzzle exactly as it appears in a puzzle document.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPuzzle {
  pub puzzle_meta: PuzzleMeta,
  pub puzzle_data: PuzzleData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleMeta {
  pub width: usize,
  #[serde(default)]
  pub height: Option<usize>,
  #[serde(default)]
  pub publish_type: Option<String>,
  #[serde(default)]
  pub daily_date: Option<String>,
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub author: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PuzzleData {
  /// One marker per square, left to right and top to bottom. `true` for open squares.
  #[serde(deserialize_with = "deserialize_layout")]
  pub layout: Vec<bool>,
  /// The solution letter of each square, parallel to `layout`.
  pub answers: Vec<Option<String>>,
  pub clues: ByDirection<Vec<RawClue>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClue {
  pub clue_num: u32,
  pub clue_start: usize,
  pub clue_end: usize,
  #[serde(default)]
  pub value: String,
  #[serde(default)]
  pub related: Option<ByDirection<Vec<u32>>>,
}

/// Layouts in the wild use either booleans or 0/1.
#[derive(Deserialize)]
#[serde(untagged)]
enum LayoutMarker {
  Flag(bool),
  Number(i64),
}

fn deserialize_layout<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<bool>, D::Error> {
  let markers = Vec::<LayoutMarker>::deserialize(deserializer)?;
  Ok(
    markers
      .into_iter()
      .map(|marker| match marker {
        LayoutMarker::Flag(open) => open,
        LayoutMarker::Number(n) => n != 0,
      })
      .collect(),
  )
}

impl RawPuzzle {
  pub fn from_json(json: &str) -> Result<Self, Error> {
    Ok(serde_json::from_str(json)?)
  }

  pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
    Ok(serde_json::from_slice(bytes)?)
  }

  pub fn width(&self) -> usize {
    self.puzzle_meta.width
  }

  pub fn title(&self) -> &str {
    self.puzzle_meta.title.as_deref().unwrap_or("")
  }

  pub fn author(&self) -> &str {
    self.puzzle_meta.author.as_deref().unwrap_or("")
  }

  /// The solution letter of the square at `index`, uppercased, if it has one.
  pub(crate) fn answer_letter(&self, index: usize) -> Option<char> {
    let answer = self.puzzle_data.answers.get(index)?.as_deref()?;
    let mut chars = answer.chars();
    match (chars.next(), chars.next()) {
      (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase()),
      _ => None,
    }
  }

  /// Checks the structural rules every puzzle must follow before it can be
  /// handed to the engine. The engine itself assumes these hold.
  pub fn validate(&self) -> Result<(), Error> {
    let width = self.width();
    let layout = &self.puzzle_data.layout;

    if width == 0 {
      return malformed("width must be positive".to_string());
    }
    if layout.is_empty() || layout.len() % width != 0 {
      return malformed(format!(
        "layout has {} squares, which is not a whole number of rows of width {}",
        layout.len(),
        width
      ));
    }
    let rows = layout.len() / width;
    if let Some(height) = self.puzzle_meta.height {
      if height != rows {
        return malformed(format!("height is {} but layout has {} rows", height, rows));
      }
    }
    if self.puzzle_data.answers.len() != layout.len() {
      return malformed(format!(
        "{} answers for {} squares",
        self.puzzle_data.answers.len(),
        layout.len()
      ));
    }

    for (index, &open) in layout.iter().enumerate() {
      if open && self.answer_letter(index).is_none() {
        return malformed(format!("open square {} has no single-letter answer", index));
      }
    }

    for direction in Direction::ALL {
      let clues = self.puzzle_data.clues.get(direction);
      if clues.is_empty() {
        return malformed(format!("no {} clues", direction));
      }

      let mut numbers = HashSet::new();
      let mut covering = vec![0usize; layout.len()];
      for clue in clues {
        if !numbers.insert(clue.clue_num) {
          return malformed(format!("clue {}{} appears twice", clue.clue_num, direction.letter()));
        }
        for index in self.validate_range(clue, direction)? {
          covering[index] += 1;
        }
      }

      // Every open square is in exactly one clue per direction.
      for (index, (&open, &count)) in layout.iter().zip(&covering).enumerate() {
        match (open, count) {
          (true, 0) => return malformed(format!("open square {} has no {} clue", index, direction)),
          (true, 1) | (false, _) => {}
          (true, n) => {
            return malformed(format!("open square {} is in {} {} clues", index, n, direction));
          }
        }
      }
    }

    for direction in Direction::ALL {
      for clue in self.puzzle_data.clues.get(direction) {
        let Some(related) = &clue.related else {
          continue;
        };
        for related_direction in Direction::ALL {
          for number in related.get(related_direction) {
            let exists = self
              .puzzle_data
              .clues
              .get(related_direction)
              .iter()
              .any(|c| c.clue_num == *number);
            if !exists {
              return malformed(format!(
                "clue {}{} refers to missing clue {}{}",
                clue.clue_num,
                direction.letter(),
                number,
                related_direction.letter()
              ));
            }
          }
        }
      }
    }

    Ok(())
  }

  /// Checks that `clue` is a straight run of open squares, and returns them.
  fn validate_range(&self, clue: &RawClue, direction: Direction) -> Result<Vec<usize>, Error> {
    let width = self.width();
    let layout = &self.puzzle_data.layout;
    let label = format!("{}{}", clue.clue_num, direction.letter());

    if clue.clue_start > clue.clue_end || clue.clue_end >= layout.len() {
      return malformed(format!(
        "clue {} spans {}..={}, outside the grid",
        label, clue.clue_start, clue.clue_end
      ));
    }

    let step = match direction {
      Across => {
        if clue.clue_start / width != clue.clue_end / width {
          return malformed(format!("clue {} wraps onto another row", label));
        }
        1
      }
      Down => {
        if (clue.clue_end - clue.clue_start) % width != 0 {
          return malformed(format!("clue {} doesn't stay in one column", label));
        }
        width
      }
    };

    let squares: Vec<usize> = (clue.clue_start..=clue.clue_end).step_by(step).collect();
    if let Some(closed) = squares.iter().find(|&&i| !layout[i]) {
      return malformed(format!("clue {} runs over closed square {}", label, closed));
    }

    Ok(squares)
  }
}

fn malformed<T>(msg: String) -> Result<T, Error> {
  Err(Error::Malformed(msg))
}
