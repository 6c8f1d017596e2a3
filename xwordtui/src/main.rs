use std::fs::File;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{
  self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
  MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use log::{info, warn};
use ratatui::{
  DefaultTerminal, Frame,
  buffer::Buffer,
  layout::{Constraint, Flex, Layout, Position, Rect},
  style::{Color, Modifier, Style, Stylize},
  text::Line,
  widgets::{Block, Padding, Paragraph, Widget, Wrap},
};
use ratatui_macros::line;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use xword::{Cell, Direction, Input, Move, PuzzleState, RawPuzzle, Scope, Transform};

const SQUARE_WIDTH: u16 = 5;
const SQUARE_HEIGHT: u16 = 3;
const TICK: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(name = "xwordtui", about = "Solve crossword puzzles in your terminal")]
struct Args {
  /// Puzzle document (JSON) to play
  puzzle: PathBuf,

  /// Where to write the log
  #[arg(long, default_value = "xwordtui.log")]
  log_file: PathBuf,

  /// Log level: off, error, warn, info, debug or trace
  #[arg(long, default_value = "info")]
  log_level: LevelFilter,
}

fn main() -> io::Result<()> {
  let args = Args::parse();

  let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
  if let Ok(log_file) = File::create(&args.log_file) {
    let _ = WriteLogger::init(args.log_level, log_config, log_file);
  }

  let puzzle = load_puzzle(&args.puzzle);
  info!("Playing '{}' from {}", puzzle.title(), args.puzzle.display());
  let app = App::new(puzzle);

  let terminal = ratatui::init();
  if let Err(e) = execute!(stdout(), EnableMouseCapture) {
    warn!("Mouse input unavailable: {}", e);
  }
  let result = app.run(terminal);
  let _ = execute!(stdout(), DisableMouseCapture);
  ratatui::restore();
  result
}

fn read_puzzle(path: &Path) -> Result<PuzzleState, xword::Error> {
  let data: Vec<u8> = std::fs::read(path)?;
  PuzzleState::new(RawPuzzle::from_slice(&data)?)
}

fn load_puzzle(path: &Path) -> PuzzleState {
  read_puzzle(path).unwrap_or_else(|e| {
    println!("Failed to load {}: {}", path.display(), e);
    std::process::exit(1);
  })
}

/// What a key press asks for.
#[derive(Debug, PartialEq, Eq)]
enum Action {
  Quit,
  Pause,
  Puzzle(Input),
}

fn action_for_key(key: KeyEvent) -> Option<Action> {
  let shift = key.modifiers.contains(KeyModifiers::SHIFT);
  let input = match (key.modifiers, key.code) {
    (_, KeyCode::Esc) | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => {
      return Some(Action::Quit);
    }
    (KeyModifiers::CONTROL, KeyCode::Char('p') | KeyCode::Char('P')) => return Some(Action::Pause),
    (_, KeyCode::Left) => Input::Arrow(Move::Left),
    (_, KeyCode::Right) => Input::Arrow(Move::Right),
    (_, KeyCode::Up) => Input::Arrow(Move::Up),
    (_, KeyCode::Down) => Input::Arrow(Move::Down),
    (_, KeyCode::Tab | KeyCode::Enter) => Input::NextClue { forward: !shift },
    (_, KeyCode::BackTab) => Input::NextClue { forward: false },
    (_, KeyCode::Backspace) => Input::Backspace,
    (_, KeyCode::F(2)) => Input::Scoped(Transform::Check, Scope::Square),
    (_, KeyCode::F(3)) => Input::Scoped(Transform::Check, Scope::Word),
    (_, KeyCode::F(4)) => Input::Scoped(Transform::Check, Scope::Puzzle),
    (_, KeyCode::F(5)) => Input::Scoped(Transform::Reveal, Scope::Square),
    (_, KeyCode::F(6)) => Input::Scoped(Transform::Reveal, Scope::Word),
    (_, KeyCode::F(7)) => Input::Scoped(Transform::Reveal, Scope::Puzzle),
    (_, KeyCode::F(8)) => Input::Scoped(Transform::Clear, Scope::Incomplete),
    (_, KeyCode::F(9)) => Input::Scoped(Transform::Clear, Scope::Word),
    (_, KeyCode::F(10)) => Input::Scoped(Transform::Clear, Scope::Puzzle),
    (_, KeyCode::F(12)) => Input::Reset,
    (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) if c.is_ascii_alphabetic() => {
      Input::Letter(c)
    }
    _ => return None,
  };
  Some(Action::Puzzle(input))
}

#[derive(Debug)]
enum SquareStyle {
  // Default styling
  Standard,
  // The cursor is positioned on this square.
  Cursor,
  // The cursor is not on this square, but the word indicated by the cursor includes this square.
  Word,
  // This square is part of a clue that the current clue refers to.
  Related,
}

impl From<SquareStyle> for Style {
  fn from(value: SquareStyle) -> Self {
    let base_style = match value {
      SquareStyle::Standard => Style::new().bg(Color::White),
      SquareStyle::Cursor => Style::new().bg(Color::LightRed),
      SquareStyle::Word => Style::new().bg(Color::LightYellow),
      SquareStyle::Related => Style::new().bg(Color::LightCyan),
    };
    base_style.fg(Color::Black).add_modifier(Modifier::BOLD)
  }
}

fn clue_list_block(direction: Direction) -> Block<'static> {
  Block::bordered().title(Line::from(direction.to_string()).centered())
}

/// Where each part of the screen goes, for a given terminal size.
#[derive(Debug)]
struct Regions {
  title: Rect,
  grid: Rect,
  clue: Rect,
  across: Rect,
  down: Rect,
  status: Rect,
  help: Rect,
}

impl Regions {
  fn new(area: Rect, puzzle: &PuzzleState) -> Self {
    let [title, main] = Layout::vertical([Constraint::Length(2), Constraint::Percentage(100)]).areas(area);
    let [puzzle_area, side] =
      Layout::horizontal([Constraint::Percentage(100), Constraint::Length(45)]).areas(main);

    let squares = |n: usize, size: u16| u16::try_from(n).unwrap_or(u16::MAX).saturating_mul(size + 1);
    let grid = center(
      puzzle_area,
      Constraint::Length(squares(puzzle.width(), SQUARE_WIDTH)),
      Constraint::Length(squares(puzzle.height(), SQUARE_HEIGHT)),
    );

    let [clue, across, down, status, help] = Layout::vertical([
      Constraint::Length(6),
      Constraint::Fill(1),
      Constraint::Fill(1),
      Constraint::Length(5),
      Constraint::Length(8),
    ])
    .areas(side);

    Self {
      title,
      grid,
      clue,
      across,
      down,
      status,
      help,
    }
  }

  fn clue_list(&self, direction: Direction) -> Rect {
    match direction {
      Direction::Across => self.across,
      Direction::Down => self.down,
    }
  }

  /// The index of the square drawn at the given screen position.
  fn square_at(&self, position: Position, width: usize, height: usize) -> Option<usize> {
    if !self.grid.contains(position) {
      return None;
    }
    let x = position.x - self.grid.x;
    let y = position.y - self.grid.y;
    // The gaps between squares don't belong to any of them.
    if x % (SQUARE_WIDTH + 1) >= SQUARE_WIDTH || y % (SQUARE_HEIGHT + 1) >= SQUARE_HEIGHT {
      return None;
    }
    let col = usize::from(x / (SQUARE_WIDTH + 1));
    let row = usize::from(y / (SQUARE_HEIGHT + 1));
    (col < width && row < height).then_some(row * width + col)
  }
}

#[derive(Debug)]
pub struct App {
  puzzle: PuzzleState,
  running: bool,
  paused: bool,
  /// The terminal area of the last draw, for mapping mouse clicks.
  area: Rect,
}

impl App {
  fn new(puzzle: PuzzleState) -> Self {
    Self {
      puzzle,
      running: true,
      paused: false,
      area: Rect::default(),
    }
  }

  pub fn run(mut self, mut terminal: DefaultTerminal) -> io::Result<()> {
    self.running = true;
    let mut last_tick = Instant::now();
    while self.running {
      terminal.draw(|frame| self.draw(frame))?;

      let timeout = TICK.saturating_sub(last_tick.elapsed());
      if event::poll(timeout)? {
        self.handle_crossterm_events()?;
      }
      if last_tick.elapsed() >= TICK {
        self.apply(Input::Tick);
        last_tick = Instant::now();
      }
    }
    Ok(())
  }

  fn draw(&mut self, frame: &mut Frame) {
    self.area = frame.area();
    frame.render_widget(&*self, self.area);
  }

  /// Reads the crossterm events and updates the state of [`App`].
  fn handle_crossterm_events(&mut self) -> io::Result<()> {
    match event::read()? {
      // it's important to check KeyEventKind::Press to avoid handling key release events
      Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
      Event::Mouse(mouse) => self.on_mouse_event(mouse),
      _ => {}
    }
    Ok(())
  }

  /// Handles the key events and updates the state of [`App`].
  fn on_key_event(&mut self, key: KeyEvent) {
    match action_for_key(key) {
      Some(Action::Quit) => self.quit(),
      Some(Action::Pause) => self.toggle_pause(),
      Some(Action::Puzzle(input)) => self.apply(input),
      None => {}
    }
  }

  fn on_mouse_event(&mut self, mouse: MouseEvent) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
      return;
    }
    if let Some(input) = self.input_at(Position::new(mouse.column, mouse.row)) {
      self.apply(input);
    }
  }

  /// What a click at `position` asks for: a square of the grid, or an entry of
  /// one of the clue lists.
  fn input_at(&self, position: Position) -> Option<Input> {
    let regions = Regions::new(self.area, &self.puzzle);
    if let Some(cell_number) = regions.square_at(position, self.puzzle.width(), self.puzzle.height()) {
      return Some(Input::CellClick(cell_number));
    }

    Direction::ALL.into_iter().find_map(|direction| {
      let list = clue_list_block(direction).inner(regions.clue_list(direction));
      if !list.contains(position) {
        return None;
      }
      let index = self.list_offset(direction, list.height) + usize::from(position.y - list.y);
      let clue = self.puzzle.clues().iter(direction).nth(index)?;
      Some(Input::ClueClick(direction, clue.number))
    })
  }

  fn toggle_pause(&mut self) {
    self.paused = !self.paused;
    info!("{} at {}s", if self.paused { "Paused" } else { "Resumed" }, self.puzzle.timer());
  }

  /// Installs the state that results from `input`. Nothing is accepted while
  /// paused, and once the puzzle is solved only a reset is.
  fn apply(&mut self, input: Input) {
    if self.paused || (self.puzzle.is_solved() && input != Input::Reset) {
      return;
    }
    match self.puzzle.apply(input) {
      Ok(next) => self.puzzle = next,
      Err(e) => warn!("Ignoring {:?}: {}", input, e),
    }
  }

  /// Set running to false to quit the application.
  fn quit(&mut self) {
    self.running = false;
  }

  /// The clue in `direction` that crosses the active cell.
  fn crossing_clue(&self, direction: Direction) -> Option<u32> {
    self.puzzle.active_cell().ok()?.clue(direction)
  }

  /// How far a clue list of `height` rows is scrolled, keeping the crossing clue in view.
  fn list_offset(&self, direction: Direction, height: u16) -> usize {
    let selected = self
      .crossing_clue(direction)
      .and_then(|number| self.puzzle.clues().iter(direction).position(|c| c.number == number));
    selected.map_or(0, |i| (i + 1).saturating_sub(usize::from(height)))
  }

  fn render_clue_list(&self, direction: Direction, area: Rect, buf: &mut Buffer) {
    let block = clue_list_block(direction);
    if self.paused {
      block.render(area, buf);
      return;
    }

    let offset = self.list_offset(direction, block.inner(area).height);
    let crossing = self.crossing_clue(direction);
    let lines: Vec<Line> = self
      .puzzle
      .clues()
      .iter(direction)
      .map(|clue| {
        let line = Line::from(format!("{:>3} {}", clue.number, clue.value));
        match crossing {
          Some(n) if n == clue.number && direction == self.puzzle.active_direction() => {
            line.style(SquareStyle::Word)
          }
          Some(n) if n == clue.number => line.style(Style::new().bg(Color::Gray).fg(Color::Black)),
          _ => line,
        }
      })
      .collect();
    Paragraph::new(lines)
      .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0))
      .block(block)
      .render(area, buf);
  }

  // Determines how a particular square should be styled.
  fn square_style(&self, cell_number: usize) -> SquareStyle {
    if cell_number == self.puzzle.active_cell_number() {
      SquareStyle::Cursor
    } else if self.puzzle.in_active_clue(cell_number).unwrap_or(false) {
      SquareStyle::Word
    } else if self.puzzle.is_related(cell_number).unwrap_or(false) {
      SquareStyle::Related
    } else {
      SquareStyle::Standard
    }
  }

  fn render_square(&self, cell: &Cell, style: SquareStyle, square_area: Rect, buf: &mut Buffer) {
    if !cell.open {
      Block::new()
        .style(Style::new().bg(Color::Black))
        .render(square_area, buf);
      return;
    }

    let mut style = Style::from(style);
    if cell.revealed {
      style = style.fg(Color::Blue);
    } else if cell.cheated && !cell.solved {
      style = style.fg(Color::Red);
    }

    let number = cell.number.map(|n| n.to_string()).unwrap_or_default();
    let guess = match cell.guess {
      Some(c) if !self.paused => c.to_string(),
      _ => String::new(),
    };
    Paragraph::new(guess)
      .block(
        Block::new()
          .style(style)
          .title(Line::from(number).left_aligned())
          .padding(Padding::top(1)),
      )
      .centered()
      .render(square_area, buf);
  }

  fn status_lines(&self) -> Vec<Line<'_>> {
    let minutes = self.puzzle.timer() / 60;
    let seconds = self.puzzle.timer() % 60;
    let mut lines = vec![
      Line::from(format!("Time: {}:{:02}", minutes, seconds)),
      Line::from(format!(
        "Filled: {}/{}",
        self.puzzle.filled_cells(),
        self.puzzle.available_cells()
      )),
    ];
    if self.paused {
      lines.push("Paused. Ctrl-P to resume.".bold().into());
    } else if self.puzzle.is_solved() {
      lines.push("Solved! F12 to start over.".bold().green().into());
    } else if self.puzzle.is_filled() {
      lines.push("Something's not right yet.".bold().red().into());
    }
    lines
  }
}

impl Widget for &App {
  fn render(self, area: Rect, buf: &mut Buffer) {
    let regions = Regions::new(area, &self.puzzle);

    let title = line![
      "Ratatui Crossword".bold().blue(),
      ": ".bold(),
      self.puzzle.title().to_string().bold()
    ]
    .centered();
    title.render(regions.title, buf);

    let width = self.puzzle.width();
    let mut square_area = Rect {
      x: regions.grid.x,
      y: regions.grid.y,
      width: SQUARE_WIDTH,
      height: SQUARE_HEIGHT,
    };
    for (cell_number, cell) in self.puzzle.cells().iter().enumerate() {
      let style = if self.paused {
        SquareStyle::Standard
      } else {
        self.square_style(cell_number)
      };
      let visible = square_area.intersection(area);
      self.render_square(cell, style, visible, buf);
      if (cell_number + 1) % width == 0 {
        square_area.x = regions.grid.x;
        square_area.y = square_area.y.saturating_add(SQUARE_HEIGHT + 1);
      } else {
        square_area.x = square_area.x.saturating_add(SQUARE_WIDTH + 1);
      }
    }

    let (label, clue) = match self.puzzle.active_clue() {
      _ if self.paused => ("(paused)".to_string(), ""),
      Ok(clue) => (
        format!("{}{}", clue.number, self.puzzle.active_direction().letter()),
        clue.value.as_str(),
      ),
      Err(_) => (String::new(), ""),
    };
    Paragraph::new(clue)
      .wrap(Wrap { trim: true })
      .block(
        Block::bordered()
          .title(Line::from(format!("Current clue {}", label)).centered())
          .padding(Padding::horizontal(1)),
      )
      .render(regions.clue, buf);

    for direction in Direction::ALL {
      self.render_clue_list(direction, regions.clue_list(direction), buf);
    }

    Paragraph::new(self.status_lines())
      .block(Block::bordered().title(Line::from("Status").centered()))
      .render(regions.status, buf);

    Paragraph::new(vec![
      Line::from("Tab/Enter: next clue (Shift: previous)"),
      Line::from("F2-F4: check square/word/puzzle"),
      Line::from("F5-F7: reveal square/word/puzzle"),
      Line::from("F8-F10: clear incomplete/word/puzzle"),
      Line::from("F12: reset  Ctrl-P: pause  Esc: quit"),
      Line::from("Click a square or a clue to jump there"),
    ])
    .block(Block::bordered().title(Line::from("Keys").centered()))
    .render(regions.help, buf);
  }
}

/// https://ratatui.rs/recipes/layout/center-a-widget/
fn center(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
  let [area] = Layout::horizontal([horizontal])
    .flex(Flex::Center)
    .areas(area);
  let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
  area
}
