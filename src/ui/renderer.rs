/// Presentation layer: board projection plus a double-buffered,
/// diff-based terminal renderer.
///
/// `compose_board()` is the pure part: it maps a `GameState` onto the
/// `(height+2) × (width+2)` character grid (walls, food, body, blank).
/// `Renderer` paints that grid into a frame buffer, compares it with the
/// previous frame and only emits terminal commands for cells that changed.
/// All commands are batched with `queue!` and flushed once per frame.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::config::Glyphs;
use crate::sim::world::GameState;

// ── Board: the pure grid projection ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Wall,
    Food,
    Body,
    Blank,
}

impl Tile {
    pub fn glyph(self, glyphs: &Glyphs) -> char {
        match self {
            Tile::Wall => glyphs.wall,
            Tile::Food => glyphs.food,
            Tile::Body => glyphs.body,
            Tile::Blank => ' ',
        }
    }
}

pub struct Board {
    pub cols: usize,
    pub rows: usize,
    tiles: Vec<Tile>,
}

impl Board {
    pub fn get(&self, col: usize, row: usize) -> Tile {
        self.tiles[row * self.cols + col]
    }
}

/// Project the game onto its grid. Walls win over everything, then the
/// snake, then food.
pub fn compose_board(w: &GameState) -> Board {
    let (cols, rows) = w.arena.grid_size();
    let mut tiles = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            let tile = if w.arena.is_wall_cell(col, row) {
                Tile::Wall
            } else {
                let pos = w.arena.grid_to_world(col, row);
                if w.snake.occupies(pos) {
                    Tile::Body
                } else if pos == w.food {
                    Tile::Food
                } else {
                    Tile::Blank
                }
            };
            tiles.push(tile);
        }
    }
    Board { cols, rows, tiles }
}

/// The grid as plain text, one `String` per row.
pub fn board_lines(board: &Board, glyphs: &Glyphs) -> Vec<String> {
    (0..board.rows)
        .map(|row| (0..board.cols).map(|col| board.get(col, row).glyph(glyphs)).collect())
        .collect()
}

pub fn score_header(score: u32) -> String {
    format!("Score: {score}")
}

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so cleared
    /// areas and painted areas share one colour.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }
}

// ── Renderer ──

const HUD_ROW: usize = 0;
const BOARD_ROW: usize = 1;

const WALL_FG: Color = Color::Rgb { r: 110, g: 110, b: 160 };
const FOOD_FG: Color = Color::Rgb { r: 255, g: 90, b: 90 };
const HEAD_FG: Color = Color::Rgb { r: 150, g: 255, b: 120 };
const BODY_FG: Color = Color::Rgb { r: 60, g: 200, b: 60 };
const HELP_FG: Color = Color::DarkGrey;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    glyphs: Glyphs,
    enhanced_keys: bool,
}

/// Where finished frames go. The game loop only needs this much of a
/// terminal.
pub trait Screen {
    fn render(&mut self, world: &GameState) -> io::Result<()>;
}

impl Screen for Renderer {
    fn render(&mut self, world: &GameState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        self.compose_game(world);
        if world.game_over {
            self.compose_game_over(world);
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }
}

impl Renderer {
    pub fn new(glyphs: Glyphs) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            glyphs,
            enhanced_keys: false,
        }
    }

    /// Enter raw mode on the alternate screen. Returns whether the terminal
    /// will report key releases.
    pub fn init(&mut self) -> io::Result<bool> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.enhanced_keys = true;
        }

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(self.enhanced_keys)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.enhanced_keys {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_game(&mut self, w: &GameState) {
        self.front.put_str(0, HUD_ROW, &score_header(w.score), Color::White, Cell::BASE_BG);

        let board = compose_board(w);
        let head = w.snake.head();
        for (row, line) in board_lines(&board, &self.glyphs).iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let fg = match board.get(col, row) {
                    Tile::Wall => WALL_FG,
                    Tile::Food => FOOD_FG,
                    Tile::Body if w.arena.grid_to_world(col, row) == head => HEAD_FG,
                    Tile::Body => BODY_FG,
                    Tile::Blank => Color::White,
                };
                self.front.set(col, BOARD_ROW + row, Cell::new(ch, fg, Cell::BASE_BG));
            }
        }

        let status_row = BOARD_ROW + board.rows;
        let status = if w.paused {
            "PAUSED  P/F1: Resume  Esc: Quit"
        } else if w.direction.is_none() && !w.game_over {
            "Arrows/WASD: Start moving  P: Pause  Esc: Quit"
        } else {
            "Arrows/WASD: Move  P: Pause  Esc: Quit"
        };
        self.front.put_str(0, status_row, status, HELP_FG, Cell::BASE_BG);
    }

    fn compose_game_over(&mut self, w: &GameState) {
        let score = format!("Final Score: {}", w.score);
        let lines = ["Game Over!", score.as_str(), "", "Press any key to exit"];

        let box_w = lines.iter().map(|l| l.len()).max().unwrap_or(0) + 4;
        let box_h = lines.len() + 2;
        let (cols, rows) = w.arena.grid_size();
        let box_x = cols.saturating_sub(box_w) / 2;
        let box_y = BOARD_ROW + rows.saturating_sub(box_h) / 2;

        let bg = Color::Rgb { r: 40, g: 40, b: 40 };
        for y in box_y..box_y + box_h {
            for x in box_x..box_x + box_w {
                self.front.set(x, y, Cell::new(' ', Color::White, bg));
            }
        }
        for (i, line) in lines.iter().enumerate() {
            let x = box_x + (box_w - line.len()) / 2;
            let fg = if i == 0 { FOOD_FG } else { Color::White };
            self.front.put_str(x, box_y + 1 + i, line, fg, bg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::{BoardConfig, GameConfig};
    use crate::domain::entity::{Position, Snake};

    const GLYPHS: Glyphs = Glyphs { wall: '#', food: '*', body: 'O' };

    fn small_world(width: i32, height: i32) -> GameState {
        let mut cfg = GameConfig::default();
        cfg.board = BoardConfig { width, height, max_length: 10 };
        GameState::new(&cfg, &mut StdRng::seed_from_u64(3))
    }

    #[test]
    fn grid_has_wall_ring_and_expected_size() {
        let w = small_world(30, 20);
        let board = compose_board(&w);
        assert_eq!((board.cols, board.rows), (32, 22));

        let lines = board_lines(&board, &GLYPHS);
        assert_eq!(lines.len(), 22);
        assert_eq!(lines[0], "#".repeat(32));
        assert_eq!(lines[21], "#".repeat(32));
        for line in &lines {
            assert_eq!(line.chars().count(), 32);
            assert!(line.starts_with('#') && line.ends_with('#'));
        }
    }

    #[test]
    fn small_board_renders_exactly() {
        let mut w = small_world(4, 3);
        w.snake = Snake::new(Position::new(2, 1), 10);
        w.snake.grow(Position::new(1, 1));
        w.food = Position::new(4, 2);

        let lines = board_lines(&compose_board(&w), &GLYPHS);
        assert_eq!(lines, vec![
            "######",
            "#    #",
            "#OO  #",
            "#   *#",
            "######",
        ]);
    }

    #[test]
    fn snake_hides_food_underneath() {
        let mut w = small_world(4, 3);
        w.snake = Snake::new(Position::new(3, 0), 10);
        w.food = Position::new(3, 0);
        let board = compose_board(&w);
        assert_eq!(board.get(3, 1), Tile::Body);
        assert!(!board_lines(&board, &GLYPHS).concat().contains('*'));
    }

    #[test]
    fn head_past_the_wall_shows_as_wall() {
        let mut w = small_world(4, 3);
        w.snake = Snake::new(Position::new(5, 1), 10);
        let board = compose_board(&w);
        assert_eq!(board.get(5, 2), Tile::Wall);
    }

    #[test]
    fn custom_glyphs_are_used() {
        let mut w = small_world(2, 1);
        w.snake = Snake::new(Position::new(1, 0), 10);
        w.food = Position::new(2, 0);
        let glyphs = Glyphs { wall: '+', food: '@', body: 'S' };
        let lines = board_lines(&compose_board(&w), &glyphs);
        assert_eq!(lines, vec!["++++", "+S@+", "++++"]);
    }

    #[test]
    fn header_shows_score() {
        assert_eq!(score_header(0), "Score: 0");
        assert_eq!(score_header(120), "Score: 120");
    }
}
