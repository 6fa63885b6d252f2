//! Terminal drawing for the board, the side panel and the menu screens.
//!
//! The board renderer only repaints cells and text lines that changed since
//! the previous frame; anything that scribbles over the screen in between
//! must call [`Renderer::invalidate`].

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::coord::Coordinate;
use crate::entity::{Glyph, PlayerId, Tint, GLYPH_SIZE};
use crate::game::Game;

const CELL_W: usize = GLYPH_SIZE;
const CELL_H: usize = GLYPH_SIZE;
const BORDER_CHAR: char = '*';
const HIGHLIGHT: Color = Color::DarkGrey;
/// Scores and turn above the board.
const HEADER_LINES: usize = 2;
/// Prompt and status below the history.
const FOOTER_LINES: usize = 2;

pub const MENU_TEXT: &[&str] = &[
    "Welcome to Maze Race!",
    "",
    "    > h - help",
    "    > q - quit",
    "    > s - start a new game",
];

pub const QUIT_TEXT: &[&str] = &[
    "Are you sure you want to quit? All progress will be lost.",
    "",
    "Press 'q' again to quit, any other key to continue.",
];

pub const HELP_TEXT: &[&str] = &[
    "How to play:",
    "",
    "The board holds walls, bonuses, endpoints and the two players, P1 and P2.",
    "P1 starts on the P1 endpoint in the top left corner, P2 on the P2 endpoint",
    "in the bottom right corner. Reach the opponent's endpoint with more points",
    "than your opponent. Both players start with one point.",
    "",
    "Players move one cell north, south, east or west onto blank cells, bonuses",
    "or endpoints, never onto walls or the other player. A move can be wasted",
    "while you have more than 0 points; wasting costs one point.",
    "",
    "Once a player reaches the opposing endpoint every bonus disappears, the",
    "opponent keeps the turn and every move they make costs them one point.",
    "",
    "Keys:",
    "    > w - North",
    "    > a - West",
    "    > s - South",
    "    > d - East",
    "    > x - Waste",
    "    > h - Help",
    "    > q - Quit",
    "",
    "You win if either:",
    "    - you reach the opponent's endpoint and have more points than them",
    "    - you have finished and your opponent bleeds below your score",
    "    - your opponent has no legal move left",
    "The game is a draw if both players finish with the same points.",
    "",
    "Bonuses add (+V), multiply (xV) or, hidden behind four question marks,",
    "may also subtract or divide your points.",
    "",
    "Press any key to continue...",
];

/// What one board cell looks like this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    pub glyph: Option<Glyph>,
    pub highlighted: bool,
}

/// A run of text in one color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tint: Option<Tint>,
}

impl Span {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tint: None,
        }
    }

    fn tinted(text: impl Into<String>, tint: Tint) -> Self {
        Self {
            text: text.into(),
            tint: Some(tint),
        }
    }
}

pub type Line = Vec<Span>;

pub fn cell_view(game: &Game, pos: Coordinate) -> CellView {
    let highlighted = game
        .last_step()
        .map_or(false, |(start, end)| start == pos || end == pos);
    CellView {
        glyph: game.at(pos).map(|entity| entity.glyph()),
        highlighted,
    }
}

pub fn header_lines(game: &Game) -> Vec<Line> {
    vec![
        vec![
            Span::plain("Scores: "),
            Span::tinted(format!("P1 - {} ", game.points(PlayerId::P1)), Tint::Red),
            Span::tinted(format!("P2 - {}", game.points(PlayerId::P2)), Tint::Blue),
        ],
        vec![
            Span::plain("Turn: "),
            Span::tinted(game.turn().to_string(), game.turn().tint()),
        ],
    ]
}

/// Move history padded to `history_len` entries, followed by prompt and
/// status.
pub fn footer_lines(game: &Game, history_len: usize, prompt: &str, status: &str) -> Vec<Line> {
    let mut lines = Vec::with_capacity(1 + history_len + FOOTER_LINES);
    lines.push(vec![Span::plain("Move History:")]);
    let recent = game.recent_moves(history_len);
    for mv in recent {
        lines.push(vec![Span::tinted(mv.describe(), mv.player().tint())]);
    }
    for _ in recent.len()..history_len {
        lines.push(Vec::new());
    }
    lines.push(vec![Span::plain(prompt)]);
    lines.push(vec![Span::tinted(status, Tint::Red)]);
    lines
}

fn color_for(tint: Tint) -> Color {
    match tint {
        Tint::Red => Color::Red,
        Tint::Yellow => Color::Yellow,
        Tint::Green => Color::Green,
        Tint::Blue => Color::Blue,
    }
}

fn line_width(line: &[Span]) -> usize {
    line.iter().map(|span| UnicodeWidthStr::width(span.text.as_str())).sum()
}

pub struct Renderer {
    rows: usize,
    columns: usize,
    history_len: usize,
    last: Vec<CellView>,
    last_text: Vec<Line>,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(game: &Game, history_len: usize) -> Self {
        let rows = game.rows() as usize;
        let columns = game.columns() as usize;
        Self {
            rows,
            columns,
            history_len,
            last: vec![
                CellView {
                    glyph: None,
                    highlighted: false,
                };
                rows * columns
            ],
            last_text: Vec::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 0,
        }
    }

    /// Forces the next frame to repaint everything.
    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }

    fn board_size(&self) -> (usize, usize) {
        (self.columns * CELL_W + 2, self.rows * CELL_H + 2)
    }

    pub fn render(&mut self, stdout: &mut impl Write, game: &Game, prompt: &str, status: &str) -> io::Result<()> {
        let header = header_lines(game);
        let footer = footer_lines(game, self.history_len, prompt, status);
        let (board_w, board_h) = self.board_size();
        let text_w = header.iter().chain(&footer).map(|line| line_width(line)).max().unwrap_or(0);
        let needed_w = board_w.max(text_w) as u16;
        let needed_h = (HEADER_LINES + board_h + footer.len()) as u16;

        let (term_w, term_h) = terminal::size()?;
        if term_w < needed_w || term_h < needed_h {
            stdout.queue(Clear(ClearType::All))?;
            stdout.queue(MoveTo(0, 0))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            );
            stdout.queue(Print(msg))?;
            stdout.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }

        if self.needs_full {
            stdout.queue(Clear(ClearType::All))?;
            self.last_text.clear();
            self.draw_border(stdout)?;
        }

        let footer_top = HEADER_LINES + board_h;
        let text_rows = (0..HEADER_LINES).chain(footer_top..footer_top + footer.len());
        for (idx, (line, row)) in header.iter().chain(&footer).zip(text_rows).enumerate() {
            if self.last_text.get(idx) != Some(line) {
                draw_line(stdout, self.origin_x, self.origin_y + row as u16, line)?;
            }
        }
        self.last_text = header.into_iter().chain(footer).collect();

        for y in 0..self.rows {
            for x in 0..self.columns {
                let cell = cell_view(game, Coordinate::new(x as i32, y as i32));
                let idx = y * self.columns + x;
                if self.needs_full || cell != self.last[idx] {
                    self.last[idx] = cell;
                    self.draw_cell(stdout, x, y, cell)?;
                }
            }
        }
        self.needs_full = false;

        stdout.flush()?;
        Ok(())
    }

    fn draw_border(&self, stdout: &mut impl Write) -> io::Result<()> {
        let (board_w, board_h) = self.board_size();
        let top = self.origin_y + HEADER_LINES as u16;
        let edge: String = std::iter::repeat(BORDER_CHAR).take(board_w).collect();
        stdout.queue(MoveTo(self.origin_x, top))?;
        stdout.queue(Print(&edge))?;
        stdout.queue(MoveTo(self.origin_x, top + board_h as u16 - 1))?;
        stdout.queue(Print(&edge))?;
        for row in 1..board_h as u16 - 1 {
            stdout.queue(MoveTo(self.origin_x, top + row))?;
            stdout.queue(Print(BORDER_CHAR))?;
            stdout.queue(MoveTo(self.origin_x + board_w as u16 - 1, top + row))?;
            stdout.queue(Print(BORDER_CHAR))?;
        }
        Ok(())
    }

    fn draw_cell(&self, stdout: &mut impl Write, x: usize, y: usize, cell: CellView) -> io::Result<()> {
        let x_pos = self.origin_x + 1 + (x * CELL_W) as u16;
        let y_pos = self.origin_y + HEADER_LINES as u16 + 1 + (y * CELL_H) as u16;

        for row in 0..CELL_H {
            stdout.queue(MoveTo(x_pos, y_pos + row as u16))?;
            if cell.highlighted {
                stdout.queue(SetBackgroundColor(HIGHLIGHT))?;
            }
            let text = match cell.glyph {
                Some(glyph) => {
                    for col in 0..CELL_W {
                        if let Some(colors) = glyph.colors {
                            stdout.queue(SetForegroundColor(color_for(colors[row][col])))?;
                        }
                        stdout.queue(Print(glyph.chars[row][col]))?;
                    }
                    glyph.row(row)
                }
                None => {
                    stdout.queue(Print("  "))?;
                    "  ".to_string()
                }
            };
            let w = UnicodeWidthStr::width(text.as_str());
            if w < CELL_W {
                for _ in 0..(CELL_W - w) {
                    stdout.queue(Print(' '))?;
                }
            }
            stdout.queue(ResetColor)?;
        }
        Ok(())
    }
}

fn draw_line(stdout: &mut impl Write, x: u16, y: u16, line: &[Span]) -> io::Result<()> {
    stdout.queue(MoveTo(x, y))?;
    stdout.queue(Clear(ClearType::UntilNewLine))?;
    for span in line {
        if let Some(tint) = span.tint {
            stdout.queue(SetForegroundColor(color_for(tint)))?;
        }
        stdout.queue(Print(&span.text))?;
        stdout.queue(ResetColor)?;
    }
    Ok(())
}

/// Clears the terminal and prints `lines` from the top left corner.
pub fn draw_screen(stdout: &mut impl Write, lines: &[&str]) -> io::Result<()> {
    stdout.queue(Clear(ClearType::All))?;
    for (row, line) in lines.iter().enumerate() {
        stdout.queue(MoveTo(0, row as u16))?;
        stdout.queue(Print(line))?;
    }
    stdout.flush()
}
