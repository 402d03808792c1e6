//! Terminal presentation. Reads a `Session`, never changes it.
//!
//! Every tile is `CELL_W` columns wide. Only cells whose glyph changed since
//! the last frame are redrawn; anything painted over the maze (popups,
//! overlays) invalidates the cells beneath it.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::constants::STAGE_CLEAR_BONUS;
use crate::effects::Spark;
use crate::grid::{Dir, Pos, Tile};
use crate::session::{Phase, Session};

pub const CELL_W: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Glyph {
    Player(Dir),
    Enemy,
    Bullet,
    Flag,
    ExitOpen,
    ExitClosed,
    Spark(Spark),
    Exhaust,
    Wall,
    Floor,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub glyph: Glyph,
    pub color: Color,
}

pub struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    needs_full: bool,
    width: usize,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            last: vec![cell(Glyph::Floor, Color::Reset); width * height],
            last_hud: String::new(),
            needs_full: true,
            width,
            origin_x: 0,
            origin_y: 1,
        }
    }

    /// Centres a board of `board` columns and rows in a `term` sized window.
    /// Returns false, and schedules a full redraw, when it does not fit.
    fn place(&mut self, term: (u16, u16), board: (u16, u16)) -> bool {
        if term.0 < board.0 || term.1 < board.1 {
            self.needs_full = true;
            return false;
        }
        let origin = ((term.0 - board.0) / 2, (term.1 - board.1) / 2 + 1);
        if origin != (self.origin_x, self.origin_y) {
            (self.origin_x, self.origin_y) = origin;
            self.needs_full = true;
        }
        true
    }

    fn move_to(&self, pos: Pos) -> MoveTo {
        MoveTo(
            self.origin_x + (pos.x * CELL_W) as u16,
            self.origin_y + pos.y as u16,
        )
    }

    /// Records `cell` at `pos` and reports whether it has to be drawn.
    fn remember(&mut self, pos: Pos, cell: Cell) -> bool {
        let idx = pos.y * self.width + pos.x;
        let changed = self.needs_full || self.last.get(idx) != Some(&cell);
        if let Some(slot) = self.last.get_mut(idx) {
            *slot = cell;
        }
        changed
    }

    /// Forces a redraw of the tiles covering `cols` tiles from `(x, y)`.
    fn invalidate(&mut self, x: usize, y: usize, cols: usize) {
        for tx in x..(x + cols).min(self.width) {
            if let Some(slot) = self.last.get_mut(y * self.width + tx) {
                // Reset never matches anything `cell_for` produces for a wall.
                *slot = cell(Glyph::Wall, Color::Reset);
            }
        }
    }
}

/// Player blinks at 10 Hz while invincible.
fn player_visible(session: &Session) -> bool {
    !session.player.is_invincible() || (session.clock * 10.0).floor() as i64 % 2 != 0
}

fn cell(glyph: Glyph, color: Color) -> Cell {
    Cell { glyph, color }
}

pub fn cell_for(session: &Session, pos: Pos) -> Cell {
    let world = &session.world;
    if pos == session.player.pos && player_visible(session) {
        return cell(Glyph::Player(session.player.facing), Color::Green);
    }
    if world.enemy_at(pos) {
        return cell(Glyph::Enemy, Color::Red);
    }
    if world
        .bullets
        .iter()
        .any(|b| world.grid.tile_at_point(b.x, b.y) == Some(pos))
    {
        return cell(Glyph::Bullet, Color::DarkYellow);
    }
    if world.flag_at(pos) {
        return cell(Glyph::Flag, Color::Red);
    }
    if pos == world.exit {
        return if world.exit_open {
            cell(Glyph::ExitOpen, Color::Green)
        } else {
            cell(Glyph::ExitClosed, Color::DarkGreen)
        };
    }
    if let Some(p) = world
        .particles
        .iter()
        .rev()
        .filter(|p| p.fade() > 0.2)
        .find(|p| world.grid.tile_at_point(p.x, p.y) == Some(pos))
    {
        let color = match p.kind {
            Spark::Smoke | Spark::Gas => Color::DarkYellow,
            Spark::Fire => Color::Red,
            Spark::Sparkle => Color::Yellow,
        };
        return cell(Glyph::Spark(p.kind), color);
    }
    if world
        .bullets
        .iter()
        .flat_map(|b| &b.trail)
        .any(|t| world.grid.tile_at_point(t.x, t.y) == Some(pos))
    {
        return cell(Glyph::Spark(Spark::Gas), Color::DarkGreen);
    }
    if session.player.exhaust.iter().any(|e| e.pos == pos) {
        return cell(Glyph::Exhaust, Color::Grey);
    }
    match world.grid.tile(pos) {
        Some(Tile::Empty) => cell(Glyph::Floor, Color::Reset),
        Some(Tile::Wall) | None => cell(Glyph::Wall, Color::Blue),
    }
}

fn glyph_text(glyph: Glyph) -> &'static str {
    match glyph {
        Glyph::Player(Dir::Up) => "▲",
        Glyph::Player(Dir::Down) => "▼",
        Glyph::Player(Dir::Left) => "◀",
        Glyph::Player(Dir::Right) => "▶",
        Glyph::Enemy => "👾",
        Glyph::Bullet => "💨",
        Glyph::Flag => "🚩",
        Glyph::ExitOpen => "🚪",
        Glyph::ExitClosed => "░░",
        Glyph::Spark(Spark::Sparkle) => "✦",
        Glyph::Spark(Spark::Fire) => "✸",
        Glyph::Spark(_) => "∴",
        Glyph::Exhaust => "·",
        Glyph::Wall => "██",
        Glyph::Floor => "  ",
    }
}

fn draw_cell(out: &mut impl Write, renderer: &Renderer, pos: Pos, cell: Cell) -> io::Result<()> {
    let text = glyph_text(cell.glyph);
    let pad = CELL_W.saturating_sub(UnicodeWidthStr::width(text));
    out.queue(renderer.move_to(pos))?;
    out.queue(SetForegroundColor(cell.color))?;
    out.queue(Print(text))?;
    out.queue(Print(" ".repeat(pad)))?;
    out.queue(ResetColor)?;
    Ok(())
}

pub fn hud_line(session: &Session) -> String {
    format!(
        "STAGE {}  SCORE {}  FLAGS {}/{}  LIVES {}  (q to quit)",
        session.stage_number,
        session.score,
        session.world.collected_flags,
        session.world.total_flags,
        "♥".repeat(session.lives as usize)
    )
}

/// The banner shown over the maze, if the current phase has one.
pub fn overlay_text(session: &Session) -> Option<String> {
    match session.phase {
        Phase::Title => Some("방구차 BANGGUCHA  -  press Enter to start".to_string()),
        Phase::StageClear => Some(format!(
            "STAGE {} CLEAR!  SCORE {}  STAGE BONUS +{}  -  Enter: next stage",
            session.stage_number,
            session.score,
            STAGE_CLEAR_BONUS * session.stage_number
        )),
        Phase::GameOver => Some(format!(
            "GAME OVER  FINAL SCORE {}  -  Enter: restart, q: quit",
            session.score
        )),
        Phase::Running => None,
    }
}

/// Draws one frame. Only changed tiles are written unless the layout moved.
pub fn render(out: &mut impl Write, session: &Session, renderer: &mut Renderer) -> io::Result<()> {
    let grid = &session.world.grid;
    // One HUD row above the board and one spare row below it.
    let board = ((grid.width() * CELL_W) as u16, (grid.height() + 2) as u16);
    let term = terminal::size()?;

    if !renderer.place(term, board) {
        out.queue(Clear(ClearType::All))?;
        out.queue(MoveTo(0, 0))?;
        out.queue(Print(format!(
            "Window is {}x{}; banggucha needs {}x{}.",
            term.0, term.1, board.0, board.1
        )))?;
        return out.flush();
    }
    if renderer.needs_full {
        out.queue(Clear(ClearType::All))?;
    }

    draw_hud(out, session, renderer)?;
    draw_board(out, session, renderer)?;
    draw_popups(out, session, renderer)?;
    if let Some(text) = overlay_text(session) {
        draw_banner(out, renderer, grid.width(), grid.height() / 2, &text)?;
    }
    out.flush()
}

fn draw_hud(out: &mut impl Write, session: &Session, renderer: &mut Renderer) -> io::Result<()> {
    let hud = hud_line(session);
    if !renderer.needs_full && hud == renderer.last_hud {
        return Ok(());
    }
    out.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
    out.queue(Clear(ClearType::CurrentLine))?;
    out.queue(SetForegroundColor(Color::White))?;
    out.queue(Print(&hud))?;
    out.queue(ResetColor)?;
    renderer.last_hud = hud;
    Ok(())
}

fn draw_board(out: &mut impl Write, session: &Session, renderer: &mut Renderer) -> io::Result<()> {
    let grid = &session.world.grid;
    for pos in (0..grid.height()).flat_map(|y| (0..grid.width()).map(move |x| Pos::new(x, y))) {
        let cell = cell_for(session, pos);
        if renderer.remember(pos, cell) {
            draw_cell(out, renderer, pos, cell)?;
        }
    }
    renderer.needs_full = false;
    Ok(())
}

/// Popups float over the board; the tiles they cover are redrawn next frame.
fn draw_popups(out: &mut impl Write, session: &Session, renderer: &mut Renderer) -> io::Result<()> {
    for popup in &session.world.popups {
        let Some(pos) = session.world.grid.tile_at_point(popup.x, popup.y - popup.rise()) else {
            continue;
        };
        out.queue(renderer.move_to(pos))?;
        out.queue(SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&popup.text))?;
        out.queue(ResetColor)?;
        let tiles = UnicodeWidthStr::width(popup.text.as_str()).div_ceil(CELL_W);
        renderer.invalidate(pos.x, pos.y, tiles);
    }
    Ok(())
}

fn draw_banner(
    out: &mut impl Write,
    renderer: &mut Renderer,
    width: usize,
    row: usize,
    text: &str,
) -> io::Result<()> {
    let text_w = UnicodeWidthStr::width(text);
    let span = width * CELL_W;
    let x = renderer.origin_x + (span.saturating_sub(text_w) / 2) as u16;
    out.queue(MoveTo(x, renderer.origin_y + row as u16))?;
    out.queue(SetForegroundColor(Color::Yellow))?;
    out.queue(Print(text))?;
    out.queue(ResetColor)?;
    renderer.invalidate(0, row, width);
    Ok(())
}
