//! Host display: draws RGBA frames with half-block cells.

use crate::frame::{place, RgbaFrame};
use crate::palette::Rgb;
use anyhow::Result;
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Stdout, Write};

pub(crate) const HUD_ROWS: u16 = 2;
const BACKGROUND: Rgb = Rgb { r: 0, g: 0, b: 0 };
const UPPER_HALF: char = '▀';

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    top: Rgb,
    bottom: Rgb,
}

impl Cell {
    fn blank() -> Self {
        Self {
            top: BACKGROUND,
            bottom: BACKGROUND,
        }
    }
}

fn color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Raw mode + alternate screen for as long as it lives.
pub(crate) struct Screen {
    out: Stdout,
    cols: u16,
    rows: u16,
    prev: Vec<Option<Cell>>,
    next: Vec<Cell>,
}

impl Screen {
    pub(crate) fn begin() -> Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            out,
            EnterAlternateScreen,
            DisableLineWrap,
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        let (cols, rows) = terminal::size()?;
        let mut screen = Self {
            out,
            cols: 0,
            rows: 0,
            prev: Vec::new(),
            next: Vec::new(),
        };
        screen.fit(cols, rows)?;
        Ok(screen)
    }

    fn fit(&mut self, cols: u16, rows: u16) -> Result<()> {
        self.cols = cols;
        self.rows = rows;
        let n = cols as usize * self.canvas_rows() as usize;
        self.prev = vec![None; n];
        self.next = vec![Cell::blank(); n];
        execute!(self.out, Clear(ClearType::All))?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> Result<bool> {
        let (cols, rows) = terminal::size()?;
        if (cols, rows) != (self.cols, self.rows) {
            self.fit(cols, rows)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn canvas_rows(&self) -> u16 {
        self.rows.saturating_sub(HUD_ROWS)
    }

    /// Drawable area in frame pixels (two per cell vertically).
    pub(crate) fn pixel_size(&self) -> (usize, usize) {
        (self.cols as usize, self.canvas_rows() as usize * 2)
    }

    /// Blits `frame` into the canvas area and redraws changed cells plus the HUD.
    pub(crate) fn present(&mut self, frame: &RgbaFrame, zoom: u32, hud: [&str; 2]) -> Result<()> {
        let (pw, ph) = self.pixel_size();
        let src = (frame.width, frame.height);
        let at = place(src, (pw, ph), zoom);
        let sample = |x: usize, y: usize| -> Rgb {
            at.source(x, y, src)
                .map_or(BACKGROUND, |(sx, sy)| frame.get(sx, sy))
        };

        let cols = self.cols as usize;
        for cy in 0..self.canvas_rows() as usize {
            for cx in 0..cols {
                self.next[cx + cy * cols] = Cell {
                    top: sample(cx, cy * 2),
                    bottom: sample(cx, cy * 2 + 1),
                };
            }
        }

        queue!(self.out, BeginSynchronizedUpdate)?;
        self.flush_cells()?;
        queue!(self.out, ResetColor)?;
        for (row, line) in hud.iter().enumerate() {
            let text: String = line.chars().take(cols).collect();
            let pad = cols.saturating_sub(text.chars().count());
            queue!(
                self.out,
                cursor::MoveTo(0, row as u16),
                Print(text),
                Print(" ".repeat(pad))
            )?;
        }
        queue!(self.out, EndSynchronizedUpdate)?;
        self.out.flush()?;
        Ok(())
    }

    fn flush_cells(&mut self) -> io::Result<()> {
        let cols = self.cols as usize;
        let mut last: Option<Cell> = None;
        for (i, cell) in self.next.iter().enumerate() {
            if self.prev[i] == Some(*cell) {
                continue;
            }
            let (x, y) = ((i % cols) as u16, (i / cols) as u16 + HUD_ROWS);
            queue!(self.out, cursor::MoveTo(x, y))?;
            if last.map(|c| c.top) != Some(cell.top) {
                queue!(self.out, SetForegroundColor(color(cell.top)))?;
            }
            if last.map(|c| c.bottom) != Some(cell.bottom) {
                queue!(self.out, SetBackgroundColor(color(cell.bottom)))?;
            }
            queue!(self.out, Print(UPPER_HALF))?;
            last = Some(*cell);
            self.prev[i] = Some(*cell);
        }
        Ok(())
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            EndSynchronizedUpdate,
            ResetColor,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}
