// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, IsTerminal, Result, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyEvent, KeyEventKind},
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::droplet::PALETTE_COLORS;
use crate::error::RainError;
use crate::frame::Frame;
use crate::palette::Palette;
use crate::surface::{ResizeFlag, Surface};

/// What the screen showed after the last draw.
struct LastFrame {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl LastFrame {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width as usize * height as usize],
        }
    }
}

/// Raw-mode, alternate-screen terminal. Restores the user's terminal on drop.
pub struct Terminal {
    stdout: Stdout,
    palette: Palette,
    resize: ResizeFlag,
    frame: Frame,
    last: Option<LastFrame>,
    run_buf: String,
    row_dirty: Vec<Vec<usize>>,
    touched_rows: Vec<u16>,
}

impl Terminal {
    pub fn acquire(palette: Palette, resize: ResizeFlag) -> std::result::Result<Self, RainError> {
        let mut out = stdout();
        if !out.is_terminal() {
            return Err(RainError::unavailable("stdout is not a terminal"));
        }
        if palette.color_count() < PALETTE_COLORS {
            return Err(RainError::unavailable(format!(
                "can't have colors: {} palette, need {}",
                palette.mode().label(),
                PALETTE_COLORS
            )));
        }

        terminal::enable_raw_mode()
            .map_err(|e| RainError::unavailable(format!("can't enter raw mode: {}", e)))?;
        let init_res: std::result::Result<(u16, u16), RainError> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)
                .map_err(|e| RainError::unavailable(format!("can't hide cursor: {}", e)))?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            terminal::size().map_err(RainError::from)
        })();
        let (width, height) = match init_res {
            Ok(size) => size,
            Err(e) => {
                restore_terminal_best_effort();
                return Err(e);
            }
        };

        Ok(Self {
            stdout: out,
            palette,
            resize,
            frame: Frame::new(width, height),
            last: None,
            run_buf: String::with_capacity(64),
            row_dirty: Vec::new(),
            touched_rows: Vec::new(),
        })
    }

    fn queue_fg(&mut self, fg: Option<Color>) -> Result<()> {
        self.stdout
            .queue(SetForegroundColor(fg.unwrap_or(Color::Reset)))?;
        Ok(())
    }

    /// Repaints every cell of the back buffer.
    fn draw_full(&mut self) -> Result<()> {
        let (width, height) = (self.frame.width, self.frame.height);
        let stale = self
            .last
            .as_ref()
            .map(|l| l.width != width || l.height != height)
            .unwrap_or(true);
        if stale {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.last = Some(LastFrame::new(width, height));
        }

        let mut cur_fg: Option<Option<Color>> = None;
        for y in 0..height {
            self.stdout.queue(cursor::MoveTo(0, y))?;
            for x in 0..width {
                let idx = y as usize * width as usize + x as usize;
                let cell = self.frame.cell_at_index(idx);
                if cur_fg != Some(cell.fg) {
                    self.queue_fg(cell.fg)?;
                    cur_fg = Some(cell.fg);
                }
                self.stdout.queue(Print(cell.ch))?;
                if let Some(last) = self.last.as_mut() {
                    last.cells[idx] = cell;
                }
            }
        }
        Ok(())
    }

    /// Writes only cells that differ from the screen, merging horizontal
    /// runs of one color into a single print.
    fn draw_dirty(&mut self) -> Result<()> {
        let width = self.frame.width;
        let height = self.frame.height;
        let width_usize = width as usize;

        if self.row_dirty.len() != height as usize {
            self.row_dirty = vec![Vec::new(); height as usize];
        }
        self.touched_rows.clear();
        for &idx in self.frame.dirty_indices() {
            let y = (idx / width_usize) as u16;
            if y >= height {
                continue;
            }
            let bucket = &mut self.row_dirty[y as usize];
            if bucket.is_empty() {
                self.touched_rows.push(y);
            }
            bucket.push(idx);
        }
        self.touched_rows.sort_unstable();

        let Some(last) = self.last.as_mut() else {
            return Ok(());
        };
        let mut cur_fg: Option<Option<Color>> = None;
        let mut cur_pos: Option<(u16, u16)> = None;

        for &y in &self.touched_rows {
            let bucket = &mut self.row_dirty[y as usize];
            bucket.sort_unstable();
            bucket.dedup();

            let mut i = 0usize;
            while i < bucket.len() {
                let idx0 = bucket[i];
                let cell0 = self.frame.cell_at_index(idx0);
                if last.cells[idx0] == cell0 {
                    i += 1;
                    continue;
                }
                last.cells[idx0] = cell0;

                self.run_buf.clear();
                self.run_buf.push(cell0.ch);
                let mut run_len: u16 = 1;
                let mut j = i + 1;
                while j < bucket.len() {
                    let idx1 = bucket[j];
                    if idx1 != bucket[j - 1] + 1 {
                        break;
                    }
                    let cell1 = self.frame.cell_at_index(idx1);
                    if last.cells[idx1] == cell1 || cell1.fg != cell0.fg {
                        break;
                    }
                    last.cells[idx1] = cell1;
                    self.run_buf.push(cell1.ch);
                    run_len = run_len.saturating_add(1);
                    j += 1;
                }

                let x0 = (idx0 % width_usize) as u16;
                if cur_pos != Some((x0, y)) {
                    self.stdout.queue(cursor::MoveTo(x0, y))?;
                }
                if cur_fg != Some(cell0.fg) {
                    self.stdout
                        .queue(SetForegroundColor(cell0.fg.unwrap_or(Color::Reset)))?;
                    cur_fg = Some(cell0.fg);
                }
                self.stdout.queue(Print(self.run_buf.as_str()))?;

                let next_x = x0.saturating_add(run_len);
                cur_pos = (next_x < width).then_some((next_x, y));
                i = j;
            }
            bucket.clear();
        }
        Ok(())
    }
}

impl Surface for Terminal {
    fn size(&self) -> (u16, u16) {
        (self.frame.width, self.frame.height)
    }

    fn colors(&self) -> u16 {
        self.palette.color_count()
    }

    fn take_resized(&mut self) -> bool {
        self.resize.take()
    }

    fn reset(&mut self) -> Result<(u16, u16)> {
        let (width, height) = terminal::size()?;
        self.stdout
            .queue(terminal::Clear(terminal::ClearType::All))?;
        self.stdout.flush()?;
        self.frame = Frame::new(width, height);
        self.last = None;
        Ok((width, height))
    }

    fn poll_key(&mut self) -> Result<Option<KeyEvent>> {
        if !event::poll(Duration::ZERO)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Resize(_, _) => {
                self.resize.raise();
                Ok(None)
            }
            Event::Key(k) if k.kind == KeyEventKind::Press => Ok(Some(k)),
            _ => Ok(None),
        }
    }

    fn put(&mut self, row: u16, col: u16, glyph: char, color: u8) {
        let fg = self.palette.color(color);
        self.frame.set(col, row, Cell::colored(glyph, fg));
    }

    fn print(&mut self, row: u16, col: u16, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            let Ok(offset) = u16::try_from(i) else {
                break;
            };
            let Some(x) = col.checked_add(offset) else {
                break;
            };
            self.frame.set(x, row, Cell::plain(ch));
        }
    }

    fn present(&mut self) -> Result<()> {
        let total = self.frame.width as usize * self.frame.height as usize;
        let dirty_is_large = total > 0 && self.frame.dirty_indices().len() >= total / 3;
        if self.last.is_none() || self.frame.is_dirty_all() || dirty_is_large {
            self.draw_full()?;
        } else {
            self.draw_dirty()?;
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        self.frame.clear_dirty();
        Ok(())
    }

    fn erase(&mut self) {
        self.frame.erase();
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.stdout.execute(SetAttribute(Attribute::Reset));
        let _ = self.stdout.execute(ResetColor);
        let _ = self.stdout.execute(terminal::Clear(terminal::ClearType::All));
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(terminal::EnableLineWrap);
        let _ = self.stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
    }
}

/// Undoes everything `Terminal::acquire` did. Safe to call from panic hooks
/// and signal threads; failures are ignored.
pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
