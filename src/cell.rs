// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    /// `None` is the terminal's default foreground.
    pub fg: Option<Color>,
}

impl Cell {
    pub const BLANK: Cell = Cell { ch: ' ', fg: None };

    pub fn plain(ch: char) -> Self {
        Self { ch, fg: None }
    }

    pub fn colored(ch: char, fg: Color) -> Self {
        Self { ch, fg: Some(fg) }
    }
}
