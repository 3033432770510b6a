// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::runtime::SpeedMode;
use crate::surface::Surface;

/// Highest row a wrapped droplet restarts from.
pub const RESPAWN_MAX_ROW: u16 = 10;

/// Palette size the speed-to-color mapping is written against (xterm 256).
pub const PALETTE_COLORS: u16 = 256;

pub const SLOW_GLYPH: char = '|';
pub const FAST_GLYPH: char = ':';

/// What a droplet needs to know about the epoch it is born into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub width: u16,
    pub height: u16,
    pub mode: SpeedMode,
    /// Number of usable color indices on the surface.
    pub colors: u16,
}

/// Maps a speed tier onto the top of the grayscale ramp: faster drops get
/// dimmer shades.
pub fn color_for_speed(speed: u16, colors: u16) -> u8 {
    let x = speed as f64;
    let raw = 255.0 + (0.0416 * (x - 4.0) * (x - 3.0) * (x - 2.0) - 4.0) * (x - 1.0);
    let max = colors.clamp(1, PALETTE_COLORS) as f64 - 1.0;
    raw.round().clamp(0.0, max) as u8
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Droplet {
    col: u16,
    row: u16,
    speed: u16,
    glyph: char,
    color: u8,
}

impl Droplet {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, field: &Field) -> Self {
        let col = rng.random_range(0..field.width.max(1));
        let row = rng.random_range(0..field.height.max(1));
        let speed = rng.random_range(field.mode.speeds());
        Self::with_speed(col, row, speed, field)
    }

    fn with_speed(col: u16, row: u16, speed: u16, field: &Field) -> Self {
        let glyph = if speed < field.mode.glyph_threshold() {
            SLOW_GLYPH
        } else {
            FAST_GLYPH
        };
        Self {
            col,
            row,
            speed,
            glyph,
            color: color_for_speed(speed, field.colors),
        }
    }

    /// Falls by `speed` rows; past the bottom it restarts near the top of
    /// the same column.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, height: u16) {
        self.row = self.row.saturating_add(self.speed);
        if self.row >= height {
            self.row = rng.random_range(0..=RESPAWN_MAX_ROW);
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.put(self.row, self.col, self.glyph, self.color);
    }
}

#[allow(dead_code)]
impl Droplet {
    pub fn col(&self) -> u16 {
        self.col
    }

    pub fn row(&self) -> u16 {
        self.row
    }

    pub fn speed(&self) -> u16 {
        self.speed
    }

    pub fn glyph(&self) -> char {
        self.glyph
    }

    pub fn color(&self) -> u8 {
        self.color
    }
}
