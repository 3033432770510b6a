// Copyright (c) 2026 rezky_nightky

use std::env;

use crossterm::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

impl ColorMode {
    pub fn label(self) -> &'static str {
        match self {
            ColorMode::TrueColor => "24-bit truecolor",
            ColorMode::Color256 => "8-bit (256-color)",
            ColorMode::Color16 => "16-color",
            ColorMode::Mono => "mono",
        }
    }
}

/// Guesses the color depth from `COLORTERM` and `TERM`.
pub fn detect_color_mode() -> ColorMode {
    color_mode_from(
        &env::var("COLORTERM").unwrap_or_default(),
        &env::var("TERM").unwrap_or_default(),
    )
}

fn color_mode_from(colorterm: &str, term: &str) -> ColorMode {
    let colorterm = colorterm.to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = term.to_ascii_lowercase();
    match term.as_str() {
        "dumb" => ColorMode::Mono,
        "linux" => ColorMode::Color16,
        _ => ColorMode::Color256,
    }
}

const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

const SYSTEM_COLORS: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (128, 0, 0),
    (0, 128, 0),
    (128, 128, 0),
    (0, 0, 128),
    (128, 0, 128),
    (0, 128, 128),
    (192, 192, 192),
    (128, 128, 128),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (0, 0, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

/// xterm's default RGB for a 256-color index.
fn ansi256_to_rgb(idx: u8) -> (u8, u8, u8) {
    match idx {
        0..=15 => SYSTEM_COLORS[idx as usize],
        16..=231 => {
            let i = idx - 16;
            (
                CUBE_LEVELS[(i / 36) as usize],
                CUBE_LEVELS[((i / 6) % 6) as usize],
                CUBE_LEVELS[(i % 6) as usize],
            )
        }
        _ => {
            let v = 8 + 10 * (idx - 232);
            (v, v, v)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    mode: ColorMode,
}

impl Palette {
    pub fn new(mode: ColorMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Number of addressable color indices.
    pub fn color_count(&self) -> u16 {
        match self.mode {
            ColorMode::Mono => 0,
            ColorMode::Color16 => 16,
            ColorMode::Color256 | ColorMode::TrueColor => 256,
        }
    }

    pub fn color(&self, idx: u8) -> Color {
        match self.mode {
            ColorMode::TrueColor => {
                let (r, g, b) = ansi256_to_rgb(idx);
                Color::Rgb { r, g, b }
            }
            _ => Color::AnsiValue(idx),
        }
    }
}
