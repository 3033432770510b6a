// Copyright (c) 2026 rezky_nightky

use std::ops::RangeInclusive;

/// Fall-speed tier picked by the density policy for one epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedMode {
    Slow,
    Normal,
}

impl SpeedMode {
    pub fn speeds(self) -> RangeInclusive<u16> {
        match self {
            SpeedMode::Slow => 1..=3,
            SpeedMode::Normal => 1..=6,
        }
    }

    /// Speeds below this draw the `'|'` glyph, the rest draw `':'`.
    pub fn glyph_threshold(self) -> u16 {
        match self {
            SpeedMode::Slow => 2,
            SpeedMode::Normal => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Resizing,
    Terminated,
}
