// Copyright (c) 2026 rezky_nightky

use crate::runtime::SpeedMode;

const SPARSE_PER_COL: f32 = 0.75;
const DENSE_PER_COL: f32 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Density {
    pub count: usize,
    pub mode: SpeedMode,
}

/// Cramped terminals (short and wide, or small both ways) get slower,
/// sparser rain; everything else gets the fast, dense kind.
pub fn density_for(width: u16, height: u16) -> Density {
    let cramped = (height < 20 && width > 100) || (width < 100 && height < 40);
    let (per_col, mode) = if cramped {
        (SPARSE_PER_COL, SpeedMode::Slow)
    } else {
        (DENSE_PER_COL, SpeedMode::Normal)
    };
    Density {
        count: (width as f32 * per_col).round() as usize,
        mode,
    }
}
