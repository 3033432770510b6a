// Copyright (c) 2026 rezky_nightky

use chrono::{Local, NaiveDateTime};

pub const CLOCK_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

pub fn format_clock(t: &NaiveDateTime) -> String {
    t.format(CLOCK_FORMAT).to_string()
}

/// Current local wall-clock time, ready for the overlay.
pub fn local_clock_text() -> String {
    format_clock(&Local::now().naive_local())
}

/// `(row, col)` that centers `text_len` cells on a `width`×`height` screen.
pub fn overlay_origin(width: u16, height: u16, text_len: usize) -> (u16, u16) {
    let len = u16::try_from(text_len).unwrap_or(u16::MAX);
    (height / 2, width.saturating_sub(len) / 2)
}
