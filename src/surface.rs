// Copyright (c) 2026 rezky_nightky

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossterm::event::KeyEvent;

/// Pending-resize mailbox. Raised from anywhere (a signal handler, the
/// input poll); taken only by the render loop.
#[derive(Clone, Debug, Default)]
pub struct ResizeFlag(Arc<AtomicBool>);

impl ResizeFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Reads and clears in one step so a raise racing with the read is
    /// never lost.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    #[allow(dead_code)]
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// The raw flag, for registration with `signal_hook::flag`.
    #[cfg(unix)]
    pub fn shared(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}

/// Everything the render loop needs from a terminal.
///
/// Cell writes take `(row, col)` and must ignore coordinates outside the
/// current size: drops sized for a larger screen can still be in flight
/// right after a shrink.
pub trait Surface {
    /// Current `(width, height)`.
    fn size(&self) -> (u16, u16);

    /// Number of color indices `put` accepts.
    fn colors(&self) -> u16;

    /// Whether a resize was signalled since the last call. Clears the signal.
    fn take_resized(&mut self) -> bool;

    /// Re-queries the real dimensions and reallocates for them.
    fn reset(&mut self) -> io::Result<(u16, u16)>;

    /// Next pressed key, if one is waiting. Never blocks.
    fn poll_key(&mut self) -> io::Result<Option<KeyEvent>>;

    fn put(&mut self, row: u16, col: u16, glyph: char, color: u8);

    /// Plain text in the default color, clipped at the right edge.
    fn print(&mut self, row: u16, col: u16, text: &str);

    /// Pushes everything written since the last present to the screen.
    fn present(&mut self) -> io::Result<()>;

    /// Blanks the drawing area for the next frame's writes.
    fn erase(&mut self);
}
