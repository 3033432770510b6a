// Copyright (c) 2026 rezky_nightky

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum RainError {
    /// The terminal cannot give us raw mode, a hidden cursor or enough colors.
    CapabilityUnavailable(String),
    /// Pool access outside `[0, len)`. Reaching this is a logic bug.
    OutOfRange { index: usize, len: usize },
    Io(io::Error),
}

impl RainError {
    pub fn unavailable(what: impl Into<String>) -> Self {
        RainError::CapabilityUnavailable(what.into())
    }
}

impl fmt::Display for RainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RainError::CapabilityUnavailable(what) => {
                write!(f, "terminal emulator lacks capabilities ({})", what)
            }
            RainError::OutOfRange { index, len } => {
                write!(f, "bad drop access: index {} out of range for pool of {}", index, len)
            }
            RainError::Io(e) => write!(f, "terminal i/o failed: {}", e),
        }
    }
}

impl std::error::Error for RainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RainError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RainError {
    fn from(e: io::Error) -> Self {
        RainError::Io(e)
    }
}
