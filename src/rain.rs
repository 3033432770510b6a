// Copyright (c) 2026 rezky_nightky

use std::thread;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::Rng;

use crate::clock::{local_clock_text, overlay_origin};
use crate::density::density_for;
use crate::droplet::Field;
use crate::error::RainError;
use crate::pool::DropPool;
use crate::runtime::LoopState;
use crate::surface::Surface;

/// Loop knobs fixed for the whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub frame_delay: Duration,
    pub quit_key: char,
}

/// The render loop: owns the surface, the RNG and the current epoch's pool.
pub struct Rain<S, R> {
    surface: S,
    rng: R,
    settings: Settings,
    field: Field,
    pool: DropPool,
    state: LoopState,
    clock: fn() -> String,
}

impl<S: Surface, R: Rng> Rain<S, R> {
    pub fn new(surface: S, mut rng: R, settings: Settings) -> Self {
        let (width, height) = surface.size();
        let density = density_for(width, height);
        let field = Field {
            width,
            height,
            mode: density.mode,
            colors: surface.colors(),
        };
        let pool = DropPool::new(&mut rng, density.count, &field);
        Self {
            surface,
            rng,
            settings,
            field,
            pool,
            state: LoopState::Running,
            clock: local_clock_text,
        }
    }

    #[cfg(test)]
    fn with_clock(mut self, clock: fn() -> String) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    #[allow(dead_code)]
    pub fn pool(&self) -> &DropPool {
        &self.pool
    }

    #[allow(dead_code)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Runs frames until the quit key arrives.
    pub fn run(&mut self) -> Result<(), RainError> {
        while self.step()? != LoopState::Terminated {}
        Ok(())
    }

    /// One pass of the loop. A pending resize is handled on its own two
    /// passes (`Running -> Resizing -> Running`) and never draws, so no
    /// frame is ever rendered from a pool built for stale dimensions.
    pub fn step(&mut self) -> Result<LoopState, RainError> {
        match self.state {
            LoopState::Terminated => {}
            LoopState::Resizing => {
                self.rebuild()?;
                self.state = LoopState::Running;
            }
            LoopState::Running => {
                if self.surface.take_resized() {
                    self.state = LoopState::Resizing;
                } else {
                    self.frame()?;
                }
            }
        }
        Ok(self.state)
    }

    /// Starts a new epoch sized for whatever the terminal is now.
    fn rebuild(&mut self) -> Result<(), RainError> {
        let (width, height) = self.surface.reset()?;
        let density = density_for(width, height);
        self.field = Field {
            width,
            height,
            mode: density.mode,
            colors: self.surface.colors(),
        };
        self.pool.resize(&mut self.rng, density.count, &self.field);
        Ok(())
    }

    fn frame(&mut self) -> Result<(), RainError> {
        for i in 0..self.pool.len() {
            let droplet = self.pool.get_mut(i)?;
            droplet.advance(&mut self.rng, self.field.height);
            droplet.draw(&mut self.surface);
        }
        self.draw_clock();
        self.surface.present()?;

        if !self.settings.frame_delay.is_zero() {
            thread::sleep(self.settings.frame_delay);
        }

        if let Some(key) = self.surface.poll_key()? {
            if is_quit(&key, self.settings.quit_key) {
                self.state = LoopState::Terminated;
                return Ok(());
            }
        }

        self.surface.erase();
        Ok(())
    }

    fn draw_clock(&mut self) {
        let text = (self.clock)();
        let (row, col) = overlay_origin(self.field.width, self.field.height, text.chars().count());
        self.surface.print(row, col, &text);
    }
}

/// The configured key, or Ctrl-C (raw mode swallows SIGINT).
fn is_quit(key: &KeyEvent, quit_key: char) -> bool {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
        KeyCode::Char(c) => c == quit_key,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::droplet::PALETTE_COLORS;
    use crate::runtime::SpeedMode;
    use crate::surface::ResizeFlag;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Op {
        Put { row: u16, col: u16, glyph: char },
        Print { row: u16, col: u16, text: String },
        Present,
        Erase,
        Reset,
    }

    /// In-memory surface that records every call.
    struct FakeSurface {
        size: (u16, u16),
        real_size: (u16, u16),
        resize: ResizeFlag,
        keys: VecDeque<KeyEvent>,
        ops: Vec<Op>,
    }

    impl FakeSurface {
        fn new(width: u16, height: u16) -> Self {
            Self {
                size: (width, height),
                real_size: (width, height),
                resize: ResizeFlag::new(),
                keys: VecDeque::new(),
                ops: Vec::new(),
            }
        }

        fn puts_since_last_reset(&self) -> usize {
            let start = self
                .ops
                .iter()
                .rposition(|op| *op == Op::Reset)
                .map(|i| i + 1)
                .unwrap_or(0);
            self.ops[start..]
                .iter()
                .filter(|op| matches!(op, Op::Put { .. }))
                .count()
        }
    }

    impl Surface for FakeSurface {
        fn size(&self) -> (u16, u16) {
            self.size
        }

        fn colors(&self) -> u16 {
            PALETTE_COLORS
        }

        fn take_resized(&mut self) -> bool {
            self.resize.take()
        }

        fn reset(&mut self) -> io::Result<(u16, u16)> {
            self.size = self.real_size;
            self.ops.push(Op::Reset);
            Ok(self.size)
        }

        fn poll_key(&mut self) -> io::Result<Option<KeyEvent>> {
            Ok(self.keys.pop_front())
        }

        fn put(&mut self, row: u16, col: u16, glyph: char, _color: u8) {
            if row < self.size.1 && col < self.size.0 {
                self.ops.push(Op::Put { row, col, glyph });
            }
        }

        fn print(&mut self, row: u16, col: u16, text: &str) {
            self.ops.push(Op::Print {
                row,
                col,
                text: text.to_string(),
            });
        }

        fn present(&mut self) -> io::Result<()> {
            self.ops.push(Op::Present);
            Ok(())
        }

        fn erase(&mut self) {
            self.ops.push(Op::Erase);
        }
    }

    fn fixed_clock() -> String {
        "01/02/2025 03:04:05".to_string()
    }

    fn settings() -> Settings {
        Settings {
            frame_delay: Duration::ZERO,
            quit_key: 'q',
        }
    }

    fn rain(width: u16, height: u16) -> Rain<FakeSurface, StdRng> {
        Rain::new(
            FakeSurface::new(width, height),
            StdRng::seed_from_u64(2024),
            settings(),
        )
        .with_clock(fixed_clock)
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn initial_pool_follows_density_policy() {
        let r = rain(200, 10);
        assert_eq!(r.pool().len(), 150);
        assert_eq!(r.field.mode, SpeedMode::Slow);

        let r = rain(120, 50);
        assert_eq!(r.pool().len(), 180);
        assert_eq!(r.field.mode, SpeedMode::Normal);
    }

    #[test]
    fn frame_draws_every_droplet_then_clock_then_presents_then_erases() {
        let mut r = rain(120, 50);
        assert_eq!(r.step().unwrap(), LoopState::Running);

        let ops = &r.surface().ops;
        let puts = ops.iter().filter(|op| matches!(op, Op::Put { .. })).count();
        assert_eq!(puts, 180);
        assert_eq!(
            ops[puts],
            Op::Print {
                row: 25,
                col: 50,
                text: fixed_clock()
            }
        );
        assert_eq!(&ops[puts + 1..], &[Op::Present, Op::Erase]);
    }

    #[test]
    fn drawn_positions_match_advanced_droplets() {
        let mut r = rain(60, 30);
        r.step().unwrap();
        let drawn: Vec<(u16, u16, char)> = r
            .surface()
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Put { row, col, glyph } => Some((*row, *col, *glyph)),
                _ => None,
            })
            .collect();
        let expected: Vec<(u16, u16, char)> = r
            .pool()
            .iter()
            .map(|d| (d.row(), d.col(), d.glyph()))
            .collect();
        assert_eq!(drawn, expected);
    }

    #[test]
    fn quit_key_terminates_without_erasing_last_frame() {
        let mut r = rain(80, 30);
        r.surface.keys.push_back(key('q'));
        assert_eq!(r.step().unwrap(), LoopState::Terminated);
        assert_eq!(r.surface().ops.last(), Some(&Op::Present));

        let before = r.surface().ops.len();
        assert_eq!(r.step().unwrap(), LoopState::Terminated);
        assert_eq!(r.surface().ops.len(), before);
    }

    #[test]
    fn other_keys_keep_running() {
        let mut r = rain(80, 30);
        r.surface.keys.push_back(key('x'));
        assert_eq!(r.step().unwrap(), LoopState::Running);
        assert_eq!(r.surface().ops.last(), Some(&Op::Erase));
    }

    #[test]
    fn custom_quit_key_and_ctrl_c() {
        let mut r = Rain::new(
            FakeSurface::new(40, 20),
            StdRng::seed_from_u64(1),
            Settings {
                frame_delay: Duration::ZERO,
                quit_key: 'x',
            },
        )
        .with_clock(fixed_clock);
        r.surface.keys.push_back(key('q'));
        assert_eq!(r.step().unwrap(), LoopState::Running);
        r.surface.keys.push_back(key('x'));
        assert_eq!(r.step().unwrap(), LoopState::Terminated);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(is_quit(&ctrl_c, 'q'));
        assert!(!is_quit(&key('c'), 'q'));
        assert!(!is_quit(&KeyEvent::from(KeyCode::Esc), 'q'));
    }

    #[test]
    fn run_stops_on_quit() {
        let mut r = rain(50, 20);
        for _ in 0..5 {
            r.surface.keys.push_back(key('a'));
        }
        r.surface.keys.push_back(key('q'));
        r.run().unwrap();
        assert_eq!(r.state(), LoopState::Terminated);
        let presents = r
            .surface()
            .ops
            .iter()
            .filter(|op| **op == Op::Present)
            .count();
        assert_eq!(presents, 6);
    }

    #[test]
    fn resize_rebuilds_pool_before_any_new_frame() {
        let mut r = rain(120, 50);
        r.step().unwrap();
        assert_eq!(r.pool().len(), 180);

        r.surface.real_size = (80, 30);
        r.surface.resize.raise();
        let ops_before = r.surface().ops.len();

        assert_eq!(r.step().unwrap(), LoopState::Resizing);
        assert_eq!(r.pool().len(), 180);
        assert_eq!(r.surface().ops.len(), ops_before);
        assert!(!r.surface.resize.is_raised());

        assert_eq!(r.step().unwrap(), LoopState::Running);
        assert_eq!(r.pool().len(), 60);
        assert_eq!(r.field.mode, SpeedMode::Slow);
        assert_eq!(r.surface().ops.last(), Some(&Op::Reset));

        r.step().unwrap();
        assert_eq!(r.surface().puts_since_last_reset(), 60);
        assert!(r.pool().iter().all(|d| d.col() < 80));
    }

    #[test]
    fn resize_raised_during_rebuild_is_kept() {
        let mut r = rain(120, 50);
        r.surface.resize.raise();
        assert_eq!(r.step().unwrap(), LoopState::Resizing);
        r.surface.resize.raise();
        assert_eq!(r.step().unwrap(), LoopState::Running);
        assert_eq!(r.step().unwrap(), LoopState::Resizing);
    }

    #[test]
    fn shrink_to_nothing_draws_only_clock() {
        let mut r = rain(120, 50);
        r.surface.real_size = (0, 0);
        r.surface.resize.raise();
        r.step().unwrap();
        r.step().unwrap();
        assert!(r.pool().is_empty());

        r.step().unwrap();
        assert_eq!(r.surface().puts_since_last_reset(), 0);
    }
}
