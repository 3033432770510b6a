// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::droplet::{Droplet, Field};
use crate::error::RainError;

/// All droplets of one epoch. Rebuilt wholesale on resize.
#[derive(Clone, Debug, Default)]
pub struct DropPool {
    droplets: Vec<Droplet>,
}

impl DropPool {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, count: usize, field: &Field) -> Self {
        let mut pool = Self::default();
        pool.resize(rng, count, field);
        pool
    }

    /// Drops every droplet and builds `count` fresh ones for `field`.
    pub fn resize<R: Rng + ?Sized>(&mut self, rng: &mut R, count: usize, field: &Field) {
        self.droplets.clear();
        self.droplets.reserve(count);
        for _ in 0..count {
            self.droplets.push(Droplet::new(rng, field));
        }
    }

    pub fn len(&self) -> usize {
        self.droplets.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.droplets.is_empty()
    }

    #[allow(dead_code)]
    pub fn get(&self, index: usize) -> Result<&Droplet, RainError> {
        let len = self.droplets.len();
        self.droplets
            .get(index)
            .ok_or(RainError::OutOfRange { index, len })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Droplet, RainError> {
        let len = self.droplets.len();
        self.droplets
            .get_mut(index)
            .ok_or(RainError::OutOfRange { index, len })
    }

    #[allow(dead_code)]
    pub fn iter(&self) -> impl Iterator<Item = &Droplet> {
        self.droplets.iter()
    }
}
