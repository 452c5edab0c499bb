//! RNG module - piece sampling
//!
//! The round engine never calls a global random function. It draws every
//! pending piece from an injected [`PieceSampler`], so hosts choose between a
//! seeded random sampler and a scripted one for deterministic tests.
//!
//! Also provides a simple LCG for deterministic seeding.

use crate::shape::{catalog, Shape};
use crate::types::{Tag, TAG_COUNT};

/// Source of new pending pieces
pub trait PieceSampler {
    /// Draw the next shape and its colour tag (tag must be non-zero)
    fn sample(&mut self) -> (&'static Shape, Tag);
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG have short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current internal state (for restarting with the same sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Uniform sampler over a shape catalog with tags in `1..=tag_count`
#[derive(Debug, Clone)]
pub struct CatalogSampler {
    rng: SimpleRng,
    shapes: &'static [Shape],
    tag_count: u8,
}

impl CatalogSampler {
    /// Sampler over the standard catalog and palette
    pub fn new(seed: u32) -> Self {
        Self::with_shapes(seed, catalog(), TAG_COUNT)
    }

    /// Sampler over a custom shape list.
    ///
    /// An empty list falls back to the standard catalog; a zero tag count is
    /// treated as one.
    pub fn with_shapes(seed: u32, shapes: &'static [Shape], tag_count: u8) -> Self {
        let shapes = if shapes.is_empty() { catalog() } else { shapes };
        Self {
            rng: SimpleRng::new(seed),
            shapes,
            tag_count: tag_count.max(1),
        }
    }
}

impl PieceSampler for CatalogSampler {
    fn sample(&mut self) -> (&'static Shape, Tag) {
        let shape = &self.shapes[self.rng.next_range(self.shapes.len() as u32) as usize];
        let tag = 1 + self.rng.next_range(self.tag_count as u32) as Tag;
        (shape, tag)
    }
}

/// Replays a fixed list of pieces, wrapping around at the end
#[derive(Debug, Clone)]
pub struct ScriptedSampler {
    script: Vec<(&'static Shape, Tag)>,
    next: usize,
}

impl ScriptedSampler {
    /// Create from a script. Zero tags are bumped to 1 so cells stay visible.
    ///
    /// Returns `None` for an empty script.
    pub fn new(script: Vec<(&'static Shape, Tag)>) -> Option<Self> {
        if script.is_empty() {
            return None;
        }
        let script = script
            .into_iter()
            .map(|(shape, tag)| (shape, tag.max(1)))
            .collect();
        Some(Self { script, next: 0 })
    }

    /// Every draw returns the same shape with tag 1
    pub fn repeat(shape: &'static Shape) -> Self {
        Self {
            script: vec![(shape, 1)],
            next: 0,
        }
    }

    /// Number of pieces drawn so far
    pub fn drawn(&self) -> usize {
        self.next
    }
}

impl PieceSampler for ScriptedSampler {
    fn sample(&mut self) -> (&'static Shape, Tag) {
        let piece = self.script[self.next % self.script.len()];
        self.next += 1;
        piece
    }
}
