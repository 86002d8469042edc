//! Injected random sources.
//!
//! Every simulator takes its randomness as an argument instead of reaching
//! for a global generator. Production code passes a seeded [`SimRng`];
//! tests can pass a [`ScriptedSource`] to force exact win/loss sequences.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use std::f64::consts::PI;

const STREAM_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// A source of uniform variates in [0, 1).
pub trait UniformSource {
    /// Next uniform value in the half-open interval [0, 1).
    fn next_uniform(&mut self) -> f64;

    /// Next standard normal variate (Box-Muller on two uniforms).
    fn next_normal(&mut self) -> f64 {
        let mut u = 0.0;
        while u == 0.0 {
            u = self.next_uniform();
        }
        let v = self.next_uniform();
        (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos()
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        let idx = (self.next_uniform() * len as f64) as usize;
        idx.min(len - 1)
    }
}

impl<R: Rng> UniformSource for R {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        self.gen()
    }

    #[inline]
    fn next_normal(&mut self) -> f64 {
        StandardNormal.sample(self)
    }
}

/// Seeded generator used by the runner and the binaries.
///
/// The same seed always yields the same sequence. [`SimRng::for_stream`]
/// derives independent per-run generators from one base seed so that a
/// batch of runs is reproducible whatever order (or thread) executes it.
pub struct SimRng {
    inner: StdRng,
    seed: u64,
}

impl SimRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Generator for run `stream` of a batch seeded with `seed`.
    pub fn for_stream(seed: u64, stream: u64) -> Self {
        Self::from_seed(seed.wrapping_add(stream.wrapping_mul(STREAM_STRIDE)))
    }

    /// Seed used for initialisation.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RngCore for SimRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

/// Replays a fixed list of uniforms, cycling when exhausted.
///
/// ```
/// use odds_lab::rng::{ScriptedSource, UniformSource};
///
/// let mut always_win = ScriptedSource::constant(0.1);
/// assert_eq!(always_win.next_uniform(), 0.1);
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    /// Panics if `values` is empty.
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "scripted source needs at least one value");
        Self { values, cursor: 0 }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl UniformSource for ScriptedSource {
    fn next_uniform(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// Fisher-Yates shuffle driven by an injected source.
pub fn shuffle<T, R: UniformSource + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.next_index(i + 1);
        items.swap(i, j);
    }
}
