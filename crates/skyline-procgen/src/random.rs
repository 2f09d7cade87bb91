//! Deterministic seeded random streams.
//!
//! Provides the world [`Seed`] (integer or text), the cyrb128 string hash used
//! to fold text seeds into 32 bits, and [`SeededRandom`], a Mulberry32 stream.
//! Both algorithms are frozen: changing a constant here changes every world.

use std::fmt;

use rand::RngCore;

// ---------------------------------------------------------------------------
// Seed
// ---------------------------------------------------------------------------

/// Input seed for a world. Any value is valid, including the empty string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Seed {
    /// Numeric seed, truncated modulo 2^32.
    Integer(i64),
    /// Text seed, hashed with [`cyrb128`].
    Text(String),
}

impl Seed {
    /// Fold the seed into the 32-bit initial state of a [`SeededRandom`].
    pub fn to_state(&self) -> u32 {
        match self {
            Seed::Integer(value) => *value as u32,
            Seed::Text(text) => cyrb128(text),
        }
    }
}

impl From<&str> for Seed {
    fn from(text: &str) -> Self {
        Seed::Text(text.to_owned())
    }
}

impl From<String> for Seed {
    fn from(text: String) -> Self {
        Seed::Text(text)
    }
}

impl From<&Seed> for Seed {
    fn from(seed: &Seed) -> Self {
        seed.clone()
    }
}

impl From<i64> for Seed {
    fn from(value: i64) -> Self {
        Seed::Integer(value)
    }
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Seed::Integer(i64::from(value))
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seed::Integer(value) => write!(f, "{value}"),
            Seed::Text(text) => write!(f, "{text:?}"),
        }
    }
}

/// Hash a string into 32 bits with cyrb128.
///
/// Operates on UTF-16 code units and folds the four 32-bit lanes together
/// with XOR.
pub fn cyrb128(text: &str) -> u32 {
    let mut h1: u32 = 1_779_033_703;
    let mut h2: u32 = 3_144_134_277;
    let mut h3: u32 = 1_013_904_242;
    let mut h4: u32 = 2_773_480_762;

    for unit in text.encode_utf16() {
        let k = u32::from(unit);
        h1 = h2 ^ (h1 ^ k).wrapping_mul(597_399_067);
        h2 = h3 ^ (h2 ^ k).wrapping_mul(2_869_860_233);
        h3 = h4 ^ (h3 ^ k).wrapping_mul(951_274_213);
        h4 = h1 ^ (h4 ^ k).wrapping_mul(2_716_044_179);
    }

    h1 = (h3 ^ (h1 >> 18)).wrapping_mul(597_399_067);
    h2 = (h4 ^ (h2 >> 22)).wrapping_mul(2_869_860_233);
    h3 = (h1 ^ (h3 >> 17)).wrapping_mul(951_274_213);
    h4 = (h2 ^ (h4 >> 19)).wrapping_mul(2_716_044_179);

    h1 ^ h2 ^ h3 ^ h4
}

// ---------------------------------------------------------------------------
// Stream
// ---------------------------------------------------------------------------

/// Mulberry32 pseudo-random stream.
///
/// Every draw mutates the state; there is no way to rewind or reseed a live
/// stream. Subsystems that need randomness own their own instance.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    const INCREMENT: u32 = 0x6D2B_79F5;
    const SCALE: f64 = 4_294_967_296.0;

    /// Create a stream from any seed.
    pub fn new(seed: impl Into<Seed>) -> Self {
        Self::from_state(seed.into().to_state())
    }

    /// Create a stream from an already-folded 32-bit state.
    pub fn from_state(state: u32) -> Self {
        Self { state }
    }

    /// Current internal state.
    pub fn state(&self) -> u32 {
        self.state
    }

    fn step(&mut self) -> u32 {
        self.state = self.state.wrapping_add(Self::INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next value in `[0, 1)`.
    pub fn next_float(&mut self) -> f64 {
        f64::from(self.step()) / Self::SCALE
    }

    /// Next integer in `[min, max)`.
    pub fn next_int(&mut self, min: i32, max: i32) -> i32 {
        let span = f64::from(max) - f64::from(min);
        (self.next_float() * span).floor() as i32 + min
    }

    /// Next float in `[min, max)`.
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        self.next_float() * (max - min) + min
    }

    /// Pick one element uniformly. Returns `None` for an empty slice without
    /// consuming a draw.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.next_int(0, items.len() as i32) as usize;
        items.get(index)
    }
}

impl RngCore for SeededRandom {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let low = u64::from(self.step());
        let high = u64::from(self.step());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
