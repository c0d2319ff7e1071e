//! Seedable uniform random source for throw vectors and tear jitter.
//! Uses SplitMix64 to mix the seed and xorshift64* for the stream, so a
//! fixed seed replays the exact same animation in tests.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};

/// Anything that can hand out uniform floats in a closed range.
pub trait UniformRandom {
    fn uniform(&mut self, min: f32, max: f32) -> f32;
}

#[derive(Debug, Clone, Copy)]
pub struct TearRng {
    state: u64,
}

impl TearRng {
    pub fn with_seed(seed: u64) -> Self {
        // xorshift cycles on zero state, so nudge it off.
        Self {
            state: splitmix64(seed).max(1),
        }
    }

    /// Seeds from the process's hash randomness; good enough for visuals.
    pub fn from_entropy() -> Self {
        Self::with_seed(RandomState::new().build_hasher().finish())
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        // xorshift64*
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(2685821657736338717)
    }

    #[inline]
    fn next_f32_01(&mut self) -> f32 {
        // 24-bit mantissa precision uniform in [0,1)
        let v = ((self.next_u64() >> 40) & 0xFF_FFFF) as f32;
        v / (1u32 << 24) as f32
    }
}

impl UniformRandom for TearRng {
    #[inline]
    fn uniform(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32_01()
    }
}

#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z ^= z >> 30;
    z = z.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z ^= z >> 27;
    z = z.wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
