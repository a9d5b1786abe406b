//! SplitMix64 random stream.
//!
//! The stream is tiny, portable and reproducible: two streams created from
//! the same seed produce the same sequence on every platform. Interpreters
//! seed one from the clock unless the caller asks for a fixed seed.

use std::time::{SystemTime, UNIX_EPOCH};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// A deterministic pseudo-random number stream.
///
/// Each call to a generation method advances the stream state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomStream {
    state: u64,
}

impl RandomStream {
    /// Creates a stream from a fixed seed.
    ///
    /// SplitMix64 needs a non-zero state, so a zero seed is replaced by the
    /// golden-ratio gamma.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        let state = if seed == 0 { GOLDEN_GAMMA } else { seed };
        Self { state }
    }

    /// Creates a stream seeded from the system clock.
    #[must_use]
    pub fn from_clock() -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH)
                                     .map_or(0, |d| d.as_secs() ^ u64::from(d.subsec_nanos()) << 32);
        Self::new(splitmix64_mix(nanos))
    }

    /// Generates the next raw 64-bit value.
    pub const fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        splitmix64_mix(self.state)
    }

    /// Draws an integer uniformly from `[min, max]`, both ends included.
    ///
    /// Uses rejection sampling, so every value in the range is equally
    /// likely even when the span does not divide `2^64`.
    ///
    /// # Returns
    /// - `Some(v)` with `min <= v <= max`.
    /// - `None` when `min > max`.
    ///
    /// # Example
    /// ```
    /// use dsviz::util::rng::RandomStream;
    ///
    /// let mut rng = RandomStream::new(7);
    /// for _ in 0..100 {
    ///     let v = rng.range_inclusive(-3, 3).unwrap();
    ///     assert!((-3..=3).contains(&v));
    /// }
    /// assert_eq!(rng.range_inclusive(5, 4), None);
    /// assert_eq!(rng.range_inclusive(9, 9), Some(9));
    /// ```
    pub fn range_inclusive(&mut self, min: i64, max: i64) -> Option<i64> {
        if min > max {
            return None;
        }
        let span = i128::from(max) - i128::from(min) + 1;
        let Ok(span) = u64::try_from(span) else {
            // The span is exactly 2^64: every raw value maps to one result.
            let offset = i128::from(self.next_u64());
            return i64::try_from(i128::from(min) + offset).ok();
        };
        let rejected = (u64::MAX % span + 1) % span;
        let limit = u64::MAX - rejected;
        loop {
            let raw = self.next_u64();
            if raw <= limit {
                return i64::try_from(i128::from(min) + i128::from(raw % span)).ok();
            }
        }
    }
}

const fn splitmix64_mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
