/// Numeric conversion helpers.
///
/// This module provides safe functions for converting between the integer
/// types used by the language (`i64` literals) and the index and weight types
/// used by structure backends (`usize`, `f64`). Every helper returns a
/// `Result`, which is `Ok` when the conversion is lossless and an error
/// otherwise.
pub mod num;
/// Deterministic pseudo-random stream.
///
/// Backs the `random(min, max)` value form. A stream can be seeded for
/// reproducible runs or seeded from the clock for interactive use.
pub mod rng;
