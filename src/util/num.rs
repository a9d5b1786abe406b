/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;

/// Safely converts an `i64` to `f64` if and only if it is exactly
/// representable.
///
/// ## Errors
/// Returns `Err(error)` if the value exceeds `MAX_SAFE_U64_INT` in absolute
/// value.
///
/// ## Example
/// ```
/// use dsviz::util::num::{MAX_SAFE_U64_INT, i64_to_f64_checked};
///
/// assert_eq!(i64_to_f64_checked(42, "too big!"), Ok(42.0));
///
/// let big = MAX_SAFE_U64_INT as i64 + 1;
/// assert!(i64_to_f64_checked(big, "too big!").is_err());
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn i64_to_f64_checked<E>(value: i64, error: E) -> Result<f64, E> {
    if value.unsigned_abs() > MAX_SAFE_U64_INT {
        return Err(error);
    }
    Ok(value as f64)
}

/// Converts a `usize` count to `f64`, failing when precision would be lost.
///
/// ## Example
/// ```
/// use dsviz::util::num::usize_to_f64_checked;
///
/// assert_eq!(usize_to_f64_checked(11, ()), Ok(11.0));
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn usize_to_f64_checked<E>(value: usize, error: E) -> Result<f64, E> {
    match u64::try_from(value) {
        Ok(v) if v <= MAX_SAFE_U64_INT => Ok(value as f64),
        _ => Err(error),
    }
}

/// Converts a signed literal into a container index.
///
/// Negative values and values that do not fit into `usize` are rejected.
///
/// ## Errors
/// Returns `Err(error)` for negative or oversized values.
///
/// ## Example
/// ```
/// use dsviz::util::num::i64_to_usize_checked;
///
/// assert_eq!(i64_to_usize_checked(3, "bad index"), Ok(3));
/// assert_eq!(i64_to_usize_checked(-1, "bad index"), Err("bad index"));
/// ```
pub fn i64_to_usize_checked<E>(value: i64, error: E) -> Result<usize, E> {
    usize::try_from(value).map_err(|_| error)
}

/// Converts a container index or size back into the language's integer type.
///
/// ## Example
/// ```
/// use dsviz::util::num::usize_to_i64_checked;
///
/// assert_eq!(usize_to_i64_checked(7, ()), Ok(7));
/// ```
pub fn usize_to_i64_checked<E>(value: usize, error: E) -> Result<i64, E> {
    i64::try_from(value).map_err(|_| error)
}

/// Safely converts an `f64` to `i64` if the value is finite, within range, and
/// not fractional.
///
/// ## Errors
/// Returns `Err(error)` for non-finite, out-of-range, or fractional values.
///
/// ## Example
/// ```
/// use dsviz::util::num::f64_to_i64_checked;
///
/// assert_eq!(f64_to_i64_checked(1000.0, ()), Ok(1000));
/// assert!(f64_to_i64_checked(1.5, ()).is_err());
/// assert!(f64_to_i64_checked(1e20, ()).is_err());
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn f64_to_i64_checked<E>(value: f64, error: E) -> Result<i64, E> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(error);
    }
    if value.abs() > MAX_SAFE_U64_INT as f64 {
        return Err(error);
    }
    Ok(value as i64)
}
