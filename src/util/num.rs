/// Largest unsigned integer magnitude exactly representable as an `f64`
/// (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;
/// Largest signed integer exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_I64_INT: i64 = 9_007_199_254_740_991;

/// Safely converts an `i64` to `f64` if and only if it is exactly
/// representable.
///
/// ## Errors
/// Returns `Err(error)` if the value exceeds `MAX_SAFE_U64_INT` in absolute
/// value.
///
/// ## Parameters
/// - `value`: The integer to convert.
/// - `error`: The error to return if conversion is not lossless.
///
/// ## Returns
/// - `Ok(f64)`: The converted value if it is safe.
/// - `Err(error)`: If the value is too large.
///
/// ## Example
/// ```
/// use sof::util::num::{MAX_SAFE_U64_INT, i64_to_f64_checked};
///
/// // Works for safe values
/// let result = i64_to_f64_checked(42, "too big!");
/// assert_eq!(result.unwrap(), 42.0);
///
/// // Fails for values outside safe range
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

/// Safely converts an `f64` to `i64` by truncation toward zero, if the
/// value is finite and the truncated result fits.
///
/// ## Errors
/// Returns `Err(error)` for non-finite or out-of-range values.
///
/// ## Parameters
/// - `value`: The floating-point value to convert.
/// - `error`: The error to return if conversion is impossible.
///
/// ## Returns
/// - `Ok(i64)`: The truncated value.
/// - `Err(error)`: If the value is not finite or does not fit.
///
/// ## Example
/// ```
/// use sof::util::num::f64_to_i64_checked;
///
/// assert_eq!(f64_to_i64_checked(-2.75, "bad").unwrap(), -2);
/// assert!(f64_to_i64_checked(f64::NAN, "bad").is_err());
/// assert!(f64_to_i64_checked(1e20, "bad").is_err());
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_checked<E>(value: f64, error: E) -> Result<i64, E> {
    if !value.is_finite() {
        return Err(error);
    }
    let truncated = value.trunc();
    // The upper bound is exclusive: 2^63 rounds to itself as f64 but is one
    // past i64::MAX.
    if truncated < i64::MIN as f64 || truncated >= -(i64::MIN as f64) {
        return Err(error);
    }
    Ok(truncated as i64)
}
