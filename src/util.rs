/// Safe numeric conversion helpers.
///
/// Provides checked conversions between `i64` and `f64` that never lose
/// data silently. These back the mixed-type promotion rules of the
/// arithmetic primitives and the `convert:` family.
pub mod num;
/// Text position helpers.
///
/// Derives one-based line numbers and zero-based columns from byte indices
/// by scanning newline positions, and extracts the source line around an
/// index for error excerpts.
pub mod text;
