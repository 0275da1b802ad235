/// Computes the position of a byte index inside a piece of code.
///
/// The line number is one-based, as in text editors; the column inside the
/// line is zero-based, as in strings. Indices past the end of the code
/// report the position of the end.
///
/// ## Parameters
/// - `code`: The code the index points into.
/// - `index`: A byte index into `code`.
///
/// ## Returns
/// A `(line, column)` pair.
///
/// ## Example
/// ```
/// use sof::util::text::position_at;
///
/// assert_eq!(position_at("a b\nc d", 4), (2, 0));
/// assert_eq!(position_at("a b\nc d", 6), (2, 2));
/// ```
#[must_use]
pub fn position_at(code: &str, index: usize) -> (usize, usize) {
    let index = index.min(code.len());
    let before = &code[..index];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |p| p + 1);
    (line, index - line_start)
}

/// Extracts the full source line a byte index falls into.
///
/// The trailing newline and any carriage return are not part of the
/// returned slice.
#[must_use]
pub fn line_at(code: &str, index: usize) -> &str {
    let index = index.min(code.len());
    let start = code[..index].rfind('\n').map_or(0, |p| p + 1);
    let end = code[start..].find('\n').map_or(code.len(), |p| start + p);
    code[start..end].trim_end_matches('\r')
}
