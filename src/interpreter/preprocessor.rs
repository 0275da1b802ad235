use crate::{
    error::{IncompleteError, InterpreterError},
    interpreter::source::SourceFile,
};

/// Cleans raw source text into the canonical form the tokenizer scans.
///
/// Three transformations are applied:
///
/// 1. A backslash immediately before a line break joins the two lines
///    (both characters are removed). This happens everywhere, including
///    inside string literals, so a string can be continued across lines.
/// 2. Block comments `#* ... *#` are replaced by a single space plus one
///    newline for every newline they contained, so line numbers are
///    preserved. Block comments do not nest.
/// 3. Line comments `#` run to the end of the line and are replaced by a
///    single space; the newline stays.
///
/// String literals are recognized (double-quoted, backslash-escaped) so
/// that a `#` inside a string never opens a comment. Comment and string
/// openers inside another construct are inert: the first opener wins.
///
/// The function is pure and idempotent: running it on already-clean code
/// returns the code unchanged.
///
/// # Errors
/// Unterminated strings and block comments produce `syntax` errors citing
/// the opening offset.
///
/// # Example
/// ```
/// use sof::interpreter::preprocessor::preprocess;
///
/// let clean = preprocess("<literal>", "1 2 + # add\nwriteln").unwrap();
/// assert_eq!(clean, "1 2 +  \nwriteln");
/// assert_eq!(preprocess("<literal>", &clean).unwrap(), clean);
/// ```
pub fn preprocess(name: &str, raw: &str) -> Result<String, InterpreterError> {
    let joined = join_continued_lines(raw);
    strip_comments(&joined).map_err(|(index, cause)| {
                               let source = SourceFile::new(name, &joined);
                               InterpreterError::from_incomplete(&source, index, &cause)
                           })
}

/// Removes every backslash that immediately precedes a line break,
/// together with the line break itself.
fn join_continued_lines(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('\n') => {
                    chars.next();
                    continue;
                },
                Some('\r') => {
                    chars.next();
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    continue;
                },
                _ => {},
            }
        }
        out.push(c);
    }

    out
}

#[derive(Clone, Copy)]
enum Mode {
    Normal,
    InString { start: usize },
    LineComment,
    BlockComment { start: usize, newlines: usize },
}

/// Replaces comments with whitespace in a single left-to-right pass with
/// string protection.
fn strip_comments(code: &str) -> Result<String, (usize, IncompleteError)> {
    let mut out = String::with_capacity(code.len());
    let mut mode = Mode::Normal;
    let mut chars = code.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        match mode {
            Mode::Normal => match c {
                '"' => {
                    out.push(c);
                    mode = Mode::InString { start: index };
                },
                '#' => {
                    out.push(' ');
                    if chars.peek().is_some_and(|&(_, next)| next == '*') {
                        chars.next();
                        mode = Mode::BlockComment { start: index, newlines: 0 };
                    } else {
                        mode = Mode::LineComment;
                    }
                },
                _ => out.push(c),
            },
            Mode::InString { start } => match c {
                '\\' => {
                    out.push(c);
                    if let Some((_, escaped)) = chars.next() {
                        out.push(escaped);
                    }
                },
                '\n' => return Err((start, IncompleteError::UnterminatedString)),
                '"' => {
                    out.push(c);
                    mode = Mode::Normal;
                },
                _ => out.push(c),
            },
            Mode::LineComment => {
                if c == '\n' {
                    out.push(c);
                    mode = Mode::Normal;
                }
            },
            Mode::BlockComment { start, newlines } => match c {
                '\n' => mode = Mode::BlockComment { start, newlines: newlines + 1 },
                '*' if chars.peek().is_some_and(|&(_, next)| next == '#') => {
                    chars.next();
                    for _ in 0..newlines {
                        out.push('\n');
                    }
                    mode = Mode::Normal;
                },
                _ => {},
            },
        }
    }

    match mode {
        Mode::InString { start } => Err((start, IncompleteError::UnterminatedString)),
        Mode::BlockComment { start, .. } => Err((start, IncompleteError::UnterminatedComment)),
        Mode::Normal | Mode::LineComment => Ok(out),
    }
}
