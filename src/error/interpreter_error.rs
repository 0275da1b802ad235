use std::sync::Arc;

use crate::{
    error::{ErrorKind, IncompleteError},
    interpreter::source::SourceFile,
    util::text,
};

#[derive(Debug, Clone)]
/// An error with a complete source location.
///
/// Carries the error kind, the localization key pair (the kind is the type
/// key, [`InterpreterError::reason_key`] the message key), the formatted
/// reason, and the position the error occurred at: a file tag (a real path
/// or a synthetic tag such as `<literal>` or `<preamble>`) together with a
/// byte index into the code. Line and column are derived on demand by
/// scanning newline positions.
///
/// The `Display` implementation renders the full user-visible report:
///
/// ```text
/// !!! Name Error in file <literal>, line 1:
///     undefined .
///     ^
/// Identifier 'undefined' is not defined.
/// ```
pub struct InterpreterError {
    kind:       ErrorKind,
    reason_key: &'static str,
    reason:     String,
    file:       Arc<str>,
    code:       Arc<str>,
    index:      usize,
}

impl InterpreterError {
    /// Promotes a location-less error using the source and byte index the
    /// caller knows.
    #[must_use]
    pub fn from_incomplete(source: &SourceFile, index: usize, cause: &IncompleteError) -> Self {
        Self { kind: cause.kind(),
               reason_key: cause.reason_key(),
               reason: cause.to_string(),
               file: source.name(),
               code: source.code(),
               index }
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the localization message key of this error.
    #[must_use]
    pub const fn reason_key(&self) -> &'static str {
        self.reason_key
    }

    /// Returns the file tag this error occurred in.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Returns the byte index into the code this error occurred at.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the one-based line number of the error position.
    #[must_use]
    pub fn line(&self) -> usize {
        text::position_at(&self.code, self.index).0
    }

    /// Returns the zero-based column of the error position inside its line.
    #[must_use]
    pub fn column(&self) -> usize {
        text::position_at(&self.code, self.index).1
    }
}

impl std::fmt::Display for InterpreterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (line, column) = text::position_at(&self.code, self.index);
        let excerpt = text::line_at(&self.code, self.index);

        writeln!(f,
                 "!!! {} in file {}, line {}:",
                 self.kind.display_name(),
                 self.file,
                 line)?;
        writeln!(f, "    {excerpt}")?;
        writeln!(f, "    {:>width$}", "^", width = column + 1)?;
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for InterpreterError {}

#[derive(Debug)]
/// Union of the two error layers, used inside the evaluator.
///
/// Leaf operations raise [`IncompleteError`]s; anything that already went
/// through a promotion carries a located [`InterpreterError`]. The
/// evaluator's per-node driver calls [`Fault::promote`] so that every error
/// leaving the evaluation loop is located at the innermost node that knew
/// its position.
pub(crate) enum Fault {
    Incomplete(IncompleteError),
    Complete(InterpreterError),
}

impl Fault {
    /// Attaches the given position to the fault unless it already has one.
    pub(crate) fn promote(self, source: &SourceFile, index: usize) -> InterpreterError {
        match self {
            Self::Incomplete(cause) => InterpreterError::from_incomplete(source, index, &cause),
            Self::Complete(error) => error,
        }
    }
}

impl From<IncompleteError> for Fault {
    fn from(cause: IncompleteError) -> Self {
        Self::Incomplete(cause)
    }
}

impl From<InterpreterError> for Fault {
    fn from(error: InterpreterError) -> Self {
        Self::Complete(error)
    }
}
