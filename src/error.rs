/// Location-less error conditions.
///
/// Defines the failure modes that can be raised by parts of the system that
/// do not know where in the source code they are executing, such as the
/// value model, nametables, and native builtins. These errors are promoted
/// to full [`InterpreterError`]s by whichever caller knows the code
/// position.
pub mod incomplete;
/// Located errors and their rendering.
///
/// Contains the [`InterpreterError`] type that carries an error kind,
/// localization keys, a formatted reason, and a complete source location.
/// Its `Display` implementation renders the error the way the command line
/// front-end shows it: a header, the offending line, a caret marker, and
/// the reason.
pub mod interpreter_error;

pub use incomplete::IncompleteError;
pub use interpreter_error::InterpreterError;
pub(crate) use interpreter_error::Fault;

/// The taxonomy of error kinds raised by the interpreter.
///
/// Every error belongs to exactly one kind. The kind doubles as the
/// localization type key (`sof.error.type.*` in the message bundles); the
/// English names returned by [`ErrorKind::display_name`] are the built-in
/// rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed source code, found by the preprocessor, tokenizer or
    /// parser.
    Syntax,
    /// An operation was applied to an incompatible value variant.
    Type,
    /// An identifier lookup found no binding.
    Name,
    /// Operand stack underflow, or a return that unwound past the global
    /// frame.
    Stack,
    /// Division or modulo by zero, numeric overflow, or an illegal
    /// conversion.
    Math,
    /// A failed `assert`.
    Assert,
    /// A failure reported by the input/output interface.
    Io,
    /// Fallback when no more specific kind applies.
    Generic,
}

impl ErrorKind {
    /// Returns the localization type key for this kind.
    #[must_use]
    pub const fn type_key(self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::Type => "type",
            Self::Name => "name",
            Self::Stack => "stack",
            Self::Math => "math",
            Self::Assert => "assert",
            Self::Io => "io",
            Self::Generic => "generic",
        }
    }

    /// Returns the English display name used in error headers.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Syntax => "Syntax Error",
            Self::Type => "Type Error",
            Self::Name => "Name Error",
            Self::Stack => "Stack Error",
            Self::Math => "Arithmetic Error",
            Self::Assert => "Assertion Error",
            Self::Io => "Input/Output Error",
            Self::Generic => "Error",
        }
    }
}
