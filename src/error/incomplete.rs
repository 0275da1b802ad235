use crate::error::ErrorKind;

#[derive(Debug, Clone, PartialEq)]
/// Represents all error conditions that can be raised without knowledge of a
/// source code position.
///
/// The tokenizer, the value model and native builtins raise these; the
/// component that knows the offending byte index (usually the evaluator's
/// per-node driver, or the parser) promotes them to located
/// [`InterpreterError`](crate::error::InterpreterError)s before they reach
/// the user.
pub enum IncompleteError {
    /// A string literal was opened but never closed.
    UnterminatedString,
    /// A block comment was opened but never closed.
    UnterminatedComment,
    /// The tokenizer found text that matches no token.
    InvalidToken {
        /// The unmatchable text.
        token: String,
    },
    /// A code block was opened with `{` but never closed.
    UnmatchedBlockOpen,
    /// A `}` appeared with no open code block.
    UnmatchedBlockClose,
    /// A name does not form a valid identifier.
    InvalidIdentifier {
        /// The rejected name.
        name: String,
    },
    /// An integer literal does not fit into the signed 64-bit range.
    IntegerOutOfRange {
        /// The literal as written.
        literal: String,
    },
    /// An operation was applied to a value of the wrong variant.
    TypeMismatch {
        /// What the operation needed.
        expected: &'static str,
        /// The type name of the value that was found.
        found:    String,
    },
    /// A value that does not take part in the call protocol was called.
    NotCallable {
        /// The type name of the value.
        found: String,
    },
    /// Two values of different, non-promotable types were ordered.
    IncomparableTypes {
        /// Type name of the left operand.
        left:  String,
        /// Type name of the right operand.
        right: String,
    },
    /// `curry` was applied to a function with no remaining arguments.
    CurryExhausted {
        /// The declared arity of the underlying function.
        arity: usize,
    },
    /// A declared argument count was negative.
    InvalidArgumentCount {
        /// The count that was supplied.
        count: i64,
    },
    /// An identifier lookup walked the whole scope chain without a hit.
    UnknownIdentifier {
        /// The unresolved name.
        name: String,
    },
    /// A field read on an object found no binding.
    UnknownField {
        /// The missing field name.
        field:  String,
        /// The name of the object that was read.
        object: String,
    },
    /// A pop was attempted on an effectively empty operand stack.
    StackUnderflow,
    /// A return tried to unwind more frames than there are active calls.
    ReturnPastGlobal {
        /// The requested unwind depth.
        depth: usize,
    },
    /// Division or modulo by zero.
    DivisionByZero,
    /// Integer arithmetic left the 64-bit signed range.
    IntegerOverflow {
        /// The operation that overflowed.
        operation: &'static str,
    },
    /// A `convert:` primitive was given a value it cannot convert.
    InvalidConversion {
        /// Type name or text of the source value.
        from: String,
        /// Name of the target type.
        to:   String,
    },
    /// A failed `assert`.
    AssertionFailed,
    /// The input/output interface reported a failure.
    Io {
        /// The underlying failure, rendered.
        message: String,
    },
    /// A failure with no more specific kind.
    Generic {
        /// Details about the failure.
        message: String,
    },
}

impl IncompleteError {
    /// Returns the error kind this condition belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnterminatedString
            | Self::UnterminatedComment
            | Self::InvalidToken { .. }
            | Self::UnmatchedBlockOpen
            | Self::UnmatchedBlockClose
            | Self::InvalidIdentifier { .. } => ErrorKind::Syntax,
            Self::TypeMismatch { .. }
            | Self::NotCallable { .. }
            | Self::IncomparableTypes { .. }
            | Self::CurryExhausted { .. }
            | Self::InvalidArgumentCount { .. } => ErrorKind::Type,
            Self::UnknownIdentifier { .. } | Self::UnknownField { .. } => ErrorKind::Name,
            Self::StackUnderflow | Self::ReturnPastGlobal { .. } => ErrorKind::Stack,
            Self::IntegerOutOfRange { .. }
            | Self::DivisionByZero
            | Self::IntegerOverflow { .. }
            | Self::InvalidConversion { .. } => ErrorKind::Math,
            Self::AssertionFailed => ErrorKind::Assert,
            Self::Io { .. } => ErrorKind::Io,
            Self::Generic { .. } => ErrorKind::Generic,
        }
    }

    /// Returns the localization message key (`sof.error.message.*`) for
    /// this condition.
    #[must_use]
    pub const fn reason_key(&self) -> &'static str {
        match self {
            Self::UnterminatedString => "syntax.string",
            Self::UnterminatedComment => "syntax.comment",
            Self::InvalidToken { .. } => "syntax.token",
            Self::UnmatchedBlockOpen => "syntax.blockopen",
            Self::UnmatchedBlockClose => "syntax.blockclose",
            Self::InvalidIdentifier { .. } => "syntax.identifier",
            Self::TypeMismatch { .. } => "type.mismatch",
            Self::NotCallable { .. } => "type.call",
            Self::IncomparableTypes { .. } => "type.compare",
            Self::CurryExhausted { .. } => "type.curry",
            Self::InvalidArgumentCount { .. } => "type.argcount",
            Self::UnknownIdentifier { .. } => "name.lookup",
            Self::UnknownField { .. } => "name.field",
            Self::StackUnderflow => "stack.underflow",
            Self::ReturnPastGlobal { .. } => "stack.return",
            Self::IntegerOutOfRange { .. } => "math.range",
            Self::DivisionByZero => "math.divzero",
            Self::IntegerOverflow { .. } => "math.overflow",
            Self::InvalidConversion { .. } => "math.convert",
            Self::AssertionFailed => "assert.failed",
            Self::Io { .. } => "io.write",
            Self::Generic { .. } => "generic",
        }
    }
}

impl std::fmt::Display for IncompleteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnterminatedString => write!(f, "String literal is never terminated."),
            Self::UnterminatedComment => write!(f, "Block comment is never terminated."),
            Self::InvalidToken { token } => write!(f, "Unexpected token: {token}."),
            Self::UnmatchedBlockOpen => {
                write!(f, "Code block is opened here but never closed.")
            },
            Self::UnmatchedBlockClose => {
                write!(f, "Code block is closed here but was never opened.")
            },
            Self::InvalidIdentifier { name } => {
                write!(f, "'{name}' is not a valid identifier.")
            },
            Self::IntegerOutOfRange { literal } => {
                write!(f, "Integer literal {literal} does not fit into 64 bits.")
            },
            Self::TypeMismatch { expected, found } => {
                write!(f, "Expected {expected} but found {found}.")
            },
            Self::NotCallable { found } => {
                write!(f, "A value of type {found} cannot be called.")
            },
            Self::IncomparableTypes { left, right } => {
                write!(f, "Cannot compare {left} with {right}.")
            },
            Self::CurryExhausted { arity } => write!(f,
                                                     "Cannot curry a function that takes {arity} \
                                                      arguments any further."),
            Self::InvalidArgumentCount { count } => {
                write!(f, "{count} is not a valid argument count.")
            },
            Self::UnknownIdentifier { name } => {
                write!(f, "Identifier '{name}' is not defined.")
            },
            Self::UnknownField { field, object } => {
                write!(f, "'{object}' has no field named '{field}'.")
            },
            Self::StackUnderflow => write!(f, "Not enough values on the stack."),
            Self::ReturnPastGlobal { depth } => write!(f,
                                                       "Cannot return through {depth} function \
                                                        frame(s) here."),
            Self::DivisionByZero => write!(f, "Division by zero."),
            Self::IntegerOverflow { operation } => {
                write!(f, "Integer overflow while computing {operation}.")
            },
            Self::InvalidConversion { from, to } => {
                write!(f, "Cannot convert {from} to {to}.")
            },
            Self::AssertionFailed => write!(f, "Assertion failed."),
            Self::Io { message } => write!(f, "Input/output failure: {message}."),
            Self::Generic { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for IncompleteError {}
