use std::sync::Arc;

use logos::Logos;

use crate::{ast::PrimitiveToken, error::IncompleteError, util::text};

/// Represents a lexical token in cleaned source input.
///
/// One master grammar recognizes every valid token: integer literals in
/// bases 2, 8, 10 and 16, float literals with optional exponents, string
/// literals with escapes, the boolean literals, identifiers, the code
/// block delimiters, and every primitive token symbol.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(error = LexicalError)]
pub enum TokenKind {
    /// Integer literal tokens such as `42`, `-3`, `0b101`, `0o17`, `0d9`
    /// or `0x7f`.
    #[regex(r"[+-]?[0-9]+", |lex| parse_integer(lex.slice(), 10, false))]
    #[regex(r"[+-]?0b[01]+", |lex| parse_integer(lex.slice(), 2, true))]
    #[regex(r"[+-]?0o[0-7]+", |lex| parse_integer(lex.slice(), 8, true))]
    #[regex(r"[+-]?0d[0-9]+", |lex| parse_integer(lex.slice(), 10, true))]
    #[regex(r"[+-]?0[xh][0-9a-fA-F]+", |lex| parse_integer(lex.slice(), 16, true))]
    Integer(i64),
    /// Float literal tokens such as `3.14`, `-0.5` or `2.1e-10`.
    #[regex(r"[+-]?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", parse_float)]
    Float(f64),
    /// The boolean literals `true` and `false`.
    #[token("true", parse_boolean)]
    #[token("false", parse_boolean)]
    Boolean(bool),
    /// String literal tokens, quoted and backslash-escaped, on one line.
    #[regex(r#""([^"\\\n]|\\[^\n])*""#, parse_string)]
    String(Arc<str>),
    /// Identifier tokens: a letter or underscore followed by letters,
    /// digits or underscores.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `{`: opens a code block.
    #[token("{")]
    BlockStart,
    /// `}`: closes a code block.
    #[token("}")]
    BlockEnd,
    /// Any primitive token symbol.
    #[token("dup", |_| PrimitiveToken::Dup)]
    #[token("pop", |_| PrimitiveToken::Pop)]
    #[token("swap", |_| PrimitiveToken::Swap)]
    #[token("+", |_| PrimitiveToken::Add)]
    #[token("-", |_| PrimitiveToken::Subtract)]
    #[token("*", |_| PrimitiveToken::Multiply)]
    #[token("/", |_| PrimitiveToken::Divide)]
    #[token("%", |_| PrimitiveToken::Remainder)]
    #[token("<", |_| PrimitiveToken::Less)]
    #[token(">", |_| PrimitiveToken::Greater)]
    #[token("<=", |_| PrimitiveToken::LessEqual)]
    #[token(">=", |_| PrimitiveToken::GreaterEqual)]
    #[token("=", |_| PrimitiveToken::Equal)]
    #[token("/=", |_| PrimitiveToken::NotEqual)]
    #[token("and", |_| PrimitiveToken::And)]
    #[token("or", |_| PrimitiveToken::Or)]
    #[token("xor", |_| PrimitiveToken::Xor)]
    #[token("not", |_| PrimitiveToken::Not)]
    #[token("cat", |_| PrimitiveToken::Cat)]
    #[token("convert:int", |_| PrimitiveToken::ConvertInt)]
    #[token("convert:float", |_| PrimitiveToken::ConvertFloat)]
    #[token("convert:string", |_| PrimitiveToken::ConvertString)]
    #[token("convert:bool", |_| PrimitiveToken::ConvertBool)]
    #[token("def", |_| PrimitiveToken::Def)]
    #[token("globaldef", |_| PrimitiveToken::GlobalDef)]
    #[token(".", |_| PrimitiveToken::Call)]
    #[token(",", |_| PrimitiveToken::Alias)]
    #[token(":", |_| PrimitiveToken::FieldGet)]
    #[token(":=", |_| PrimitiveToken::FieldSet)]
    #[token("return", |_| PrimitiveToken::Return)]
    #[regex(r"return:[0-9]+", parse_return_depth)]
    #[token("if", |_| PrimitiveToken::If)]
    #[token("ifelse", |_| PrimitiveToken::IfElse)]
    #[token("while", |_| PrimitiveToken::While)]
    #[token("function", |_| PrimitiveToken::Function)]
    #[token("constructor", |_| PrimitiveToken::Constructor)]
    #[token("curry", |_| PrimitiveToken::Curry)]
    #[token("describe", |_| PrimitiveToken::Describe)]
    #[token("writeln", |_| PrimitiveToken::WriteLn)]
    #[token("write", |_| PrimitiveToken::Write)]
    #[token("assert", |_| PrimitiveToken::Assert)]
    Primitive(PrimitiveToken),
}

/// The ways token recognition can fail.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LexicalError {
    /// The text matches no token of the grammar.
    #[default]
    InvalidToken,
    /// A numeric literal does not fit into the signed 64-bit range.
    IntegerOutOfRange,
}

/// Parses an integer literal with an optional sign and base prefix.
///
/// The magnitude is parsed as unsigned so that the most negative 64-bit
/// value is still accepted; anything beyond the signed range is an
/// [`LexicalError::IntegerOutOfRange`], never a silent wrap.
fn parse_integer(text: &str, radix: u32, prefixed: bool) -> Result<i64, LexicalError> {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let digits = if prefixed { &unsigned[2..] } else { unsigned };
    let magnitude = u64::from_str_radix(digits, radix).map_err(|e| match e.kind() {
                        std::num::IntErrorKind::PosOverflow => LexicalError::IntegerOutOfRange,
                        _ => LexicalError::InvalidToken,
                    })?;

    if negative {
        if magnitude > i64::MAX.unsigned_abs() + 1 {
            return Err(LexicalError::IntegerOutOfRange);
        }
        Ok(0i64.wrapping_sub_unsigned(magnitude))
    } else if magnitude > i64::MAX.unsigned_abs() {
        Err(LexicalError::IntegerOutOfRange)
    } else {
        Ok(magnitude as i64)
    }
}

/// Parses the text of an integer literal in any accepted base, detecting
/// the base prefix. This is what `convert:int` uses on strings, so string
/// conversion accepts exactly the literal grammar.
pub(crate) fn parse_integer_literal(text: &str) -> Result<i64, LexicalError> {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (radix, prefixed) = if unsigned.len() > 2 {
        match unsigned.get(..2) {
            Some("0b") => (2, true),
            Some("0o") => (8, true),
            Some("0d") => (10, true),
            Some("0x" | "0h") => (16, true),
            _ => (10, false),
        }
    } else {
        (10, false)
    };
    parse_integer(text, radix, prefixed)
}

/// Parses a floating-point literal from the current token slice.
fn parse_float(lex: &mut logos::Lexer<TokenKind>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Parses a boolean literal from the current token slice.
fn parse_boolean(lex: &mut logos::Lexer<TokenKind>) -> Option<bool> {
    match lex.slice() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Processes the escapes of a string literal and drops the quotes.
///
/// `\n`, `\t` and `\r` become their control characters; any other escaped
/// character stands for itself (which covers `\"` and `\\`).
fn parse_string(lex: &mut logos::Lexer<TokenKind>) -> Arc<str> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some(other) => out.push(other),
                None => {},
            }
        } else {
            out.push(c);
        }
    }

    Arc::from(out.as_str())
}

/// Parses the unwind depth of a `return:n` token.
fn parse_return_depth(lex: &mut logos::Lexer<TokenKind>) -> Result<PrimitiveToken, LexicalError> {
    lex.slice()["return:".len()..].parse()
                                  .map(PrimitiveToken::ReturnN)
                                  .map_err(|_| LexicalError::IntegerOutOfRange)
}

/// A matched token: its kind, its text, and its start offset in the code.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The classified kind, including any parsed literal payload.
    pub kind:  TokenKind,
    /// The token text exactly as written.
    pub text:  String,
    /// Byte offset of the first character of the token.
    pub start: usize,
}

/// A failure to match a token, with the offset it happened at.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenError {
    /// What went wrong.
    pub cause: LexicalError,
    /// Byte offset of the unmatchable text.
    pub index: usize,
    /// The offending text.
    pub text:  String,
}

impl TokenError {
    /// Converts this failure into the location-less error form; the caller
    /// attaches [`TokenError::index`].
    #[must_use]
    pub fn to_incomplete(&self) -> IncompleteError {
        match self.cause {
            LexicalError::InvalidToken => {
                IncompleteError::InvalidToken { token: self.text.clone() }
            },
            LexicalError::IntegerOutOfRange => {
                IncompleteError::IntegerOutOfRange { literal: self.text.clone() }
            },
        }
    }
}

/// Internal state of a tokenizer: the bounds of the last match and the
/// active scanning region.
///
/// This is a plain value record with no hidden references; saving and
/// restoring states is what makes nested scanning (code blocks) and
/// lookahead cheap and reliable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerState {
    /// Start offset of the last matched token.
    pub start:        usize,
    /// End offset of the last matched token; scanning resumes here.
    pub end:          usize,
    /// Inclusive lower bound of the scanning region.
    pub region_start: usize,
    /// Exclusive upper bound of the scanning region.
    pub region_end:   usize,
}

/// A lazy, restartable cursor over cleaned source code.
///
/// The tokenizer yields tokens one at a time and never looks at code
/// beyond the active region. Its full position is captured by a
/// [`TokenizerState`]; an explicit stack of saved states supports nested
/// regions, and [`Tokenizer::with_code_appended`] produces an extended
/// cursor for incremental execution without disturbing this one.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    code:        String,
    state:       TokenizerState,
    state_stack: Vec<TokenizerState>,
}

impl Tokenizer {
    /// Creates a tokenizer scanning the given cleaned code from the
    /// beginning.
    #[must_use]
    pub fn new(code: &str) -> Self {
        Self { code:        code.to_string(),
               state:       TokenizerState { start:        0,
                                             end:          0,
                                             region_start: 0,
                                             region_end:   code.len(), },
               state_stack: Vec::new(), }
    }

    /// Returns the code this tokenizer scans.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns an independent copy of the current state, excluding the
    /// saved state stack.
    #[must_use]
    pub fn state(&self) -> TokenizerState {
        self.state.clone()
    }

    /// Replaces the current state. The caller is responsible for only
    /// supplying states previously obtained from this tokenizer's code.
    pub fn set_state(&mut self, state: TokenizerState) {
        self.state = state;
    }

    /// Saves the current state onto the internal state stack.
    pub fn push_state(&mut self) {
        self.state_stack.push(self.state());
    }

    /// Restores the most recently saved state.
    ///
    /// Returns `false` if no state was saved.
    pub fn pop_state(&mut self) -> bool {
        match self.state_stack.pop() {
            Some(state) => {
                self.set_state(state);
                true
            },
            None => false,
        }
    }

    /// Returns whether the last match lies outside the active region.
    #[must_use]
    pub const fn region_exceeded(&self) -> bool {
        let upper = if self.state.start > self.state.end { self.state.start } else { self.state.end };
        let lower = if self.state.start < self.state.end { self.state.start } else { self.state.end };
        self.state.region_end < upper || self.state.region_start > lower
    }

    /// Returns whether the tokenizer can provide another token.
    ///
    /// This never advances the cursor and may be called repeatedly.
    #[must_use]
    pub fn has_next(&self) -> bool {
        matches!(self.scan(), Ok(Some(_)))
    }

    /// Finds and returns the next token, advancing past it.
    ///
    /// Returns `Ok(None)` once no matchable content remains before the
    /// region end.
    ///
    /// # Errors
    /// Returns a [`TokenError`] if the region contains text that matches
    /// no token.
    pub fn next(&mut self) -> Result<Option<Token>, TokenError> {
        match self.scan()? {
            None => {
                self.state.end = self.state.region_end.min(self.code.len());
                Ok(None)
            },
            Some((kind, start, end)) => {
                self.state.start = start;
                self.state.end = end;
                let text = self.code[start..end].to_string();
                tracing::trace!(token = %text, start, "matched token");
                Ok(Some(Token { kind, text, start }))
            },
        }
    }

    /// Returns a new tokenizer with the given code appended and the region
    /// reset to the full buffer. This tokenizer is not modified; the
    /// current position carries over, so scanning continues where it left
    /// off. A newline is inserted between the old and the new code if
    /// necessary.
    #[must_use]
    pub fn with_code_appended(&self, appended: &str) -> Self {
        let mut extended = self.clone();
        if !extended.code.is_empty() && !extended.code.ends_with('\n') {
            extended.code.push('\n');
        }
        extended.code.push_str(appended);
        extended.state.region_start = 0;
        extended.state.region_end = extended.code.len();
        extended
    }

    /// Returns the position of the last matched token as a one-based line
    /// number and a zero-based column, derived by scanning newlines up to
    /// the current start offset.
    #[must_use]
    pub fn current_position(&self) -> (usize, usize) {
        text::position_at(&self.code, self.state.start)
    }

    /// Region-safe match attempt from the current scan offset. Pure: the
    /// tokenizer is not modified.
    fn scan(&self) -> Result<Option<(TokenKind, usize, usize)>, TokenError> {
        if self.region_exceeded() {
            return Ok(None);
        }
        let from = self.state.end.max(self.state.region_start);
        let to = self.state.region_end.min(self.code.len());
        if from >= to {
            return Ok(None);
        }

        let mut lexer = TokenKind::lexer(&self.code[from..to]);
        match lexer.next() {
            None => Ok(None),
            Some(Ok(kind)) => {
                let span = lexer.span();
                Ok(Some((kind, from + span.start, from + span.end)))
            },
            Some(Err(cause)) => Err(TokenError { cause,
                                                 index: from + lexer.span().start,
                                                 text: lexer.slice().to_string() }),
        }
    }
}
