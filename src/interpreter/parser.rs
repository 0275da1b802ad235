use std::sync::Arc;

use crate::{
    ast::{LiteralValue, Node},
    error::{IncompleteError, InterpreterError},
    interpreter::{
        lexer::{Token, TokenKind, Tokenizer},
        source::SourceFile,
        value::nametable::Identifier,
    },
};

/// Result type used by the parser.
pub type ParseResult<T> = Result<T, InterpreterError>;

/// Parses a whole source unit into its token-list tree.
///
/// The parser drains the tokenizer sequentially. Literal tokens become
/// literal nodes, identifiers become atom nodes, primitive token symbols
/// become primitive nodes, and brace-delimited regions become nested
/// block nodes. Parsing is deterministic and single-pass apart from a
/// balance check that looks ahead at each block opening.
///
/// # Errors
/// Unmatchable text, out-of-range literals and unbalanced braces produce
/// `syntax`- or `math`-kind errors located at the offending offset.
///
/// # Example
/// ```
/// use sof::interpreter::{parser::parse, source::SourceFile};
///
/// let source = SourceFile::new("<literal>", "1 2 + writeln");
/// assert_eq!(parse(&source).unwrap().len(), 4);
/// ```
pub fn parse(source: &SourceFile) -> ParseResult<Vec<Node>> {
    let mut tokenizer = Tokenizer::new(source.code_str());
    let nodes = parse_nodes(&mut tokenizer, source, None)?;
    tracing::debug!(file = %source.name(),
                    nodes = nodes.iter().map(Node::count).sum::<usize>(),
                    "parsed source unit");
    Ok(nodes)
}

/// Parses nodes until the end of input, or until the closing brace of the
/// block opened at `open_index`.
fn parse_nodes(tokenizer: &mut Tokenizer,
               source: &SourceFile,
               open_index: Option<usize>)
               -> ParseResult<Vec<Node>> {
    let mut nodes = Vec::new();

    loop {
        let token = tokenizer.next()
                             .map_err(|e| located(source, e.index, &e.to_incomplete()))?;
        let Some(token) = token else {
            return match open_index {
                // the block opened here never closes
                Some(index) => Err(located(source, index, &IncompleteError::UnmatchedBlockOpen)),
                None => Ok(nodes),
            };
        };

        match token.kind {
            TokenKind::BlockStart => {
                let start = token.start;
                check_balance(tokenizer, source, start)?;
                let body = parse_nodes(tokenizer, source, Some(start))?;
                // the cursor now rests just past the closing brace
                let end = tokenizer.state().end;
                nodes.push(Node::Block { body: Arc::new(body),
                                         index: start,
                                         end });
            },
            TokenKind::BlockEnd => {
                return match open_index {
                    Some(_) => Ok(nodes),
                    None => {
                        Err(located(source, token.start, &IncompleteError::UnmatchedBlockClose))
                    },
                };
            },
            _ => nodes.push(classify(&token, source)?),
        }
    }
}

/// Verifies that the block opened at `open_index` has a matching closing
/// brace, using the tokenizer's state stack so the scan position is
/// restored afterwards.
fn check_balance(tokenizer: &mut Tokenizer,
                 source: &SourceFile,
                 open_index: usize)
                 -> ParseResult<()> {
    tokenizer.push_state();
    let mut depth = 1usize;

    let result = loop {
        match tokenizer.next() {
            Err(e) => break Err(located(source, e.index, &e.to_incomplete())),
            Ok(None) => break Err(located(source, open_index, &IncompleteError::UnmatchedBlockOpen)),
            Ok(Some(token)) => match token.kind {
                TokenKind::BlockStart => depth += 1,
                TokenKind::BlockEnd => {
                    depth -= 1;
                    if depth == 0 {
                        break Ok(());
                    }
                },
                _ => {},
            },
        }
    };

    tokenizer.pop_state();
    result
}

/// Classifies a single non-structural token into its node.
fn classify(token: &Token, source: &SourceFile) -> ParseResult<Node> {
    let index = token.start;
    match &token.kind {
        TokenKind::Integer(value) => Ok(Node::Literal { value: LiteralValue::Integer(*value),
                                                        index }),
        TokenKind::Float(value) => Ok(Node::Literal { value: LiteralValue::Float(*value),
                                                      index }),
        TokenKind::Boolean(value) => Ok(Node::Literal { value: LiteralValue::Boolean(*value),
                                                        index }),
        TokenKind::String(value) => {
            Ok(Node::Literal { value: LiteralValue::String(Arc::clone(value)),
                               index })
        },
        TokenKind::Identifier(name) => {
            let name = Identifier::new(name).map_err(|e| located(source, index, &e))?;
            Ok(Node::Atom { name, index })
        },
        TokenKind::Primitive(primitive) => Ok(Node::Primitive { token: *primitive,
                                                                index }),
        TokenKind::BlockStart | TokenKind::BlockEnd => {
            unreachable!("block delimiters are handled by the node loop")
        },
    }
}

fn located(source: &SourceFile, index: usize, cause: &IncompleteError) -> InterpreterError {
    InterpreterError::from_incomplete(source, index, cause)
}
