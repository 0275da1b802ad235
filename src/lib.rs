//! # sof
//!
//! sof is an interpreter for SOF ("Stack with Objects and Functions"), a
//! small concatenative, stack-based programming language. Programs are
//! sequences of postfix tokens that manipulate a single operand stack;
//! brace-delimited code blocks are first-class values, functions capture
//! an argument count, and constructors build objects whose fields live in
//! nametables.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::interpreter::{
    evaluator::core::Interpreter,
    io::IoInterface,
    source::{LITERAL_TAG, SourceFile},
};

/// Defines the structure of parsed code.
///
/// This module declares the node types that represent source code as a
/// token-list tree: literals, identifier atoms, primitive tokens, and
/// nested code block bodies. The tree is built by the parser and walked
/// by the evaluator.
///
/// # Responsibilities
/// - Defines the node and literal types for all language constructs.
/// - Attaches byte offsets to every node for error reporting.
pub mod ast;
/// Provides the two-layer error model.
///
/// This module defines the taxonomy of error kinds, the location-less
/// error conditions raised deep inside the value model, and the located
/// errors that reach the user with a file tag, a derived line and column,
/// and a caret-marked excerpt.
///
/// # Responsibilities
/// - Defines all failure modes with their kind and localization keys.
/// - Promotes location-less conditions to located errors.
/// - Renders errors the way the command line shows them.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together preprocessing, tokenization, parsing,
/// evaluation, the value model and the input/output interface to provide
/// a complete runtime for SOF source code.
///
/// # Responsibilities
/// - Coordinates all core components across the phases.
/// - Holds the runtime state: operand stack, scope chain, natives.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities shared across the phases.
///
/// # Responsibilities
/// - Safely convert between `i64` and `f64` without silent data loss.
/// - Derive line and column positions from byte indices.
pub mod util;

pub use crate::{
    error::{ErrorKind, IncompleteError, InterpreterError},
    interpreter::preprocessor::preprocess,
};

/// Runs one unit of SOF source code against a fresh interpreter.
///
/// The code is preprocessed (unless `run_preprocessor` is false), parsed,
/// and executed with output going to standard output. The preamble runs
/// first, as always.
///
/// # Errors
/// Returns the first located error any phase raises.
pub fn run_code(name: &str,
                raw: &str,
                run_preprocessor: bool)
                -> Result<(), InterpreterError> {
    let cleaned;
    let code = if run_preprocessor {
        cleaned = preprocess(name, raw)?;
        cleaned.as_str()
    } else {
        raw
    };
    let source = SourceFile::new(name, code);
    Interpreter::new(IoInterface::stdout())?.run(&source)
}

/// Runs SOF source code and reports whether it executed cleanly.
///
/// This is the plain library entry point: the code is preprocessed and
/// executed with output going to standard output.
///
/// # Errors
/// Returns an error if any phase fails, with details about the failure.
///
/// # Examples
/// ```
/// use sof::get_result;
///
/// // A well-formed program executes cleanly.
/// assert!(get_result("3 4 + x def").is_ok());
///
/// // Calling an undefined name is a name error.
/// assert!(get_result("undefined .").is_err());
/// ```
pub fn get_result(source: &str) -> Result<(), Box<dyn std::error::Error>> {
    run_code(LITERAL_TAG, source, true)?;
    Ok(())
}

/// Runs SOF source code and returns everything it printed.
///
/// Output of `write` and `writeln` is collected into a buffer instead of
/// going to standard output.
///
/// # Errors
/// Returns an error if any phase fails.
///
/// # Examples
/// ```
/// use sof::get_output;
///
/// let output = get_output("1 2 + writeln").unwrap();
/// assert_eq!(output, "3\n");
/// ```
pub fn get_output(source: &str) -> Result<String, Box<dyn std::error::Error>> {
    let cleaned = preprocess(LITERAL_TAG, source)?;
    let file = SourceFile::new(LITERAL_TAG, &cleaned);
    let mut interpreter = Interpreter::new(IoInterface::buffer())?;
    interpreter.run(&file)?;
    Ok(interpreter.io().captured())
}
