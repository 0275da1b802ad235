use std::{
    cell::RefCell,
    rc::{Rc, Weak},
    sync::Arc,
};

use crate::{
    ast::Node,
    interpreter::{
        source::SourceFile,
        value::{core::Value, nametable::Nametable},
    },
};

/// A brace-delimited, unexecuted token list together with its captured
/// source span.
///
/// Code blocks are first-class values; executing one runs its body in the
/// current scope. The span and source handle are what stack traces and
/// error reports use to point back at the definition site.
#[derive(Debug, Clone)]
pub struct CodeBlock {
    body:   Arc<Vec<Node>>,
    source: SourceFile,
    start:  usize,
    end:    usize,
}

impl CodeBlock {
    /// Creates a code block over a parsed body and its source span.
    #[must_use]
    pub const fn new(body: Arc<Vec<Node>>, source: SourceFile, start: usize, end: usize) -> Self {
        Self { body, source, start, end }
    }

    /// Returns the token list this block executes.
    #[must_use]
    pub fn body(&self) -> &Arc<Vec<Node>> {
        &self.body
    }

    /// Returns the source unit the block was parsed from.
    #[must_use]
    pub const fn source(&self) -> &SourceFile {
        &self.source
    }

    /// Returns the byte offset of the opening brace.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Returns the number of nodes in the body, including nested blocks.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.body.iter().map(Node::count).sum()
    }

    /// Returns the block's text as written, braces included.
    #[must_use]
    pub fn span_text(&self) -> &str {
        let code = self.source.code_str();
        let end = self.end.min(code.len());
        &code[self.start.min(end)..end]
    }
}

impl PartialEq for CodeBlock {
    fn eq(&self, other: &Self) -> bool {
        self.body == other.body
    }
}

/// A function: a code block with a declared argument count and a
/// non-owning handle to the global frame it was created under.
///
/// The global frame owns function values through its bindings; functions
/// only hold a weak handle back, so the value graph stays acyclic.
#[derive(Debug, Clone)]
pub struct Function {
    code:   CodeBlock,
    arity:  usize,
    global: Weak<RefCell<Nametable>>,
}

impl Function {
    /// Creates a function over the given body.
    #[must_use]
    pub const fn new(code: CodeBlock, arity: usize, global: Weak<RefCell<Nametable>>) -> Self {
        Self { code, arity, global }
    }

    /// Returns the function body.
    #[must_use]
    pub const fn code(&self) -> &CodeBlock {
        &self.code
    }

    /// Returns the declared argument count.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// Returns the non-owning handle to the captured global frame.
    #[must_use]
    pub const fn global(&self) -> &Weak<RefCell<Nametable>> {
        &self.global
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.arity == other.arity
        && self.code == other.code
        && Weak::ptr_eq(&self.global, &other.global)
    }
}

/// A function together with a list of already supplied arguments.
///
/// When executed, the stored arguments are prepended before any arguments
/// taken from the stack; the remaining argument count is the underlying
/// arity minus the number of stored arguments, and is never negative.
#[derive(Debug, Clone, PartialEq)]
pub struct CurriedFunction {
    base:    Rc<Function>,
    curried: Vec<Value>,
}

impl CurriedFunction {
    /// Wraps a function with its stored arguments. The caller guarantees
    /// that no more arguments are stored than the function takes.
    #[must_use]
    pub fn new(base: Rc<Function>, curried: Vec<Value>) -> Self {
        debug_assert!(curried.len() <= base.arity());
        Self { base, curried }
    }

    /// Returns the function beneath this curried function.
    #[must_use]
    pub const fn base(&self) -> &Rc<Function> {
        &self.base
    }

    /// Returns the arguments that are pre-stored for later.
    #[must_use]
    pub fn curried_arguments(&self) -> &[Value] {
        &self.curried
    }

    /// Returns how many arguments still have to come from the stack.
    #[must_use]
    pub fn remaining_arity(&self) -> usize {
        self.base.arity() - self.curried.len()
    }
}

/// A reference to a registered native builtin: its name and argument
/// count. The host function pointer itself lives in the interpreter's
/// registry, keyed by this name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeFunction {
    name:  Arc<str>,
    arity: usize,
}

impl NativeFunction {
    /// Creates a reference to a registered native builtin.
    #[must_use]
    pub fn new(name: &str, arity: usize) -> Self {
        Self { name: Arc::from(name), arity }
    }

    /// Returns the registry name of the builtin.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared argument count.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }
}
