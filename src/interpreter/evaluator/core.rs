use std::{
    cell::RefCell,
    collections::HashMap,
    rc::Rc,
    sync::{Arc, OnceLock},
};

use crate::{
    ast::{LiteralValue, Node, PrimitiveToken},
    error::{Fault, IncompleteError, InterpreterError},
    interpreter::{
        io::IoInterface,
        parser,
        preprocessor::preprocess,
        source::{PREAMBLE_TAG, SourceFile},
        value::{
            core::Value,
            function::CodeBlock,
            nametable::{Identifier, Nametable},
        },
    },
};

/// Result type used by the evaluator.
///
/// Evaluation either succeeds with a value of type `T` or fails with a
/// [`Fault`]: a located error, or a location-less one that the evaluation
/// loop will locate at the current node.
pub type EvalResult<T> = Result<T, Fault>;

/// Signature of a native builtin.
///
/// The host function receives the popped argument vector (first argument
/// first) and either returns a value to push, nothing, or a
/// location-less error.
pub type NativeHandler = fn(&[Value]) -> Result<Option<Value>, IncompleteError>;

/// How evaluation of a token list ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// The list ran to its end; evaluation continues normally.
    Continue,
    /// A `return` is unwinding call frames.
    Return {
        /// How many frames remain to unwind, this one included.
        depth: usize,
        /// The return value once the frame that held it has been popped.
        value: Option<Value>,
        /// Byte index of the `return` token, for error reporting.
        index: usize,
    },
}

/// The embedded standard preamble, run against every fresh interpreter.
const PREAMBLE_CODE: &str = include_str!("../../../preamble.sof");

static PREAMBLE: OnceLock<Result<(SourceFile, Vec<Node>), InterpreterError>> = OnceLock::new();

/// Returns the preprocessed and parsed preamble, memoizing it on first
/// use.
fn preamble() -> Result<&'static (SourceFile, Vec<Node>), InterpreterError> {
    PREAMBLE.get_or_init(|| {
               let cleaned = preprocess(PREAMBLE_TAG, PREAMBLE_CODE)?;
               let source = SourceFile::new(PREAMBLE_TAG, &cleaned);
               let nodes = parser::parse(&source)?;
               Ok((source, nodes))
           })
           .as_ref()
           .map_err(Clone::clone)
}

/// Stores the whole runtime state of one interpreter instance.
///
/// An interpreter owns the operand stack, the scope chain with the global
/// nametable at the bottom of both, the assert counter, the input/output
/// interface, and the registry of native builtins. It is single-threaded
/// and synchronous; separate instances share nothing.
pub struct Interpreter {
    /// The operand stack. Slot 0 holds the global nametable and is never
    /// popped.
    pub(crate) stack:        Vec<Value>,
    /// The scope chain; index 0 is the global frame.
    pub(crate) scope_chain:  Vec<Rc<RefCell<Nametable>>>,
    /// The source unit the currently executing nodes came from.
    pub(crate) source:       SourceFile,
    /// Where `write` and `writeln` go.
    pub(crate) io:           IoInterface,
    /// How many asserts have passed so far.
    pub(crate) assert_count: u64,
    /// Registered native builtins: name to argument count and handler.
    pub(crate) natives:      HashMap<String, (usize, NativeHandler)>,
}

impl Interpreter {
    /// Creates a fresh interpreter: global frame at the bottom of stack
    /// and scope chain, default natives registered, preamble executed.
    ///
    /// # Errors
    /// Fails only if the embedded preamble fails to run, which indicates a
    /// broken build.
    pub fn new(io: IoInterface) -> Result<Self, InterpreterError> {
        let global = Rc::new(RefCell::new(Nametable::new()));
        let (preamble_source, preamble_nodes) = preamble()?;

        let mut interpreter = Self { stack:        vec![Value::Nametable(Rc::clone(&global))],
                                     scope_chain:  vec![global],
                                     source:       preamble_source.clone(),
                                     io,
                                     assert_count: 0,
                                     natives:      HashMap::new(), };
        interpreter.register_default_natives()
                   .map_err(|e| InterpreterError::from_incomplete(preamble_source, 0, &e))?;

        tracing::debug!("running preamble");
        interpreter.execute(preamble_source, preamble_nodes)?;
        Ok(interpreter)
    }

    /// Parses and executes one source unit against this interpreter.
    ///
    /// # Errors
    /// Returns the first located error the preprocessed unit raises.
    pub fn run(&mut self, source: &SourceFile) -> Result<(), InterpreterError> {
        let nodes = parser::parse(source)?;
        self.execute(source, &nodes)
    }

    /// Executes already-parsed nodes belonging to `source`.
    fn execute(&mut self, source: &SourceFile, nodes: &[Node]) -> Result<(), InterpreterError> {
        self.source = source.clone();
        match self.eval_nodes(nodes) {
            Ok(Flow::Continue) => {
                tracing::debug!(asserts = self.assert_count, "source unit finished");
                Ok(())
            },
            Ok(Flow::Return { depth, index, .. }) => {
                Err(InterpreterError::from_incomplete(source,
                                                      index,
                                                      &IncompleteError::ReturnPastGlobal { depth }))
            },
            Err(fault) => Err(fault.promote(source, 0)),
        }
    }

    /// Evaluates the children of a token list strictly left to right.
    ///
    /// Location-less faults raised by a node are promoted here with that
    /// node's byte index, so every error leaving the loop is located at
    /// the innermost node that knew its position.
    pub(crate) fn eval_nodes(&mut self, nodes: &[Node]) -> EvalResult<Flow> {
        for node in nodes {
            match self.eval_node(node) {
                Ok(Flow::Continue) => {},
                Ok(flow) => return Ok(flow),
                Err(fault) => {
                    return Err(fault.promote(&self.source, node.index()).into());
                },
            }
        }
        Ok(Flow::Continue)
    }

    /// Evaluates a single node.
    fn eval_node(&mut self, node: &Node) -> EvalResult<Flow> {
        match node {
            Node::Literal { value, .. } => {
                self.push(literal_value(value));
                Ok(Flow::Continue)
            },
            Node::Atom { name, .. } => {
                self.push(Value::Identifier(name.clone()));
                Ok(Flow::Continue)
            },
            Node::Block { body, index, end } => {
                let block =
                    CodeBlock::new(Arc::clone(body), self.source.clone(), *index, *end);
                self.push(Value::CodeBlock(block));
                Ok(Flow::Continue)
            },
            Node::Primitive { token, index } => self.eval_primitive(*token, *index),
        }
    }

    /// Dispatches one primitive token to its implementation.
    fn eval_primitive(&mut self, token: PrimitiveToken, index: usize) -> EvalResult<Flow> {
        use PrimitiveToken as Pt;

        tracing::trace!(?token, index, "dispatching primitive");
        match token {
            Pt::Dup => self.eval_dup(),
            Pt::Pop => self.eval_pop(),
            Pt::Swap => self.eval_swap(),
            Pt::Add | Pt::Subtract | Pt::Multiply | Pt::Divide | Pt::Remainder => {
                self.eval_arithmetic(token)
            },
            Pt::Less | Pt::Greater | Pt::LessEqual | Pt::GreaterEqual => self.eval_ordering(token),
            Pt::Equal | Pt::NotEqual => self.eval_equality(token),
            Pt::And | Pt::Or | Pt::Xor => self.eval_logic(token),
            Pt::Not => self.eval_not(),
            Pt::Cat => self.eval_cat(),
            Pt::ConvertInt => self.eval_convert_int(),
            Pt::ConvertFloat => self.eval_convert_float(),
            Pt::ConvertString => self.eval_convert_string(),
            Pt::ConvertBool => self.eval_convert_bool(),
            Pt::Def => self.eval_def(false),
            Pt::GlobalDef => self.eval_def(true),
            Pt::Call => self.eval_call_operator(index),
            Pt::Alias => self.eval_alias(),
            Pt::FieldGet => self.eval_field_get(),
            Pt::FieldSet => self.eval_field_set(),
            Pt::Return => self.eval_return(1, index),
            Pt::ReturnN(depth) => self.eval_return(depth, index),
            Pt::If => self.eval_if(index),
            Pt::IfElse => self.eval_ifelse(index),
            Pt::While => self.eval_while(index),
            Pt::Function => self.eval_build_function(false),
            Pt::Constructor => self.eval_build_function(true),
            Pt::Curry => self.eval_curry(),
            Pt::Describe => self.eval_describe(),
            Pt::WriteLn => self.eval_write(true),
            Pt::Write => self.eval_write(false),
            Pt::Assert => self.eval_assert(),
        }
    }

    /// Pushes a value onto the operand stack.
    pub(crate) fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    /// Pops the topmost value.
    ///
    /// The global nametable at the bottom is off limits; popping down to
    /// it is a `stack`-kind error.
    pub(crate) fn pop_value(&mut self) -> Result<Value, IncompleteError> {
        if self.stack.len() <= 1 {
            return Err(IncompleteError::StackUnderflow);
        }
        self.stack.pop().ok_or(IncompleteError::StackUnderflow)
    }

    /// Returns how many values sit on the operand stack, excluding the
    /// global nametable at the bottom.
    #[must_use]
    pub fn stack_depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Returns the depth of the scope chain, the global frame included.
    #[must_use]
    pub fn scope_depth(&self) -> usize {
        self.scope_chain.len()
    }

    /// Returns how many asserts have passed so far.
    #[must_use]
    pub const fn assert_count(&self) -> u64 {
        self.assert_count
    }

    /// Returns the input/output interface.
    #[must_use]
    pub const fn io(&self) -> &IoInterface {
        &self.io
    }

    /// Returns the global frame at the bottom of the scope chain.
    pub(crate) fn global_frame(&self) -> &Rc<RefCell<Nametable>> {
        &self.scope_chain[0]
    }

    /// Looks an identifier up through the scope chain, top to bottom,
    /// returning a copy of the first hit.
    pub(crate) fn lookup(&self, id: &Identifier) -> Option<Value> {
        self.scope_chain
            .iter()
            .rev()
            .find_map(|frame| frame.borrow().get(id).map(Value::copy))
    }

    /// Binds a value in the topmost frame.
    pub(crate) fn define(&mut self, id: Identifier, value: Value) {
        if let Some(frame) = self.scope_chain.last() {
            frame.borrow_mut().put(id, value);
        }
    }

    /// Binds a value in the global frame.
    pub(crate) fn define_global(&mut self, id: Identifier, value: Value) {
        self.global_frame().borrow_mut().put(id, value);
    }
}

/// Turns a parsed literal into its runtime value.
fn literal_value(literal: &LiteralValue) -> Value {
    match literal {
        LiteralValue::Integer(v) => Value::Integer(*v),
        LiteralValue::Float(v) => Value::Float(*v),
        LiteralValue::Boolean(v) => Value::Boolean(*v),
        LiteralValue::String(s) => Value::String(Arc::clone(s)),
    }
}
