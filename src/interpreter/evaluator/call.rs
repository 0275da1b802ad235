use std::{cell::RefCell, rc::Rc};

use crate::{
    error::IncompleteError,
    interpreter::{
        evaluator::core::{EvalResult, Flow, Interpreter},
        value::{
            core::Value,
            function::{CodeBlock, CurriedFunction, Function, NativeFunction},
            nametable::{Identifier, Nametable, Object},
        },
    },
};

impl Interpreter {
    /// `.`: pops the top of the stack and calls it.
    pub(crate) fn eval_call_operator(&mut self, index: usize) -> EvalResult<Flow> {
        let callee = self.pop_value()?;
        self.call_value(callee, None, index)
    }

    /// Calls one value, dispatching on its variant.
    ///
    /// An identifier calls to the call of its looked-up value,
    /// remembering the name so a constructor reached through it can name
    /// its object. Code blocks run in the current scope; functions,
    /// curried functions, constructors and natives follow the call
    /// protocol. Everything else calls to itself: numbers, booleans,
    /// strings, objects and nametables are pushed back unchanged, which
    /// is what makes `x .` the way to read a binding whatever it holds.
    pub(crate) fn call_value(&mut self,
                             callee: Value,
                             name: Option<Identifier>,
                             index: usize)
                             -> EvalResult<Flow> {
        match callee {
            Value::Identifier(id) => {
                let resolved = self.lookup(&id).ok_or_else(|| {
                                                   IncompleteError::UnknownIdentifier {
                                                       name: id.name().to_string(),
                                                   }
                                               })?;
                self.call_value(resolved, Some(id), index)
            },
            Value::CodeBlock(block) => self.run_block(&block),
            Value::Function(function) => self.invoke_function(&function, &[], index),
            Value::CurriedFunction(curried) => {
                let base = Rc::clone(curried.base());
                self.invoke_function(&base, curried.curried_arguments(), index)
            },
            Value::Constructor(function) => self.invoke_constructor(&function, name, index),
            Value::NativeFunction(native) => self.invoke_native(&native),
            Value::Integer(_)
            | Value::Float(_)
            | Value::Boolean(_)
            | Value::String(_)
            | Value::Object(_)
            | Value::Nametable(_) => {
                self.push(callee);
                Ok(Flow::Continue)
            },
        }
    }

    /// Runs a code block's body in the current scope, with the current
    /// source swapped to the block's own.
    pub(crate) fn run_block(&mut self, block: &CodeBlock) -> EvalResult<Flow> {
        let saved = std::mem::replace(&mut self.source, block.source().clone());
        let result = self.eval_nodes(block.body());
        self.source = saved;
        result
    }

    /// Invokes a function: pops its remaining arguments, pushes a fresh
    /// frame with the arguments bound as `arg0`..`argN-1` and replayed
    /// onto the operand stack, runs the body, then pops the frame and
    /// pushes the return value if one was set.
    fn invoke_function(&mut self,
                       function: &Rc<Function>,
                       curried: &[Value],
                       index: usize)
                       -> EvalResult<Flow> {
        let args = self.collect_arguments(function, curried)?;
        tracing::debug!(arity = function.arity(),
                        depth = self.scope_depth(),
                        defined_in = %function.code().source().name(),
                        at = function.code().start(),
                        "calling function");

        self.push_call_frame(&args)?;
        let result = self.run_block(function.code());
        let frame = self.pop_call_frame()?;
        let flow = result?;

        tracing::trace!(index, "function call finished");
        match flow {
            Flow::Continue => {
                if let Some(value) = frame.borrow_mut().take_return() {
                    self.push(value);
                }
                Ok(Flow::Continue)
            },
            Flow::Return { depth: 1, value, .. } => {
                let value = value.or_else(|| frame.borrow_mut().take_return());
                if let Some(value) = value {
                    self.push(value);
                }
                Ok(Flow::Continue)
            },
            Flow::Return { depth, value, index: origin } => {
                Ok(Flow::Return { depth: depth - 1,
                                  value: value.or_else(|| frame.borrow_mut().take_return()),
                                  index: origin })
            },
        }
    }

    /// Invokes a constructor: like a function call, but the fresh frame
    /// becomes the nametable of a new object, which is pushed instead of
    /// any return value.
    fn invoke_constructor(&mut self,
                          constructor: &Rc<Function>,
                          name: Option<Identifier>,
                          index: usize)
                          -> EvalResult<Flow> {
        let class = match name {
            Some(id) => id,
            None => Identifier::new("object")?,
        };
        let args = self.collect_arguments(constructor, &[])?;
        tracing::debug!(class = %class, arity = constructor.arity(), "calling constructor");

        self.push_call_frame(&args)?;
        let result = self.run_block(constructor.code());
        let frame = self.pop_call_frame()?;
        let flow = result?;
        frame.borrow_mut().take_return();

        tracing::trace!(index, "constructor call finished");
        match flow {
            Flow::Continue | Flow::Return { depth: 1, .. } => {
                self.push(Value::Object(Object::new(class, frame)));
                Ok(Flow::Continue)
            },
            // unwinding further discards the half-built object
            Flow::Return { depth, value, index: origin } => Ok(Flow::Return { depth: depth - 1,
                                                                              value,
                                                                              index: origin }),
        }
    }

    /// Invokes a native builtin: no frame is pushed; the handler gets the
    /// popped argument vector and may return one value to push.
    fn invoke_native(&mut self, native: &NativeFunction) -> EvalResult<Flow> {
        let (arity, handler) =
            *self.natives
                 .get(native.name())
                 .ok_or_else(|| IncompleteError::Generic { message: format!("native builtin \
                                                                             '{}' is not \
                                                                             registered",
                                                                            native.name()), })?;
        let args = self.pop_arguments(arity)?;
        tracing::debug!(name = native.name(), arity, "calling native builtin");
        if let Some(value) = handler(&args)? {
            self.push(value);
        }
        Ok(Flow::Continue)
    }

    /// Assembles the full argument vector of a call: stored curried
    /// arguments first, then the remaining ones from the stack.
    fn collect_arguments(&mut self,
                         function: &Rc<Function>,
                         curried: &[Value])
                         -> Result<Vec<Value>, IncompleteError> {
        let remaining = function.arity() - curried.len();
        let mut args = Vec::with_capacity(function.arity());
        args.extend_from_slice(curried);
        args.extend(self.pop_arguments(remaining)?);
        Ok(args)
    }

    /// Pops `count` values, returning them first-pushed first.
    fn pop_arguments(&mut self, count: usize) -> Result<Vec<Value>, IncompleteError> {
        let mut args = Vec::with_capacity(count);
        for _ in 0..count {
            args.push(self.pop_value()?);
        }
        args.reverse();
        Ok(args)
    }

    /// Pushes a fresh call frame with the arguments bound by their
    /// conventional names and replayed onto the operand stack in call
    /// order.
    fn push_call_frame(&mut self, args: &[Value]) -> Result<(), IncompleteError> {
        let frame = Rc::new(RefCell::new(Nametable::new()));
        for (position, arg) in args.iter().enumerate() {
            let name = Identifier::new(&format!("arg{position}"))?;
            frame.borrow_mut().put(name, arg.clone());
        }
        self.scope_chain.push(frame);
        for arg in args {
            self.push(arg.clone());
        }
        Ok(())
    }

    /// Pops the frame pushed by [`Interpreter::push_call_frame`].
    fn pop_call_frame(&mut self) -> Result<Rc<RefCell<Nametable>>, IncompleteError> {
        if self.scope_chain.len() <= 1 {
            return Err(IncompleteError::Generic { message: "scope chain lost its call frame"
                                                           .to_string(), });
        }
        self.scope_chain
            .pop()
            .ok_or_else(|| IncompleteError::Generic { message: "scope chain lost its call frame"
                                                               .to_string(), })
    }

    /// `def` and `globaldef`: pop an identifier and a value, and bind.
    pub(crate) fn eval_def(&mut self, global: bool) -> EvalResult<Flow> {
        let id = self.pop_value()?.as_identifier()?;
        let value = self.pop_value()?;
        if global {
            self.define_global(id, value);
        } else {
            self.define(id, value);
        }
        Ok(Flow::Continue)
    }

    /// `,`: pops a callable, then an identifier, and binds the callable
    /// under the identifier in the top frame.
    pub(crate) fn eval_alias(&mut self) -> EvalResult<Flow> {
        let callable = self.pop_value()?;
        if !callable.is_callable() {
            return Err(IncompleteError::NotCallable { found: callable.type_name().to_string(), }.into());
        }
        let id = self.pop_value()?.as_identifier()?;
        self.define(id, callable);
        Ok(Flow::Continue)
    }

    /// `:`: pops an identifier and an object (or nametable) and pushes
    /// the bound field value.
    pub(crate) fn eval_field_get(&mut self) -> EvalResult<Flow> {
        let field = self.pop_value()?.as_identifier()?;
        let target = self.pop_value()?;
        let table = field_table(&target)?;
        let value = table.borrow()
                         .get(&field)
                         .map(Value::copy)
                         .ok_or_else(|| IncompleteError::UnknownField { field:  field.name()
                                                                                     .to_string(),
                                                                        object: target_name(&target), })?;
        self.push(value);
        Ok(Flow::Continue)
    }

    /// `:=`: pops an identifier, an object (or nametable) and a value,
    /// and binds the value as a field.
    pub(crate) fn eval_field_set(&mut self) -> EvalResult<Flow> {
        let field = self.pop_value()?.as_identifier()?;
        let target = self.pop_value()?;
        let value = self.pop_value()?;
        let table = field_table(&target)?;
        table.borrow_mut().put(field, value);
        Ok(Flow::Continue)
    }

    /// `return` and `return:n`: pop the return value into the top frame's
    /// return slot and start unwinding `depth` call frames.
    pub(crate) fn eval_return(&mut self, depth: usize, index: usize) -> EvalResult<Flow> {
        if depth == 0 || self.scope_chain.len() <= 1 {
            return Err(IncompleteError::ReturnPastGlobal { depth }.into());
        }
        let value = self.pop_value()?;
        if let Some(frame) = self.scope_chain.last() {
            frame.borrow_mut().set_return(value);
        }
        Ok(Flow::Return { depth, value: None, index })
    }

    /// `function` and `constructor`: pop an argument count and a code
    /// block, and build the callable with a non-owning handle to the
    /// global frame.
    pub(crate) fn eval_build_function(&mut self, constructor: bool) -> EvalResult<Flow> {
        let count = self.pop_value()?.as_integer()?;
        let arity = usize::try_from(count)
            .map_err(|_| IncompleteError::InvalidArgumentCount { count })?;
        let body = self.pop_value()?.as_code_block()?;
        let function = Rc::new(Function::new(body, arity, Rc::downgrade(self.global_frame())));

        self.push(if constructor {
                      Value::Constructor(function)
                  } else {
                      Value::Function(function)
                  });
        Ok(Flow::Continue)
    }

    /// `curry`: pops a function (resolving an identifier through the
    /// scope chain first), then one argument, and stores the argument
    /// inside the function.
    pub(crate) fn eval_curry(&mut self) -> EvalResult<Flow> {
        let callee = self.pop_value()?;
        let callee = match callee {
            Value::Identifier(id) => {
                self.lookup(&id)
                    .ok_or_else(|| IncompleteError::UnknownIdentifier { name: id.name()
                                                                                .to_string(), })?
            },
            other => other,
        };

        let curried = match callee {
            Value::Function(function) => {
                if function.arity() == 0 {
                    return Err(IncompleteError::CurryExhausted { arity: 0 }.into());
                }
                let argument = self.pop_value()?;
                CurriedFunction::new(function, vec![argument])
            },
            Value::CurriedFunction(existing) => {
                if existing.remaining_arity() == 0 {
                    return Err(IncompleteError::CurryExhausted { arity: existing.base()
                                                                               .arity(), }.into());
                }
                let argument = self.pop_value()?;
                let mut arguments = existing.curried_arguments().to_vec();
                arguments.push(argument);
                CurriedFunction::new(Rc::clone(existing.base()), arguments)
            },
            other => {
                return Err(IncompleteError::TypeMismatch { expected: "a function",
                                                           found:    other.type_name()
                                                                          .to_string(), }.into());
            },
        };
        self.push(Value::CurriedFunction(Rc::new(curried)));
        Ok(Flow::Continue)
    }
}

/// Extracts the nametable behind a field access target.
fn field_table(target: &Value) -> Result<Rc<RefCell<Nametable>>, IncompleteError> {
    match target {
        Value::Object(object) => Ok(Rc::clone(object.table())),
        Value::Nametable(table) => Ok(Rc::clone(table)),
        _ => Err(IncompleteError::TypeMismatch { expected: "an object",
                                                 found:    target.type_name().to_string(), }),
    }
}

/// Names a field access target for error messages.
fn target_name(target: &Value) -> String {
    match target {
        Value::Object(object) => object.name().name().to_string(),
        _ => target.type_name().to_string(),
    }
}

