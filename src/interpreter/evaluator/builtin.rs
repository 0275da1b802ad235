use crate::{
    error::IncompleteError,
    interpreter::{
        evaluator::core::{Interpreter, NativeHandler},
        value::{core::Value, function::NativeFunction, nametable::Identifier},
    },
    util::num::i64_to_f64_checked,
};

/// Defines the bundled native builtins by generating a lookup table and a
/// name list.
///
/// Each entry provides a registry name, an argument count, and a function
/// pointer implementing the builtin. The macro produces `NativeDef`
/// (internal metadata), `NATIVE_TABLE` (the static registration table)
/// and `NATIVE_FUNCTIONS` (the public list of builtin names).
macro_rules! native_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct NativeDef {
            name:    &'static str,
            arity:   usize,
            handler: NativeHandler,
        }
        static NATIVE_TABLE: &[NativeDef] = &[
            $(
                NativeDef { name: $name, arity: $arity, handler: $func },
            )*
        ];
        /// Names of the native builtins every interpreter registers at
        /// startup.
        pub const NATIVE_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

native_functions! {
    "sqrt"  => { arity: 1, func: sqrt },
    "floor" => { arity: 1, func: |args| unary_round("floor", args) },
    "ceil"  => { arity: 1, func: |args| unary_round("ceil", args) },
    "round" => { arity: 1, func: |args| unary_round("round", args) },
}

impl Interpreter {
    /// Registers a native builtin: the handler goes into the registry and
    /// a [`NativeFunction`] value is bound under the name in the global
    /// frame.
    ///
    /// # Errors
    /// Fails with a `syntax`-kind error if the name is not a valid
    /// identifier.
    pub fn register_native(&mut self,
                           name: &str,
                           arity: usize,
                           handler: NativeHandler)
                           -> Result<(), IncompleteError> {
        let id = Identifier::new(name)?;
        self.natives.insert(name.to_string(), (arity, handler));
        self.define_global(id, Value::NativeFunction(NativeFunction::new(name, arity)));
        Ok(())
    }

    /// Registers every builtin of the bundled table.
    pub(crate) fn register_default_natives(&mut self) -> Result<(), IncompleteError> {
        for def in NATIVE_TABLE {
            self.register_native(def.name, def.arity, def.handler)?;
        }
        Ok(())
    }
}

/// Coerces one native argument to a float, promoting integers exactly.
fn float_argument(value: &Value) -> Result<f64, IncompleteError> {
    match value {
        Value::Float(v) => Ok(*v),
        Value::Integer(v) => {
            i64_to_f64_checked(*v,
                               IncompleteError::IntegerOverflow { operation: "promotion to \
                                                                             float" })
        },
        _ => Err(IncompleteError::TypeMismatch { expected: "a number",
                                                 found:    value.type_name().to_string(), }),
    }
}

/// The square root of a number, as a float.
fn sqrt(args: &[Value]) -> Result<Option<Value>, IncompleteError> {
    Ok(Some(Value::Float(float_argument(&args[0])?.sqrt())))
}

/// Applies one of the rounding builtins to a number.
///
/// Integers pass through unchanged; floats are rounded and stay floats.
fn unary_round(name: &str, args: &[Value]) -> Result<Option<Value>, IncompleteError> {
    if let Value::Integer(_) = &args[0] {
        return Ok(Some(args[0].clone()));
    }
    let value = float_argument(&args[0])?;
    let rounded = match name {
        "floor" => value.floor(),
        "ceil" => value.ceil(),
        _ => value.round(),
    };
    Ok(Some(Value::Float(rounded)))
}
