use std::sync::Arc;

use crate::{
    error::IncompleteError,
    interpreter::{
        evaluator::core::{EvalResult, Flow, Interpreter},
        lexer::{self, LexicalError},
        value::core::Value,
    },
    util::num::{f64_to_i64_checked, i64_to_f64_checked},
};

impl Interpreter {
    /// `convert:int`: coerces the top of the stack to an integer.
    ///
    /// Floats are truncated toward zero and must be finite and in range.
    /// Strings are parsed with the integer literal grammar, base prefixes
    /// included. Booleans map to `0` and `1`. Everything else is a
    /// `math`-kind illegal conversion.
    pub(crate) fn eval_convert_int(&mut self) -> EvalResult<Flow> {
        let value = self.pop_value()?;
        let converted = match &value {
            Value::Integer(v) => *v,
            Value::Float(v) => f64_to_i64_checked(*v, conversion_error(&value, "Integer"))?,
            Value::Boolean(v) => i64::from(*v),
            Value::String(s) => {
                lexer::parse_integer_literal(s).map_err(|e| match e {
                                                   LexicalError::IntegerOutOfRange => {
                                                       IncompleteError::IntegerOutOfRange {
                                                           literal: s.to_string(),
                                                       }
                                                   },
                                                   LexicalError::InvalidToken => {
                                                       conversion_error(&value, "Integer")
                                                   },
                                               })?
            },
            _ => return Err(conversion_error(&value, "Integer").into()),
        };
        self.push(Value::Integer(converted));
        Ok(Flow::Continue)
    }

    /// `convert:float`: coerces the top of the stack to a float.
    ///
    /// Integers must be exactly representable. Strings are parsed as
    /// float literals.
    pub(crate) fn eval_convert_float(&mut self) -> EvalResult<Flow> {
        let value = self.pop_value()?;
        let converted = match &value {
            Value::Float(v) => *v,
            Value::Integer(v) => i64_to_f64_checked(*v, conversion_error(&value, "Float"))?,
            Value::String(s) => {
                s.trim()
                 .parse()
                 .map_err(|_| conversion_error(&value, "Float"))?
            },
            _ => return Err(conversion_error(&value, "Float").into()),
        };
        self.push(Value::Float(converted));
        Ok(Flow::Continue)
    }

    /// `convert:string`: replaces the top of the stack with its printed
    /// form. Every value converts.
    pub(crate) fn eval_convert_string(&mut self) -> EvalResult<Flow> {
        let value = self.pop_value()?;
        self.push(Value::String(Arc::from(value.print().as_str())));
        Ok(Flow::Continue)
    }

    /// `convert:bool`: coerces the top of the stack to a boolean.
    ///
    /// Integers are false exactly at zero; the strings `true` and `false`
    /// convert case-insensitively.
    pub(crate) fn eval_convert_bool(&mut self) -> EvalResult<Flow> {
        let value = self.pop_value()?;
        let converted = match &value {
            Value::Boolean(v) => *v,
            Value::Integer(v) => *v != 0,
            Value::String(s) if s.eq_ignore_ascii_case("true") => true,
            Value::String(s) if s.eq_ignore_ascii_case("false") => false,
            _ => return Err(conversion_error(&value, "Boolean").into()),
        };
        self.push(Value::Boolean(converted));
        Ok(Flow::Continue)
    }
}

fn conversion_error(value: &Value, to: &'static str) -> IncompleteError {
    IncompleteError::InvalidConversion { from: value.type_name().to_string(),
                                         to:   to.to_string(), }
}
