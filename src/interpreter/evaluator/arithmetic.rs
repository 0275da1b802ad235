use crate::{
    ast::PrimitiveToken,
    error::IncompleteError,
    interpreter::{
        evaluator::core::{EvalResult, Flow, Interpreter},
        value::core::{NumericPair, Value},
    },
};

impl Interpreter {
    /// Evaluates one of the binary arithmetic primitives.
    ///
    /// Mixed integer/float operands are promoted to float with an
    /// exactness check. Integer arithmetic is checked: overflow is a
    /// `math`-kind error, never a silent wrap. Division and remainder by
    /// zero are `math`-kind errors for both numeric categories; the
    /// remainder keeps the sign of the dividend.
    pub(crate) fn eval_arithmetic(&mut self, op: PrimitiveToken) -> EvalResult<Flow> {
        let right = self.pop_value()?;
        let left = self.pop_value()?;
        let result = arithmetic(op, &left, &right)?;
        self.push(result);
        Ok(Flow::Continue)
    }
}

/// Applies one arithmetic operator to two already-popped operands.
fn arithmetic(op: PrimitiveToken, left: &Value, right: &Value) -> Result<Value, IncompleteError> {
    use PrimitiveToken::{Add, Divide, Multiply, Remainder, Subtract};

    match left.promote_pair(right)? {
        NumericPair::Integers(a, b) => {
            let result = match op {
                Add => a.checked_add(b)
                        .ok_or(IncompleteError::IntegerOverflow { operation: "addition" })?,
                Subtract => {
                    a.checked_sub(b)
                     .ok_or(IncompleteError::IntegerOverflow { operation: "subtraction" })?
                },
                Multiply => {
                    a.checked_mul(b)
                     .ok_or(IncompleteError::IntegerOverflow { operation: "multiplication" })?
                },
                Divide => {
                    if b == 0 {
                        return Err(IncompleteError::DivisionByZero);
                    }
                    a.checked_div(b)
                     .ok_or(IncompleteError::IntegerOverflow { operation: "division" })?
                },
                Remainder => {
                    if b == 0 {
                        return Err(IncompleteError::DivisionByZero);
                    }
                    a.checked_rem(b)
                     .ok_or(IncompleteError::IntegerOverflow { operation: "remainder" })?
                },
                _ => unreachable!("only arithmetic operators reach this point"),
            };
            Ok(Value::Integer(result))
        },
        NumericPair::Floats(a, b) => {
            let result = match op {
                Add => a + b,
                Subtract => a - b,
                Multiply => a * b,
                Divide => {
                    if b == 0.0 {
                        return Err(IncompleteError::DivisionByZero);
                    }
                    a / b
                },
                Remainder => {
                    if b == 0.0 {
                        return Err(IncompleteError::DivisionByZero);
                    }
                    a % b
                },
                _ => unreachable!("only arithmetic operators reach this point"),
            };
            Ok(Value::Float(result))
        },
    }
}
