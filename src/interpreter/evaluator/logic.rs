use crate::{
    ast::PrimitiveToken,
    interpreter::{
        evaluator::core::{EvalResult, Flow, Interpreter},
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates `and`, `or` or `xor` on two booleans.
    ///
    /// Both operands are popped and checked; there is no short-circuiting
    /// to cut, since operands were already evaluated when they were
    /// pushed.
    pub(crate) fn eval_logic(&mut self, op: PrimitiveToken) -> EvalResult<Flow> {
        let right = self.pop_value()?.as_boolean()?;
        let left = self.pop_value()?.as_boolean()?;

        let result = match op {
            PrimitiveToken::And => left && right,
            PrimitiveToken::Or => left || right,
            PrimitiveToken::Xor => left != right,
            _ => unreachable!("only logic operators reach this point"),
        };
        self.push(Value::Boolean(result));
        Ok(Flow::Continue)
    }

    /// Evaluates `not` on one boolean.
    pub(crate) fn eval_not(&mut self) -> EvalResult<Flow> {
        let value = self.pop_value()?.as_boolean()?;
        self.push(Value::Boolean(!value));
        Ok(Flow::Continue)
    }

    /// Evaluates `cat`: concatenation of two strings.
    pub(crate) fn eval_cat(&mut self) -> EvalResult<Flow> {
        let right = self.pop_value()?.as_string()?;
        let left = self.pop_value()?.as_string()?;
        self.push(Value::from(format!("{left}{right}").as_str()));
        Ok(Flow::Continue)
    }
}
