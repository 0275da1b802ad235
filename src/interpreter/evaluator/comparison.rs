use crate::{
    ast::PrimitiveToken,
    interpreter::{
        evaluator::core::{EvalResult, Flow, Interpreter},
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates one of the ordering primitives `<`, `>`, `<=`, `>=`.
    ///
    /// The order is total on each primitive type; integer/float pairs are
    /// promoted first, every other mixed pair is a `type`-kind error.
    pub(crate) fn eval_ordering(&mut self, op: PrimitiveToken) -> EvalResult<Flow> {
        let right = self.pop_value()?;
        let left = self.pop_value()?;
        let ordering = left.compare(&right)?;

        let result = match op {
            PrimitiveToken::Less => ordering.is_lt(),
            PrimitiveToken::Greater => ordering.is_gt(),
            PrimitiveToken::LessEqual => ordering.is_le(),
            PrimitiveToken::GreaterEqual => ordering.is_ge(),
            _ => unreachable!("only ordering operators reach this point"),
        };
        self.push(Value::Boolean(result));
        Ok(Flow::Continue)
    }

    /// Evaluates `=` or `/=`: structural equality on any two values, with
    /// numeric promotion.
    pub(crate) fn eval_equality(&mut self, op: PrimitiveToken) -> EvalResult<Flow> {
        let right = self.pop_value()?;
        let left = self.pop_value()?;
        let equal = left.equals(&right);
        self.push(Value::Boolean(if op == PrimitiveToken::Equal { equal } else { !equal }));
        Ok(Flow::Continue)
    }
}
