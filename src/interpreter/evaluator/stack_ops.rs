use crate::interpreter::evaluator::core::{EvalResult, Flow, Interpreter};

impl Interpreter {
    /// `dup`: duplicates the top of the stack with a shallow copy.
    ///
    /// Objects and nametables alias their backing table, so both copies
    /// observe later field writes.
    pub(crate) fn eval_dup(&mut self) -> EvalResult<Flow> {
        let value = self.pop_value()?;
        let copy = value.copy();
        self.push(value);
        self.push(copy);
        Ok(Flow::Continue)
    }

    /// `pop`: discards the top of the stack.
    pub(crate) fn eval_pop(&mut self) -> EvalResult<Flow> {
        self.pop_value()?;
        Ok(Flow::Continue)
    }

    /// `swap`: exchanges the two topmost values.
    pub(crate) fn eval_swap(&mut self) -> EvalResult<Flow> {
        let top = self.pop_value()?;
        let below = self.pop_value()?;
        self.push(top);
        self.push(below);
        Ok(Flow::Continue)
    }
}
