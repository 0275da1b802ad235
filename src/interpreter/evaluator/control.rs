use crate::interpreter::evaluator::core::{EvalResult, Flow, Interpreter};

impl Interpreter {
    /// `if`: pops a block and a condition; calls the block if the
    /// condition is true.
    ///
    /// The block runs in the current scope; a `return` inside it unwinds
    /// the enclosing function frame.
    pub(crate) fn eval_if(&mut self, index: usize) -> EvalResult<Flow> {
        let block = self.pop_value()?;
        let condition = self.pop_value()?.as_boolean()?;
        if condition { self.call_value(block, None, index) } else { Ok(Flow::Continue) }
    }

    /// `ifelse`: pops an else-block, a then-block and a condition; calls
    /// one of the blocks.
    pub(crate) fn eval_ifelse(&mut self, index: usize) -> EvalResult<Flow> {
        let else_block = self.pop_value()?;
        let then_block = self.pop_value()?;
        let condition = self.pop_value()?.as_boolean()?;
        self.call_value(if condition { then_block } else { else_block }, None, index)
    }

    /// `while`: pops a body block and a condition block; calls the body
    /// as long as the condition block pushes true.
    pub(crate) fn eval_while(&mut self, index: usize) -> EvalResult<Flow> {
        let body = self.pop_value()?;
        let condition = self.pop_value()?;

        loop {
            let flow = self.call_value(condition.clone(), None, index)?;
            if let Flow::Return { .. } = flow {
                return Ok(flow);
            }
            if !self.pop_value()?.as_boolean()? {
                return Ok(Flow::Continue);
            }

            let flow = self.call_value(body.clone(), None, index)?;
            if let Flow::Return { .. } = flow {
                return Ok(flow);
            }
        }
    }
}
