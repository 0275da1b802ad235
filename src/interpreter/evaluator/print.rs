use crate::{
    error::IncompleteError,
    interpreter::{
        evaluator::core::{EvalResult, Flow, Interpreter},
        value::core::{DebugStringExtensiveness, Value},
    },
};

impl Interpreter {
    /// `write` and `writeln`: pop the top of the stack and print its
    /// user-visible form through the input/output interface.
    pub(crate) fn eval_write(&mut self, newline: bool) -> EvalResult<Flow> {
        let text = self.pop_value()?.print();
        if newline {
            self.io.write_line(&text)?;
        } else {
            self.io.write(&text)?;
        }
        Ok(Flow::Continue)
    }

    /// `describe`: replaces the top of the stack with its full debug
    /// string.
    pub(crate) fn eval_describe(&mut self) -> EvalResult<Flow> {
        let description = self.pop_value()?.debug_string(DebugStringExtensiveness::Full);
        self.push(Value::from(description.as_str()));
        Ok(Flow::Continue)
    }

    /// `assert`: pops a boolean; failure is an `assert`-kind error,
    /// success bumps the assert counter.
    pub(crate) fn eval_assert(&mut self) -> EvalResult<Flow> {
        if !self.pop_value()?.as_boolean()? {
            return Err(IncompleteError::AssertionFailed.into());
        }
        self.assert_count += 1;
        Ok(Flow::Continue)
    }
}
