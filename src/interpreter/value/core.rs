use std::{cell::RefCell, cmp::Ordering, rc::Rc, sync::Arc};

use ordered_float::OrderedFloat;

use crate::{
    error::IncompleteError,
    interpreter::value::{
        function::{CodeBlock, CurriedFunction, Function, NativeFunction},
        nametable::{Identifier, Nametable, Object},
    },
    util::num::i64_to_f64_checked,
};

/// How much detail a debug string carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugStringExtensiveness {
    /// A short single-line form, suitable for stack dumps.
    Compact,
    /// The fully detailed form, possibly spanning lines.
    Full,
    /// Only the type name.
    Type,
}

/// Represents a runtime value: the universal stack element.
///
/// This enum models every type that can appear on the operand stack or
/// inside a nametable. Numbers, booleans, strings and identifiers are
/// immutable; code blocks, functions, curried functions and constructors
/// are the callable values; objects and nametables have reference
/// semantics.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64-bit signed integer.
    Integer(i64),
    /// A 64-bit IEEE floating-point number.
    Float(f64),
    /// A boolean, `true` or `false`.
    Boolean(bool),
    /// An immutable string.
    String(Arc<str>),
    /// An identifier appearing as data; the call operator resolves it.
    Identifier(Identifier),
    /// An unexecuted code block.
    CodeBlock(CodeBlock),
    /// A function with a declared argument count.
    Function(Rc<Function>),
    /// A function with some arguments already supplied.
    CurriedFunction(Rc<CurriedFunction>),
    /// A function that the interpreter treats as an object constructor.
    Constructor(Rc<Function>),
    /// An object created by a constructor call.
    Object(Object),
    /// A bare nametable, as used for scope frames.
    Nametable(Rc<RefCell<Nametable>>),
    /// A registered native builtin.
    NativeFunction(NativeFunction),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(Arc::from(v))
    }
}

impl From<Identifier> for Value {
    fn from(v: Identifier) -> Self {
        Self::Identifier(v)
    }
}

/// A pair of numeric operands after mixed-type promotion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericPair {
    /// Both operands are integers.
    Integers(i64, i64),
    /// At least one operand was a float; both are floats now.
    Floats(f64, f64),
}

impl Value {
    /// Returns the name of this value's type, as used in error messages
    /// and `Type` debug strings.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "Integer",
            Self::Float(_) => "Float",
            Self::Boolean(_) => "Boolean",
            Self::String(_) => "String",
            Self::Identifier(_) => "Identifier",
            Self::CodeBlock(_) => "CodeBlock",
            Self::Function(_) => "Function",
            Self::CurriedFunction(_) => "CurriedFunction",
            Self::Constructor(_) => "Constructor",
            Self::Object(_) => "Object",
            Self::Nametable(_) => "Nametable",
            Self::NativeFunction(_) => "NativeFunction",
        }
    }

    /// Returns whether this value takes part in the call protocol.
    #[must_use]
    pub const fn is_callable(&self) -> bool {
        matches!(self,
                 Self::Identifier(_)
                 | Self::CodeBlock(_)
                 | Self::Function(_)
                 | Self::CurriedFunction(_)
                 | Self::Constructor(_)
                 | Self::NativeFunction(_))
    }

    /// Returns the user-visible form of the value, as printed by `write`
    /// and `writeln`.
    #[must_use]
    pub fn print(&self) -> String {
        match self {
            Self::Integer(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Boolean(v) => v.to_string(),
            Self::String(s) => s.to_string(),
            Self::Identifier(id) => id.name().to_string(),
            Self::CodeBlock(block) => block.span_text().to_string(),
            Self::Function(f) => format!("{{ {} argument Function }}", f.arity()),
            Self::CurriedFunction(c) => format!("{{ {} argument Function curried @ {} }}",
                                                c.remaining_arity(),
                                                c.curried_arguments().len()),
            Self::Constructor(f) => format!("{{ {} argument Constructor }}", f.arity()),
            Self::Object(_) | Self::Nametable(_) => {
                self.debug_string(DebugStringExtensiveness::Compact)
            },
            Self::NativeFunction(n) => {
                format!("{{ native function {}/{} }}", n.name(), n.arity())
            },
        }
    }

    /// Returns a debug representation with the requested extensiveness.
    #[must_use]
    pub fn debug_string(&self, e: DebugStringExtensiveness) -> String {
        match e {
            DebugStringExtensiveness::Type => self.type_name().to_string(),
            DebugStringExtensiveness::Compact => match self {
                Self::String(s) => format!("\"{s}\""),
                Self::Identifier(id) => id.name().to_string(),
                Self::CodeBlock(block) => format!("[CodeBlock {}n]", block.node_count()),
                Self::Function(f) => {
                    format!("[Function/{} {}n]", f.arity(), f.code().node_count())
                },
                Self::CurriedFunction(c) => format!("[CurriedFunction/{}-{} {}n]",
                                                    c.curried_arguments().len(),
                                                    c.remaining_arity(),
                                                    c.base().code().node_count()),
                Self::Constructor(f) => {
                    format!("[Constructor/{} {}n]", f.arity(), f.code().node_count())
                },
                Self::Object(obj) => format!("Obj({}, NT[{}])", obj.name(), obj.table().borrow().size()),
                Self::Nametable(nt) => format!("NT[{}]", nt.borrow().size()),
                _ => self.print(),
            },
            DebugStringExtensiveness::Full => match self {
                Self::String(s) => format!("s\"{}\"({})", s, s.len()),
                Self::Identifier(id) => format!("Identifier({})", id.name()),
                Self::CodeBlock(block) => format!("[CodeBlock {}]", block.span_text()),
                Self::Function(f) => {
                    format!("[Function/{} {}]", f.arity(), f.code().span_text())
                },
                Self::CurriedFunction(c) => {
                    let stored = c.curried_arguments()
                                  .iter()
                                  .map(|v| v.debug_string(DebugStringExtensiveness::Compact))
                                  .collect::<Vec<_>>()
                                  .join(", ");
                    format!("[CurriedFunction/{} - [{}] {}]",
                            c.remaining_arity(),
                            stored,
                            c.base().code().span_text())
                },
                Self::Constructor(f) => {
                    format!("[Constructor/{} {}]", f.arity(), f.code().span_text())
                },
                Self::Object(obj) => format!("Object {}:\n{}",
                                             obj.name(),
                                             nametable_listing(&obj.table().borrow())),
                Self::Nametable(nt) => nametable_listing(&nt.borrow()),
                _ => self.print(),
            },
        }
    }

    /// Structural equality, with integer/float pairs promoted before
    /// comparing.
    ///
    /// # Example
    /// ```
    /// use sof::interpreter::value::core::Value;
    ///
    /// assert!(Value::Integer(1).equals(&Value::Float(1.0)));
    /// assert!(!Value::Integer(1).equals(&Value::from("1")));
    /// ```
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Float(b)) | (Self::Float(b), Self::Integer(a)) => {
                i64_to_f64_checked(*a, ()).map(|a| a == *b).unwrap_or(false)
            },
            _ => self == other,
        }
    }

    /// Orders this value against another of the same primitive type, or of
    /// the mixed integer/float pair, which is promoted first.
    ///
    /// The order is total on each type; floats use their total order, so
    /// even NaN sorts consistently.
    ///
    /// # Errors
    /// Returns a `type`-kind error for every other mixed pair and for
    /// values without an order.
    pub fn compare(&self, other: &Self) -> Result<Ordering, IncompleteError> {
        let incomparable = || IncompleteError::IncomparableTypes { left:  self.type_name()
                                                                             .to_string(),
                                                                  right: other.type_name()
                                                                              .to_string(), };
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Ok(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => Ok(OrderedFloat(*a).cmp(&OrderedFloat(*b))),
            (Self::Integer(a), Self::Float(b)) => {
                let a = i64_to_f64_checked(*a, incomparable())?;
                Ok(OrderedFloat(a).cmp(&OrderedFloat(*b)))
            },
            (Self::Float(a), Self::Integer(b)) => {
                let b = i64_to_f64_checked(*b, incomparable())?;
                Ok(OrderedFloat(*a).cmp(&OrderedFloat(b)))
            },
            (Self::Boolean(a), Self::Boolean(b)) => Ok(a.cmp(b)),
            (Self::String(a), Self::String(b)) => Ok(a.as_ref().cmp(b.as_ref())),
            (Self::Identifier(a), Self::Identifier(b)) => Ok(a.cmp(b)),
            _ => Err(incomparable()),
        }
    }

    /// Returns a copy of the value.
    ///
    /// Immutable values alias trivially; objects and nametables alias
    /// their backing table, so the copy observes later field writes.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Converts the value to an `i64`, or returns an error if it is not an
    /// integer.
    ///
    /// # Errors
    /// Returns a `type`-kind error for non-integers.
    pub fn as_integer(&self) -> Result<i64, IncompleteError> {
        match self {
            Self::Integer(v) => Ok(*v),
            _ => Err(self.type_mismatch("an integer")),
        }
    }

    /// Converts the value to `bool`, or returns an error if it is not a
    /// boolean.
    ///
    /// # Errors
    /// Returns a `type`-kind error for non-booleans.
    pub fn as_boolean(&self) -> Result<bool, IncompleteError> {
        match self {
            Self::Boolean(v) => Ok(*v),
            _ => Err(self.type_mismatch("a boolean")),
        }
    }

    /// Converts the value to a string handle, or returns an error if it is
    /// not a string.
    ///
    /// # Errors
    /// Returns a `type`-kind error for non-strings.
    pub fn as_string(&self) -> Result<Arc<str>, IncompleteError> {
        match self {
            Self::String(s) => Ok(Arc::clone(s)),
            _ => Err(self.type_mismatch("a string")),
        }
    }

    /// Converts the value to an identifier, or returns an error.
    ///
    /// # Errors
    /// Returns a `type`-kind error for non-identifiers.
    pub fn as_identifier(&self) -> Result<Identifier, IncompleteError> {
        match self {
            Self::Identifier(id) => Ok(id.clone()),
            _ => Err(self.type_mismatch("an identifier")),
        }
    }

    /// Converts the value to a code block, or returns an error.
    ///
    /// # Errors
    /// Returns a `type`-kind error for non-blocks.
    pub fn as_code_block(&self) -> Result<CodeBlock, IncompleteError> {
        match self {
            Self::CodeBlock(block) => Ok(block.clone()),
            _ => Err(self.type_mismatch("a code block")),
        }
    }

    /// Promotes two numeric operands for mixed arithmetic.
    ///
    /// Integer pairs stay integral; as soon as one side is a float, the
    /// other is converted with an exactness check.
    ///
    /// # Errors
    /// Returns a `type`-kind error if either operand is not numeric, and a
    /// `math`-kind error if an integer is too large to promote exactly.
    pub fn promote_pair(&self, other: &Self) -> Result<NumericPair, IncompleteError> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Ok(NumericPair::Integers(*a, *b)),
            (Self::Float(a), Self::Float(b)) => Ok(NumericPair::Floats(*a, *b)),
            (Self::Integer(a), Self::Float(b)) => {
                let promoted = i64_to_f64_checked(*a, promotion_overflow())?;
                Ok(NumericPair::Floats(promoted, *b))
            },
            (Self::Float(a), Self::Integer(b)) => {
                let promoted = i64_to_f64_checked(*b, promotion_overflow())?;
                Ok(NumericPair::Floats(*a, promoted))
            },
            (Self::Integer(_) | Self::Float(_), _) => Err(other.type_mismatch("a number")),
            _ => Err(self.type_mismatch("a number")),
        }
    }

    fn type_mismatch(&self, expected: &'static str) -> IncompleteError {
        IncompleteError::TypeMismatch { expected,
                                        found: self.type_name().to_string() }
    }
}

const fn promotion_overflow() -> IncompleteError {
    IncompleteError::IntegerOverflow { operation: "promotion to float" }
}

/// Renders every binding of a nametable, one line each.
fn nametable_listing(table: &Nametable) -> String {
    let mut lines: Vec<String> =
        table.entries()
             .map(|(key, value)| {
                 format!("{:>20} -> {}",
                         key.name(),
                         value.debug_string(DebugStringExtensiveness::Compact))
             })
             .collect();
    lines.sort();
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::{DebugStringExtensiveness, Value};
    use crate::interpreter::value::nametable::{Identifier, Nametable};

    #[test]
    fn mixed_numeric_equality_promotes() {
        assert!(Value::Integer(2).equals(&Value::Float(2.0)));
        assert!(!Value::Integer(2).equals(&Value::Float(2.5)));
        assert!(!Value::Boolean(true).equals(&Value::Integer(1)));
    }

    #[test]
    fn comparison_is_total_per_type() {
        assert!(Value::from("abc").compare(&Value::from("abd")).unwrap().is_lt());
        assert!(Value::Integer(3).compare(&Value::Float(3.5)).unwrap().is_lt());
        assert!(Value::from("abc").compare(&Value::Integer(1)).is_err());
    }

    #[test]
    fn nametable_values_render_compactly() {
        let table = Rc::new(RefCell::new(Nametable::new()));
        table.borrow_mut()
             .put(Identifier::new("x").unwrap(), Value::Integer(1));
        let value = Value::Nametable(table);
        assert_eq!(value.debug_string(DebugStringExtensiveness::Compact), "NT[1]");
        assert_eq!(value.debug_string(DebugStringExtensiveness::Type), "Nametable");
    }

    #[test]
    fn nametable_return_slot_round_trips() {
        let mut table = Nametable::new();
        assert!(table.return_value().is_none());
        table.set_return(Value::Integer(9));
        assert_eq!(table.take_return(), Some(Value::Integer(9)));
        assert!(table.return_value().is_none());
    }

    #[test]
    fn nametable_bulk_insert_overwrites() {
        let x = Identifier::new("x").unwrap();
        let y = Identifier::new("y").unwrap();

        let mut base = Nametable::new();
        base.put(x.clone(), Value::Integer(1));
        assert!(base.has(&x));

        let mut incoming = Nametable::new();
        incoming.put(x.clone(), Value::Integer(2));
        incoming.put(y.clone(), Value::Integer(3));

        base.put_all(&incoming);
        assert_eq!(base.get(&x), Some(&Value::Integer(2)));
        assert_eq!(base.get(&y), Some(&Value::Integer(3)));
        assert_eq!(base.identifiers().count(), 2);
    }
}
