use std::{cell::RefCell, collections::HashMap, rc::Rc, sync::Arc};

use crate::{error::IncompleteError, interpreter::value::core::Value};

/// A validated name used to refer to nametable contents.
///
/// Identifiers are values in their own right: an identifier appearing in
/// source pushes itself onto the stack, and `def` and the call operator
/// consume it. Two identifiers are equal exactly when their text is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    name: Arc<str>,
}

impl Identifier {
    /// Constructs an identifier after validating the name.
    ///
    /// # Errors
    /// Returns a `syntax`-kind error if the name is not a letter or
    /// underscore followed by letters, digits or underscores.
    ///
    /// # Example
    /// ```
    /// use sof::interpreter::value::nametable::Identifier;
    ///
    /// assert!(Identifier::new("x_1").is_ok());
    /// assert!(Identifier::new("1x").is_err());
    /// ```
    pub fn new(name: &str) -> Result<Self, IncompleteError> {
        let name = name.trim();
        if !Self::is_valid(name) {
            return Err(IncompleteError::InvalidIdentifier { name: name.to_string() });
        }
        Ok(Self { name: Arc::from(name) })
    }

    /// Tests whether a string forms a valid identifier.
    #[must_use]
    pub fn is_valid(name: &str) -> bool {
        let mut chars = name.chars();
        chars.next()
             .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    /// Returns the name this identifier stands for.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A single scope frame: a mapping from identifiers to values, plus an
/// optional return-value slot.
///
/// Insertion order is irrelevant; binding an already present identifier
/// overwrites the old value (last write wins). The return slot is what the
/// `return` primitive fills before unwinding, and what the call protocol
/// pushes after the frame is popped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Nametable {
    entries:      HashMap<Identifier, Value>,
    return_value: Option<Value>,
}

impl Nametable {
    /// Creates an empty nametable.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the identifier is already defined.
    #[must_use]
    pub fn has(&self, key: &Identifier) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the value bound to the identifier, if any.
    #[must_use]
    pub fn get(&self, key: &Identifier) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Binds the value to the identifier, returning the previous binding.
    pub fn put(&mut self, key: Identifier, value: Value) -> Option<Value> {
        self.entries.insert(key, value)
    }

    /// Copies all bindings of the given nametable into this one,
    /// overwriting existing bindings.
    pub fn put_all(&mut self, other: &Self) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    /// Returns all identifiers present in the nametable.
    pub fn identifiers(&self) -> impl Iterator<Item = &Identifier> {
        self.entries.keys()
    }

    /// Returns all bindings of the nametable.
    pub fn entries(&self) -> impl Iterator<Item = (&Identifier, &Value)> {
        self.entries.iter()
    }

    /// Fills the return-value slot.
    pub fn set_return(&mut self, value: Value) {
        self.return_value = Some(value);
    }

    /// Returns the current content of the return-value slot.
    #[must_use]
    pub const fn return_value(&self) -> Option<&Value> {
        self.return_value.as_ref()
    }

    /// Empties the return-value slot and returns what it held.
    pub fn take_return(&mut self) -> Option<Value> {
        self.return_value.take()
    }
}

/// An object: a nametable with a name, created by a constructor call.
///
/// Objects have reference semantics. Duplicating or copying an object
/// yields another handle to the same nametable, so a field write through
/// one handle is observable through every other.
#[derive(Debug, Clone)]
pub struct Object {
    name:  Identifier,
    table: Rc<RefCell<Nametable>>,
}

impl Object {
    /// Wraps a nametable as an object with the given class name.
    #[must_use]
    pub fn new(name: Identifier, table: Rc<RefCell<Nametable>>) -> Self {
        Self { name, table }
    }

    /// Returns the class identifier this object was constructed under.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        &self.name
    }

    /// Returns the nametable holding the object's fields.
    #[must_use]
    pub const fn table(&self) -> &Rc<RefCell<Nametable>> {
        &self.table
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
        && (Rc::ptr_eq(&self.table, &other.table) || *self.table.borrow() == *other.table.borrow())
    }
}
