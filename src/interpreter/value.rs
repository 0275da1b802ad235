/// Core value type of the runtime.
///
/// Declares the tagged `Value` enum that every stack slot and nametable
/// entry holds, together with printing, debug strings, structural
/// equality, ordering, and the typed accessors the evaluator uses.
pub mod core;
/// Callable values built from code blocks.
///
/// Code blocks capture an unexecuted token list with its source span;
/// functions add a declared arity and a non-owning handle to the global
/// frame; curried functions wrap a function together with already
/// supplied arguments; native functions name a registered host builtin.
pub mod function;
/// Identifiers, nametables and objects.
///
/// A nametable is a single scope frame mapping identifiers to values,
/// with an optional return-value slot. Objects are nametables with a name,
/// produced by constructor calls.
pub mod nametable;
