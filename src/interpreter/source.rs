use std::sync::Arc;

/// Tag used for code passed on the command line or to the library entry
/// points.
pub const LITERAL_TAG: &str = "<literal>";
/// Tag used for the embedded preamble.
pub const PREAMBLE_TAG: &str = "<preamble>";

/// A unit of source code together with the tag identifying its origin.
///
/// The tag is either a real file path or a synthetic tag such as
/// [`LITERAL_TAG`] or [`PREAMBLE_TAG`]. The code is the *cleaned* form
/// produced by the preprocessor; byte indices in tokens, nodes and errors
/// all point into it. Cloning is cheap, so values and errors hold their
/// own handle to the code they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    name: Arc<str>,
    code: Arc<str>,
}

impl SourceFile {
    /// Creates a source unit from a tag and its cleaned code.
    #[must_use]
    pub fn new(name: &str, code: &str) -> Self {
        Self { name: Arc::from(name),
               code: Arc::from(code) }
    }

    /// Returns the origin tag.
    #[must_use]
    pub fn name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// Returns the cleaned code.
    #[must_use]
    pub fn code(&self) -> Arc<str> {
        Arc::clone(&self.code)
    }

    /// Returns the cleaned code as a string slice.
    #[must_use]
    pub fn code_str(&self) -> &str {
        &self.code
    }
}
