use std::io::Write;

use crate::error::IncompleteError;

/// The input/output interface the printing primitives go through.
///
/// `write` and `writeln` never touch the process output directly; they go
/// through this interface, which either forwards to standard output or
/// collects everything into an in-memory buffer. The buffer form is what
/// the test helpers and [`crate::get_output`] use to observe program
/// output.
#[derive(Debug)]
pub struct IoInterface {
    sink: Sink,
}

#[derive(Debug)]
enum Sink {
    Stdout,
    Buffer(Vec<u8>),
}

impl IoInterface {
    /// Creates an interface that forwards to standard output.
    #[must_use]
    pub const fn stdout() -> Self {
        Self { sink: Sink::Stdout }
    }

    /// Creates an interface that collects output into a buffer.
    #[must_use]
    pub const fn buffer() -> Self {
        Self { sink: Sink::Buffer(Vec::new()) }
    }

    /// Writes a string without a trailing newline.
    ///
    /// # Errors
    /// Returns an `io`-kind error if the underlying sink fails.
    pub fn write(&mut self, text: &str) -> Result<(), IncompleteError> {
        match &mut self.sink {
            Sink::Stdout => {
                let stdout = std::io::stdout();
                let mut lock = stdout.lock();
                lock.write_all(text.as_bytes())
                    .and_then(|()| lock.flush())
                    .map_err(|e| IncompleteError::Io { message: e.to_string() })
            },
            Sink::Buffer(buffer) => {
                buffer.extend_from_slice(text.as_bytes());
                Ok(())
            },
        }
    }

    /// Writes a string followed by a newline.
    ///
    /// # Errors
    /// Returns an `io`-kind error if the underlying sink fails.
    pub fn write_line(&mut self, text: &str) -> Result<(), IncompleteError> {
        self.write(text)?;
        self.write("\n")
    }

    /// Returns everything collected so far, or the empty string for the
    /// standard output form.
    #[must_use]
    pub fn captured(&self) -> String {
        match &self.sink {
            Sink::Stdout => String::new(),
            Sink::Buffer(buffer) => String::from_utf8_lossy(buffer).into_owned(),
        }
    }
}

impl Default for IoInterface {
    fn default() -> Self {
        Self::stdout()
    }
}
