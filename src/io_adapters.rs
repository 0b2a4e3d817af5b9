use crate::command::Stdout;
use anyhow::{Context, Result};
use std::cell::RefCell;
use std::fs::File;
use std::io::{self, Result as IoResult, Write};
use std::rc::Rc;

/// Where a command's standard output goes.
///
/// A redirect file is created (or truncated) when the output is opened and closed
/// when the value is dropped, so no handle outlives the command that opened it.
pub enum Output {
    /// The shell's own standard output.
    Inherit,
    /// A redirection target.
    File(File),
}

impl Output {
    /// Open the output for a command, creating or truncating `target` if given.
    pub fn open(target: Option<&str>) -> Result<Self> {
        match target {
            None => Ok(Output::Inherit),
            Some(path) => File::create(path)
                .map(Output::File)
                .map_err(|e| anyhow::anyhow!("{}: {}", path, describe_io_error(&e))),
        }
    }

    /// Flush buffered data; for files this also surfaces late write errors.
    pub fn finish(&mut self) -> Result<()> {
        match self {
            Output::Inherit => Ok(()),
            Output::File(file) => file.flush().context("failed to flush output file"),
        }
    }

    /// Convert into a sink that can be handed to a child process.
    pub fn into_stdout(self) -> Box<dyn Stdout> {
        match self {
            Output::Inherit => Box::new(io::stdout()),
            Output::File(file) => Box::new(file),
        }
    }
}

/// Render an I/O error the way shells do: the OS reason without the
/// `(os error N)` suffix that `std::io::Error` appends.
pub fn describe_io_error(err: &io::Error) -> String {
    let text = err.to_string();
    match text.find(" (os error ") {
        Some(idx) => text[..idx].to_string(),
        None => text,
    }
}

/// Memory-backed writer for capturing output of the interpreter.
///
/// Clones share the same buffer, so a caller can keep one handle and pass the
/// other to the interpreter.
#[derive(Clone, Default)]
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, decoded lossily.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.borrow()).into_owned()
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}
