//! Line acquisition for the interactive loop.

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, Write};

/// Something that yields one command line per call.
pub trait LineSource {
    /// Show `prompt` and read the next line without its line terminator.
    ///
    /// Returns `Ok(None)` once input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Terminal input with line editing.
pub struct EditorInput {
    editor: DefaultEditor,
    history: bool,
}

impl EditorInput {
    pub fn new(history: bool) -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            history,
        })
    }
}

impl LineSource for EditorInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if self.history && !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Some(line))
            }
            // Ctrl-C drops the current line.
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Plain buffered input, used when standard input is not a terminal.
pub struct PlainInput<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> PlainInput<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }
}

impl<R: BufRead, W: Write> LineSource for PlainInput<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.prompt_out, "{prompt}")?;
        self.prompt_out.flush()?;

        let mut raw = Vec::new();
        if self.reader.read_until(b'\n', &mut raw)? == 0 {
            return Ok(None);
        }
        if raw.last() == Some(&b'\n') {
            raw.pop();
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
        }
        // Invalid UTF-8 is replaced, not rejected.
        Ok(Some(String::from_utf8_lossy(&raw).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_plain_input_prompts_and_strips_newlines() {
        let mut prompts = Vec::new();
        {
            let mut input = PlainInput::new(Cursor::new("echo a\r\npwd\nlast"), &mut prompts);
            assert_eq!(input.read_line("$ ").unwrap().as_deref(), Some("echo a"));
            assert_eq!(input.read_line("$ ").unwrap().as_deref(), Some("pwd"));
            assert_eq!(input.read_line("$ ").unwrap().as_deref(), Some("last"));
            assert_eq!(input.read_line("$ ").unwrap(), None);
        }
        assert_eq!(String::from_utf8(prompts).unwrap(), "$ $ $ $ ");
    }

    #[test]
    fn test_plain_input_keeps_blank_lines() {
        let mut input = PlainInput::new(Cursor::new("\n  \n"), Vec::new());
        assert_eq!(input.read_line("").unwrap().as_deref(), Some(""));
        assert_eq!(input.read_line("").unwrap().as_deref(), Some("  "));
        assert_eq!(input.read_line("").unwrap(), None);
    }

    #[test]
    fn test_plain_input_tolerates_invalid_utf8() {
        let bytes: &[u8] = b"echo \xff\xfe\necho after\n";
        let mut input = PlainInput::new(Cursor::new(bytes), Vec::new());
        assert_eq!(
            input.read_line("").unwrap().as_deref(),
            Some("echo \u{FFFD}\u{FFFD}")
        );
        assert_eq!(input.read_line("").unwrap().as_deref(), Some("echo after"));
        assert_eq!(input.read_line("").unwrap(), None);
    }
}
