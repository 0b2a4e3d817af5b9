use std::io::Write;
use std::process::Stdio;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Result of running one command line, shared by builtins and external programs.
///
/// Termination is a value, not a side effect: only the top of the program acts on
/// [`Outcome::Terminate`] by ending the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The shell keeps reading input; the code is the command's status.
    Continue(ExitCode),
    /// The shell must stop and exit with this code.
    Terminate(ExitCode),
}

impl Outcome {
    pub fn code(&self) -> ExitCode {
        match self {
            Outcome::Continue(code) | Outcome::Terminate(code) => *code,
        }
    }
}

/// Abstraction over a writable output stream that can also be converted into
/// a [`Stdio`] handle for spawning external processes.
///
/// A blanket implementation exists for any type that implements `Write` and `Into<Stdio>`
/// (e.g. `File` or `std::io::Stdout`).
pub trait Stdout: Write {
    /// Convert this output into a [`Stdio`] handle suitable for `std::process::Command`.
    fn stdio(self: Box<Self>) -> Stdio;
}

impl<T: Write + Into<Stdio>> Stdout for T {
    fn stdio(self: Box<Self>) -> Stdio {
        (*self).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_code() {
        assert_eq!(Outcome::Continue(3).code(), 3);
        assert_eq!(Outcome::Terminate(2).code(), 2);
    }
}
