//! A small interactive POSIX-style shell.
//!
//! A line goes through three stages: the [`lexer`] resolves quotes, escapes and
//! the `>`/`1>` operators into tokens, the [`parser`] separates the command words
//! from the redirection target, and the [`Interpreter`] dispatches the result to a
//! builtin (`cd`, `echo`, `exit`, `pwd`, `type`) or to an external program found on
//! `PATH`.
//!
//! Nothing in the library ends the process. Commands that should stop the shell
//! return [`Outcome::Terminate`], and the binary turns that into an exit status.

pub mod builtin;
pub mod command;
pub mod env;
pub mod external;
pub mod input;
mod interpreter;
pub mod io_adapters;
pub mod lexer;
pub mod parser;

#[cfg(test)]
mod test_util;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::{Interpreter, PROMPT};

pub use command::{ExitCode, Outcome};
