use crate::builtin::{BuiltinCommand, BuiltinRegistry, Context};
use crate::command::{ExitCode, Outcome};
use crate::env::Environment;
use crate::external::ExternalCommand;
use crate::input::LineSource;
use crate::io_adapters::{Output, describe_io_error};
use crate::lexer;
use crate::parser::{self, ParsedCommand};
use std::fmt::Display;
use std::io::{self, Write};
use tracing::{debug, warn};

/// Prompt written before every line is read.
pub const PROMPT: &str = "$ ";

/// Status of a line rejected by the parser.
pub const SYNTAX_ERROR_STATUS: ExitCode = 2;
/// Status when a command could not be started.
pub const CANNOT_EXECUTE_STATUS: ExitCode = 126;
/// Status when no builtin or program matches the name.
pub const NOT_FOUND_STATUS: ExitCode = 127;

/// A minimal shell-like interpreter that can execute built-in and external commands.
///
/// The interpreter owns the [`Environment`] capabilities and the [`BuiltinRegistry`]
/// and routes each parsed command to one or the other. It never exits the process
/// itself: [`Outcome::Terminate`] is handed back to the caller.
///
/// Example
/// ```
/// use myshell::{Interpreter, Outcome};
/// let mut sh = Interpreter::default();
/// assert_eq!(sh.execute_line("echo hello world"), Outcome::Continue(0));
/// assert_eq!(sh.execute_line("exit 3"), Outcome::Terminate(3));
/// ```
pub struct Interpreter {
    env: Environment,
    builtins: BuiltinRegistry,
    stdout: Box<dyn Write>,
    stderr: Box<dyn Write>,
}

impl Interpreter {
    /// Create an interpreter writing to the process's standard streams.
    pub fn new(env: Environment, builtins: BuiltinRegistry) -> Self {
        Self::with_output(env, builtins, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Create an interpreter whose builtins and diagnostics write to the given streams.
    ///
    /// External programs without a redirect still inherit the process's standard output.
    pub fn with_output(
        env: Environment,
        builtins: BuiltinRegistry,
        stdout: Box<dyn Write>,
        stderr: Box<dyn Write>,
    ) -> Self {
        Self {
            env,
            builtins,
            stdout,
            stderr,
        }
    }

    /// Read-eval loop: runs lines from `input` until it is exhausted or a command
    /// asks the shell to terminate.
    ///
    /// Returns the status the shell process should exit with.
    pub fn repl(&mut self, input: &mut dyn LineSource) -> anyhow::Result<ExitCode> {
        while let Some(line) = input.read_line(PROMPT)? {
            if let Outcome::Terminate(code) = self.execute_line(&line) {
                debug!(code, "terminating");
                return Ok(code);
            }
        }
        debug!("end of input");
        Ok(0)
    }

    /// Tokenize, parse and run one line.
    ///
    /// A syntax error discards the whole line; a blank line does nothing.
    pub fn execute_line(&mut self, line: &str) -> Outcome {
        let tokens = lexer::tokenize(line);
        debug!(?tokens, "tokenized");

        let outcome = match parser::parse(tokens) {
            Ok(Some(cmd)) => self.execute(cmd),
            Ok(None) => Outcome::Continue(0),
            Err(err) => {
                report(&mut *self.stderr, &err);
                Outcome::Continue(SYNTAX_ERROR_STATUS)
            }
        };
        self.flush_stdout();
        outcome
    }

    /// Run a parsed command: a builtin if the name is registered, otherwise a program
    /// found on the search path.
    pub fn execute(&mut self, cmd: ParsedCommand) -> Outcome {
        debug!(?cmd, "dispatching");
        let ParsedCommand {
            name,
            args,
            output_target,
        } = cmd;

        match self.builtins.get(&name) {
            Some(builtin) => {
                let ctx = Context {
                    env: &self.env,
                    builtins: &self.builtins,
                };
                let result = run_builtin(
                    builtin,
                    &args,
                    output_target.as_deref(),
                    &mut *self.stdout,
                    &mut *self.stderr,
                    &ctx,
                );
                match result {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        report(&mut *self.stderr, &err);
                        Outcome::Continue(1)
                    }
                }
            }
            None => self.run_external(&name, args, output_target.as_deref()),
        }
    }

    fn flush_stdout(&mut self) {
        if let Err(err) = self.stdout.flush() {
            report(
                &mut *self.stderr,
                format_args!("write error: {}", describe_io_error(&err)),
            );
        }
    }

    fn run_external(&mut self, name: &str, args: Vec<String>, target: Option<&str>) -> Outcome {
        let Some(path) = self.env.resolve_executable(name) else {
            report(&mut *self.stderr, format_args!("{name}: command not found"));
            return Outcome::Continue(NOT_FOUND_STATUS);
        };
        let output = match Output::open(target) {
            Ok(output) => output,
            Err(err) => {
                report(&mut *self.stderr, &err);
                return Outcome::Continue(1);
            }
        };

        // Keep our own buffered output ahead of the child's.
        self.flush_stdout();
        match ExternalCommand::new(name, path, args).run(output.into_stdout()) {
            Ok(outcome) => outcome,
            Err(err) => {
                report(&mut *self.stderr, &err);
                Outcome::Continue(CANNOT_EXECUTE_STATUS)
            }
        }
    }
}

/// Runs a builtin against its output, opening and closing the redirect file
/// around the call.
fn run_builtin(
    builtin: &dyn BuiltinCommand,
    args: &[String],
    target: Option<&str>,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
    ctx: &Context<'_>,
) -> anyhow::Result<Outcome> {
    let mut output = Output::open(target)?;
    let outcome = match &mut output {
        Output::File(file) => builtin.execute(args, file, stderr, ctx)?,
        Output::Inherit => builtin.execute(args, stdout, stderr, ctx)?,
    };
    output.finish()?;
    Ok(outcome)
}

fn report(stderr: &mut dyn Write, message: impl Display) {
    warn!(%message, "command failed");
    let _ = writeln!(stderr, "{message}");
    let _ = stderr.flush();
}

impl Default for Interpreter {
    /// Create an interpreter with the process environment and the standard builtins.
    fn default() -> Self {
        Self::new(Environment::new(), BuiltinRegistry::default())
    }
}
