use crate::command::{ExitCode, Outcome};
use crate::env::Environment;
use crate::io_adapters::describe_io_error;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::env;
use std::io::Write;

/// What a builtin can see besides its arguments and output streams.
pub struct Context<'a> {
    pub env: &'a Environment,
    pub builtins: &'a BuiltinRegistry,
}

/// Built-in commands known to the shell at compile time.
///
/// Builtins run in-process. Diagnostics go to `stderr`; regular output goes to
/// `stdout`, which is either the shell's standard output or a redirect file.
pub trait BuiltinCommand {
    /// Canonical name of the command, e.g. "echo" or "cd".
    fn name(&self) -> &'static str;

    /// Executes the command.
    ///
    /// An `Err` is reported by the caller as `<message>` on standard error and
    /// treated as exit status 1; it never stops the shell.
    fn execute(
        &self,
        args: &[String],
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        ctx: &Context<'_>,
    ) -> Result<Outcome>;
}

/// Name-to-handler table, built once at startup and read-only afterwards.
pub struct BuiltinRegistry {
    commands: HashMap<&'static str, Box<dyn BuiltinCommand>>,
}

impl BuiltinRegistry {
    /// A registry with no commands.
    pub fn empty() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Add a command, replacing any previous one with the same name.
    pub fn register(&mut self, command: Box<dyn BuiltinCommand>) {
        self.commands.insert(command.name(), command);
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&dyn BuiltinCommand> {
        self.commands.get(name).map(|c| &**c)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }
}

impl Default for BuiltinRegistry {
    /// The standard set: `cd`, `echo`, `exit`, `pwd`, `type`.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(Exit));
        registry.register(Box::new(Cd));
        registry.register(Box::new(Echo));
        registry.register(Box::new(Pwd));
        registry.register(Box::new(Type));
        registry
    }
}

/// Exit the shell: `exit [code]`.
pub struct Exit;

impl BuiltinCommand for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn execute(
        &self,
        args: &[String],
        _stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        _ctx: &Context<'_>,
    ) -> Result<Outcome> {
        let code: ExitCode = match args.first() {
            None => 0,
            Some(arg) => arg.parse().unwrap_or_else(|_| {
                // Still exits, with the fallback status.
                let _ = writeln!(stderr, "exit: {arg}: numeric argument required");
                1
            }),
        };
        Ok(Outcome::Terminate(code))
    }
}

/// Change the current working directory: `cd <dir>`.
///
/// A leading `~` or `~/` is expanded to the home directory.
pub struct Cd;

impl BuiltinCommand for Cd {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn execute(
        &self,
        args: &[String],
        _stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        ctx: &Context<'_>,
    ) -> Result<Outcome> {
        let target = args.first().ok_or_else(|| anyhow!("cd: missing argument"))?;
        let dir = ctx.env.expand_tilde(target);
        env::set_current_dir(&dir)
            .map_err(|e| anyhow!("cd: {}: {}", dir, describe_io_error(&e)))?;
        Ok(Outcome::Continue(0))
    }
}

/// Write the arguments separated by single spaces, plus a newline.
pub struct Echo;

impl BuiltinCommand for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn execute(
        &self,
        args: &[String],
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        _ctx: &Context<'_>,
    ) -> Result<Outcome> {
        writeln!(stdout, "{}", args.join(" "))?;
        Ok(Outcome::Continue(0))
    }
}

/// Print the current working directory.
pub struct Pwd;

impl BuiltinCommand for Pwd {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn execute(
        &self,
        _args: &[String],
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        _ctx: &Context<'_>,
    ) -> Result<Outcome> {
        let cwd = env::current_dir().map_err(|e| anyhow!("pwd: {}", describe_io_error(&e)))?;
        writeln!(stdout, "{}", cwd.display())?;
        Ok(Outcome::Continue(0))
    }
}

/// Describe how each name would be interpreted: `type <name>...`.
pub struct Type;

impl BuiltinCommand for Type {
    fn name(&self) -> &'static str {
        "type"
    }

    fn execute(
        &self,
        args: &[String],
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        ctx: &Context<'_>,
    ) -> Result<Outcome> {
        if args.is_empty() {
            return Err(anyhow!("type: missing argument"));
        }
        let mut code = 0;
        for name in args {
            if ctx.builtins.contains(name) {
                writeln!(stdout, "{name} is a shell builtin")?;
            } else if let Some(path) = ctx.env.resolve_executable(name) {
                writeln!(stdout, "{name} is {}", path.display())?;
            } else {
                writeln!(stdout, "{name} not found")?;
                code = 1;
            }
        }
        Ok(Outcome::Continue(code))
    }
}
