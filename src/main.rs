use argh::FromArgs;
use myshell::input::{EditorInput, LineSource, PlainInput};
use myshell::{ExitCode, Interpreter};
use std::io::{self, IsTerminal, Write};
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// A minimal interactive shell with builtins, quoting and output redirection.
struct Args {
    #[argh(option, short = 'c')]
    /// run a single command line and exit with its status.
    command: Option<String>,

    #[argh(switch, short = 'v')]
    /// log debug diagnostics to standard error.
    verbose: bool,

    #[argh(switch)]
    /// do not keep a history of interactive lines.
    no_history: bool,
}

fn main() {
    let args: Args = argh::from_env();
    init_tracing(args.verbose);

    let code = match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("myshell: {e:#}");
            1
        }
    };
    let _ = io::stdout().flush();
    std::process::exit(code);
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    let mut sh = Interpreter::default();

    if let Some(line) = &args.command {
        return Ok(sh.execute_line(line).code());
    }

    let mut input: Box<dyn LineSource> = if io::stdin().is_terminal() {
        Box::new(EditorInput::new(!args.no_history)?)
    } else {
        Box::new(PlainInput::new(io::stdin().lock(), io::stdout()))
    };
    sh.repl(input.as_mut())
}

// Logs go to stderr, and only when asked for, so the shell's own output is untouched.
fn init_tracing(verbose: bool) {
    let from_env = std::env::var("RUST_LOG").is_ok();
    if !verbose && !from_env {
        return;
    }
    let filter = if from_env {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new("debug")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}
