mod error;
mod repl;

use std::{cell::RefCell, fs, path::PathBuf, process, rc::Rc};

use clap::Parser;

use pingul_interpreter::{
    object::Object, Arity, Builtins, Evaluator, Options, Scope, UnsetVariables,
};
use pingul_parser::parser::ParseError;

use crate::error::CliError;

/// pingul is a small dynamically typed scripting language.
/// Without a FILE it starts an interactive session.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script to run instead of starting the REPL
    file: Option<PathBuf>,

    /// Calls with the wrong number of arguments evaluate to nil
    #[arg(long)]
    strict_arity: bool,

    /// Reading an unset name does not bind it
    #[arg(long)]
    no_vivify: bool,

    /// Print why values degraded to nil after each result
    #[arg(long)]
    diagnostics: bool,

    /// Log evaluator events at debug level (otherwise RUST_LOG decides)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn options(&self) -> Options {
        Options {
            unset_variables: if self.no_vivify {
                UnsetVariables::Nil
            } else {
                UnsetVariables::Vivify
            },
            arity: if self.strict_arity {
                Arity::Strict
            } else {
                Arity::Lenient
            },
        }
    }
}

/// Install a stderr subscriber, but only when someone asked for logs.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        return;
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

/// Parse and evaluate `source` in `env`, or hand back every parse error.
pub(crate) fn run_source(
    source: &str,
    evaluator: &mut Evaluator<'_>,
    env: &Rc<RefCell<Scope>>,
) -> Result<Rc<Object>, Vec<ParseError>> {
    let (program, errors) = pingul_parser::parse(source);
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(evaluator.eval(&program, env))
}

pub(crate) fn print_parse_errors(errors: &[ParseError]) {
    println!("Parser errors:");
    for error in errors {
        println!("\t{}", error);
    }
}

pub(crate) fn print_diagnostics(evaluator: &mut Evaluator<'_>) {
    for diagnostic in evaluator.take_diagnostics() {
        eprintln!("note: {}", diagnostic);
    }
}

fn run_file(path: PathBuf, args: &Args) -> Result<(), CliError> {
    let source = fs::read_to_string(&path).map_err(|source| CliError::ReadFile {
        path: path.clone(),
        source,
    })?;

    let builtins = Builtins::standard();
    let env = Scope::new_global();
    let mut evaluator = Evaluator::new(&builtins).with_options(args.options());

    match run_source(&source, &mut evaluator, &env) {
        Ok(result) => {
            println!("{}", result);
            if args.diagnostics {
                print_diagnostics(&mut evaluator);
            }
            Ok(())
        }
        Err(errors) => {
            print_parse_errors(&errors);
            Err(CliError::Parse(errors.len()))
        }
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.file.clone() {
        Some(path) => run_file(path, &args),
        None => repl::repl(args.options(), args.diagnostics),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
