use rustyline::error::ReadlineError;
use rustyline::Editor;
use tracing::debug;

use pingul_interpreter::{Builtins, Evaluator, Options, Scope};

use crate::{error::CliError, print_diagnostics, print_parse_errors, run_source};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Read lines until `exit`, `quit`, Ctrl-C or Ctrl-D, evaluating each one in
/// the same global scope.
pub fn repl(options: Options, show_diagnostics: bool) -> Result<(), CliError> {
    println!("pingul v{}", VERSION);

    let builtins = Builtins::standard();
    let env = Scope::new_global();
    let mut evaluator = Evaluator::new(&builtins).with_options(options);

    // `()` can be used when no completer is required
    let mut rl = Editor::<()>::new();
    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };

        let input = line.trim();
        if input == "exit" || input == "quit" {
            break;
        }
        // Skip empty lines
        if input.is_empty() {
            continue;
        }

        rl.add_history_entry(line.as_str());

        match run_source(&line, &mut evaluator, &env) {
            Ok(result) => println!("{}", result.to_code_string()),
            Err(errors) => {
                debug!(count = errors.len(), "line rejected by the parser");
                print_parse_errors(&errors);
            }
        }

        if show_diagnostics {
            print_diagnostics(&mut evaluator);
        } else {
            evaluator.take_diagnostics();
        }
    }

    Ok(())
}
