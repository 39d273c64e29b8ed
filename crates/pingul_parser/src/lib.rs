pub mod ast;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

use ast::Program;
use lexer::Lexer;
use parser::{ParseError, Parser};

/// Lex and parse `input` in one go.
///
/// The program always comes back; it only holds the statements that parsed,
/// so check the errors before evaluating it.
pub fn parse(input: &str) -> (Program, Vec<ParseError>) {
    let mut parser = Parser::new(Lexer::new(input));
    let program = parser.parse_program();

    (program, parser.into_errors())
}
