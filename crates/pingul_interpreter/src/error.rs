use std::rc::Rc;

use thiserror::Error;

use crate::object::Object;
use pingul_parser::ast::{InfixOperator, PrefixOperator};

/// Why an evaluation degraded to `nil`.
///
/// Programs never observe these. The evaluator records them so embedders
/// (and the `--diagnostics` flag of the CLI) can see what went wrong.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// When attempting a prefix operation on an invalid type (e.g. `-true`)
    #[error("unsupported operand type for {operator} operator: `{}` ({})", .right.kind(), .right)]
    InvalidPrefixOperandType {
        operator: PrefixOperator,
        right: Rc<Object>,
    },
    /// When an operator has no meaning for its operands (e.g. `true + 1`)
    #[error(
        "unsupported operand type(s) for {operator} operator: `{}` ({}) and `{}` ({})",
        .left.kind(), .left, .right.kind(), .right
    )]
    InvalidInfixOperandType {
        operator: InfixOperator,
        left: Rc<Object>,
        right: Rc<Object>,
    },
    #[error("division by zero: {left} {operator} 0")]
    DivisionByZero { operator: InfixOperator, left: i64 },
    /// When reading a name that was never bound
    #[error("identifier '{0}' not found")]
    IdentifierNotFound(String),
    /// When an object that is not a function is used with function call syntax
    #[error("{0} is not a function")]
    NotAFunction(Rc<Object>),
    /// When a call's argument length does not match the expected function parameter length
    #[error("expected {expected} argument(s) but got {got}")]
    BadArity { expected: usize, got: usize },
    /// When a call to builtin function passes an argument of an invalid/unsupported type
    #[error("unsupported argument type for {builtin} function: `{}` ({})", .arg.kind(), .arg)]
    InvalidArgumentType {
        builtin: &'static str,
        arg: Rc<Object>,
    },
    #[error("{0} called on an empty list")]
    EmptyList(&'static str),
    /// When attempting to index an object that does not support it (e.g. `1[0]`)
    #[error("index operator not supported for `{}` ({})", .0.kind(), .0)]
    IndexNotSupported(Rc<Object>),
    /// When attempting to index a list with a non-integer (e.g. `[1, 2][true]`)
    #[error("unsupported index operand type: `{}` ({})", .0.kind(), .0)]
    InvalidIndexOperandType(Rc<Object>),
    #[error("index {index} out of bounds for list {list}")]
    IndexOutOfBounds { list: Rc<Object>, index: i64 },
    /// Writing to the output sink failed
    #[error("could not write output: {0}")]
    Output(String),
}
