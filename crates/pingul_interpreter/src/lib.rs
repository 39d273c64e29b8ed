//! Tree-walking evaluator for pingul programs.
//!
//! ```rust
//! use pingul_interpreter::{Builtins, Evaluator, Scope};
//!
//! let (program, errors) = pingul_parser::parse("var double = func(x) { x * 2 }; double(21)");
//! assert!(errors.is_empty());
//!
//! let builtins = Builtins::standard();
//! let env = Scope::new_global();
//! let result = Evaluator::new(&builtins).eval(&program, &env);
//! assert_eq!(result.to_string(), "42");
//! ```
mod builtin;
mod error;
mod evaluator;
pub mod object;
mod options;
mod scope;

pub use builtin::{Builtin, BuiltinFn, Builtins};
pub use error::RuntimeError;
pub use evaluator::{check_arity, Evaluator};
pub use options::{Arity, Options, UnsetVariables};
pub use scope::Scope;
