//! lintel_parser: the recursive-descent parser at the heart of the front
//! end.
//!
//! The parser pulls tokens from the lexer and pushes semantic observations
//! (declarations, uses, assignments, scope boundaries) into a caller-supplied
//! [`ParseVisitor`](lintel_ast::ParseVisitor) while reporting structured
//! diagnostics. It never executes the program and never stops at the first
//! error.

mod parser;
pub mod precedence;

pub use parser::{FatalParseError, FunctionGuard, Parser, ParserOptions};
pub use precedence::Precedence;
