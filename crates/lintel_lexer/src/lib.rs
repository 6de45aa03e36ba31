//! lintel_lexer: the streaming ECMAScript/TypeScript lexer.
//!
//! Converts a padded source buffer into a one-token-lookahead stream for the
//! parser. The lexer never fails: malformed input produces a diagnostic and
//! a best-effort token.

pub mod char_codes;
pub mod keywords;
mod lexer;
pub mod token;

pub use lexer::{Lexer, LexerState};
pub use token::{Identifier, Token, TokenFlags, TokenKind};
