//! lintel_core: Core utilities for the lintel front end.
//!
//! Provides source spans, the padded source buffer, offset-to-line/column
//! translation, and the bump arena used by the parser.

pub mod arena;
pub mod locator;
pub mod padded;
pub mod text;

// Re-export commonly used types
pub use arena::ParseArena;
pub use locator::{ColumnKind, Locator, SourcePosition};
pub use padded::PaddedString;
pub use text::{SourceSpan, TextPos};
