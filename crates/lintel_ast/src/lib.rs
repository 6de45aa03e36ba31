//! lintel_ast: the arena-allocated expression AST and the visitor protocol
//! the parser drives.

pub mod buffering;
pub mod expression;
pub mod language;
pub mod visitor;

pub use buffering::BufferingVisitor;
pub use expression::{Expression, ExpressionRef, ObjectEntry, VisitsId};
pub use language::{FunctionAttributes, VariableKind};
pub use visitor::ParseVisitor;
