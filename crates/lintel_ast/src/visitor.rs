//! The visitor protocol.
//!
//! The parser reports what it sees through this trait: declarations, uses,
//! assignments, and scope boundaries. Downstream analyzers (the
//! name-resolution pass, the tests' spy) implement it. The event alphabet is
//! fixed; scope enter/exit events are always properly nested, and
//! `visit_end_of_module` fires exactly once per module parse.
//!
//! Sinks are called synchronously on the parser's thread and must not
//! re-enter the parser. Identifier arguments borrow from the parse and are
//! valid for the duration of the call.

use crate::language::VariableKind;
use lintel_lexer::Identifier;

pub trait ParseVisitor {
    fn visit_variable_declaration(&mut self, name: &Identifier<'_>, kind: VariableKind);
    fn visit_variable_use(&mut self, name: &Identifier<'_>);
    fn visit_variable_assignment(&mut self, name: &Identifier<'_>);
    /// A name referenced by an `export {name}` list.
    fn visit_variable_export_use(&mut self, name: &Identifier<'_>);
    /// A name referenced from a TypeScript type position.
    fn visit_variable_type_use(&mut self, name: &Identifier<'_>);
    /// A class or interface member. `None` for computed or non-identifier
    /// names.
    fn visit_property_declaration(&mut self, name: Option<&Identifier<'_>>);

    fn visit_enter_block_scope(&mut self);
    fn visit_exit_block_scope(&mut self);
    fn visit_enter_function_scope(&mut self);
    /// The boundary between a function's parameter list and its body.
    fn visit_enter_function_scope_body(&mut self);
    fn visit_exit_function_scope(&mut self);
    /// A named function expression opens a scope containing its own name.
    fn visit_enter_named_function_scope(&mut self, name: &Identifier<'_>);
    fn visit_enter_class_scope(&mut self);
    fn visit_enter_class_scope_body(&mut self);
    fn visit_exit_class_scope(&mut self);
    fn visit_enter_interface_scope(&mut self);
    fn visit_exit_interface_scope(&mut self);
    fn visit_enter_for_scope(&mut self);
    fn visit_exit_for_scope(&mut self);

    fn visit_end_of_module(&mut self);
}
