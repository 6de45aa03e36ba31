//! A visitor that records events for later replay.
//!
//! The parser sometimes learns about declarations before it may announce
//! them: in `let {x = f()} = o;` the uses of `o` and `f` must be visited
//! before the declaration of `x`. Binding patterns are therefore parsed into
//! a `BufferingVisitor`, the right-hand side is visited directly, and the
//! buffer is then moved into the real sink. Function and class expression
//! bodies use the same mechanism to defer their events until the expression
//! tree is visited.

use crate::language::VariableKind;
use crate::visitor::ParseVisitor;
use lintel_core::SourceSpan;
use lintel_lexer::Identifier;

/// An identifier captured by value; replay re-borrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OwnedIdentifier {
    span: SourceSpan,
    normalized: String,
    has_escape: bool,
}

impl OwnedIdentifier {
    fn capture(name: &Identifier<'_>) -> Self {
        Self {
            span: name.span,
            normalized: name.normalized.to_string(),
            has_escape: name.has_escape,
        }
    }

    fn borrow(&self) -> Identifier<'_> {
        Identifier {
            span: self.span,
            normalized: &self.normalized,
            has_escape: self.has_escape,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum BufferedEvent {
    VariableDeclaration(OwnedIdentifier, VariableKind),
    VariableUse(OwnedIdentifier),
    VariableAssignment(OwnedIdentifier),
    VariableExportUse(OwnedIdentifier),
    VariableTypeUse(OwnedIdentifier),
    PropertyDeclaration(Option<OwnedIdentifier>),
    EnterBlockScope,
    ExitBlockScope,
    EnterFunctionScope,
    EnterFunctionScopeBody,
    ExitFunctionScope,
    EnterNamedFunctionScope(OwnedIdentifier),
    EnterClassScope,
    EnterClassScopeBody,
    ExitClassScope,
    EnterInterfaceScope,
    ExitInterfaceScope,
    EnterForScope,
    ExitForScope,
    EndOfModule,
}

/// An ordered log of visitor events.
#[derive(Debug, Default)]
pub struct BufferingVisitor {
    events: Vec<BufferedEvent>,
}

impl BufferingVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Replay every recorded event into `target`, in order, leaving this
    /// buffer empty.
    pub fn move_into(&mut self, target: &mut dyn ParseVisitor) {
        for event in self.events.drain(..) {
            match event {
                BufferedEvent::VariableDeclaration(name, kind) => {
                    target.visit_variable_declaration(&name.borrow(), kind);
                }
                BufferedEvent::VariableUse(name) => {
                    target.visit_variable_use(&name.borrow());
                }
                BufferedEvent::VariableAssignment(name) => {
                    target.visit_variable_assignment(&name.borrow());
                }
                BufferedEvent::VariableExportUse(name) => {
                    target.visit_variable_export_use(&name.borrow());
                }
                BufferedEvent::VariableTypeUse(name) => {
                    target.visit_variable_type_use(&name.borrow());
                }
                BufferedEvent::PropertyDeclaration(name) => {
                    target.visit_property_declaration(name.as_ref().map(|n| n.borrow()).as_ref());
                }
                BufferedEvent::EnterBlockScope => target.visit_enter_block_scope(),
                BufferedEvent::ExitBlockScope => target.visit_exit_block_scope(),
                BufferedEvent::EnterFunctionScope => target.visit_enter_function_scope(),
                BufferedEvent::EnterFunctionScopeBody => target.visit_enter_function_scope_body(),
                BufferedEvent::ExitFunctionScope => target.visit_exit_function_scope(),
                BufferedEvent::EnterNamedFunctionScope(name) => {
                    target.visit_enter_named_function_scope(&name.borrow());
                }
                BufferedEvent::EnterClassScope => target.visit_enter_class_scope(),
                BufferedEvent::EnterClassScopeBody => target.visit_enter_class_scope_body(),
                BufferedEvent::ExitClassScope => target.visit_exit_class_scope(),
                BufferedEvent::EnterInterfaceScope => target.visit_enter_interface_scope(),
                BufferedEvent::ExitInterfaceScope => target.visit_exit_interface_scope(),
                BufferedEvent::EnterForScope => target.visit_enter_for_scope(),
                BufferedEvent::ExitForScope => target.visit_exit_for_scope(),
                BufferedEvent::EndOfModule => target.visit_end_of_module(),
            }
        }
    }
}

impl ParseVisitor for BufferingVisitor {
    fn visit_variable_declaration(&mut self, name: &Identifier<'_>, kind: VariableKind) {
        self.events
            .push(BufferedEvent::VariableDeclaration(OwnedIdentifier::capture(name), kind));
    }

    fn visit_variable_use(&mut self, name: &Identifier<'_>) {
        self.events
            .push(BufferedEvent::VariableUse(OwnedIdentifier::capture(name)));
    }

    fn visit_variable_assignment(&mut self, name: &Identifier<'_>) {
        self.events
            .push(BufferedEvent::VariableAssignment(OwnedIdentifier::capture(name)));
    }

    fn visit_variable_export_use(&mut self, name: &Identifier<'_>) {
        self.events
            .push(BufferedEvent::VariableExportUse(OwnedIdentifier::capture(name)));
    }

    fn visit_variable_type_use(&mut self, name: &Identifier<'_>) {
        self.events
            .push(BufferedEvent::VariableTypeUse(OwnedIdentifier::capture(name)));
    }

    fn visit_property_declaration(&mut self, name: Option<&Identifier<'_>>) {
        self.events
            .push(BufferedEvent::PropertyDeclaration(name.map(OwnedIdentifier::capture)));
    }

    fn visit_enter_block_scope(&mut self) {
        self.events.push(BufferedEvent::EnterBlockScope);
    }

    fn visit_exit_block_scope(&mut self) {
        self.events.push(BufferedEvent::ExitBlockScope);
    }

    fn visit_enter_function_scope(&mut self) {
        self.events.push(BufferedEvent::EnterFunctionScope);
    }

    fn visit_enter_function_scope_body(&mut self) {
        self.events.push(BufferedEvent::EnterFunctionScopeBody);
    }

    fn visit_exit_function_scope(&mut self) {
        self.events.push(BufferedEvent::ExitFunctionScope);
    }

    fn visit_enter_named_function_scope(&mut self, name: &Identifier<'_>) {
        self.events
            .push(BufferedEvent::EnterNamedFunctionScope(OwnedIdentifier::capture(name)));
    }

    fn visit_enter_class_scope(&mut self) {
        self.events.push(BufferedEvent::EnterClassScope);
    }

    fn visit_enter_class_scope_body(&mut self) {
        self.events.push(BufferedEvent::EnterClassScopeBody);
    }

    fn visit_exit_class_scope(&mut self) {
        self.events.push(BufferedEvent::ExitClassScope);
    }

    fn visit_enter_interface_scope(&mut self) {
        self.events.push(BufferedEvent::EnterInterfaceScope);
    }

    fn visit_exit_interface_scope(&mut self) {
        self.events.push(BufferedEvent::ExitInterfaceScope);
    }

    fn visit_enter_for_scope(&mut self) {
        self.events.push(BufferedEvent::EnterForScope);
    }

    fn visit_exit_for_scope(&mut self) {
        self.events.push(BufferedEvent::ExitForScope);
    }

    fn visit_end_of_module(&mut self) {
        self.events.push(BufferedEvent::EndOfModule);
    }
}
