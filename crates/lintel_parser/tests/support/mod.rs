//! Shared test support: a spy visitor that records every event, and
//! helpers that run the parser over a source string.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use lintel_ast::{ParseVisitor, VariableKind};
use lintel_core::{PaddedString, ParseArena};
use lintel_diagnostics::{CollectingReporter, Diag};
use lintel_lexer::Identifier;
use lintel_parser::{Parser, ParserOptions};

/// Records the visitor event stream for assertions.
#[derive(Debug, Default)]
pub struct SpyVisitor {
    /// Event names in emission order.
    pub visits: Vec<&'static str>,
    pub variable_declarations: Vec<(String, VariableKind)>,
    /// Uses of all flavors (plain, export, type), in order.
    pub variable_uses: Vec<String>,
    pub variable_assignments: Vec<String>,
    pub property_declarations: Vec<Option<String>>,
    pub enter_named_function_scopes: Vec<String>,
}

impl ParseVisitor for SpyVisitor {
    fn visit_variable_declaration(&mut self, name: &Identifier<'_>, kind: VariableKind) {
        self.visits.push("visit_variable_declaration");
        self.variable_declarations
            .push((name.normalized.to_string(), kind));
    }

    fn visit_variable_use(&mut self, name: &Identifier<'_>) {
        self.visits.push("visit_variable_use");
        self.variable_uses.push(name.normalized.to_string());
    }

    fn visit_variable_assignment(&mut self, name: &Identifier<'_>) {
        self.visits.push("visit_variable_assignment");
        self.variable_assignments.push(name.normalized.to_string());
    }

    fn visit_variable_export_use(&mut self, name: &Identifier<'_>) {
        self.visits.push("visit_variable_export_use");
        self.variable_uses.push(name.normalized.to_string());
    }

    fn visit_variable_type_use(&mut self, name: &Identifier<'_>) {
        self.visits.push("visit_variable_type_use");
        self.variable_uses.push(name.normalized.to_string());
    }

    fn visit_property_declaration(&mut self, name: Option<&Identifier<'_>>) {
        self.visits.push("visit_property_declaration");
        self.property_declarations
            .push(name.map(|n| n.normalized.to_string()));
    }

    fn visit_enter_block_scope(&mut self) {
        self.visits.push("visit_enter_block_scope");
    }

    fn visit_exit_block_scope(&mut self) {
        self.visits.push("visit_exit_block_scope");
    }

    fn visit_enter_function_scope(&mut self) {
        self.visits.push("visit_enter_function_scope");
    }

    fn visit_enter_function_scope_body(&mut self) {
        self.visits.push("visit_enter_function_scope_body");
    }

    fn visit_exit_function_scope(&mut self) {
        self.visits.push("visit_exit_function_scope");
    }

    fn visit_enter_named_function_scope(&mut self, name: &Identifier<'_>) {
        self.visits.push("visit_enter_named_function_scope");
        self.enter_named_function_scopes
            .push(name.normalized.to_string());
    }

    fn visit_enter_class_scope(&mut self) {
        self.visits.push("visit_enter_class_scope");
    }

    fn visit_enter_class_scope_body(&mut self) {
        self.visits.push("visit_enter_class_scope_body");
    }

    fn visit_exit_class_scope(&mut self) {
        self.visits.push("visit_exit_class_scope");
    }

    fn visit_enter_interface_scope(&mut self) {
        self.visits.push("visit_enter_interface_scope");
    }

    fn visit_exit_interface_scope(&mut self) {
        self.visits.push("visit_exit_interface_scope");
    }

    fn visit_enter_for_scope(&mut self) {
        self.visits.push("visit_enter_for_scope");
    }

    fn visit_exit_for_scope(&mut self) {
        self.visits.push("visit_exit_for_scope");
    }

    fn visit_end_of_module(&mut self) {
        self.visits.push("visit_end_of_module");
    }
}

/// The outcome of running the parser over one source string.
pub struct ParseOutcome {
    pub visitor: SpyVisitor,
    pub diags: Vec<Diag>,
}

impl ParseOutcome {
    #[track_caller]
    pub fn assert_no_diags(&self) -> &Self {
        assert!(self.diags.is_empty(), "unexpected diagnostics: {:?}", self.diags);
        self
    }
}

pub fn typescript_options() -> ParserOptions {
    ParserOptions {
        typescript: true,
        ..ParserOptions::default()
    }
}

pub fn jsx_options() -> ParserOptions {
    ParserOptions {
        jsx: true,
        ..ParserOptions::default()
    }
}

pub fn parse_and_visit_module_with(source: &str, options: ParserOptions) -> ParseOutcome {
    let code = PaddedString::new(source);
    let arena = ParseArena::new();
    let reporter = CollectingReporter::new();
    let mut parser = Parser::new(&arena, &code, &reporter, options);
    let mut visitor = SpyVisitor::default();
    parser.parse_and_visit_module(&mut visitor);
    ParseOutcome {
        visitor,
        diags: reporter.take_diags(),
    }
}

pub fn parse_and_visit_module(source: &str) -> ParseOutcome {
    parse_and_visit_module_with(source, ParserOptions::default())
}

/// Parse exactly one statement.
pub fn parse_and_visit_statement_with(source: &str, options: ParserOptions) -> ParseOutcome {
    let code = PaddedString::new(source);
    let arena = ParseArena::new();
    let reporter = CollectingReporter::new();
    let mut parser = Parser::new(&arena, &code, &reporter, options);
    let mut visitor = SpyVisitor::default();
    parser
        .parse_and_visit_statement(&mut visitor)
        .expect("statement parse should not be fatal");
    ParseOutcome {
        visitor,
        diags: reporter.take_diags(),
    }
}

pub fn parse_and_visit_statement(source: &str) -> ParseOutcome {
    parse_and_visit_statement_with(source, ParserOptions::default())
}

/// Shorthand for building expected declaration entries.
pub fn decl(name: &str, kind: VariableKind) -> (String, VariableKind) {
    (name.to_string(), kind)
}

pub fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
