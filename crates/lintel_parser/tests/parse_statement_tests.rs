//! Statement parsing: control flow, classes, functions, recovery.

mod support;

use lintel_ast::VariableKind;
use lintel_core::SourceSpan;
use lintel_diagnostics::Diag;
use support::*;

#[test]
fn if_else_statement() {
    let p = parse_and_visit_statement("if (cond) { body; } else other;");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_variable_use", // cond
            "visit_enter_block_scope",
            "visit_variable_use", // body
            "visit_exit_block_scope",
            "visit_variable_use" // other
        ]
    );
}

#[test]
fn while_statement() {
    let p = parse_and_visit_statement("while (running) step();");
    p.assert_no_diags();
    assert_eq!(p.visitor.variable_uses, strings(&["running", "step"]));
}

#[test]
fn do_while_statement() {
    let p = parse_and_visit_statement("do work(); while (more);");
    p.assert_no_diags();
    assert_eq!(p.visitor.variable_uses, strings(&["work", "more"]));
}

#[test]
fn c_style_for_visits_update_after_body() {
    let p = parse_and_visit_statement("for (i = start; i < max; i++) run();");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_variable_use",        // start
            "visit_variable_assignment", // i
            "visit_variable_use",        // i (condition)
            "visit_variable_use",        // max
            "visit_variable_use",        // run (body)
            "visit_variable_use",        // i (update, after the body)
            "visit_variable_assignment"  // i
        ]
    );
}

#[test]
fn for_in_with_var_has_no_for_scope() {
    let p = parse_and_visit_statement("for (var x in xs) f();");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_variable_use",         // xs
            "visit_variable_declaration", // x
            "visit_variable_use"          // f
        ]
    );
    assert_eq!(
        p.visitor.variable_declarations,
        vec![decl("x", VariableKind::Var)]
    );
}

#[test]
fn for_of_with_let_opens_a_for_scope() {
    let p = parse_and_visit_statement("for (let x of xs) f();");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_enter_for_scope",
            "visit_variable_use",         // xs
            "visit_variable_declaration", // x (buffered)
            "visit_variable_use",         // f
            "visit_exit_for_scope"
        ]
    );
}

#[test]
fn for_of_with_destructuring() {
    let p = parse_and_visit_statement("for (const {a, b} of xs) {}");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_enter_for_scope",
            "visit_variable_use",         // xs
            "visit_variable_declaration", // a
            "visit_variable_declaration", // b
            "visit_enter_block_scope",
            "visit_exit_block_scope",
            "visit_exit_for_scope"
        ]
    );
}

#[test]
fn for_await_of() {
    let p = parse_and_visit_statement("for await (const chunk of stream) use(chunk);");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.variable_declarations,
        vec![decl("chunk", VariableKind::Const)]
    );
    assert_eq!(p.visitor.variable_uses, strings(&["stream", "use", "chunk"]));
}

#[test]
fn parenthesized_async_in_for_of_is_a_normal_assignment() {
    let p = parse_and_visit_statement("for ((async) of xs) g();");
    p.assert_no_diags();
    assert_eq!(p.visitor.variable_assignments, strings(&["async"]));
    assert_eq!(p.visitor.variable_uses, strings(&["xs", "g"]));
}

#[test]
fn switch_statement_has_a_block_scope() {
    let p = parse_and_visit_statement("switch (x) { case a: f(); break; default: g(); }");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_variable_use", // x
            "visit_enter_block_scope",
            "visit_variable_use", // a
            "visit_variable_use", // f
            "visit_variable_use", // g
            "visit_exit_block_scope"
        ]
    );
}

#[test]
fn try_catch_finally() {
    let p = parse_and_visit_statement("try { f(); } catch (e) { g(e); } finally { h(); }");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_enter_block_scope",
            "visit_variable_use", // f
            "visit_exit_block_scope",
            "visit_enter_block_scope",
            "visit_variable_declaration", // e
            "visit_variable_use",         // g
            "visit_variable_use",         // e
            "visit_exit_block_scope",
            "visit_enter_block_scope",
            "visit_variable_use", // h
            "visit_exit_block_scope"
        ]
    );
    assert_eq!(
        p.visitor.variable_declarations,
        vec![decl("e", VariableKind::Catch)]
    );
}

#[test]
fn catch_with_destructuring_binding() {
    let p = parse_and_visit_statement("try {} catch ({code}) {}");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.variable_declarations,
        vec![decl("code", VariableKind::Catch)]
    );
}

#[test]
fn catch_without_binding() {
    let p = parse_and_visit_statement("try { f(); } catch { g(); }");
    p.assert_no_diags();
    assert_eq!(p.visitor.variable_uses, strings(&["f", "g"]));
}

#[test]
fn labeled_statements_produce_no_variable_events() {
    let p = parse_and_visit_statement("outer: while (c) { break outer; }");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_variable_use", // c
            "visit_enter_block_scope",
            "visit_exit_block_scope"
        ]
    );
}

#[test]
fn return_with_asi() {
    let p = parse_and_visit_statement("function f() { return\n  x; }");
    p.assert_no_diags();
    // The newline terminates the return; x is a separate statement.
    assert_eq!(p.visitor.variable_uses, strings(&["x"]));
}

#[test]
fn throw_statement() {
    let p = parse_and_visit_statement("throw new Error(msg);");
    p.assert_no_diags();
    assert_eq!(p.visitor.variable_uses, strings(&["Error", "msg"]));
}

#[test]
fn block_statement_scopes() {
    let p = parse_and_visit_statement("{ let x; }");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_enter_block_scope",
            "visit_variable_declaration",
            "visit_exit_block_scope"
        ]
    );
}

#[test]
fn with_statement_has_no_scope_event() {
    let p = parse_and_visit_statement("with (o) f();");
    p.assert_no_diags();
    assert_eq!(p.visitor.variable_uses, strings(&["o", "f"]));
}

// ----------------------------------------------------------------------
// Classes
// ----------------------------------------------------------------------

#[test]
fn class_declaration_event_order() {
    let p = parse_and_visit_statement("class C { m() {} }");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_enter_class_scope",
            "visit_enter_class_scope_body",
            "visit_property_declaration", // m
            "visit_enter_function_scope",
            "visit_enter_function_scope_body",
            "visit_exit_function_scope",
            "visit_exit_class_scope",
            "visit_variable_declaration" // C
        ]
    );
    assert_eq!(
        p.visitor.property_declarations,
        vec![Some("m".to_string())]
    );
    assert_eq!(
        p.visitor.variable_declarations,
        vec![decl("C", VariableKind::Class)]
    );
}

#[test]
fn class_extends_is_a_use_inside_the_class_scope() {
    let p = parse_and_visit_statement("class C extends Base {}");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_enter_class_scope",
            "visit_variable_use", // Base
            "visit_enter_class_scope_body",
            "visit_exit_class_scope",
            "visit_variable_declaration" // C
        ]
    );
}

#[test]
fn class_expression_declares_its_name_inside_the_scope() {
    let p = parse_and_visit_statement("(class Name {})");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_enter_class_scope",
            "visit_variable_declaration", // Name
            "visit_enter_class_scope_body",
            "visit_exit_class_scope"
        ]
    );
}

#[test]
fn class_members() {
    let p = parse_and_visit_statement(
        "class D { static create() {} get size() { return s; } *items() {} field = init(); }",
    );
    p.assert_no_diags();
    assert_eq!(
        p.visitor.property_declarations,
        vec![
            Some("create".to_string()),
            Some("size".to_string()),
            Some("items".to_string()),
            Some("field".to_string())
        ]
    );
    assert_eq!(p.visitor.variable_uses, strings(&["s", "init"]));
}

#[test]
fn class_computed_member_name() {
    let p = parse_and_visit_statement("class C { [key]() {} }");
    p.assert_no_diags();
    assert_eq!(p.visitor.variable_uses, strings(&["key"]));
    assert_eq!(p.visitor.property_declarations, vec![None]);
}

#[test]
fn class_keyword_member_names() {
    let p = parse_and_visit_statement("class C { if() {} delete() {} static() {} }");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.property_declarations,
        vec![
            Some("if".to_string()),
            Some("delete".to_string()),
            Some("static".to_string())
        ]
    );
}

// ----------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------

#[test]
fn function_declaration_event_order() {
    let p = parse_and_visit_statement("function f(p) { g(p); }");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_variable_declaration", // f
            "visit_enter_function_scope",
            "visit_variable_declaration", // p
            "visit_enter_function_scope_body",
            "visit_variable_use", // g
            "visit_variable_use", // p
            "visit_exit_function_scope"
        ]
    );
}

#[test]
fn generator_function_can_yield() {
    let p = parse_and_visit_statement("function* g() { yield x; }");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.variable_declarations,
        vec![decl("g", VariableKind::Function)]
    );
    assert_eq!(p.visitor.variable_uses, strings(&["x"]));
}

#[test]
fn yield_with_no_operand() {
    let p = parse_and_visit_statement("function* g() { yield; yield * xs; }");
    p.assert_no_diags();
    assert_eq!(p.visitor.variable_uses, strings(&["xs"]));
}

#[test]
fn async_function_can_await() {
    let p = parse_and_visit_statement("async function f() { await promise; }");
    p.assert_no_diags();
    assert_eq!(p.visitor.variable_uses, strings(&["promise"]));
}

#[test]
fn function_parameter_default_event_order() {
    let p = parse_and_visit_statement("function f(a = b) {}");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_variable_declaration", // f
            "visit_enter_function_scope",
            "visit_variable_use",         // b
            "visit_variable_declaration", // a
            "visit_enter_function_scope_body",
            "visit_exit_function_scope"
        ]
    );
}

#[test]
fn rest_and_destructured_parameters() {
    let p = parse_and_visit_statement("function f({a}, [b], ...rest) {}");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.variable_declarations,
        vec![
            decl("f", VariableKind::Function),
            decl("a", VariableKind::Parameter),
            decl("b", VariableKind::Parameter),
            decl("rest", VariableKind::Parameter)
        ]
    );
}

// ----------------------------------------------------------------------
// Recovery
// ----------------------------------------------------------------------

#[test]
fn unexpected_token_at_statement_position_is_skipped() {
    let p = parse_and_visit_module("let x; ) let y;");
    assert_eq!(
        p.visitor.variable_declarations,
        vec![decl("x", VariableKind::Let), decl("y", VariableKind::Let)]
    );
    assert_eq!(
        p.diags,
        vec![Diag::UnexpectedToken {
            token: SourceSpan::new(7, 8)
        }]
    );
}

#[test]
fn unclosed_block_still_balances_scopes() {
    let p = parse_and_visit_module("{ f();");
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_enter_block_scope",
            "visit_variable_use",
            "visit_exit_block_scope",
            "visit_end_of_module"
        ]
    );
    assert_eq!(
        p.diags,
        vec![Diag::UnclosedCodeBlock {
            block_open: SourceSpan::new(0, 1)
        }]
    );
}

#[test]
fn deeply_nested_input_fails_with_a_fatal_diagnostic() {
    let source = "(".repeat(300);
    let p = parse_and_visit_module(&source);
    assert_eq!(p.visitor.visits, vec!["visit_end_of_module"]);
    assert!(
        p.diags
            .iter()
            .any(|diag| matches!(diag, Diag::FatalParserError { .. })),
        "expected a fatal parser error, got: {:?}",
        p.diags
    );
}

#[test]
fn debugger_and_empty_statements() {
    let p = parse_and_visit_module("debugger; ;; f();");
    p.assert_no_diags();
    assert_eq!(p.visitor.variable_uses, strings(&["f"]));
}
