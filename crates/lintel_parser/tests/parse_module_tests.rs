//! Module parsing: `import` and `export` in all their shapes, with the
//! diagnostics each malformed form produces.

mod support;

use lintel_ast::VariableKind;
use lintel_core::SourceSpan;
use lintel_diagnostics::Diag;
use support::*;

#[test]
fn export_variable() {
    for source in [
        "export let x;",
        "export let x = 42;",
        "export var x;",
        "export var x = 42;",
        "export const x = null;",
    ] {
        let p = parse_and_visit_statement(source);
        p.assert_no_diags();
        assert_eq!(
            p.visitor.visits,
            vec!["visit_variable_declaration"],
            "source: {}",
            source
        );
        assert_eq!(p.visitor.variable_declarations[0].0, "x");
    }
}

#[test]
fn export_default() {
    let p = parse_and_visit_statement("export default x;");
    p.assert_no_diags();
    assert_eq!(p.visitor.visits, vec!["visit_variable_use"]);

    let p = parse_and_visit_statement("export default function f() {}");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_variable_declaration", // f
            "visit_enter_function_scope",
            "visit_enter_function_scope_body",
            "visit_exit_function_scope"
        ]
    );

    let p = parse_and_visit_statement("export default function() {}");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_enter_function_scope",
            "visit_enter_function_scope_body",
            "visit_exit_function_scope"
        ]
    );

    let p = parse_and_visit_statement("export default async function f() {}");
    p.assert_no_diags();
    assert_eq!(p.visitor.visits[0], "visit_variable_declaration");

    let p = parse_and_visit_statement("export default (function f() {})");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_enter_named_function_scope",
            "visit_enter_function_scope_body",
            "visit_exit_function_scope"
        ]
    );

    let p = parse_and_visit_statement("export default class C {}");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_enter_class_scope",
            "visit_enter_class_scope_body",
            "visit_exit_class_scope",
            "visit_variable_declaration" // C
        ]
    );

    let p = parse_and_visit_statement("export default class {}");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_enter_class_scope",
            "visit_enter_class_scope_body",
            "visit_exit_class_scope"
        ]
    );

    let p = parse_and_visit_statement("export default async (a) => b;");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_enter_function_scope",
            "visit_variable_declaration", // a
            "visit_enter_function_scope_body",
            "visit_variable_use", // b
            "visit_exit_function_scope"
        ]
    );
}

#[test]
fn export_default_of_variable_is_illegal() {
    for kind in ["const", "let", "var"] {
        let source = format!("export default {} x = y;", kind);
        let p = parse_and_visit_statement(&source);
        assert_eq!(
            p.visitor.visits,
            vec!["visit_variable_use", "visit_variable_declaration"],
            "source: {}",
            source
        );
        assert_eq!(
            p.diags,
            vec![Diag::CannotExportDefaultVariable {
                declaring_token: SourceSpan::new(15, 15 + kind.len() as u32)
            }],
            "source: {}",
            source
        );
    }
}

#[test]
fn export_sometimes_requires_semicolon() {
    let p = parse_and_visit_module("export {x} console.log();");
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_variable_export_use", // x
            "visit_variable_use",        // console
            "visit_end_of_module"
        ]
    );
    assert_eq!(
        p.diags,
        vec![Diag::MissingSemicolonAfterStatement {
            insertion_point: SourceSpan::empty(10)
        }]
    );

    let p = parse_and_visit_module("export * from 'other' console.log();");
    assert_eq!(
        p.visitor.visits,
        vec!["visit_variable_use", "visit_end_of_module"]
    );
    assert_eq!(
        p.diags,
        vec![Diag::MissingSemicolonAfterStatement {
            insertion_point: SourceSpan::empty(21)
        }]
    );

    let p = parse_and_visit_module("export default x+y console.log();");
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_variable_use", // x
            "visit_variable_use", // y
            "visit_variable_use", // console
            "visit_end_of_module"
        ]
    );
    assert_eq!(
        p.diags,
        vec![Diag::MissingSemicolonAfterStatement {
            insertion_point: SourceSpan::empty(18)
        }]
    );

    let p = parse_and_visit_module("export default async () => {} console.log();");
    assert_eq!(
        p.diags,
        vec![Diag::MissingSemicolonAfterStatement {
            insertion_point: SourceSpan::empty(29)
        }]
    );
}

#[test]
fn export_sometimes_does_not_require_semicolon() {
    let p = parse_and_visit_module("export default async function f() {} console.log();");
    p.assert_no_diags();

    let p = parse_and_visit_module("export default function() {} console.log();");
    p.assert_no_diags();
}

#[test]
fn export_list() {
    let p = parse_and_visit_statement("export {one, two};");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.visits,
        vec!["visit_variable_export_use", "visit_variable_export_use"]
    );

    let p = parse_and_visit_statement("export {one as two, three as four};");
    p.assert_no_diags();
    assert_eq!(p.visitor.variable_uses, strings(&["one", "three"]));

    let p = parse_and_visit_statement("export {myVar as 'name'};");
    p.assert_no_diags();
    assert_eq!(p.visitor.variable_uses, strings(&["myVar"]));
}

#[test]
fn exporting_by_string_name_requires_export_from() {
    let p = parse_and_visit_statement("export {'name'};");
    assert!(p.visitor.visits.is_empty());
    assert_eq!(
        p.diags,
        vec![Diag::ExportingStringNameOnlyAllowedForExportFrom {
            export_name: SourceSpan::new(8, 14)
        }]
    );
}

#[test]
fn exported_variables_cannot_be_named_reserved_keywords() {
    for keyword in ["implements", "interface", "package", "private", "protected", "public"] {
        let source = format!("export {{{}}};", keyword);
        let p = parse_and_visit_statement(&source);
        assert!(p.visitor.visits.is_empty(), "source: {}", source);
        assert_eq!(
            p.diags,
            vec![Diag::CannotExportVariableNamedKeyword {
                export_name: SourceSpan::new(8, 8 + keyword.len() as u32),
                name: keyword.to_string(),
            }],
            "source: {}",
            source
        );

        let source = format!("export {{{} as thing}};", keyword);
        let p = parse_and_visit_statement(&source);
        assert!(p.visitor.visits.is_empty());
        assert_eq!(p.diags.len(), 1, "source: {}", source);
    }
}

#[test]
fn exported_escaped_keyword_reports_escape_only() {
    let p = parse_and_visit_statement(r#"export {\u{76}ar};"#);
    assert!(p.visitor.visits.is_empty());
    assert_eq!(
        p.diags,
        vec![Diag::KeywordsCannotContainEscapeSequences {
            escape_sequence: SourceSpan::new(8, 14)
        }]
    );
}

#[test]
fn export_from() {
    for source in [
        "export * from 'other';",
        "export * as mother from 'other';",
        "export * as 'mother' from 'other';",
        "export {} from 'other';",
        "export {util1, util2, util3} from 'other';",
        "export {readFileSync as readFile} from 'fs';",
        "export {promises as default} from 'fs';",
        "export {if} from 'other';",
        "export {'name'} from 'other';",
        "export {'name' as 'othername'} from 'other';",
    ] {
        let p = parse_and_visit_statement(source);
        p.assert_no_diags();
        assert!(p.visitor.visits.is_empty(), "source: {}", source);
    }
}

#[test]
fn invalid_export_expression() {
    let p = parse_and_visit_statement("export stuff;");
    assert_eq!(
        p.diags,
        vec![Diag::ExportingRequiresCurlies {
            names: SourceSpan::new(7, 12)
        }]
    );
    assert_eq!(p.visitor.visits, vec!["visit_variable_use"]);

    let p = parse_and_visit_statement("export a, b, c;");
    assert_eq!(
        p.diags,
        vec![Diag::ExportingRequiresDefault {
            expression: SourceSpan::new(7, 14)
        }]
    );
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_variable_use",
            "visit_variable_use",
            "visit_variable_use"
        ]
    );

    let p = parse_and_visit_statement("export 2 + x;");
    assert_eq!(
        p.diags,
        vec![Diag::ExportingRequiresDefault {
            expression: SourceSpan::new(7, 12)
        }]
    );
    assert_eq!(p.visitor.visits, vec!["visit_variable_use"]);
}

#[test]
fn invalid_export() {
    let p = parse_and_visit_statement("export ;");
    assert_eq!(
        p.diags,
        vec![Diag::MissingTokenAfterExport {
            export_token: SourceSpan::new(0, 6)
        }]
    );
    assert!(p.visitor.visits.is_empty());

    let p = parse_and_visit_statement("export ");
    assert_eq!(
        p.diags,
        vec![Diag::MissingTokenAfterExport {
            export_token: SourceSpan::new(0, 6)
        }]
    );

    let p = parse_and_visit_module("export = x");
    assert_eq!(p.diags[0], Diag::UnexpectedTokenAfterExport {
        unexpected_token: SourceSpan::new(7, 8)
    });
    // The `= x` is then parsed as a (broken) expression statement; the use
    // of x is still observed.
    assert!(p.visitor.variable_uses.contains(&"x".to_string()));
}

#[test]
fn parse_imports() {
    let p = parse_and_visit_statement("import 'foo';");
    p.assert_no_diags();
    assert!(p.visitor.visits.is_empty());

    let p = parse_and_visit_statement("import fs from 'fs'");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.variable_declarations,
        vec![decl("fs", VariableKind::Import)]
    );

    let p = parse_and_visit_statement("import * as fs from 'fs'");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.variable_declarations,
        vec![decl("fs", VariableKind::Import)]
    );

    let p = parse_and_visit_module("import fs from 'fs'; import net from 'net';");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.variable_declarations,
        vec![
            decl("fs", VariableKind::Import),
            decl("net", VariableKind::Import)
        ]
    );

    let p = parse_and_visit_statement("import { readFile, writeFile } from 'fs';");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.variable_declarations,
        vec![
            decl("readFile", VariableKind::Import),
            decl("writeFile", VariableKind::Import)
        ]
    );

    let p = parse_and_visit_statement("import {readFileSync as rf} from 'fs';");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.variable_declarations,
        vec![decl("rf", VariableKind::Import)]
    );

    let p = parse_and_visit_statement("import {'read file sync' as readFileSync} from 'fs';");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.variable_declarations,
        vec![decl("readFileSync", VariableKind::Import)]
    );

    let p = parse_and_visit_statement("import fs, {readFileSync} from 'fs';");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.variable_declarations,
        vec![
            decl("fs", VariableKind::Import),
            decl("readFileSync", VariableKind::Import)
        ]
    );

    let p = parse_and_visit_statement("import fsDefault, * as fsExports from 'fs';");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.variable_declarations,
        vec![
            decl("fsDefault", VariableKind::Import),
            decl("fsExports", VariableKind::Import)
        ]
    );
}

#[test]
fn import_star_without_as_keyword() {
    let p = parse_and_visit_statement("import * myExport from 'other';");
    assert_eq!(
        p.diags,
        vec![Diag::ExpectedAsBeforeImportedNamespaceAlias {
            star_through_alias: SourceSpan::new(7, 17),
            star_token: SourceSpan::new(7, 8),
            alias: SourceSpan::new(9, 17),
        }]
    );
    assert_eq!(p.visitor.visits, vec!["visit_variable_declaration"]);
}

#[test]
fn import_without_from_keyword() {
    let p = parse_and_visit_statement("import { x } 'other';");
    assert_eq!(
        p.diags,
        vec![Diag::ExpectedFromBeforeModuleSpecifier {
            module_specifier: SourceSpan::new(13, 20)
        }]
    );
    assert_eq!(p.visitor.visits, vec!["visit_variable_declaration"]);

    let p = parse_and_visit_statement("import { x } ;");
    assert_eq!(
        p.diags,
        vec![Diag::ExpectedFromAndModuleSpecifier {
            insertion_point: SourceSpan::empty(12)
        }]
    );
    assert_eq!(p.visitor.visits, vec!["visit_variable_declaration"]);
}

#[test]
fn import_as_invalid_token() {
    let p = parse_and_visit_statement("import {myExport as 'string'} from 'module';");
    assert_eq!(
        p.diags,
        vec![Diag::ExpectedVariableNameForImportAs {
            unexpected_token: SourceSpan::new(20, 28)
        }]
    );

    let p = parse_and_visit_statement("import {'myExport' as 'string'} from 'module';");
    assert_eq!(
        p.diags,
        vec![Diag::ExpectedVariableNameForImportAs {
            unexpected_token: SourceSpan::new(23, 31)
        }]
    );
}

#[test]
fn export_function() {
    let p = parse_and_visit_statement("export function foo() {}");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.variable_declarations,
        vec![decl("foo", VariableKind::Function)]
    );

    let p = parse_and_visit_statement("export async function foo() {}");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.variable_declarations,
        vec![decl("foo", VariableKind::Function)]
    );
}

#[test]
fn export_function_requires_a_name() {
    let p = parse_and_visit_statement("export function() {}");
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_enter_function_scope",
            "visit_enter_function_scope_body",
            "visit_exit_function_scope"
        ]
    );
    assert_eq!(
        p.diags,
        vec![Diag::MissingNameOfExportedFunction {
            function_keyword: SourceSpan::new(7, 15)
        }]
    );

    let p = parse_and_visit_statement("export async function() {}");
    assert_eq!(
        p.diags,
        vec![Diag::MissingNameOfExportedFunction {
            function_keyword: SourceSpan::new(13, 21)
        }]
    );
}

#[test]
fn export_class() {
    let p = parse_and_visit_statement("export class C {}");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.variable_declarations,
        vec![decl("C", VariableKind::Class)]
    );
}

#[test]
fn export_class_requires_a_name() {
    let p = parse_and_visit_statement("export class {}");
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_enter_class_scope",
            "visit_enter_class_scope_body",
            "visit_exit_class_scope"
        ]
    );
    assert_eq!(
        p.diags,
        vec![Diag::MissingNameOfExportedClass {
            class_keyword: SourceSpan::new(7, 12)
        }]
    );
}

#[test]
fn parse_empty_module() {
    let p = parse_and_visit_module("");
    p.assert_no_diags();
    assert_eq!(p.visitor.visits, vec!["visit_end_of_module"]);
}

#[test]
fn imported_variables_can_be_named_contextual_keywords() {
    for name in ["as", "async", "await", "from", "get", "of", "set", "static", "yield"] {
        for source in [
            format!("import {{ {} }} from 'other';", name),
            format!("import {{ exportedName as {} }} from 'other';", name),
            format!("import {{ 'exportedName' as {} }} from 'other';", name),
            format!("import {} from 'other';", name),
            format!("import * as {} from 'other';", name),
        ] {
            let p = parse_and_visit_statement(&source);
            p.assert_no_diags();
            assert_eq!(
                p.visitor.visits,
                vec!["visit_variable_declaration"],
                "source: {}",
                source
            );
            assert_eq!(p.visitor.variable_declarations[0].0, name);
        }
    }
}

#[test]
fn imported_modules_must_be_quoted() {
    let p = parse_and_visit_statement("import { test } from module;");
    assert_eq!(
        p.diags,
        vec![Diag::CannotImportFromUnquotedModule {
            import_name: SourceSpan::new(21, 27)
        }]
    );
}

#[test]
fn imported_variables_cannot_be_named_reserved_keywords() {
    for name in ["implements", "private", "protected", "public"] {
        let source = format!("import {{ {} }} from 'other';", name);
        let p = parse_and_visit_statement(&source);
        assert_eq!(p.visitor.visits, vec!["visit_variable_declaration"]);
        assert_eq!(
            p.diags,
            vec![Diag::CannotImportVariableNamedKeyword {
                import_name: SourceSpan::new(9, 9 + name.len() as u32),
                name: name.to_string(),
            }],
            "source: {}",
            source
        );

        let source = format!("import {{ someFunction as {} }} from 'other';", name);
        let p = parse_and_visit_statement(&source);
        assert_eq!(p.visitor.visits, vec!["visit_variable_declaration"]);
        assert_eq!(p.diags.len(), 1, "source: {}", source);
    }
}

#[test]
fn imported_escaped_keyword_reports_escape_only() {
    let p = parse_and_visit_statement(r#"import {\u{76}ar} from 'other';"#);
    assert_eq!(
        p.visitor.variable_declarations,
        vec![decl("var", VariableKind::Import)]
    );
    assert_eq!(
        p.diags,
        vec![Diag::KeywordsCannotContainEscapeSequences {
            escape_sequence: SourceSpan::new(8, 14)
        }]
    );
}

#[test]
fn exported_names_can_be_named_keywords() {
    let p = parse_and_visit_statement("export {someFunction as if};");
    p.assert_no_diags();
    assert_eq!(p.visitor.visits, vec!["visit_variable_export_use"]);
    assert_eq!(p.visitor.variable_uses, strings(&["someFunction"]));

    let p = parse_and_visit_statement("export * as if from 'other-module';");
    p.assert_no_diags();
    assert!(p.visitor.visits.is_empty());
}

#[test]
fn imported_names_can_be_named_keywords() {
    let p = parse_and_visit_statement("import {if as someFunction} from 'somewhere';");
    p.assert_no_diags();
    assert_eq!(
        p.visitor.variable_declarations,
        vec![decl("someFunction", VariableKind::Import)]
    );
}

#[test]
fn import_requires_semicolon_or_newline() {
    let p = parse_and_visit_module("import fs from 'fs' nextStatement");
    assert_eq!(
        p.visitor.visits,
        vec![
            "visit_variable_declaration", // fs
            "visit_variable_use",         // nextStatement
            "visit_end_of_module"
        ]
    );
    assert_eq!(
        p.diags,
        vec![Diag::MissingSemicolonAfterStatement {
            insertion_point: SourceSpan::empty(19)
        }]
    );
}
