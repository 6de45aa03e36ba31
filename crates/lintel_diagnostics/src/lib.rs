//! lintel_diagnostics: structured errors reported by the lexer and parser.
//!
//! A diagnostic is data, not a signal: the front end pushes every issue it
//! detects into a [`DiagReporter`] sink and keeps going. Each kind of issue
//! is one enum variant carrying the spans involved and any lexeme captures
//! its message needs. Variants also carry a stable short code (`E0xxx`)
//! which is part of the external contract; the human-readable message is
//! not.

use std::cell::RefCell;
use std::fmt;

use lintel_core::SourceSpan;

/// How severe a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Every diagnostic the front end can produce.
///
/// Field names describe what the span points at in the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Diag {
    // ------------------------------------------------------------------
    // Lexer
    // ------------------------------------------------------------------
    UnclosedBlockComment { comment_open: SourceSpan },
    UnclosedStringLiteral { string_literal: SourceSpan },
    UnclosedTemplate { incomplete_template: SourceSpan },
    UnclosedRegexpLiteral { regexp_literal: SourceSpan },
    UnexpectedCharacter { character: SourceSpan, value: char },
    UnexpectedCharactersInNumber { characters: SourceSpan },
    KeywordsCannotContainEscapeSequences { escape_sequence: SourceSpan },
    ExpectedHexDigitsInUnicodeEscape { escape_sequence: SourceSpan },
    EscapedCodePointInUnicodeOutOfRange { escape_sequence: SourceSpan },
    EscapedCharacterDisallowedInIdentifiers { escape_sequence: SourceSpan },

    // ------------------------------------------------------------------
    // Variable declarations
    // ------------------------------------------------------------------
    LetWithNoBindings { let_keyword: SourceSpan },
    StrayCommaInLetStatement { comma: SourceSpan },
    UnexpectedTokenInVariableDeclaration { unexpected_token: SourceSpan },
    InvalidBindingInLetStatement { binding: SourceSpan },
    MissingVariableNameInDeclaration { equal_token: SourceSpan },
    MissingValueForObjectLiteralEntry { key: SourceSpan },
    InvalidLoneLiteralInObjectLiteral { literal: SourceSpan },
    CannotDeclareVariableWithKeywordName { keyword: SourceSpan, name: String },
    CannotDeclareVariableNamedLetWithLet { name: SourceSpan },
    CannotDeclareClassNamedLet { name: SourceSpan },
    CannotDeclareAwaitInAsyncFunction { name: SourceSpan },
    CannotDeclareYieldInGeneratorFunction { name: SourceSpan },

    // ------------------------------------------------------------------
    // Statements and recovery
    // ------------------------------------------------------------------
    MissingSemicolonAfterStatement { insertion_point: SourceSpan },
    UnexpectedToken { token: SourceSpan },
    UnclosedCodeBlock { block_open: SourceSpan },
    UnmatchedParenthesis { paren: SourceSpan },
    MissingOperandForOperator { operator: SourceSpan },
    MissingBodyForArrowFunction { arrow: SourceSpan },
    FatalParserError { position: SourceSpan },

    // ------------------------------------------------------------------
    // Modules: export
    // ------------------------------------------------------------------
    MissingTokenAfterExport { export_token: SourceSpan },
    UnexpectedTokenAfterExport { unexpected_token: SourceSpan },
    ExportingRequiresCurlies { names: SourceSpan },
    ExportingRequiresDefault { expression: SourceSpan },
    CannotExportDefaultVariable { declaring_token: SourceSpan },
    CannotExportVariableNamedKeyword { export_name: SourceSpan, name: String },
    ExportingStringNameOnlyAllowedForExportFrom { export_name: SourceSpan },
    MissingNameOfExportedFunction { function_keyword: SourceSpan },
    MissingNameOfExportedClass { class_keyword: SourceSpan },

    // ------------------------------------------------------------------
    // Modules: import
    // ------------------------------------------------------------------
    CannotImportLet { import_name: SourceSpan },
    CannotImportVariableNamedKeyword { import_name: SourceSpan, name: String },
    CannotImportFromUnquotedModule { import_name: SourceSpan },
    ExpectedFromBeforeModuleSpecifier { module_specifier: SourceSpan },
    ExpectedFromAndModuleSpecifier { insertion_point: SourceSpan },
    ExpectedAsBeforeImportedNamespaceAlias {
        star_through_alias: SourceSpan,
        star_token: SourceSpan,
        alias: SourceSpan,
    },
    ExpectedVariableNameForImportAs { unexpected_token: SourceSpan },

    // ------------------------------------------------------------------
    // Loops
    // ------------------------------------------------------------------
    CannotAssignToVariableNamedAsyncInForOf { async_token: SourceSpan },

    // ------------------------------------------------------------------
    // TypeScript
    // ------------------------------------------------------------------
    TypeScriptTypeAnnotationsNotAllowedInJavaScript { type_colon: SourceSpan },
    TypeScriptInterfacesNotAllowedInJavaScript { interface_keyword: SourceSpan },
    TypeScriptEnumsNotAllowedInJavaScript { enum_keyword: SourceSpan },
    NonNullAssertionNotAllowedInParameter { bang: SourceSpan },
    ArrowParameterWithTypeAnnotationRequiresParentheses {
        parameter_and_annotation: SourceSpan,
        type_colon: SourceSpan,
    },
}

impl Diag {
    /// The stable short code for this diagnostic. Codes are part of the
    /// external contract and never change meaning.
    pub fn code(&self) -> &'static str {
        match self {
            Diag::UnclosedBlockComment { .. } => "E0001",
            Diag::UnclosedStringLiteral { .. } => "E0002",
            Diag::UnclosedTemplate { .. } => "E0003",
            Diag::UnclosedRegexpLiteral { .. } => "E0004",
            Diag::UnexpectedCharacter { .. } => "E0005",
            Diag::UnexpectedCharactersInNumber { .. } => "E0006",
            Diag::KeywordsCannotContainEscapeSequences { .. } => "E0007",
            Diag::ExpectedHexDigitsInUnicodeEscape { .. } => "E0008",
            Diag::EscapedCodePointInUnicodeOutOfRange { .. } => "E0009",
            Diag::EscapedCharacterDisallowedInIdentifiers { .. } => "E0010",
            Diag::LetWithNoBindings { .. } => "E0011",
            Diag::StrayCommaInLetStatement { .. } => "E0012",
            Diag::UnexpectedTokenInVariableDeclaration { .. } => "E0013",
            Diag::InvalidBindingInLetStatement { .. } => "E0014",
            Diag::MissingVariableNameInDeclaration { .. } => "E0015",
            Diag::MissingValueForObjectLiteralEntry { .. } => "E0016",
            Diag::InvalidLoneLiteralInObjectLiteral { .. } => "E0017",
            Diag::CannotDeclareVariableWithKeywordName { .. } => "E0018",
            Diag::CannotDeclareVariableNamedLetWithLet { .. } => "E0019",
            Diag::CannotDeclareClassNamedLet { .. } => "E0020",
            Diag::CannotDeclareAwaitInAsyncFunction { .. } => "E0021",
            Diag::CannotDeclareYieldInGeneratorFunction { .. } => "E0022",
            Diag::MissingSemicolonAfterStatement { .. } => "E0023",
            Diag::UnexpectedToken { .. } => "E0024",
            Diag::UnclosedCodeBlock { .. } => "E0025",
            Diag::UnmatchedParenthesis { .. } => "E0026",
            Diag::MissingOperandForOperator { .. } => "E0027",
            Diag::MissingBodyForArrowFunction { .. } => "E0028",
            Diag::FatalParserError { .. } => "E0029",
            Diag::MissingTokenAfterExport { .. } => "E0030",
            Diag::UnexpectedTokenAfterExport { .. } => "E0031",
            Diag::ExportingRequiresCurlies { .. } => "E0032",
            Diag::ExportingRequiresDefault { .. } => "E0033",
            Diag::CannotExportDefaultVariable { .. } => "E0034",
            Diag::CannotExportVariableNamedKeyword { .. } => "E0035",
            Diag::ExportingStringNameOnlyAllowedForExportFrom { .. } => "E0036",
            Diag::MissingNameOfExportedFunction { .. } => "E0037",
            Diag::MissingNameOfExportedClass { .. } => "E0038",
            Diag::CannotImportLet { .. } => "E0039",
            Diag::CannotImportVariableNamedKeyword { .. } => "E0040",
            Diag::CannotImportFromUnquotedModule { .. } => "E0041",
            Diag::ExpectedFromBeforeModuleSpecifier { .. } => "E0042",
            Diag::ExpectedFromAndModuleSpecifier { .. } => "E0043",
            Diag::ExpectedAsBeforeImportedNamespaceAlias { .. } => "E0044",
            Diag::ExpectedVariableNameForImportAs { .. } => "E0045",
            Diag::CannotAssignToVariableNamedAsyncInForOf { .. } => "E0046",
            Diag::TypeScriptTypeAnnotationsNotAllowedInJavaScript { .. } => "E0047",
            Diag::TypeScriptInterfacesNotAllowedInJavaScript { .. } => "E0048",
            Diag::TypeScriptEnumsNotAllowedInJavaScript { .. } => "E0049",
            Diag::NonNullAssertionNotAllowedInParameter { .. } => "E0050",
            Diag::ArrowParameterWithTypeAnnotationRequiresParentheses { .. } => "E0051",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Error
    }

    /// The span a consumer should point at first.
    pub fn primary_span(&self) -> SourceSpan {
        match *self {
            Diag::UnclosedBlockComment { comment_open } => comment_open,
            Diag::UnclosedStringLiteral { string_literal } => string_literal,
            Diag::UnclosedTemplate { incomplete_template } => incomplete_template,
            Diag::UnclosedRegexpLiteral { regexp_literal } => regexp_literal,
            Diag::UnexpectedCharacter { character, .. } => character,
            Diag::UnexpectedCharactersInNumber { characters } => characters,
            Diag::KeywordsCannotContainEscapeSequences { escape_sequence } => escape_sequence,
            Diag::ExpectedHexDigitsInUnicodeEscape { escape_sequence } => escape_sequence,
            Diag::EscapedCodePointInUnicodeOutOfRange { escape_sequence } => escape_sequence,
            Diag::EscapedCharacterDisallowedInIdentifiers { escape_sequence } => escape_sequence,
            Diag::LetWithNoBindings { let_keyword } => let_keyword,
            Diag::StrayCommaInLetStatement { comma } => comma,
            Diag::UnexpectedTokenInVariableDeclaration { unexpected_token } => unexpected_token,
            Diag::InvalidBindingInLetStatement { binding } => binding,
            Diag::MissingVariableNameInDeclaration { equal_token } => equal_token,
            Diag::MissingValueForObjectLiteralEntry { key } => key,
            Diag::InvalidLoneLiteralInObjectLiteral { literal } => literal,
            Diag::CannotDeclareVariableWithKeywordName { keyword, .. } => keyword,
            Diag::CannotDeclareVariableNamedLetWithLet { name } => name,
            Diag::CannotDeclareClassNamedLet { name } => name,
            Diag::CannotDeclareAwaitInAsyncFunction { name } => name,
            Diag::CannotDeclareYieldInGeneratorFunction { name } => name,
            Diag::MissingSemicolonAfterStatement { insertion_point } => insertion_point,
            Diag::UnexpectedToken { token } => token,
            Diag::UnclosedCodeBlock { block_open } => block_open,
            Diag::UnmatchedParenthesis { paren } => paren,
            Diag::MissingOperandForOperator { operator } => operator,
            Diag::MissingBodyForArrowFunction { arrow } => arrow,
            Diag::FatalParserError { position } => position,
            Diag::MissingTokenAfterExport { export_token } => export_token,
            Diag::UnexpectedTokenAfterExport { unexpected_token } => unexpected_token,
            Diag::ExportingRequiresCurlies { names } => names,
            Diag::ExportingRequiresDefault { expression } => expression,
            Diag::CannotExportDefaultVariable { declaring_token } => declaring_token,
            Diag::CannotExportVariableNamedKeyword { export_name, .. } => export_name,
            Diag::ExportingStringNameOnlyAllowedForExportFrom { export_name } => export_name,
            Diag::MissingNameOfExportedFunction { function_keyword } => function_keyword,
            Diag::MissingNameOfExportedClass { class_keyword } => class_keyword,
            Diag::CannotImportLet { import_name } => import_name,
            Diag::CannotImportVariableNamedKeyword { import_name, .. } => import_name,
            Diag::CannotImportFromUnquotedModule { import_name } => import_name,
            Diag::ExpectedFromBeforeModuleSpecifier { module_specifier } => module_specifier,
            Diag::ExpectedFromAndModuleSpecifier { insertion_point } => insertion_point,
            Diag::ExpectedAsBeforeImportedNamespaceAlias { star_through_alias, .. } => {
                star_through_alias
            }
            Diag::ExpectedVariableNameForImportAs { unexpected_token } => unexpected_token,
            Diag::CannotAssignToVariableNamedAsyncInForOf { async_token } => async_token,
            Diag::TypeScriptTypeAnnotationsNotAllowedInJavaScript { type_colon } => type_colon,
            Diag::TypeScriptInterfacesNotAllowedInJavaScript { interface_keyword } => {
                interface_keyword
            }
            Diag::TypeScriptEnumsNotAllowedInJavaScript { enum_keyword } => enum_keyword,
            Diag::NonNullAssertionNotAllowedInParameter { bang } => bang,
            Diag::ArrowParameterWithTypeAnnotationRequiresParentheses {
                parameter_and_annotation,
                ..
            } => parameter_and_annotation,
        }
    }

    /// Render the human-readable message for this diagnostic.
    pub fn message(&self) -> String {
        match self {
            Diag::UnclosedBlockComment { .. } => "unclosed block comment".into(),
            Diag::UnclosedStringLiteral { .. } => "unclosed string literal".into(),
            Diag::UnclosedTemplate { .. } => "unclosed template".into(),
            Diag::UnclosedRegexpLiteral { .. } => "unclosed regexp literal".into(),
            Diag::UnexpectedCharacter { value, .. } => {
                format!("unexpected character: {:?}", value)
            }
            Diag::UnexpectedCharactersInNumber { .. } => {
                "unexpected characters in number literal".into()
            }
            Diag::KeywordsCannotContainEscapeSequences { .. } => {
                "keywords cannot contain escape sequences".into()
            }
            Diag::ExpectedHexDigitsInUnicodeEscape { .. } => {
                "expected hexadecimal digits in Unicode escape sequence".into()
            }
            Diag::EscapedCodePointInUnicodeOutOfRange { .. } => {
                "code point out of range in Unicode escape sequence".into()
            }
            Diag::EscapedCharacterDisallowedInIdentifiers { .. } => {
                "escaped character is not allowed in identifiers".into()
            }
            Diag::LetWithNoBindings { .. } => "'let' with no bindings".into(),
            Diag::StrayCommaInLetStatement { .. } => "stray comma in let statement".into(),
            Diag::UnexpectedTokenInVariableDeclaration { .. } => {
                "unexpected token in variable declaration; expected variable name".into()
            }
            Diag::InvalidBindingInLetStatement { .. } => "invalid binding in let statement".into(),
            Diag::MissingVariableNameInDeclaration { .. } => "what is initialized here?".into(),
            Diag::MissingValueForObjectLiteralEntry { .. } => {
                "missing value for object property".into()
            }
            Diag::InvalidLoneLiteralInObjectLiteral { .. } => {
                "invalid lone literal in object literal".into()
            }
            Diag::CannotDeclareVariableWithKeywordName { name, .. } => {
                format!("cannot declare variable named keyword '{}'", name)
            }
            Diag::CannotDeclareVariableNamedLetWithLet { .. } => {
                "cannot declare variable named 'let' with 'let' or 'const'".into()
            }
            Diag::CannotDeclareClassNamedLet { .. } => "classes cannot be named 'let'".into(),
            Diag::CannotDeclareAwaitInAsyncFunction { .. } => {
                "cannot declare 'await' inside async function".into()
            }
            Diag::CannotDeclareYieldInGeneratorFunction { .. } => {
                "cannot declare 'yield' inside generator function".into()
            }
            Diag::MissingSemicolonAfterStatement { .. } => {
                "missing semicolon after statement".into()
            }
            Diag::UnexpectedToken { .. } => "unexpected token".into(),
            Diag::UnclosedCodeBlock { .. } => {
                "unclosed code block; expected '}' by end of file".into()
            }
            Diag::UnmatchedParenthesis { .. } => "unmatched parenthesis".into(),
            Diag::MissingOperandForOperator { .. } => "missing operand for operator".into(),
            Diag::MissingBodyForArrowFunction { .. } => {
                "missing body for arrow function".into()
            }
            Diag::FatalParserError { .. } => "failed to parse; giving up on this module".into(),
            Diag::MissingTokenAfterExport { .. } => {
                "expected 'from \"name_of_module.mjs\"', declaration, or expression after 'export'"
                    .into()
            }
            Diag::UnexpectedTokenAfterExport { .. } => "unexpected token after 'export'".into(),
            Diag::ExportingRequiresCurlies { .. } => "exporting requires '{' and '}'".into(),
            Diag::ExportingRequiresDefault { .. } => "exporting requires 'default'".into(),
            Diag::CannotExportDefaultVariable { .. } => {
                "cannot declare and export variable with 'export default'".into()
            }
            Diag::CannotExportVariableNamedKeyword { name, .. } => {
                format!("cannot export variable named keyword '{}'", name)
            }
            Diag::ExportingStringNameOnlyAllowedForExportFrom { .. } => {
                "forwarding exports are only allowed in export-from".into()
            }
            Diag::MissingNameOfExportedFunction { .. } => {
                "exported function must have a name".into()
            }
            Diag::MissingNameOfExportedClass { .. } => "exported class must have a name".into(),
            Diag::CannotImportLet { .. } => "cannot import 'let'".into(),
            Diag::CannotImportVariableNamedKeyword { name, .. } => {
                format!("cannot import variable named keyword '{}'", name)
            }
            Diag::CannotImportFromUnquotedModule { .. } => {
                "module specifier must be quoted".into()
            }
            Diag::ExpectedFromBeforeModuleSpecifier { .. } => {
                "expected 'from' before module specifier".into()
            }
            Diag::ExpectedFromAndModuleSpecifier { .. } => {
                "expected 'from \"name_of_module.mjs\"'".into()
            }
            Diag::ExpectedAsBeforeImportedNamespaceAlias { .. } => {
                "expected 'as' between '*' and the alias".into()
            }
            Diag::ExpectedVariableNameForImportAs { .. } => {
                "expected variable name for 'import'-'as'".into()
            }
            Diag::CannotAssignToVariableNamedAsyncInForOf { .. } => {
                "assigning to 'async' in a for-of loop requires parentheses".into()
            }
            Diag::TypeScriptTypeAnnotationsNotAllowedInJavaScript { .. } => {
                "TypeScript type annotations are not allowed in JavaScript code".into()
            }
            Diag::TypeScriptInterfacesNotAllowedInJavaScript { .. } => {
                "TypeScript 'interface' is not allowed in JavaScript code".into()
            }
            Diag::TypeScriptEnumsNotAllowedInJavaScript { .. } => {
                "TypeScript 'enum' is not allowed in JavaScript code".into()
            }
            Diag::NonNullAssertionNotAllowedInParameter { .. } => {
                "unexpected '!' in parameter; non-null assertions are not allowed here".into()
            }
            Diag::ArrowParameterWithTypeAnnotationRequiresParentheses { .. } => {
                "arrow function parameter with a type annotation requires parentheses".into()
            }
        }
    }
}

impl fmt::Display for Diag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} at {}",
            self.severity(),
            self.code(),
            self.message(),
            self.primary_span()
        )
    }
}

/// An append-only sink for diagnostics.
///
/// The lexer and the parser share one reporter, so `report` takes `&self`;
/// implementations that store diagnostics use interior mutability.
pub trait DiagReporter {
    fn report(&self, diag: Diag);

    /// Forget everything reported so far.
    fn reset(&self) {}
}

/// Discards every diagnostic.
pub struct NullReporter;

impl DiagReporter for NullReporter {
    fn report(&self, _diag: Diag) {}
}

/// Stores diagnostics for later inspection, in report order.
#[derive(Default)]
pub struct CollectingReporter {
    diags: RefCell<Vec<Diag>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything reported so far.
    pub fn diags(&self) -> Vec<Diag> {
        self.diags.borrow().clone()
    }

    /// Take everything reported so far, leaving the reporter empty.
    pub fn take_diags(&self) -> Vec<Diag> {
        self.diags.take()
    }

    pub fn len(&self) -> usize {
        self.diags.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.diags.borrow().is_empty()
    }
}

impl DiagReporter for CollectingReporter {
    fn report(&self, diag: Diag) {
        self.diags.borrow_mut().push(diag);
    }

    fn reset(&self) {
        self.diags.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable_and_distinct_from_messages() {
        let diag = Diag::LetWithNoBindings {
            let_keyword: SourceSpan::new(0, 3),
        };
        assert_eq!(diag.code(), "E0011");
        assert_ne!(diag.code(), diag.message());
    }

    #[test]
    fn test_primary_span() {
        let diag = Diag::MissingSemicolonAfterStatement {
            insertion_point: SourceSpan::empty(9),
        };
        assert_eq!(diag.primary_span(), SourceSpan::empty(9));
    }

    #[test]
    fn test_collecting_reporter_keeps_order() {
        let reporter = CollectingReporter::new();
        reporter.report(Diag::UnexpectedToken {
            token: SourceSpan::new(0, 1),
        });
        reporter.report(Diag::UnclosedCodeBlock {
            block_open: SourceSpan::new(2, 3),
        });
        let diags = reporter.diags();
        assert_eq!(diags.len(), 2);
        assert!(matches!(diags[0], Diag::UnexpectedToken { .. }));
        reporter.reset();
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_null_reporter_discards() {
        let reporter = NullReporter;
        reporter.report(Diag::UnexpectedToken {
            token: SourceSpan::new(0, 1),
        });
    }
}
