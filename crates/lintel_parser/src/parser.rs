//! The parser.
//!
//! Statements and declarations parse by recursive descent; expressions parse
//! in two phases (`parse_primary`, then `parse_expression_remainder` gated
//! by [`Precedence`] flags). The parser emits visitor events in a fixed
//! order that downstream name resolution relies on: in `let x = expr`, the
//! uses inside `expr` are visited before the declaration of `x`, so binding
//! patterns are parsed into a [`BufferingVisitor`] and replayed after the
//! initializer.
//!
//! Recovery never throws. Every detected problem becomes a diagnostic and
//! the parser re-synchronizes; the only fatal signal is running out of
//! recursion budget, which is caught in `parse_and_visit_module`.

use std::cell::{Cell, RefCell};
use std::mem;
use std::ops::{Deref, DerefMut};

use lintel_ast::{
    BufferingVisitor, Expression, ExpressionRef, FunctionAttributes, ObjectEntry, ParseVisitor,
    VariableKind, VisitsId,
};
use lintel_core::{PaddedString, ParseArena, SourceSpan, TextPos};
use lintel_diagnostics::{Diag, DiagReporter};
use lintel_lexer::{Identifier, Lexer, Token, TokenFlags, TokenKind};

use crate::precedence::{is_binary_operator, is_compound_assignment, Precedence};

/// Maximum statement/expression nesting before the parser gives up on the
/// module. Keeps pathological input from overflowing the stack.
const MAX_RECURSION_DEPTH: u32 = 200;

/// Type keywords that never refer to a user-declared name.
const PRIMITIVE_TYPE_NAMES: &[&str] = &[
    "any", "bigint", "boolean", "never", "number", "object", "string", "symbol", "undefined",
    "unknown",
];

/// The internal signal raised when recovery cannot continue. Distinct from
/// diagnostics; caught only at the module boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatalParseError {
    pub position: TextPos,
}

pub type ParseResult<T> = Result<T, FatalParseError>;

/// Dialect switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    /// Accept JSX elements as primary expressions.
    pub jsx: bool,
    /// Accept TypeScript syntax: type annotations, `interface`, `enum`,
    /// `as` casts, non-null assertions, generic arrow functions.
    pub typescript: bool,
}

/// Whether an expression position reads or writes the variables it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VariableContext {
    Lhs,
    Rhs,
}

pub struct Parser<'a, 'r> {
    code: &'a PaddedString,
    arena: &'a ParseArena,
    lexer: Lexer<'a, 'r>,
    reporter: &'r dyn DiagReporter,
    options: ParserOptions,
    /// async/generator attributes of the enclosing function context.
    attributes: FunctionAttributes,
    /// Event buffers owned by function/class expression nodes, replayed
    /// when the expression tree is visited.
    deferred_visits: Vec<BufferingVisitor>,
    /// While speculating (arrow return types, generic arrows), diagnostics
    /// are buffered here: forwarded on commit, dropped on rollback.
    speculation_depth: Cell<u32>,
    speculation_diags: RefCell<Vec<Diag>>,
    depth: u32,
}

/// Bookkeeping for one speculative parse.
struct Speculation {
    diag_mark: usize,
    deferred_mark: usize,
}

impl<'a, 'r> Parser<'a, 'r> {
    pub fn new(
        arena: &'a ParseArena,
        code: &'a PaddedString,
        reporter: &'r dyn DiagReporter,
        options: ParserOptions,
    ) -> Self {
        Self {
            code,
            arena,
            lexer: Lexer::new(code, reporter),
            reporter,
            options,
            attributes: FunctionAttributes::NORMAL,
            deferred_visits: Vec::new(),
            speculation_depth: Cell::new(0),
            speculation_diags: RefCell::new(Vec::new()),
            depth: 0,
        }
    }

    /// Parse a whole module, emitting `visit_end_of_module` exactly once.
    /// Fatal parse errors are caught here: a diagnostic is reported and the
    /// rest of the input is abandoned.
    pub fn parse_and_visit_module(&mut self, v: &mut dyn ParseVisitor) {
        while self.peek().kind != TokenKind::EndOfFile {
            self.depth = 0;
            let before = self.peek().begin;
            match self.parse_and_visit_statement(v) {
                Ok(()) => {
                    if self.peek().kind != TokenKind::EndOfFile && self.peek().begin == before {
                        // The statement parser made no progress; drop the
                        // offending token so the module loop terminates.
                        self.report(Diag::UnexpectedToken {
                            token: self.peek().span(),
                        });
                        self.lexer.skip();
                    }
                }
                Err(fatal) => {
                    self.report(Diag::FatalParserError {
                        position: SourceSpan::empty(fatal.position),
                    });
                    break;
                }
            }
        }
        v.visit_end_of_module();
    }

    /// Make the parser behave as if the following statements appear inside
    /// a function with the given attributes. The previous attributes are
    /// restored when the guard drops.
    pub fn enter_function(&mut self, attributes: FunctionAttributes) -> FunctionGuard<'_, 'a, 'r> {
        let saved = mem::replace(&mut self.attributes, attributes);
        FunctionGuard {
            parser: self,
            saved,
        }
    }

    /// Parse a single expression at default precedence. Primarily a testing
    /// aid; visitor events for the expression are not emitted.
    pub fn parse_expression(&mut self) -> ParseResult<ExpressionRef<'a>> {
        self.parse_expression_prec(Precedence::default())
    }

    // ======================================================================
    // Small helpers
    // ======================================================================

    #[inline]
    fn peek(&self) -> &Token {
        self.lexer.peek()
    }

    #[inline]
    fn report(&self, diag: Diag) {
        if self.speculation_depth.get() > 0 {
            self.speculation_diags.borrow_mut().push(diag);
        } else {
            self.reporter.report(diag);
        }
    }

    fn begin_speculation(&self) -> Speculation {
        self.speculation_depth.set(self.speculation_depth.get() + 1);
        Speculation {
            diag_mark: self.speculation_diags.borrow().len(),
            deferred_mark: self.deferred_visits.len(),
        }
    }

    /// Keep everything parsed during the speculation; buffered diagnostics
    /// flow to the reporter once the outermost speculation commits.
    fn commit_speculation(&mut self, _speculation: Speculation) {
        let depth = self.speculation_depth.get() - 1;
        self.speculation_depth.set(depth);
        if depth == 0 {
            for diag in self.speculation_diags.borrow_mut().drain(..) {
                self.reporter.report(diag);
            }
        }
    }

    /// Throw away everything parsed during the speculation.
    fn discard_speculation(&mut self, speculation: Speculation) {
        let depth = self.speculation_depth.get() - 1;
        self.speculation_depth.set(depth);
        self.speculation_diags
            .borrow_mut()
            .truncate(speculation.diag_mark);
        self.deferred_visits.truncate(speculation.deferred_mark);
    }

    fn make(&self, expression: Expression<'a>) -> ExpressionRef<'a> {
        self.arena.alloc(expression)
    }

    fn make_children(&self, children: Vec<ExpressionRef<'a>>) -> &'a [ExpressionRef<'a>] {
        self.arena.alloc_slice_copy(&children)
    }

    /// The span from `begin` through the last consumed token.
    fn span_from(&self, begin: TextPos) -> SourceSpan {
        SourceSpan::new(begin, self.lexer.end_of_previous_token().max(begin))
    }

    fn identifier_from_token(&self, token: &Token) -> Identifier<'a> {
        Identifier {
            span: token.span(),
            normalized: self.arena.alloc_str(&token.value),
            has_escape: token.flags.contains(TokenFlags::CONTAINS_ESCAPE),
        }
    }

    fn synthetic_identifier(&self, span: SourceSpan, text: &str) -> Identifier<'a> {
        Identifier {
            span,
            normalized: self.arena.alloc_str(text),
            has_escape: false,
        }
    }

    fn store_visits(&mut self, buffer: BufferingVisitor) -> VisitsId {
        self.deferred_visits.push(buffer);
        VisitsId((self.deferred_visits.len() - 1) as u32)
    }

    fn take_visits(&mut self, id: VisitsId) -> BufferingVisitor {
        mem::take(&mut self.deferred_visits[id.0 as usize])
    }

    /// Look one token past the current one.
    fn next_token_kind(&mut self) -> TokenKind {
        let state = self.lexer.snapshot();
        self.lexer.skip();
        let kind = self.peek().kind;
        self.lexer.roll_back(state);
        kind
    }

    fn enter_nesting(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > MAX_RECURSION_DEPTH {
            return Err(FatalParseError {
                position: self.peek().begin,
            });
        }
        Ok(())
    }

    fn exit_nesting(&mut self) {
        self.depth -= 1;
    }

    /// Accept an explicit `;`, a `}`, end of input, or a preceding line
    /// break; otherwise report a zero-width missing-semicolon diagnostic at
    /// the insertion point and continue.
    fn consume_semicolon(&mut self) {
        match self.peek().kind {
            TokenKind::Semicolon => self.lexer.skip(),
            TokenKind::EndOfFile | TokenKind::CloseBrace => {}
            _ if self.peek().has_leading_newline() => {}
            _ => {
                self.report(Diag::MissingSemicolonAfterStatement {
                    insertion_point: SourceSpan::empty(self.lexer.end_of_previous_token()),
                });
            }
        }
    }

    fn expect_or_report(&mut self, kind: TokenKind) {
        if self.peek().kind == kind {
            self.lexer.skip();
        } else {
            self.report(Diag::UnexpectedToken {
                token: self.peek().span(),
            });
        }
    }

    // ======================================================================
    // Statements
    // ======================================================================

    /// Parse one statement or declaration, emitting its visitor events.
    pub fn parse_and_visit_statement(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        self.enter_nesting()?;
        let result = self.parse_and_visit_statement_inner(v);
        self.exit_nesting();
        result
    }

    fn parse_and_visit_statement_inner(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        use TokenKind::*;
        let statement_start = self.peek().kind;
        match statement_start {
            Semicolon => {
                self.lexer.skip();
                Ok(())
            }
            ExportKeyword => self.parse_and_visit_export(v),
            ImportKeyword => self.parse_and_visit_import(v),
            VarKeyword => self.parse_and_visit_variable_statement(v, VariableKind::Var),
            ConstKeyword => {
                if self.options.typescript && self.next_token_kind() == EnumKeyword {
                    self.lexer.skip();
                    self.parse_and_visit_enum(v)
                } else {
                    self.parse_and_visit_variable_statement(v, VariableKind::Const)
                }
            }
            LetKeyword => match self.next_token_kind() {
                Dot | OpenParen => self.parse_and_visit_expression_statement(v),
                Colon => self.parse_and_visit_labeled_statement(v),
                _ => self.parse_and_visit_variable_statement(v, VariableKind::Let),
            },
            AsyncKeyword => match self.next_token_kind() {
                FunctionKeyword => self.parse_and_visit_function_declaration(v, false),
                Colon => self.parse_and_visit_labeled_statement(v),
                _ => self.parse_and_visit_expression_statement(v),
            },
            FunctionKeyword => self.parse_and_visit_function_declaration(v, false),
            ClassKeyword => self.parse_and_visit_class_declaration(v, false, true),
            InterfaceKeyword if self.next_token_kind().is_identifier_like() => {
                self.parse_and_visit_interface(v)
            }
            EnumKeyword => self.parse_and_visit_enum(v),
            IfKeyword => self.parse_and_visit_if(v),
            WhileKeyword => self.parse_and_visit_while(v),
            DoKeyword => self.parse_and_visit_do_while(v),
            ForKeyword => self.parse_and_visit_for(v),
            SwitchKeyword => self.parse_and_visit_switch(v),
            TryKeyword => self.parse_and_visit_try(v),
            ReturnKeyword | ThrowKeyword => {
                self.lexer.skip();
                match self.peek().kind {
                    Semicolon => self.lexer.skip(),
                    CloseBrace | EndOfFile => {}
                    _ if self.peek().has_leading_newline() => {}
                    _ => {
                        self.parse_and_visit_expression(v, Precedence::default())?;
                        self.consume_semicolon();
                    }
                }
                Ok(())
            }
            BreakKeyword | ContinueKeyword => {
                self.lexer.skip();
                if self.peek().kind.is_identifier_like() && !self.peek().has_leading_newline() {
                    // Label; labels produce no variable events.
                    self.lexer.skip();
                }
                self.consume_semicolon();
                Ok(())
            }
            DebuggerKeyword => {
                self.lexer.skip();
                self.consume_semicolon();
                Ok(())
            }
            WithKeyword => {
                // No with-scope event exists in the visitor alphabet; the
                // body is visited without scope markers.
                self.lexer.skip();
                self.expect_or_report(OpenParen);
                self.parse_and_visit_expression(v, Precedence::default())?;
                self.expect_or_report(CloseParen);
                self.parse_and_visit_statement(v)
            }
            OpenBrace => {
                v.visit_enter_block_scope();
                let result = self.parse_statement_block_no_scope(v);
                v.visit_exit_block_scope();
                result
            }
            CloseBrace | EndOfFile => Ok(()),
            kind if kind.is_identifier_like() => {
                let state = self.lexer.snapshot();
                self.lexer.skip();
                if self.peek().kind == Colon {
                    self.lexer.skip();
                    self.parse_and_visit_statement(v)
                } else {
                    self.lexer.roll_back(state);
                    self.parse_and_visit_expression_statement(v)
                }
            }
            kind if starts_expression(kind) => self.parse_and_visit_expression_statement(v),
            _ => {
                self.report(Diag::UnexpectedToken {
                    token: self.peek().span(),
                });
                self.recover_statement();
                Ok(())
            }
        }
    }

    fn parse_and_visit_labeled_statement(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        self.lexer.skip(); // label
        self.lexer.skip(); // ':'
        self.parse_and_visit_statement(v)
    }

    fn parse_and_visit_expression_statement(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        self.parse_and_visit_expression(v, Precedence::default())?;
        self.consume_semicolon();
        Ok(())
    }

    /// Skip to the next plausible statement boundary after an unexpected
    /// token.
    fn recover_statement(&mut self) {
        self.lexer.skip();
        loop {
            match self.peek().kind {
                TokenKind::Semicolon => {
                    self.lexer.skip();
                    return;
                }
                TokenKind::CloseBrace | TokenKind::EndOfFile => return,
                kind if kind.begins_statement() => return,
                _ => self.lexer.skip(),
            }
        }
    }

    /// Parse `{ statements }`, assuming the caller emits any scope events.
    fn parse_statement_block_no_scope(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        let open_span = self.peek().span();
        if self.peek().kind != TokenKind::OpenBrace {
            self.report(Diag::UnexpectedToken { token: open_span });
            return Ok(());
        }
        self.lexer.skip();
        loop {
            match self.peek().kind {
                TokenKind::CloseBrace => {
                    self.lexer.skip();
                    return Ok(());
                }
                TokenKind::EndOfFile => {
                    self.report(Diag::UnclosedCodeBlock {
                        block_open: open_span,
                    });
                    return Ok(());
                }
                _ => {
                    let before = self.peek().begin;
                    self.parse_and_visit_statement(v)?;
                    if self.peek().begin == before
                        && !matches!(
                            self.peek().kind,
                            TokenKind::CloseBrace | TokenKind::EndOfFile
                        )
                    {
                        self.report(Diag::UnexpectedToken {
                            token: self.peek().span(),
                        });
                        self.lexer.skip();
                    }
                }
            }
        }
    }

    // ======================================================================
    // Variable declarations
    // ======================================================================

    fn parse_and_visit_variable_statement(
        &mut self,
        v: &mut dyn ParseVisitor,
        kind: VariableKind,
    ) -> ParseResult<()> {
        let declaring_span = self.peek().span();
        self.lexer.skip();
        let expect_terminator = self.parse_and_visit_let_bindings(
            v,
            kind,
            declaring_span,
            Precedence::default().without_commas(),
        )?;
        if expect_terminator {
            self.consume_semicolon();
        }
        Ok(())
    }

    /// Parse the comma-separated binding list of a `var`/`let`/`const`
    /// statement or `for` head. `init_prec` controls initializer parsing
    /// (`in` must stay off inside `for` heads). Returns whether the
    /// statement still expects a terminator; recovery that hands the rest
    /// of the line to another statement suppresses the semicolon check.
    fn parse_and_visit_let_bindings(
        &mut self,
        v: &mut dyn ParseVisitor,
        kind: VariableKind,
        declaring_span: SourceSpan,
        init_prec: Precedence,
    ) -> ParseResult<bool> {
        let mut first_binding = true;
        let mut comma_span: Option<SourceSpan> = None;
        loop {
            if !first_binding {
                if self.peek().kind != TokenKind::Comma {
                    break;
                }
                comma_span = Some(self.peek().span());
                self.lexer.skip();
            }
            let binding_start = self.peek().kind;
            match binding_start {
                k if k.is_identifier_like()
                    || k == TokenKind::OpenBrace
                    || k == TokenKind::OpenBracket =>
                {
                    self.parse_and_visit_declaring_element(v, kind, init_prec)?;
                }
                TokenKind::Equals => {
                    self.report(Diag::MissingVariableNameInDeclaration {
                        equal_token: self.peek().span(),
                    });
                    self.lexer.skip();
                    self.parse_and_visit_expression(v, init_prec)?;
                }
                // Literal keywords (`true`, `this`, …) start expressions
                // and fall through to the unexpected-token recovery below.
                k if k.is_disallowed_binding_keyword()
                    && !matches!(
                        k,
                        TokenKind::TrueKeyword
                            | TokenKind::FalseKeyword
                            | TokenKind::NullKeyword
                            | TokenKind::ThisKeyword
                            | TokenKind::SuperKeyword
                    )
                    && matches!(
                        self.next_token_kind(),
                        TokenKind::Equals
                            | TokenKind::Semicolon
                            | TokenKind::Comma
                            | TokenKind::EndOfFile
                    ) =>
                {
                    let keyword = self.peek().span();
                    self.report(Diag::CannotDeclareVariableWithKeywordName {
                        keyword,
                        name: self.peek().value.clone(),
                    });
                    self.lexer.skip();
                    if self.peek().kind == TokenKind::Equals {
                        self.lexer.skip();
                        self.parse_and_visit_expression(v, init_prec)?;
                    }
                }
                _ => {
                    let token_span = self.peek().span();
                    let at_end = matches!(
                        self.peek().kind,
                        TokenKind::Semicolon | TokenKind::EndOfFile | TokenKind::CloseBrace
                    ) || self.peek().has_leading_newline();
                    if at_end {
                        if first_binding {
                            self.report(Diag::LetWithNoBindings {
                                let_keyword: declaring_span,
                            });
                        } else if let Some(comma) = comma_span {
                            self.report(Diag::StrayCommaInLetStatement { comma });
                        }
                        break;
                    }
                    self.report(Diag::UnexpectedTokenInVariableDeclaration {
                        unexpected_token: token_span,
                    });
                    if self.peek().kind.begins_statement() {
                        // The rest of the line is another statement.
                        return Ok(false);
                    }
                    // Re-parse the rest of the statement as an expression so
                    // its uses are still observed.
                    self.parse_and_visit_expression(v, Precedence::default())?;
                    break;
                }
            }
            first_binding = false;
        }
        Ok(true)
    }

    /// Parse one declared binding: a name or destructuring pattern plus an
    /// optional initializer. Pattern declarations are buffered so the
    /// initializer's uses are visited first.
    fn parse_and_visit_declaring_element(
        &mut self,
        v: &mut dyn ParseVisitor,
        kind: VariableKind,
        init_prec: Precedence,
    ) -> ParseResult<()> {
        let mut pattern = BufferingVisitor::new();
        self.parse_binding_pattern(&mut pattern, kind)?;
        let mut type_buffer = BufferingVisitor::new();
        if self.peek().kind == TokenKind::Colon {
            let type_colon = self.peek().span();
            if !self.options.typescript {
                self.report(Diag::TypeScriptTypeAnnotationsNotAllowedInJavaScript { type_colon });
            }
            self.lexer.skip();
            self.parse_and_visit_type(&mut type_buffer)?;
        }
        if self.peek().kind == TokenKind::Equals {
            self.lexer.skip();
            self.parse_and_visit_expression(v, init_prec)?;
        }
        type_buffer.move_into(v);
        pattern.move_into(v);
        Ok(())
    }

    /// Diagnostics that depend on the declared name.
    fn check_binding_name(&self, name: &Identifier<'a>, kind: VariableKind) {
        if name.has_escape {
            // The lexer already reported escaped keywords; the binding
            // itself stands.
            return;
        }
        match name.normalized {
            "let" => match kind {
                VariableKind::Let | VariableKind::Const => {
                    self.report(Diag::CannotDeclareVariableNamedLetWithLet { name: name.span });
                }
                VariableKind::Import => {
                    self.report(Diag::CannotImportLet {
                        import_name: name.span,
                    });
                }
                VariableKind::Class => {
                    self.report(Diag::CannotDeclareClassNamedLet { name: name.span });
                }
                _ => {}
            },
            "await" if self.attributes.is_async => {
                self.report(Diag::CannotDeclareAwaitInAsyncFunction { name: name.span });
            }
            "yield" if self.attributes.is_generator => {
                self.report(Diag::CannotDeclareYieldInGeneratorFunction { name: name.span });
            }
            _ if kind == VariableKind::Import => {
                if let Some(keyword) = lintel_lexer::keywords::from_keyword(name.normalized) {
                    if keyword.is_strict_only_reserved_word() {
                        self.report(Diag::CannotImportVariableNamedKeyword {
                            import_name: name.span,
                            name: name.normalized.to_string(),
                        });
                    }
                }
            }
            _ => {}
        }
    }

    /// Parse an identifier, object pattern, or array pattern, emitting the
    /// declarations (and the uses inside member defaults) into `buffer`.
    fn parse_binding_pattern(
        &mut self,
        buffer: &mut dyn ParseVisitor,
        kind: VariableKind,
    ) -> ParseResult<()> {
        match self.peek().kind {
            k if k.is_identifier_like() => {
                let token = self.peek().clone();
                self.lexer.skip();
                let name = self.identifier_from_token(&token);
                self.check_binding_name(&name, kind);
                buffer.visit_variable_declaration(&name, kind);
                Ok(())
            }
            TokenKind::OpenBrace => {
                let open_span = self.peek().span();
                self.lexer.skip();
                self.parse_object_binding_members(buffer, kind, open_span)
            }
            TokenKind::OpenBracket => {
                let open_span = self.peek().span();
                self.lexer.skip();
                self.parse_array_binding_members(buffer, kind, open_span)
            }
            _ => {
                self.report(Diag::InvalidBindingInLetStatement {
                    binding: self.peek().span(),
                });
                if !matches!(
                    self.peek().kind,
                    TokenKind::CloseBrace
                        | TokenKind::CloseBracket
                        | TokenKind::CloseParen
                        | TokenKind::Semicolon
                        | TokenKind::Comma
                        | TokenKind::EndOfFile
                ) && !self.peek().kind.begins_statement()
                {
                    self.lexer.skip();
                }
                Ok(())
            }
        }
    }

    /// One pattern member: a nested pattern with an optional `= default`.
    /// The default's uses land in `buffer` before the member's declarations.
    fn parse_binding_element_with_default(
        &mut self,
        buffer: &mut dyn ParseVisitor,
        kind: VariableKind,
    ) -> ParseResult<()> {
        let mut local = BufferingVisitor::new();
        self.parse_binding_pattern(&mut local, kind)?;
        if self.peek().kind == TokenKind::Equals {
            self.lexer.skip();
            self.parse_and_visit_expression(buffer, Precedence::default().without_commas())?;
        }
        local.move_into(buffer);
        Ok(())
    }

    fn parse_object_binding_members(
        &mut self,
        buffer: &mut dyn ParseVisitor,
        kind: VariableKind,
        open_span: SourceSpan,
    ) -> ParseResult<()> {
        loop {
            match self.peek().kind {
                TokenKind::CloseBrace => {
                    self.lexer.skip();
                    return Ok(());
                }
                TokenKind::EndOfFile => {
                    self.report(Diag::UnclosedCodeBlock {
                        block_open: open_span,
                    });
                    return Ok(());
                }
                TokenKind::Comma => self.lexer.skip(),
                TokenKind::DotDotDot => {
                    self.lexer.skip();
                    self.parse_binding_pattern(buffer, kind)?;
                }
                TokenKind::String | TokenKind::Number | TokenKind::BigInt => {
                    let key_span = self.peek().span();
                    self.lexer.skip();
                    if self.peek().kind == TokenKind::Colon {
                        self.lexer.skip();
                        self.parse_binding_element_with_default(buffer, kind)?;
                    } else {
                        self.report(Diag::InvalidLoneLiteralInObjectLiteral { literal: key_span });
                        self.report(Diag::InvalidBindingInLetStatement { binding: key_span });
                    }
                }
                TokenKind::OpenBracket => {
                    let bracket_span = self.peek().span();
                    self.lexer.skip();
                    self.parse_and_visit_expression(buffer, Precedence::default())?;
                    if self.peek().kind == TokenKind::CloseBracket {
                        self.lexer.skip();
                    } else {
                        self.report(Diag::UnmatchedParenthesis {
                            paren: bracket_span,
                        });
                    }
                    if self.peek().kind == TokenKind::Colon {
                        self.lexer.skip();
                        self.parse_binding_element_with_default(buffer, kind)?;
                    }
                }
                k if k.is_identifier_like() => {
                    let token = self.peek().clone();
                    self.lexer.skip();
                    if self.peek().kind == TokenKind::Colon {
                        self.lexer.skip();
                        self.parse_binding_element_with_default(buffer, kind)?;
                    } else {
                        // Shorthand, with an optional default.
                        let name = self.identifier_from_token(&token);
                        self.check_binding_name(&name, kind);
                        let mut local = BufferingVisitor::new();
                        local.visit_variable_declaration(&name, kind);
                        if self.peek().kind == TokenKind::Equals {
                            self.lexer.skip();
                            self.parse_and_visit_expression(
                                buffer,
                                Precedence::default().without_commas(),
                            )?;
                        }
                        local.move_into(buffer);
                    }
                }
                k if k.is_keyword() => {
                    let key_span = self.peek().span();
                    self.lexer.skip();
                    if self.peek().kind == TokenKind::Colon {
                        // A keyword is a fine property key.
                        self.lexer.skip();
                        self.parse_binding_element_with_default(buffer, kind)?;
                    } else {
                        self.report(Diag::MissingValueForObjectLiteralEntry { key: key_span });
                        self.report(Diag::InvalidBindingInLetStatement { binding: key_span });
                    }
                }
                _ => {
                    self.report(Diag::UnexpectedToken {
                        token: self.peek().span(),
                    });
                    self.lexer.skip();
                }
            }
        }
    }

    fn parse_array_binding_members(
        &mut self,
        buffer: &mut dyn ParseVisitor,
        kind: VariableKind,
        open_span: SourceSpan,
    ) -> ParseResult<()> {
        loop {
            match self.peek().kind {
                TokenKind::CloseBracket => {
                    self.lexer.skip();
                    return Ok(());
                }
                TokenKind::EndOfFile => {
                    self.report(Diag::UnmatchedParenthesis { paren: open_span });
                    return Ok(());
                }
                TokenKind::Comma => self.lexer.skip(), // hole
                TokenKind::DotDotDot => {
                    self.lexer.skip();
                    self.parse_binding_pattern(buffer, kind)?;
                }
                _ => {
                    let before = self.peek().begin;
                    self.parse_binding_element_with_default(buffer, kind)?;
                    if self.peek().begin == before {
                        self.lexer.skip();
                    }
                }
            }
        }
    }

    // ======================================================================
    // Functions
    // ======================================================================

    fn parse_and_visit_function_declaration(
        &mut self,
        v: &mut dyn ParseVisitor,
        exported: bool,
    ) -> ParseResult<()> {
        let mut attributes = FunctionAttributes::NORMAL;
        if self.peek().kind == TokenKind::AsyncKeyword {
            self.lexer.skip();
            attributes.is_async = true;
        }
        let function_keyword = self.peek().span();
        self.expect_or_report(TokenKind::FunctionKeyword);
        if self.peek().kind == TokenKind::Star {
            self.lexer.skip();
            attributes.is_generator = true;
        }
        if self.peek().kind.is_identifier_like() {
            let token = self.peek().clone();
            self.lexer.skip();
            let name = self.identifier_from_token(&token);
            // The name lives in the enclosing scope, so it is checked
            // against the enclosing function's attributes.
            self.check_binding_name(&name, VariableKind::Function);
            v.visit_variable_declaration(&name, VariableKind::Function);
        } else if exported {
            self.report(Diag::MissingNameOfExportedFunction { function_keyword });
        }
        self.parse_and_visit_function_parameters_and_body(v, attributes)
    }

    fn parse_and_visit_function_parameters_and_body(
        &mut self,
        v: &mut dyn ParseVisitor,
        attributes: FunctionAttributes,
    ) -> ParseResult<()> {
        v.visit_enter_function_scope();
        let result = self.parse_function_scope_contents(v, attributes);
        v.visit_exit_function_scope();
        result
    }

    /// Parameters, optional return type, the body marker, and the body.
    /// The caller emits the function-scope events.
    fn parse_function_scope_contents(
        &mut self,
        v: &mut dyn ParseVisitor,
        attributes: FunctionAttributes,
    ) -> ParseResult<()> {
        let saved = mem::replace(&mut self.attributes, attributes);
        let result = self.parse_function_scope_contents_inner(v);
        self.attributes = saved;
        result
    }

    fn parse_function_scope_contents_inner(
        &mut self,
        v: &mut dyn ParseVisitor,
    ) -> ParseResult<()> {
        self.parse_and_visit_parameters(v)?;
        if self.peek().kind == TokenKind::Colon {
            let type_colon = self.peek().span();
            if !self.options.typescript {
                self.report(Diag::TypeScriptTypeAnnotationsNotAllowedInJavaScript { type_colon });
            }
            self.lexer.skip();
            self.parse_and_visit_type(v)?;
        }
        if self.peek().kind == TokenKind::OpenBrace {
            v.visit_enter_function_scope_body();
            self.parse_statement_block_no_scope(v)?;
        } else {
            self.report(Diag::UnexpectedToken {
                token: self.peek().span(),
            });
            v.visit_enter_function_scope_body();
        }
        Ok(())
    }

    fn parse_and_visit_parameters(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        let open_span = self.peek().span();
        if self.peek().kind != TokenKind::OpenParen {
            self.report(Diag::UnexpectedToken { token: open_span });
            return Ok(());
        }
        self.lexer.skip();
        loop {
            match self.peek().kind {
                TokenKind::CloseParen => {
                    self.lexer.skip();
                    return Ok(());
                }
                TokenKind::EndOfFile => {
                    self.report(Diag::UnmatchedParenthesis { paren: open_span });
                    return Ok(());
                }
                TokenKind::Comma => self.lexer.skip(),
                TokenKind::DotDotDot => {
                    self.lexer.skip();
                    self.parse_and_visit_one_parameter(v)?;
                }
                _ => {
                    let before = self.peek().begin;
                    self.parse_and_visit_one_parameter(v)?;
                    if self.peek().begin == before {
                        self.report(Diag::UnexpectedToken {
                            token: self.peek().span(),
                        });
                        self.lexer.skip();
                    }
                }
            }
        }
    }

    /// One parameter: pattern, optional TypeScript bits, optional default.
    /// Event order: default uses, then type uses, then the declarations.
    fn parse_and_visit_one_parameter(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        let mut pattern = BufferingVisitor::new();
        self.parse_binding_pattern(&mut pattern, VariableKind::Parameter)?;
        if self.peek().kind == TokenKind::Exclamation && !self.peek().has_leading_newline() {
            if self.options.typescript {
                self.report(Diag::NonNullAssertionNotAllowedInParameter {
                    bang: self.peek().span(),
                });
            } else {
                self.report(Diag::UnexpectedToken {
                    token: self.peek().span(),
                });
            }
            self.lexer.skip();
        }
        if self.peek().kind == TokenKind::Question {
            self.lexer.skip();
        }
        let mut type_buffer = BufferingVisitor::new();
        if self.peek().kind == TokenKind::Colon {
            let type_colon = self.peek().span();
            if !self.options.typescript {
                self.report(Diag::TypeScriptTypeAnnotationsNotAllowedInJavaScript { type_colon });
            }
            self.lexer.skip();
            self.parse_and_visit_type(&mut type_buffer)?;
        }
        if self.peek().kind == TokenKind::Equals {
            self.lexer.skip();
            self.parse_and_visit_expression(v, Precedence::default().without_commas())?;
        }
        type_buffer.move_into(v);
        pattern.move_into(v);
        Ok(())
    }

    // ======================================================================
    // Classes
    // ======================================================================

    fn parse_and_visit_class_declaration(
        &mut self,
        v: &mut dyn ParseVisitor,
        exported: bool,
        _require_name: bool,
    ) -> ParseResult<()> {
        let class_keyword = self.peek().span();
        self.lexer.skip();
        let name = if self.peek().kind.is_identifier_like() {
            let token = self.peek().clone();
            self.lexer.skip();
            let name = self.identifier_from_token(&token);
            self.check_binding_name(&name, VariableKind::Class);
            Some(name)
        } else {
            if exported {
                self.report(Diag::MissingNameOfExportedClass { class_keyword });
            }
            None
        };
        v.visit_enter_class_scope();
        if self.peek().kind == TokenKind::ExtendsKeyword {
            self.lexer.skip();
            self.parse_and_visit_expression(v, Precedence::default().without_commas())?;
        }
        v.visit_enter_class_scope_body();
        self.parse_class_body(v)?;
        v.visit_exit_class_scope();
        if let Some(name) = name {
            v.visit_variable_declaration(&name, VariableKind::Class);
        }
        Ok(())
    }

    /// A class expression defers its events; the name (if any) is declared
    /// inside the class scope.
    fn parse_class_expression(&mut self) -> ParseResult<ExpressionRef<'a>> {
        let begin = self.peek().begin;
        self.lexer.skip(); // 'class'
        let mut buffer = BufferingVisitor::new();
        buffer.visit_enter_class_scope();
        if self.peek().kind.is_identifier_like() {
            let token = self.peek().clone();
            self.lexer.skip();
            let name = self.identifier_from_token(&token);
            self.check_binding_name(&name, VariableKind::Class);
            buffer.visit_variable_declaration(&name, VariableKind::Class);
        }
        if self.peek().kind == TokenKind::ExtendsKeyword {
            self.lexer.skip();
            let heritage = self.parse_expression_prec(Precedence::default().without_commas())?;
            self.visit_expression(heritage, &mut buffer, VariableContext::Rhs);
        }
        buffer.visit_enter_class_scope_body();
        self.parse_class_body(&mut buffer)?;
        buffer.visit_exit_class_scope();
        let visits = self.store_visits(buffer);
        Ok(self.make(Expression::Class {
            visits,
            span: self.span_from(begin),
        }))
    }

    fn parse_class_body(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        let open_span = self.peek().span();
        if self.peek().kind != TokenKind::OpenBrace {
            self.report(Diag::UnexpectedToken { token: open_span });
            return Ok(());
        }
        self.lexer.skip();
        loop {
            match self.peek().kind {
                TokenKind::CloseBrace => {
                    self.lexer.skip();
                    return Ok(());
                }
                TokenKind::EndOfFile => {
                    self.report(Diag::UnclosedCodeBlock {
                        block_open: open_span,
                    });
                    return Ok(());
                }
                TokenKind::Semicolon => self.lexer.skip(),
                _ => {
                    let before = self.peek().begin;
                    self.parse_and_visit_class_member(v)?;
                    if self.peek().begin == before {
                        self.report(Diag::UnexpectedToken {
                            token: self.peek().span(),
                        });
                        self.lexer.skip();
                    }
                }
            }
        }
    }

    fn parse_and_visit_class_member(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        use TokenKind::*;
        let mut attributes = FunctionAttributes::NORMAL;
        // Modifiers. A modifier word immediately followed by `(`, `=`, `:`,
        // `;`, or `}` is a member name, not a modifier.
        loop {
            let kind = self.peek().kind;
            let is_modifier_position = !matches!(
                self.next_token_kind(),
                OpenParen | Equals | Colon | Semicolon | CloseBrace | Question | EndOfFile
            );
            match kind {
                StaticKeyword | GetKeyword | SetKeyword if is_modifier_position => {
                    self.lexer.skip();
                }
                AsyncKeyword if is_modifier_position => {
                    attributes.is_async = true;
                    self.lexer.skip();
                }
                Star => {
                    attributes.is_generator = true;
                    self.lexer.skip();
                }
                PrivateKeyword | ProtectedKeyword | PublicKeyword
                    if self.options.typescript && is_modifier_position =>
                {
                    self.lexer.skip();
                }
                Identifier
                    if self.options.typescript
                        && self.peek().value == "readonly"
                        && is_modifier_position =>
                {
                    self.lexer.skip();
                }
                _ => break,
            }
        }

        // Member name.
        match self.peek().kind {
            k if k.is_identifier_like() || k.is_keyword() => {
                let token = self.peek().clone();
                self.lexer.skip();
                let name = self.identifier_from_token(&token);
                v.visit_property_declaration(Some(&name));
            }
            String | Number | BigInt => {
                self.lexer.skip();
                v.visit_property_declaration(None);
            }
            OpenBracket => {
                let bracket_span = self.peek().span();
                self.lexer.skip();
                self.parse_and_visit_expression(v, Precedence::default())?;
                if self.peek().kind == CloseBracket {
                    self.lexer.skip();
                } else {
                    self.report(Diag::UnmatchedParenthesis {
                        paren: bracket_span,
                    });
                }
                v.visit_property_declaration(None);
            }
            _ => {
                self.report(Diag::UnexpectedToken {
                    token: self.peek().span(),
                });
                self.lexer.skip();
                return Ok(());
            }
        }

        // Member shape.
        if self.peek().kind == Question || self.peek().kind == Exclamation {
            self.lexer.skip();
        }
        match self.peek().kind {
            OpenParen => self.parse_and_visit_function_parameters_and_body(v, attributes),
            Colon => {
                let type_colon = self.peek().span();
                if !self.options.typescript {
                    self.report(Diag::TypeScriptTypeAnnotationsNotAllowedInJavaScript {
                        type_colon,
                    });
                }
                self.lexer.skip();
                self.parse_and_visit_type(v)?;
                if self.peek().kind == Equals {
                    self.lexer.skip();
                    self.parse_and_visit_expression(v, Precedence::default().without_commas())?;
                }
                self.consume_semicolon();
                Ok(())
            }
            Equals => {
                self.lexer.skip();
                self.parse_and_visit_expression(v, Precedence::default().without_commas())?;
                self.consume_semicolon();
                Ok(())
            }
            _ => {
                // Bare field; ASI applies.
                if self.peek().kind == Semicolon {
                    self.lexer.skip();
                }
                Ok(())
            }
        }
    }

    // ======================================================================
    // TypeScript declarations
    // ======================================================================

    fn parse_and_visit_interface(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        let interface_keyword = self.peek().span();
        if !self.options.typescript {
            self.report(Diag::TypeScriptInterfacesNotAllowedInJavaScript { interface_keyword });
        }
        self.lexer.skip();
        if self.peek().kind.is_identifier_like() {
            let token = self.peek().clone();
            self.lexer.skip();
            let name = self.identifier_from_token(&token);
            v.visit_variable_declaration(&name, VariableKind::Class);
        }
        v.visit_enter_interface_scope();
        if self.peek().kind == TokenKind::ExtendsKeyword {
            self.lexer.skip();
            loop {
                self.parse_and_visit_type(v)?;
                if self.peek().kind == TokenKind::Comma {
                    self.lexer.skip();
                    continue;
                }
                break;
            }
        }
        let open_span = self.peek().span();
        if self.peek().kind == TokenKind::OpenBrace {
            self.lexer.skip();
            loop {
                match self.peek().kind {
                    TokenKind::CloseBrace => {
                        self.lexer.skip();
                        break;
                    }
                    TokenKind::EndOfFile => {
                        self.report(Diag::UnclosedCodeBlock {
                            block_open: open_span,
                        });
                        break;
                    }
                    TokenKind::Semicolon | TokenKind::Comma => self.lexer.skip(),
                    _ => {
                        let before = self.peek().begin;
                        self.parse_and_visit_interface_member(v)?;
                        if self.peek().begin == before {
                            self.report(Diag::UnexpectedToken {
                                token: self.peek().span(),
                            });
                            self.lexer.skip();
                        }
                    }
                }
            }
        } else {
            self.report(Diag::UnexpectedToken { token: open_span });
        }
        v.visit_exit_interface_scope();
        Ok(())
    }

    fn parse_and_visit_interface_member(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        use TokenKind::*;
        match self.peek().kind {
            k if k.is_identifier_like() || k.is_keyword() => {
                let token = self.peek().clone();
                self.lexer.skip();
                let name = self.identifier_from_token(&token);
                v.visit_property_declaration(Some(&name));
            }
            String | Number => {
                self.lexer.skip();
                v.visit_property_declaration(None);
            }
            OpenBracket => {
                // Index signature: `[key: Type]: Type`.
                self.lexer.skip();
                if self.peek().kind.is_identifier_like() {
                    self.lexer.skip();
                }
                if self.peek().kind == Colon {
                    self.lexer.skip();
                    self.parse_and_visit_type(v)?;
                }
                self.expect_or_report(CloseBracket);
                v.visit_property_declaration(None);
            }
            _ => {
                self.report(Diag::UnexpectedToken {
                    token: self.peek().span(),
                });
                self.lexer.skip();
                return Ok(());
            }
        }
        if self.peek().kind == Question {
            self.lexer.skip();
        }
        match self.peek().kind {
            OpenParen | LessThan => {
                // Method signature: a function scope with no body marker.
                v.visit_enter_function_scope();
                let saved = mem::replace(&mut self.attributes, FunctionAttributes::NORMAL);
                if self.peek().kind == LessThan {
                    self.parse_and_visit_type_parameters(v)?;
                }
                let result = self.parse_and_visit_parameters(v);
                if self.peek().kind == Colon {
                    self.lexer.skip();
                    self.parse_and_visit_type(v)?;
                }
                self.attributes = saved;
                v.visit_exit_function_scope();
                result
            }
            Colon => {
                self.lexer.skip();
                self.parse_and_visit_type(v)
            }
            _ => Ok(()),
        }
    }

    fn parse_and_visit_enum(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        let enum_keyword = self.peek().span();
        if !self.options.typescript {
            self.report(Diag::TypeScriptEnumsNotAllowedInJavaScript { enum_keyword });
        }
        self.lexer.skip();
        if self.peek().kind.is_identifier_like() {
            let token = self.peek().clone();
            self.lexer.skip();
            let name = self.identifier_from_token(&token);
            v.visit_variable_declaration(&name, VariableKind::Const);
        }
        let open_span = self.peek().span();
        if self.peek().kind != TokenKind::OpenBrace {
            self.report(Diag::UnexpectedToken { token: open_span });
            return Ok(());
        }
        self.lexer.skip();
        loop {
            match self.peek().kind {
                TokenKind::CloseBrace => {
                    self.lexer.skip();
                    return Ok(());
                }
                TokenKind::EndOfFile => {
                    self.report(Diag::UnclosedCodeBlock {
                        block_open: open_span,
                    });
                    return Ok(());
                }
                TokenKind::Comma => self.lexer.skip(),
                k if k.is_identifier_like() || k.is_keyword() || k == TokenKind::String => {
                    self.lexer.skip();
                    if self.peek().kind == TokenKind::Equals {
                        self.lexer.skip();
                        self.parse_and_visit_expression(
                            v,
                            Precedence::default().without_commas(),
                        )?;
                    }
                }
                _ => {
                    self.report(Diag::UnexpectedToken {
                        token: self.peek().span(),
                    });
                    self.lexer.skip();
                }
            }
        }
    }

    // ======================================================================
    // Types
    // ======================================================================

    /// Parse a type, emitting `visit_variable_type_use` for referenced type
    /// names.
    fn parse_and_visit_type(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        self.enter_nesting()?;
        if matches!(self.peek().kind, TokenKind::Bar | TokenKind::Ampersand) {
            self.lexer.skip();
        }
        self.parse_and_visit_type_primary(v)?;
        loop {
            match self.peek().kind {
                TokenKind::OpenBracket => {
                    self.lexer.skip();
                    if self.peek().kind == TokenKind::CloseBracket {
                        self.lexer.skip();
                    } else {
                        // Indexed access: `T[K]`.
                        self.parse_and_visit_type(v)?;
                        self.expect_or_report(TokenKind::CloseBracket);
                    }
                }
                TokenKind::Bar | TokenKind::Ampersand => {
                    self.lexer.skip();
                    self.parse_and_visit_type_primary(v)?;
                }
                _ => break,
            }
        }
        self.exit_nesting();
        Ok(())
    }

    fn parse_and_visit_type_primary(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        use TokenKind::*;
        match self.peek().kind {
            k if k.is_identifier_like() => {
                let token = self.peek().clone();
                self.lexer.skip();
                if !PRIMITIVE_TYPE_NAMES.contains(&token.value.as_str()) {
                    let name = self.identifier_from_token(&token);
                    v.visit_variable_type_use(&name);
                }
                // Qualified names: only the root is a use.
                while self.peek().kind == Dot {
                    self.lexer.skip();
                    if self.peek().kind.is_identifier_like() || self.peek().kind.is_keyword() {
                        self.lexer.skip();
                    } else {
                        break;
                    }
                }
                if self.peek().kind == LessThan {
                    self.parse_and_visit_type_arguments(v)?;
                }
                Ok(())
            }
            VoidKeyword | NullKeyword | TrueKeyword | FalseKeyword | ThisKeyword => {
                self.lexer.skip();
                Ok(())
            }
            String | Number | BigInt => {
                self.lexer.skip();
                Ok(())
            }
            Minus => {
                self.lexer.skip();
                if matches!(self.peek().kind, Number | BigInt) {
                    self.lexer.skip();
                }
                Ok(())
            }
            TypeofKeyword => {
                self.lexer.skip();
                if self.peek().kind.is_identifier_like() {
                    let token = self.peek().clone();
                    self.lexer.skip();
                    let name = self.identifier_from_token(&token);
                    // `typeof x` queries a runtime value.
                    v.visit_variable_use(&name);
                    while self.peek().kind == Dot {
                        self.lexer.skip();
                        if self.peek().kind.is_identifier_like() || self.peek().kind.is_keyword() {
                            self.lexer.skip();
                        } else {
                            break;
                        }
                    }
                }
                Ok(())
            }
            NewKeyword => {
                self.lexer.skip();
                self.parse_and_visit_type_primary(v)
            }
            OpenParen => self.parse_and_visit_function_type(v),
            OpenBracket => {
                // Tuple type.
                let open_span = self.peek().span();
                self.lexer.skip();
                loop {
                    match self.peek().kind {
                        CloseBracket => {
                            self.lexer.skip();
                            return Ok(());
                        }
                        EndOfFile => {
                            self.report(Diag::UnmatchedParenthesis { paren: open_span });
                            return Ok(());
                        }
                        Comma | DotDotDot => self.lexer.skip(),
                        _ => {
                            let before = self.peek().begin;
                            self.parse_and_visit_type(v)?;
                            if self.peek().begin == before {
                                self.lexer.skip();
                            }
                        }
                    }
                }
            }
            OpenBrace => self.parse_and_visit_object_type(v),
            _ => {
                self.report(Diag::UnexpectedToken {
                    token: self.peek().span(),
                });
                Ok(())
            }
        }
    }

    /// `(params) => Return` or a parenthesized type.
    fn parse_and_visit_function_type(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        use TokenKind::*;
        let open_span = self.peek().span();
        self.lexer.skip();
        loop {
            let kind = self.peek().kind;
            match kind {
                CloseParen => {
                    self.lexer.skip();
                    break;
                }
                EndOfFile => {
                    self.report(Diag::UnmatchedParenthesis { paren: open_span });
                    break;
                }
                Comma | DotDotDot => self.lexer.skip(),
                k if k.is_identifier_like()
                    && matches!(self.next_token_kind(), Colon | Question) =>
                {
                    // Parameter name, not a type.
                    self.lexer.skip();
                    if self.peek().kind == Question {
                        self.lexer.skip();
                    }
                    if self.peek().kind == Colon {
                        self.lexer.skip();
                        self.parse_and_visit_type(v)?;
                    }
                }
                _ => {
                    let before = self.peek().begin;
                    self.parse_and_visit_type(v)?;
                    if self.peek().begin == before {
                        self.lexer.skip();
                    }
                }
            }
        }
        if self.peek().kind == Arrow {
            self.lexer.skip();
            self.parse_and_visit_type(v)?;
        }
        Ok(())
    }

    fn parse_and_visit_object_type(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        use TokenKind::*;
        let open_span = self.peek().span();
        self.lexer.skip();
        loop {
            match self.peek().kind {
                CloseBrace => {
                    self.lexer.skip();
                    return Ok(());
                }
                EndOfFile => {
                    self.report(Diag::UnclosedCodeBlock {
                        block_open: open_span,
                    });
                    return Ok(());
                }
                Semicolon | Comma | Question => self.lexer.skip(),
                Colon => {
                    self.lexer.skip();
                    self.parse_and_visit_type(v)?;
                }
                OpenParen => self.parse_and_visit_function_type(v)?,
                OpenBracket => {
                    self.lexer.skip();
                    if self.peek().kind.is_identifier_like() {
                        self.lexer.skip();
                    }
                    if self.peek().kind == Colon {
                        self.lexer.skip();
                        self.parse_and_visit_type(v)?;
                    }
                    self.expect_or_report(CloseBracket);
                }
                _ => self.lexer.skip(),
            }
        }
    }

    /// `<T, U>` in a type reference.
    fn parse_and_visit_type_arguments(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        self.lexer.skip(); // '<'
        loop {
            let before = self.peek().begin;
            self.parse_and_visit_type(v)?;
            if self.peek().kind == TokenKind::Comma {
                self.lexer.skip();
                continue;
            }
            if self.peek().begin == before && self.peek().kind != TokenKind::GreaterThan {
                break;
            }
            break;
        }
        self.expect_greater_than();
        Ok(())
    }

    /// `<T, U extends V>` in a declaration; declares each parameter name.
    fn parse_and_visit_type_parameters(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        self.lexer.skip(); // '<'
        loop {
            match self.peek().kind {
                k if k.is_identifier_like() => {
                    let token = self.peek().clone();
                    self.lexer.skip();
                    let name = self.identifier_from_token(&token);
                    v.visit_variable_declaration(&name, VariableKind::Parameter);
                    if self.peek().kind == TokenKind::ExtendsKeyword {
                        self.lexer.skip();
                        self.parse_and_visit_type(v)?;
                    }
                    if self.peek().kind == TokenKind::Equals {
                        self.lexer.skip();
                        self.parse_and_visit_type(v)?;
                    }
                }
                TokenKind::Comma => self.lexer.skip(),
                _ => break,
            }
        }
        self.expect_greater_than();
        Ok(())
    }

    /// Consume one `>`, splitting compound tokens (`>>`, `>>=`, …) that the
    /// lexer merged. Nested generic closers like `Map<K, Set<V>>` need this.
    fn expect_greater_than(&mut self) {
        use TokenKind::*;
        match self.peek().kind {
            GreaterThan => self.lexer.skip(),
            GreaterThanGreaterThan
            | GreaterThanGreaterThanGreaterThan
            | GreaterThanEquals
            | GreaterThanGreaterThanEquals
            | GreaterThanGreaterThanGreaterThanEquals => {
                self.lexer.split_greater_than();
            }
            _ => {
                self.report(Diag::UnexpectedToken {
                    token: self.peek().span(),
                });
            }
        }
    }

    // ======================================================================
    // Modules
    // ======================================================================

    fn parse_and_visit_import(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        use TokenKind::*;
        let import_span = self.peek().span();
        self.lexer.skip();
        match self.peek().kind {
            String => {
                // Side-effect import: `import 'module';`
                self.lexer.skip();
                self.consume_semicolon();
                return Ok(());
            }
            OpenParen => {
                // Dynamic import is an expression.
                let callee = self.make(Expression::Literal { span: import_span });
                let mut children = vec![callee];
                children.extend(self.parse_call_arguments()?);
                let call = self.make(Expression::Call {
                    children: self.make_children(children),
                    span: self.span_from(import_span.begin),
                });
                let full = self.parse_expression_remainder(call, Precedence::default())?;
                self.visit_expression(full, v, VariableContext::Rhs);
                self.consume_semicolon();
                return Ok(());
            }
            Dot => {
                // `import.meta`.
                self.lexer.skip();
                if self.peek().kind.is_identifier_like() {
                    self.lexer.skip();
                }
                let meta = self.make(Expression::Literal {
                    span: self.span_from(import_span.begin),
                });
                let full = self.parse_expression_remainder(meta, Precedence::default())?;
                self.visit_expression(full, v, VariableContext::Rhs);
                self.consume_semicolon();
                return Ok(());
            }
            k if k.is_identifier_like() => {
                let token = self.peek().clone();
                self.lexer.skip();
                let name = self.identifier_from_token(&token);
                self.check_binding_name(&name, VariableKind::Import);
                v.visit_variable_declaration(&name, VariableKind::Import);
                if self.peek().kind == Comma {
                    self.lexer.skip();
                    match self.peek().kind {
                        Star => self.parse_and_visit_namespace_import(v)?,
                        OpenBrace => self.parse_and_visit_named_imports(v)?,
                        _ => self.report(Diag::UnexpectedToken {
                            token: self.peek().span(),
                        }),
                    }
                }
            }
            Star => self.parse_and_visit_namespace_import(v)?,
            OpenBrace => self.parse_and_visit_named_imports(v)?,
            k if k.is_disallowed_binding_keyword() => {
                let token = self.peek().clone();
                self.report(Diag::CannotImportVariableNamedKeyword {
                    import_name: token.span(),
                    name: token.value.clone(),
                });
                self.lexer.skip();
                let name = self.identifier_from_token(&token);
                v.visit_variable_declaration(&name, VariableKind::Import);
            }
            _ => {
                self.report(Diag::UnexpectedToken {
                    token: self.peek().span(),
                });
            }
        }
        self.parse_module_specifier_clause();
        self.consume_semicolon();
        Ok(())
    }

    /// `from 'module'` after import/export bindings, with recovery for a
    /// missing `from` or an unquoted specifier.
    fn parse_module_specifier_clause(&mut self) {
        use TokenKind::*;
        match self.peek().kind {
            FromKeyword => {
                self.lexer.skip();
                match self.peek().kind {
                    String => self.lexer.skip(),
                    k if k.is_identifier_like() => {
                        self.report(Diag::CannotImportFromUnquotedModule {
                            import_name: self.peek().span(),
                        });
                        self.lexer.skip();
                    }
                    _ => {
                        self.report(Diag::UnexpectedToken {
                            token: self.peek().span(),
                        });
                    }
                }
            }
            String => {
                self.report(Diag::ExpectedFromBeforeModuleSpecifier {
                    module_specifier: self.peek().span(),
                });
                self.lexer.skip();
            }
            _ => {
                self.report(Diag::ExpectedFromAndModuleSpecifier {
                    insertion_point: SourceSpan::empty(self.lexer.end_of_previous_token()),
                });
            }
        }
    }

    fn parse_and_visit_namespace_import(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        let star_span = self.peek().span();
        self.lexer.skip();
        match self.peek().kind {
            TokenKind::AsKeyword => self.lexer.skip(),
            k if k.is_identifier_like() => {
                let alias = self.peek().span();
                self.report(Diag::ExpectedAsBeforeImportedNamespaceAlias {
                    star_through_alias: star_span.union(&alias),
                    star_token: star_span,
                    alias,
                });
            }
            _ => {
                self.report(Diag::UnexpectedToken {
                    token: self.peek().span(),
                });
                return Ok(());
            }
        }
        if self.peek().kind.is_identifier_like() {
            let token = self.peek().clone();
            self.lexer.skip();
            let name = self.identifier_from_token(&token);
            self.check_binding_name(&name, VariableKind::Import);
            v.visit_variable_declaration(&name, VariableKind::Import);
        } else {
            self.report(Diag::ExpectedVariableNameForImportAs {
                unexpected_token: self.peek().span(),
            });
        }
        Ok(())
    }

    fn parse_and_visit_named_imports(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        use TokenKind::*;
        let open_span = self.peek().span();
        self.lexer.skip();
        loop {
            match self.peek().kind {
                CloseBrace => {
                    self.lexer.skip();
                    return Ok(());
                }
                EndOfFile => {
                    self.report(Diag::UnclosedCodeBlock {
                        block_open: open_span,
                    });
                    return Ok(());
                }
                Comma => self.lexer.skip(),
                String => {
                    self.lexer.skip();
                    if self.peek().kind == AsKeyword {
                        self.lexer.skip();
                        self.parse_and_visit_import_alias(v);
                    } else {
                        self.report(Diag::ExpectedVariableNameForImportAs {
                            unexpected_token: SourceSpan::empty(
                                self.lexer.end_of_previous_token(),
                            ),
                        });
                    }
                }
                k if k.is_identifier_like() || k.is_keyword() => {
                    let token = self.peek().clone();
                    self.lexer.skip();
                    if self.peek().kind == AsKeyword {
                        self.lexer.skip();
                        self.parse_and_visit_import_alias(v);
                    } else if token.kind.is_disallowed_binding_keyword() {
                        self.report(Diag::CannotImportVariableNamedKeyword {
                            import_name: token.span(),
                            name: token.value.clone(),
                        });
                        let name = self.identifier_from_token(&token);
                        v.visit_variable_declaration(&name, VariableKind::Import);
                    } else {
                        let name = self.identifier_from_token(&token);
                        self.check_binding_name(&name, VariableKind::Import);
                        v.visit_variable_declaration(&name, VariableKind::Import);
                    }
                }
                _ => {
                    self.report(Diag::UnexpectedToken {
                        token: self.peek().span(),
                    });
                    self.lexer.skip();
                }
            }
        }
    }

    /// The local name after `as` in a named import.
    fn parse_and_visit_import_alias(&mut self, v: &mut dyn ParseVisitor) {
        match self.peek().kind {
            TokenKind::String => {
                self.report(Diag::ExpectedVariableNameForImportAs {
                    unexpected_token: self.peek().span(),
                });
                self.lexer.skip();
            }
            k if k.is_identifier_like() => {
                let token = self.peek().clone();
                self.lexer.skip();
                let name = self.identifier_from_token(&token);
                self.check_binding_name(&name, VariableKind::Import);
                v.visit_variable_declaration(&name, VariableKind::Import);
            }
            k if k.is_keyword() => {
                let token = self.peek().clone();
                self.report(Diag::CannotImportVariableNamedKeyword {
                    import_name: token.span(),
                    name: token.value.clone(),
                });
                self.lexer.skip();
                let name = self.identifier_from_token(&token);
                v.visit_variable_declaration(&name, VariableKind::Import);
            }
            _ => {
                self.report(Diag::ExpectedVariableNameForImportAs {
                    unexpected_token: self.peek().span(),
                });
            }
        }
    }

    fn parse_and_visit_export(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        use TokenKind::*;
        let export_span = self.peek().span();
        self.lexer.skip();
        let after_export = self.peek().kind;
        match after_export {
            DefaultKeyword => {
                self.lexer.skip();
                let after_default = self.peek().kind;
                match after_default {
                    ClassKeyword => self.parse_and_visit_class_declaration(v, false, false),
                    FunctionKeyword => self.parse_and_visit_function_declaration(v, false),
                    AsyncKeyword if self.next_token_kind() == FunctionKeyword => {
                        self.parse_and_visit_function_declaration(v, false)
                    }
                    VarKeyword | LetKeyword | ConstKeyword => {
                        self.report(Diag::CannotExportDefaultVariable {
                            declaring_token: self.peek().span(),
                        });
                        let kind = match self.peek().kind {
                            VarKeyword => VariableKind::Var,
                            LetKeyword => VariableKind::Let,
                            _ => VariableKind::Const,
                        };
                        self.parse_and_visit_variable_statement(v, kind)
                    }
                    _ => {
                        self.parse_and_visit_expression(
                            v,
                            Precedence::default().without_commas(),
                        )?;
                        self.consume_semicolon();
                        Ok(())
                    }
                }
            }
            Star => {
                self.lexer.skip();
                if self.peek().kind == AsKeyword {
                    self.lexer.skip();
                    // Any keyword or string is legal as an exported alias.
                    if self.peek().kind.is_identifier_like()
                        || self.peek().kind.is_keyword()
                        || self.peek().kind == String
                    {
                        self.lexer.skip();
                    }
                }
                self.parse_module_specifier_clause();
                self.consume_semicolon();
                Ok(())
            }
            OpenBrace => {
                let entries = self.parse_export_list();
                if self.peek().kind == FromKeyword || self.peek().kind == String {
                    // Re-export: the names refer to the other module, so no
                    // events are emitted.
                    self.parse_module_specifier_clause();
                } else {
                    for token in &entries {
                        if token.kind == String {
                            self.report(Diag::ExportingStringNameOnlyAllowedForExportFrom {
                                export_name: token.span(),
                            });
                        } else if token.kind.is_disallowed_binding_keyword()
                            || token.kind.is_strict_only_reserved_word()
                        {
                            self.report(Diag::CannotExportVariableNamedKeyword {
                                export_name: token.span(),
                                name: token.value.clone(),
                            });
                        } else if token.flags.contains(TokenFlags::CONTAINS_ESCAPE)
                            && lintel_lexer::keywords::from_keyword(&token.value).is_some()
                        {
                            // The lexer already complained about the escape.
                        } else {
                            let name = self.identifier_from_token(token);
                            v.visit_variable_export_use(&name);
                        }
                    }
                }
                self.consume_semicolon();
                Ok(())
            }
            VarKeyword => self.parse_and_visit_variable_statement(v, VariableKind::Var),
            LetKeyword => self.parse_and_visit_variable_statement(v, VariableKind::Let),
            ConstKeyword => self.parse_and_visit_variable_statement(v, VariableKind::Const),
            FunctionKeyword => self.parse_and_visit_function_declaration(v, true),
            AsyncKeyword if self.next_token_kind() == FunctionKeyword => {
                self.parse_and_visit_function_declaration(v, true)
            }
            ClassKeyword => self.parse_and_visit_class_declaration(v, true, true),
            InterfaceKeyword if self.options.typescript => self.parse_and_visit_interface(v),
            EnumKeyword if self.options.typescript => self.parse_and_visit_enum(v),
            Semicolon => {
                self.report(Diag::MissingTokenAfterExport {
                    export_token: export_span,
                });
                self.lexer.skip();
                Ok(())
            }
            EndOfFile => {
                self.report(Diag::MissingTokenAfterExport {
                    export_token: export_span,
                });
                Ok(())
            }
            k if k != Equals && (k.is_identifier_like() || starts_expression(k)) => {
                let expression = self.parse_expression_prec(Precedence::default())?;
                match expression {
                    Expression::Variable { .. } => {
                        self.report(Diag::ExportingRequiresCurlies {
                            names: expression.span(),
                        });
                    }
                    _ => {
                        self.report(Diag::ExportingRequiresDefault {
                            expression: expression.span(),
                        });
                    }
                }
                self.visit_expression(expression, v, VariableContext::Rhs);
                self.consume_semicolon();
                Ok(())
            }
            _ => {
                self.report(Diag::UnexpectedTokenAfterExport {
                    unexpected_token: self.peek().span(),
                });
                Ok(())
            }
        }
    }

    /// Collect the name tokens of `export {a, b as c, 'd'}` without
    /// emitting events; the caller decides what they mean.
    fn parse_export_list(&mut self) -> Vec<Token> {
        use TokenKind::*;
        let open_span = self.peek().span();
        self.lexer.skip();
        let mut entries = Vec::new();
        loop {
            match self.peek().kind {
                CloseBrace => {
                    self.lexer.skip();
                    return entries;
                }
                EndOfFile => {
                    self.report(Diag::UnclosedCodeBlock {
                        block_open: open_span,
                    });
                    return entries;
                }
                Comma => self.lexer.skip(),
                k if k.is_identifier_like() || k.is_keyword() || k == String => {
                    let token = self.peek().clone();
                    self.lexer.skip();
                    if self.peek().kind == AsKeyword {
                        self.lexer.skip();
                        // Aliases may be any keyword or string.
                        if self.peek().kind.is_identifier_like()
                            || self.peek().kind.is_keyword()
                            || self.peek().kind == String
                        {
                            self.lexer.skip();
                        }
                    }
                    entries.push(token);
                }
                _ => {
                    self.report(Diag::UnexpectedToken {
                        token: self.peek().span(),
                    });
                    self.lexer.skip();
                }
            }
        }
    }

    // ======================================================================
    // Control flow
    // ======================================================================

    fn parse_and_visit_if(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        self.lexer.skip();
        self.parse_parenthesized_condition(v)?;
        self.parse_and_visit_statement(v)?;
        if self.peek().kind == TokenKind::ElseKeyword {
            self.lexer.skip();
            self.parse_and_visit_statement(v)?;
        }
        Ok(())
    }

    fn parse_and_visit_while(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        self.lexer.skip();
        self.parse_parenthesized_condition(v)?;
        self.parse_and_visit_statement(v)
    }

    fn parse_and_visit_do_while(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        self.lexer.skip();
        self.parse_and_visit_statement(v)?;
        self.expect_or_report(TokenKind::WhileKeyword);
        self.parse_parenthesized_condition(v)?;
        if self.peek().kind == TokenKind::Semicolon {
            self.lexer.skip();
        }
        Ok(())
    }

    fn parse_parenthesized_condition(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        let open_span = self.peek().span();
        if self.peek().kind != TokenKind::OpenParen {
            self.report(Diag::UnexpectedToken { token: open_span });
            self.parse_and_visit_expression(v, Precedence::default())?;
            return Ok(());
        }
        self.lexer.skip();
        self.parse_and_visit_expression(v, Precedence::default())?;
        if self.peek().kind == TokenKind::CloseParen {
            self.lexer.skip();
        } else {
            self.report(Diag::UnmatchedParenthesis { paren: open_span });
        }
        Ok(())
    }

    fn parse_and_visit_switch(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        self.lexer.skip();
        self.parse_parenthesized_condition(v)?;
        let open_span = self.peek().span();
        if self.peek().kind != TokenKind::OpenBrace {
            self.report(Diag::UnexpectedToken { token: open_span });
            return Ok(());
        }
        v.visit_enter_block_scope();
        self.lexer.skip();
        loop {
            match self.peek().kind {
                TokenKind::CaseKeyword => {
                    self.lexer.skip();
                    self.parse_and_visit_expression(v, Precedence::default())?;
                    self.expect_or_report(TokenKind::Colon);
                }
                TokenKind::DefaultKeyword => {
                    self.lexer.skip();
                    self.expect_or_report(TokenKind::Colon);
                }
                TokenKind::CloseBrace => {
                    self.lexer.skip();
                    break;
                }
                TokenKind::EndOfFile => {
                    self.report(Diag::UnclosedCodeBlock {
                        block_open: open_span,
                    });
                    break;
                }
                _ => {
                    let before = self.peek().begin;
                    self.parse_and_visit_statement(v)?;
                    if self.peek().begin == before {
                        self.report(Diag::UnexpectedToken {
                            token: self.peek().span(),
                        });
                        self.lexer.skip();
                    }
                }
            }
        }
        v.visit_exit_block_scope();
        Ok(())
    }

    fn parse_and_visit_try(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        self.lexer.skip();
        v.visit_enter_block_scope();
        self.parse_statement_block_no_scope(v)?;
        v.visit_exit_block_scope();

        if self.peek().kind == TokenKind::CatchKeyword {
            self.lexer.skip();
            v.visit_enter_block_scope();
            if self.peek().kind == TokenKind::OpenParen {
                let open_span = self.peek().span();
                self.lexer.skip();
                match self.peek().kind {
                    k if k.is_identifier_like()
                        || k == TokenKind::OpenBrace
                        || k == TokenKind::OpenBracket =>
                    {
                        let mut pattern = BufferingVisitor::new();
                        self.parse_binding_pattern(&mut pattern, VariableKind::Catch)?;
                        pattern.move_into(v);
                    }
                    _ => {
                        self.report(Diag::UnexpectedToken {
                            token: self.peek().span(),
                        });
                    }
                }
                if self.peek().kind == TokenKind::CloseParen {
                    self.lexer.skip();
                } else {
                    self.report(Diag::UnmatchedParenthesis { paren: open_span });
                }
            }
            self.parse_statement_block_no_scope(v)?;
            v.visit_exit_block_scope();
        }
        if self.peek().kind == TokenKind::FinallyKeyword {
            self.lexer.skip();
            v.visit_enter_block_scope();
            self.parse_statement_block_no_scope(v)?;
            v.visit_exit_block_scope();
        }
        Ok(())
    }

    fn parse_and_visit_for(&mut self, v: &mut dyn ParseVisitor) -> ParseResult<()> {
        use TokenKind::*;
        self.lexer.skip(); // 'for'
        if self.peek().kind == AwaitKeyword {
            self.lexer.skip(); // 'for await'
        }
        let open_span = self.peek().span();
        if self.peek().kind != OpenParen {
            self.report(Diag::UnexpectedToken { token: open_span });
            return Ok(());
        }
        self.lexer.skip();
        let head_begins_with_async = self.peek().kind == AsyncKeyword;

        let mut after_expression: Option<ExpressionRef<'a>> = None;
        let mut entered_for_scope = false;

        let head_start = self.peek().kind;
        let token_after_head_start = if head_start == LetKeyword {
            self.next_token_kind()
        } else {
            TokenKind::EndOfFile
        };
        let let_is_expression =
            head_start == LetKeyword && matches!(token_after_head_start, Dot | OpenParen);
        // `for (let in xs)` assigns to a variable named `let`; a for scope
        // is still opened, mirroring the declaration form.
        let let_is_in_of_target =
            head_start == LetKeyword && matches!(token_after_head_start, InKeyword | OfKeyword);
        match head_start {
            Semicolon => {
                self.lexer.skip();
                after_expression = self.parse_c_style_head_remainder(v)?;
            }
            VarKeyword | LetKeyword | ConstKeyword
                if !let_is_expression && !let_is_in_of_target =>
            {
                let kind = match self.peek().kind {
                    VarKeyword => VariableKind::Var,
                    LetKeyword => VariableKind::Let,
                    _ => VariableKind::Const,
                };
                if kind != VariableKind::Var {
                    v.visit_enter_for_scope();
                    entered_for_scope = true;
                }
                let declaring_span = self.peek().span();
                self.lexer.skip();
                let mut lhs = BufferingVisitor::new();
                let head_prec = Precedence {
                    commas: false,
                    in_operator: false,
                    ..Precedence::default()
                };
                self.parse_and_visit_let_bindings(&mut lhs, kind, declaring_span, head_prec)?;
                match self.peek().kind {
                    Semicolon => {
                        self.lexer.skip();
                        lhs.move_into(v);
                        after_expression = self.parse_c_style_head_remainder(v)?;
                    }
                    InKeyword | OfKeyword => {
                        self.lexer.skip();
                        let rhs = self.parse_expression_prec(Precedence::default())?;
                        self.visit_expression(rhs, v, VariableContext::Rhs);
                        lhs.move_into(v);
                    }
                    _ => {
                        self.report(Diag::UnexpectedToken {
                            token: self.peek().span(),
                        });
                        lhs.move_into(v);
                    }
                }
            }
            _ => {
                if let_is_in_of_target {
                    v.visit_enter_for_scope();
                    entered_for_scope = true;
                }
                let head_prec = Precedence {
                    in_operator: false,
                    ..Precedence::default()
                };
                let init = self.parse_expression_prec(head_prec)?;
                match self.peek().kind {
                    Semicolon => {
                        self.lexer.skip();
                        self.visit_expression(init, v, VariableContext::Rhs);
                        after_expression = self.parse_c_style_head_remainder(v)?;
                    }
                    InKeyword | OfKeyword => {
                        let is_of = self.peek().kind == OfKeyword;
                        self.lexer.skip();
                        let rhs = self.parse_expression_prec(Precedence::default())?;
                        let plain_async = matches!(
                            init,
                            Expression::Variable { name } if name.normalized == "async"
                        );
                        if is_of && head_begins_with_async && plain_async {
                            // `async` is excluded from the for-of
                            // assignment sweep; no assignment is emitted.
                            self.report(Diag::CannotAssignToVariableNamedAsyncInForOf {
                                async_token: init.span(),
                            });
                            self.visit_expression(rhs, v, VariableContext::Rhs);
                        } else {
                            self.visit_assignment_expression(init, rhs, v);
                        }
                    }
                    _ => {
                        self.report(Diag::UnexpectedToken {
                            token: self.peek().span(),
                        });
                        self.visit_expression(init, v, VariableContext::Rhs);
                    }
                }
            }
        }

        if self.peek().kind == CloseParen {
            self.lexer.skip();
        } else {
            self.report(Diag::UnmatchedParenthesis { paren: open_span });
        }

        self.parse_and_visit_statement(v)?;

        if let Some(after) = after_expression {
            self.visit_expression(after, v, VariableContext::Rhs);
        }
        if entered_for_scope {
            v.visit_exit_for_scope();
        }
        Ok(())
    }

    /// Parse `cond; update` of a C-style `for` head; the update expression
    /// is returned so it can be visited after the body.
    fn parse_c_style_head_remainder(
        &mut self,
        v: &mut dyn ParseVisitor,
    ) -> ParseResult<Option<ExpressionRef<'a>>> {
        if self.peek().kind != TokenKind::Semicolon {
            self.parse_and_visit_expression(v, Precedence::default())?;
        }
        self.expect_or_report(TokenKind::Semicolon);
        if self.peek().kind != TokenKind::CloseParen {
            return Ok(Some(self.parse_expression_prec(Precedence::default())?));
        }
        Ok(None)
    }

    // ======================================================================
    // Expressions
    // ======================================================================

    fn parse_and_visit_expression(
        &mut self,
        v: &mut dyn ParseVisitor,
        prec: Precedence,
    ) -> ParseResult<()> {
        let ast = self.parse_expression_prec(prec)?;
        self.visit_expression(ast, v, VariableContext::Rhs);
        Ok(())
    }

    fn parse_expression_prec(&mut self, prec: Precedence) -> ParseResult<ExpressionRef<'a>> {
        self.enter_nesting()?;
        let ast = self.parse_primary(prec)?;
        let result = self.parse_expression_remainder(ast, prec);
        self.exit_nesting();
        result
    }

    fn parse_primary(&mut self, prec: Precedence) -> ParseResult<ExpressionRef<'a>> {
        use TokenKind::*;
        let span = self.peek().span();
        let begin = span.begin;
        match self.peek().kind {
            Number | BigInt | String | TrueKeyword | FalseKeyword | NullKeyword => {
                self.lexer.skip();
                Ok(self.make(Expression::Literal { span }))
            }
            Slash | SlashEquals => {
                self.lexer.reparse_as_regexp();
                let span = self.peek().span();
                self.lexer.skip();
                Ok(self.make(Expression::Literal { span }))
            }
            CompleteTemplate => {
                self.lexer.skip();
                Ok(self.make(Expression::Template {
                    children: &[],
                    span,
                }))
            }
            TemplateHead => self.parse_template(None),
            ThisKeyword => {
                self.lexer.skip();
                Ok(self.make(Expression::This { span }))
            }
            SuperKeyword => {
                self.lexer.skip();
                Ok(self.make(Expression::Super { span }))
            }
            NewKeyword => self.parse_new(),
            TypeofKeyword | DeleteKeyword | VoidKeyword | Minus | Plus | Exclamation | Tilde => {
                self.lexer.skip();
                let child = self.parse_expression_prec(prec.operand())?;
                Ok(self.make(Expression::UnaryOperator {
                    child,
                    span: self.span_from(begin),
                }))
            }
            PlusPlus | MinusMinus => {
                self.lexer.skip();
                let child = self.parse_expression_prec(prec.operand())?;
                Ok(self.make(Expression::RwUnaryPrefix {
                    child,
                    span: self.span_from(begin),
                }))
            }
            AwaitKeyword if self.attributes.is_async => {
                self.lexer.skip();
                let child = self.parse_expression_prec(prec.operand())?;
                Ok(self.make(Expression::Await {
                    child,
                    span: self.span_from(begin),
                }))
            }
            YieldKeyword if self.attributes.is_generator => {
                self.lexer.skip();
                if self.peek().kind == Star {
                    self.lexer.skip();
                    let child = self.parse_expression_prec(prec.without_commas())?;
                    return Ok(self.make(Expression::Yield {
                        child: Some(child),
                        span: self.span_from(begin),
                    }));
                }
                let ends_yield = matches!(
                    self.peek().kind,
                    Semicolon | CloseParen | CloseBracket | CloseBrace | Comma | Colon | EndOfFile
                ) || self.peek().has_leading_newline();
                if ends_yield {
                    Ok(self.make(Expression::Yield { child: None, span }))
                } else {
                    let child = self.parse_expression_prec(prec.without_commas())?;
                    Ok(self.make(Expression::Yield {
                        child: Some(child),
                        span: self.span_from(begin),
                    }))
                }
            }
            DotDotDot => {
                self.lexer.skip();
                let child = self.parse_expression_prec(prec.without_commas())?;
                Ok(self.make(Expression::Spread {
                    child,
                    span: self.span_from(begin),
                }))
            }
            FunctionKeyword => self.parse_function_expression(FunctionAttributes::NORMAL, begin),
            AsyncKeyword => self.parse_async_primary(prec),
            ClassKeyword => self.parse_class_expression(),
            OpenParen => self.parse_paren_or_arrow(FunctionAttributes::NORMAL, None, prec),
            OpenBracket => self.parse_array_literal(),
            OpenBrace => self.parse_object_literal(),
            ImportKeyword => {
                self.lexer.skip();
                Ok(self.make(Expression::Literal { span }))
            }
            LessThan if self.options.typescript => self.parse_generic_arrow_or_jsx(prec),
            LessThan if self.options.jsx => {
                let element = self.parse_jsx_element_inner()?;
                self.lexer.skip(); // the closing '>'
                Ok(element)
            }
            k if k.is_identifier_like() => {
                let token = self.peek().clone();
                self.lexer.skip();
                Ok(self.make(Expression::Variable {
                    name: self.identifier_from_token(&token),
                }))
            }
            _ => {
                // Not an expression. Report and let the caller's grammar
                // context pick up this token.
                self.report(Diag::MissingOperandForOperator { operator: span });
                Ok(self.make(Expression::Invalid {
                    span: SourceSpan::empty(begin),
                }))
            }
        }
    }

    fn parse_expression_remainder(
        &mut self,
        mut ast: ExpressionRef<'a>,
        prec: Precedence,
    ) -> ParseResult<ExpressionRef<'a>> {
        use TokenKind::*;
        loop {
            match self.peek().kind {
                Comma if prec.commas => {
                    let mut children = vec![ast];
                    while self.peek().kind == Comma {
                        self.lexer.skip();
                        if matches!(
                            self.peek().kind,
                            CloseParen | CloseBracket | CloseBrace | Semicolon | EndOfFile
                        ) {
                            break; // trailing comma
                        }
                        children.push(self.parse_expression_prec(prec.without_commas())?);
                    }
                    ast = self.make(Expression::BinaryOperator {
                        children: self.make_children(children),
                    });
                }
                kind if is_binary_operator(kind)
                    && prec.binary_operators
                    && (kind != InKeyword || prec.in_operator) =>
                {
                    let mut children = vec![ast];
                    loop {
                        self.lexer.skip();
                        children.push(self.parse_expression_prec(prec.operand())?);
                        let next = self.peek().kind;
                        if !(is_binary_operator(next)
                            && (next != InKeyword || prec.in_operator))
                        {
                            break;
                        }
                    }
                    ast = self.make(Expression::BinaryOperator {
                        children: self.make_children(children),
                    });
                }
                Equals => {
                    self.lexer.skip();
                    let rhs = self.parse_expression_prec(prec.without_commas())?;
                    ast = self.make(Expression::Assignment { lhs: ast, rhs });
                }
                kind if is_compound_assignment(kind) => {
                    self.lexer.skip();
                    let rhs = self.parse_expression_prec(prec.without_commas())?;
                    ast = self.make(Expression::UpdatingAssignment { lhs: ast, rhs });
                }
                Question if prec.conditional_operator => {
                    self.lexer.skip();
                    let true_branch = self.parse_expression_prec(prec.without_commas())?;
                    let false_branch = if self.peek().kind == Colon {
                        self.lexer.skip();
                        self.parse_expression_prec(prec.without_commas())?
                    } else {
                        self.report(Diag::UnexpectedToken {
                            token: self.peek().span(),
                        });
                        self.make(Expression::Invalid {
                            span: SourceSpan::empty(self.lexer.end_of_previous_token()),
                        })
                    };
                    ast = self.make(Expression::Conditional {
                        condition: ast,
                        true_branch,
                        false_branch,
                    });
                }
                Dot => {
                    self.lexer.skip();
                    ast = self.parse_dot_field(ast);
                }
                QuestionDot => {
                    self.lexer.skip();
                    match self.peek().kind {
                        OpenParen => {
                            let mut children = vec![ast];
                            children.extend(self.parse_call_arguments()?);
                            ast = self.make(Expression::Call {
                                children: self.make_children(children),
                                span: self.span_from(ast.span().begin),
                            });
                        }
                        OpenBracket => {
                            ast = self.parse_index_suffix(ast)?;
                        }
                        _ => {
                            ast = self.parse_dot_field(ast);
                        }
                    }
                }
                OpenBracket => {
                    ast = self.parse_index_suffix(ast)?;
                }
                OpenParen => {
                    let mut children = vec![ast];
                    children.extend(self.parse_call_arguments()?);
                    ast = self.make(Expression::Call {
                        children: self.make_children(children),
                        span: self.span_from(ast.span().begin),
                    });
                }
                PlusPlus | MinusMinus => {
                    if self.peek().has_leading_newline() {
                        // ASI: the operator belongs to the next statement.
                        break;
                    }
                    self.lexer.skip();
                    ast = self.make(Expression::RwUnarySuffix {
                        child: ast,
                        span: self.span_from(ast.span().begin),
                    });
                }
                Arrow => {
                    self.lexer.skip();
                    let parameters = self.arrow_parameters_from_expression(ast);
                    ast = self.parse_arrow_tail(
                        FunctionAttributes::NORMAL,
                        parameters,
                        None,
                        ast.span().begin,
                        prec,
                    )?;
                }
                TemplateHead => {
                    ast = self.parse_template(Some(ast))?;
                }
                CompleteTemplate => {
                    let template_span = self.peek().span();
                    self.lexer.skip();
                    let children = self.make_children(vec![ast]);
                    ast = self.make(Expression::TaggedTemplate {
                        children,
                        span: ast.span().union(&template_span),
                    });
                }
                Exclamation
                    if self.options.typescript && !self.peek().has_leading_newline() =>
                {
                    let bang = self.peek().span();
                    self.lexer.skip();
                    ast = self.make(Expression::NonNullAssertion { child: ast, bang });
                }
                AsKeyword if self.options.typescript => {
                    self.lexer.skip();
                    let mut type_buffer = BufferingVisitor::new();
                    self.parse_and_visit_type(&mut type_buffer)?;
                    let visits = self.store_visits(type_buffer);
                    ast = self.make(Expression::TypeAnnotated {
                        child: ast,
                        visits,
                        span: self.span_from(ast.span().begin),
                    });
                }
                Colon if self.options.typescript => {
                    // Possibly an unparenthesized annotated arrow parameter:
                    // `param: Type => body`.
                    let type_colon = self.peek().span();
                    let state = self.lexer.snapshot();
                    let speculation = self.begin_speculation();
                    self.lexer.skip();
                    let mut type_buffer = BufferingVisitor::new();
                    self.parse_and_visit_type(&mut type_buffer)?;
                    if self.peek().kind == Arrow {
                        self.commit_speculation(speculation);
                        self.report(Diag::ArrowParameterWithTypeAnnotationRequiresParentheses {
                            parameter_and_annotation: self.span_from(ast.span().begin),
                            type_colon,
                        });
                        self.lexer.skip(); // '=>'
                        let visits = self.store_visits(type_buffer);
                        let annotated = self.make(Expression::TypeAnnotated {
                            child: ast,
                            visits,
                            span: self.span_from(ast.span().begin),
                        });
                        let parameters = self.make_children(vec![annotated]);
                        ast = self.parse_arrow_tail(
                            FunctionAttributes::NORMAL,
                            parameters,
                            None,
                            ast.span().begin,
                            prec,
                        )?;
                    } else if matches!(self.peek().kind, Comma | CloseParen) {
                        // Inside a parenthesized arrow parameter list; keep
                        // the annotation without a diagnostic.
                        self.commit_speculation(speculation);
                        let visits = self.store_visits(type_buffer);
                        ast = self.make(Expression::TypeAnnotated {
                            child: ast,
                            visits,
                            span: self.span_from(ast.span().begin),
                        });
                    } else {
                        // Not an arrow; the colon belongs to an outer
                        // construct.
                        self.discard_speculation(speculation);
                        self.lexer.roll_back(state);
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(ast)
    }

    fn parse_dot_field(&mut self, object: ExpressionRef<'a>) -> ExpressionRef<'a> {
        if self.peek().kind.is_identifier_like() || self.peek().kind.is_keyword() {
            let token = self.peek().clone();
            self.lexer.skip();
            self.make(Expression::Dot {
                child: object,
                field: self.identifier_from_token(&token),
            })
        } else {
            self.report(Diag::UnexpectedToken {
                token: self.peek().span(),
            });
            let field = self.synthetic_identifier(
                SourceSpan::empty(self.lexer.end_of_previous_token()),
                "",
            );
            self.make(Expression::Dot {
                child: object,
                field,
            })
        }
    }

    fn parse_index_suffix(&mut self, object: ExpressionRef<'a>) -> ParseResult<ExpressionRef<'a>> {
        let open_span = self.peek().span();
        self.lexer.skip();
        let subscript = self.parse_expression_prec(Precedence::default())?;
        if self.peek().kind == TokenKind::CloseBracket {
            self.lexer.skip();
        } else {
            self.report(Diag::UnmatchedParenthesis { paren: open_span });
        }
        Ok(self.make(Expression::Index {
            child: object,
            subscript,
            span: self.span_from(object.span().begin),
        }))
    }

    fn parse_call_arguments(&mut self) -> ParseResult<Vec<ExpressionRef<'a>>> {
        let open_span = self.peek().span();
        self.lexer.skip(); // '('
        let mut arguments = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::CloseParen => {
                    self.lexer.skip();
                    return Ok(arguments);
                }
                TokenKind::EndOfFile => {
                    self.report(Diag::UnmatchedParenthesis { paren: open_span });
                    return Ok(arguments);
                }
                TokenKind::Comma => self.lexer.skip(),
                _ => {
                    let before = self.peek().begin;
                    arguments.push(self.parse_expression_prec(Precedence::default().without_commas())?);
                    if self.peek().begin == before {
                        self.lexer.skip();
                    }
                }
            }
        }
    }

    fn parse_new(&mut self) -> ParseResult<ExpressionRef<'a>> {
        let begin = self.peek().begin;
        self.lexer.skip(); // 'new'
        if self.peek().kind == TokenKind::Dot {
            // `new.target`.
            self.lexer.skip();
            if self.peek().kind.is_identifier_like() {
                self.lexer.skip();
            }
            return Ok(self.make(Expression::Literal {
                span: self.span_from(begin),
            }));
        }
        let mut callee = self.parse_primary(Precedence::default().operand())?;
        loop {
            match self.peek().kind {
                TokenKind::Dot => {
                    self.lexer.skip();
                    callee = self.parse_dot_field(callee);
                }
                TokenKind::OpenBracket => {
                    callee = self.parse_index_suffix(callee)?;
                }
                _ => break,
            }
        }
        let mut children = vec![callee];
        if self.peek().kind == TokenKind::OpenParen {
            children.extend(self.parse_call_arguments()?);
        }
        Ok(self.make(Expression::New {
            children: self.make_children(children),
            span: self.span_from(begin),
        }))
    }

    fn parse_template(
        &mut self,
        tag: Option<ExpressionRef<'a>>,
    ) -> ParseResult<ExpressionRef<'a>> {
        let begin = tag.map_or(self.peek().begin, |t| t.span().begin);
        let template_begin = self.peek().span();
        let mut children: Vec<ExpressionRef<'a>> = Vec::new();
        if let Some(tag) = tag {
            children.push(tag);
        }
        loop {
            // Current token is the template head or a middle segment.
            self.lexer.skip();
            children.push(self.parse_expression_prec(Precedence::default())?);
            if self.peek().kind != TokenKind::CloseBrace {
                self.report(Diag::UnclosedTemplate {
                    incomplete_template: template_begin,
                });
                break;
            }
            self.lexer.skip_in_template_continuation();
            match self.peek().kind {
                TokenKind::TemplateMiddle => continue,
                TokenKind::TemplateTail => {
                    self.lexer.skip();
                    break;
                }
                _ => break,
            }
        }
        let span = self.span_from(begin);
        let children = self.make_children(children);
        Ok(if tag.is_some() {
            self.make(Expression::TaggedTemplate { children, span })
        } else {
            self.make(Expression::Template { children, span })
        })
    }

    fn parse_array_literal(&mut self) -> ParseResult<ExpressionRef<'a>> {
        let open_span = self.peek().span();
        self.lexer.skip();
        let mut children = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::CloseBracket => {
                    self.lexer.skip();
                    break;
                }
                TokenKind::EndOfFile => {
                    self.report(Diag::UnmatchedParenthesis { paren: open_span });
                    break;
                }
                TokenKind::Comma => self.lexer.skip(), // hole
                TokenKind::DotDotDot => {
                    let begin = self.peek().begin;
                    self.lexer.skip();
                    let child = self.parse_expression_prec(Precedence::default().without_commas())?;
                    children.push(self.make(Expression::Spread {
                        child,
                        span: self.span_from(begin),
                    }));
                }
                _ => {
                    let before = self.peek().begin;
                    children.push(
                        self.parse_expression_prec(Precedence::default().without_commas())?,
                    );
                    if self.peek().begin == before {
                        self.lexer.skip();
                    }
                }
            }
        }
        Ok(self.make(Expression::Array {
            children: self.make_children(children),
            span: self.span_from(open_span.begin),
        }))
    }

    fn parse_object_literal(&mut self) -> ParseResult<ExpressionRef<'a>> {
        use TokenKind::*;
        let open_span = self.peek().span();
        self.lexer.skip();
        let mut entries: Vec<ObjectEntry<'a>> = Vec::new();
        loop {
            match self.peek().kind {
                CloseBrace => {
                    self.lexer.skip();
                    break;
                }
                EndOfFile => {
                    self.report(Diag::UnclosedCodeBlock {
                        block_open: open_span,
                    });
                    break;
                }
                Comma => self.lexer.skip(),
                DotDotDot => {
                    let begin = self.peek().begin;
                    self.lexer.skip();
                    let child = self.parse_expression_prec(Precedence::default().without_commas())?;
                    let value = self.make(Expression::Spread {
                        child,
                        span: self.span_from(begin),
                    });
                    entries.push(ObjectEntry {
                        property: None,
                        value,
                    });
                }
                _ => {
                    let before = self.peek().begin;
                    if let Some(entry) = self.parse_object_literal_entry()? {
                        entries.push(entry);
                    }
                    if self.peek().begin == before {
                        self.report(Diag::UnexpectedToken {
                            token: self.peek().span(),
                        });
                        self.lexer.skip();
                    }
                }
            }
        }
        Ok(self.make(Expression::Object {
            entries: self.arena.alloc_slice_copy(&entries),
            span: self.span_from(open_span.begin),
        }))
    }

    fn parse_object_literal_entry(&mut self) -> ParseResult<Option<ObjectEntry<'a>>> {
        use TokenKind::*;
        let mut attributes = FunctionAttributes::NORMAL;
        // Accessor and async/generator prefixes; each only counts as a
        // prefix when a member name follows.
        loop {
            let kind = self.peek().kind;
            let followed_by_name = !matches!(
                self.next_token_kind(),
                Colon | Comma | CloseBrace | OpenParen | Equals | EndOfFile
            );
            match kind {
                GetKeyword | SetKeyword if followed_by_name => self.lexer.skip(),
                AsyncKeyword if followed_by_name => {
                    attributes.is_async = true;
                    self.lexer.skip();
                }
                Star => {
                    attributes.is_generator = true;
                    self.lexer.skip();
                }
                _ => break,
            }
        }

        match self.peek().kind {
            k if k.is_identifier_like() || k.is_keyword() => {
                let token = self.peek().clone();
                self.lexer.skip();
                let key_span = token.span();
                match self.peek().kind {
                    Colon => {
                        self.lexer.skip();
                        let value =
                            self.parse_expression_prec(Precedence::default().without_commas())?;
                        Ok(Some(ObjectEntry {
                            property: Some(self.make(Expression::Literal { span: key_span })),
                            value,
                        }))
                    }
                    OpenParen => {
                        let value = self.parse_method_body_expression(attributes, key_span)?;
                        Ok(Some(ObjectEntry {
                            property: Some(self.make(Expression::Literal { span: key_span })),
                            value,
                        }))
                    }
                    Equals => {
                        // Shorthand with default; only meaningful as a
                        // destructuring-assignment target.
                        self.lexer.skip();
                        let lhs = self.make(Expression::Variable {
                            name: self.identifier_from_token(&token),
                        });
                        let rhs =
                            self.parse_expression_prec(Precedence::default().without_commas())?;
                        let value = self.make(Expression::Assignment { lhs, rhs });
                        Ok(Some(ObjectEntry {
                            property: None,
                            value,
                        }))
                    }
                    _ => {
                        if token.kind.is_identifier_like() {
                            let value = self.make(Expression::Variable {
                                name: self.identifier_from_token(&token),
                            });
                            Ok(Some(ObjectEntry {
                                property: None,
                                value,
                            }))
                        } else {
                            self.report(Diag::MissingValueForObjectLiteralEntry {
                                key: key_span,
                            });
                            Ok(None)
                        }
                    }
                }
            }
            String | Number | BigInt => {
                let key_span = self.peek().span();
                self.lexer.skip();
                match self.peek().kind {
                    Colon => {
                        self.lexer.skip();
                        let value =
                            self.parse_expression_prec(Precedence::default().without_commas())?;
                        Ok(Some(ObjectEntry {
                            property: Some(self.make(Expression::Literal { span: key_span })),
                            value,
                        }))
                    }
                    OpenParen => {
                        let value = self.parse_method_body_expression(attributes, key_span)?;
                        Ok(Some(ObjectEntry {
                            property: Some(self.make(Expression::Literal { span: key_span })),
                            value,
                        }))
                    }
                    _ => {
                        self.report(Diag::InvalidLoneLiteralInObjectLiteral { literal: key_span });
                        Ok(None)
                    }
                }
            }
            OpenBracket => {
                let bracket_span = self.peek().span();
                self.lexer.skip();
                let key = self.parse_expression_prec(Precedence::default())?;
                if self.peek().kind == CloseBracket {
                    self.lexer.skip();
                } else {
                    self.report(Diag::UnmatchedParenthesis {
                        paren: bracket_span,
                    });
                }
                match self.peek().kind {
                    Colon => {
                        self.lexer.skip();
                        let value =
                            self.parse_expression_prec(Precedence::default().without_commas())?;
                        Ok(Some(ObjectEntry {
                            property: Some(key),
                            value,
                        }))
                    }
                    OpenParen => {
                        let value =
                            self.parse_method_body_expression(attributes, bracket_span)?;
                        Ok(Some(ObjectEntry {
                            property: Some(key),
                            value,
                        }))
                    }
                    _ => {
                        self.report(Diag::MissingValueForObjectLiteralEntry {
                            key: key.span(),
                        });
                        Ok(Some(ObjectEntry {
                            property: Some(key),
                            value: self.make(Expression::Invalid {
                                span: SourceSpan::empty(self.lexer.end_of_previous_token()),
                            }),
                        }))
                    }
                }
            }
            _ => Ok(None),
        }
    }

    /// An object-literal method body, packaged as a deferred function
    /// expression.
    fn parse_method_body_expression(
        &mut self,
        attributes: FunctionAttributes,
        key_span: SourceSpan,
    ) -> ParseResult<ExpressionRef<'a>> {
        let mut buffer = BufferingVisitor::new();
        self.parse_function_scope_contents(&mut buffer, attributes)?;
        let visits = self.store_visits(buffer);
        Ok(self.make(Expression::Function {
            attributes,
            visits,
            span: self.span_from(key_span.begin),
        }))
    }

    fn parse_function_expression(
        &mut self,
        mut attributes: FunctionAttributes,
        begin: TextPos,
    ) -> ParseResult<ExpressionRef<'a>> {
        self.lexer.skip(); // 'function'
        if self.peek().kind == TokenKind::Star {
            self.lexer.skip();
            attributes.is_generator = true;
        }
        let name = if self.peek().kind.is_identifier_like() {
            let token = self.peek().clone();
            self.lexer.skip();
            Some(self.identifier_from_token(&token))
        } else {
            None
        };
        let mut buffer = BufferingVisitor::new();
        self.parse_function_scope_contents(&mut buffer, attributes)?;
        let visits = self.store_visits(buffer);
        let span = self.span_from(begin);
        Ok(match name {
            Some(name) => self.make(Expression::NamedFunction {
                attributes,
                name,
                visits,
                span,
            }),
            None => self.make(Expression::Function {
                attributes,
                visits,
                span,
            }),
        })
    }

    /// `async` at expression position: async function, async arrow, or the
    /// plain variable named `async`.
    fn parse_async_primary(&mut self, prec: Precedence) -> ParseResult<ExpressionRef<'a>> {
        use TokenKind::*;
        let async_token = self.peek().clone();
        let begin = async_token.begin;
        self.lexer.skip();
        match self.peek().kind {
            FunctionKeyword => self.parse_function_expression(FunctionAttributes::ASYNC, begin),
            OpenParen => self.parse_paren_or_arrow(
                FunctionAttributes::ASYNC,
                Some(async_token.span()),
                prec,
            ),
            Arrow => {
                // `async => …`: an arrow whose parameter is named `async`.
                self.lexer.skip();
                let param = self.make(Expression::Variable {
                    name: self.identifier_from_token(&async_token),
                });
                let parameters = self.make_children(vec![param]);
                self.parse_arrow_tail(FunctionAttributes::NORMAL, parameters, None, begin, prec)
            }
            k if k.is_identifier_like() => {
                // `async x => …`, or `async` used as a variable.
                let state = self.lexer.snapshot();
                let speculation = self.begin_speculation();
                let param_token = self.peek().clone();
                self.lexer.skip();
                if self.peek().kind == Arrow {
                    self.commit_speculation(speculation);
                    self.lexer.skip();
                    let param = self.make(Expression::Variable {
                        name: self.identifier_from_token(&param_token),
                    });
                    let parameters = self.make_children(vec![param]);
                    return self.parse_arrow_tail(
                        FunctionAttributes::ASYNC,
                        parameters,
                        None,
                        begin,
                        prec,
                    );
                }
                if self.options.typescript && self.peek().kind == Colon {
                    // `async param: Type => …` (missing the required
                    // parentheses).
                    let type_colon = self.peek().span();
                    self.lexer.skip();
                    let mut type_buffer = BufferingVisitor::new();
                    self.parse_and_visit_type(&mut type_buffer)?;
                    if self.peek().kind == Arrow {
                        self.commit_speculation(speculation);
                        self.report(Diag::ArrowParameterWithTypeAnnotationRequiresParentheses {
                            parameter_and_annotation: self.span_from(param_token.begin),
                            type_colon,
                        });
                        self.lexer.skip();
                        let visits = self.store_visits(type_buffer);
                        let param = self.make(Expression::Variable {
                            name: self.identifier_from_token(&param_token),
                        });
                        let annotated = self.make(Expression::TypeAnnotated {
                            child: param,
                            visits,
                            span: self.span_from(param_token.begin),
                        });
                        let parameters = self.make_children(vec![annotated]);
                        return self.parse_arrow_tail(
                            FunctionAttributes::ASYNC,
                            parameters,
                            None,
                            begin,
                            prec,
                        );
                    }
                }
                self.discard_speculation(speculation);
                self.lexer.roll_back(state);
                Ok(self.make(Expression::Variable {
                    name: self.identifier_from_token(&async_token),
                }))
            }
            _ => Ok(self.make(Expression::Variable {
                name: self.identifier_from_token(&async_token),
            })),
        }
    }

    /// `(` at expression position: a parenthesized expression, an arrow
    /// parameter list, or (after `async`) a call. Commitment happens on
    /// seeing `=>`.
    fn parse_paren_or_arrow(
        &mut self,
        arrow_attributes: FunctionAttributes,
        async_span: Option<SourceSpan>,
        prec: Precedence,
    ) -> ParseResult<ExpressionRef<'a>> {
        use TokenKind::*;
        let open_span = self.peek().span();
        let begin = async_span.map_or(open_span.begin, |s| s.begin);
        self.lexer.skip(); // '('

        if self.peek().kind == CloseParen {
            self.lexer.skip();
            let return_type = self.try_parse_arrow_return_type()?;
            if self.peek().kind == Arrow {
                self.lexer.skip();
                return self.parse_arrow_tail(arrow_attributes, &[], return_type, begin, prec);
            }
            if let Some(async_span) = async_span {
                // `async()` is a call of a function named async.
                let callee = self.make(Expression::Variable {
                    name: self.synthetic_identifier(async_span, "async"),
                });
                return Ok(self.make(Expression::Call {
                    children: self.make_children(vec![callee]),
                    span: self.span_from(begin),
                }));
            }
            self.report(Diag::MissingBodyForArrowFunction {
                arrow: SourceSpan::empty(self.lexer.end_of_previous_token()),
            });
            return Ok(self.make(Expression::Invalid {
                span: self.span_from(begin),
            }));
        }

        let contents = self.parse_expression_prec(Precedence::default())?;
        if self.peek().kind == CloseParen {
            self.lexer.skip();
        } else {
            self.report(Diag::UnmatchedParenthesis { paren: open_span });
        }

        let return_type = self.try_parse_arrow_return_type()?;
        if self.peek().kind == Arrow {
            self.lexer.skip();
            let parameters = self.arrow_parameters_from_expression(contents);
            return self.parse_arrow_tail(arrow_attributes, parameters, return_type, begin, prec);
        }
        if let Some(async_span) = async_span {
            // Not an arrow after all: `async(…)` was a call.
            let callee = self.make(Expression::Variable {
                name: self.synthetic_identifier(async_span, "async"),
            });
            return Ok(self.make(Expression::Call {
                children: self.make_children(vec![callee, contents]),
                span: self.span_from(begin),
            }));
        }
        Ok(contents)
    }

    /// After a candidate arrow parameter list, speculatively parse `: Type`.
    /// Rolls back if no `=>` follows.
    fn try_parse_arrow_return_type(&mut self) -> ParseResult<Option<BufferingVisitor>> {
        if !self.options.typescript || self.peek().kind != TokenKind::Colon {
            return Ok(None);
        }
        let state = self.lexer.snapshot();
        let speculation = self.begin_speculation();
        self.lexer.skip();
        let mut type_buffer = BufferingVisitor::new();
        self.parse_and_visit_type(&mut type_buffer)?;
        if self.peek().kind == TokenKind::Arrow {
            self.commit_speculation(speculation);
            Ok(Some(type_buffer))
        } else {
            self.discard_speculation(speculation);
            self.lexer.roll_back(state);
            Ok(None)
        }
    }

    fn arrow_parameters_from_expression(
        &mut self,
        expression: ExpressionRef<'a>,
    ) -> &'a [ExpressionRef<'a>] {
        match *expression {
            Expression::BinaryOperator { children } => children,
            _ => self.make_children(vec![expression]),
        }
    }

    /// The `=>` is consumed; parse the body and build the arrow node.
    fn parse_arrow_tail(
        &mut self,
        attributes: FunctionAttributes,
        parameters: &'a [ExpressionRef<'a>],
        return_type: Option<BufferingVisitor>,
        begin: TextPos,
        prec: Precedence,
    ) -> ParseResult<ExpressionRef<'a>> {
        if self.peek().kind == TokenKind::OpenBrace && prec.trailing_curly_is_arrow_body {
            let mut buffer = return_type.unwrap_or_default();
            buffer.visit_enter_function_scope_body();
            let saved = mem::replace(&mut self.attributes, attributes);
            let result = self.parse_statement_block_no_scope(&mut buffer);
            self.attributes = saved;
            result?;
            let visits = self.store_visits(buffer);
            return Ok(self.make(Expression::ArrowFunctionWithStatements {
                attributes,
                parameters,
                visits,
                span: self.span_from(begin),
            }));
        }
        let return_type_visits = return_type.map(|buffer| self.store_visits(buffer));
        let saved = mem::replace(&mut self.attributes, attributes);
        let body = self.parse_expression_prec(prec.without_commas());
        self.attributes = saved;
        let body = body?;
        Ok(self.make(Expression::ArrowFunctionWithExpression {
            attributes,
            parameters,
            return_type_visits,
            body,
            span: self.span_from(begin),
        }))
    }

    /// `<` in TypeScript mode: a generic arrow function `<T,>() => …`, or
    /// JSX when enabled. Speculative; rolls back on mismatch.
    fn parse_generic_arrow_or_jsx(&mut self, prec: Precedence) -> ParseResult<ExpressionRef<'a>> {
        let begin = self.peek().begin;
        let less_than_span = self.peek().span();
        let state = self.lexer.snapshot();
        let speculation = self.begin_speculation();

        match self.try_parse_generic_arrow(begin, prec) {
            Ok(Some(result)) => {
                self.commit_speculation(speculation);
                return Ok(result);
            }
            Ok(None) => {
                self.discard_speculation(speculation);
            }
            Err(fatal) => {
                self.discard_speculation(speculation);
                return Err(fatal);
            }
        }
        self.lexer.roll_back(state);

        if self.options.jsx {
            let element = self.parse_jsx_element_inner()?;
            self.lexer.skip();
            return Ok(element);
        }
        self.report(Diag::UnexpectedToken {
            token: less_than_span,
        });
        self.lexer.skip();
        Ok(self.make(Expression::Invalid {
            span: SourceSpan::empty(begin),
        }))
    }

    fn try_parse_generic_arrow(
        &mut self,
        begin: TextPos,
        prec: Precedence,
    ) -> ParseResult<Option<ExpressionRef<'a>>> {
        self.lexer.skip(); // '<'
        let mut type_parameters: Vec<ExpressionRef<'a>> = Vec::new();
        loop {
            match self.peek().kind {
                k if k.is_identifier_like() => {
                    let token = self.peek().clone();
                    self.lexer.skip();
                    type_parameters.push(self.make(Expression::Variable {
                        name: self.identifier_from_token(&token),
                    }));
                    if self.peek().kind == TokenKind::ExtendsKeyword {
                        // Constraints do not disambiguate; give up on the
                        // speculative parse rather than buffer type uses.
                        return Ok(None);
                    }
                }
                TokenKind::Comma => self.lexer.skip(),
                TokenKind::GreaterThan => {
                    self.lexer.skip();
                    break;
                }
                _ => return Ok(None),
            }
        }
        if type_parameters.is_empty() || self.peek().kind != TokenKind::OpenParen {
            return Ok(None);
        }
        let open_span = self.peek().span();
        self.lexer.skip();
        let contents = if self.peek().kind == TokenKind::CloseParen {
            None
        } else {
            Some(self.parse_expression_prec(Precedence::default())?)
        };
        if self.peek().kind != TokenKind::CloseParen {
            self.report(Diag::UnmatchedParenthesis { paren: open_span });
        } else {
            self.lexer.skip();
        }
        let return_type = self.try_parse_arrow_return_type()?;
        if self.peek().kind != TokenKind::Arrow {
            return Ok(None);
        }
        self.lexer.skip();
        let mut parameters = type_parameters;
        if let Some(contents) = contents {
            parameters.extend_from_slice(self.arrow_parameters_from_expression(contents));
        }
        let parameters = self.make_children(parameters);
        let arrow =
            self.parse_arrow_tail(FunctionAttributes::NORMAL, parameters, return_type, begin, prec)?;
        Ok(Some(arrow))
    }

    // ======================================================================
    // JSX
    // ======================================================================

    /// Parse a JSX element or fragment. On return the current token is the
    /// element's final `>`; the caller decides how to move past it (the
    /// outermost caller resumes normal lexing, nested callers resume JSX
    /// text).
    fn parse_jsx_element_inner(&mut self) -> ParseResult<ExpressionRef<'a>> {
        use TokenKind::*;
        let open_span = self.peek().span();
        let begin = open_span.begin;
        self.lexer.skip(); // '<'
        let mut children: Vec<ExpressionRef<'a>> = Vec::new();

        if self.peek().kind == GreaterThan {
            // Fragment: <> … </>
            self.parse_jsx_children(&mut children, open_span)?;
            return Ok(self.make(Expression::JsxElement {
                children: self.make_children(children),
                span: self.span_from(begin),
            }));
        }

        // Tag name. Capitalized tags are component references.
        if self.peek().kind.is_identifier_like() {
            let token = self.peek().clone();
            self.lexer.skip();
            let is_component = token
                .value
                .chars()
                .next()
                .map_or(false, |c| c.is_uppercase());
            if is_component {
                children.push(self.make(Expression::Variable {
                    name: self.identifier_from_token(&token),
                }));
            }
            while matches!(self.peek().kind, Dot | Colon) {
                self.lexer.skip();
                if self.peek().kind.is_identifier_like() {
                    self.lexer.skip();
                } else {
                    break;
                }
            }
        }

        // Attributes.
        let mut self_closing = false;
        loop {
            match self.peek().kind {
                GreaterThan => break,
                Slash => {
                    self.lexer.skip();
                    if self.peek().kind == GreaterThan {
                        self_closing = true;
                    }
                    break;
                }
                EndOfFile => {
                    self.report(Diag::UnclosedCodeBlock {
                        block_open: open_span,
                    });
                    return Ok(self.make(Expression::JsxElement {
                        children: self.make_children(children),
                        span: self.span_from(begin),
                    }));
                }
                k if k.is_identifier_like() || k.is_keyword() => {
                    self.lexer.skip();
                    while self.peek().kind == Minus {
                        // data-foo style attribute names.
                        self.lexer.skip();
                        if self.peek().kind.is_identifier_like() || self.peek().kind.is_keyword() {
                            self.lexer.skip();
                        }
                    }
                    if self.peek().kind == Equals {
                        self.lexer.skip();
                        match self.peek().kind {
                            String => self.lexer.skip(),
                            OpenBrace => {
                                self.lexer.skip();
                                children.push(self.parse_expression_prec(
                                    Precedence::default().without_commas(),
                                )?);
                                self.expect_or_report(CloseBrace);
                            }
                            LessThan => {
                                let nested = self.parse_jsx_element_inner()?;
                                self.lexer.skip();
                                children.push(nested);
                            }
                            _ => {
                                self.report(Diag::UnexpectedToken {
                                    token: self.peek().span(),
                                });
                                self.lexer.skip();
                            }
                        }
                    }
                }
                OpenBrace => {
                    // Spread attribute: {...expr}
                    self.lexer.skip();
                    if self.peek().kind == DotDotDot {
                        self.lexer.skip();
                    }
                    children.push(
                        self.parse_expression_prec(Precedence::default().without_commas())?,
                    );
                    self.expect_or_report(CloseBrace);
                }
                _ => {
                    self.report(Diag::UnexpectedToken {
                        token: self.peek().span(),
                    });
                    self.lexer.skip();
                }
            }
        }

        if !self_closing {
            self.parse_jsx_children(&mut children, open_span)?;
        }
        Ok(self.make(Expression::JsxElement {
            children: self.make_children(children),
            span: self.span_from(begin),
        }))
    }

    /// Parse JSX children until the closing tag. The current token on entry
    /// is the `>` that ended the open tag; on exit it is the `>` of the
    /// closing tag.
    fn parse_jsx_children(
        &mut self,
        children: &mut Vec<ExpressionRef<'a>>,
        open_span: SourceSpan,
    ) -> ParseResult<()> {
        use TokenKind::*;
        loop {
            // Everything up to the next '{', '<', or '}' is text.
            self.lexer.skip_in_jsx_text();
            match self.peek().kind {
                OpenBrace => {
                    self.lexer.skip();
                    if self.peek().kind != CloseBrace {
                        children.push(self.parse_expression_prec(Precedence::default())?);
                    }
                    if self.peek().kind != CloseBrace {
                        self.report(Diag::UnexpectedToken {
                            token: self.peek().span(),
                        });
                        if self.peek().kind == EndOfFile {
                            return Ok(());
                        }
                    }
                    // Leave the '}' current; the loop resumes text after it.
                }
                LessThan => {
                    let closing = self.code.byte_at(self.peek().end as usize) == b'/';
                    if closing {
                        self.lexer.skip(); // '<'
                        self.lexer.skip(); // '/'
                        while matches!(self.peek().kind, Dot | Colon)
                            || self.peek().kind.is_identifier_like()
                            || self.peek().kind.is_keyword()
                        {
                            self.lexer.skip();
                        }
                        if self.peek().kind != GreaterThan {
                            self.report(Diag::UnexpectedToken {
                                token: self.peek().span(),
                            });
                        }
                        return Ok(());
                    }
                    let nested = self.parse_jsx_element_inner()?;
                    children.push(nested);
                    // The nested element's final '>' is current; text
                    // resumes after it.
                }
                CloseBrace => {
                    // A stray '}' is just text in JSX.
                }
                EndOfFile => {
                    self.report(Diag::UnclosedCodeBlock {
                        block_open: open_span,
                    });
                    return Ok(());
                }
                _ => return Ok(()),
            }
        }
    }

    // ======================================================================
    // Expression visiting
    // ======================================================================

    /// Walk a parsed expression tree, emitting uses, assignments, and
    /// deferred function/class events in source order.
    fn visit_expression(
        &mut self,
        ast: ExpressionRef<'a>,
        v: &mut dyn ParseVisitor,
        context: VariableContext,
    ) {
        match *ast {
            Expression::Literal { .. }
            | Expression::This { .. }
            | Expression::Super { .. }
            | Expression::Invalid { .. } => {}
            Expression::Variable { name } => {
                if context == VariableContext::Rhs {
                    v.visit_variable_use(&name);
                }
            }
            Expression::New { children, .. }
            | Expression::Template { children, .. }
            | Expression::TaggedTemplate { children, .. }
            | Expression::Call { children, .. }
            | Expression::JsxElement { children, .. }
            | Expression::BinaryOperator { children } => {
                for &child in children {
                    self.visit_expression(child, v, VariableContext::Rhs);
                }
            }
            Expression::Array { children, .. } => {
                for &child in children {
                    self.visit_expression(child, v, context);
                }
            }
            Expression::Object { entries, .. } => {
                for entry in entries {
                    if let Some(property) = entry.property {
                        self.visit_expression(property, v, VariableContext::Rhs);
                    }
                    self.visit_expression(entry.value, v, context);
                }
            }
            Expression::UnaryOperator { child, .. }
            | Expression::Await { child, .. }
            | Expression::Spread { child, .. }
            | Expression::NonNullAssertion { child, .. } => {
                self.visit_expression(child, v, context);
            }
            Expression::Yield { child, .. } => {
                if let Some(child) = child {
                    self.visit_expression(child, v, VariableContext::Rhs);
                }
            }
            Expression::Dot { child, .. } => {
                self.visit_expression(child, v, VariableContext::Rhs);
            }
            Expression::Index {
                child, subscript, ..
            } => {
                self.visit_expression(child, v, VariableContext::Rhs);
                self.visit_expression(subscript, v, VariableContext::Rhs);
            }
            Expression::RwUnaryPrefix { child, .. }
            | Expression::RwUnarySuffix { child, .. } => {
                self.visit_expression(child, v, VariableContext::Rhs);
                self.maybe_visit_assignment(child, v);
            }
            Expression::Assignment { lhs, rhs } => {
                self.visit_assignment_expression(lhs, rhs, v);
            }
            Expression::UpdatingAssignment { lhs, rhs } => {
                self.visit_expression(lhs, v, VariableContext::Rhs);
                self.visit_expression(rhs, v, VariableContext::Rhs);
                self.maybe_visit_assignment(lhs, v);
            }
            Expression::Conditional {
                condition,
                true_branch,
                false_branch,
            } => {
                self.visit_expression(condition, v, VariableContext::Rhs);
                self.visit_expression(true_branch, v, VariableContext::Rhs);
                self.visit_expression(false_branch, v, VariableContext::Rhs);
            }
            Expression::ArrowFunctionWithExpression {
                attributes,
                parameters,
                return_type_visits,
                body,
                ..
            } => {
                v.visit_enter_function_scope();
                for &parameter in parameters {
                    self.visit_arrow_parameter(parameter, v, attributes);
                }
                if let Some(id) = return_type_visits {
                    self.take_visits(id).move_into(v);
                }
                v.visit_enter_function_scope_body();
                self.visit_expression(body, v, VariableContext::Rhs);
                v.visit_exit_function_scope();
            }
            Expression::ArrowFunctionWithStatements {
                attributes,
                parameters,
                visits,
                ..
            } => {
                v.visit_enter_function_scope();
                for &parameter in parameters {
                    self.visit_arrow_parameter(parameter, v, attributes);
                }
                self.take_visits(visits).move_into(v);
                v.visit_exit_function_scope();
            }
            Expression::Function { visits, .. } => {
                v.visit_enter_function_scope();
                self.take_visits(visits).move_into(v);
                v.visit_exit_function_scope();
            }
            Expression::NamedFunction { name, visits, .. } => {
                v.visit_enter_named_function_scope(&name);
                self.take_visits(visits).move_into(v);
                v.visit_exit_function_scope();
            }
            Expression::Class { visits, .. } => {
                self.take_visits(visits).move_into(v);
            }
            Expression::TypeAnnotated { child, visits, .. } => {
                self.visit_expression(child, v, context);
                self.take_visits(visits).move_into(v);
            }
        }
    }

    fn visit_assignment_expression(
        &mut self,
        lhs: ExpressionRef<'a>,
        rhs: ExpressionRef<'a>,
        v: &mut dyn ParseVisitor,
    ) {
        self.visit_expression(lhs, v, VariableContext::Lhs);
        self.visit_expression(rhs, v, VariableContext::Rhs);
        self.maybe_visit_assignment(lhs, v);
    }

    /// Emit assignment events for every variable target in an assignment's
    /// left-hand side.
    fn maybe_visit_assignment(&mut self, ast: ExpressionRef<'a>, v: &mut dyn ParseVisitor) {
        match *ast {
            Expression::Variable { name } => v.visit_variable_assignment(&name),
            Expression::Array { children, .. } => {
                for &child in children {
                    self.maybe_visit_assignment(child, v);
                }
            }
            Expression::Object { entries, .. } => {
                for entry in entries {
                    self.maybe_visit_assignment(entry.value, v);
                }
            }
            Expression::Spread { child, .. }
            | Expression::TypeAnnotated { child, .. }
            | Expression::NonNullAssertion { child, .. } => {
                self.maybe_visit_assignment(child, v);
            }
            // A nested `=` (a destructuring default) already emitted its
            // own assignment when visited.
            Expression::Assignment { .. } => {}
            _ => {}
        }
    }

    /// Declare an arrow-function parameter from its expression form,
    /// visiting default values and deferred type annotations first.
    fn visit_arrow_parameter(
        &mut self,
        parameter: ExpressionRef<'a>,
        v: &mut dyn ParseVisitor,
        attributes: FunctionAttributes,
    ) {
        match *parameter {
            Expression::Variable { name } => {
                v.visit_variable_declaration(&name, VariableKind::Parameter);
            }
            Expression::NonNullAssertion { child, bang } => {
                self.report(Diag::NonNullAssertionNotAllowedInParameter { bang });
                self.visit_arrow_parameter(child, v, attributes);
            }
            Expression::Assignment { lhs, rhs } => {
                self.visit_expression(rhs, v, VariableContext::Rhs);
                self.visit_arrow_parameter(lhs, v, attributes);
            }
            Expression::Spread { child, .. } => {
                self.visit_arrow_parameter(child, v, attributes);
            }
            Expression::Array { children, .. } => {
                for &child in children {
                    self.visit_arrow_parameter(child, v, attributes);
                }
            }
            Expression::Object { entries, .. } => {
                for entry in entries {
                    if let Some(property) = entry.property {
                        self.visit_expression(property, v, VariableContext::Rhs);
                    }
                    self.visit_arrow_parameter(entry.value, v, attributes);
                }
            }
            Expression::TypeAnnotated { child, visits, .. } => {
                self.take_visits(visits).move_into(v);
                self.visit_arrow_parameter(child, v, attributes);
            }
            Expression::Invalid { .. } => {}
            _ => {
                self.visit_expression(parameter, v, VariableContext::Rhs);
            }
        }
    }
}

/// Whether this token can begin an expression statement.
fn starts_expression(kind: TokenKind) -> bool {
    use TokenKind::*;
    kind.is_identifier_like()
        || matches!(
            kind,
            Number
                | BigInt
                | String
                | CompleteTemplate
                | TemplateHead
                | ThisKeyword
                | SuperKeyword
                | NewKeyword
                | TypeofKeyword
                | DeleteKeyword
                | VoidKeyword
                | TrueKeyword
                | FalseKeyword
                | NullKeyword
                | ImportKeyword
                | OpenParen
                | OpenBracket
                | Minus
                | Plus
                | Exclamation
                | Tilde
                | PlusPlus
                | MinusMinus
                | Slash
                | SlashEquals
                | LessThan
                | DotDotDot
                | Equals
        )
}

/// RAII guard returned by [`Parser::enter_function`]. Dereferences to the
/// parser; restores the saved function attributes when dropped.
pub struct FunctionGuard<'p, 'a, 'r> {
    parser: &'p mut Parser<'a, 'r>,
    saved: FunctionAttributes,
}

impl<'p, 'a, 'r> Deref for FunctionGuard<'p, 'a, 'r> {
    type Target = Parser<'a, 'r>;

    fn deref(&self) -> &Self::Target {
        self.parser
    }
}

impl<'p, 'a, 'r> DerefMut for FunctionGuard<'p, 'a, 'r> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.parser
    }
}

impl<'p, 'a, 'r> Drop for FunctionGuard<'p, 'a, 'r> {
    fn drop(&mut self) {
        self.parser.attributes = self.saved;
    }
}
