//! Parser: builds a concrete syntax tree from a token stream.
//!
//! A hand-written recursive descent parser for statements with a
//! precedence-climbing loop for expressions. The parser never fails: every
//! problem becomes a diagnostic plus an error node or a missing token, and
//! every byte of the input ends up in exactly one leaf of the tree.
//!
//! The grammar methods are split across modules by area:
//! - `statements` - statement dispatch and single-line statements
//! - `blocks` - `If`, `Select Case`, loops and `With`
//! - `declarations` - procedures, types, enums and variable declarations
//! - `expressions` - operators, postfix chains and argument lists

use crate::utilities::{BlockKind, BOUNDARY_KEYWORDS, END_BLOCK_KEYWORDS, MODIFIER_KEYWORDS};
use tracing::{debug, trace};
use vba_core::TextSpan;
use vba_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use vba_options::ParserOptions;
use vba_scanner::{LexedToken, TokenStream};
use vba_syntax::{resolve_keyword, FieldName, NodeFlags, SyntaxKind, SyntaxTree, TokenFlags, TreeBuilder};

pub struct Parser<'a> {
    source: &'a [u8],
    tokens: Vec<LexedToken>,
    pos: usize,
    pub(crate) builder: TreeBuilder,
    diagnostics: DiagnosticCollection,
    /// Blocks awaiting their terminator, innermost last.
    pub(crate) open_blocks: Vec<BlockKind>,
    depth: u32,
    pub(crate) options: ParserOptions,
    /// Significant tokens consumed so far, for the token budget.
    consumed: usize,
    /// Inside a single-line `If`: statements end at `:` and the line ends
    /// the whole construct.
    pub(crate) single_line: bool,
    /// A `Next a, b` closed an inner `For`; the `, b` belongs to the next
    /// enclosing one.
    pub(crate) pending_next: bool,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a [u8], options: &ParserOptions) -> Self {
        let (tokens, trivia, lex_diagnostics) = TokenStream::lex(source).into_parts();
        let mut diagnostics = DiagnosticCollection::new();
        for diagnostic in lex_diagnostics {
            diagnostics.add(diagnostic);
        }
        Self {
            source,
            tokens,
            pos: 0,
            builder: TreeBuilder::new(source.to_vec(), trivia),
            diagnostics,
            open_blocks: Vec::new(),
            depth: 0,
            options: options.clone(),
            consumed: 0,
            single_line: false,
            pending_next: false,
        }
    }

    /// Parses the whole input as a module.
    pub fn parse_source_file(mut self) -> SyntaxTree {
        self.builder.start_node(SyntaxKind::SourceFile, None);
        self.parse_statement_list();
        if self.pos < self.eof_index() {
            self.skip_unparsed_input();
        }
        self.bump_end_of_file();
        self.builder.finish_node();

        self.diagnostics.sort();
        let consumed = self.consumed;
        let tree = self.builder.finish(self.diagnostics.into_diagnostics());
        debug!(
            tokens = consumed,
            nodes = tree.node_count(),
            diagnostics = tree.diagnostics().len(),
            "parsed source file"
        );
        tree
    }

    // ========================================================================
    // Token management
    // ========================================================================

    fn eof_index(&self) -> usize {
        self.tokens.len().saturating_sub(1)
    }

    pub(crate) fn budget_exhausted(&self) -> bool {
        self.options.max_tokens.is_some_and(|max| self.consumed >= max)
    }

    /// Kind of the token `n` positions ahead. Reads as end of file once the
    /// token budget is spent, which unwinds every open construct.
    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        if self.budget_exhausted() {
            return SyntaxKind::EndOfFile;
        }
        self.tokens
            .get(self.pos + n)
            .map_or(SyntaxKind::EndOfFile, |t| t.kind)
    }

    pub(crate) fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn nth_flags(&self, n: usize) -> TokenFlags {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenFlags::NONE, |t| t.flags)
    }

    pub(crate) fn current_flags(&self) -> TokenFlags {
        self.nth_flags(0)
    }

    pub(crate) fn current_span(&self) -> TextSpan {
        self.tokens
            .get(self.pos.min(self.eof_index()))
            .map_or(TextSpan::empty(self.source.len() as u32), |t| t.span)
    }

    pub(crate) fn nth_text(&self, n: usize) -> &'a [u8] {
        let source = self.source;
        self.tokens
            .get(self.pos + n)
            .map_or(&[][..], |t| t.span.slice(source))
    }

    pub(crate) fn current_text(&self) -> &'a [u8] {
        self.nth_text(0)
    }

    /// The keyword in `expected` the token `n` ahead spells, if it is a bare
    /// word. Keywords are only ever recognised against an expected set.
    pub(crate) fn nth_keyword_in(&self, n: usize, expected: &[SyntaxKind]) -> Option<SyntaxKind> {
        if self.nth(n) != SyntaxKind::Identifier {
            return None;
        }
        resolve_keyword(self.nth_text(n), expected)
    }

    pub(crate) fn current_keyword_in(&self, expected: &[SyntaxKind]) -> Option<SyntaxKind> {
        self.nth_keyword_in(0, expected)
    }

    pub(crate) fn nth_keyword(&self, n: usize, keyword: SyntaxKind) -> bool {
        self.nth_keyword_in(n, &[keyword]).is_some()
    }

    pub(crate) fn at_keyword(&self, keyword: SyntaxKind) -> bool {
        self.nth_keyword(0, keyword)
    }

    /// Whether the current token ends a line: a newline, end of file, or in
    /// a single-line `If` an `Else`.
    pub(crate) fn at_line_end(&self) -> bool {
        match self.current() {
            SyntaxKind::Newline | SyntaxKind::EndOfFile => true,
            _ => self.single_line && self.at_keyword(SyntaxKind::ElseKeyword),
        }
    }

    /// Whether the current token ends a statement.
    pub(crate) fn at_statement_end(&self) -> bool {
        self.at(SyntaxKind::ColonToken) || self.at_line_end()
    }

    /// Pushes the current token under `kind` and advances. End of file is
    /// never consumed here; it is pushed once when the tree is finished.
    /// Nothing is consumed once the token budget is spent.
    pub(crate) fn bump_as(&mut self, field: Option<FieldName>, kind: SyntaxKind) {
        if self.budget_exhausted() {
            return;
        }
        let Some(token) = self.tokens.get(self.pos).copied() else {
            return;
        };
        if token.kind == SyntaxKind::EndOfFile {
            return;
        }
        self.builder.token(field, kind, token.span, token.flags, token.trivia());
        self.pos += 1;
        self.consumed += 1;
    }

    pub(crate) fn bump(&mut self, field: Option<FieldName>) {
        if let Some(token) = self.tokens.get(self.pos) {
            let kind = token.kind;
            self.bump_as(field, kind);
        }
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind, field: Option<FieldName>) -> bool {
        if self.at(kind) {
            self.bump(field);
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_keyword(&mut self, keyword: SyntaxKind, field: Option<FieldName>) -> bool {
        if self.at_keyword(keyword) {
            self.bump_as(field, keyword);
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind, field: Option<FieldName>) -> bool {
        if self.eat(kind, field) {
            return true;
        }
        let text = kind.punctuation_text().unwrap_or_else(|| kind.name());
        self.error_at_current(&messages::_0_EXPECTED, &[text]);
        self.missing(field, kind);
        false
    }

    pub(crate) fn expect_keyword(&mut self, keyword: SyntaxKind, field: Option<FieldName>) -> bool {
        if self.eat_keyword(keyword, field) {
            return true;
        }
        let text = keyword.keyword_text().unwrap_or_default();
        self.error_at_current(&messages::_0_EXPECTED, &[text]);
        self.missing(field, keyword);
        false
    }

    /// Any word is accepted as a name, keyword spelling or not.
    pub(crate) fn expect_identifier(&mut self, field: Option<FieldName>) -> bool {
        if matches!(self.current(), SyntaxKind::Identifier | SyntaxKind::BracketedIdentifier) {
            self.bump(field);
            return true;
        }
        self.error_at_current(&messages::IDENTIFIER_EXPECTED, &[]);
        self.missing(field, SyntaxKind::Identifier);
        false
    }

    pub(crate) fn missing(&mut self, field: Option<FieldName>, kind: SyntaxKind) {
        if !self.budget_exhausted() {
            self.builder.missing_token(field, kind);
        }
    }

    fn bump_end_of_file(&mut self) {
        let Some(eof) = self.tokens.last().copied() else {
            return;
        };
        self.builder.token(None, SyntaxKind::EndOfFile, eof.span, eof.flags, eof.trivia());
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        if self.budget_exhausted() {
            return;
        }
        trace!(code = diagnostic.code, start = diagnostic.span.start, "{}", diagnostic.message_text);
        self.diagnostics.add(diagnostic);
    }

    pub(crate) fn error_at_current(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        let span = self.current_span();
        self.report(Diagnostic::new(span, message, args));
    }

    /// Reports at the current token unless the scanner already reported it.
    fn error_unless_lexical(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        if !self.at(SyntaxKind::BadToken) {
            self.error_at_current(message, args);
        }
    }

    pub(crate) fn current_text_lossy(&self) -> String {
        match self.current() {
            SyntaxKind::Newline => "end of line".to_string(),
            SyntaxKind::EndOfFile => "end of file".to_string(),
            _ => String::from_utf8_lossy(self.current_text()).into_owned(),
        }
    }

    // ========================================================================
    // Recovery
    // ========================================================================

    /// Statement terminator: a newline or `:`. Anything else left on the line
    /// is wrapped in an error node.
    pub(crate) fn parse_statement_end(&mut self) {
        match self.current() {
            SyntaxKind::ColonToken => self.bump(None),
            SyntaxKind::Newline if !self.single_line => self.bump(None),
            _ if self.at_line_end() => {}
            _ => {
                self.error_unless_lexical(&messages::END_OF_STATEMENT_EXPECTED, &[]);
                self.builder.start_node(SyntaxKind::Error, None);
                while !self.at_line_end() {
                    self.bump(None);
                }
                self.builder.finish_node();
                trace!(at = self.pos, "skipped trailing tokens");
                if !self.single_line {
                    self.eat(SyntaxKind::Newline, None);
                }
            }
        }
    }

    /// Wraps the rest of the line, including its newline, in an error node.
    pub(crate) fn error_line(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        self.error_unless_lexical(message, args);
        self.builder.start_node(SyntaxKind::Error, None);
        while !matches!(self.current(), SyntaxKind::Newline | SyntaxKind::EndOfFile) {
            self.bump(None);
        }
        if !self.single_line {
            self.eat(SyntaxKind::Newline, None);
        }
        self.builder.finish_node();
        trace!(at = self.pos, "isolated line as error");
    }

    /// Consumes tokens that cannot begin a statement into one error node,
    /// stopping at the first token that can. Always consumes at least one
    /// token.
    fn skip_unexpected_tokens(&mut self) {
        let text = self.current_text_lossy();
        self.error_unless_lexical(&messages::UNEXPECTED_TOKEN, &[&text]);
        self.builder.start_node(SyntaxKind::Error, None);
        loop {
            let before = self.pos;
            self.bump(None);
            if self.pos == before
                || self.at_line_end()
                || self.can_start_statement()
                || self.at_block_boundary()
            {
                break;
            }
        }
        self.builder.finish_node();
        trace!(at = self.pos, "skipped unexpected tokens");
    }

    /// Leaves the rest of the input, past the token budget, in one error
    /// node.
    fn skip_unparsed_input(&mut self) {
        let eof = self.eof_index();
        let Some(first) = self.tokens.get(self.pos).copied() else {
            return;
        };
        let end = self.tokens.get(eof - 1).map_or(first.span.end(), |t| t.span.end());
        self.builder.start_node(SyntaxKind::Error, None);
        while self.pos < eof {
            let token = self.tokens[self.pos];
            self.builder.token(None, token.kind, token.span, token.flags, token.trivia());
            self.pos += 1;
        }
        self.builder.finish_node();

        let budget = self.options.max_tokens.unwrap_or(self.consumed).to_string();
        self.diagnostics.add(Diagnostic::new(
            TextSpan::from_bounds(first.span.start, end),
            &messages::TOKEN_BUDGET_EXHAUSTED,
            &[&budget],
        ));
        trace!(budget = %budget, "token budget exhausted");
    }

    /// An error node over the rest of the line when nesting is too deep.
    pub(crate) fn skip_too_deep(&mut self, field: Option<FieldName>) {
        self.error_at_current(&messages::NESTING_TOO_DEEP, &[]);
        self.builder.start_node(SyntaxKind::Error, field);
        while !matches!(self.current(), SyntaxKind::Newline | SyntaxKind::EndOfFile) {
            self.bump(None);
        }
        self.builder.finish_node();
        trace!(depth = self.depth, "nesting limit reached");
    }

    /// Increments the nesting depth, or returns false at the limit.
    pub(crate) fn enter(&mut self) -> bool {
        if self.depth >= self.options.max_depth {
            return false;
        }
        self.depth += 1;
        true
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Runs a block construct parser one nesting level deeper.
    pub(crate) fn nested(&mut self, parse: impl FnOnce(&mut Self)) {
        if !self.enter() {
            self.error_line(&messages::NESTING_TOO_DEEP, &[]);
            return;
        }
        parse(self);
        self.leave();
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    /// Parses statements until end of file or a token that closes an open
    /// block. Every iteration consumes at least one token.
    pub(crate) fn parse_statement_list(&mut self) {
        loop {
            if self.at(SyntaxKind::EndOfFile) || self.at_block_boundary() {
                break;
            }
            if self.single_line && self.at_line_end() {
                break;
            }
            let before = self.pos;
            self.parse_statement();
            if self.pos == before {
                self.skip_unexpected_tokens();
            }
        }
    }

    /// A `Block` node holding the statements of a body.
    pub(crate) fn parse_block(&mut self) {
        self.builder.start_node(SyntaxKind::Block, Some(FieldName::Body));
        self.parse_statement_list();
        self.builder.finish_node();
    }

    pub(crate) fn is_open(&self, block: BlockKind) -> bool {
        self.open_blocks.contains(&block)
    }

    pub(crate) fn in_procedure(&self) -> bool {
        self.open_blocks.iter().any(|b| b.is_procedure())
    }

    /// Whether the current token closes or splits some open block, or starts
    /// a procedure while one is still open.
    pub(crate) fn at_block_boundary(&self) -> bool {
        if self.open_blocks.is_empty() {
            return false;
        }
        if self.pending_next && self.at(SyntaxKind::CommaToken) {
            return true;
        }
        if self.nth(1) == SyntaxKind::EqualsToken {
            return false;
        }
        let Some(keyword) = self.current_keyword_in(BOUNDARY_KEYWORDS) else {
            return false;
        };
        match keyword {
            SyntaxKind::EndKeyword => self
                .nth_keyword_in(1, END_BLOCK_KEYWORDS)
                .and_then(BlockKind::from_end_keyword)
                .is_some_and(|block| self.is_open(block)),
            SyntaxKind::ElseKeyword | SyntaxKind::ElseIfKeyword => self.is_open(BlockKind::If),
            SyntaxKind::CaseKeyword => self.is_open(BlockKind::Select),
            SyntaxKind::NextKeyword => self.is_open(BlockKind::For),
            SyntaxKind::LoopKeyword => self.is_open(BlockKind::Do),
            SyntaxKind::WendKeyword => self.is_open(BlockKind::While),
            _ => self.in_procedure() && self.at_procedure_start(),
        }
    }

    /// Number of modifier keywords at the cursor.
    pub(crate) fn modifier_count(&self) -> usize {
        let mut n = 0;
        while self.nth_keyword_in(n, MODIFIER_KEYWORDS).is_some() {
            n += 1;
        }
        n
    }

    pub(crate) fn at_procedure_start(&self) -> bool {
        let n = self.modifier_count();
        self.nth_keyword_in(
            n,
            &[SyntaxKind::SubKeyword, SyntaxKind::FunctionKeyword, SyntaxKind::PropertyKeyword],
        )
        .is_some()
    }

    /// Consumes the terminator of `block`, or records it as missing with a
    /// diagnostic pointing at `opener`. Returns the flags to close the
    /// construct's node with.
    pub(crate) fn expect_block_end(&mut self, block: BlockKind, opener: TextSpan) -> NodeFlags {
        let found = match block.end_keyword() {
            Some(keyword) => {
                if self.at_keyword(SyntaxKind::EndKeyword) && self.nth_keyword(1, keyword) {
                    self.bump_as(None, SyntaxKind::EndKeyword);
                    self.bump_as(None, keyword);
                    true
                } else {
                    false
                }
            }
            None => self.eat_keyword(block.closing_keyword(), None),
        };
        if found {
            return NodeFlags::NONE;
        }
        self.missing_terminator(block, opener);
        NodeFlags::INCOMPLETE
    }

    /// Synthesizes the terminator of `block` as missing tokens.
    pub(crate) fn missing_terminator(&mut self, block: BlockKind, opener: TextSpan) {
        if self.budget_exhausted() {
            return;
        }
        self.missing(None, block.closing_keyword());
        if let Some(keyword) = block.end_keyword() {
            self.missing(None, keyword);
        }
        let here = Diagnostic::new(
            TextSpan::empty(self.current_span().start),
            &messages::_0_EXPECTED_HERE,
            &[block.terminator_text()],
        );
        self.report(
            Diagnostic::new(
                opener,
                &messages::_0_IS_MISSING_1,
                &[block.opener_text(), block.terminator_text()],
            )
            .with_related(here),
        );
    }

    /// Reports a terminator or clause keyword with no open block to close
    /// and isolates its line.
    pub(crate) fn stray_terminator(&mut self, found: &str, opener: &str) {
        self.error_line(&messages::_0_WITHOUT_1, &[found, opener]);
    }

    /// Reports a construct that may only appear at module level when it
    /// shows up inside a block. The construct is still parsed.
    pub(crate) fn check_module_level(&mut self, construct: &str) {
        if !self.open_blocks.is_empty() {
            self.error_at_current(&messages::_0_ONLY_ALLOWED_AT_MODULE_LEVEL, &[construct]);
        }
    }

    /// In the minimal dialect, isolates a construct it lacks and returns
    /// true.
    pub(crate) fn reject_in_minimal(&mut self, construct: &str) -> bool {
        if !self.options.is_minimal() {
            return false;
        }
        self.error_line(&messages::_0_IS_NOT_SUPPORTED_IN_THE_MINIMAL_DIALECT, &[construct]);
        true
    }
}
