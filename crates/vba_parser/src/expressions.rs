//! Expression parsing.
//!
//! Precedence climbing over unary operands. An operand is a primary extended
//! left to right by `.member` and `(arguments)` suffixes, so `a.b(x).c` is
//! one chain. A missing operand becomes an empty error node and the
//! enclosing statement carries on.

use crate::parser::Parser;
use crate::precedence::{
    get_binary_operator_precedence, is_unary_operator, OperatorPrecedence, KEYWORD_OPERATORS,
};
use crate::utilities::{LITERAL_KEYWORDS, NON_OPERAND_KEYWORDS};
use tracing::trace;
use vba_diagnostics::messages;
use vba_syntax::{Checkpoint, FieldName, SyntaxKind, TokenFlags};

/// How far a postfix chain may extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PostfixMode {
    /// Every `.` and `(` extends the chain.
    Expression,
    /// The target of a statement: a `(` or `.` after whitespace starts a
    /// bare argument instead (`Foo (x)`, `Debug.Print .Value`).
    StatementTarget,
    /// No call suffix. Used where parentheses hold array bounds.
    NoCall,
}

impl Parser<'_> {
    pub(crate) fn parse_expression(&mut self, field: Option<FieldName>) {
        self.parse_binary_expression(OperatorPrecedence::Lowest, field);
    }

    fn parse_binary_expression(&mut self, min: OperatorPrecedence, field: Option<FieldName>) {
        let checkpoint = self.builder.checkpoint();
        self.parse_unary_expression(field);
        self.parse_binary_rest(checkpoint, min);
    }

    /// Extends the operand that starts at `checkpoint` with binary operators
    /// binding tighter than `min`. Stopping at equal precedence makes every
    /// operator left-associative.
    pub(crate) fn parse_binary_rest(&mut self, checkpoint: Checkpoint, min: OperatorPrecedence) {
        while let Some((operator, precedence)) = self.current_binary_operator() {
            if precedence <= min {
                break;
            }
            self.builder
                .start_node_at(checkpoint, SyntaxKind::BinaryExpression, Some(FieldName::Left));
            self.bump_as(Some(FieldName::Operator), operator);
            self.parse_binary_expression(precedence, Some(FieldName::Right));
            self.builder.finish_node();
        }
    }

    pub(crate) fn current_binary_operator(&self) -> Option<(SyntaxKind, OperatorPrecedence)> {
        let kind = match self.current() {
            SyntaxKind::Identifier => self.current_keyword_in(KEYWORD_OPERATORS)?,
            kind => kind,
        };
        get_binary_operator_precedence(kind).map(|precedence| (kind, precedence))
    }

    fn parse_unary_expression(&mut self, field: Option<FieldName>) {
        if !self.enter() {
            self.skip_too_deep(field);
            return;
        }
        let operator = match self.current() {
            SyntaxKind::Identifier => self.current_keyword_in(&[SyntaxKind::NotKeyword]),
            kind => Some(kind).filter(|&k| is_unary_operator(k)),
        };
        match operator {
            Some(operator) => {
                self.builder.start_node(SyntaxKind::UnaryExpression, field);
                self.bump_as(Some(FieldName::Operator), operator);
                self.parse_unary_expression(Some(FieldName::Argument));
                self.builder.finish_node();
            }
            None => self.parse_postfix_expression(field, PostfixMode::Expression),
        }
        self.leave();
    }

    pub(crate) fn parse_postfix_expression(&mut self, field: Option<FieldName>, mode: PostfixMode) {
        let checkpoint = self.builder.checkpoint();
        if !self.parse_primary_expression(field) {
            return;
        }
        let spaced = |p: &Self| p.current_flags().contains(TokenFlags::PRECEDING_WHITESPACE);
        loop {
            match self.current() {
                SyntaxKind::DotToken => {
                    if mode == PostfixMode::StatementTarget && spaced(self) {
                        break;
                    }
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::MemberAccess, Some(FieldName::Object));
                    self.bump(None);
                    self.expect_identifier(Some(FieldName::Member));
                    self.builder.finish_node();
                }
                SyntaxKind::OpenParenToken => {
                    match mode {
                        PostfixMode::NoCall => break,
                        PostfixMode::StatementTarget if spaced(self) && !self.paren_followed_by_equals() => break,
                        _ => {}
                    }
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::CallExpression, Some(FieldName::Function));
                    self.parse_argument_list(true);
                    self.builder.finish_node();
                }
                _ => break,
            }
        }
    }

    /// Whether the parenthesised group at the cursor is followed by `=`, as
    /// in `x.Item (1) = 5`, where it indexes the target after all. The scan
    /// ends with the group or the statement, so it stays linear on lines of
    /// many unclosed calls.
    fn paren_followed_by_equals(&self) -> bool {
        let mut depth = 0usize;
        let mut n = 0;
        loop {
            match self.nth(n) {
                SyntaxKind::OpenParenToken => depth += 1,
                SyntaxKind::CloseParenToken => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return self.nth(n + 1) == SyntaxKind::EqualsToken;
                    }
                }
                SyntaxKind::ColonToken | SyntaxKind::Newline | SyntaxKind::EndOfFile => return false,
                _ if self.single_line && self.nth_keyword(n, SyntaxKind::ElseKeyword) => return false,
                _ => {}
            }
            n += 1;
        }
    }

    /// Returns false when no operand was found and an error node stands in
    /// for it.
    fn parse_primary_expression(&mut self, field: Option<FieldName>) -> bool {
        match self.current() {
            SyntaxKind::Identifier => {
                if let Some(literal) = self.current_keyword_in(LITERAL_KEYWORDS) {
                    self.bump_as(field, literal);
                } else if self.at_keyword(SyntaxKind::NewKeyword) {
                    self.parse_new_expression(field);
                } else if self.current_keyword_in(NON_OPERAND_KEYWORDS).is_some() {
                    self.missing_operand(field);
                    return false;
                } else {
                    self.bump(field);
                }
                true
            }
            SyntaxKind::BracketedIdentifier
            | SyntaxKind::StringLiteral
            | SyntaxKind::NumberLiteral
            | SyntaxKind::BadToken => {
                self.bump(field);
                true
            }
            SyntaxKind::OpenParenToken => {
                self.builder.start_node(SyntaxKind::ParenthesizedExpression, field);
                self.bump(None);
                self.parse_expression(Some(FieldName::Expression));
                self.expect(SyntaxKind::CloseParenToken, None);
                self.builder.finish_node();
                true
            }
            // Leading-dot access on the object of an enclosing `With`.
            SyntaxKind::DotToken => {
                self.builder.start_node(SyntaxKind::MemberAccess, field);
                self.bump(None);
                self.expect_identifier(Some(FieldName::Member));
                self.builder.finish_node();
                true
            }
            _ => {
                self.missing_operand(field);
                false
            }
        }
    }

    fn missing_operand(&mut self, field: Option<FieldName>) {
        if self.budget_exhausted() {
            return;
        }
        self.error_at_current(&messages::EXPRESSION_EXPECTED, &[]);
        self.builder.empty_error_node(field);
        trace!(start = self.current_span().start, "missing operand");
    }

    fn parse_new_expression(&mut self, field: Option<FieldName>) {
        self.builder.start_node(SyntaxKind::NewExpression, field);
        self.bump_as(None, SyntaxKind::NewKeyword);
        self.parse_type_reference(Some(FieldName::Type));
        self.builder.finish_node();
    }

    /// `(a, , name := b)` after a callee, or without `parenthesized` the bare
    /// arguments of a call statement up to the end of the statement. An
    /// omitted argument leaves only its comma.
    pub(crate) fn parse_argument_list(&mut self, parenthesized: bool) {
        self.builder.start_node(SyntaxKind::ArgumentList, Some(FieldName::Arguments));
        if parenthesized {
            self.bump(None);
        }
        if !self.at_argument_list_end(parenthesized) {
            loop {
                if !self.at(SyntaxKind::CommaToken) {
                    self.parse_argument();
                }
                if !self.eat(SyntaxKind::CommaToken, None) || self.at_argument_list_end(parenthesized) {
                    break;
                }
            }
        }
        if parenthesized {
            self.expect(SyntaxKind::CloseParenToken, None);
        }
        self.builder.finish_node();
    }

    fn at_argument_list_end(&self, parenthesized: bool) -> bool {
        if parenthesized {
            self.at(SyntaxKind::CloseParenToken) || self.at_line_end()
        } else {
            self.at_statement_end()
        }
    }

    fn parse_argument(&mut self) {
        let named = matches!(self.current(), SyntaxKind::Identifier | SyntaxKind::BracketedIdentifier)
            && self.nth(1) == SyntaxKind::ColonEqualsToken;
        if !named {
            self.parse_expression(Some(FieldName::Argument));
            return;
        }
        self.builder.start_node(SyntaxKind::NamedArgument, Some(FieldName::Argument));
        self.bump(Some(FieldName::Name));
        self.bump(None);
        self.parse_expression(Some(FieldName::Value));
        self.builder.finish_node();
    }

    /// Whether the current token can begin an operand.
    pub(crate) fn can_start_expression(&self) -> bool {
        match self.current() {
            SyntaxKind::Identifier => self.current_keyword_in(NON_OPERAND_KEYWORDS).is_none(),
            SyntaxKind::BracketedIdentifier
            | SyntaxKind::StringLiteral
            | SyntaxKind::NumberLiteral
            | SyntaxKind::BadToken
            | SyntaxKind::OpenParenToken
            | SyntaxKind::DotToken
            | SyntaxKind::MinusToken
            | SyntaxKind::PlusToken => true,
            _ => false,
        }
    }
}
