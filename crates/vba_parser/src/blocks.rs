//! Compound statements: `If`, `Select Case`, `For`, `For Each`, `While`,
//! `Do` and `With`.
//!
//! Each construct pushes itself on the open-block stack while its body is
//! parsed, so a body stops at its own terminator or at the terminator of any
//! enclosing block. A terminator that never arrives is synthesized as
//! missing tokens and the construct is flagged incomplete.

use crate::expressions::PostfixMode;
use crate::parser::Parser;
use crate::utilities::BlockKind;
use vba_core::TextSpan;
use vba_diagnostics::{messages, Diagnostic};
use vba_syntax::{FieldName, NodeFlags, SyntaxKind};

impl Parser<'_> {
    /// Closes a construct whose body has been parsed: its terminator, the
    /// end of that line, then the node.
    pub(crate) fn finish_block(&mut self, block: BlockKind, opener: TextSpan) {
        let flags = self.expect_block_end(block, opener);
        if flags.is_empty() {
            self.parse_statement_end();
        }
        self.builder.finish_node_with(flags);
    }

    /// Parses a body with `block` open.
    fn parse_block_of(&mut self, block: BlockKind) {
        self.open_blocks.push(block);
        self.parse_block();
        self.open_blocks.pop();
    }

    // ========================================================================
    // If
    // ========================================================================

    /// Block `If` when `Then` ends the line, single-line `If` otherwise.
    pub(crate) fn parse_if_statement(&mut self) {
        let checkpoint = self.builder.checkpoint();
        let opener = self.current_span();
        self.bump_as(None, SyntaxKind::IfKeyword);
        self.parse_expression(Some(FieldName::Condition));
        self.expect_keyword(SyntaxKind::ThenKeyword, None);

        if matches!(self.current(), SyntaxKind::Newline | SyntaxKind::EndOfFile) {
            self.builder.start_node_at(checkpoint, SyntaxKind::IfStatement, None);
            self.parse_block_if_rest(opener);
        } else {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::SingleLineIfStatement, None);
            self.parse_single_line_if_rest();
        }
    }

    fn parse_block_if_rest(&mut self, opener: TextSpan) {
        self.parse_statement_end();
        self.open_blocks.push(BlockKind::If);
        self.parse_block();
        loop {
            if self.at_keyword(SyntaxKind::ElseIfKeyword) {
                self.builder.start_node(SyntaxKind::ElseIfClause, None);
                self.bump_as(None, SyntaxKind::ElseIfKeyword);
                self.parse_expression(Some(FieldName::Condition));
                self.expect_keyword(SyntaxKind::ThenKeyword, None);
                self.parse_statement_end();
                self.parse_block();
                self.builder.finish_node();
            } else if self.at_keyword(SyntaxKind::ElseKeyword) {
                self.builder.start_node(SyntaxKind::ElseClause, None);
                self.bump_as(None, SyntaxKind::ElseKeyword);
                if matches!(self.current(), SyntaxKind::Newline | SyntaxKind::ColonToken) {
                    self.parse_statement_end();
                }
                self.parse_block();
                self.builder.finish_node();
                break;
            } else {
                break;
            }
        }
        self.open_blocks.pop();
        self.finish_block(BlockKind::If, opener);
    }

    /// `If c Then s1: s2 Else s3`. Everything up to the end of the line
    /// belongs to the statement.
    fn parse_single_line_if_rest(&mut self) {
        let outer = self.single_line;
        self.single_line = true;
        self.parse_block();
        if self.at_keyword(SyntaxKind::ElseKeyword) {
            self.builder.start_node(SyntaxKind::ElseClause, None);
            self.bump_as(None, SyntaxKind::ElseKeyword);
            self.parse_block();
            self.builder.finish_node();
        }
        self.single_line = outer;
        self.parse_statement_end();
        self.builder.finish_node();
    }

    // ========================================================================
    // Select Case
    // ========================================================================

    pub(crate) fn parse_select_case_statement(&mut self) {
        self.builder.start_node(SyntaxKind::SelectCaseStatement, None);
        let opener = self.current_span();
        self.bump_as(None, SyntaxKind::SelectKeyword);
        self.bump_as(None, SyntaxKind::CaseKeyword);
        self.parse_expression(Some(FieldName::Value));
        self.parse_statement_end();

        self.open_blocks.push(BlockKind::Select);
        loop {
            if self.at(SyntaxKind::EndOfFile) || (self.single_line && self.at_line_end()) {
                break;
            }
            if self.at_keyword(SyntaxKind::CaseKeyword) && self.nth(1) != SyntaxKind::EqualsToken {
                self.parse_case_clause();
            } else if matches!(self.current(), SyntaxKind::Newline | SyntaxKind::ColonToken) {
                self.parse_empty_statement();
            } else if self.at_block_boundary() {
                break;
            } else {
                let text = self.current_text_lossy();
                self.error_line(&messages::UNEXPECTED_TOKEN, &[&text]);
            }
        }
        self.open_blocks.pop();
        self.finish_block(BlockKind::Select, opener);
    }

    fn parse_case_clause(&mut self) {
        if self.nth_keyword(1, SyntaxKind::ElseKeyword) {
            self.builder.start_node(SyntaxKind::CaseElseClause, None);
            self.bump_as(None, SyntaxKind::CaseKeyword);
            self.bump_as(None, SyntaxKind::ElseKeyword);
        } else {
            self.builder.start_node(SyntaxKind::CaseClause, None);
            self.bump_as(None, SyntaxKind::CaseKeyword);
            loop {
                self.parse_case_item();
                if !self.eat(SyntaxKind::CommaToken, None) {
                    break;
                }
            }
        }
        self.parse_statement_end();
        self.parse_block();
        self.builder.finish_node();
    }

    /// `expr`, `lo To hi` or `Is <op> expr`.
    fn parse_case_item(&mut self) {
        if self.at_keyword(SyntaxKind::IsKeyword) {
            self.builder.start_node(SyntaxKind::CaseIsExpression, Some(FieldName::Value));
            self.bump_as(None, SyntaxKind::IsKeyword);
            match self.current() {
                SyntaxKind::EqualsToken
                | SyntaxKind::LessThanGreaterThanToken
                | SyntaxKind::LessThanToken
                | SyntaxKind::LessThanEqualsToken
                | SyntaxKind::GreaterThanToken
                | SyntaxKind::GreaterThanEqualsToken => self.bump(Some(FieldName::Operator)),
                _ => {
                    self.error_at_current(&messages::_0_EXPECTED, &["="]);
                    self.missing(Some(FieldName::Operator), SyntaxKind::EqualsToken);
                }
            }
            self.parse_expression(Some(FieldName::Value));
            self.builder.finish_node();
            return;
        }
        let checkpoint = self.builder.checkpoint();
        self.parse_expression(Some(FieldName::Value));
        if self.at_keyword(SyntaxKind::ToKeyword) {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::RangeExpression, Some(FieldName::Start));
            self.bump_as(None, SyntaxKind::ToKeyword);
            self.parse_expression(Some(FieldName::End));
            self.builder.finish_node();
        }
    }

    // ========================================================================
    // Loops
    // ========================================================================

    /// `For v = a To b [Step c]` or `For Each v In xs`, closed by `Next`.
    pub(crate) fn parse_for_statement(&mut self) {
        let opener = self.current_span();
        let each = self.nth_keyword(1, SyntaxKind::EachKeyword);
        let kind = if each {
            SyntaxKind::ForEachStatement
        } else {
            SyntaxKind::ForStatement
        };
        self.builder.start_node(kind, None);
        self.bump_as(None, SyntaxKind::ForKeyword);
        if each {
            self.bump_as(None, SyntaxKind::EachKeyword);
            self.parse_postfix_expression(Some(FieldName::Var), PostfixMode::Expression);
            self.expect_keyword(SyntaxKind::InKeyword, None);
            self.parse_expression(Some(FieldName::Collection));
        } else {
            self.parse_postfix_expression(Some(FieldName::Var), PostfixMode::Expression);
            self.expect(SyntaxKind::EqualsToken, None);
            self.parse_expression(Some(FieldName::Start));
            self.expect_keyword(SyntaxKind::ToKeyword, None);
            self.parse_expression(Some(FieldName::End));
            if self.eat_keyword(SyntaxKind::StepKeyword, None) {
                self.parse_expression(Some(FieldName::Step));
            }
        }
        self.parse_statement_end();
        self.parse_block_of(BlockKind::For);
        let flags = self.parse_next_clause(opener);
        self.builder.finish_node_with(flags);
    }

    /// `Next`, `Next i`, or the `, i` left over from an inner loop's
    /// `Next j, i`.
    fn parse_next_clause(&mut self, opener: TextSpan) -> NodeFlags {
        if self.pending_next && self.at(SyntaxKind::CommaToken) {
            self.pending_next = false;
            self.bump(None);
        } else if !self.eat_keyword(SyntaxKind::NextKeyword, None) {
            self.missing_terminator(BlockKind::For, opener);
            return NodeFlags::INCOMPLETE;
        }
        if matches!(self.current(), SyntaxKind::Identifier | SyntaxKind::BracketedIdentifier) {
            self.bump(Some(FieldName::Var));
        }
        if self.at(SyntaxKind::CommaToken) && self.is_open(BlockKind::For) {
            self.pending_next = true;
        } else {
            self.parse_statement_end();
        }
        NodeFlags::NONE
    }

    pub(crate) fn parse_while_statement(&mut self) {
        self.builder.start_node(SyntaxKind::WhileStatement, None);
        let opener = self.current_span();
        self.bump_as(None, SyntaxKind::WhileKeyword);
        self.parse_expression(Some(FieldName::Condition));
        self.parse_statement_end();
        self.parse_block_of(BlockKind::While);
        self.finish_block(BlockKind::While, opener);
    }

    /// `Do [While|Until c] ... Loop [While|Until c]`. The condition may sit
    /// on either end but not both.
    pub(crate) fn parse_do_statement(&mut self) {
        self.builder.start_node(SyntaxKind::DoStatement, None);
        let opener = self.current_span();
        self.bump_as(None, SyntaxKind::DoKeyword);
        let pre_condition = self.parse_loop_condition();
        self.parse_statement_end();
        self.parse_block_of(BlockKind::Do);

        if !self.eat_keyword(SyntaxKind::LoopKeyword, None) {
            self.missing_terminator(BlockKind::Do, opener);
            self.builder.finish_node_with(NodeFlags::INCOMPLETE);
            return;
        }
        let condition_span = self.current_span();
        if self.parse_loop_condition() && pre_condition {
            self.report(Diagnostic::new(
                condition_span,
                &messages::DO_LOOP_CANNOT_HAVE_TWO_CONDITIONS,
                &[],
            ));
        }
        self.parse_statement_end();
        self.builder.finish_node();
    }

    fn parse_loop_condition(&mut self) -> bool {
        let Some(keyword) = self.current_keyword_in(&[SyntaxKind::WhileKeyword, SyntaxKind::UntilKeyword]) else {
            return false;
        };
        self.bump_as(None, keyword);
        self.parse_expression(Some(FieldName::Condition));
        true
    }

    // ========================================================================
    // With
    // ========================================================================

    pub(crate) fn parse_with_statement(&mut self) {
        self.builder.start_node(SyntaxKind::WithStatement, None);
        let opener = self.current_span();
        self.bump_as(None, SyntaxKind::WithKeyword);
        self.parse_expression(Some(FieldName::Object));
        self.parse_statement_end();
        self.parse_block_of(BlockKind::With);
        self.finish_block(BlockKind::With, opener);
    }
}
