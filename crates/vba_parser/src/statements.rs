//! Statement dispatch and statements without a body.
//!
//! Keywords are contextual: a word is only treated as a statement keyword
//! once the words around it rule out a use as a name. A word followed by `=`
//! is always an assignment target, and a word followed by `:` at the start
//! of a line is a label unless it is a complete statement on its own.

use crate::expressions::PostfixMode;
use crate::parser::Parser;
use crate::precedence::{is_infix_only_operator, OperatorPrecedence};
use crate::utilities::{
    BlockKind, END_BLOCK_KEYWORDS, EXIT_TARGET_KEYWORDS, NON_OPERAND_KEYWORDS, STANDALONE_KEYWORDS,
    STATEMENT_KEYWORDS,
};
use vba_diagnostics::messages;
use vba_syntax::{FieldName, SyntaxKind, TokenFlags};

impl Parser<'_> {
    /// Parses one statement. Consumes nothing when no statement can start at
    /// the current token; the caller recovers.
    pub(crate) fn parse_statement(&mut self) {
        match self.current() {
            SyntaxKind::Newline | SyntaxKind::ColonToken => {
                self.parse_empty_statement();
                return;
            }
            SyntaxKind::NumberLiteral if self.current_flags().contains(TokenFlags::AT_LINE_START) => {
                self.parse_line_number();
                return;
            }
            SyntaxKind::BracketedIdentifier | SyntaxKind::DotToken => {
                self.parse_expression_statement();
                return;
            }
            SyntaxKind::Identifier => {}
            _ => return,
        }

        if self.nth(1) == SyntaxKind::EqualsToken {
            self.parse_expression_statement();
            return;
        }
        let keyword = self.current_keyword_in(STATEMENT_KEYWORDS);
        if self.nth(1) == SyntaxKind::ColonToken
            && self.current_flags().contains(TokenFlags::AT_LINE_START)
            && !keyword.is_some_and(|k| STANDALONE_KEYWORDS.contains(&k))
        {
            self.parse_label_statement();
            return;
        }
        let Some(keyword) = keyword else {
            if self.current_keyword_in(NON_OPERAND_KEYWORDS).is_none() {
                self.parse_expression_statement();
            }
            return;
        };

        match keyword {
            SyntaxKind::DimKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::PublicKeyword
            | SyntaxKind::PrivateKeyword
            | SyntaxKind::FriendKeyword
            | SyntaxKind::GlobalKeyword
            | SyntaxKind::StaticKeyword
            | SyntaxKind::SubKeyword
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::PropertyKeyword
            | SyntaxKind::DeclareKeyword => self.parse_declaration(),
            SyntaxKind::TypeKeyword | SyntaxKind::EnumKeyword => {
                if matches!(self.nth(1), SyntaxKind::Identifier | SyntaxKind::BracketedIdentifier) {
                    self.parse_declaration();
                }
            }
            SyntaxKind::OptionKeyword => self.parse_option_statement(),
            SyntaxKind::AttributeKeyword => self.parse_attribute_statement(),
            SyntaxKind::IfKeyword => self.nested(Self::parse_if_statement),
            SyntaxKind::SelectKeyword => {
                if self.nth_keyword(1, SyntaxKind::CaseKeyword) && !self.reject_in_minimal("Select Case") {
                    self.nested(Self::parse_select_case_statement);
                }
            }
            SyntaxKind::ForKeyword => self.nested(Self::parse_for_statement),
            SyntaxKind::WhileKeyword => self.nested(Self::parse_while_statement),
            SyntaxKind::DoKeyword => self.nested(Self::parse_do_statement),
            SyntaxKind::WithKeyword => {
                if !self.reject_in_minimal("With") {
                    self.nested(Self::parse_with_statement);
                }
            }
            SyntaxKind::ExitKeyword => self.parse_exit_statement(),
            SyntaxKind::ErrorKeyword => {
                if !self.reject_in_minimal("Error") {
                    self.parse_error_statement();
                }
            }
            SyntaxKind::OnKeyword => {
                if !self.nth_keyword(1, SyntaxKind::ErrorKeyword) {
                    self.parse_expression_statement();
                } else if !self.reject_in_minimal("On Error") {
                    self.parse_on_error_statement();
                }
            }
            SyntaxKind::ResumeKeyword => {
                if !self.reject_in_minimal("Resume") {
                    self.parse_resume_statement();
                }
            }
            SyntaxKind::ReDimKeyword => self.parse_redim_statement(),
            SyntaxKind::EraseKeyword => self.parse_erase_statement(),
            SyntaxKind::GoToKeyword => self.parse_goto_statement(),
            SyntaxKind::StopKeyword => self.parse_keyword_statement(SyntaxKind::StopStatement, keyword),
            SyntaxKind::EndKeyword => match self.nth_keyword_in(1, END_BLOCK_KEYWORDS) {
                Some(closed) => {
                    let found = format!("End {}", closed.keyword_text().unwrap_or_default());
                    let opener = BlockKind::from_end_keyword(closed).map_or("", BlockKind::opener_text);
                    self.stray_terminator(&found, opener);
                }
                None => self.parse_keyword_statement(SyntaxKind::EndStatement, keyword),
            },
            SyntaxKind::ElseKeyword => self.stray_terminator("Else", "If"),
            SyntaxKind::ElseIfKeyword => self.stray_terminator("ElseIf", "If"),
            SyntaxKind::CaseKeyword => self.stray_terminator("Case", "Select Case"),
            SyntaxKind::NextKeyword => self.stray_terminator("Next", "For"),
            SyntaxKind::LoopKeyword => self.stray_terminator("Loop", "Do"),
            SyntaxKind::WendKeyword => self.stray_terminator("Wend", "While"),
            SyntaxKind::NameKeyword => {
                if matches!(self.nth(1), SyntaxKind::DotToken | SyntaxKind::OpenParenToken) {
                    self.parse_expression_statement();
                } else {
                    self.parse_name_statement();
                }
            }
            SyntaxKind::CallKeyword => self.parse_call_statement(),
            SyntaxKind::SetKeyword | SyntaxKind::LetKeyword => self.parse_assignment_statement(keyword),
            _ => self.parse_expression_statement(),
        }
    }

    /// Whether a statement can begin at the current token. Used to end
    /// error recovery.
    pub(crate) fn can_start_statement(&self) -> bool {
        match self.current() {
            SyntaxKind::Newline
            | SyntaxKind::ColonToken
            | SyntaxKind::DotToken
            | SyntaxKind::BracketedIdentifier => true,
            SyntaxKind::NumberLiteral => self.current_flags().contains(TokenFlags::AT_LINE_START),
            SyntaxKind::Identifier => {
                self.current_keyword_in(NON_OPERAND_KEYWORDS).is_none()
                    || self.current_keyword_in(STATEMENT_KEYWORDS).is_some()
            }
            _ => false,
        }
    }

    /// A blank line, or a `:` with nothing before it.
    pub(crate) fn parse_empty_statement(&mut self) {
        self.builder.start_node(SyntaxKind::EmptyStatement, None);
        self.bump(None);
        self.builder.finish_node();
    }

    /// `name:` at the start of a line. The colon also separates it from any
    /// statement that follows on the same line.
    fn parse_label_statement(&mut self) {
        self.builder.start_node(SyntaxKind::LabelStatement, None);
        self.bump(Some(FieldName::Label));
        self.bump(None);
        self.builder.finish_node();
    }

    /// A line number label such as `100 x = 1`.
    fn parse_line_number(&mut self) {
        self.builder.start_node(SyntaxKind::LabelStatement, None);
        self.bump(Some(FieldName::Label));
        self.eat(SyntaxKind::ColonToken, None);
        self.builder.finish_node();
    }

    fn parse_keyword_statement(&mut self, kind: SyntaxKind, keyword: SyntaxKind) {
        self.builder.start_node(kind, None);
        self.bump_as(None, keyword);
        self.parse_statement_end();
        self.builder.finish_node();
    }

    /// A statement that starts with an expression: an assignment
    /// (`x.y(1) = 2`) or a call, with or without bare arguments
    /// (`MsgBox "hi", vbOKOnly`).
    fn parse_expression_statement(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.parse_postfix_expression(None, PostfixMode::StatementTarget);

        if self.at(SyntaxKind::EqualsToken) {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::AssignmentStatement, Some(FieldName::Target));
            self.bump(None);
            self.parse_expression(Some(FieldName::Value));
        } else {
            let infix = self
                .current_binary_operator()
                .is_some_and(|(operator, _)| is_infix_only_operator(operator));
            if infix {
                // An operator expression is not a statement; keep it in one
                // piece under the call.
                self.error_at_current(&messages::_0_EXPECTED, &["="]);
                self.parse_binary_rest(checkpoint, OperatorPrecedence::Lowest);
            } else if self.can_start_expression() || self.at(SyntaxKind::CommaToken) {
                self.parse_argument_list(false);
            }
            self.builder
                .start_node_at(checkpoint, SyntaxKind::CallStatement, Some(FieldName::Target));
        }
        self.parse_statement_end();
        self.builder.finish_node();
    }

    /// `Set x = y` and `Let x = y`.
    fn parse_assignment_statement(&mut self, keyword: SyntaxKind) {
        self.builder.start_node(SyntaxKind::AssignmentStatement, None);
        self.bump_as(None, keyword);
        self.parse_postfix_expression(Some(FieldName::Target), PostfixMode::Expression);
        self.expect(SyntaxKind::EqualsToken, None);
        self.parse_expression(Some(FieldName::Value));
        self.parse_statement_end();
        self.builder.finish_node();
    }

    fn parse_call_statement(&mut self) {
        self.builder.start_node(SyntaxKind::CallStatement, None);
        self.bump_as(None, SyntaxKind::CallKeyword);
        self.parse_postfix_expression(Some(FieldName::Target), PostfixMode::Expression);
        self.parse_statement_end();
        self.builder.finish_node();
    }

    /// `Exit Sub`, `Exit For`, ... The exited construct is recorded under
    /// `construct` for later validation.
    fn parse_exit_statement(&mut self) {
        self.builder.start_node(SyntaxKind::ExitStatement, None);
        self.bump_as(None, SyntaxKind::ExitKeyword);
        match self.current_keyword_in(EXIT_TARGET_KEYWORDS) {
            Some(target) => self.bump_as(Some(FieldName::Construct), target),
            None => {
                self.error_at_current(&messages::_0_EXPECTED, &["Sub"]);
                self.missing(Some(FieldName::Construct), SyntaxKind::SubKeyword);
            }
        }
        self.parse_statement_end();
        self.builder.finish_node();
    }

    fn parse_error_statement(&mut self) {
        self.builder.start_node(SyntaxKind::ErrorStatement, None);
        self.bump_as(None, SyntaxKind::ErrorKeyword);
        self.parse_expression(Some(FieldName::Value));
        self.parse_statement_end();
        self.builder.finish_node();
    }

    /// `On Error GoTo label`, `On Error GoTo 0`, `On Error GoTo -1` and
    /// `On Error Resume Next`.
    fn parse_on_error_statement(&mut self) {
        self.builder.start_node(SyntaxKind::OnErrorStatement, None);
        self.bump_as(None, SyntaxKind::OnKeyword);
        self.bump_as(None, SyntaxKind::ErrorKeyword);
        if self.eat_keyword(SyntaxKind::GoToKeyword, None) {
            self.parse_jump_label();
        } else if self.eat_keyword(SyntaxKind::ResumeKeyword, None) {
            self.expect_keyword(SyntaxKind::NextKeyword, None);
        } else {
            self.error_at_current(&messages::_0_EXPECTED, &["GoTo"]);
            self.missing(None, SyntaxKind::GoToKeyword);
        }
        self.parse_statement_end();
        self.builder.finish_node();
    }

    /// A label, a line number, or `-1`.
    fn parse_jump_label(&mut self) {
        match self.current() {
            SyntaxKind::Identifier | SyntaxKind::BracketedIdentifier | SyntaxKind::NumberLiteral => {
                self.bump(Some(FieldName::Label));
            }
            SyntaxKind::MinusToken if self.nth(1) == SyntaxKind::NumberLiteral => {
                self.builder.start_node(SyntaxKind::UnaryExpression, Some(FieldName::Label));
                self.bump(Some(FieldName::Operator));
                self.bump(Some(FieldName::Argument));
                self.builder.finish_node();
            }
            _ => {
                self.error_at_current(&messages::IDENTIFIER_EXPECTED, &[]);
                self.missing(Some(FieldName::Label), SyntaxKind::Identifier);
            }
        }
    }

    /// `Resume`, `Resume Next`, `Resume label`.
    fn parse_resume_statement(&mut self) {
        self.builder.start_node(SyntaxKind::ResumeStatement, None);
        self.bump_as(None, SyntaxKind::ResumeKeyword);
        if !self.eat_keyword(SyntaxKind::NextKeyword, None)
            && matches!(
                self.current(),
                SyntaxKind::Identifier | SyntaxKind::BracketedIdentifier | SyntaxKind::NumberLiteral
            )
        {
            self.bump(Some(FieldName::Label));
        }
        self.parse_statement_end();
        self.builder.finish_node();
    }

    fn parse_goto_statement(&mut self) {
        self.builder.start_node(SyntaxKind::GotoStatement, None);
        self.bump_as(None, SyntaxKind::GoToKeyword);
        self.parse_jump_label();
        self.parse_statement_end();
        self.builder.finish_node();
    }

    /// `ReDim [Preserve] a(1 To n) [As T], b(m)`.
    fn parse_redim_statement(&mut self) {
        self.builder.start_node(SyntaxKind::RedimStatement, None);
        self.bump_as(None, SyntaxKind::ReDimKeyword);
        self.eat_keyword(SyntaxKind::PreserveKeyword, Some(FieldName::Modifier));
        loop {
            self.builder.start_node(SyntaxKind::RedimTarget, None);
            self.parse_postfix_expression(Some(FieldName::Name), PostfixMode::NoCall);
            if self.at(SyntaxKind::OpenParenToken) {
                self.parse_array_dimensions();
            } else {
                self.error_at_current(&messages::_0_EXPECTED, &["("]);
            }
            if self.eat_keyword(SyntaxKind::AsKeyword, None) {
                self.parse_type_reference(Some(FieldName::Type));
            }
            self.builder.finish_node();
            if !self.eat(SyntaxKind::CommaToken, None) {
                break;
            }
        }
        self.parse_statement_end();
        self.builder.finish_node();
    }

    fn parse_erase_statement(&mut self) {
        self.builder.start_node(SyntaxKind::EraseStatement, None);
        self.bump_as(None, SyntaxKind::EraseKeyword);
        loop {
            self.parse_expression(Some(FieldName::Argument));
            if !self.eat(SyntaxKind::CommaToken, None) {
                break;
            }
        }
        self.parse_statement_end();
        self.builder.finish_node();
    }

    /// `Name oldPath As newPath`.
    fn parse_name_statement(&mut self) {
        self.builder.start_node(SyntaxKind::NameStatement, None);
        self.bump_as(None, SyntaxKind::NameKeyword);
        self.parse_expression(Some(FieldName::Value));
        self.expect_keyword(SyntaxKind::AsKeyword, None);
        self.parse_expression(Some(FieldName::Target));
        self.parse_statement_end();
        self.builder.finish_node();
    }
}
