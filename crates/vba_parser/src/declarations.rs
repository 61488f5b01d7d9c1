//! Declarations: procedures, `Type` and `Enum` blocks, `Declare`, `Option`,
//! `Attribute`, variables, constants, parameters and type references.

use crate::expressions::PostfixMode;
use crate::parser::Parser;
use crate::utilities::{BlockKind, MODIFIER_KEYWORDS};
use vba_diagnostics::messages;
use vba_syntax::{is_predefined_type, FieldName, SyntaxKind};

impl Parser<'_> {
    /// A statement that starts with modifiers or a declaring keyword. Looks
    /// past the modifiers to pick the construct.
    pub(crate) fn parse_declaration(&mut self) {
        let n = self.modifier_count();
        let keyword = self.nth_keyword_in(
            n,
            &[
                SyntaxKind::SubKeyword,
                SyntaxKind::FunctionKeyword,
                SyntaxKind::PropertyKeyword,
                SyntaxKind::TypeKeyword,
                SyntaxKind::EnumKeyword,
                SyntaxKind::DeclareKeyword,
                SyntaxKind::ConstKeyword,
            ],
        );
        match keyword {
            Some(SyntaxKind::SubKeyword) => self.parse_procedure(SyntaxKind::SubDefinition, BlockKind::Sub),
            Some(SyntaxKind::FunctionKeyword) => {
                self.parse_procedure(SyntaxKind::FunctionDefinition, BlockKind::Function)
            }
            Some(SyntaxKind::PropertyKeyword) => {
                let kind = match self.nth_keyword_in(
                    n + 1,
                    &[SyntaxKind::GetKeyword, SyntaxKind::LetKeyword, SyntaxKind::SetKeyword],
                ) {
                    Some(SyntaxKind::LetKeyword) => SyntaxKind::PropertyLetDefinition,
                    Some(SyntaxKind::SetKeyword) => SyntaxKind::PropertySetDefinition,
                    _ => SyntaxKind::PropertyGetDefinition,
                };
                self.parse_procedure(kind, BlockKind::Property);
            }
            Some(SyntaxKind::TypeKeyword) => self.parse_type_definition(),
            Some(SyntaxKind::EnumKeyword) => self.parse_enum_definition(),
            Some(SyntaxKind::DeclareKeyword) => self.parse_declare_statement(),
            Some(SyntaxKind::ConstKeyword) => self.parse_const_declaration(),
            _ => self.parse_variable_declaration(),
        }
    }

    fn parse_modifiers(&mut self) {
        while let Some(modifier) = self.current_keyword_in(MODIFIER_KEYWORDS) {
            self.bump_as(Some(FieldName::Modifier), modifier);
        }
    }

    // ========================================================================
    // Procedures
    // ========================================================================

    fn parse_procedure(&mut self, kind: SyntaxKind, block: BlockKind) {
        self.check_module_level(block.opener_text());
        self.builder.start_node(kind, None);
        self.parse_modifiers();

        let opener = self.current_span();
        let keyword = match block {
            BlockKind::Function => SyntaxKind::FunctionKeyword,
            BlockKind::Property => SyntaxKind::PropertyKeyword,
            _ => SyntaxKind::SubKeyword,
        };
        self.bump_as(None, keyword);
        if block == BlockKind::Property {
            match self.current_keyword_in(&[SyntaxKind::GetKeyword, SyntaxKind::LetKeyword, SyntaxKind::SetKeyword]) {
                Some(accessor) => self.bump_as(None, accessor),
                None => {
                    self.error_at_current(&messages::_0_EXPECTED, &["Get"]);
                    self.missing(None, SyntaxKind::GetKeyword);
                }
            }
        }
        self.expect_identifier(Some(FieldName::Name));
        if self.at(SyntaxKind::OpenParenToken) {
            self.parse_parameter_list();
        }
        if self.eat_keyword(SyntaxKind::AsKeyword, None) {
            self.parse_type_reference(Some(FieldName::ReturnType));
        }
        self.eat_keyword(SyntaxKind::StaticKeyword, Some(FieldName::Modifier));
        self.parse_statement_end();

        self.open_blocks.push(block);
        self.parse_block();
        self.open_blocks.pop();
        self.finish_block(block, opener);
    }

    fn parse_parameter_list(&mut self) {
        self.builder.start_node(SyntaxKind::ParameterList, Some(FieldName::Parameters));
        self.bump(None);
        if !self.at(SyntaxKind::CloseParenToken) && !self.at_line_end() {
            loop {
                self.parse_parameter();
                if !self.eat(SyntaxKind::CommaToken, None) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::CloseParenToken, None);
        self.builder.finish_node();
    }

    /// `[Optional] [ByVal|ByRef] [ParamArray] name[()] [As T] [= default]`
    fn parse_parameter(&mut self) {
        self.builder.start_node(SyntaxKind::Parameter, None);
        self.eat_keyword(SyntaxKind::OptionalKeyword, Some(FieldName::Modifier));
        if let Some(passing) = self.current_keyword_in(&[SyntaxKind::ByValKeyword, SyntaxKind::ByRefKeyword]) {
            self.bump_as(Some(FieldName::Modifier), passing);
        }
        self.eat_keyword(SyntaxKind::ParamArrayKeyword, Some(FieldName::Modifier));
        self.expect_identifier(Some(FieldName::Name));
        self.parse_empty_array_suffix();
        if self.eat_keyword(SyntaxKind::AsKeyword, None) {
            self.parse_type_reference(Some(FieldName::Type));
        }
        if self.eat(SyntaxKind::EqualsToken, None) {
            self.parse_expression(Some(FieldName::Default));
        }
        self.builder.finish_node();
    }

    /// The `()` marking an array parameter or return type.
    fn parse_empty_array_suffix(&mut self) {
        if self.at(SyntaxKind::OpenParenToken) && self.nth(1) == SyntaxKind::CloseParenToken {
            self.bump(None);
            self.bump(None);
        }
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// `[New] name[.name...] [* length] [()]`. Predefined type names become
    /// `PredefinedType` tokens.
    pub(crate) fn parse_type_reference(&mut self, field: Option<FieldName>) {
        self.builder.start_node(SyntaxKind::TypeReference, field);
        self.eat_keyword(SyntaxKind::NewKeyword, None);
        match self.current() {
            SyntaxKind::Identifier if is_predefined_type(self.current_text()) => {
                self.bump_as(Some(FieldName::Name), SyntaxKind::PredefinedType);
            }
            SyntaxKind::Identifier | SyntaxKind::BracketedIdentifier => {
                self.bump(Some(FieldName::Name));
                while self.at(SyntaxKind::DotToken)
                    && matches!(self.nth(1), SyntaxKind::Identifier | SyntaxKind::BracketedIdentifier)
                {
                    self.bump(None);
                    self.bump(Some(FieldName::Name));
                }
            }
            _ => {
                self.error_at_current(&messages::TYPE_EXPECTED, &[]);
                self.missing(Some(FieldName::Name), SyntaxKind::Identifier);
            }
        }
        if self.eat(SyntaxKind::AsteriskToken, None) {
            self.parse_postfix_expression(Some(FieldName::Length), PostfixMode::NoCall);
        }
        self.parse_empty_array_suffix();
        self.builder.finish_node();
    }

    /// `(bounds, lo To hi, ...)` after an array name. May be empty.
    pub(crate) fn parse_array_dimensions(&mut self) {
        self.builder.start_node(SyntaxKind::ArrayDimensions, Some(FieldName::Dimensions));
        self.bump(None);
        if !self.at(SyntaxKind::CloseParenToken) && !self.at_line_end() {
            loop {
                let checkpoint = self.builder.checkpoint();
                self.parse_expression(None);
                if self.at_keyword(SyntaxKind::ToKeyword) {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::RangeExpression, Some(FieldName::Start));
                    self.bump_as(None, SyntaxKind::ToKeyword);
                    self.parse_expression(Some(FieldName::End));
                    self.builder.finish_node();
                }
                if !self.eat(SyntaxKind::CommaToken, None) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::CloseParenToken, None);
        self.builder.finish_node();
    }

    // ========================================================================
    // Variables and constants
    // ========================================================================

    /// `Dim`, `Static`, `Public`, `Private` or `Global` followed by
    /// declarators.
    fn parse_variable_declaration(&mut self) {
        self.builder.start_node(SyntaxKind::VariableDeclaration, None);
        self.parse_modifiers();
        self.eat_keyword(SyntaxKind::DimKeyword, None);
        loop {
            self.builder.start_node(SyntaxKind::VariableDeclarator, None);
            self.expect_identifier(Some(FieldName::Name));
            if self.at(SyntaxKind::OpenParenToken) {
                self.parse_array_dimensions();
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

    fn parse_const_declaration(&mut self) {
        self.builder.start_node(SyntaxKind::ConstDeclaration, None);
        self.parse_modifiers();
        self.expect_keyword(SyntaxKind::ConstKeyword, None);
        loop {
            self.builder.start_node(SyntaxKind::ConstDeclarator, None);
            self.expect_identifier(Some(FieldName::Name));
            if self.eat_keyword(SyntaxKind::AsKeyword, None) {
                self.parse_type_reference(Some(FieldName::Type));
            }
            self.expect(SyntaxKind::EqualsToken, None);
            self.parse_expression(Some(FieldName::Value));
            self.builder.finish_node();
            if !self.eat(SyntaxKind::CommaToken, None) {
                break;
            }
        }
        self.parse_statement_end();
        self.builder.finish_node();
    }

    // ========================================================================
    // Type and Enum
    // ========================================================================

    fn parse_type_definition(&mut self) {
        self.check_module_level("Type");
        self.builder.start_node(SyntaxKind::TypeDefinition, None);
        self.parse_modifiers();
        let opener = self.current_span();
        self.bump_as(None, SyntaxKind::TypeKeyword);
        self.expect_identifier(Some(FieldName::Name));
        self.parse_statement_end();

        self.open_blocks.push(BlockKind::Type);
        self.parse_member_list(Self::parse_type_field);
        self.open_blocks.pop();
        self.finish_block(BlockKind::Type, opener);
    }

    fn parse_type_field(&mut self) {
        self.builder.start_node(SyntaxKind::TypeField, None);
        self.expect_identifier(Some(FieldName::Name));
        if self.at(SyntaxKind::OpenParenToken) {
            self.parse_array_dimensions();
        }
        if self.expect_keyword(SyntaxKind::AsKeyword, None) {
            self.parse_type_reference(Some(FieldName::Type));
        }
        self.parse_statement_end();
        self.builder.finish_node();
    }

    fn parse_enum_definition(&mut self) {
        self.check_module_level("Enum");
        self.builder.start_node(SyntaxKind::EnumDefinition, None);
        self.parse_modifiers();
        let opener = self.current_span();
        self.bump_as(None, SyntaxKind::EnumKeyword);
        self.expect_identifier(Some(FieldName::Name));
        self.parse_statement_end();

        self.open_blocks.push(BlockKind::Enum);
        self.parse_member_list(Self::parse_enum_member);
        self.open_blocks.pop();
        self.finish_block(BlockKind::Enum, opener);
    }

    fn parse_enum_member(&mut self) {
        self.builder.start_node(SyntaxKind::EnumMember, None);
        self.expect_identifier(Some(FieldName::Name));
        if self.eat(SyntaxKind::EqualsToken, None) {
            self.parse_expression(Some(FieldName::Value));
        }
        self.parse_statement_end();
        self.builder.finish_node();
    }

    /// Member lines of a `Type` or `Enum` body, up to a block boundary or the
    /// next procedure.
    fn parse_member_list(&mut self, member: fn(&mut Self)) {
        loop {
            if self.at(SyntaxKind::EndOfFile)
                || self.at_block_boundary()
                || self.at_procedure_start()
                || (self.single_line && self.at_line_end())
            {
                break;
            }
            match self.current() {
                SyntaxKind::Newline | SyntaxKind::ColonToken => self.parse_empty_statement(),
                SyntaxKind::Identifier | SyntaxKind::BracketedIdentifier
                    if !self.at_keyword(SyntaxKind::EndKeyword) =>
                {
                    member(self)
                }
                _ => {
                    let text = self.current_text_lossy();
                    self.error_line(&messages::UNEXPECTED_TOKEN, &[&text]);
                }
            }
        }
    }

    // ========================================================================
    // Module-level statements
    // ========================================================================

    /// `Declare [PtrSafe] Sub|Function name Lib "lib" [Alias "alias"]
    /// [(params)] [As T]`
    fn parse_declare_statement(&mut self) {
        self.check_module_level("Declare");
        self.builder.start_node(SyntaxKind::DeclareStatement, None);
        self.parse_modifiers();
        self.bump_as(None, SyntaxKind::DeclareKeyword);
        self.eat_keyword(SyntaxKind::PtrSafeKeyword, Some(FieldName::Modifier));
        match self.current_keyword_in(&[SyntaxKind::SubKeyword, SyntaxKind::FunctionKeyword]) {
            Some(keyword) => self.bump_as(None, keyword),
            None => {
                self.error_at_current(&messages::_0_EXPECTED, &["Sub"]);
                self.missing(None, SyntaxKind::SubKeyword);
            }
        }
        self.expect_identifier(Some(FieldName::Name));
        if self.expect_keyword(SyntaxKind::LibKeyword, None) {
            self.expect(SyntaxKind::StringLiteral, Some(FieldName::Library));
        }
        if self.eat_keyword(SyntaxKind::AliasKeyword, None) {
            self.expect(SyntaxKind::StringLiteral, Some(FieldName::Alias));
        }
        if self.at(SyntaxKind::OpenParenToken) {
            self.parse_parameter_list();
        }
        if self.eat_keyword(SyntaxKind::AsKeyword, None) {
            self.parse_type_reference(Some(FieldName::ReturnType));
        }
        self.parse_statement_end();
        self.builder.finish_node();
    }

    /// `Option Explicit`, `Option Base n`, `Option Compare Binary|Text|Database`
    /// and `Option Private Module`.
    pub(crate) fn parse_option_statement(&mut self) {
        self.check_module_level("Option");
        self.builder.start_node(SyntaxKind::OptionStatement, None);
        self.bump_as(None, SyntaxKind::OptionKeyword);
        let option = self.current_keyword_in(&[
            SyntaxKind::ExplicitKeyword,
            SyntaxKind::BaseKeyword,
            SyntaxKind::CompareKeyword,
            SyntaxKind::PrivateKeyword,
        ]);
        match option {
            Some(SyntaxKind::ExplicitKeyword) => self.bump_as(Some(FieldName::Name), SyntaxKind::ExplicitKeyword),
            Some(SyntaxKind::BaseKeyword) => {
                self.bump_as(Some(FieldName::Name), SyntaxKind::BaseKeyword);
                self.expect(SyntaxKind::NumberLiteral, Some(FieldName::Value));
            }
            Some(SyntaxKind::CompareKeyword) => {
                self.bump_as(Some(FieldName::Name), SyntaxKind::CompareKeyword);
                match self.current_keyword_in(&[
                    SyntaxKind::BinaryKeyword,
                    SyntaxKind::TextKeyword,
                    SyntaxKind::DatabaseKeyword,
                ]) {
                    Some(mode) => self.bump_as(Some(FieldName::Value), mode),
                    None => {
                        self.error_at_current(&messages::_0_EXPECTED, &["Binary"]);
                        self.missing(Some(FieldName::Value), SyntaxKind::BinaryKeyword);
                    }
                }
            }
            Some(SyntaxKind::PrivateKeyword) => {
                self.bump_as(Some(FieldName::Name), SyntaxKind::PrivateKeyword);
                self.expect_keyword(SyntaxKind::ModuleKeyword, Some(FieldName::Value));
            }
            _ => {
                self.error_at_current(&messages::_0_EXPECTED, &["Explicit"]);
                self.missing(Some(FieldName::Name), SyntaxKind::ExplicitKeyword);
            }
        }
        self.parse_statement_end();
        self.builder.finish_node();
    }

    /// `Attribute VB_Name = "Module1"`. Names may be dotted and values
    /// comma-separated.
    pub(crate) fn parse_attribute_statement(&mut self) {
        self.builder.start_node(SyntaxKind::AttributeStatement, None);
        self.bump_as(None, SyntaxKind::AttributeKeyword);
        self.parse_postfix_expression(Some(FieldName::Name), PostfixMode::NoCall);
        self.expect(SyntaxKind::EqualsToken, None);
        loop {
            self.parse_expression(Some(FieldName::Value));
            if !self.eat(SyntaxKind::CommaToken, None) {
                break;
            }
        }
        self.parse_statement_end();
        self.builder.finish_node();
    }
}
