//! SyntaxKind enum - every token, trivia and node kind in a VBA syntax tree.
//!
//! Tokens, keywords and tree nodes share one enum so that a leaf and an
//! interior node can be compared and printed uniformly.

/// The kind of a syntax token or node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    Unknown = 0,
    EndOfFile,

    // Trivia
    WhitespaceTrivia,
    CommentTrivia,
    LineContinuationTrivia,

    /// `\r?\n`. Significant: newlines separate statements.
    Newline,

    // Words and literals
    Identifier,
    BracketedIdentifier,
    StringLiteral,
    NumberLiteral,
    /// A lexically invalid span (bad character, unterminated string,
    /// malformed number). Always reported by the scanner.
    BadToken,
    /// A predefined type name (`Integer`, `String`, ...) in type position.
    PredefinedType,

    // Punctuation
    OpenParenToken,
    CloseParenToken,
    CommaToken,
    DotToken,
    ColonToken,
    ColonEqualsToken,
    EqualsToken,
    LessThanGreaterThanToken,
    LessThanToken,
    LessThanEqualsToken,
    GreaterThanToken,
    GreaterThanEqualsToken,
    AmpersandToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    SlashToken,
    BackslashToken,
    CaretToken,

    // Keywords. None are reserved: a word only becomes one of these when the
    // parser asks for it at a position where the keyword is expected.
    AliasKeyword,
    AndKeyword,
    AsKeyword,
    AttributeKeyword,
    BaseKeyword,
    BinaryKeyword,
    ByRefKeyword,
    ByValKeyword,
    CallKeyword,
    CaseKeyword,
    CompareKeyword,
    ConstKeyword,
    DatabaseKeyword,
    DeclareKeyword,
    DimKeyword,
    DoKeyword,
    EachKeyword,
    ElseKeyword,
    ElseIfKeyword,
    EndKeyword,
    EnumKeyword,
    EraseKeyword,
    ErrorKeyword,
    ExitKeyword,
    ExplicitKeyword,
    FalseKeyword,
    ForKeyword,
    FriendKeyword,
    FunctionKeyword,
    GetKeyword,
    GlobalKeyword,
    GoToKeyword,
    IfKeyword,
    InKeyword,
    IsKeyword,
    LetKeyword,
    LibKeyword,
    LikeKeyword,
    LoopKeyword,
    ModKeyword,
    ModuleKeyword,
    NameKeyword,
    NewKeyword,
    NextKeyword,
    NotKeyword,
    NothingKeyword,
    NullKeyword,
    OnKeyword,
    OptionKeyword,
    OptionalKeyword,
    OrKeyword,
    ParamArrayKeyword,
    PreserveKeyword,
    PrivateKeyword,
    PropertyKeyword,
    PtrSafeKeyword,
    PublicKeyword,
    ReDimKeyword,
    ResumeKeyword,
    SelectKeyword,
    SetKeyword,
    StaticKeyword,
    StepKeyword,
    StopKeyword,
    SubKeyword,
    TextKeyword,
    ThenKeyword,
    ToKeyword,
    TrueKeyword,
    TypeKeyword,
    UntilKeyword,
    WendKeyword,
    WhileKeyword,
    WithKeyword,
    XorKeyword,

    // ========================================================================
    // Nodes
    // ========================================================================
    SourceFile,
    /// A statement sequence: the body of a procedure, loop or clause.
    Block,

    // Module members
    SubDefinition,
    FunctionDefinition,
    PropertyGetDefinition,
    PropertyLetDefinition,
    PropertySetDefinition,
    DeclareStatement,
    TypeDefinition,
    TypeField,
    EnumDefinition,
    EnumMember,
    OptionStatement,
    AttributeStatement,
    ParameterList,
    Parameter,
    TypeReference,

    // Compound statements
    IfStatement,
    SingleLineIfStatement,
    ElseIfClause,
    ElseClause,
    SelectCaseStatement,
    CaseClause,
    CaseElseClause,
    CaseIsExpression,
    RangeExpression,
    ForStatement,
    ForEachStatement,
    WhileStatement,
    DoStatement,
    WithStatement,

    // Simple statements
    VariableDeclaration,
    VariableDeclarator,
    ConstDeclaration,
    ConstDeclarator,
    AssignmentStatement,
    CallStatement,
    ExitStatement,
    ErrorStatement,
    OnErrorStatement,
    ResumeStatement,
    RedimStatement,
    RedimTarget,
    ArrayDimensions,
    EraseStatement,
    GotoStatement,
    LabelStatement,
    StopStatement,
    EndStatement,
    NameStatement,
    EmptyStatement,

    // Expressions
    BinaryExpression,
    UnaryExpression,
    CallExpression,
    MemberAccess,
    ParenthesizedExpression,
    NewExpression,
    ArgumentList,
    NamedArgument,

    /// A span the parser could not interpret, or a missing operand.
    Error,
}

impl SyntaxKind {
    pub const FIRST_KEYWORD: SyntaxKind = SyntaxKind::AliasKeyword;
    pub const LAST_KEYWORD: SyntaxKind = SyntaxKind::XorKeyword;
    pub const FIRST_NODE: SyntaxKind = SyntaxKind::SourceFile;

    pub fn is_keyword(self) -> bool {
        self >= Self::FIRST_KEYWORD && self <= Self::LAST_KEYWORD
    }

    pub fn is_punctuation(self) -> bool {
        self >= SyntaxKind::OpenParenToken && self <= SyntaxKind::CaretToken
    }

    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::WhitespaceTrivia | SyntaxKind::CommentTrivia | SyntaxKind::LineContinuationTrivia
        )
    }

    /// Whether this kind names a tree node rather than a token.
    pub fn is_node(self) -> bool {
        self >= Self::FIRST_NODE
    }

    pub fn is_token(self) -> bool {
        !self.is_node()
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::StringLiteral
                | SyntaxKind::NumberLiteral
                | SyntaxKind::TrueKeyword
                | SyntaxKind::FalseKeyword
                | SyntaxKind::NothingKeyword
                | SyntaxKind::NullKeyword
        )
    }

    /// Procedure-like definitions that own a body and close with `End X`.
    pub fn is_procedure(self) -> bool {
        matches!(
            self,
            SyntaxKind::SubDefinition
                | SyntaxKind::FunctionDefinition
                | SyntaxKind::PropertyGetDefinition
                | SyntaxKind::PropertyLetDefinition
                | SyntaxKind::PropertySetDefinition
        )
    }

    pub fn is_statement(self) -> bool {
        matches!(
            self,
            SyntaxKind::IfStatement
                | SyntaxKind::SingleLineIfStatement
                | SyntaxKind::SelectCaseStatement
                | SyntaxKind::ForStatement
                | SyntaxKind::ForEachStatement
                | SyntaxKind::WhileStatement
                | SyntaxKind::DoStatement
                | SyntaxKind::WithStatement
                | SyntaxKind::VariableDeclaration
                | SyntaxKind::ConstDeclaration
                | SyntaxKind::AssignmentStatement
                | SyntaxKind::CallStatement
                | SyntaxKind::ExitStatement
                | SyntaxKind::ErrorStatement
                | SyntaxKind::OnErrorStatement
                | SyntaxKind::ResumeStatement
                | SyntaxKind::RedimStatement
                | SyntaxKind::EraseStatement
                | SyntaxKind::GotoStatement
                | SyntaxKind::LabelStatement
                | SyntaxKind::StopStatement
                | SyntaxKind::EndStatement
                | SyntaxKind::NameStatement
                | SyntaxKind::EmptyStatement
        )
    }

    pub fn is_expression(self) -> bool {
        matches!(
            self,
            SyntaxKind::BinaryExpression
                | SyntaxKind::UnaryExpression
                | SyntaxKind::CallExpression
                | SyntaxKind::MemberAccess
                | SyntaxKind::ParenthesizedExpression
                | SyntaxKind::NewExpression
        )
    }

    /// Leaves and nodes that appear in the named (S-expression) view of a
    /// tree. Punctuation and keywords are anonymous.
    pub fn is_named(self) -> bool {
        if self.is_node() {
            return true;
        }
        matches!(
            self,
            SyntaxKind::Identifier
                | SyntaxKind::BracketedIdentifier
                | SyntaxKind::StringLiteral
                | SyntaxKind::NumberLiteral
                | SyntaxKind::BadToken
                | SyntaxKind::PredefinedType
                | SyntaxKind::TrueKeyword
                | SyntaxKind::FalseKeyword
                | SyntaxKind::NothingKeyword
                | SyntaxKind::NullKeyword
        )
    }

    /// Canonical spelling of a keyword, as written in idiomatic source.
    pub fn keyword_text(self) -> Option<&'static str> {
        Some(match self {
            SyntaxKind::AliasKeyword => "Alias",
            SyntaxKind::AndKeyword => "And",
            SyntaxKind::AsKeyword => "As",
            SyntaxKind::AttributeKeyword => "Attribute",
            SyntaxKind::BaseKeyword => "Base",
            SyntaxKind::BinaryKeyword => "Binary",
            SyntaxKind::ByRefKeyword => "ByRef",
            SyntaxKind::ByValKeyword => "ByVal",
            SyntaxKind::CallKeyword => "Call",
            SyntaxKind::CaseKeyword => "Case",
            SyntaxKind::CompareKeyword => "Compare",
            SyntaxKind::ConstKeyword => "Const",
            SyntaxKind::DatabaseKeyword => "Database",
            SyntaxKind::DeclareKeyword => "Declare",
            SyntaxKind::DimKeyword => "Dim",
            SyntaxKind::DoKeyword => "Do",
            SyntaxKind::EachKeyword => "Each",
            SyntaxKind::ElseKeyword => "Else",
            SyntaxKind::ElseIfKeyword => "ElseIf",
            SyntaxKind::EndKeyword => "End",
            SyntaxKind::EnumKeyword => "Enum",
            SyntaxKind::EraseKeyword => "Erase",
            SyntaxKind::ErrorKeyword => "Error",
            SyntaxKind::ExitKeyword => "Exit",
            SyntaxKind::ExplicitKeyword => "Explicit",
            SyntaxKind::FalseKeyword => "False",
            SyntaxKind::ForKeyword => "For",
            SyntaxKind::FriendKeyword => "Friend",
            SyntaxKind::FunctionKeyword => "Function",
            SyntaxKind::GetKeyword => "Get",
            SyntaxKind::GlobalKeyword => "Global",
            SyntaxKind::GoToKeyword => "GoTo",
            SyntaxKind::IfKeyword => "If",
            SyntaxKind::InKeyword => "In",
            SyntaxKind::IsKeyword => "Is",
            SyntaxKind::LetKeyword => "Let",
            SyntaxKind::LibKeyword => "Lib",
            SyntaxKind::LikeKeyword => "Like",
            SyntaxKind::LoopKeyword => "Loop",
            SyntaxKind::ModKeyword => "Mod",
            SyntaxKind::ModuleKeyword => "Module",
            SyntaxKind::NameKeyword => "Name",
            SyntaxKind::NewKeyword => "New",
            SyntaxKind::NextKeyword => "Next",
            SyntaxKind::NotKeyword => "Not",
            SyntaxKind::NothingKeyword => "Nothing",
            SyntaxKind::NullKeyword => "Null",
            SyntaxKind::OnKeyword => "On",
            SyntaxKind::OptionKeyword => "Option",
            SyntaxKind::OptionalKeyword => "Optional",
            SyntaxKind::OrKeyword => "Or",
            SyntaxKind::ParamArrayKeyword => "ParamArray",
            SyntaxKind::PreserveKeyword => "Preserve",
            SyntaxKind::PrivateKeyword => "Private",
            SyntaxKind::PropertyKeyword => "Property",
            SyntaxKind::PtrSafeKeyword => "PtrSafe",
            SyntaxKind::PublicKeyword => "Public",
            SyntaxKind::ReDimKeyword => "ReDim",
            SyntaxKind::ResumeKeyword => "Resume",
            SyntaxKind::SelectKeyword => "Select",
            SyntaxKind::SetKeyword => "Set",
            SyntaxKind::StaticKeyword => "Static",
            SyntaxKind::StepKeyword => "Step",
            SyntaxKind::StopKeyword => "Stop",
            SyntaxKind::SubKeyword => "Sub",
            SyntaxKind::TextKeyword => "Text",
            SyntaxKind::ThenKeyword => "Then",
            SyntaxKind::ToKeyword => "To",
            SyntaxKind::TrueKeyword => "True",
            SyntaxKind::TypeKeyword => "Type",
            SyntaxKind::UntilKeyword => "Until",
            SyntaxKind::WendKeyword => "Wend",
            SyntaxKind::WhileKeyword => "While",
            SyntaxKind::WithKeyword => "With",
            SyntaxKind::XorKeyword => "Xor",
            _ => return None,
        })
    }

    pub fn punctuation_text(self) -> Option<&'static str> {
        Some(match self {
            SyntaxKind::OpenParenToken => "(",
            SyntaxKind::CloseParenToken => ")",
            SyntaxKind::CommaToken => ",",
            SyntaxKind::DotToken => ".",
            SyntaxKind::ColonToken => ":",
            SyntaxKind::ColonEqualsToken => ":=",
            SyntaxKind::EqualsToken => "=",
            SyntaxKind::LessThanGreaterThanToken => "<>",
            SyntaxKind::LessThanToken => "<",
            SyntaxKind::LessThanEqualsToken => "<=",
            SyntaxKind::GreaterThanToken => ">",
            SyntaxKind::GreaterThanEqualsToken => ">=",
            SyntaxKind::AmpersandToken => "&",
            SyntaxKind::PlusToken => "+",
            SyntaxKind::MinusToken => "-",
            SyntaxKind::AsteriskToken => "*",
            SyntaxKind::SlashToken => "/",
            SyntaxKind::BackslashToken => "\\",
            SyntaxKind::CaretToken => "^",
            _ => return None,
        })
    }

    /// The name used for this kind in S-expressions and JSON, matching the
    /// rule names a tree-query runtime expects.
    pub fn name(self) -> &'static str {
        match self {
            SyntaxKind::Unknown => "unknown",
            SyntaxKind::EndOfFile => "end_of_file",
            SyntaxKind::WhitespaceTrivia => "whitespace",
            SyntaxKind::CommentTrivia => "comment",
            SyntaxKind::LineContinuationTrivia => "line_continuation",
            SyntaxKind::Newline => "newline",
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::BracketedIdentifier => "bracketed_identifier",
            SyntaxKind::StringLiteral => "string_literal",
            SyntaxKind::NumberLiteral => "number_literal",
            SyntaxKind::BadToken => "ERROR",
            SyntaxKind::PredefinedType => "predefined_type",
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => "boolean_literal",
            SyntaxKind::NothingKeyword => "nothing_literal",
            SyntaxKind::NullKeyword => "null_literal",
            SyntaxKind::SourceFile => "source_file",
            SyntaxKind::Block => "block",
            SyntaxKind::SubDefinition => "sub_definition",
            SyntaxKind::FunctionDefinition => "function_definition",
            SyntaxKind::PropertyGetDefinition => "property_get_definition",
            SyntaxKind::PropertyLetDefinition => "property_let_definition",
            SyntaxKind::PropertySetDefinition => "property_set_definition",
            SyntaxKind::DeclareStatement => "declare_statement",
            SyntaxKind::TypeDefinition => "type_definition",
            SyntaxKind::TypeField => "type_field",
            SyntaxKind::EnumDefinition => "enum_definition",
            SyntaxKind::EnumMember => "enum_member",
            SyntaxKind::OptionStatement => "option_statement",
            SyntaxKind::AttributeStatement => "attribute_statement",
            SyntaxKind::ParameterList => "parameter_list",
            SyntaxKind::Parameter => "parameter",
            SyntaxKind::TypeReference => "type",
            SyntaxKind::IfStatement => "if_statement",
            SyntaxKind::SingleLineIfStatement => "single_line_if_statement",
            SyntaxKind::ElseIfClause => "elseif_clause",
            SyntaxKind::ElseClause => "else_clause",
            SyntaxKind::SelectCaseStatement => "select_case_statement",
            SyntaxKind::CaseClause => "case_clause",
            SyntaxKind::CaseElseClause => "case_else_clause",
            SyntaxKind::CaseIsExpression => "case_is_expression",
            SyntaxKind::RangeExpression => "range_expression",
            SyntaxKind::ForStatement => "for_statement",
            SyntaxKind::ForEachStatement => "for_each_statement",
            SyntaxKind::WhileStatement => "while_statement",
            SyntaxKind::DoStatement => "do_statement",
            SyntaxKind::WithStatement => "with_statement",
            SyntaxKind::VariableDeclaration => "variable_declaration",
            SyntaxKind::VariableDeclarator => "variable_declarator",
            SyntaxKind::ConstDeclaration => "const_declaration",
            SyntaxKind::ConstDeclarator => "const_declarator",
            SyntaxKind::AssignmentStatement => "assignment_statement",
            SyntaxKind::CallStatement => "call_statement",
            SyntaxKind::ExitStatement => "exit_statement",
            SyntaxKind::ErrorStatement => "error_statement",
            SyntaxKind::OnErrorStatement => "on_error_statement",
            SyntaxKind::ResumeStatement => "resume_statement",
            SyntaxKind::RedimStatement => "redim_statement",
            SyntaxKind::RedimTarget => "redim_target",
            SyntaxKind::ArrayDimensions => "array_dimensions",
            SyntaxKind::EraseStatement => "erase_statement",
            SyntaxKind::GotoStatement => "goto_statement",
            SyntaxKind::LabelStatement => "label_statement",
            SyntaxKind::StopStatement => "stop_statement",
            SyntaxKind::EndStatement => "end_statement",
            SyntaxKind::NameStatement => "name_statement",
            SyntaxKind::EmptyStatement => "empty_statement",
            SyntaxKind::BinaryExpression => "binary_expression",
            SyntaxKind::UnaryExpression => "unary_expression",
            SyntaxKind::CallExpression => "call_expression",
            SyntaxKind::MemberAccess => "member_access",
            SyntaxKind::ParenthesizedExpression => "parenthesized_expression",
            SyntaxKind::NewExpression => "new_expression",
            SyntaxKind::ArgumentList => "argument_list",
            SyntaxKind::NamedArgument => "named_argument",
            SyntaxKind::Error => "ERROR",
            other => other
                .keyword_text()
                .or_else(|| other.punctuation_text())
                .unwrap_or("unknown"),
        }
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(text) = self.keyword_text().or_else(|| self.punctuation_text()) {
            write!(f, "{}", text)
        } else {
            write!(f, "{}", self.name())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classes_do_not_overlap() {
        assert!(SyntaxKind::IfKeyword.is_keyword());
        assert!(!SyntaxKind::IfKeyword.is_node());
        assert!(SyntaxKind::IfStatement.is_node());
        assert!(SyntaxKind::CaretToken.is_punctuation());
        assert!(!SyntaxKind::AliasKeyword.is_punctuation());
        assert!(SyntaxKind::Error.is_node());
    }

    #[test]
    fn test_names() {
        assert_eq!(SyntaxKind::SubDefinition.name(), "sub_definition");
        assert_eq!(SyntaxKind::TrueKeyword.name(), "boolean_literal");
        assert_eq!(SyntaxKind::ElseIfKeyword.name(), "ElseIf");
        assert_eq!(SyntaxKind::LessThanGreaterThanToken.to_string(), "<>");
        assert_eq!(SyntaxKind::EndOfFile.to_string(), "end_of_file");
    }
}
