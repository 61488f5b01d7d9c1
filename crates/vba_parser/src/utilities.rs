//! Keyword sets the parser consults at particular positions, and the block
//! constructs it tracks while looking for terminators.

use vba_syntax::SyntaxKind;

/// Keywords that can begin a statement.
pub const STATEMENT_KEYWORDS: &[SyntaxKind] = &[
    SyntaxKind::AttributeKeyword,
    SyntaxKind::CallKeyword,
    SyntaxKind::CaseKeyword,
    SyntaxKind::ConstKeyword,
    SyntaxKind::DeclareKeyword,
    SyntaxKind::DimKeyword,
    SyntaxKind::DoKeyword,
    SyntaxKind::ElseKeyword,
    SyntaxKind::ElseIfKeyword,
    SyntaxKind::EndKeyword,
    SyntaxKind::EnumKeyword,
    SyntaxKind::EraseKeyword,
    SyntaxKind::ErrorKeyword,
    SyntaxKind::ExitKeyword,
    SyntaxKind::ForKeyword,
    SyntaxKind::FriendKeyword,
    SyntaxKind::FunctionKeyword,
    SyntaxKind::GlobalKeyword,
    SyntaxKind::GoToKeyword,
    SyntaxKind::IfKeyword,
    SyntaxKind::LetKeyword,
    SyntaxKind::LoopKeyword,
    SyntaxKind::NameKeyword,
    SyntaxKind::NextKeyword,
    SyntaxKind::OnKeyword,
    SyntaxKind::OptionKeyword,
    SyntaxKind::PrivateKeyword,
    SyntaxKind::PropertyKeyword,
    SyntaxKind::PublicKeyword,
    SyntaxKind::ReDimKeyword,
    SyntaxKind::ResumeKeyword,
    SyntaxKind::SelectKeyword,
    SyntaxKind::SetKeyword,
    SyntaxKind::StaticKeyword,
    SyntaxKind::StopKeyword,
    SyntaxKind::SubKeyword,
    SyntaxKind::TypeKeyword,
    SyntaxKind::WendKeyword,
    SyntaxKind::WhileKeyword,
    SyntaxKind::WithKeyword,
];

/// Access and storage modifiers that may precede a declaration.
pub const MODIFIER_KEYWORDS: &[SyntaxKind] = &[
    SyntaxKind::PublicKeyword,
    SyntaxKind::PrivateKeyword,
    SyntaxKind::FriendKeyword,
    SyntaxKind::GlobalKeyword,
    SyntaxKind::StaticKeyword,
];

/// Keywords that form a complete statement on their own, so `Word:` is that
/// statement followed by a separator rather than a label.
pub const STANDALONE_KEYWORDS: &[SyntaxKind] = &[
    SyntaxKind::ElseKeyword,
    SyntaxKind::StopKeyword,
    SyntaxKind::LoopKeyword,
    SyntaxKind::WendKeyword,
    SyntaxKind::NextKeyword,
    SyntaxKind::DoKeyword,
    SyntaxKind::EndKeyword,
];

/// Words that cannot begin an operand. Meeting one where an expression is
/// expected ends the expression with a missing operand.
pub const NON_OPERAND_KEYWORDS: &[SyntaxKind] = &[
    SyntaxKind::AndKeyword,
    SyntaxKind::AsKeyword,
    SyntaxKind::ByRefKeyword,
    SyntaxKind::ByValKeyword,
    SyntaxKind::CallKeyword,
    SyntaxKind::CaseKeyword,
    SyntaxKind::ConstKeyword,
    SyntaxKind::DeclareKeyword,
    SyntaxKind::DimKeyword,
    SyntaxKind::DoKeyword,
    SyntaxKind::EachKeyword,
    SyntaxKind::ElseKeyword,
    SyntaxKind::ElseIfKeyword,
    SyntaxKind::EndKeyword,
    SyntaxKind::EnumKeyword,
    SyntaxKind::ExitKeyword,
    SyntaxKind::ForKeyword,
    SyntaxKind::FriendKeyword,
    SyntaxKind::FunctionKeyword,
    SyntaxKind::GlobalKeyword,
    SyntaxKind::GoToKeyword,
    SyntaxKind::IfKeyword,
    SyntaxKind::InKeyword,
    SyntaxKind::IsKeyword,
    SyntaxKind::LetKeyword,
    SyntaxKind::LikeKeyword,
    SyntaxKind::LoopKeyword,
    SyntaxKind::ModKeyword,
    SyntaxKind::NextKeyword,
    SyntaxKind::OptionalKeyword,
    SyntaxKind::OrKeyword,
    SyntaxKind::ParamArrayKeyword,
    SyntaxKind::PreserveKeyword,
    SyntaxKind::PrivateKeyword,
    SyntaxKind::PropertyKeyword,
    SyntaxKind::PublicKeyword,
    SyntaxKind::ReDimKeyword,
    SyntaxKind::SelectKeyword,
    SyntaxKind::SetKeyword,
    SyntaxKind::StaticKeyword,
    SyntaxKind::StepKeyword,
    SyntaxKind::SubKeyword,
    SyntaxKind::ThenKeyword,
    SyntaxKind::ToKeyword,
    SyntaxKind::TypeKeyword,
    SyntaxKind::UntilKeyword,
    SyntaxKind::WendKeyword,
    SyntaxKind::WhileKeyword,
    SyntaxKind::WithKeyword,
    SyntaxKind::XorKeyword,
];

/// Keywords that are literal values.
pub const LITERAL_KEYWORDS: &[SyntaxKind] = &[
    SyntaxKind::TrueKeyword,
    SyntaxKind::FalseKeyword,
    SyntaxKind::NothingKeyword,
    SyntaxKind::NullKeyword,
];

/// Constructs an `Exit` statement can leave.
pub const EXIT_TARGET_KEYWORDS: &[SyntaxKind] = &[
    SyntaxKind::SubKeyword,
    SyntaxKind::FunctionKeyword,
    SyntaxKind::PropertyKeyword,
    SyntaxKind::DoKeyword,
    SyntaxKind::ForKeyword,
    SyntaxKind::WhileKeyword,
];

/// Keywords that can close or split a block, or begin a procedure that
/// implicitly closes the one before it.
pub const BOUNDARY_KEYWORDS: &[SyntaxKind] = &[
    SyntaxKind::EndKeyword,
    SyntaxKind::ElseKeyword,
    SyntaxKind::ElseIfKeyword,
    SyntaxKind::CaseKeyword,
    SyntaxKind::NextKeyword,
    SyntaxKind::LoopKeyword,
    SyntaxKind::WendKeyword,
    SyntaxKind::SubKeyword,
    SyntaxKind::FunctionKeyword,
    SyntaxKind::PropertyKeyword,
    SyntaxKind::PublicKeyword,
    SyntaxKind::PrivateKeyword,
    SyntaxKind::FriendKeyword,
    SyntaxKind::GlobalKeyword,
    SyntaxKind::StaticKeyword,
];

/// Keywords that may follow `End` to close a block.
pub const END_BLOCK_KEYWORDS: &[SyntaxKind] = &[
    SyntaxKind::SubKeyword,
    SyntaxKind::FunctionKeyword,
    SyntaxKind::PropertyKeyword,
    SyntaxKind::TypeKeyword,
    SyntaxKind::EnumKeyword,
    SyntaxKind::IfKeyword,
    SyntaxKind::SelectKeyword,
    SyntaxKind::WithKeyword,
];

/// A block construct waiting for its terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Sub,
    Function,
    Property,
    Type,
    Enum,
    If,
    Select,
    For,
    While,
    Do,
    With,
}

impl BlockKind {
    /// The keyword after `End` that closes this block, for `End X` blocks.
    pub fn end_keyword(self) -> Option<SyntaxKind> {
        Some(match self {
            BlockKind::Sub => SyntaxKind::SubKeyword,
            BlockKind::Function => SyntaxKind::FunctionKeyword,
            BlockKind::Property => SyntaxKind::PropertyKeyword,
            BlockKind::Type => SyntaxKind::TypeKeyword,
            BlockKind::Enum => SyntaxKind::EnumKeyword,
            BlockKind::If => SyntaxKind::IfKeyword,
            BlockKind::Select => SyntaxKind::SelectKeyword,
            BlockKind::With => SyntaxKind::WithKeyword,
            BlockKind::For | BlockKind::While | BlockKind::Do => return None,
        })
    }

    pub fn from_end_keyword(kind: SyntaxKind) -> Option<BlockKind> {
        Some(match kind {
            SyntaxKind::SubKeyword => BlockKind::Sub,
            SyntaxKind::FunctionKeyword => BlockKind::Function,
            SyntaxKind::PropertyKeyword => BlockKind::Property,
            SyntaxKind::TypeKeyword => BlockKind::Type,
            SyntaxKind::EnumKeyword => BlockKind::Enum,
            SyntaxKind::IfKeyword => BlockKind::If,
            SyntaxKind::SelectKeyword => BlockKind::Select,
            SyntaxKind::WithKeyword => BlockKind::With,
            _ => return None,
        })
    }

    pub fn opener_text(self) -> &'static str {
        match self {
            BlockKind::Sub => "Sub",
            BlockKind::Function => "Function",
            BlockKind::Property => "Property",
            BlockKind::Type => "Type",
            BlockKind::Enum => "Enum",
            BlockKind::If => "If",
            BlockKind::Select => "Select Case",
            BlockKind::For => "For",
            BlockKind::While => "While",
            BlockKind::Do => "Do",
            BlockKind::With => "With",
        }
    }

    pub fn terminator_text(self) -> &'static str {
        match self {
            BlockKind::Sub => "End Sub",
            BlockKind::Function => "End Function",
            BlockKind::Property => "End Property",
            BlockKind::Type => "End Type",
            BlockKind::Enum => "End Enum",
            BlockKind::If => "End If",
            BlockKind::Select => "End Select",
            BlockKind::For => "Next",
            BlockKind::While => "Wend",
            BlockKind::Do => "Loop",
            BlockKind::With => "End With",
        }
    }

    /// The keyword that starts this block's terminator.
    pub fn closing_keyword(self) -> SyntaxKind {
        match self {
            BlockKind::For => SyntaxKind::NextKeyword,
            BlockKind::While => SyntaxKind::WendKeyword,
            BlockKind::Do => SyntaxKind::LoopKeyword,
            _ => SyntaxKind::EndKeyword,
        }
    }

    pub fn is_procedure(self) -> bool {
        matches!(self, BlockKind::Sub | BlockKind::Function | BlockKind::Property)
    }
}
