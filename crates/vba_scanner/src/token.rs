use vba_core::TextSpan;
use vba_syntax::{SyntaxKind, TokenFlags};

/// A raw token produced by the [`Scanner`](crate::Scanner): significant
/// tokens and trivia alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInfo {
    pub kind: SyntaxKind,
    pub span: TextSpan,
    pub flags: TokenFlags,
}

impl TokenInfo {
    pub fn new(kind: SyntaxKind, span: TextSpan) -> Self {
        Self {
            kind,
            span,
            flags: TokenFlags::NONE,
        }
    }

    pub fn with_flags(mut self, flags: TokenFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }

    pub fn len(&self) -> u32 {
        self.span.length
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }
}
