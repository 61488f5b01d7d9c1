//! Folding raw tokens into significant tokens with leading trivia.

use crate::scanner::Scanner;
use std::ops::Range;
use vba_core::TextSpan;
use vba_diagnostics::Diagnostic;
use vba_syntax::{SyntaxKind, TokenFlags, Trivia};

/// A significant token together with the trivia that precedes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexedToken {
    pub kind: SyntaxKind,
    pub span: TextSpan,
    pub flags: TokenFlags,
    trivia_start: u32,
    trivia_end: u32,
}

impl LexedToken {
    /// Index range of this token's leading trivia in [`TokenStream::trivia`].
    pub fn trivia(&self) -> Range<u32> {
        self.trivia_start..self.trivia_end
    }

    pub fn has_preceding_whitespace(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDING_WHITESPACE)
    }
}

/// The significant tokens of a file, ending with `EndOfFile`, plus all of its
/// trivia. Trivia after the last significant token is attached to
/// `EndOfFile`, so every byte of the input belongs to exactly one token.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<LexedToken>,
    trivia: Vec<Trivia>,
    diagnostics: Vec<Diagnostic>,
}

impl TokenStream {
    pub fn lex(source: &[u8]) -> Self {
        let mut scanner = Scanner::new(source);
        let mut tokens = Vec::new();
        let mut trivia = Vec::new();
        let mut trivia_start = 0u32;
        let mut preceding_whitespace = false;

        for info in scanner.by_ref() {
            if info.is_trivia() {
                if info.kind != SyntaxKind::CommentTrivia {
                    preceding_whitespace = true;
                }
                trivia.push(Trivia {
                    kind: info.kind,
                    span: info.span,
                });
                continue;
            }
            let mut flags = info.flags;
            if preceding_whitespace {
                flags |= TokenFlags::PRECEDING_WHITESPACE;
            }
            let trivia_end = trivia.len() as u32;
            tokens.push(LexedToken {
                kind: info.kind,
                span: info.span,
                flags,
                trivia_start,
                trivia_end,
            });
            trivia_start = trivia_end;
            preceding_whitespace = false;
        }

        Self {
            tokens,
            trivia,
            diagnostics: scanner.take_diagnostics().into_diagnostics(),
        }
    }

    pub fn tokens(&self) -> &[LexedToken] {
        &self.tokens
    }

    pub fn trivia(&self) -> &[Trivia] {
        &self.trivia
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (Vec<LexedToken>, Vec<Trivia>, Vec<Diagnostic>) {
        (self.tokens, self.trivia, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivia_is_attached_to_the_following_token() {
        let stream = TokenStream::lex(b"  x ' note\n");
        let tokens = stream.tokens();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, SyntaxKind::Identifier);
        assert_eq!(tokens[0].trivia(), 0..1);
        assert!(tokens[0].has_preceding_whitespace());
        assert_eq!(tokens[1].kind, SyntaxKind::Newline);
        assert_eq!(tokens[1].trivia(), 1..3);
        assert_eq!(stream.trivia()[2].kind, SyntaxKind::CommentTrivia);
        assert_eq!(tokens[2].kind, SyntaxKind::EndOfFile);
        assert!(tokens[2].trivia().is_empty());
    }

    #[test]
    fn test_trailing_trivia_belongs_to_end_of_file() {
        let stream = TokenStream::lex(b"x  ");
        let eof = stream.tokens()[1];
        assert_eq!(eof.kind, SyntaxKind::EndOfFile);
        assert_eq!(eof.trivia(), 0..1);
        assert_eq!(eof.span, TextSpan::empty(3));
    }
}
