//! The VBA scanner.
//!
//! Converts source bytes into raw tokens, trivia included, so that the
//! concatenation of every token's text is exactly the input. The scanner
//! never fails: malformed input becomes a `BadToken` reaching to the end of
//! the line, plus a diagnostic.

use crate::char_codes::*;
use crate::token::TokenInfo;
use memchr::{memchr, memchr2};
use vba_core::TextSpan;
use vba_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use vba_syntax::{word_eq, SyntaxKind, TokenFlags};

/// Saved scanner state for lookahead.
#[derive(Debug, Clone, Copy)]
pub struct ScannerState {
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_flags: TokenFlags,
    prev_significant: SyntaxKind,
    at_line_start: bool,
    finished: bool,
    diagnostic_count: usize,
}

/// A lazy, restartable tokenizer over a byte buffer.
pub struct Scanner<'a> {
    text: &'a [u8],
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_flags: TokenFlags,
    /// Last non-trivia token, used to keep `obj.Rem` and `a.5` from being
    /// read as a comment and a number.
    prev_significant: SyntaxKind,
    at_line_start: bool,
    finished: bool,
    diagnostics: DiagnosticCollection,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a [u8]) -> Self {
        Self {
            text,
            pos: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_flags: TokenFlags::NONE,
            prev_significant: SyntaxKind::Newline,
            at_line_start: true,
            finished: false,
            diagnostics: DiagnosticCollection::new(),
        }
    }

    /// Rewinds to the start of the buffer, discarding diagnostics.
    pub fn reset(&mut self) {
        *self = Scanner::new(self.text);
    }

    pub fn text(&self) -> &'a [u8] {
        self.text
    }

    /// Look ahead: save state, call f, restore state and return the result.
    pub fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.save_state();
        let result = f(self);
        self.restore_state(state);
        result
    }

    pub fn save_state(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            token_start: self.token_start,
            token: self.token,
            token_flags: self.token_flags,
            prev_significant: self.prev_significant,
            at_line_start: self.at_line_start,
            finished: self.finished,
            diagnostic_count: self.diagnostics.len(),
        }
    }

    pub fn restore_state(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.token_start = state.token_start;
        self.token = state.token;
        self.token_flags = state.token_flags;
        self.prev_significant = state.prev_significant;
        self.at_line_start = state.at_line_start;
        self.finished = state.finished;
        self.diagnostics.truncate(state.diagnostic_count);
    }

    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    #[inline]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    #[inline]
    pub fn token_end(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    pub fn token_span(&self) -> TextSpan {
        TextSpan::from_bounds(self.token_start as u32, self.pos as u32)
    }

    pub fn token_text(&self) -> &'a [u8] {
        &self.text[self.token_start..self.pos]
    }

    pub fn token_info(&self) -> TokenInfo {
        TokenInfo::new(self.token, self.token_span()).with_flags(self.token_flags)
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    /// Take the accumulated diagnostics, leaving an empty collection.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.text.get(self.pos + offset).copied()
    }

    /// Start of the line break at or after `from`, or the end of input. A
    /// `\r` directly before the `\n` belongs to the line break.
    fn line_end_from(&self, from: usize) -> usize {
        let from = from.min(self.text.len());
        match memchr(LINE_FEED, &self.text[from..]) {
            Some(i) => {
                let lf = from + i;
                if lf > from && self.text[lf - 1] == CARRIAGE_RETURN {
                    lf - 1
                } else {
                    lf
                }
            }
            None => self.text.len(),
        }
    }

    fn error(&mut self, message: &DiagnosticMessage) {
        let span = self.token_span();
        self.diagnostics.add(Diagnostic::new(span, message, &[]));
    }

    /// Scan the next raw token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.token_flags = TokenFlags::NONE;
        self.token_start = self.pos;

        let Some(ch) = self.byte_at(0) else {
            self.token = SyntaxKind::EndOfFile;
            self.mark_significant();
            return self.token;
        };

        self.token = match ch {
            LINE_FEED => self.single(SyntaxKind::Newline),
            CARRIAGE_RETURN if self.byte_at(1) == Some(LINE_FEED) => {
                self.pos += 2;
                SyntaxKind::Newline
            }
            CARRIAGE_RETURN => self.scan_whitespace(),
            c if is_white_space_single_line(c) => self.scan_whitespace(),
            SINGLE_QUOTE => self.scan_comment(),
            DOUBLE_QUOTE => self.scan_string(),
            OPEN_BRACKET => self.scan_bracketed_identifier(),
            AMPERSAND => self.scan_ampersand(),
            b'0'..=b'9' => self.scan_number(),
            b'.' if self.byte_at(1).is_some_and(is_digit) && !self.follows_operand() => self.scan_number(),
            UNDERSCORE if self.line_continuation_end().is_some() => self.scan_line_continuation(),
            c if is_identifier_start(c) => self.scan_identifier(),
            b'(' => self.single(SyntaxKind::OpenParenToken),
            b')' => self.single(SyntaxKind::CloseParenToken),
            b',' => self.single(SyntaxKind::CommaToken),
            b'.' => self.single(SyntaxKind::DotToken),
            b'=' => self.single(SyntaxKind::EqualsToken),
            b'+' => self.single(SyntaxKind::PlusToken),
            b'-' => self.single(SyntaxKind::MinusToken),
            b'*' => self.single(SyntaxKind::AsteriskToken),
            b'/' => self.single(SyntaxKind::SlashToken),
            b'\\' => self.single(SyntaxKind::BackslashToken),
            b'^' => self.single(SyntaxKind::CaretToken),
            b':' => {
                if self.byte_at(1) == Some(b'=') {
                    self.pos += 2;
                    SyntaxKind::ColonEqualsToken
                } else {
                    self.single(SyntaxKind::ColonToken)
                }
            }
            b'<' => match self.byte_at(1) {
                Some(b'>') => {
                    self.pos += 2;
                    SyntaxKind::LessThanGreaterThanToken
                }
                Some(b'=') => {
                    self.pos += 2;
                    SyntaxKind::LessThanEqualsToken
                }
                _ => self.single(SyntaxKind::LessThanToken),
            },
            b'>' => {
                if self.byte_at(1) == Some(b'=') {
                    self.pos += 2;
                    SyntaxKind::GreaterThanEqualsToken
                } else {
                    self.single(SyntaxKind::GreaterThanToken)
                }
            }
            _ => self.scan_invalid_character(),
        };

        if !self.token.is_trivia() {
            self.mark_significant();
        }
        self.token
    }

    fn mark_significant(&mut self) {
        if self.at_line_start {
            self.token_flags |= TokenFlags::AT_LINE_START;
        }
        self.at_line_start = self.token == SyntaxKind::Newline;
        self.prev_significant = self.token;
    }

    #[inline]
    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    fn follows_operand(&self) -> bool {
        matches!(
            self.prev_significant,
            SyntaxKind::Identifier | SyntaxKind::BracketedIdentifier | SyntaxKind::CloseParenToken
        ) && self.token_start > 0
            && !is_white_space_single_line(self.text[self.token_start - 1])
    }

    fn scan_whitespace(&mut self) -> SyntaxKind {
        while let Some(b) = self.byte_at(0) {
            let lone_cr = b == CARRIAGE_RETURN && self.byte_at(1) != Some(LINE_FEED);
            if is_white_space_single_line(b) || lone_cr {
                self.pos += 1;
            } else {
                break;
            }
        }
        SyntaxKind::WhitespaceTrivia
    }

    fn scan_comment(&mut self) -> SyntaxKind {
        self.pos = self.line_end_from(self.pos + 1);
        SyntaxKind::CommentTrivia
    }

    /// If the `_` at the current position ends the line, the position just
    /// past the line break it escapes.
    fn line_continuation_end(&self) -> Option<usize> {
        if self.byte_at(1).is_some_and(is_identifier_part) {
            return None;
        }
        let mut end = self.pos + 1;
        while self.text.get(end).copied().is_some_and(is_white_space_single_line) {
            end += 1;
        }
        match self.text.get(end).copied() {
            Some(LINE_FEED) => Some(end + 1),
            Some(CARRIAGE_RETURN) if self.text.get(end + 1) == Some(&LINE_FEED) => Some(end + 2),
            _ => None,
        }
    }

    fn scan_line_continuation(&mut self) -> SyntaxKind {
        match self.line_continuation_end() {
            Some(end) => {
                self.pos = end;
                SyntaxKind::LineContinuationTrivia
            }
            None => self.scan_identifier(),
        }
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        self.pos += 1;
        while self.byte_at(0).is_some_and(is_identifier_part) {
            self.pos += 1;
        }
        if self.byte_at(0) == Some(DOLLAR_SIGN) {
            self.pos += 1;
            self.token_flags |= TokenFlags::TYPE_SUFFIX;
            return SyntaxKind::Identifier;
        }
        if word_eq(self.token_text(), "Rem") && self.prev_significant != SyntaxKind::DotToken {
            self.pos = self.line_end_from(self.pos);
            return SyntaxKind::CommentTrivia;
        }
        SyntaxKind::Identifier
    }

    fn scan_bracketed_identifier(&mut self) -> SyntaxKind {
        let body = self.pos + 1;
        match memchr2(CLOSE_BRACKET, LINE_FEED, &self.text[body..]) {
            Some(i) if self.text[body + i] == CLOSE_BRACKET => {
                self.pos = body + i + 1;
                SyntaxKind::BracketedIdentifier
            }
            _ => {
                self.pos = self.line_end_from(body);
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::UNTERMINATED_BRACKETED_IDENTIFIER);
                SyntaxKind::BadToken
            }
        }
    }

    fn scan_string(&mut self) -> SyntaxKind {
        self.pos += 1;
        loop {
            match memchr2(DOUBLE_QUOTE, LINE_FEED, &self.text[self.pos..]) {
                Some(i) if self.text[self.pos + i] == DOUBLE_QUOTE => {
                    self.pos += i + 1;
                    // `""` inside a literal is an escaped quote.
                    if self.byte_at(0) == Some(DOUBLE_QUOTE) {
                        self.pos += 1;
                        continue;
                    }
                    return SyntaxKind::StringLiteral;
                }
                _ => {
                    self.pos = self.line_end_from(self.pos);
                    self.token_flags |= TokenFlags::UNTERMINATED;
                    self.error(&messages::UNTERMINATED_STRING_LITERAL);
                    return SyntaxKind::BadToken;
                }
            }
        }
    }

    fn skip_digits(&mut self, class: fn(u8) -> bool) -> usize {
        let start = self.pos;
        while self.byte_at(0).is_some_and(class) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn scan_number(&mut self) -> SyntaxKind {
        self.skip_digits(is_digit);
        if self.byte_at(0) == Some(b'.') {
            self.pos += 1;
            self.skip_digits(is_digit);
        }
        if matches!(self.byte_at(0), Some(b'e' | b'E' | b'd' | b'D')) {
            let after_sign = match self.byte_at(1) {
                Some(b'+' | b'-') => 2,
                _ => 1,
            };
            if self.byte_at(after_sign).is_some_and(is_digit) {
                self.pos += after_sign;
                self.skip_digits(is_digit);
            } else if after_sign == 2 || !self.byte_at(1).is_some_and(is_identifier_part) {
                self.pos += after_sign;
                self.token_flags |= TokenFlags::MALFORMED;
                self.error(&messages::DIGIT_EXPECTED_IN_EXPONENT);
                return SyntaxKind::NumberLiteral;
            }
        }
        if self.byte_at(0).is_some_and(is_numeric_suffix) {
            self.pos += 1;
        }
        SyntaxKind::NumberLiteral
    }

    fn scan_ampersand(&mut self) -> SyntaxKind {
        let (flag, class, message): (TokenFlags, fn(u8) -> bool, &DiagnosticMessage) = match self.byte_at(1) {
            Some(b'H' | b'h') => (TokenFlags::HEX_SPECIFIER, is_hex_digit, &messages::HEXADECIMAL_DIGIT_EXPECTED),
            Some(b'O' | b'o') => (TokenFlags::OCTAL_SPECIFIER, is_octal_digit, &messages::OCTAL_DIGIT_EXPECTED),
            _ => return self.single(SyntaxKind::AmpersandToken),
        };
        self.pos += 2;
        self.token_flags |= flag;
        if self.skip_digits(class) == 0 {
            self.token_flags |= TokenFlags::MALFORMED;
            self.error(message);
        } else if matches!(self.byte_at(0), Some(AMPERSAND | b'%')) {
            self.pos += 1;
        }
        SyntaxKind::NumberLiteral
    }

    fn scan_invalid_character(&mut self) -> SyntaxKind {
        self.pos = self.line_end_from(self.pos + 1);
        self.error(&messages::INVALID_CHARACTER);
        SyntaxKind::BadToken
    }
}

impl Iterator for Scanner<'_> {
    type Item = TokenInfo;

    /// Yields every raw token, ending with exactly one `EndOfFile`.
    fn next(&mut self) -> Option<TokenInfo> {
        if self.finished {
            return None;
        }
        if self.scan() == SyntaxKind::EndOfFile {
            self.finished = true;
        }
        Some(self.token_info())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        Scanner::new(text.as_bytes()).map(|t| t.kind).collect()
    }

    #[test]
    fn test_scan_operators() {
        use SyntaxKind::*;
        assert_eq!(
            kinds("<><=>=:=:<>"),
            vec![
                LessThanGreaterThanToken,
                LessThanEqualsToken,
                GreaterThanEqualsToken,
                ColonEqualsToken,
                ColonToken,
                LessThanGreaterThanToken,
                EndOfFile
            ]
        );
    }

    #[test]
    fn test_scan_identifier_and_keyword_text() {
        let mut scanner = Scanner::new(b"Dim x$ As String");
        assert_eq!(Scanner::scan(&mut scanner), SyntaxKind::Identifier);
        assert_eq!(scanner.token_text(), b"Dim");
        assert!(scanner.token_flags().contains(TokenFlags::AT_LINE_START));
        assert_eq!(Scanner::scan(&mut scanner), SyntaxKind::WhitespaceTrivia);
        assert_eq!(Scanner::scan(&mut scanner), SyntaxKind::Identifier);
        assert_eq!(scanner.token_text(), b"x$");
        assert!(scanner.token_flags().contains(TokenFlags::TYPE_SUFFIX));
        assert!(!scanner.token_flags().contains(TokenFlags::AT_LINE_START));
    }

    #[test]
    fn test_rem_is_a_comment_only_as_a_whole_word() {
        use SyntaxKind::*;
        assert_eq!(kinds("Rem hello\n"), vec![CommentTrivia, Newline, EndOfFile]);
        assert_eq!(kinds("Remark = 1"), vec![Identifier, WhitespaceTrivia, EqualsToken, WhitespaceTrivia, NumberLiteral, EndOfFile]);
        assert_eq!(kinds("x.Rem"), vec![Identifier, DotToken, Identifier, EndOfFile]);
    }

    #[test]
    fn test_string_with_escaped_quote() {
        let mut scanner = Scanner::new(br#""say ""hi""" & x"#);
        assert_eq!(Scanner::scan(&mut scanner), SyntaxKind::StringLiteral);
        assert_eq!(scanner.token_text(), br#""say ""hi""""#);
        assert!(scanner.diagnostics().is_empty());
    }

    #[test]
    fn test_unterminated_string_stops_at_line_end() {
        let mut scanner = Scanner::new(b"\"abc\r\nx");
        assert_eq!(Scanner::scan(&mut scanner), SyntaxKind::BadToken);
        assert_eq!(scanner.token_text(), b"\"abc");
        assert!(scanner.token_flags().contains(TokenFlags::UNTERMINATED));
        assert_eq!(Scanner::scan(&mut scanner), SyntaxKind::Newline);
        assert_eq!(scanner.diagnostics().len(), 1);
    }

    #[test]
    fn test_numbers() {
        let mut scanner = Scanner::new(b"1.5e-3 &HFF& &O17 &H .5");
        assert_eq!(Scanner::scan(&mut scanner), SyntaxKind::NumberLiteral);
        assert_eq!(scanner.token_text(), b"1.5e-3");
        Scanner::scan(&mut scanner);
        assert_eq!(Scanner::scan(&mut scanner), SyntaxKind::NumberLiteral);
        assert_eq!(scanner.token_text(), b"&HFF&");
        Scanner::scan(&mut scanner);
        assert_eq!(Scanner::scan(&mut scanner), SyntaxKind::NumberLiteral);
        assert!(scanner.token_flags().contains(TokenFlags::OCTAL_SPECIFIER));
        Scanner::scan(&mut scanner);
        assert_eq!(Scanner::scan(&mut scanner), SyntaxKind::NumberLiteral);
        assert!(scanner.token_flags().contains(TokenFlags::MALFORMED));
        Scanner::scan(&mut scanner);
        assert_eq!(Scanner::scan(&mut scanner), SyntaxKind::NumberLiteral);
        assert_eq!(scanner.token_text(), b".5");
        assert_eq!(scanner.diagnostics().len(), 1);
    }

    #[test]
    fn test_line_continuation() {
        use SyntaxKind::*;
        assert_eq!(
            kinds("a _\r\n  b"),
            vec![Identifier, WhitespaceTrivia, LineContinuationTrivia, WhitespaceTrivia, Identifier, EndOfFile]
        );
        assert_eq!(kinds("_x"), vec![Identifier, EndOfFile]);
    }

    #[test]
    fn test_save_and_restore_state() {
        let mut scanner = Scanner::new(b"a \"b");
        Scanner::scan(&mut scanner);
        let state = scanner.save_state();
        Scanner::scan(&mut scanner);
        assert_eq!(Scanner::scan(&mut scanner), SyntaxKind::BadToken);
        assert_eq!(scanner.diagnostics().len(), 1);
        scanner.restore_state(state);
        assert!(scanner.diagnostics().is_empty());
        assert_eq!(scanner.token_text(), b"a");
        let peeked = scanner.look_ahead(|s| {
            s.scan();
            s.scan()
        });
        assert_eq!(peeked, SyntaxKind::BadToken);
        assert_eq!(Scanner::scan(&mut scanner), SyntaxKind::WhitespaceTrivia);
    }

    #[test]
    fn test_reset_restarts_the_sequence() {
        let mut scanner = Scanner::new(b"x = 1");
        let first: Vec<_> = scanner.by_ref().collect();
        assert!(scanner.next().is_none());
        scanner.reset();
        let second: Vec<_> = scanner.collect();
        assert_eq!(first, second);
    }
}
