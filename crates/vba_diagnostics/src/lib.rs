//! vba_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Every problem the scanner or parser finds is recorded as a [`Diagnostic`]
//! rather than returned as an error: parsing always produces a tree, and the
//! diagnostics travel alongside it as a flat list of (span, kind) records.

use miette::{LabeledSpan, MietteDiagnostic, NamedSource, Report, Severity};
use std::fmt;
use vba_core::text::TextSpan;

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
            DiagnosticCategory::Message => write!(f, "message"),
        }
    }
}

/// The coarse taxonomy of syntax problems. Callers that only care about
/// "what went wrong" match on this rather than on individual codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum DiagnosticKind {
    /// Unterminated string literal or invalid character.
    #[error("lexical error")]
    LexError,
    /// No rule matches the current token.
    #[error("unexpected token")]
    UnexpectedToken,
    /// A block's terminator was never found.
    #[error("unterminated construct")]
    UnterminatedConstruct,
    /// A literal matched its broad pattern but failed a structural check.
    #[error("malformed literal")]
    MalformedLiteral,
    /// Not a syntax problem; informational notes about the input.
    #[error("note")]
    Info,
}

/// A diagnostic message template with a code, category and kind.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 1002).
    pub code: u32,
    pub category: DiagnosticCategory,
    pub kind: DiagnosticKind,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The source span the diagnostic points at.
    pub span: TextSpan,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
    pub kind: DiagnosticKind,
    /// Secondary locations (e.g. where a missing terminator was expected).
    pub related_information: Vec<Diagnostic>,
}

impl Diagnostic {
    pub fn new(span: TextSpan, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            span,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
            kind: message.kind,
            related_information: Vec::new(),
        }
    }

    /// Add related diagnostic information.
    pub fn with_related(mut self, related: Diagnostic) -> Self {
        self.related_information.push(related);
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// Build a `miette` report that renders this diagnostic against its
    /// source text, with related locations as extra labels.
    pub fn to_report(&self, source_name: &str, source: &str) -> Report {
        let severity = match self.category {
            DiagnosticCategory::Error => Severity::Error,
            DiagnosticCategory::Warning => Severity::Warning,
            DiagnosticCategory::Message => Severity::Advice,
        };
        let mut labels = vec![LabeledSpan::at(
            clamp(self.span, source.len()),
            self.kind.to_string(),
        )];
        for related in &self.related_information {
            labels.push(LabeledSpan::at(
                clamp(related.span, source.len()),
                related.message_text.clone(),
            ));
        }
        let diagnostic = MietteDiagnostic::new(self.message_text.clone())
            .with_code(format!("VB{}", self.code))
            .with_severity(severity)
            .with_labels(labels);
        Report::new(diagnostic).with_source_code(NamedSource::new(source_name, source.to_string()))
    }
}

fn clamp(span: TextSpan, len: usize) -> std::ops::Range<usize> {
    let start = (span.start as usize).min(len);
    let end = (span.end() as usize).min(len);
    start..end
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}) {} VB{}: {}",
            self.span.start, self.category, self.code, self.message_text
        )
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// A collection of diagnostics accumulated while scanning and parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Iterate over the diagnostics of a given kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Drop diagnostics reported after the first `len`, used when a
    /// speculative scan is rolled back.
    pub fn truncate(&mut self, len: usize) {
        self.diagnostics.truncate(len);
    }

    /// Sort diagnostics by position. The sort is stable, so diagnostics at
    /// the same offset keep the order they were reported in.
    pub fn sort(&mut self) {
        self.diagnostics
            .sort_by(|a, b| a.span.start.cmp(&b.span.start).then(a.span.end().cmp(&b.span.end())));
    }
}

// ============================================================================
// Diagnostic messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $kind:ident, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, kind: DiagnosticKind::$kind, message: $msg }
        };
        ($code:expr, Warning, $kind:ident, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, kind: DiagnosticKind::$kind, message: $msg }
        };
        ($code:expr, Message, $kind:ident, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Message, kind: DiagnosticKind::$kind, message: $msg }
        };
    }

    // ========================================================================
    // Scanner (1000-1099)
    // ========================================================================
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1002, Error, LexError, "Unterminated string literal.");
    pub const INVALID_CHARACTER: DiagnosticMessage = diag!(1003, Error, LexError, "Invalid character.");
    pub const UNTERMINATED_BRACKETED_IDENTIFIER: DiagnosticMessage = diag!(1004, Error, LexError, "Bracketed identifier is missing its closing ']'.");
    pub const HEXADECIMAL_DIGIT_EXPECTED: DiagnosticMessage = diag!(1010, Error, MalformedLiteral, "Hexadecimal digit expected.");
    pub const OCTAL_DIGIT_EXPECTED: DiagnosticMessage = diag!(1011, Error, MalformedLiteral, "Octal digit expected.");
    pub const DIGIT_EXPECTED_IN_EXPONENT: DiagnosticMessage = diag!(1012, Error, MalformedLiteral, "Digit expected in exponent.");
    pub const SOURCE_IS_NOT_VALID_UTF8: DiagnosticMessage = diag!(1090, Warning, Info, "Source is not valid UTF-8; invalid bytes are kept verbatim.");

    // ========================================================================
    // Parser (1100-1199)
    // ========================================================================
    pub const _0_EXPECTED: DiagnosticMessage = diag!(1100, Error, UnexpectedToken, "'{0}' expected.");
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage = diag!(1101, Error, UnexpectedToken, "Identifier expected.");
    pub const EXPRESSION_EXPECTED: DiagnosticMessage = diag!(1102, Error, UnexpectedToken, "Expression expected.");
    pub const STATEMENT_EXPECTED: DiagnosticMessage = diag!(1103, Error, UnexpectedToken, "Statement expected.");
    pub const UNEXPECTED_TOKEN: DiagnosticMessage = diag!(1104, Error, UnexpectedToken, "Unexpected '{0}'.");
    pub const END_OF_STATEMENT_EXPECTED: DiagnosticMessage = diag!(1105, Error, UnexpectedToken, "End of statement expected.");
    pub const _0_WITHOUT_1: DiagnosticMessage = diag!(1106, Error, UnexpectedToken, "'{0}' without '{1}'.");
    pub const TYPE_EXPECTED: DiagnosticMessage = diag!(1107, Error, UnexpectedToken, "Type name expected.");
    pub const _0_IS_NOT_SUPPORTED_IN_THE_MINIMAL_DIALECT: DiagnosticMessage = diag!(1108, Error, UnexpectedToken, "'{0}' statements are not supported in the minimal dialect.");
    pub const DO_LOOP_CANNOT_HAVE_TWO_CONDITIONS: DiagnosticMessage = diag!(1109, Error, UnexpectedToken, "A 'Do' loop cannot have both a 'Do' condition and a 'Loop' condition.");
    pub const _0_ONLY_ALLOWED_AT_MODULE_LEVEL: DiagnosticMessage = diag!(1110, Error, UnexpectedToken, "'{0}' is only allowed at module level.");

    pub const _0_IS_MISSING_1: DiagnosticMessage = diag!(1150, Error, UnterminatedConstruct, "'{0}' is missing its closing '{1}'.");
    pub const _0_EXPECTED_HERE: DiagnosticMessage = diag!(1151, Message, UnterminatedConstruct, "'{0}' expected here.");
    pub const NESTING_TOO_DEEP: DiagnosticMessage = diag!(1152, Error, UnterminatedConstruct, "Nesting is too deep; the rest of this line was not parsed.");
    pub const TOKEN_BUDGET_EXHAUSTED: DiagnosticMessage = diag!(1153, Warning, UnterminatedConstruct, "Token budget of {0} exhausted; the remaining input was not parsed.");

    // ========================================================================
    // Consumer checks (1200-1299)
    // ========================================================================
    pub const EXIT_0_NOT_WITHIN_1: DiagnosticMessage = diag!(1200, Error, UnexpectedToken, "'Exit {0}' is not within a '{1}'.");
}
