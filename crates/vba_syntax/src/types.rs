//! Flag types for tokens and nodes of the syntax tree.

bitflags::bitflags! {
    /// Flags describing how a token was produced.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFlags: u16 {
        const NONE                  = 0;
        /// Zero-width token synthesized by the parser for a missing terminator.
        const MISSING               = 1 << 0;
        /// A string literal or bracketed identifier with no closing delimiter.
        const UNTERMINATED          = 1 << 1;
        /// A number literal whose prefix was not followed by valid digits.
        const MALFORMED             = 1 << 2;
        const HEX_SPECIFIER         = 1 << 3;
        const OCTAL_SPECIFIER       = 1 << 4;
        /// The token follows a newline (or starts the file) with nothing but
        /// whitespace in between.
        const AT_LINE_START         = 1 << 5;
        /// Leading trivia of this token contains whitespace.
        const PRECEDING_WHITESPACE  = 1 << 6;
        /// An identifier ending in a `$` type suffix.
        const TYPE_SUFFIX           = 1 << 7;

        const LEXICAL_ERROR = Self::UNTERMINATED.bits() | Self::MALFORMED.bits();
    }
}

bitflags::bitflags! {
    /// Flags recorded on interior nodes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u16 {
        const NONE        = 0;
        /// This node, or any node below it, contains an error node, a bad
        /// token or a missing token.
        const HAS_ERROR   = 1 << 0;
        /// A block construct closed without its terminator.
        const INCOMPLETE  = 1 << 1;
    }
}
