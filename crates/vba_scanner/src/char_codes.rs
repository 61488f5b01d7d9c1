//! Byte classes used by the scanner. The language is ASCII outside string
//! literals and comments, so all tests work on single bytes.

pub const LINE_FEED: u8 = b'\n';
pub const CARRIAGE_RETURN: u8 = b'\r';
pub const DOUBLE_QUOTE: u8 = b'"';
pub const SINGLE_QUOTE: u8 = b'\'';
pub const OPEN_BRACKET: u8 = b'[';
pub const CLOSE_BRACKET: u8 = b']';
pub const UNDERSCORE: u8 = b'_';
pub const DOLLAR_SIGN: u8 = b'$';
pub const AMPERSAND: u8 = b'&';

#[inline]
pub fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == UNDERSCORE
}

#[inline]
pub fn is_identifier_part(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == UNDERSCORE
}

#[inline]
pub fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

#[inline]
pub fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

#[inline]
pub fn is_octal_digit(b: u8) -> bool {
    (b'0'..=b'7').contains(&b)
}

/// Horizontal whitespace. A carriage return not followed by a line feed is
/// handled separately as whitespace by the scanner.
#[inline]
pub fn is_white_space_single_line(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | 0x0B | 0x0C)
}

/// Type-declaration suffixes accepted directly after a decimal literal.
#[inline]
pub fn is_numeric_suffix(b: u8) -> bool {
    matches!(b, b'%' | b'!' | b'#' | b'@')
}
