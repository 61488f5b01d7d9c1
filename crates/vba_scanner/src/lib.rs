//! vba_scanner: byte-level lexer for VBA source.
//!
//! - [`Scanner`] is a lazy, restartable iterator over raw tokens (trivia
//!   included) with save/restore lookahead.
//! - [`TokenStream`] folds whitespace, comments and line continuations onto
//!   the following significant token, the shape the parser consumes.

mod char_codes;
mod scanner;
mod stream;
mod token;

pub use scanner::{Scanner, ScannerState};
pub use stream::{LexedToken, TokenStream};
pub use token::TokenInfo;
