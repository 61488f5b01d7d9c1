//! vba_parser: error-tolerant parser for VBA source.
//!
//! Produces a concrete syntax tree for any input, including the empty string
//! and arbitrary bytes. The tree covers every byte of the input; problems are
//! recorded as error nodes, missing tokens and diagnostics.
//!
//! ```
//! let tree = vba_parser::parse("x = 1 + 2 * 3\n");
//! assert!(!tree.has_errors());
//! assert_eq!(
//!     tree.to_sexp(),
//!     "(source_file (assignment_statement target: (identifier) value: (binary_expression \
//!      left: (number_literal) right: (binary_expression left: (number_literal) \
//!      right: (number_literal)))))"
//! );
//! ```

mod batch;
mod blocks;
mod declarations;
mod expressions;
mod parser;
mod precedence;
mod statements;
mod utilities;
pub mod validate;

pub use batch::{parse_batch, ParsedFile};
pub use parser::Parser;
pub use precedence::{get_binary_operator_precedence, OperatorPrecedence};

use vba_core::TextSpan;
use vba_diagnostics::{messages, Diagnostic};
use vba_options::ParserOptions;
use vba_syntax::SyntaxTree;

/// Parses `text` with default options.
pub fn parse(text: &str) -> SyntaxTree {
    parse_with_options(text, &ParserOptions::default())
}

pub fn parse_with_options(text: &str, options: &ParserOptions) -> SyntaxTree {
    Parser::new(text.as_bytes(), options).parse_source_file()
}

/// Parses raw bytes. Input that is not valid UTF-8 is still parsed as
/// bytes; a warning marks the first invalid sequence.
pub fn parse_bytes(bytes: &[u8], options: &ParserOptions) -> SyntaxTree {
    let mut tree = Parser::new(bytes, options).parse_source_file();
    if let Err(error) = simdutf8::compat::from_utf8(bytes) {
        let valid_up_to = error.valid_up_to();
        tree.push_diagnostic(Diagnostic::new(
            TextSpan::new(valid_up_to as u32, 1),
            &messages::SOURCE_IS_NOT_VALID_UTF8,
            &[],
        ));
    }
    tree
}
