//! vba_syntax: syntax kinds, keyword resolution and the concrete syntax tree
//! for VBA source.
//!
//! The tree is an index arena: nodes and tokens are addressed by `NodeId` and
//! `TokenId`, carry parent links and field-labelled children, and together
//! cover every byte of the source they were built from.

pub mod builder;
pub mod field;
pub mod keywords;
pub mod syntax_kind;
pub mod tree;
pub mod types;
pub mod visitor;

pub use builder::{Checkpoint, TreeBuilder};
pub use field::FieldName;
pub use keywords::{is_predefined_type, lookup_keyword, resolve_keyword, word_eq};
pub use syntax_kind::SyntaxKind;
pub use tree::{Child, NodeId, SyntaxElement, SyntaxTree, TokenData, TokenId, Trivia};
pub use types::*;
pub use visitor::{for_each_child, walk, SyntaxVisitor, VisitControl};
