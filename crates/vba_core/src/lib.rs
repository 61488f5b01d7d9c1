//! vba_core: Source text primitives shared by every stage of the VBA parser.
//!
//! Byte offsets, spans and the offset-to-line mapping used by diagnostics.

pub mod text;

pub use text::{LineAndColumn, LineMap, TextPos, TextSpan};
