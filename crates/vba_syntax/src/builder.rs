//! Incremental construction of a [`SyntaxTree`].
//!
//! The parser drives a `TreeBuilder` as it consumes tokens: it opens a node,
//! pushes tokens and child nodes into it and closes it. Children are kept in
//! one flat buffer until their parent closes, which lets the parser wrap
//! already-built children in a new node after the fact (needed for binary
//! operators and postfix chains, where the operator is only seen after the
//! left operand has been built).

use crate::tree::{Child, NodeData, NodeId, SyntaxElement, SyntaxTree, TokenData, TokenId, Trivia};
use crate::{FieldName, NodeFlags, SyntaxKind, TokenFlags};
use std::ops::Range;
use vba_core::{LineMap, TextPos, TextSpan};
use vba_diagnostics::Diagnostic;

/// A position in the child buffer to which a node can later be wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

#[derive(Debug)]
struct OpenNode {
    kind: SyntaxKind,
    field: Option<FieldName>,
    first_child: usize,
}

pub struct TreeBuilder {
    source: Vec<u8>,
    trivia: Vec<Trivia>,
    nodes: Vec<NodeData>,
    tokens: Vec<TokenData>,
    open: Vec<OpenNode>,
    children: Vec<Child>,
    offset: TextPos,
}

impl TreeBuilder {
    /// Creates a builder over `source`. `trivia` holds every trivia span of
    /// the file in order; tokens refer to it by index range.
    pub fn new(source: Vec<u8>, trivia: Vec<Trivia>) -> Self {
        Self {
            source,
            trivia,
            nodes: Vec::new(),
            tokens: Vec::new(),
            open: Vec::new(),
            children: Vec::new(),
            offset: 0,
        }
    }

    pub fn start_node(&mut self, kind: SyntaxKind, field: Option<FieldName>) {
        self.open.push(OpenNode {
            kind,
            field,
            first_child: self.children.len(),
        });
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.children.len())
    }

    /// Opens a node that adopts every child pushed since `checkpoint`.
    ///
    /// The new node takes over the field of the first adopted child, and that
    /// child is relabelled with `inner_field`. Wrapping `a` (pushed as
    /// `right`) into a binary expression with `inner_field = left` therefore
    /// yields `right: (binary_expression left: a ...)`.
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind, inner_field: Option<FieldName>) {
        let floor = self.open.last().map_or(0, |n| n.first_child);
        let first_child = checkpoint.0.clamp(floor, self.children.len());
        let field = match self.children.get_mut(first_child) {
            Some(child) => std::mem::replace(&mut child.field, inner_field),
            None => None,
        };
        self.open.push(OpenNode {
            kind,
            field,
            first_child,
        });
    }

    pub fn finish_node(&mut self) -> NodeId {
        self.finish_node_with(NodeFlags::NONE)
    }

    /// Closes the innermost open node, adding `flags` to the ones derived
    /// from its children.
    pub fn finish_node_with(&mut self, flags: NodeFlags) -> NodeId {
        let Some(open) = self.open.pop() else {
            return self.push_node(SyntaxKind::Error, None, Vec::new(), flags);
        };
        let children: Vec<Child> = self.children.drain(open.first_child..).collect();
        self.push_node(open.kind, open.field, children, flags)
    }

    fn push_node(
        &mut self,
        kind: SyntaxKind,
        field: Option<FieldName>,
        children: Vec<Child>,
        mut flags: NodeFlags,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let (span, full_span) = match (children.first(), children.last()) {
            (Some(first), Some(last)) => {
                let (first_span, first_full) = self.element_spans(first.element);
                let (last_span, _) = self.element_spans(last.element);
                (
                    TextSpan::from_bounds(first_span.start, last_span.end().max(first_span.start)),
                    TextSpan::from_bounds(first_full.start, last_span.end().max(first_full.start)),
                )
            }
            _ => (TextSpan::empty(self.offset), TextSpan::empty(self.offset)),
        };

        if kind == SyntaxKind::Error || flags.contains(NodeFlags::INCOMPLETE) {
            flags |= NodeFlags::HAS_ERROR;
        }
        for child in &children {
            match child.element {
                SyntaxElement::Node(child_id) => {
                    let data = &mut self.nodes[child_id.index()];
                    data.parent = Some(id);
                    if data.flags.contains(NodeFlags::HAS_ERROR) {
                        flags |= NodeFlags::HAS_ERROR;
                    }
                }
                SyntaxElement::Token(token_id) => {
                    let data = &mut self.tokens[token_id.index()];
                    data.parent = Some(id);
                    if data.kind == SyntaxKind::BadToken
                        || data.flags.intersects(TokenFlags::MISSING | TokenFlags::LEXICAL_ERROR)
                    {
                        flags |= NodeFlags::HAS_ERROR;
                    }
                }
            }
        }

        self.nodes.push(NodeData {
            kind,
            span,
            full_span,
            flags,
            children,
            parent: None,
        });
        self.children.push(Child {
            field,
            element: SyntaxElement::Node(id),
        });
        id
    }

    fn element_spans(&self, element: SyntaxElement) -> (TextSpan, TextSpan) {
        match element {
            SyntaxElement::Node(id) => {
                let data = &self.nodes[id.index()];
                (data.span, data.full_span)
            }
            SyntaxElement::Token(id) => {
                let data = &self.tokens[id.index()];
                let full_start = self
                    .trivia
                    .get(data.trivia_start as usize..data.trivia_end as usize)
                    .and_then(|t| t.first())
                    .map_or(data.span.start, |t| t.span.start);
                (data.span, TextSpan::from_bounds(full_start, data.span.end()))
            }
        }
    }

    /// Pushes a scanned token into the innermost open node.
    pub fn token(
        &mut self,
        field: Option<FieldName>,
        kind: SyntaxKind,
        span: TextSpan,
        flags: TokenFlags,
        trivia: Range<u32>,
    ) -> TokenId {
        let id = TokenId(self.tokens.len() as u32);
        self.tokens.push(TokenData {
            kind,
            span,
            flags,
            trivia_start: trivia.start,
            trivia_end: trivia.end,
            parent: None,
        });
        self.offset = span.end();
        self.children.push(Child {
            field,
            element: SyntaxElement::Token(id),
        });
        id
    }

    /// Pushes a zero-width token standing in for one the source lacks.
    pub fn missing_token(&mut self, field: Option<FieldName>, kind: SyntaxKind) -> TokenId {
        let at = self.offset;
        self.token(field, kind, TextSpan::empty(at), TokenFlags::MISSING, 0..0)
    }

    /// Pushes a zero-width error node, used for a missing operand.
    pub fn empty_error_node(&mut self, field: Option<FieldName>) -> NodeId {
        self.start_node(SyntaxKind::Error, field);
        self.finish_node()
    }

    /// Closes any nodes still open and produces the tree. The outermost node
    /// becomes the root; if the parser left several, they are wrapped in a
    /// `SourceFile`.
    pub fn finish(mut self, diagnostics: Vec<Diagnostic>) -> SyntaxTree {
        while !self.open.is_empty() {
            self.finish_node();
        }
        let root = match self.children.as_slice() {
            [Child {
                element: SyntaxElement::Node(id),
                ..
            }] => *id,
            _ => {
                self.open.push(OpenNode {
                    kind: SyntaxKind::SourceFile,
                    field: None,
                    first_child: 0,
                });
                self.finish_node()
            }
        };
        SyntaxTree {
            line_map: LineMap::new(&self.source),
            source: self.source,
            nodes: self.nodes,
            tokens: self.tokens,
            trivia: self.trivia,
            root,
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(builder: &mut TreeBuilder, field: Option<FieldName>, start: u32, len: u32) -> TokenId {
        builder.token(field, SyntaxKind::Identifier, TextSpan::new(start, len), TokenFlags::NONE, 0..0)
    }

    #[test]
    fn test_wrap_relabels_first_child() {
        // a+b
        let mut builder = TreeBuilder::new(b"a+b".to_vec(), Vec::new());
        builder.start_node(SyntaxKind::SourceFile, None);
        let cp = builder.checkpoint();
        ident(&mut builder, Some(FieldName::Value), 0, 1);
        builder.start_node_at(cp, SyntaxKind::BinaryExpression, Some(FieldName::Left));
        builder.token(Some(FieldName::Operator), SyntaxKind::PlusToken, TextSpan::new(1, 1), TokenFlags::NONE, 0..0);
        ident(&mut builder, Some(FieldName::Right), 2, 1);
        let binary = builder.finish_node();
        builder.finish_node();
        let tree = builder.finish(Vec::new());

        assert_eq!(tree.field_of(SyntaxElement::Node(binary)), Some(FieldName::Value));
        assert_eq!(tree.span(binary), TextSpan::new(0, 3));
        let left = tree.token_by_field(binary, FieldName::Left).unwrap();
        assert_eq!(tree.token_text(left), "a");
        assert_eq!(tree.kind(tree.root()), SyntaxKind::SourceFile);
        assert_eq!(tree.to_sexp(), "(source_file value: (binary_expression left: (identifier) right: (identifier)))");
    }

    #[test]
    fn test_missing_token_marks_error() {
        let mut builder = TreeBuilder::new(b"x".to_vec(), Vec::new());
        builder.start_node(SyntaxKind::SourceFile, None);
        builder.start_node(SyntaxKind::WhileStatement, None);
        ident(&mut builder, Some(FieldName::Condition), 0, 1);
        builder.missing_token(None, SyntaxKind::WendKeyword);
        let stmt = builder.finish_node_with(NodeFlags::INCOMPLETE);
        builder.finish_node();
        let tree = builder.finish(Vec::new());

        assert!(tree.is_incomplete(stmt));
        assert!(tree.has_error(tree.root()));
        assert_eq!(tree.span(stmt), TextSpan::new(0, 1));
        assert!(tree.to_sexp().contains("(MISSING \"Wend\")"));
    }

    #[test]
    fn test_unbalanced_builder_still_produces_a_root() {
        let mut builder = TreeBuilder::new(b"ab".to_vec(), Vec::new());
        ident(&mut builder, None, 0, 1);
        ident(&mut builder, None, 1, 1);
        let tree = builder.finish(Vec::new());
        assert_eq!(tree.kind(tree.root()), SyntaxKind::SourceFile);
        assert_eq!(tree.leaf_bytes(), b"ab");
    }
}
