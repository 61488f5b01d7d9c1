//! The concrete syntax tree.
//!
//! Nodes and tokens live in two flat arenas owned by [`SyntaxTree`] and are
//! addressed by index. Every byte of the source belongs to exactly one token,
//! either as the token's own text or as part of its leading trivia, so the
//! leaves of a tree always spell out the input.

use crate::visitor::{walk, SyntaxVisitor, VisitControl};
use crate::{FieldName, NodeFlags, SyntaxKind, TokenFlags};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt::Write as _;
use vba_core::{LineAndColumn, LineMap, TextPos, TextSpan};
use vba_diagnostics::Diagnostic;

/// Index of a node in its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

/// Index of a token in its tree. Token ids follow document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TokenId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Either a node or a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxElement {
    Node(NodeId),
    Token(TokenId),
}

impl SyntaxElement {
    pub fn as_node(self) -> Option<NodeId> {
        match self {
            SyntaxElement::Node(id) => Some(id),
            SyntaxElement::Token(_) => None,
        }
    }

    pub fn as_token(self) -> Option<TokenId> {
        match self {
            SyntaxElement::Token(id) => Some(id),
            SyntaxElement::Node(_) => None,
        }
    }
}

/// A child slot of a node: the element plus the field it fills, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Child {
    pub field: Option<FieldName>,
    pub element: SyntaxElement,
}

/// Whitespace, a comment or a line continuation preceding a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Trivia {
    #[serde(serialize_with = "serialize_kind")]
    pub kind: SyntaxKind,
    #[serde(serialize_with = "serialize_span")]
    pub span: TextSpan,
}

/// A leaf of the tree.
#[derive(Debug, Clone)]
pub struct TokenData {
    pub kind: SyntaxKind,
    /// The token's own text, excluding leading trivia.
    pub span: TextSpan,
    pub flags: TokenFlags,
    pub(crate) trivia_start: u32,
    pub(crate) trivia_end: u32,
    pub(crate) parent: Option<NodeId>,
}

impl TokenData {
    pub fn is_missing(&self) -> bool {
        self.flags.contains(TokenFlags::MISSING)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: SyntaxKind,
    pub(crate) span: TextSpan,
    pub(crate) full_span: TextSpan,
    pub(crate) flags: NodeFlags,
    pub(crate) children: Vec<Child>,
    pub(crate) parent: Option<NodeId>,
}

/// A parsed source file: the tree, the source bytes it covers and the
/// diagnostics produced while building it.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub(crate) source: Vec<u8>,
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) tokens: Vec<TokenData>,
    pub(crate) trivia: Vec<Trivia>,
    pub(crate) root: NodeId,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) line_map: LineMap,
}

impl SyntaxTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    pub fn kind(&self, node: NodeId) -> SyntaxKind {
        self.nodes[node.index()].kind
    }

    /// The node's text range, excluding the leading trivia of its first token.
    pub fn span(&self, node: NodeId) -> TextSpan {
        self.nodes[node.index()].span
    }

    /// The node's text range including leading trivia.
    pub fn full_span(&self, node: NodeId) -> TextSpan {
        self.nodes[node.index()].full_span
    }

    pub fn node_flags(&self, node: NodeId) -> NodeFlags {
        self.nodes[node.index()].flags
    }

    pub fn has_error(&self, node: NodeId) -> bool {
        self.node_flags(node).contains(NodeFlags::HAS_ERROR)
    }

    pub fn is_incomplete(&self, node: NodeId) -> bool {
        self.node_flags(node).contains(NodeFlags::INCOMPLETE)
    }

    pub fn children(&self, node: NodeId) -> &[Child] {
        &self.nodes[node.index()].children
    }

    /// Child nodes only, in order.
    pub fn child_nodes(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(node).iter().filter_map(|c| c.element.as_node())
    }

    pub fn child_by_field(&self, node: NodeId, field: FieldName) -> Option<SyntaxElement> {
        self.children_by_field(node, field).next()
    }

    pub fn children_by_field(
        &self,
        node: NodeId,
        field: FieldName,
    ) -> impl Iterator<Item = SyntaxElement> + '_ {
        self.children(node)
            .iter()
            .filter(move |c| c.field == Some(field))
            .map(|c| c.element)
    }

    /// The first child filling `field`, if it is a node.
    pub fn node_by_field(&self, node: NodeId, field: FieldName) -> Option<NodeId> {
        self.child_by_field(node, field).and_then(SyntaxElement::as_node)
    }

    /// The first child filling `field`, if it is a token.
    pub fn token_by_field(&self, node: NodeId, field: FieldName) -> Option<TokenId> {
        self.child_by_field(node, field).and_then(SyntaxElement::as_token)
    }

    /// The first anonymous or named child token of the given kind.
    pub fn child_token(&self, node: NodeId, kind: SyntaxKind) -> Option<TokenId> {
        self.children(node)
            .iter()
            .filter_map(|c| c.element.as_token())
            .find(|&t| self.tokens[t.index()].kind == kind)
    }

    pub fn parent(&self, element: SyntaxElement) -> Option<NodeId> {
        match element {
            SyntaxElement::Node(id) => self.nodes[id.index()].parent,
            SyntaxElement::Token(id) => self.tokens[id.index()].parent,
        }
    }

    /// The field `element` fills in its parent.
    pub fn field_of(&self, element: SyntaxElement) -> Option<FieldName> {
        let parent = self.parent(element)?;
        self.children(parent)
            .iter()
            .find(|c| c.element == element)
            .and_then(|c| c.field)
    }

    pub fn ancestors(&self, element: SyntaxElement) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(element), move |&n| self.nodes[n.index()].parent)
    }

    pub fn next_sibling(&self, element: SyntaxElement) -> Option<SyntaxElement> {
        let (siblings, index) = self.sibling_position(element)?;
        siblings.get(index + 1).map(|c| c.element)
    }

    pub fn prev_sibling(&self, element: SyntaxElement) -> Option<SyntaxElement> {
        let (siblings, index) = self.sibling_position(element)?;
        index.checked_sub(1).map(|i| siblings[i].element)
    }

    fn sibling_position(&self, element: SyntaxElement) -> Option<(&[Child], usize)> {
        let parent = self.parent(element)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|c| c.element == element)?;
        Some((siblings, index))
    }

    /// All nodes below and including `node`, in pre-order.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        struct Collect(Vec<NodeId>);
        impl SyntaxVisitor for Collect {
            fn enter_node(&mut self, _: &SyntaxTree, node: NodeId, _: Option<FieldName>) -> VisitControl {
                self.0.push(node);
                VisitControl::Continue
            }
        }
        let mut collect = Collect(Vec::new());
        walk(self, node, &mut collect);
        collect.0
    }

    /// Every node of the given kind, in document order.
    pub fn find_all(&self, kind: SyntaxKind) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&n| self.kind(n) == kind)
            .collect()
    }

    /// The leaves of the tree in document order: every token plus every
    /// childless node (zero-width error nodes and empty blocks).
    pub fn leaves(&self) -> Vec<SyntaxElement> {
        struct Collect(Vec<SyntaxElement>);
        impl SyntaxVisitor for Collect {
            fn enter_node(&mut self, tree: &SyntaxTree, node: NodeId, _: Option<FieldName>) -> VisitControl {
                if tree.children(node).is_empty() {
                    self.0.push(SyntaxElement::Node(node));
                }
                VisitControl::Continue
            }

            fn visit_token(&mut self, _: &SyntaxTree, token: TokenId, _: Option<FieldName>) {
                self.0.push(SyntaxElement::Token(token));
            }
        }
        let mut collect = Collect(Vec::with_capacity(self.tokens.len()));
        walk(self, self.root, &mut collect);
        collect.0
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    pub fn token(&self, token: TokenId) -> &TokenData {
        &self.tokens[token.index()]
    }

    pub fn tokens(&self) -> impl Iterator<Item = (TokenId, &TokenData)> {
        self.tokens
            .iter()
            .enumerate()
            .map(|(i, data)| (TokenId(i as u32), data))
    }

    pub fn leading_trivia(&self, token: TokenId) -> &[Trivia] {
        let data = &self.tokens[token.index()];
        &self.trivia[data.trivia_start as usize..data.trivia_end as usize]
    }

    /// The token's text range including leading trivia.
    pub fn token_full_span(&self, token: TokenId) -> TextSpan {
        let data = &self.tokens[token.index()];
        match self.leading_trivia(token).first() {
            Some(first) => TextSpan::from_bounds(first.span.start, data.span.end()),
            None => data.span,
        }
    }

    pub fn token_text(&self, token: TokenId) -> Cow<'_, str> {
        String::from_utf8_lossy(self.tokens[token.index()].span.slice(&self.source))
    }

    pub fn trivia_text(&self, trivia: &Trivia) -> Cow<'_, str> {
        String::from_utf8_lossy(trivia.span.slice(&self.source))
    }

    // ========================================================================
    // Text
    // ========================================================================

    /// The source bytes the tree was built from.
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.source)
    }

    /// Line and column of a byte offset, e.g. the start of a diagnostic.
    pub fn line_and_column(&self, pos: TextPos) -> LineAndColumn {
        self.line_map.line_and_column_of(pos)
    }

    /// Text of a node, excluding its leading trivia.
    pub fn node_text(&self, node: NodeId) -> Cow<'_, str> {
        String::from_utf8_lossy(self.span(node).slice(&self.source))
    }

    pub fn element_kind(&self, element: SyntaxElement) -> SyntaxKind {
        match element {
            SyntaxElement::Node(id) => self.kind(id),
            SyntaxElement::Token(id) => self.token(id).kind,
        }
    }

    pub fn element_span(&self, element: SyntaxElement) -> TextSpan {
        match element {
            SyntaxElement::Node(id) => self.span(id),
            SyntaxElement::Token(id) => self.token(id).span,
        }
    }

    pub fn element_text(&self, element: SyntaxElement) -> Cow<'_, str> {
        String::from_utf8_lossy(self.element_span(element).slice(&self.source))
    }

    /// Rebuilds the source by concatenating every leaf's trivia and text.
    pub fn leaf_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.source.len());
        for leaf in self.leaves() {
            if let SyntaxElement::Token(id) = leaf {
                for trivia in self.leading_trivia(id) {
                    out.extend_from_slice(trivia.span.slice(&self.source));
                }
                out.extend_from_slice(self.token(id).span.slice(&self.source));
            }
        }
        out
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Appends diagnostics produced after parsing, e.g. by consumer checks.
    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Renders the named structure of the tree as an S-expression, in the
    /// format used by tree-query runtimes:
    /// `(source_file (assignment_statement target: (identifier) ...))`.
    pub fn to_sexp(&self) -> String {
        let mut printer = SexpPrinter {
            out: String::new(),
        };
        walk(self, self.root, &mut printer);
        printer.out
    }

    /// Serializes the whole tree, tokens and trivia included. Nodes are
    /// written as they are walked, so the output depth never reaches the
    /// call stack.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut writer = JsonWriter {
            out: String::new(),
            open: Vec::new(),
            error: None,
        };
        walk(self, self.root, &mut writer);
        match writer.error {
            Some(error) => Err(error),
            None => Ok(writer.out),
        }
    }
}

#[derive(Serialize)]
struct JsonToken<'a> {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<FieldName>,
    start: u32,
    end: u32,
    text: Cow<'a, str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    missing: bool,
    #[serde(skip_serializing_if = "<[Trivia]>::is_empty")]
    trivia: &'a [Trivia],
}

struct JsonWriter {
    out: String,
    /// One entry per open node: whether its `children` array was started.
    open: Vec<bool>,
    error: Option<serde_json::Error>,
}

impl JsonWriter {
    fn begin_child(&mut self) {
        if let Some(started) = self.open.last_mut() {
            if *started {
                self.out.push(',');
            } else {
                *started = true;
                self.out.push_str(",\"children\":[");
            }
        }
    }
}

impl SyntaxVisitor for JsonWriter {
    fn enter_node(&mut self, tree: &SyntaxTree, node: NodeId, field: Option<FieldName>) -> VisitControl {
        self.begin_child();
        let span = tree.span(node);
        let _ = write!(self.out, "{{\"kind\":\"{}\"", tree.kind(node).name());
        if let Some(field) = field {
            let _ = write!(self.out, ",\"field\":\"{}\"", field);
        }
        let _ = write!(self.out, ",\"start\":{},\"end\":{}", span.start, span.end());
        if tree.is_incomplete(node) {
            self.out.push_str(",\"incomplete\":true");
        }
        self.open.push(false);
        VisitControl::Continue
    }

    fn leave_node(&mut self, _: &SyntaxTree, _: NodeId) {
        if self.open.pop() == Some(true) {
            self.out.push(']');
        }
        self.out.push('}');
    }

    fn visit_token(&mut self, tree: &SyntaxTree, token: TokenId, field: Option<FieldName>) {
        self.begin_child();
        let data = tree.token(token);
        let element = JsonToken {
            kind: data.kind.name(),
            field,
            start: data.span.start,
            end: data.span.end(),
            text: tree.token_text(token),
            missing: data.is_missing(),
            trivia: tree.leading_trivia(token),
        };
        match serde_json::to_string(&element) {
            Ok(json) => self.out.push_str(&json),
            Err(error) => {
                self.error.get_or_insert(error);
            }
        }
    }
}

fn serialize_kind<S: serde::Serializer>(kind: &SyntaxKind, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(kind.name())
}

fn serialize_span<S: serde::Serializer>(span: &TextSpan, s: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeTuple;
    let mut tuple = s.serialize_tuple(2)?;
    tuple.serialize_element(&span.start)?;
    tuple.serialize_element(&span.end())?;
    tuple.end()
}

struct SexpPrinter {
    out: String,
}

impl SexpPrinter {
    fn open(&mut self, field: Option<FieldName>, label: &str) {
        if !self.out.is_empty() {
            self.out.push(' ');
        }
        if let Some(field) = field {
            let _ = write!(self.out, "{}: ", field);
        }
        self.out.push('(');
        self.out.push_str(label);
    }
}

impl SyntaxVisitor for SexpPrinter {
    fn enter_node(&mut self, tree: &SyntaxTree, node: NodeId, field: Option<FieldName>) -> VisitControl {
        self.open(field, tree.kind(node).name());
        VisitControl::Continue
    }

    fn leave_node(&mut self, _: &SyntaxTree, _: NodeId) {
        self.out.push(')');
    }

    fn visit_token(&mut self, tree: &SyntaxTree, token: TokenId, field: Option<FieldName>) {
        let data = tree.token(token);
        if data.is_missing() {
            let label = match data.kind.keyword_text().or_else(|| data.kind.punctuation_text()) {
                Some(text) => format!("MISSING \"{}\"", text),
                None => format!("MISSING {}", data.kind.name()),
            };
            self.open(field, &label);
            self.out.push(')');
        } else if data.kind.is_named() {
            self.open(field, data.kind.name());
            self.out.push(')');
        }
    }
}
