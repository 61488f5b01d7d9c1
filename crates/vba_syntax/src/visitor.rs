//! Tree traversal.
//!
//! [`walk`] visits a subtree in document order without recursion, so trees
//! from deeply nested input never exhaust the call stack. Implement
//! [`SyntaxVisitor`] and override only the callbacks you need.

use crate::tree::{NodeId, SyntaxElement, SyntaxTree, TokenId};
use crate::FieldName;

/// Returned from [`SyntaxVisitor::enter_node`] to control descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitControl {
    Continue,
    SkipChildren,
}

pub trait SyntaxVisitor {
    fn enter_node(&mut self, _tree: &SyntaxTree, _node: NodeId, _field: Option<FieldName>) -> VisitControl {
        VisitControl::Continue
    }

    /// Called after a node's children, including when they were skipped.
    fn leave_node(&mut self, _tree: &SyntaxTree, _node: NodeId) {}

    fn visit_token(&mut self, _tree: &SyntaxTree, _token: TokenId, _field: Option<FieldName>) {}
}

/// Walks the subtree rooted at `start` in document order.
pub fn walk<V: SyntaxVisitor + ?Sized>(tree: &SyntaxTree, start: NodeId, visitor: &mut V) {
    let field = tree.field_of(SyntaxElement::Node(start));
    if visitor.enter_node(tree, start, field) == VisitControl::SkipChildren {
        visitor.leave_node(tree, start);
        return;
    }

    let mut stack: Vec<(NodeId, usize)> = vec![(start, 0)];
    while let Some(top) = stack.last_mut() {
        let (node, index) = *top;
        let children = tree.children(node);
        let Some(child) = children.get(index).copied() else {
            stack.pop();
            visitor.leave_node(tree, node);
            continue;
        };
        top.1 += 1;
        match child.element {
            SyntaxElement::Token(token) => visitor.visit_token(tree, token, child.field),
            SyntaxElement::Node(child_node) => match visitor.enter_node(tree, child_node, child.field) {
                VisitControl::Continue => stack.push((child_node, 0)),
                VisitControl::SkipChildren => visitor.leave_node(tree, child_node),
            },
        }
    }
}

/// Calls `f` for each direct child of `node`.
pub fn for_each_child(tree: &SyntaxTree, node: NodeId, mut f: impl FnMut(SyntaxElement, Option<FieldName>)) {
    for child in tree.children(node) {
        f(child.element, child.field);
    }
}
