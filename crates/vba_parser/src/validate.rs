//! Checks that run over a finished tree.
//!
//! The parser records what an `Exit` leaves and how an `On Error` changes
//! error handling, but never acts on either. These helpers read that
//! structure back for consumers.

use vba_diagnostics::{messages, Diagnostic};
use vba_syntax::{FieldName, NodeId, SyntaxElement, SyntaxKind, SyntaxTree};

/// The construct an `Exit` statement leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitTarget {
    Sub,
    Function,
    Property,
    Do,
    For,
    While,
}

impl ExitTarget {
    fn from_keyword(kind: SyntaxKind) -> Option<Self> {
        Some(match kind {
            SyntaxKind::SubKeyword => ExitTarget::Sub,
            SyntaxKind::FunctionKeyword => ExitTarget::Function,
            SyntaxKind::PropertyKeyword => ExitTarget::Property,
            SyntaxKind::DoKeyword => ExitTarget::Do,
            SyntaxKind::ForKeyword => ExitTarget::For,
            SyntaxKind::WhileKeyword => ExitTarget::While,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            ExitTarget::Sub => "Sub",
            ExitTarget::Function => "Function",
            ExitTarget::Property => "Property",
            ExitTarget::Do => "Do",
            ExitTarget::For => "For",
            ExitTarget::While => "While",
        }
    }

    /// Whether a node of `kind` is a construct this exit can leave.
    pub fn matches(self, kind: SyntaxKind) -> bool {
        match self {
            ExitTarget::Sub => kind == SyntaxKind::SubDefinition,
            ExitTarget::Function => kind == SyntaxKind::FunctionDefinition,
            ExitTarget::Property => matches!(
                kind,
                SyntaxKind::PropertyGetDefinition
                    | SyntaxKind::PropertyLetDefinition
                    | SyntaxKind::PropertySetDefinition
            ),
            ExitTarget::Do => kind == SyntaxKind::DoStatement,
            ExitTarget::For => matches!(kind, SyntaxKind::ForStatement | SyntaxKind::ForEachStatement),
            ExitTarget::While => kind == SyntaxKind::WhileStatement,
        }
    }
}

/// What `node` exits, if it is an `Exit` statement with a construct keyword.
pub fn exit_target(tree: &SyntaxTree, node: NodeId) -> Option<ExitTarget> {
    if tree.kind(node) != SyntaxKind::ExitStatement {
        return None;
    }
    let token = tree.token_by_field(node, FieldName::Construct)?;
    let data = tree.token(token);
    if data.is_missing() {
        return None;
    }
    ExitTarget::from_keyword(data.kind)
}

/// An error-handling mode set by `On Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnErrorMode {
    /// `On Error GoTo label`, with the label or line number as written.
    GoTo(String),
    /// `On Error GoTo 0`.
    Disable,
    /// `On Error GoTo -1`: clears the error being handled.
    ClearActive,
    /// `On Error Resume Next`.
    ResumeNext,
}

/// The mode `node` switches to, if it is a well-formed `On Error` statement.
pub fn on_error_mode(tree: &SyntaxTree, node: NodeId) -> Option<OnErrorMode> {
    if tree.kind(node) != SyntaxKind::OnErrorStatement {
        return None;
    }
    if tree.child_token(node, SyntaxKind::ResumeKeyword).is_some() {
        return Some(OnErrorMode::ResumeNext);
    }
    match tree.child_by_field(node, FieldName::Label)? {
        SyntaxElement::Token(token) => {
            let data = tree.token(token);
            if data.is_missing() {
                return None;
            }
            let text = tree.token_text(token);
            if data.kind == SyntaxKind::NumberLiteral && is_zero(&text) {
                Some(OnErrorMode::Disable)
            } else {
                Some(OnErrorMode::GoTo(text.into_owned()))
            }
        }
        SyntaxElement::Node(label) => {
            let argument = tree.token_by_field(label, FieldName::Argument)?;
            (tree.kind(label) == SyntaxKind::UnaryExpression && tree.token_text(argument) == "1")
                .then_some(OnErrorMode::ClearActive)
        }
    }
}

fn is_zero(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b == b'0')
}

/// Reports every `Exit X` that is not inside an `X` within its procedure.
pub fn check_exit_statements(tree: &SyntaxTree) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for node in tree.find_all(SyntaxKind::ExitStatement) {
        let Some(target) = exit_target(tree, node) else {
            continue;
        };
        let mut enclosed = false;
        for ancestor in tree.ancestors(SyntaxElement::Node(node)) {
            let kind = tree.kind(ancestor);
            if target.matches(kind) {
                enclosed = true;
                break;
            }
            if kind.is_procedure() {
                break;
            }
        }
        if !enclosed {
            diagnostics.push(Diagnostic::new(
                tree.span(node),
                &messages::EXIT_0_NOT_WITHIN_1,
                &[target.keyword(), target.keyword()],
            ));
        }
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn first(tree: &SyntaxTree, kind: SyntaxKind) -> NodeId {
        tree.find_all(kind)[0]
    }

    #[test]
    fn test_exit_target() {
        let tree = parse("Sub A()\n  Exit Sub\nEnd Sub\n");
        let exit = first(&tree, SyntaxKind::ExitStatement);
        assert_eq!(exit_target(&tree, exit), Some(ExitTarget::Sub));
        assert_eq!(exit_target(&tree, tree.root()), None);
    }

    #[test]
    fn test_exit_within_matching_construct() {
        let tree = parse(
            "Function F()\n  For i = 1 To 3\n    If i = 2 Then Exit For\n  Next\n  Exit Function\nEnd Function\n",
        );
        assert!(check_exit_statements(&tree).is_empty());
    }

    #[test]
    fn test_exit_outside_matching_construct() {
        let tree = parse("Sub A()\n  Exit Do\n  Exit Function\nEnd Sub\n");
        let diagnostics = check_exit_statements(&tree);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].message_text, "'Exit Do' is not within a 'Do'.");
        assert_eq!(diagnostics[1].message_text, "'Exit Function' is not within a 'Function'.");
    }

    #[test]
    fn test_exit_does_not_cross_procedures() {
        // The Do is in another procedure.
        let tree = parse("Sub A()\n  Do\n  Loop\nEnd Sub\nSub B()\n  Exit Do\nEnd Sub\n");
        assert_eq!(check_exit_statements(&tree).len(), 1);
    }

    #[test]
    fn test_on_error_modes() {
        let tree = parse(
            "Sub A()\n  On Error GoTo Handler\n  On Error GoTo 0\n  On Error GoTo -1\n  On Error Resume Next\nEnd Sub\n",
        );
        let modes: Vec<_> = tree
            .find_all(SyntaxKind::OnErrorStatement)
            .into_iter()
            .map(|node| on_error_mode(&tree, node))
            .collect();
        assert_eq!(
            modes,
            vec![
                Some(OnErrorMode::GoTo("Handler".to_string())),
                Some(OnErrorMode::Disable),
                Some(OnErrorMode::ClearActive),
                Some(OnErrorMode::ResumeNext),
            ]
        );
    }

    #[test]
    fn test_on_error_missing_label() {
        let tree = parse("On Error GoTo\n");
        let node = first(&tree, SyntaxKind::OnErrorStatement);
        assert_eq!(on_error_mode(&tree, node), None);
    }
}
