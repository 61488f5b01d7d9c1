//! Error recovery tests.
//!
//! Every malformed input must still produce a tree that covers the input,
//! with problems isolated in error nodes, missing tokens and diagnostics.

use vba_diagnostics::DiagnosticKind;
use vba_options::ParserOptions;
use vba_parser::{parse, parse_with_options, validate};
use vba_syntax::{FieldName, SyntaxKind, SyntaxTree};

/// Helper: parse, check coverage and return the tree.
fn parse_covered(source: &str) -> SyntaxTree {
    parse_covered_with(source, &ParserOptions::default())
}

fn parse_covered_with(source: &str, options: &ParserOptions) -> SyntaxTree {
    let tree = parse_with_options(source, options);
    assert_eq!(
        tree.leaf_bytes(),
        source.as_bytes(),
        "leaves do not reproduce the source: {:?}",
        source
    );
    tree
}

fn messages(tree: &SyntaxTree) -> Vec<&str> {
    tree.diagnostics().iter().map(|d| d.message_text.as_str()).collect()
}

fn has_kind(tree: &SyntaxTree, kind: DiagnosticKind) -> bool {
    tree.diagnostics().iter().any(|d| d.kind == kind)
}

// ============================================================================
// Unterminated constructs
// ============================================================================

#[test]
fn test_missing_end_if() {
    let tree = parse_covered("If x Then\n  y = 1\n");
    let ifs = tree.find_all(SyntaxKind::IfStatement);
    assert_eq!(ifs.len(), 1);
    assert!(tree.is_incomplete(ifs[0]));
    assert_eq!(messages(&tree), vec!["'If' is missing its closing 'End If'."]);
    assert!(has_kind(&tree, DiagnosticKind::UnterminatedConstruct));

    let body = tree.node_by_field(ifs[0], FieldName::Body).unwrap();
    assert_eq!(tree.find_all(SyntaxKind::AssignmentStatement).len(), 1);
    assert_eq!(tree.child_nodes(body).count(), 1);
}

#[test]
fn test_missing_terminator_points_at_opener() {
    let tree = parse_covered("x = 1\nWhile a\n  a = a - 1\n");
    let diagnostic = &tree.diagnostics()[0];
    assert_eq!(diagnostic.span.start, 6);
    assert_eq!(diagnostic.span.length, 5);
    assert_eq!(diagnostic.related_information.len(), 1);
}

#[test]
fn test_missing_end_if_inside_sub() {
    let tree = parse_covered("Sub A()\n  If x Then\n    y = 1\nEnd Sub\n");
    let sub = tree.find_all(SyntaxKind::SubDefinition)[0];
    let if_statement = tree.find_all(SyntaxKind::IfStatement)[0];
    assert!(tree.is_incomplete(if_statement));
    assert!(!tree.is_incomplete(sub));
    assert!(tree.has_error(sub));
}

#[test]
fn test_procedure_without_end_closes_at_next_procedure() {
    let tree = parse_covered("Sub A()\n  x = 1\nSub B()\nEnd Sub\n");
    let subs = tree.find_all(SyntaxKind::SubDefinition);
    assert_eq!(subs.len(), 2);
    assert!(tree.is_incomplete(subs[0]));
    assert!(!tree.is_incomplete(subs[1]));
    // Both procedures are top level.
    assert_eq!(tree.child_nodes(tree.root()).count(), 2);
}

#[test]
fn test_unclosed_loops() {
    let tree = parse_covered("Do\n  For i = 1 To 2\n    x = i\n");
    assert!(tree.is_incomplete(tree.find_all(SyntaxKind::DoStatement)[0]));
    assert!(tree.is_incomplete(tree.find_all(SyntaxKind::ForStatement)[0]));
    assert_eq!(
        messages(&tree),
        vec!["'Do' is missing its closing 'Loop'.", "'For' is missing its closing 'Next'."]
    );
}

// ============================================================================
// Stray terminators
// ============================================================================

#[test]
fn test_stray_terminators_are_isolated() {
    let tree = parse_covered("End If\nNext\nx = 1\nLoop\nWend\nCase 1\n");
    assert_eq!(
        messages(&tree),
        vec![
            "'End If' without 'If'.",
            "'Next' without 'For'.",
            "'Loop' without 'Do'.",
            "'Wend' without 'While'.",
            "'Case' without 'Select Case'.",
        ]
    );
    assert_eq!(tree.find_all(SyntaxKind::Error).len(), 5);
    assert_eq!(tree.find_all(SyntaxKind::AssignmentStatement).len(), 1);
}

#[test]
fn test_else_without_if() {
    let tree = parse_covered("Sub A()\n  Else\n  x = 1\nEnd Sub\n");
    assert_eq!(messages(&tree), vec!["'Else' without 'If'."]);
    assert!(!tree.is_incomplete(tree.find_all(SyntaxKind::SubDefinition)[0]));
}

// ============================================================================
// Error isolation
// ============================================================================

#[test]
fn test_malformed_line_between_subs() {
    let source = "Sub A()\n  x = 1\nEnd Sub\n) + (\nSub B()\n  y = 2\nEnd Sub\n";
    let tree = parse_covered(source);
    let subs = tree.find_all(SyntaxKind::SubDefinition);
    assert_eq!(subs.len(), 2);
    for sub in subs {
        assert!(!tree.has_error(sub));
    }
    let errors = tree.find_all(SyntaxKind::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(tree.node_text(errors[0]), ") + (");
    assert_eq!(messages(&tree), vec!["Unexpected ')'."]);
}

#[test]
fn test_missing_operand() {
    let tree = parse_covered("x = 1 +\ny = 2\n");
    let binary = tree.find_all(SyntaxKind::BinaryExpression)[0];
    let right = tree.node_by_field(binary, FieldName::Right).unwrap();
    assert_eq!(tree.kind(right), SyntaxKind::Error);
    assert!(tree.span(right).is_empty());
    assert_eq!(messages(&tree), vec!["Expression expected."]);
    assert_eq!(tree.find_all(SyntaxKind::AssignmentStatement).len(), 2);
}

#[test]
fn test_diagnostic_line_and_column() {
    let tree = parse_covered("Sub A()\r\n  x = \r\nEnd Sub\r\n");
    assert_eq!(messages(&tree), vec!["Expression expected."]);
    let start = tree.diagnostics()[0].span.start;
    assert_eq!(tree.line_and_column(start).to_string(), "2:7");
}

#[test]
fn test_trailing_tokens_after_statement() {
    let tree = parse_covered("Exit Sub now\nx = 1\n");
    let exit = tree.find_all(SyntaxKind::ExitStatement)[0];
    assert_eq!(tree.child_nodes(exit).map(|n| tree.kind(n)).collect::<Vec<_>>(), vec![SyntaxKind::Error]);
    assert_eq!(messages(&tree), vec!["End of statement expected."]);
}

#[test]
fn test_infix_expression_as_statement() {
    let tree = parse_covered("a * b\n");
    let call = tree.find_all(SyntaxKind::CallStatement)[0];
    let target = tree.node_by_field(call, FieldName::Target).unwrap();
    assert_eq!(tree.kind(target), SyntaxKind::BinaryExpression);
    assert_eq!(messages(&tree), vec!["'=' expected."]);
}

#[test]
fn test_exit_without_construct() {
    let tree = parse_covered("Exit\n");
    let exit = tree.find_all(SyntaxKind::ExitStatement)[0];
    let construct = tree.token_by_field(exit, FieldName::Construct).unwrap();
    assert!(tree.token(construct).is_missing());
}

#[test]
fn test_do_loop_with_two_conditions() {
    let tree = parse_covered("Do While a\nLoop Until b\n");
    assert_eq!(
        messages(&tree),
        vec!["A 'Do' loop cannot have both a 'Do' condition and a 'Loop' condition."]
    );
}

#[test]
fn test_module_level_construct_inside_procedure() {
    let tree = parse_covered("Sub A()\n  Option Explicit\nEnd Sub\n");
    assert_eq!(messages(&tree), vec!["'Option' is only allowed at module level."]);
    assert_eq!(tree.find_all(SyntaxKind::OptionStatement).len(), 1);
    assert!(!tree.is_incomplete(tree.find_all(SyntaxKind::SubDefinition)[0]));
}

// ============================================================================
// Lexical errors
// ============================================================================

#[test]
fn test_unterminated_string_stops_at_line_end() {
    let tree = parse_covered("x = \"abc\ny = 1\n");
    assert!(has_kind(&tree, DiagnosticKind::LexError));
    assert_eq!(tree.find_all(SyntaxKind::AssignmentStatement).len(), 2);
}

#[test]
fn test_malformed_hex_literal() {
    let tree = parse_covered("x = &H\n");
    assert!(has_kind(&tree, DiagnosticKind::MalformedLiteral));
    assert_eq!(tree.find_all(SyntaxKind::AssignmentStatement).len(), 1);
}

#[test]
fn test_invalid_character() {
    let tree = parse_covered("x = 1 ? 2\n");
    assert!(has_kind(&tree, DiagnosticKind::LexError));
}

// ============================================================================
// Resource bounds
// ============================================================================

#[test]
fn test_deep_parentheses_do_not_overflow() {
    let source = format!("x = {}1{}\n", "(".repeat(5000), ")".repeat(5000));
    let tree = parse_covered(&source);
    assert!(tree
        .diagnostics()
        .iter()
        .any(|d| d.message_text.starts_with("Nesting is too deep")));
}

#[test]
fn test_deep_blocks_respect_max_depth() {
    let depth = 20;
    let mut source = "If x Then\n".repeat(depth);
    source.push_str(&"End If\n".repeat(depth));
    let tree = parse_covered_with(&source, &ParserOptions::default().with_max_depth(8));
    assert!(has_kind(&tree, DiagnosticKind::UnterminatedConstruct));
    assert!(tree.find_all(SyntaxKind::IfStatement).len() < depth);
}

/// Runs every whole-tree view over `tree`; none of them may recurse per
/// level.
fn assert_views_complete(tree: &SyntaxTree, kind: SyntaxKind, expected: usize) {
    let descendants = tree.descendants(tree.root());
    assert_eq!(descendants.len(), tree.node_count());
    assert_eq!(descendants.iter().filter(|&&n| tree.kind(n) == kind).count(), expected);
    assert_eq!(tree.leaves().len(), tree.token_count());
    assert!(validate::check_exit_statements(tree).is_empty());

    let sexp = tree.to_sexp();
    assert!(sexp.starts_with("(source_file (assignment_statement"));
    assert_eq!(sexp.matches(&format!("({}", kind.name())).count(), expected);

    let json = tree.to_json().unwrap();
    assert!(json.starts_with("{\"kind\":\"source_file\""));
    assert_eq!(json.matches(&format!("\"kind\":\"{}\"", kind.name())).count(), expected);
}

#[test]
fn test_long_binary_chain_views() {
    let count = 20_000;
    let source = format!("x = 1{}\n", " + 1".repeat(count));
    let tree = parse_covered(&source);
    assert!(tree.diagnostics().is_empty());
    assert_views_complete(&tree, SyntaxKind::BinaryExpression, count);
}

#[test]
fn test_long_member_chain_views() {
    let count = 20_000;
    let source = format!("x = a{}\n", ".b".repeat(count));
    let tree = parse_covered(&source);
    assert!(tree.diagnostics().is_empty());
    assert_views_complete(&tree, SyntaxKind::MemberAccess, count);
}

#[test]
fn test_long_call_chain_views() {
    let count = 20_000;
    let source = format!("x = f{}\n", "(1)".repeat(count));
    let tree = parse_covered(&source);
    assert!(tree.diagnostics().is_empty());
    assert_views_complete(&tree, SyntaxKind::CallExpression, count);
}

#[test]
fn test_many_unclosed_calls_on_one_line() {
    let count = 20_000;
    let source = "Foo (x: ".repeat(count);
    let tree = parse_covered(&source);
    assert_eq!(tree.find_all(SyntaxKind::CallStatement).len(), count);
    assert_eq!(tree.diagnostics().len(), count);
}

#[test]
fn test_token_budget_leaves_rest_unparsed() {
    let source = "a = 1\nb = 2\nc = 3\n";
    let tree = parse_covered_with(source, &ParserOptions::default().with_max_tokens(5));
    assert_eq!(
        messages(&tree),
        vec!["Token budget of 5 exhausted; the remaining input was not parsed."]
    );
    assert_eq!(tree.find_all(SyntaxKind::AssignmentStatement).len(), 1);
    assert_eq!(tree.find_all(SyntaxKind::Error).len(), 1);
    assert!(!tree.has_errors());
}

#[test]
fn test_token_budget_inside_block() {
    let source = "Sub A()\n  If x Then\n    y = 1\n  End If\nEnd Sub\n";
    let tree = parse_covered_with(source, &ParserOptions::default().with_max_tokens(8));
    // Open constructs close silently.
    assert_eq!(tree.diagnostics().len(), 1);
}

// ============================================================================
// Dialects
// ============================================================================

#[test]
fn test_minimal_dialect_isolates_unsupported_statements() {
    let source = "Sub A()\n  On Error Resume Next\n  Select Case x\n  End Select\nEnd Sub\n";
    let tree = parse_covered_with(source, &ParserOptions::minimal());
    assert!(tree.find_all(SyntaxKind::OnErrorStatement).is_empty());
    assert!(tree.find_all(SyntaxKind::SelectCaseStatement).is_empty());
    assert_eq!(tree.find_all(SyntaxKind::SubDefinition).len(), 1);
    let unsupported = tree
        .diagnostics()
        .iter()
        .filter(|d| d.message_text.ends_with("not supported in the minimal dialect."))
        .count();
    assert_eq!(unsupported, 2);

    assert!(parse(source).diagnostics().is_empty());
}
