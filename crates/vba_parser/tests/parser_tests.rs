//! Parser integration tests.
//!
//! Verifies the shape of the trees the parser builds from well-formed VBA.

use vba_parser::{parse, parse_bytes, parse_with_options};
use vba_syntax::{FieldName, NodeId, SyntaxElement, SyntaxKind, SyntaxTree};
use vba_options::ParserOptions;

/// Helper: parse and assert no diagnostics were produced.
fn parse_clean(source: &str) -> SyntaxTree {
    let tree = parse(source);
    assert!(
        tree.diagnostics().is_empty(),
        "source: {:?}\ndiagnostics: {:?}",
        source,
        tree.diagnostics()
    );
    tree
}

fn only(tree: &SyntaxTree, kind: SyntaxKind) -> NodeId {
    let nodes = tree.find_all(kind);
    assert_eq!(nodes.len(), 1, "expected exactly one {}", kind.name());
    nodes[0]
}

fn field_text(tree: &SyntaxTree, node: NodeId, field: FieldName) -> String {
    let element = tree.child_by_field(node, field).expect("field present");
    tree.element_text(element).into_owned()
}

/// Top-level statement kinds of the file, ignoring blank lines.
fn statement_kinds(tree: &SyntaxTree) -> Vec<SyntaxKind> {
    tree.child_nodes(tree.root())
        .map(|n| tree.kind(n))
        .filter(|&k| k != SyntaxKind::EmptyStatement)
        .collect()
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_multiplication_nests_below_addition() {
    let tree = parse_clean("x = 1 + 2 * 3\n");
    let assignment = only(&tree, SyntaxKind::AssignmentStatement);
    let sum = tree.node_by_field(assignment, FieldName::Value).unwrap();
    assert_eq!(tree.kind(sum), SyntaxKind::BinaryExpression);
    assert_eq!(field_text(&tree, sum, FieldName::Operator), "+");
    assert_eq!(field_text(&tree, sum, FieldName::Left), "1");
    let product = tree.node_by_field(sum, FieldName::Right).unwrap();
    assert_eq!(tree.kind(product), SyntaxKind::BinaryExpression);
    assert_eq!(field_text(&tree, product, FieldName::Operator), "*");
    assert_eq!(tree.node_text(product), "2 * 3");
}

#[test]
fn test_subtraction_is_left_associative() {
    let tree = parse_clean("x = 1 - 2 - 3\n");
    let assignment = only(&tree, SyntaxKind::AssignmentStatement);
    let outer = tree.node_by_field(assignment, FieldName::Value).unwrap();
    assert_eq!(field_text(&tree, outer, FieldName::Right), "3");
    let inner = tree.node_by_field(outer, FieldName::Left).unwrap();
    assert_eq!(tree.node_text(inner), "1 - 2");
}

#[test]
fn test_operator_precedence_ladder() {
    let tree = parse_clean("x = a Or b And Not c = d & e + f * g ^ h\n");
    let assignment = only(&tree, SyntaxKind::AssignmentStatement);
    let root = tree.node_by_field(assignment, FieldName::Value).unwrap();
    assert_eq!(field_text(&tree, root, FieldName::Operator), "Or");
    let and = tree.node_by_field(root, FieldName::Right).unwrap();
    assert_eq!(field_text(&tree, and, FieldName::Operator), "And");
    // Unary Not binds tighter than `=`.
    let comparison = tree.node_by_field(and, FieldName::Right).unwrap();
    assert_eq!(field_text(&tree, comparison, FieldName::Operator), "=");
    assert_eq!(
        tree.kind(tree.node_by_field(comparison, FieldName::Left).unwrap()),
        SyntaxKind::UnaryExpression
    );
    let concat = tree.node_by_field(comparison, FieldName::Right).unwrap();
    assert_eq!(field_text(&tree, concat, FieldName::Operator), "&");
    assert_eq!(tree.node_text(concat), "d & e + f * g ^ h");
}

#[test]
fn test_keyword_operators_are_case_insensitive() {
    let tree = parse_clean("x = a MOD b\ny = s like \"a*\"\nz = o Is Nothing\n");
    let operators: Vec<_> = tree
        .find_all(SyntaxKind::BinaryExpression)
        .into_iter()
        .map(|n| tree.token(tree.token_by_field(n, FieldName::Operator).unwrap()).kind)
        .collect();
    assert_eq!(
        operators,
        vec![SyntaxKind::ModKeyword, SyntaxKind::LikeKeyword, SyntaxKind::IsKeyword]
    );
}

#[test]
fn test_postfix_chain_is_greedy() {
    let tree = parse_clean("x = a.b(1).c(2, 3)\n");
    let assignment = only(&tree, SyntaxKind::AssignmentStatement);
    let call = tree.node_by_field(assignment, FieldName::Value).unwrap();
    assert_eq!(tree.kind(call), SyntaxKind::CallExpression);
    let member = tree.node_by_field(call, FieldName::Function).unwrap();
    assert_eq!(tree.kind(member), SyntaxKind::MemberAccess);
    assert_eq!(field_text(&tree, member, FieldName::Member), "c");
    assert_eq!(tree.node_text(tree.node_by_field(member, FieldName::Object).unwrap()), "a.b(1)");
}

#[test]
fn test_named_and_omitted_arguments() {
    let tree = parse_clean("r = f(1, , key:=\"v\")\n");
    let list = only(&tree, SyntaxKind::ArgumentList);
    let arguments: Vec<_> = tree.children_by_field(list, FieldName::Argument).collect();
    assert_eq!(arguments.len(), 2);
    let named = only(&tree, SyntaxKind::NamedArgument);
    assert_eq!(field_text(&tree, named, FieldName::Name), "key");
}

#[test]
fn test_new_expression_and_literals() {
    let tree = parse_clean("Set c = New Collection\nx = True\ny = &HFF\n");
    let new = only(&tree, SyntaxKind::NewExpression);
    let ty = tree.node_by_field(new, FieldName::Type).unwrap();
    assert_eq!(field_text(&tree, ty, FieldName::Name), "Collection");
    assert!(tree.tokens().any(|(_, t)| t.kind == SyntaxKind::TrueKeyword));
}

// ============================================================================
// Keywords as identifiers
// ============================================================================

#[test]
fn test_keyword_spelled_names_are_identifiers() {
    let tree = parse_clean("Dim Name As String\nName = \"x\"\n");
    assert_eq!(
        statement_kinds(&tree),
        vec![SyntaxKind::VariableDeclaration, SyntaxKind::AssignmentStatement]
    );
    let assignment = only(&tree, SyntaxKind::AssignmentStatement);
    let target = tree.token_by_field(assignment, FieldName::Target).unwrap();
    assert_eq!(tree.token(target).kind, SyntaxKind::Identifier);
    assert_eq!(tree.token_text(target), "Name");
}

#[test]
fn test_name_statement_when_not_assigned() {
    let tree = parse_clean("Name \"a.txt\" As \"b.txt\"\n");
    assert_eq!(statement_kinds(&tree), vec![SyntaxKind::NameStatement]);
}

#[test]
fn test_bracketed_identifier_is_one_token() {
    let tree = parse_clean("[My Variable] = 5\n");
    let assignment = only(&tree, SyntaxKind::AssignmentStatement);
    let target = tree.token_by_field(assignment, FieldName::Target).unwrap();
    assert_eq!(tree.token(target).kind, SyntaxKind::BracketedIdentifier);
    assert_eq!(tree.token_text(target), "[My Variable]");
}

// ============================================================================
// Blocks
// ============================================================================

#[test]
fn test_if_block_body() {
    let tree = parse_clean("If x Then\n  y = 1\nEnd If\n");
    assert_eq!(statement_kinds(&tree), vec![SyntaxKind::IfStatement]);
    let if_statement = only(&tree, SyntaxKind::IfStatement);
    let body = tree.node_by_field(if_statement, FieldName::Body).unwrap();
    let kinds: Vec<_> = tree.child_nodes(body).map(|n| tree.kind(n)).collect();
    assert_eq!(kinds, vec![SyntaxKind::AssignmentStatement]);
}

#[test]
fn test_if_elseif_else() {
    let tree = parse_clean("If a Then\n  x = 1\nElseIf b Then\n  x = 2\nElse\n  x = 3\nEnd If\n");
    let if_statement = only(&tree, SyntaxKind::IfStatement);
    let clauses: Vec<_> = tree
        .child_nodes(if_statement)
        .map(|n| tree.kind(n))
        .filter(|k| matches!(k, SyntaxKind::ElseIfClause | SyntaxKind::ElseClause))
        .collect();
    assert_eq!(clauses, vec![SyntaxKind::ElseIfClause, SyntaxKind::ElseClause]);
    assert_eq!(tree.find_all(SyntaxKind::AssignmentStatement).len(), 3);
}

#[test]
fn test_single_line_if() {
    let tree = parse_clean("If a Then x = 1: y = 2 Else z = 3\nw = 4\n");
    assert_eq!(
        statement_kinds(&tree),
        vec![SyntaxKind::SingleLineIfStatement, SyntaxKind::AssignmentStatement]
    );
    let if_statement = only(&tree, SyntaxKind::SingleLineIfStatement);
    let body = tree.node_by_field(if_statement, FieldName::Body).unwrap();
    assert_eq!(tree.child_nodes(body).count(), 2);
    assert_eq!(tree.find_all(SyntaxKind::ElseClause).len(), 1);
}

#[test]
fn test_select_case() {
    let source = "Select Case n\n  Case 1, 2\n    a\n  Case 3 To 5\n    b\n  Case Is >= 10\n    c\n  Case Else\n    d\nEnd Select\n";
    let tree = parse_clean(source);
    assert_eq!(tree.find_all(SyntaxKind::CaseClause).len(), 3);
    assert_eq!(tree.find_all(SyntaxKind::CaseElseClause).len(), 1);
    assert_eq!(tree.find_all(SyntaxKind::RangeExpression).len(), 1);
    let case_is = only(&tree, SyntaxKind::CaseIsExpression);
    assert_eq!(field_text(&tree, case_is, FieldName::Operator), ">=");
}

#[test]
fn test_for_loops() {
    let tree = parse_clean(
        "For i = 1 To 10 Step 2\n  s = s + i\nNext i\nFor Each item In items\n  Debug.Print item\nNext\n",
    );
    assert_eq!(
        statement_kinds(&tree),
        vec![SyntaxKind::ForStatement, SyntaxKind::ForEachStatement]
    );
    let for_statement = only(&tree, SyntaxKind::ForStatement);
    assert_eq!(field_text(&tree, for_statement, FieldName::Step), "2");
    let for_each = only(&tree, SyntaxKind::ForEachStatement);
    assert_eq!(field_text(&tree, for_each, FieldName::Collection), "items");
}

#[test]
fn test_next_closing_two_loops() {
    let tree = parse_clean("For i = 1 To 3\n  For j = 1 To 3\n    x = i * j\nNext j, i\ny = 1\n");
    assert_eq!(
        statement_kinds(&tree),
        vec![SyntaxKind::ForStatement, SyntaxKind::AssignmentStatement]
    );
    assert_eq!(tree.find_all(SyntaxKind::ForStatement).len(), 2);
}

#[test]
fn test_while_and_do_loops() {
    let tree = parse_clean("While a\n  a = a - 1\nWend\nDo Until b\nLoop\nDo\nLoop While c\n");
    assert_eq!(
        statement_kinds(&tree),
        vec![SyntaxKind::WhileStatement, SyntaxKind::DoStatement, SyntaxKind::DoStatement]
    );
}

#[test]
fn test_with_leading_dot_access() {
    let tree = parse_clean("With Sheet1.Range(\"A1\")\n  .Value = 1\n  .Font.Bold = True\nEnd With\n");
    let with = only(&tree, SyntaxKind::WithStatement);
    let body = tree.node_by_field(with, FieldName::Body).unwrap();
    assert_eq!(tree.child_nodes(body).count(), 2);
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn test_sub_and_function_definitions() {
    let source = "Public Function Add(ByVal a As Long, Optional b As Long = 1) As Long\n  Add = a + b\nEnd Function\n\nPrivate Sub Main()\n  Call Add(1, 2)\nEnd Sub\n";
    let tree = parse_clean(source);
    assert_eq!(
        statement_kinds(&tree),
        vec![SyntaxKind::FunctionDefinition, SyntaxKind::SubDefinition]
    );
    let function = only(&tree, SyntaxKind::FunctionDefinition);
    assert_eq!(field_text(&tree, function, FieldName::Name), "Add");
    assert_eq!(tree.find_all(SyntaxKind::Parameter).len(), 2);
    let return_type = tree.node_by_field(function, FieldName::ReturnType).unwrap();
    let name = tree.token_by_field(return_type, FieldName::Name).unwrap();
    assert_eq!(tree.token(name).kind, SyntaxKind::PredefinedType);
}

#[test]
fn test_property_accessors() {
    let source = "Property Get Value() As Long\nEnd Property\nProperty Let Value(v As Long)\nEnd Property\nProperty Set Item(o As Object)\nEnd Property\n";
    let tree = parse_clean(source);
    assert_eq!(
        statement_kinds(&tree),
        vec![
            SyntaxKind::PropertyGetDefinition,
            SyntaxKind::PropertyLetDefinition,
            SyntaxKind::PropertySetDefinition
        ]
    );
}

#[test]
fn test_type_and_enum() {
    let source = "Private Type Point\n  X As Long\n  Y(1 To 3) As Double\n  Label As String * 20\nEnd Type\nEnum Color\n  Red = 1\n  Green\nEnd Enum\n";
    let tree = parse_clean(source);
    assert_eq!(tree.find_all(SyntaxKind::TypeField).len(), 3);
    assert_eq!(tree.find_all(SyntaxKind::EnumMember).len(), 2);
}

#[test]
fn test_variable_and_const_declarations() {
    let tree = parse_clean("Dim a(1 To 10, 5) As Long, b\nConst Pi As Double = 3.14, E = 2.72\n");
    assert_eq!(tree.find_all(SyntaxKind::VariableDeclarator).len(), 2);
    assert_eq!(tree.find_all(SyntaxKind::ConstDeclarator).len(), 2);
    assert_eq!(tree.find_all(SyntaxKind::ArrayDimensions).len(), 1);
}

#[test]
fn test_declare_option_attribute() {
    let source = "Attribute VB_Name = \"Module1\"\nOption Explicit\nOption Compare Text\nPrivate Declare PtrSafe Function GetTickCount Lib \"kernel32\" () As Long\n";
    let tree = parse_clean(source);
    assert_eq!(
        statement_kinds(&tree),
        vec![
            SyntaxKind::AttributeStatement,
            SyntaxKind::OptionStatement,
            SyntaxKind::OptionStatement,
            SyntaxKind::DeclareStatement
        ]
    );
    let declare = only(&tree, SyntaxKind::DeclareStatement);
    assert_eq!(field_text(&tree, declare, FieldName::Library), "\"kernel32\"");
}

// ============================================================================
// Simple statements
// ============================================================================

#[test]
fn test_call_statement_without_parentheses() {
    let tree = parse_clean("MsgBox \"hi\", vbOKOnly\nFoo (x)\n");
    let calls = tree.find_all(SyntaxKind::CallStatement);
    assert_eq!(calls.len(), 2);
    // `Foo (x)` passes a parenthesized argument, it does not call `Foo(x)`.
    let target = tree.child_by_field(calls[1], FieldName::Target).unwrap();
    assert_eq!(tree.element_kind(target), SyntaxKind::Identifier);
    assert_eq!(tree.find_all(SyntaxKind::ParenthesizedExpression).len(), 1);
}

#[test]
fn test_error_handling_statements() {
    let source = "Sub A()\n  On Error GoTo Fail\n  Error 5\n  Exit Sub\nFail:\n  Resume Next\nEnd Sub\n";
    let tree = parse_clean(source);
    for kind in [
        SyntaxKind::OnErrorStatement,
        SyntaxKind::ErrorStatement,
        SyntaxKind::ExitStatement,
        SyntaxKind::LabelStatement,
        SyntaxKind::ResumeStatement,
    ] {
        only(&tree, kind);
    }
}

#[test]
fn test_redim_erase_goto_stop_end() {
    let tree = parse_clean("ReDim Preserve a(1 To n) As Long\nErase a, b\nGoTo 100\n100 Stop\nEnd\n");
    assert_eq!(
        statement_kinds(&tree),
        vec![
            SyntaxKind::RedimStatement,
            SyntaxKind::EraseStatement,
            SyntaxKind::GotoStatement,
            SyntaxKind::LabelStatement,
            SyntaxKind::StopStatement,
            SyntaxKind::EndStatement
        ]
    );
}

#[test]
fn test_colon_separates_statements() {
    let tree = parse_clean("a = 1: b = 2\n");
    assert_eq!(tree.find_all(SyntaxKind::AssignmentStatement).len(), 2);
}

#[test]
fn test_line_continuation_joins_lines() {
    let tree = parse_clean("x = 1 + _\n    2\n");
    assert_eq!(tree.find_all(SyntaxKind::BinaryExpression).len(), 1);
}

#[test]
fn test_comments_are_trivia() {
    let tree = parse_clean("' header\nx = 1 ' trailing\nRem note\n");
    assert!(tree
        .leaves()
        .into_iter()
        .all(|leaf| tree.element_kind(leaf) != SyntaxKind::Error));
    assert_eq!(tree.find_all(SyntaxKind::AssignmentStatement).len(), 1);
}

// ============================================================================
// Entry points
// ============================================================================

#[test]
fn test_empty_input() {
    let tree = parse_clean("");
    assert_eq!(tree.kind(tree.root()), SyntaxKind::SourceFile);
    assert_eq!(tree.to_sexp(), "(source_file)");
}

#[test]
fn test_parent_navigation() {
    let tree = parse_clean("Sub A()\n  x = 1\nEnd Sub\n");
    let assignment = only(&tree, SyntaxKind::AssignmentStatement);
    let kinds: Vec<_> = tree
        .ancestors(SyntaxElement::Node(assignment))
        .map(|n| tree.kind(n))
        .collect();
    assert_eq!(
        kinds,
        vec![SyntaxKind::Block, SyntaxKind::SubDefinition, SyntaxKind::SourceFile]
    );
}

#[test]
fn test_siblings_and_trivia() {
    let tree = parse_clean("x  =  1\ny = 2\n");
    let statements: Vec<_> = tree.child_nodes(tree.root()).collect();
    assert_eq!(statements.len(), 2);
    let first = SyntaxElement::Node(statements[0]);
    let second = SyntaxElement::Node(statements[1]);
    assert_eq!(tree.next_sibling(first), Some(second));
    assert_eq!(tree.prev_sibling(second), Some(first));
    assert_eq!(tree.prev_sibling(first), None);
    assert_eq!(tree.next_sibling(second), None);

    let (equals, _) = tree
        .tokens()
        .find(|(_, token)| token.kind == SyntaxKind::EqualsToken)
        .unwrap();
    let trivia = tree.leading_trivia(equals);
    assert_eq!(trivia.len(), 1);
    assert_eq!(trivia[0].kind, SyntaxKind::WhitespaceTrivia);
    assert_eq!(tree.trivia_text(&trivia[0]), "  ");
    let full = tree.token_full_span(equals);
    assert_eq!((full.start, full.length), (1, 3));
}

#[test]
fn test_json_export_shape() {
    let tree = parse_clean("x = 1 ' one\n");
    let json: serde_json::Value = serde_json::from_str(&tree.to_json().unwrap()).unwrap();
    assert_eq!(json["kind"], "source_file");
    let statement = &json["children"][0];
    assert_eq!(statement["kind"], "assignment_statement");
    assert_eq!(statement["children"][0]["field"], "target");
    assert_eq!(statement["children"][0]["text"], "x");
    let value = &statement["children"][2];
    assert_eq!(value["field"], "value");
    assert_eq!((value["start"].as_u64(), value["end"].as_u64()), (Some(4), Some(5)));
    // The space and the comment ride on the newline.
    let newline = &statement["children"][3];
    assert_eq!(newline["trivia"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_parse_bytes_reports_invalid_utf8() {
    let tree = parse_bytes(b"x = \"\xff\"\n", &ParserOptions::default());
    assert_eq!(tree.leaf_bytes(), b"x = \"\xff\"\n");
    let warning = tree.diagnostics().last().unwrap();
    assert_eq!(warning.span.start, 5);
    assert!(!tree.has_errors());
}

#[test]
fn test_minimal_dialect_rejects_with() {
    let source = "With x\n  .a = 1\nEnd With\n";
    assert!(parse_with_options(source, &ParserOptions::default()).diagnostics().is_empty());
    let tree = parse_with_options(source, &ParserOptions::minimal());
    assert!(tree.find_all(SyntaxKind::WithStatement).is_empty());
    assert!(tree.diagnostics()[0]
        .message_text
        .contains("not supported in the minimal dialect"));
    assert_eq!(tree.leaf_bytes(), source.as_bytes());
}
