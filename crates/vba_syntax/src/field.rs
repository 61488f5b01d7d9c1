//! Field names attached to the children of a syntax node.

use serde::Serialize;
use std::fmt;

/// The role a child plays within its parent node, e.g. the `left` operand of
/// a binary expression. Children without a field are anonymous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Name,
    Modifier,
    Parameters,
    Type,
    ReturnType,
    Body,
    Condition,
    Value,
    Target,
    Var,
    Start,
    End,
    Step,
    Collection,
    Label,
    Function,
    Object,
    Member,
    Operator,
    Left,
    Right,
    Argument,
    Arguments,
    Construct,
    Dimensions,
    Library,
    Alias,
    Expression,
    Default,
    Length,
}

impl FieldName {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Name => "name",
            FieldName::Modifier => "modifier",
            FieldName::Parameters => "parameters",
            FieldName::Type => "type",
            FieldName::ReturnType => "return_type",
            FieldName::Body => "body",
            FieldName::Condition => "condition",
            FieldName::Value => "value",
            FieldName::Target => "target",
            FieldName::Var => "var",
            FieldName::Start => "start",
            FieldName::End => "end",
            FieldName::Step => "step",
            FieldName::Collection => "collection",
            FieldName::Label => "label",
            FieldName::Function => "function",
            FieldName::Object => "object",
            FieldName::Member => "member",
            FieldName::Operator => "operator",
            FieldName::Left => "left",
            FieldName::Right => "right",
            FieldName::Argument => "argument",
            FieldName::Arguments => "arguments",
            FieldName::Construct => "construct",
            FieldName::Dimensions => "dimensions",
            FieldName::Library => "library",
            FieldName::Alias => "alias",
            FieldName::Expression => "expression",
            FieldName::Default => "default",
            FieldName::Length => "length",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
