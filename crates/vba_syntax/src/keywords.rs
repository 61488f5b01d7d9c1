//! Contextual keyword resolution.
//!
//! No VBA keyword is reserved everywhere: `Name`, `Text`, `Error` and many
//! others are ordinary identifiers outside the positions where the grammar
//! expects them. The scanner therefore emits every word as an identifier and
//! the parser asks, at each position, whether the word is one of the keywords
//! it can accept there.

use crate::SyntaxKind;
use lazy_static::lazy_static;
use rustc_hash::{FxHashMap, FxHashSet};

/// Longest keyword or predefined type name, in bytes.
const MAX_KEYWORD_LEN: usize = 16;

lazy_static! {
    static ref KEYWORDS: FxHashMap<String, SyntaxKind> = KEYWORD_KINDS
        .iter()
        .filter_map(|&kind| kind.keyword_text().map(|text| (text.to_ascii_lowercase(), kind)))
        .collect();

    static ref PREDEFINED_TYPES: FxHashSet<&'static str> = [
        "any", "boolean", "byte", "currency", "date", "decimal", "double",
        "integer", "long", "longlong", "longptr", "object", "single",
        "string", "variant",
    ]
    .into_iter()
    .collect();
}

const KEYWORD_KINDS: [SyntaxKind; 75] = [
    SyntaxKind::AliasKeyword,
    SyntaxKind::AndKeyword,
    SyntaxKind::AsKeyword,
    SyntaxKind::AttributeKeyword,
    SyntaxKind::BaseKeyword,
    SyntaxKind::BinaryKeyword,
    SyntaxKind::ByRefKeyword,
    SyntaxKind::ByValKeyword,
    SyntaxKind::CallKeyword,
    SyntaxKind::CaseKeyword,
    SyntaxKind::CompareKeyword,
    SyntaxKind::ConstKeyword,
    SyntaxKind::DatabaseKeyword,
    SyntaxKind::DeclareKeyword,
    SyntaxKind::DimKeyword,
    SyntaxKind::DoKeyword,
    SyntaxKind::EachKeyword,
    SyntaxKind::ElseKeyword,
    SyntaxKind::ElseIfKeyword,
    SyntaxKind::EndKeyword,
    SyntaxKind::EnumKeyword,
    SyntaxKind::EraseKeyword,
    SyntaxKind::ErrorKeyword,
    SyntaxKind::ExitKeyword,
    SyntaxKind::ExplicitKeyword,
    SyntaxKind::FalseKeyword,
    SyntaxKind::ForKeyword,
    SyntaxKind::FriendKeyword,
    SyntaxKind::FunctionKeyword,
    SyntaxKind::GetKeyword,
    SyntaxKind::GlobalKeyword,
    SyntaxKind::GoToKeyword,
    SyntaxKind::IfKeyword,
    SyntaxKind::InKeyword,
    SyntaxKind::IsKeyword,
    SyntaxKind::LetKeyword,
    SyntaxKind::LibKeyword,
    SyntaxKind::LikeKeyword,
    SyntaxKind::LoopKeyword,
    SyntaxKind::ModKeyword,
    SyntaxKind::ModuleKeyword,
    SyntaxKind::NameKeyword,
    SyntaxKind::NewKeyword,
    SyntaxKind::NextKeyword,
    SyntaxKind::NotKeyword,
    SyntaxKind::NothingKeyword,
    SyntaxKind::NullKeyword,
    SyntaxKind::OnKeyword,
    SyntaxKind::OptionKeyword,
    SyntaxKind::OptionalKeyword,
    SyntaxKind::OrKeyword,
    SyntaxKind::ParamArrayKeyword,
    SyntaxKind::PreserveKeyword,
    SyntaxKind::PrivateKeyword,
    SyntaxKind::PropertyKeyword,
    SyntaxKind::PtrSafeKeyword,
    SyntaxKind::PublicKeyword,
    SyntaxKind::ReDimKeyword,
    SyntaxKind::ResumeKeyword,
    SyntaxKind::SelectKeyword,
    SyntaxKind::SetKeyword,
    SyntaxKind::StaticKeyword,
    SyntaxKind::StepKeyword,
    SyntaxKind::StopKeyword,
    SyntaxKind::SubKeyword,
    SyntaxKind::TextKeyword,
    SyntaxKind::ThenKeyword,
    SyntaxKind::ToKeyword,
    SyntaxKind::TrueKeyword,
    SyntaxKind::TypeKeyword,
    SyntaxKind::UntilKeyword,
    SyntaxKind::WendKeyword,
    SyntaxKind::WhileKeyword,
    SyntaxKind::WithKeyword,
    SyntaxKind::XorKeyword,
];

/// Lowercases `text` into `buf`, or returns `None` if it is too long to be
/// a keyword or contains non-ASCII bytes.
fn fold_case<'b>(text: &[u8], buf: &'b mut [u8; MAX_KEYWORD_LEN]) -> Option<&'b str> {
    if text.is_empty() || text.len() > MAX_KEYWORD_LEN || !text.is_ascii() {
        return None;
    }
    let folded = &mut buf[..text.len()];
    folded.copy_from_slice(text);
    folded.make_ascii_lowercase();
    std::str::from_utf8(folded).ok()
}

/// Case-insensitive lookup in the full keyword table, ignoring context.
pub fn lookup_keyword(text: &[u8]) -> Option<SyntaxKind> {
    let mut buf = [0u8; MAX_KEYWORD_LEN];
    let folded = fold_case(text, &mut buf)?;
    KEYWORDS.get(folded).copied()
}

/// Resolves a bare identifier against the keywords the parser accepts at the
/// current position. A keyword in `expected` always wins over the identifier
/// reading; any other word stays an identifier.
pub fn resolve_keyword(text: &[u8], expected: &[SyntaxKind]) -> Option<SyntaxKind> {
    lookup_keyword(text).filter(|kind| expected.contains(kind))
}

/// Whether `text` names a built-in type (`Integer`, `String`, ...).
pub fn is_predefined_type(text: &[u8]) -> bool {
    let mut buf = [0u8; MAX_KEYWORD_LEN];
    fold_case(text, &mut buf).is_some_and(|folded| PREDEFINED_TYPES.contains(folded))
}

/// Case-insensitive comparison of a word with a fixed ASCII spelling.
pub fn word_eq(text: &[u8], word: &str) -> bool {
    text.eq_ignore_ascii_case(word.as_bytes())
}

impl SyntaxKind {
    /// Context-free keyword lookup. Parsers should prefer
    /// [`resolve_keyword`], which honours the expected set.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        lookup_keyword(text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup_keyword(b"END"), Some(SyntaxKind::EndKeyword));
        assert_eq!(lookup_keyword(b"elseif"), Some(SyntaxKind::ElseIfKeyword));
        assert_eq!(lookup_keyword(b"ParamArray"), Some(SyntaxKind::ParamArrayKeyword));
        assert_eq!(lookup_keyword(b"Ends"), None);
        assert_eq!(lookup_keyword(b""), None);
        assert_eq!(SyntaxKind::from_keyword("wEnD"), Some(SyntaxKind::WendKeyword));
    }

    #[test]
    fn test_every_keyword_is_in_the_table() {
        for kind in KEYWORD_KINDS {
            let text = kind.keyword_text().unwrap();
            assert_eq!(lookup_keyword(text.as_bytes()), Some(kind), "{}", text);
        }
        assert_eq!(KEYWORDS.len(), KEYWORD_KINDS.len());
    }

    #[test]
    fn test_resolution_depends_on_expected_set() {
        let statement_start = [SyntaxKind::DimKeyword, SyntaxKind::NameKeyword];
        assert_eq!(resolve_keyword(b"name", &statement_start), Some(SyntaxKind::NameKeyword));
        assert_eq!(resolve_keyword(b"Name", &[SyntaxKind::AsKeyword]), None);
        assert_eq!(resolve_keyword(b"Foo", &statement_start), None);
    }

    #[test]
    fn test_predefined_types() {
        assert!(is_predefined_type(b"LongPtr"));
        assert!(is_predefined_type(b"STRING"));
        assert!(!is_predefined_type(b"Range"));
        assert!(word_eq(b"rEm", "Rem"));
    }
}
