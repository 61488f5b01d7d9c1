//! Parsing many independent files in parallel.

use crate::parse_with_options;
use rayon::prelude::*;
use tracing::debug;
use vba_options::ParserOptions;
use vba_syntax::SyntaxTree;

/// One file of a batch and its tree.
#[derive(Debug)]
pub struct ParsedFile {
    pub name: String,
    pub tree: SyntaxTree,
}

impl ParsedFile {
    pub fn has_errors(&self) -> bool {
        self.tree.has_errors()
    }
}

/// Parses `(name, text)` pairs on the rayon thread pool. Results keep the
/// input order. Parses share no state, so the trees are the same as
/// sequential ones.
pub fn parse_batch<N, T>(files: &[(N, T)], options: &ParserOptions) -> Vec<ParsedFile>
where
    N: AsRef<str> + Sync,
    T: AsRef<str> + Sync,
{
    let parsed: Vec<ParsedFile> = files
        .par_iter()
        .map(|(name, text)| ParsedFile {
            name: name.as_ref().to_string(),
            tree: parse_with_options(text.as_ref(), options),
        })
        .collect();
    debug!(
        files = parsed.len(),
        with_errors = parsed.iter().filter(|f| f.has_errors()).count(),
        "parsed batch"
    );
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_keeps_order_and_matches_sequential() {
        let files: Vec<(String, String)> = (0..32)
            .map(|i| (format!("Module{i}.bas"), format!("Sub S{i}()\n  x = {i} + 1\nEnd Sub\n")))
            .collect();
        let options = ParserOptions::default();
        let parsed = parse_batch(files.as_slice(), &options);
        assert_eq!(parsed.len(), files.len());
        for (file, (name, text)) in parsed.iter().zip(&files) {
            assert_eq!(&file.name, name);
            assert!(!file.has_errors());
            assert_eq!(file.tree.to_sexp(), parse_with_options(text, &options).to_sexp());
        }
    }

    #[test]
    fn test_batch_reports_per_file_errors() {
        let files = [("good.bas", "x = 1\n"), ("bad.bas", "If x Then\n")];
        let parsed = parse_batch(&files[..], &ParserOptions::default());
        assert!(!parsed[0].has_errors());
        assert!(parsed[1].has_errors());
    }
}
