//! vba_options: parser configuration.
//!
//! Options are plain data with serde support so that an embedding editor or
//! tool can keep them in its own JSON settings, e.g.
//! `{ "dialect": "minimal", "maxDepth": 128, "maxTokens": 50000 }`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default bound on nested blocks and expressions.
pub const DEFAULT_MAX_DEPTH: u32 = 256;

/// Which rule set the parser accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Every statement form, including `Select Case`, `With` and error
    /// handling.
    #[default]
    Full,
    /// The reduced rule set without `Select Case`, `With`, `Error`,
    /// `On Error` and `Resume`. Those statements are still recognised so they
    /// can be isolated and reported.
    Minimal,
}

/// Parser options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ParserOptions {
    pub dialect: Dialect,
    /// Maximum nesting of blocks and expressions before the parser stops
    /// descending and reports the rest of the line.
    pub max_depth: u32,
    /// Cancellation budget: the number of significant tokens the parser may
    /// consume before the remaining input is left unparsed.
    pub max_tokens: Option<usize>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::Full,
            max_depth: DEFAULT_MAX_DEPTH,
            max_tokens: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid parser options: {0}")]
    Json(#[from] serde_json::Error),
    #[error("maxDepth must be at least 1")]
    ZeroDepth,
    #[error("maxTokens must be at least 1")]
    ZeroTokenBudget,
}

impl ParserOptions {
    pub fn minimal() -> Self {
        Self {
            dialect: Dialect::Minimal,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Parses and validates options from JSON. Missing fields take their
    /// defaults.
    pub fn from_json(content: &str) -> Result<Self, OptionsError> {
        let options: ParserOptions = serde_json::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    pub fn to_json(&self) -> Result<String, OptionsError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.max_depth == 0 {
            return Err(OptionsError::ZeroDepth);
        }
        if self.max_tokens == Some(0) {
            return Err(OptionsError::ZeroTokenBudget);
        }
        Ok(())
    }

    pub fn is_minimal(&self) -> bool {
        self.dialect == Dialect::Minimal
    }
}
