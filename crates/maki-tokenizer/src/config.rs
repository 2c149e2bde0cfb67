//! Tokenizer configuration
//!
//! Limits that keep a single tokenize call bounded. Both limits degrade to
//! literal text when hit; they never fail the call.

use crate::error::TokenizerError;
use crate::result::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default cap on nested-grammar recursion
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Resource limits for a [`Tokenizer`](crate::Tokenizer)
///
/// Keys are camelCase in both TOML and JSON:
///
/// ```toml
/// maxDepth = 8
/// maxSteps = 100000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenizerConfig {
    /// Deepest nesting level at which a token's content is still tokenized
    pub max_depth: usize,

    /// Upper bound on regex searches per tokenize call, nested calls included
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<u64>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_steps: None,
        }
    }
}

impl TokenizerConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| TokenizerError::config_error(format!("Invalid TOML: {e}")))
    }

    /// Parse configuration from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| TokenizerError::config_error(format!("Invalid JSON: {e}")))
    }

    /// Load configuration from a `.toml` or `.json` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| TokenizerError::io_error(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        let config = match ext {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => {
                return Err(TokenizerError::config_error(format!(
                    "Unsupported file extension for '{}' (expected .toml or .json)",
                    path.display()
                )));
            }
        };

        tracing::debug!("Loaded tokenizer config from {}", path.display());
        Ok(config)
    }
}
