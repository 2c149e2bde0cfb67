//! Result type alias for tokenizer operations

use crate::error::TokenizerError;

/// Standard Result type for grammar construction, configuration and lookup
pub type Result<T> = std::result::Result<T, TokenizerError>;
