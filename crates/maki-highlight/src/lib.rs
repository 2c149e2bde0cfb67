//! MAKI Highlight
//!
//! Lexical grammar for FHIR Shorthand (FSH), registered under the names
//! `fsh`, `fhirshorthand` and `fhir-shorthand`, plus convenience entry points
//! that tokenize source text for syntax highlighting.
//!
//! ```
//! let tokens = maki_highlight::highlight("* status 1..1 MS", "fsh").unwrap();
//! assert!(tokens.has_kind("rule-path"));
//! assert!(tokens.has_kind("cardinality"));
//! ```

pub mod fsh;
pub mod languages;


pub use fsh::{FSH, build_fsh_grammar, fsh_grammar};
pub use languages::{FSH_NAMES, language, language_names};
pub use maki_tokenizer::{
    Alias, Content, Fragment, Grammar, Result, Token, TokenStream, Tokenizer, TokenizerConfig,
    TokenizerError,
};

/// Tokenize `input` with the grammar registered under `language_name`
pub fn highlight(input: &str, language_name: &str) -> Result<TokenStream> {
    highlight_with(&Tokenizer::default(), input, language_name)
}

/// Like [`highlight`], using a configured tokenizer
pub fn highlight_with(
    tokenizer: &Tokenizer,
    input: &str,
    language_name: &str,
) -> Result<TokenStream> {
    let grammar =
        language(language_name).ok_or_else(|| TokenizerError::unknown_language(language_name))?;
    Ok(tokenizer.tokenize(input, &grammar))
}

/// Tokenize FSH source
pub fn highlight_fsh(input: &str) -> TokenStream {
    maki_tokenizer::tokenize(input, &FSH)
}
