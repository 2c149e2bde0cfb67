//! Language registry

use crate::fsh::fsh_grammar;
use maki_tokenizer::Grammar;
use std::sync::Arc;

/// Names the FSH grammar is registered under
pub const FSH_NAMES: &[&str] = &["fsh", "fhirshorthand", "fhir-shorthand"];

/// All registered language names
pub fn language_names() -> &'static [&'static str] {
    FSH_NAMES
}

/// Look up a grammar by language name, ignoring ASCII case
pub fn language(name: &str) -> Option<Arc<Grammar>> {
    let name = name.trim();
    if FSH_NAMES.iter().any(|n| n.eq_ignore_ascii_case(name)) {
        tracing::debug!("Resolved language '{}' to FSH grammar", name);
        Some(fsh_grammar())
    } else {
        None
    }
}
