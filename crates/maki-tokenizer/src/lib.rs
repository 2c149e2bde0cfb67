//! MAKI Tokenizer
//!
//! Generic regex tokenizer used for FHIR Shorthand (FSH) highlighting.
//! A [`Grammar`] is an ordered table of token patterns; the [`Tokenizer`]
//! scans text against it and produces a [`TokenStream`], a tree of literal
//! runs and typed tokens that covers the input exactly.

pub mod config;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod result;
pub mod token;

pub use config::{DEFAULT_MAX_DEPTH, TokenizerConfig};
pub use engine::{Tokenizer, tokenize};
pub use error::{ErrorKind, TokenizerError};
pub use grammar::{
    CompiledPattern, Grammar, GrammarBuilder, GrammarItem, Import, Lookahead, Pattern, TokenEntry,
};
pub use result::Result;
pub use token::{Alias, Content, Fragment, Token, TokenStream};

/// Initialize the tracing subscriber for logging
///
/// Honors `RUST_LOG` and falls back to `maki=info`. Returns `false` when a
/// global subscriber was already installed.
pub fn init_tracing() -> bool {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("maki=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .is_ok()
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
