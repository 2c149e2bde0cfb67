//! Declarative rule tables
//!
//! A [`Grammar`] is an ordered list of token entries and imports. Order is
//! priority: when two rules match at the same offset the earlier one wins.
//! Rules are written as [`Pattern`]s and compiled once, when the grammar is
//! built; a built grammar is immutable and can be shared across threads.
//!
//! ```
//! use maki_tokenizer::{Grammar, Pattern};
//!
//! let grammar = Grammar::builder()
//!     .token("comment", Pattern::new(r"//.*").greedy())
//!     .token("number", r"\b\d+\b")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(grammar.token_names(), vec!["comment", "number"]);
//! ```

use crate::error::TokenizerError;
use crate::result::Result;
use crate::token::Alias;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Zero-width condition on the text right after a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookahead {
    /// The text after the match must start with this pattern
    FollowedBy(String),
    /// The text after the match must not start with this pattern
    NotFollowedBy(String),
}

impl Lookahead {
    pub fn source(&self) -> &str {
        match self {
            Lookahead::FollowedBy(source) | Lookahead::NotFollowedBy(source) => source,
        }
    }
}

/// Uncompiled matching rule for one token type
///
/// The token type name is not part of the pattern; it is given when the
/// pattern is added to a [`GrammarBuilder`].
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    greedy: bool,
    alias: Alias,
    inside: Option<Arc<Grammar>>,
    inside_group: Option<usize>,
    lookbehind: bool,
    lookahead: Option<Lookahead>,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            greedy: false,
            alias: Alias::None,
            inside: None,
            inside_group: None,
            lookbehind: false,
            lookahead: None,
        }
    }

    /// Keep the full match even when a higher-priority rule matches inside it
    pub fn greedy(mut self) -> Self {
        self.greedy = true;
        self
    }

    pub fn alias(mut self, alias: impl Into<Alias>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alias = Alias::many(aliases);
        self
    }

    /// Tokenize the matched text again with a nested grammar
    pub fn inside(mut self, grammar: Arc<Grammar>) -> Self {
        self.inside = Some(grammar);
        self
    }

    /// Restrict nested tokenization to one capture group of the match
    ///
    /// Text of the match before and after the group stays literal inside the
    /// token. Has no effect without [`Pattern::inside`].
    pub fn inside_group(mut self, group: usize) -> Self {
        self.inside_group = Some(group);
        self
    }

    /// Treat capture group 1 as leading context that is not part of the token
    pub fn lookbehind(mut self) -> Self {
        self.lookbehind = true;
        self
    }

    pub fn followed_by(mut self, source: impl Into<String>) -> Self {
        self.lookahead = Some(Lookahead::FollowedBy(source.into()));
        self
    }

    pub fn not_followed_by(mut self, source: impl Into<String>) -> Self {
        self.lookahead = Some(Lookahead::NotFollowedBy(source.into()));
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    fn compile(self, token: &str, index: usize) -> Result<CompiledPattern> {
        let invalid = |pattern: &str, source: regex::Error| TokenizerError::InvalidPattern {
            token: token.to_string(),
            index,
            pattern: pattern.to_string(),
            source,
        };

        let regex = Regex::new(&self.source).map_err(|e| invalid(&self.source, e))?;
        let available = regex.captures_len() - 1;

        let mut groups = Vec::new();
        if self.lookbehind {
            groups.push(1);
        }
        if self.inside.is_some() {
            groups.extend(self.inside_group);
        }
        if let Some(&group) = groups.iter().find(|&&g| g > available) {
            return Err(TokenizerError::InvalidCaptureGroup {
                token: token.to_string(),
                index,
                group,
                available,
            });
        }

        let guard = match &self.lookahead {
            Some(lookahead) => {
                let anchored = format!(r"\A(?:{})", lookahead.source());
                let regex = Regex::new(&anchored).map_err(|e| invalid(lookahead.source(), e))?;
                Some(Guard {
                    regex,
                    negate: matches!(lookahead, Lookahead::NotFollowedBy(_)),
                })
            }
            None => None,
        };

        Ok(CompiledPattern {
            regex,
            guard,
            greedy: self.greedy,
            alias: self.alias,
            inside_group: self.inside.as_ref().and(self.inside_group),
            inside: self.inside,
            lookbehind: self.lookbehind,
            source: self.source,
        })
    }
}

impl From<&str> for Pattern {
    fn from(source: &str) -> Self {
        Pattern::new(source)
    }
}

impl From<String> for Pattern {
    fn from(source: String) -> Self {
        Pattern::new(source)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Guard {
    pub(crate) regex: Regex,
    pub(crate) negate: bool,
}

impl Guard {
    /// Whether the guard accepts a match ending at `end`
    pub(crate) fn allows(&self, haystack: &str, end: usize) -> bool {
        self.regex.is_match(&haystack[end..]) != self.negate
    }
}

/// A [`Pattern`] whose regular expressions have been compiled
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    pub(crate) regex: Regex,
    pub(crate) guard: Option<Guard>,
    greedy: bool,
    alias: Alias,
    inside: Option<Arc<Grammar>>,
    inside_group: Option<usize>,
    lookbehind: bool,
}

impl CompiledPattern {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_greedy(&self) -> bool {
        self.greedy
    }

    pub fn alias(&self) -> &Alias {
        &self.alias
    }

    pub fn inside(&self) -> Option<&Arc<Grammar>> {
        self.inside.as_ref()
    }

    pub fn inside_group(&self) -> Option<usize> {
        self.inside_group
    }

    pub fn has_lookbehind(&self) -> bool {
        self.lookbehind
    }

    pub(crate) fn needs_captures(&self) -> bool {
        self.lookbehind || self.inside_group.is_some()
    }
}

/// All patterns for one token type, tried in declaration order
#[derive(Debug, Clone)]
pub struct TokenEntry {
    name: String,
    patterns: Vec<CompiledPattern>,
}

impl TokenEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }
}

/// Rules spliced into a grammar from elsewhere
#[derive(Debug, Clone)]
pub enum Import {
    /// Every rule of another grammar
    Grammar(Arc<Grammar>),
    /// The rules of the grammar being scanned when this grammar is used as a
    /// nested grammar; resolves to nothing at the top level
    Enclosing,
}

#[derive(Debug, Clone)]
pub enum GrammarItem {
    Entry(TokenEntry),
    Import(Import),
}

/// One pattern in a grammar's flattened, priority-ordered rule list
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rule<'g> {
    pub(crate) kind: &'g str,
    pub(crate) pattern: &'g CompiledPattern,
}

/// Immutable, priority-ordered rule table
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    items: Vec<GrammarItem>,
}

impl Grammar {
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    pub fn items(&self) -> &[GrammarItem] {
        &self.items
    }

    /// Token entries defined by this grammar itself, in priority order
    pub fn entries(&self) -> impl Iterator<Item = &TokenEntry> {
        self.items.iter().filter_map(|item| match item {
            GrammarItem::Entry(entry) => Some(entry),
            GrammarItem::Import(_) => None,
        })
    }

    pub fn imports(&self) -> impl Iterator<Item = &Import> {
        self.items.iter().filter_map(|item| match item {
            GrammarItem::Import(import) => Some(import),
            GrammarItem::Entry(_) => None,
        })
    }

    pub fn get(&self, name: &str) -> Option<&TokenEntry> {
        self.entries().find(|entry| entry.name == name)
    }

    pub fn defines(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn token_names(&self) -> Vec<&str> {
        self.entries().map(TokenEntry::name).collect()
    }

    /// Number of token entries defined by this grammar itself
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    /// True when the grammar defines no token entries of its own
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into the effective rule list used for scanning
    ///
    /// `enclosing` is the rule list that [`Import::Enclosing`] stands for.
    /// Imported rules never override a token type this grammar defines, and
    /// a type brought in by an earlier import hides the same type in later
    /// imports.
    pub(crate) fn resolve<'g>(&'g self, enclosing: &[Rule<'g>]) -> Vec<Rule<'g>> {
        let own: HashSet<&str> = self.entries().map(TokenEntry::name).collect();
        let mut imported_from: HashMap<&str, usize> = HashMap::new();
        let mut rules = Vec::new();

        for (position, item) in self.items.iter().enumerate() {
            match item {
                GrammarItem::Entry(entry) => {
                    rules.extend(entry.patterns.iter().map(|pattern| Rule {
                        kind: entry.name.as_str(),
                        pattern,
                    }));
                }
                GrammarItem::Import(import) => {
                    let spliced = match import {
                        Import::Grammar(grammar) => grammar.resolve(enclosing),
                        Import::Enclosing => enclosing.to_vec(),
                    };
                    for rule in spliced {
                        if own.contains(rule.kind) {
                            continue;
                        }
                        let source = *imported_from.entry(rule.kind).or_insert(position);
                        if source == position {
                            rules.push(rule);
                        }
                    }
                }
            }
        }

        rules
    }
}

enum PendingItem {
    Entry(String, Vec<Pattern>),
    Import(Import),
}

/// Collects entries and imports, then compiles them into a [`Grammar`]
#[derive(Default)]
pub struct GrammarBuilder {
    items: Vec<PendingItem>,
}

impl GrammarBuilder {
    /// Add a pattern for a token type
    ///
    /// Adding a second pattern under an existing name appends it to that
    /// entry; the entry keeps its place in the priority order.
    pub fn token(mut self, name: impl Into<String>, pattern: impl Into<Pattern>) -> Self {
        let name = name.into();
        let pattern = pattern.into();

        let existing = self
            .items
            .iter()
            .position(|item| matches!(item, PendingItem::Entry(n, _) if *n == name));
        match existing {
            Some(index) => {
                if let PendingItem::Entry(_, patterns) = &mut self.items[index] {
                    patterns.push(pattern);
                }
            }
            None => self.items.push(PendingItem::Entry(name, vec![pattern])),
        }
        self
    }

    pub fn import(mut self, import: Import) -> Self {
        self.items.push(PendingItem::Import(import));
        self
    }

    /// Compile every pattern
    ///
    /// Fails on the first malformed regular expression or out-of-range
    /// capture group.
    pub fn build(self) -> Result<Grammar> {
        let mut items = Vec::with_capacity(self.items.len());
        let mut pattern_count = 0;

        for item in self.items {
            match item {
                PendingItem::Entry(name, patterns) => {
                    let patterns = patterns
                        .into_iter()
                        .enumerate()
                        .map(|(index, pattern)| pattern.compile(&name, index))
                        .collect::<Result<Vec<_>>>()?;
                    pattern_count += patterns.len();
                    items.push(GrammarItem::Entry(TokenEntry { name, patterns }));
                }
                PendingItem::Import(import) => items.push(GrammarItem::Import(import)),
            }
        }

        let grammar = Grammar { items };
        tracing::debug!(
            "Built grammar with {} entries, {} patterns and {} imports",
            grammar.len(),
            pattern_count,
            grammar.imports().count()
        );
        Ok(grammar)
    }
}
