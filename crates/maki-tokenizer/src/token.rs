//! Token stream produced by the tokenizer
//!
//! The stream is a flat, ordered list of [`Fragment`]s: literal runs of
//! unclassified text and typed [`Token`]s. Tokens produced by a rule with a
//! nested grammar carry their own child stream instead of raw text, so the
//! whole result is a tree. Concatenating the text of every fragment, depth
//! first, gives back the input exactly.
//!
//! The serde representation is the shape host renderers expect: a literal run
//! is a JSON string and a token is `{"type", "content", "alias"}`, where
//! `content` is either a string or an array of fragments.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

/// Alternate labels attached to a token for presentation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Alias {
    #[default]
    None,
    Single(String),
    Many(Vec<String>),
}

impl Alias {
    /// Build an alias from a list of labels
    ///
    /// An empty list gives [`Alias::None`] and a single label gives
    /// [`Alias::Single`].
    pub fn many<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        match labels.len() {
            0 => Alias::None,
            1 => Alias::Single(labels.remove(0)),
            _ => Alias::Many(labels),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Alias::None)
    }

    /// All labels in declaration order
    pub fn as_slice(&self) -> &[String] {
        match self {
            Alias::None => &[],
            Alias::Single(label) => std::slice::from_ref(label),
            Alias::Many(labels) => labels,
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.as_slice().iter().any(|l| l == label)
    }
}

impl From<&str> for Alias {
    fn from(label: &str) -> Self {
        Alias::Single(label.to_string())
    }
}

impl From<String> for Alias {
    fn from(label: String) -> Self {
        Alias::Single(label)
    }
}

/// Body of a token: the matched text, or the stream produced by its nested grammar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Nested(TokenStream),
}

impl Content {
    /// Concatenated source text of this content
    pub fn text(&self) -> String {
        match self {
            Content::Text(text) => text.clone(),
            Content::Nested(stream) => stream.text(),
        }
    }
}

/// A classified span of input text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: Content,
    #[serde(default, skip_serializing_if = "Alias::is_none")]
    pub alias: Alias,
}

impl Token {
    pub fn new(kind: impl Into<String>, content: Content, alias: Alias) -> Self {
        Self {
            kind: kind.into(),
            content,
            alias,
        }
    }

    /// Source text covered by this token
    pub fn text(&self) -> String {
        self.content.text()
    }

    /// Whether the token's type name or one of its aliases equals `kind`
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind || self.alias.contains(kind)
    }

    /// Child stream, when the token was produced with a nested grammar
    pub fn children(&self) -> Option<&TokenStream> {
        match &self.content {
            Content::Nested(stream) => Some(stream),
            Content::Text(_) => None,
        }
    }
}

/// One element of a token stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fragment {
    /// Unclassified text copied verbatim
    Text(String),
    Token(Token),
}

impl Fragment {
    pub fn text(&self) -> String {
        match self {
            Fragment::Text(text) => text.clone(),
            Fragment::Token(token) => token.text(),
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Fragment::Token(token) => Some(token),
            Fragment::Text(_) => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Fragment::Text(_))
    }
}

impl From<Token> for Fragment {
    fn from(token: Token) -> Self {
        Fragment::Token(token)
    }
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Fragment::Text(text.to_string())
    }
}

/// Ordered literal/token sequence covering an input exactly once
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenStream(Vec<Fragment>);

impl TokenStream {
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self(fragments)
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.0
    }

    pub fn into_fragments(self) -> Vec<Fragment> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.0.iter()
    }

    /// Concatenated source text of every fragment, recursively
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        for fragment in &self.0 {
            match fragment {
                Fragment::Text(text) => out.push_str(text),
                Fragment::Token(token) => match &token.content {
                    Content::Text(text) => out.push_str(text),
                    Content::Nested(stream) => stream.push_text(out),
                },
            }
        }
    }

    /// Every token in the tree, depth first in source order
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        for token in self.0.iter().filter_map(Fragment::as_token) {
            out.push(token);
            if let Some(children) = token.children() {
                children.collect_tokens(out);
            }
        }
    }

    /// Tokens anywhere in the tree whose type name or alias is `kind`
    pub fn find_kind(&self, kind: &str) -> Vec<&Token> {
        self.tokens().into_iter().filter(|t| t.is(kind)).collect()
    }

    pub fn has_kind(&self, kind: &str) -> bool {
        self.tokens().iter().any(|t| t.is(kind))
    }

    /// Indented debug view of the tree, one fragment per line
    ///
    /// ```text
    /// rule-path
    ///   rule-indicator "*"
    ///   " "
    ///   path-component "name"
    /// " "
    /// cardinality (number) "1..1"
    /// ```
    pub fn dump(&self) -> String {
        let mut lines = Vec::new();
        self.dump_into(0, &mut lines);
        lines.join("\n")
    }

    fn dump_into(&self, depth: usize, lines: &mut Vec<String>) {
        let indent = "  ".repeat(depth);
        for fragment in &self.0 {
            let mut line = indent.clone();
            match fragment {
                Fragment::Text(text) => {
                    let _ = write!(line, "{text:?}");
                    lines.push(line);
                }
                Fragment::Token(token) => {
                    line.push_str(&token.kind);
                    if !token.alias.is_none() {
                        let _ = write!(line, " ({})", token.alias.as_slice().join(" "));
                    }
                    match &token.content {
                        Content::Text(text) => {
                            let _ = write!(line, " {text:?}");
                            lines.push(line);
                        }
                        Content::Nested(stream) => {
                            lines.push(line);
                            stream.dump_into(depth + 1, lines);
                        }
                    }
                }
            }
        }
    }
}

impl From<Vec<Fragment>> for TokenStream {
    fn from(fragments: Vec<Fragment>) -> Self {
        Self(fragments)
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for TokenStream {
    type Item = Fragment;
    type IntoIter = std::vec::IntoIter<Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for TokenStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}
