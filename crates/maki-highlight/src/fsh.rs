//! FHIR Shorthand token table
//!
//! Rules are listed from highest to lowest priority. Rules that must see
//! through embedded delimiters (comments, strings, alias lines) are greedy.
//! Rule paths, caret rules and alias lines are tokenized again with a small
//! nested grammar that falls back to the full FSH table.

use maki_tokenizer::{Grammar, Import, Pattern, Result};
use std::sync::{Arc, LazyLock};

/// Shared, lazily built FSH grammar
pub static FSH: LazyLock<Arc<Grammar>> = LazyLock::new(|| {
    Arc::new(build_fsh_grammar().expect("built-in FSH grammar must compile"))
});

/// Handle to the shared FSH grammar
pub fn fsh_grammar() -> Arc<Grammar> {
    Arc::clone(&FSH)
}

const RULE_INDICATOR: &str = r"^\s*\*";
const PATH_COMPONENT: &str = r"[a-zA-Z][a-zA-Z0-9]*";

/// Build a fresh copy of the FSH grammar
pub fn build_fsh_grammar() -> Result<Grammar> {
    Grammar::builder()
        .token("url", Pattern::new(r#"https?://[^\s)"\]}]+"#).alias("link"))
        .token("comment", Pattern::new(r"//.*").greedy())
        .token("comment", Pattern::new(r"/\*[\s\S]*?\*/").greedy())
        .token(
            "alias",
            Pattern::new(r"(?m)^Alias:[ \t]+\$[\w-]+[ \t]*=[ \t]*.+$")
                .greedy()
                .inside(Arc::new(alias_line()?)),
        )
        .token(
            "definition-keyword",
            Pattern::new(
                r"(?m)^(Profile|Extension|Instance|ValueSet|CodeSystem|RuleSet|Invariant|Mapping|Logical|Resource):",
            )
            .aliases(["keyword", "important"]),
        )
        .token(
            "metadata-keyword",
            Pattern::new(
                r"(?m)^(Id|Parent|Title|Description|Usage|Source|Target|Severity|XPath|Expression|Context|InstanceOf):",
            )
            .alias("keyword"),
        )
        .token(
            "multiline-string",
            Pattern::new(r#""""[\s\S]*?""""#).greedy().alias("string"),
        )
        // System#code, e.g. SCT#123456 or $sct#123456
        .token(
            "code",
            Pattern::new(r"[A-Z$][\w-]*#[\w.-]+")
                .alias("symbol")
                .inside(Arc::new(system_code()?)),
        )
        .token("code", Pattern::new(r"#[\w.-]+").alias("symbol"))
        .token("code", Pattern::new(r"\$[\w-]+").alias("variable"))
        .token(
            "date",
            Pattern::new(r#""\d{4}-\d{2}-\d{2}(T\d{2}:\d{2}:\d{2}(Z|[+-]\d{2}:\d{2})?)?""#)
                .alias("string"),
        )
        .token(
            "cardinality",
            Pattern::new(r"\b\d+\.\.(\d+|\*)")
                .not_followed_by(r"\w")
                .alias("number"),
        )
        .token(
            "modifier",
            Pattern::new(r"\b(MS|SU|D|TU|N)\b|\?!").alias("important"),
        )
        .token(
            "caret-rule",
            Pattern::new(
                r"(?m)^[ \t]*\*[ \t]+(?:[a-zA-Z][a-zA-Z0-9.\[\]:]*[ \t]+)?\^[a-zA-Z][a-zA-Z0-9.\[\]:]*",
            )
            .followed_by(r"\s|$")
            .inside(Arc::new(caret_path()?)),
        )
        .token(
            "rule-path",
            Pattern::new(r"(?m)^[ \t]*\*[ \t]+[a-zA-Z][a-zA-Z0-9.\[\]:^]*")
                .inside(Arc::new(rule_path()?)),
        )
        .token(
            "action-keyword",
            Pattern::new(
                r"\b(contains|only|obeys|and|or|includes|excludes|from|named|insert|codes|system|valueset|where)\b",
            )
            .alias("keyword"),
        )
        .token(
            "binding-strength",
            Pattern::new(r"\((required|extensible|preferred|example)\)")
                .inside(Arc::new(binding_strength()?)),
        )
        .token("string", Pattern::new(r#""(?:[^"\\]|\\.)*""#).greedy())
        .token("boolean", r"\b(true|false)\b")
        .token("number", r"\b\d+(\.\d+)?\b")
        .token("operator", r"[=:]")
        .token("punctuation", r"[(){}\[\],]")
        .token("identifier", r"\b[a-zA-Z_]\w*\b")
        .build()
}

/// `Alias: $name = value`
fn alias_line() -> Result<Grammar> {
    Grammar::builder()
        .token("keyword", r"^Alias:")
        .token("variable", r"\$[\w-]+")
        .token("operator", r"=")
        .token("url", Pattern::new(r"https?://\S+").alias("link"))
        .token("string", r"\S.*$")
        .import(Import::Enclosing)
        .build()
}

fn system_code() -> Result<Grammar> {
    Grammar::builder()
        .token("code-system", r"^[A-Z$][\w-]*")
        .token("operator", r"#")
        .token("code-value", r"[\w.-]+")
        .build()
}

/// `* path ^metadata.path`
fn caret_path() -> Result<Grammar> {
    Grammar::builder()
        .token("rule-indicator", RULE_INDICATOR)
        .token("caret", r"\^")
        .token("path-component", PATH_COMPONENT)
        .token("punctuation", r"[\[\].:]")
        .import(Import::Enclosing)
        .build()
}

/// `* element.path[slice]`
fn rule_path() -> Result<Grammar> {
    Grammar::builder()
        .token("rule-indicator", RULE_INDICATOR)
        // ahead of path-component so the whole bracketed slice is one token
        .token("slice-name", r"\[[a-zA-Z][a-zA-Z0-9-]*\]")
        .token("path-component", PATH_COMPONENT)
        .token("punctuation", r"[\[\].:^]")
        .import(Import::Enclosing)
        .build()
}

fn binding_strength() -> Result<Grammar> {
    Grammar::builder()
        .token("punctuation", r"[()]")
        .token("keyword", r"required|extensible|preferred|example")
        .build()
}
