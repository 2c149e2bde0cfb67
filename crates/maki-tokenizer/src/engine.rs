//! Priority-ordered, leftmost-earliest scanner
//!
//! The scanner walks the input once. At each cursor position every rule
//! reports its leftmost match at or after the cursor; the match that starts
//! first wins, and ties go to the rule that comes first in the grammar. Text
//! skipped over on the way is emitted as a literal run, so the output always
//! covers the input exactly.
//!
//! A non-greedy winner may not swallow the start of a match from a rule with
//! higher priority. When that happens the scan window is cut at the start of
//! the higher-priority match, non-greedy rules are matched again against the
//! shortened text, and selection repeats. Greedy rules are never cut.
//!
//! Candidates are cached per rule: a match found earlier is still the leftmost
//! match for a later cursor as long as it starts at or after that cursor, so
//! most rules are searched only when the cursor moves past their last match.

use crate::config::TokenizerConfig;
use crate::grammar::{CompiledPattern, Grammar, Rule};
use crate::token::{Content, Fragment, Token, TokenStream};

/// Tokenize `input` with default limits
pub fn tokenize(input: &str, grammar: &Grammar) -> TokenStream {
    Tokenizer::default().tokenize(input, grammar)
}

/// Tokenizer with configurable resource limits
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Split `input` into literal runs and typed tokens
    ///
    /// Never fails. Text that no rule matches, and text left over when a
    /// limit is reached, is kept as literal fragments. Empty input yields a
    /// single empty literal.
    pub fn tokenize(&self, input: &str, grammar: &Grammar) -> TokenStream {
        if input.is_empty() {
            return TokenStream::new(vec![Fragment::Text(String::new())]);
        }

        let rules = grammar.resolve(&[]);
        let mut scan = Scan {
            max_depth: self.config.max_depth,
            budget: Budget::new(self.config.max_steps),
        };
        TokenStream::new(scan.run(input, &rules, 0))
    }
}

/// Search budget shared by a tokenize call and all of its nested scans
struct Budget {
    remaining: Option<u64>,
    exhausted: bool,
}

/// Marker returned once the search budget is spent
struct Exhausted;

impl Budget {
    fn new(max_steps: Option<u64>) -> Self {
        Self {
            remaining: max_steps,
            exhausted: false,
        }
    }

    fn tick(&mut self) -> Result<(), Exhausted> {
        match &mut self.remaining {
            None => Ok(()),
            Some(0) => {
                if !self.exhausted {
                    self.exhausted = true;
                    tracing::warn!("Step limit reached; remaining text is left unclassified");
                }
                Err(Exhausted)
            }
            Some(n) => {
                *n -= 1;
                Ok(())
            }
        }
    }
}

/// A valid match for one rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    /// Where the regex match began, lookbehind context included
    match_start: usize,
    /// Token span
    start: usize,
    end: usize,
    /// Span of the nested capture group, clamped to the token span
    group: Option<(usize, usize)>,
}

#[derive(Debug, Clone, Copy)]
enum Cached {
    Stale,
    Miss,
    Hit(Candidate),
}

enum Selection {
    Token(usize, Candidate),
    /// Nothing can start before this offset
    Literal(usize),
    Done,
}

fn next_boundary(text: &str, index: usize) -> usize {
    text.get(index..)
        .and_then(|rest| rest.chars().next())
        .map_or(text.len() + 1, |c| index + c.len_utf8())
}

impl CompiledPattern {
    /// Leftmost valid match of this pattern in `haystack` at or after `from`
    ///
    /// Empty tokens and matches rejected by the lookahead guard are skipped by
    /// searching again from the next character.
    fn candidate(
        &self,
        haystack: &str,
        mut from: usize,
        budget: &mut Budget,
    ) -> Result<Option<Candidate>, Exhausted> {
        while from <= haystack.len() {
            budget.tick()?;

            let found = if self.needs_captures() {
                self.regex.captures_at(haystack, from).and_then(|caps| {
                    let m = caps.get(0)?;
                    let start = if self.has_lookbehind() {
                        caps.get(1).map_or(m.start(), |g| g.end())
                    } else {
                        m.start()
                    };
                    let clamp = |offset: usize| offset.clamp(start, m.end());
                    let group = self
                        .inside_group()
                        .and_then(|n| caps.get(n))
                        .map(|g| (clamp(g.start()), clamp(g.end())));
                    Some(Candidate {
                        match_start: m.start(),
                        start,
                        end: m.end(),
                        group,
                    })
                })
            } else {
                self.regex.find_at(haystack, from).map(|m| Candidate {
                    match_start: m.start(),
                    start: m.start(),
                    end: m.end(),
                    group: None,
                })
            };

            let Some(candidate) = found else {
                return Ok(None);
            };

            let accepted = candidate.start < candidate.end
                && match &self.guard {
                    Some(guard) => {
                        budget.tick()?;
                        guard.allows(haystack, candidate.end)
                    }
                    None => true,
                };
            if accepted {
                return Ok(Some(candidate));
            }
            from = next_boundary(haystack, candidate.match_start);
        }
        Ok(None)
    }
}

struct Scan {
    max_depth: usize,
    budget: Budget,
}

impl Scan {
    fn run(&mut self, text: &str, rules: &[Rule<'_>], depth: usize) -> Vec<Fragment> {
        let mut out = Vec::new();
        let mut cache = vec![Cached::Stale; rules.len()];
        let mut cursor = 0;

        while cursor < text.len() {
            match self.select(text, cursor, rules, &mut cache) {
                Ok(Selection::Token(index, candidate)) => {
                    push_text(&mut out, &text[cursor..candidate.start]);
                    let token = self.build_token(text, rules, index, &candidate, depth);
                    out.push(Fragment::Token(token));
                    cursor = candidate.end;
                }
                Ok(Selection::Literal(limit)) => {
                    push_text(&mut out, &text[cursor..limit]);
                    cursor = limit;
                }
                Ok(Selection::Done) | Err(Exhausted) => break,
            }
        }

        push_text(&mut out, &text[cursor..]);
        out
    }

    /// Pick the next token starting at or after `cursor`
    fn select(
        &mut self,
        text: &str,
        cursor: usize,
        rules: &[Rule<'_>],
        cache: &mut [Cached],
    ) -> Result<Selection, Exhausted> {
        let mut limit = text.len();
        let mut found: Vec<Option<Candidate>> = vec![None; rules.len()];

        loop {
            for (index, rule) in rules.iter().enumerate() {
                found[index] = if limit == text.len() || rule.pattern.is_greedy() {
                    self.cached(text, cursor, rule, &mut cache[index])?
                } else {
                    rule.pattern
                        .candidate(&text[..limit], cursor, &mut self.budget)?
                };
            }

            let mut winner: Option<(usize, Candidate)> = None;
            for (index, candidate) in found.iter().enumerate() {
                if let Some(candidate) = candidate
                    && candidate.start < limit
                    && winner.is_none_or(|(_, best)| candidate.start < best.start)
                {
                    winner = Some((index, *candidate));
                }
            }

            let Some((index, candidate)) = winner else {
                return Ok(if limit < text.len() {
                    Selection::Literal(limit)
                } else {
                    Selection::Done
                });
            };

            if rules[index].pattern.is_greedy() {
                return Ok(Selection::Token(index, candidate));
            }

            let clip = found[..index]
                .iter()
                .flatten()
                .map(|c| c.start)
                .filter(|&start| start > candidate.start && start < candidate.end)
                .min();
            match clip {
                Some(start) => limit = start,
                None => return Ok(Selection::Token(index, candidate)),
            }
        }
    }

    fn cached(
        &mut self,
        text: &str,
        cursor: usize,
        rule: &Rule<'_>,
        slot: &mut Cached,
    ) -> Result<Option<Candidate>, Exhausted> {
        match *slot {
            Cached::Miss => return Ok(None),
            Cached::Hit(candidate) if candidate.match_start >= cursor => {
                return Ok(Some(candidate));
            }
            _ => {}
        }

        let candidate = rule.pattern.candidate(text, cursor, &mut self.budget)?;
        *slot = match candidate {
            Some(candidate) => Cached::Hit(candidate),
            None => Cached::Miss,
        };
        Ok(candidate)
    }

    fn build_token<'g>(
        &mut self,
        text: &str,
        rules: &[Rule<'g>],
        index: usize,
        candidate: &Candidate,
        depth: usize,
    ) -> Token {
        let rule = rules[index];
        let matched = &text[candidate.start..candidate.end];
        let raw = || Content::Text(matched.to_string());

        let content = match rule.pattern.inside() {
            None => raw(),
            Some(_) if self.budget.exhausted => raw(),
            Some(_) if depth >= self.max_depth => {
                tracing::warn!(
                    "Nesting depth limit {} reached in '{}'; keeping content as text",
                    self.max_depth,
                    rule.kind
                );
                raw()
            }
            Some(inner) => {
                let nested = inner.resolve(rules);
                tracing::trace!("Tokenizing '{}' content at depth {}", rule.kind, depth + 1);

                match (rule.pattern.inside_group(), candidate.group) {
                    (None, _) => Content::Nested(TokenStream::new(self.run(
                        matched,
                        &nested,
                        depth + 1,
                    ))),
                    (Some(_), None) => raw(),
                    (Some(_), Some((group_start, group_end))) => {
                        let mut children = Vec::new();
                        push_text(&mut children, &text[candidate.start..group_start]);
                        if group_start < group_end {
                            children.extend(self.run(
                                &text[group_start..group_end],
                                &nested,
                                depth + 1,
                            ));
                        }
                        push_text(&mut children, &text[group_end..candidate.end]);
                        Content::Nested(TokenStream::new(children))
                    }
                }
            }
        };

        Token::new(rule.kind, content, rule.pattern.alias().clone())
    }
}

/// Append a literal run, merging with a preceding literal
fn push_text(out: &mut Vec<Fragment>, text: &str) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(Fragment::Text(last)) => last.push_str(text),
        _ => out.push(Fragment::Text(text.to_string())),
    }
}
