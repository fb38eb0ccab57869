//! Route pattern compilation.
//!
//! # Responsibilities
//! - Tokenize a route pattern into literal text and `{...}` placeholders
//! - Turn each placeholder into one capturing group
//! - Record placeholder names and the capture slot each one occupies
//!
//! # Pattern Syntax
//! ```text
//! users/{id:\d+}    named, custom sub-pattern     → users/((?-u:\d+))   [id]
//! users/{id:}       named, default sub-pattern    → users/((?-u:\w+))   [id]
//! users/{\w+}       anonymous                     → users/((?-u:\w+))   [_]
//! users/{[^/]+}     anonymous, Unicode required   → users/([^/]+)        [_]
//! users/profile     literal                       → users/profile        []
//! ```
//!
//! # Design Decisions
//! - Leading and trailing `/` are ignored
//! - Sub-patterns are parsed on their own so nested groups are counted
//!   structurally, never by scanning the generated text
//! - Braces nest inside a placeholder, so `{year:\d{4}}` is one placeholder
//! - Sub-patterns run with ASCII classes (`\d`, `\w` match ASCII only) when
//!   that form is valid; patterns that need Unicode mode, such as negated
//!   classes that can match any character, keep it

use std::str::CharIndices;

use regex::Regex;

use crate::routing::error::{RouteError, RouteResult};

/// Sub-pattern used by `{name:}`.
pub const DEFAULT_SUB_PATTERN: &str = r"\w+";

/// One placeholder of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Declared name, `None` for anonymous placeholders.
    pub name: Option<String>,
    /// Capture slot relative to the start of the fragment (1-based).
    pub slot: usize,
}

/// Output of compiling one route pattern.
#[derive(Debug, Clone)]
pub struct CompiledFragment {
    source: String,
    literal: String,
    placeholders: Vec<Placeholder>,
    group_count: usize,
}

impl CompiledFragment {
    /// The matching-expression fragment.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The pattern with leading and trailing separators trimmed.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Placeholders in declaration order, anonymous ones included.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Placeholder names in declaration order; `None` marks an anonymous slot.
    pub fn names(&self) -> impl Iterator<Item = Option<&str>> {
        self.placeholders.iter().map(|p| p.name.as_deref())
    }

    /// Total capturing groups inside the fragment, nested ones included.
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// True when the pattern has no placeholders.
    pub fn is_literal(&self) -> bool {
        self.placeholders.is_empty()
    }
}

/// Compile a route pattern into a matching fragment.
pub fn compile(pattern: &str) -> RouteResult<CompiledFragment> {
    let trimmed = pattern.trim_matches('/');
    let mut source = String::with_capacity(trimmed.len() + 8);
    let mut literal = String::new();
    let mut placeholders: Vec<Placeholder> = Vec::new();
    let mut group_count = 0;

    let mut chars = trimmed.char_indices();
    while let Some((offset, c)) = chars.next() {
        match c {
            '{' => {
                let body = placeholder_body(&mut chars, trimmed, offset).ok_or_else(|| {
                    malformed(pattern, format!("unterminated `{{` at offset {}", offset))
                })?;
                if body.is_empty() {
                    return Err(malformed(pattern, "empty placeholder `{}`".to_string()));
                }

                source.push_str(&regex::escape(&literal));
                literal.clear();

                let (name, sub) = split_placeholder(body);
                if let Some(name) = name {
                    if placeholders.iter().any(|p| p.name.as_deref() == Some(name)) {
                        return Err(RouteError::DuplicateParameterName {
                            pattern: pattern.to_string(),
                            name: name.to_string(),
                        });
                    }
                }

                let (sub, inner_groups) = prepare_sub_pattern(pattern, sub)?;
                placeholders.push(Placeholder {
                    name: name.map(str::to_string),
                    slot: group_count + 1,
                });
                group_count += 1 + inner_groups;

                source.push('(');
                source.push_str(&sub);
                source.push(')');
            }
            '}' => {
                return Err(malformed(
                    pattern,
                    format!("unmatched `}}` at offset {}", offset),
                ));
            }
            _ => literal.push(c),
        }
    }
    source.push_str(&regex::escape(&literal));

    Ok(CompiledFragment {
        source,
        literal: trimmed.to_string(),
        placeholders,
        group_count,
    })
}

/// Consume up to the brace closing the placeholder opened at `open`.
fn placeholder_body<'a>(chars: &mut CharIndices<'a>, text: &'a str, open: usize) -> Option<&'a str> {
    let mut depth = 1usize;
    let mut escaped = false;

    for (offset, c) in chars.by_ref() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[open + 1..offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a placeholder body into its name and sub-pattern.
///
/// Text before the first `:` only names the placeholder when it is a word
/// identifier; otherwise the whole body is an anonymous sub-pattern.
fn split_placeholder(body: &str) -> (Option<&str>, &str) {
    match body.split_once(':') {
        Some((name, sub)) if is_identifier(name) => {
            let sub = if sub.is_empty() { DEFAULT_SUB_PATTERN } else { sub };
            (Some(name), sub)
        }
        _ => (None, body),
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The sub-pattern as it goes into the fragment, plus its inner group count.
///
/// The ASCII form `(?-u:sub)` is used when `sub` is valid in that mode. It is
/// rejected for sub-patterns that could match invalid UTF-8 there (e.g.
/// `[^/]+`), and those keep Unicode semantics. Validity is checked with a
/// flag prefix rather than the wrapper, so a stray `)` in `sub` cannot close
/// the wrapper early and still compile.
fn prepare_sub_pattern(pattern: &str, sub: &str) -> RouteResult<(String, usize)> {
    // captures_len counts the implicit whole-match group
    if let Ok(re) = Regex::new(&format!("(?-u){}", sub)) {
        return Ok((format!("(?-u:{})", sub), re.captures_len() - 1));
    }
    let re = Regex::new(sub).map_err(|source| RouteError::InvalidSubPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok((sub.to_string(), re.captures_len() - 1))
}

fn malformed(pattern: &str, reason: String) -> RouteError {
    RouteError::MalformedPattern {
        pattern: pattern.to_string(),
        reason,
    }
}
