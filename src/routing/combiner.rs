//! Combines the routes of one verb into a single expression.
//!
//! # Layout
//! ```text
//! entries:   users/(\d+)        users/profile      a/(\w+)/(\w+)
//! combined:  ^(?:(users/(\d+))|(users/profile)|(a/(\w+)/(\w+)))$
//! groups:     1  2              3               4  5      6
//! outer:      alternative 0 → 1, alternative 1 → 3, alternative 2 → 4
//! ```
//!
//! # Design Decisions
//! - Each alternative is wrapped in an outer group that only marks which
//!   alternative fired
//! - Outer group indices are computed while building, from the group counts
//!   recorded by the pattern compiler
//! - The expression is anchored; leftmost-first alternation makes the
//!   earliest registered route win

use std::sync::Arc;

use regex::{Regex, RegexBuilder};

use crate::routing::error::{RouteError, RouteResult};
use crate::routing::pattern::CompiledFragment;
use crate::routing::table::RouteEntry;
use crate::routing::verb::Verb;

/// Compiled-size ceiling for one verb's combined expression.
///
/// The engine default (10 MiB) caps a verb at a few hundred routes once
/// Unicode classes are involved.
pub const COMBINED_SIZE_LIMIT: usize = 256 * 1024 * 1024;

/// Lazy DFA cache budget for one verb's combined expression.
const COMBINED_DFA_LIMIT: usize = 32 * 1024 * 1024;

/// One alternative of a combined expression.
#[derive(Debug, Clone)]
pub struct Alternative<H> {
    /// Capture index of the outer disambiguation group.
    pub outer_group: usize,
    /// Registration index of the originating entry.
    pub registration_index: usize,
    /// Pattern as declared.
    pub pattern: String,
    pub fragment: Arc<CompiledFragment>,
    pub handler: H,
}

/// Immutable matching snapshot for one verb.
#[derive(Debug, Clone)]
pub struct CombinedExpression<H> {
    verb: Verb,
    regex: Regex,
    alternatives: Vec<Alternative<H>>,
}

impl<H> CombinedExpression<H> {
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// The combined expression source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Alternatives in registration order.
    pub fn alternatives(&self) -> &[Alternative<H>] {
        &self.alternatives
    }

    /// Total capture groups, excluding the whole-match group.
    pub fn group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }
}

/// Build the combined expression for the routes of `verb`.
pub fn build<H: Clone>(verb: Verb, entries: &[RouteEntry<H>]) -> RouteResult<CombinedExpression<H>> {
    let mut source = String::from("^(?:");
    let mut alternatives = Vec::with_capacity(entries.len());
    let mut next_group = 1;

    for (position, entry) in entries.iter().enumerate() {
        if position > 0 {
            source.push('|');
        }
        source.push('(');
        source.push_str(entry.fragment.source());
        source.push(')');

        alternatives.push(Alternative {
            outer_group: next_group,
            registration_index: entry.registration_index,
            pattern: entry.pattern.clone(),
            fragment: Arc::clone(&entry.fragment),
            handler: entry.handler.clone(),
        });
        next_group += 1 + entry.fragment.group_count();
    }
    source.push_str(")$");

    let regex = RegexBuilder::new(&source)
        .size_limit(COMBINED_SIZE_LIMIT)
        .dfa_size_limit(COMBINED_DFA_LIMIT)
        .build()
        .map_err(|source| RouteError::Combine { verb, source })?;
    debug_assert_eq!(regex.captures_len(), next_group);

    tracing::debug!(
        verb = %verb,
        alternatives = alternatives.len(),
        groups = next_group - 1,
        "Combined route expression rebuilt"
    );

    Ok(CombinedExpression {
        verb,
        regex,
        alternatives,
    })
}
