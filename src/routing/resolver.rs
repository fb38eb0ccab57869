//! Match resolution against a combined expression.
//!
//! # Steps
//! ```text
//! path → trim separators → run combined expression
//!      → first defined capture group      (the outer group that fired)
//!      → alternative owning that group    (recorded at build time)
//!      → placeholder slots after it       (parameter values)
//! ```
//!
//! # Design Decisions
//! - No match is a value, not an error
//! - Two defined outer groups is an internal invariant violation and is
//!   reported, never resolved by picking one
//! - Anonymous placeholders take a capture slot but are not exposed

use regex::Captures;

use crate::routing::combiner::{Alternative, CombinedExpression};
use crate::routing::error::{RouteError, RouteResult};
use crate::routing::params::Params;

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<H> {
    /// Registration index of the route that matched.
    pub registration_index: usize,
    /// Pattern of the route that matched, as declared.
    pub pattern: String,
    pub handler: H,
    /// Named parameter values in declaration order.
    pub params: Params,
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<H> {
    Matched(RouteMatch<H>),
    NoMatch,
}

impl<H> Resolution<H> {
    pub fn is_match(&self) -> bool {
        matches!(self, Resolution::Matched(_))
    }

    pub fn into_match(self) -> Option<RouteMatch<H>> {
        match self {
            Resolution::Matched(m) => Some(m),
            Resolution::NoMatch => None,
        }
    }
}

/// Strip the separators that compiled fragments never contain.
pub fn normalize_path(path: &str) -> &str {
    path.trim_matches('/')
}

/// Resolve `path` against one verb's combined expression.
pub fn resolve<H: Clone>(combined: &CombinedExpression<H>, path: &str) -> RouteResult<Resolution<H>> {
    if combined.alternatives().is_empty() {
        return Ok(Resolution::NoMatch);
    }

    let path = normalize_path(path);
    let Some(captures) = combined.regex().captures(path) else {
        return Ok(Resolution::NoMatch);
    };

    let position = locate_alternative(combined, &captures, path)?;
    let alternative = &combined.alternatives()[position];

    Ok(Resolution::Matched(RouteMatch {
        registration_index: alternative.registration_index,
        pattern: alternative.pattern.clone(),
        handler: alternative.handler.clone(),
        params: extract_params(alternative, &captures),
    }))
}

fn locate_alternative<H>(
    combined: &CombinedExpression<H>,
    captures: &Captures<'_>,
    path: &str,
) -> RouteResult<usize> {
    let fired: Vec<usize> = combined
        .alternatives()
        .iter()
        .map(|alt| alt.outer_group)
        .filter(|&group| captures.get(group).is_some())
        .collect();
    if fired.len() > 1 {
        return Err(RouteError::AmbiguousMatch { groups: fired });
    }

    first_defined_group(captures)
        .and_then(|group| alternative_for_group(combined.alternatives(), group))
        .or_else(|| alternative_by_literal(combined.alternatives(), path))
        .ok_or_else(|| RouteError::Unresolvable {
            path: path.to_string(),
        })
}

/// Index of the first capture group holding a value.
fn first_defined_group(captures: &Captures<'_>) -> Option<usize> {
    (1..captures.len()).find(|&group| captures.get(group).is_some())
}

/// Alternative whose outer group is `group`.
fn alternative_for_group<H>(alternatives: &[Alternative<H>], group: usize) -> Option<usize> {
    alternatives
        .binary_search_by_key(&group, |alt| alt.outer_group)
        .ok()
}

/// Fallback: first literal pattern equal to the trimmed path.
fn alternative_by_literal<H>(alternatives: &[Alternative<H>], path: &str) -> Option<usize> {
    alternatives
        .iter()
        .position(|alt| alt.fragment.is_literal() && alt.fragment.literal() == path)
}

fn extract_params<H>(alternative: &Alternative<H>, captures: &Captures<'_>) -> Params {
    let mut params = Params::new();
    for placeholder in alternative.fragment.placeholders() {
        let Some(name) = placeholder.name.as_deref() else {
            continue;
        };
        let value = captures
            .get(alternative.outer_group + placeholder.slot)
            .map_or("", |m| m.as_str());
        params.push(name, value);
    }
    params
}
