//! Routing error definitions.

use thiserror::Error;

use crate::routing::verb::Verb;

/// Errors raised while registering or resolving routes.
///
/// The first five variants are configuration errors: they abort the
/// registration that produced them and leave the route table untouched.
/// The last two are internal invariant violations seen at resolution time
/// and indicate a bug in the combiner or resolver.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The pattern could not be tokenized (unterminated `{`, stray `}`, empty `{}`).
    #[error("malformed route pattern `{pattern}`: {reason}")]
    MalformedPattern { pattern: String, reason: String },

    /// The same placeholder name appears twice in one pattern.
    #[error("duplicate parameter name `{name}` in route pattern `{pattern}`")]
    DuplicateParameterName { pattern: String, name: String },

    /// A placeholder sub-pattern is not a valid expression.
    #[error("invalid sub-pattern in route pattern `{pattern}`: {source}")]
    InvalidSubPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A registration named no verb.
    #[error("route pattern `{pattern}` is registered under no verb")]
    NoVerbs { pattern: String },

    /// The combined expression for a verb could not be built.
    #[error("cannot combine {verb} routes: {source}")]
    Combine {
        verb: Verb,
        #[source]
        source: regex::Error,
    },

    /// More than one alternative reported a defined outer group.
    #[error("internal routing error: alternatives {groups:?} matched simultaneously")]
    AmbiguousMatch { groups: Vec<usize> },

    /// The path matched but no alternative could be located for it.
    #[error("internal routing error: matched alternative for `{path}` cannot be located")]
    Unresolvable { path: String },
}

impl RouteError {
    /// Returns true for errors caused by a bad route declaration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RouteError::MalformedPattern { .. }
                | RouteError::DuplicateParameterName { .. }
                | RouteError::InvalidSubPattern { .. }
                | RouteError::NoVerbs { .. }
                | RouteError::Combine { .. }
        )
    }
}

/// Result type for routing operations.
pub type RouteResult<T> = Result<T, RouteError>;
