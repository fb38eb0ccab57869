//! HTTP verb tokens accepted by the router.

use std::fmt;
use std::str::FromStr;

use axum::http::Method;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the verbs a route can be registered under.
///
/// Tokens are case-sensitive: `"GET"` parses, `"get"` does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Verb {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
    #[serde(rename = "PUT")]
    Put,
    #[serde(rename = "DELETE")]
    Delete,
    #[serde(rename = "PATCH")]
    Patch,
    #[serde(rename = "HEAD")]
    Head,
    #[serde(rename = "OPTIONS")]
    Options,
}

impl Verb {
    /// Every supported verb, in declaration order.
    pub const ALL: [Verb; 7] = [
        Verb::Get,
        Verb::Post,
        Verb::Put,
        Verb::Delete,
        Verb::Patch,
        Verb::Head,
        Verb::Options,
    ];

    /// The canonical token for this verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
            Verb::Patch => "PATCH",
            Verb::Head => "HEAD",
            Verb::Options => "OPTIONS",
        }
    }

    /// Dense index used for per-verb slots.
    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token outside the supported verb set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported verb `{0}`")]
pub struct UnknownVerb(pub String);

impl FromStr for Verb {
    type Err = UnknownVerb;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verb::ALL
            .iter()
            .copied()
            .find(|verb| verb.as_str() == s)
            .ok_or_else(|| UnknownVerb(s.to_string()))
    }
}

impl TryFrom<&Method> for Verb {
    type Error = UnknownVerb;

    fn try_from(method: &Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

/// A single verb registers under itself, so `add_route` accepts either
/// `Verb::Get` or a collection such as `[Verb::Get, Verb::Head]`.
impl IntoIterator for Verb {
    type Item = Verb;
    type IntoIter = std::iter::Once<Verb>;

    fn into_iter(self) -> Self::IntoIter {
        std::iter::once(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!("GET".parse::<Verb>(), Ok(Verb::Get));
        assert_eq!("OPTIONS".parse::<Verb>(), Ok(Verb::Options));
        assert!("get".parse::<Verb>().is_err());
        assert!("TRACE".parse::<Verb>().is_err());
    }

    #[test]
    fn test_from_method() {
        assert_eq!(Verb::try_from(&Method::PATCH), Ok(Verb::Patch));
        assert!(Verb::try_from(&Method::CONNECT).is_err());
    }

    #[test]
    fn test_index_is_dense() {
        for (i, verb) in Verb::ALL.iter().enumerate() {
            assert_eq!(verb.index(), i);
            assert_eq!(verb.to_string().parse::<Verb>(), Ok(*verb));
        }
    }
}
