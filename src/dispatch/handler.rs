//! Handler references.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use futures_util::future::{BoxFuture, FutureExt};
use thiserror::Error;

use crate::routing::{Params, Verb};

/// Default separator between controller identifier and method name.
pub const DEFAULT_SEPARATOR: char = '@';

/// Everything a handler receives for one request.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub verb: Verb,
    pub path: String,
    pub params: Params,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub request_id: String,
}

/// Future produced by a handler.
pub type HandlerFuture = BoxFuture<'static, Response>;

/// A directly invocable handler.
pub type HandlerFn = Arc<dyn Fn(Invocation) -> HandlerFuture + Send + Sync>;

/// What a route resolves to.
#[derive(Clone)]
pub enum HandlerRef {
    /// A function called with the invocation.
    Invocable(HandlerFn),
    /// A controller identifier plus an optional method name. Without a
    /// method the dispatcher calls its default method. `separator` is the
    /// one the reference was written with.
    Composite {
        identifier: String,
        method: Option<String>,
        separator: char,
    },
}

/// A composite handler string that cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("handler `{0}` has an empty controller identifier")]
    EmptyIdentifier(String),
    #[error("handler `{0}` has an empty method name")]
    EmptyMethod(String),
}

impl HandlerRef {
    /// Wrap an async function as a handler.
    pub fn from_fn<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        HandlerRef::Invocable(Arc::new(move |invocation: Invocation| -> HandlerFuture {
            let fut = f(invocation);
            async move { fut.await.into_response() }.boxed()
        }))
    }

    /// Parse `identifier` or `identifier<separator>method`.
    pub fn parse(value: &str, separator: char) -> Result<Self, HandlerError> {
        let (identifier, method) = match value.split_once(separator) {
            Some((identifier, method)) => {
                if method.trim().is_empty() {
                    return Err(HandlerError::EmptyMethod(value.to_string()));
                }
                (identifier.trim(), Some(method.trim().to_string()))
            }
            None => (value.trim(), None),
        };
        if identifier.is_empty() {
            return Err(HandlerError::EmptyIdentifier(value.to_string()));
        }

        Ok(HandlerRef::Composite {
            identifier: identifier.to_string(),
            method,
            separator,
        })
    }

    pub fn is_invocable(&self) -> bool {
        matches!(self, HandlerRef::Invocable(_))
    }
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerRef::Invocable(_) => f.write_str("Invocable(..)"),
            HandlerRef::Composite { identifier, method, .. } => f
                .debug_struct("Composite")
                .field("identifier", identifier)
                .field("method", method)
                .finish(),
        }
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerRef::Invocable(_) => f.write_str("<fn>"),
            HandlerRef::Composite {
                identifier,
                method: Some(method),
                separator,
            } => write!(f, "{}{}{}", identifier, separator, method),
            HandlerRef::Composite {
                identifier,
                method: None,
                ..
            } => f.write_str(identifier),
        }
    }
}
