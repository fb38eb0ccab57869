//! Handler invocation.

use std::sync::Arc;

use axum::response::Response;
use thiserror::Error;

use crate::dispatch::controller::ControllerFactory;
use crate::dispatch::handler::{HandlerFuture, HandlerRef, Invocation};

/// Method called when a composite handler names none.
pub const DEFAULT_METHOD: &str = "run";

/// Errors raised while turning a handler reference into a call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("unknown controller `{0}`")]
    UnknownController(String),
    #[error("controller `{identifier}` has no method `{method}`")]
    UnknownMethod { identifier: String, method: String },
}

/// Invokes resolved handlers.
#[derive(Clone)]
pub struct Dispatcher {
    factory: Arc<dyn ControllerFactory>,
    default_method: String,
}

impl Dispatcher {
    pub fn new(factory: Arc<dyn ControllerFactory>, default_method: impl Into<String>) -> Self {
        Self {
            factory,
            default_method: default_method.into(),
        }
    }

    pub fn default_method(&self) -> &str {
        &self.default_method
    }

    /// Bind `handler` to `invocation` without running it.
    pub fn prepare(&self, handler: &HandlerRef, invocation: Invocation) -> Result<HandlerFuture, DispatchError> {
        match handler {
            HandlerRef::Invocable(f) => Ok(f(invocation)),
            HandlerRef::Composite { identifier, method, .. } => {
                let method = method.as_deref().unwrap_or(&self.default_method);
                let controller = self
                    .factory
                    .create(identifier)
                    .ok_or_else(|| DispatchError::UnknownController(identifier.clone()))?;

                tracing::trace!(
                    request_id = %invocation.request_id,
                    controller = %identifier,
                    method = %method,
                    "Dispatching to controller"
                );

                controller
                    .invoke(method, invocation)
                    .ok_or_else(|| DispatchError::UnknownMethod {
                        identifier: identifier.clone(),
                        method: method.to_string(),
                    })
            }
        }
    }

    /// Run `handler` for `invocation`.
    pub async fn dispatch(&self, handler: &HandlerRef, invocation: Invocation) -> Result<Response, DispatchError> {
        Ok(self.prepare(handler, invocation)?.await)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("default_method", &self.default_method)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::controller::ControllerRegistry;
    use crate::routing::{Params, Verb};
    use axum::body::{to_bytes, Bytes};
    use axum::http::{HeaderMap, StatusCode};

    fn invocation() -> Invocation {
        Invocation {
            verb: Verb::Get,
            path: "/users/7".into(),
            params: Params::default(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            request_id: "test".into(),
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(ControllerRegistry::with_builtin()), DEFAULT_METHOD)
    }

    async fn body_of(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_invocable_handler() {
        let handler = HandlerRef::from_fn(|inv: Invocation| async move { format!("hello {}", inv.path) });
        let response = dispatcher().dispatch(&handler, invocation()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, "hello /users/7");
    }

    #[tokio::test]
    async fn test_composite_uses_default_method() {
        let handler = HandlerRef::parse("echo", '@').unwrap();
        let response = dispatcher().dispatch(&handler, invocation()).await.unwrap();
        let body: serde_json::Value = serde_json::from_str(&body_of(response).await).unwrap();
        assert_eq!(body["method"], "run");
        assert_eq!(body["verb"], "GET");
    }

    #[tokio::test]
    async fn test_composite_named_method() {
        let handler = HandlerRef::parse("echo@show", '@').unwrap();
        let response = dispatcher().dispatch(&handler, invocation()).await.unwrap();
        let body: serde_json::Value = serde_json::from_str(&body_of(response).await).unwrap();
        assert_eq!(body["method"], "show");
    }

    #[tokio::test]
    async fn test_unknown_targets() {
        let missing = HandlerRef::parse("nobody@run", '@').unwrap();
        assert_eq!(
            dispatcher().dispatch(&missing, invocation()).await.unwrap_err(),
            DispatchError::UnknownController("nobody".into())
        );

        let no_method = HandlerRef::parse("echo@destroy", '@').unwrap();
        assert!(matches!(
            dispatcher().dispatch(&no_method, invocation()).await.unwrap_err(),
            DispatchError::UnknownMethod { .. }
        ));
    }
}
