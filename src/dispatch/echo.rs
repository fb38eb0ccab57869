//! Built-in controller that reflects the resolved route back as JSON.

use axum::response::IntoResponse;
use axum::Json;
use futures_util::future::FutureExt;
use serde_json::json;

use crate::dispatch::controller::Controller;
use crate::dispatch::handler::{HandlerFuture, Invocation};

/// Replies with `{verb, path, method, params}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoController;

impl Controller for EchoController {
    fn invoke(&self, method: &str, invocation: Invocation) -> Option<HandlerFuture> {
        match method {
            "run" | "index" | "show" => {
                let body = json!({
                    "verb": invocation.verb,
                    "path": invocation.path,
                    "method": method,
                    "params": invocation.params,
                });
                Some(async move { Json(body).into_response() }.boxed())
            }
            _ => None,
        }
    }
}
