//! Shared utilities for integration testing.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use restful_router::config::parse_config;
use restful_router::{HttpServer, RestApplication};

/// Build an application from TOML config text.
pub fn app_from(toml: &str) -> RestApplication {
    let config = parse_config(toml).expect("test config must be valid");
    RestApplication::new(config).expect("test routes must register")
}

/// Send one request through the router in-process.
pub async fn send(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Send a request and parse the JSON reply.
#[allow(dead_code)]
pub async fn send_json(app: &Router, method: Method, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body) = send(app, method, uri, "").await;
    let json = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[allow(dead_code)]
pub fn server(app: RestApplication) -> HttpServer {
    HttpServer::new(app)
}
