//! End-to-end routing through the HTTP layer.

use axum::http::{Method, StatusCode};
use serde_json::json;

use restful_router::dispatch::{Controller, HandlerFuture};
use restful_router::{HandlerRef, HttpServer, Invocation};

mod common;

const CONFIG: &str = r#"
[[routes]]
methods = ["GET"]
pattern = '/users/{id:\d+}'
handler = "echo@show"

[[routes]]
methods = ["GET"]
pattern = "/users/profile"
handler = "echo@index"

[[routes]]
methods = ["POST"]
pattern = '/order/{id:\d+}/item/{sku:}'
handler = "echo"
"#;

#[tokio::test]
async fn test_users_scenario() {
    let server = HttpServer::new(common::app_from(CONFIG));
    let app = server.app();

    let (status, body) = common::send_json(&app, Method::GET, "/users/42").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["method"], "show");
    assert_eq!(body["params"], json!({"id": "42"}));

    let (status, body) = common::send_json(&app, Method::GET, "/users/profile").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["method"], "index");
    assert_eq!(body["params"], json!({}));

    let (status, body) = common::send(&app, Method::GET, "/users/abc", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "The REST route: /users/abc not found");
}

#[tokio::test]
async fn test_post_with_two_params_uses_default_method() {
    let app = HttpServer::new(common::app_from(CONFIG)).app();

    let (status, body) = common::send_json(&app, Method::POST, "/order/99/item/ABC1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verb"], "POST");
    assert_eq!(body["method"], "run");
    let keys: Vec<&String> = body["params"].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["id", "sku"]);
    assert_eq!(body["params"]["sku"], "ABC1");

    // registered for POST only
    let (status, _) = common::send(&app, Method::GET, "/order/99/item/ABC1", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_function_handler_receives_params_and_body() {
    let mut rest = common::app_from("");
    rest.put(
        "/notes/{slug:[a-z-]+}",
        HandlerRef::from_fn(|inv: Invocation| async move {
            format!(
                "{} <- {}",
                inv.params.get("slug").unwrap_or_default(),
                String::from_utf8_lossy(&inv.body)
            )
        }),
    )
    .unwrap();
    let app = HttpServer::new(rest).app();

    let (status, body) = common::send(&app, Method::PUT, "/notes/first-note", "hello").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "first-note <- hello");
}

struct Greeter;

impl Controller for Greeter {
    fn invoke(&self, method: &str, invocation: Invocation) -> Option<HandlerFuture> {
        use axum::response::IntoResponse;
        use futures_util::FutureExt;

        let name = invocation.params.get("name").unwrap_or("world").to_string();
        match method {
            "run" => Some(async move { format!("hello {}", name).into_response() }.boxed()),
            "shout" => Some(async move { format!("HELLO {}", name.to_uppercase()).into_response() }.boxed()),
            _ => None,
        }
    }
}

#[tokio::test]
async fn test_registered_controller_and_dispatch_errors() {
    let mut rest = common::app_from("");
    rest.register_controller("greeter", || Greeter);
    rest.get("/hello/{name:}", "greeter").unwrap();
    rest.get("/shout/{name:}", "greeter@shout").unwrap();
    rest.get("/missing", "nobody@run").unwrap();
    rest.get("/typo", "greeter@wave").unwrap();
    let app = HttpServer::new(rest).app();

    assert_eq!(
        common::send(&app, Method::GET, "/hello/ann", "").await,
        (StatusCode::OK, "hello ann".to_string())
    );
    assert_eq!(
        common::send(&app, Method::GET, "/shout/bob", "").await,
        (StatusCode::OK, "HELLO BOB".to_string())
    );

    let (status, body) = common::send(&app, Method::GET, "/missing", "").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "The server encountered an internal error");

    let (status, _) = common::send(&app, Method::GET, "/typo", "").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_debug_mode_exposes_error_detail() {
    let mut rest = common::app_from("debug = true");
    rest.get("/missing", "nobody").unwrap();
    let app = HttpServer::new(rest).app();

    let (status, body) = common::send(&app, Method::GET, "/missing", "").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "unknown controller `nobody`");
}

#[tokio::test]
async fn test_unsupported_method() {
    let app = HttpServer::new(common::app_from(CONFIG)).app();
    let (status, _) = common::send(&app, Method::TRACE, "/users/1", "").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let app = HttpServer::new(common::app_from(CONFIG)).app();

    let response = app
        .clone()
        .oneshot(Request::get("/users/1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let generated = response.headers().get("x-request-id").unwrap();
    assert_eq!(generated.len(), 36);

    let response = app
        .oneshot(
            Request::get("/users/1")
                .header("x-request-id", "client-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "client-id");
}
