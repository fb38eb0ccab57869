//! Error responses.
//!
//! # Responsibilities
//! - Map "no route" to 404 with the unmatched path
//! - Map dispatch and internal routing errors to 500
//! - Hide error details unless debug mode is on

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// Body of a 500 response outside debug mode.
pub const INTERNAL_ERROR_BODY: &str = "The server encountered an internal error";

/// 404 for a path no route matched.
pub fn route_not_found(path: &str) -> Response {
    plain(StatusCode::NOT_FOUND, format!("The REST route: {} not found", path))
}

/// 405 for a method outside the supported verb set.
pub fn method_not_supported(method: &str) -> Response {
    plain(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("The request method {} is not supported", method),
    )
}

/// 500, with the error message only when `debug` is set.
pub fn internal_error(error: &dyn std::error::Error, debug: bool) -> Response {
    let body = if debug {
        error.to_string()
    } else {
        INTERNAL_ERROR_BODY.to_string()
    };
    plain(StatusCode::INTERNAL_SERVER_ERROR, body)
}

fn plain(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}
