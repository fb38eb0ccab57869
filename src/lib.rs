//! REST route compiler, resolver and dispatcher.

pub mod app;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use app::{AppError, RestApplication};
pub use config::AppConfig;
pub use dispatch::{HandlerRef, Invocation};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Params, Resolution, RouteMatch, Router, Verb};
