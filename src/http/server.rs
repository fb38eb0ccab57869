//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a catch-all handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Resolve each request through the route table and dispatch it
//! - Swap in rebuilt routes and dispatch settings when the config file changes
//! - Stop on the shutdown broadcast

use arc_swap::ArcSwap;
use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::app::{AppError, RestApplication};
use crate::config::AppConfig;
use crate::dispatch::{Dispatcher, HandlerRef, Invocation};
use crate::http::request::{request_id, MakeRequestUuidV4};
use crate::http::response::{internal_error, method_not_supported, route_not_found};
use crate::routing::{Resolution, Router as RouteRouter, Verb};

/// Largest request body handed to a handler.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Everything a request reads that a reload can replace.
///
/// Published as one unit so a request never pairs new routes with an old
/// dispatcher.
pub struct LiveState {
    pub routes: Arc<RouteRouter<HandlerRef>>,
    pub dispatcher: Dispatcher,
    pub debug: bool,
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub live: Arc<ArcSwap<LiveState>>,
}

/// Rebuilds routes and dispatch settings from a new config and publishes them.
#[derive(Clone)]
pub struct RouteReloader {
    app: Arc<RestApplication>,
    live: Arc<ArcSwap<LiveState>>,
}

impl RouteReloader {
    /// Publish routes, dispatcher and debug flag built from `config`.
    /// On error the current state stays.
    ///
    /// Listener and logging settings are fixed at startup; changes to them
    /// are reported and ignored.
    pub fn apply(&self, config: &AppConfig) -> Result<(), AppError> {
        let routes = self.app.rebuild(config)?;
        self.live.store(Arc::new(LiveState {
            routes: Arc::new(routes),
            dispatcher: self.app.dispatcher_for(config),
            debug: config.debug,
        }));

        let startup = self.app.config();
        if config.server != startup.server {
            tracing::warn!(
                bind_address = %config.server.bind_address,
                request_timeout_secs = config.server.request_timeout_secs,
                "Server settings changed, restart to apply them"
            );
        }
        if config.observability != startup.observability {
            tracing::warn!(
                log_filter = %config.observability.log_filter,
                "Log filter changed, restart to apply it"
            );
        }

        tracing::info!(
            routes = config.routes.len(),
            debug = config.debug,
            default_method = %config.dispatch.default_method,
            separator = %config.dispatch.separator,
            "Routes reloaded"
        );
        Ok(())
    }
}

/// HTTP server for a REST application.
pub struct HttpServer {
    router: Router,
    reloader: RouteReloader,
}

impl HttpServer {
    /// Create a new HTTP server for `app`.
    pub fn new(app: RestApplication) -> Self {
        let live = Arc::new(ArcSwap::from_pointee(LiveState {
            routes: app.router(),
            dispatcher: app.dispatcher(),
            debug: app.config().debug,
        }));
        let state = AppState {
            live: Arc::clone(&live),
        };

        let router = Self::build_router(app.config(), state);
        Self {
            router,
            reloader: RouteReloader {
                app: Arc::new(app),
                live,
            },
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(rest_handler))
            .route("/", any(rest_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The Axum router, for serving or in-process testing.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn reloader(&self) -> RouteReloader {
        self.reloader.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<AppConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let reloader = self.reloader.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if let Err(e) = reloader.apply(&config) {
                    tracing::error!(error = %e, "Rejected route reload, keeping current routes");
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolves the request path for its method and dispatches the handler.
async fn rest_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let live = state.live.load_full();
    let request_id = request_id(request.headers());
    let path = request.uri().path().to_string();
    let method = request.method().clone();

    let verb = match Verb::try_from(&method) {
        Ok(verb) => verb,
        Err(_) => {
            tracing::warn!(request_id = %request_id, method = %method, "Unsupported method");
            return method_not_supported(method.as_str());
        }
    };

    let resolution = live.routes.resolve(verb, &path);
    let route = match resolution {
        Ok(Resolution::Matched(route)) => route,
        Ok(Resolution::NoMatch) => {
            tracing::warn!(request_id = %request_id, verb = %verb, path = %path, "No route matched");
            return route_not_found(&path);
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, path = %path, error = %e, "Route resolution failed");
            return internal_error(&e, live.debug);
        }
    };

    tracing::debug!(
        request_id = %request_id,
        verb = %verb,
        path = %path,
        pattern = %route.pattern,
        registration_index = route.registration_index,
        handler = %route.handler,
        "Route matched"
    );

    let (parts, body) = request.into_parts();
    let body = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to read request body");
            return internal_error(&e, live.debug);
        }
    };

    let invocation = Invocation {
        verb,
        path,
        params: route.params,
        headers: parts.headers,
        body,
        request_id: request_id.clone(),
    };

    match live.dispatcher.dispatch(&route.handler, invocation).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Dispatch failed");
            internal_error(&e, live.debug)
        }
    }
}
