//! REST application facade.
//!
//! # Responsibilities
//! - Register routes from the config file, then from code
//! - Accept handlers as functions or `identifier@method` strings
//! - Rebuild a fresh Router from a new config for hot reload
//!
//! # Design Decisions
//! - Config routes are registered first, code routes after, and a rebuild
//!   replays them in the same order so registration indices stay stable
//! - A rebuild either succeeds completely or leaves the caller's router alone

use std::sync::Arc;

use thiserror::Error;

use crate::config::{AppConfig, RouteConfig};
use crate::dispatch::{Controller, ControllerRegistry, Dispatcher, HandlerError, HandlerRef};
use crate::routing::{Resolution, RouteError, RouteResult, Router, UnknownVerb, Verb};

/// Errors raised while building the application routes.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("route `{pattern}`: {source}")]
    Route {
        pattern: String,
        #[source]
        source: RouteError,
    },

    #[error("route `{pattern}`: {source}")]
    Handler {
        pattern: String,
        #[source]
        source: HandlerError,
    },

    #[error("route table: {0}")]
    Routes(#[source] RouteError),

    #[error("route `{pattern}`: {source}")]
    Verb {
        pattern: String,
        #[source]
        source: UnknownVerb,
    },
}

/// Anything usable as a route handler: a `HandlerRef` or a handler string.
pub trait IntoHandler {
    fn into_handler(self, separator: char) -> Result<HandlerRef, HandlerError>;
}

impl IntoHandler for HandlerRef {
    fn into_handler(self, _separator: char) -> Result<HandlerRef, HandlerError> {
        Ok(self)
    }
}

impl IntoHandler for &str {
    fn into_handler(self, separator: char) -> Result<HandlerRef, HandlerError> {
        HandlerRef::parse(self, separator)
    }
}

impl IntoHandler for String {
    fn into_handler(self, separator: char) -> Result<HandlerRef, HandlerError> {
        HandlerRef::parse(&self, separator)
    }
}

#[derive(Debug, Clone)]
struct Registration {
    verbs: Vec<Verb>,
    pattern: String,
    handler: HandlerRef,
}

/// A router plus the controllers and settings needed to serve it.
pub struct RestApplication {
    config: AppConfig,
    router: Arc<Router<HandlerRef>>,
    registrations: Vec<Registration>,
    registry: ControllerRegistry,
}

impl RestApplication {
    /// Create an application and register the routes declared in `config`.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let router = Router::new();
        router.add_routes(config_routes(&config)?).map_err(AppError::Routes)?;

        tracing::info!(routes = config.routes.len(), "Config routes registered");

        Ok(Self {
            config,
            router: Arc::new(router),
            registrations: Vec::new(),
            registry: ControllerRegistry::with_builtin(),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Make `identifier` available to composite handlers.
    pub fn register_controller<F, C>(&mut self, identifier: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: Controller + 'static,
    {
        self.registry.register(identifier, constructor);
        self
    }

    /// Register `pattern` under one verb or several.
    pub fn add_route<V, T>(&mut self, verbs: V, pattern: &str, handler: T) -> Result<&mut Self, AppError>
    where
        V: IntoIterator<Item = Verb>,
        T: IntoHandler,
    {
        let verbs: Vec<Verb> = verbs.into_iter().collect();
        let handler = handler
            .into_handler(self.config.dispatch.separator)
            .map_err(|source| AppError::Handler {
                pattern: pattern.to_string(),
                source,
            })?;

        self.router
            .add_route(verbs.iter().copied(), pattern, handler.clone())
            .map_err(|source| AppError::Route {
                pattern: pattern.to_string(),
                source,
            })?;

        self.registrations.push(Registration {
            verbs,
            pattern: pattern.to_string(),
            handler,
        });
        Ok(self)
    }

    pub fn get<T: IntoHandler>(&mut self, pattern: &str, handler: T) -> Result<&mut Self, AppError> {
        self.add_route(Verb::Get, pattern, handler)
    }

    pub fn post<T: IntoHandler>(&mut self, pattern: &str, handler: T) -> Result<&mut Self, AppError> {
        self.add_route(Verb::Post, pattern, handler)
    }

    pub fn put<T: IntoHandler>(&mut self, pattern: &str, handler: T) -> Result<&mut Self, AppError> {
        self.add_route(Verb::Put, pattern, handler)
    }

    pub fn delete<T: IntoHandler>(&mut self, pattern: &str, handler: T) -> Result<&mut Self, AppError> {
        self.add_route(Verb::Delete, pattern, handler)
    }

    pub fn patch<T: IntoHandler>(&mut self, pattern: &str, handler: T) -> Result<&mut Self, AppError> {
        self.add_route(Verb::Patch, pattern, handler)
    }

    pub fn head<T: IntoHandler>(&mut self, pattern: &str, handler: T) -> Result<&mut Self, AppError> {
        self.add_route(Verb::Head, pattern, handler)
    }

    pub fn options<T: IntoHandler>(&mut self, pattern: &str, handler: T) -> Result<&mut Self, AppError> {
        self.add_route(Verb::Options, pattern, handler)
    }

    /// The live router.
    pub fn router(&self) -> Arc<Router<HandlerRef>> {
        Arc::clone(&self.router)
    }

    pub fn resolve(&self, verb: Verb, path: &str) -> RouteResult<Resolution<HandlerRef>> {
        self.router.resolve(verb, path)
    }

    /// Dispatcher using this application's controllers.
    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher_for(&self.config)
    }

    /// Dispatcher using this application's controllers and the dispatch
    /// settings of `config`.
    pub fn dispatcher_for(&self, config: &AppConfig) -> Dispatcher {
        Dispatcher::new(
            Arc::new(self.registry.clone()),
            config.dispatch.default_method.clone(),
        )
    }

    /// Build a new router from `config` routes followed by the code routes.
    pub fn rebuild(&self, config: &AppConfig) -> Result<Router<HandlerRef>, AppError> {
        let mut routes = config_routes(config)?;
        routes.extend(self.registrations.iter().map(|registration| {
            (
                registration.verbs.clone(),
                registration.pattern.clone(),
                registration.handler.clone(),
            )
        }));

        let router = Router::new();
        router.add_routes(routes).map_err(AppError::Routes)?;
        Ok(router)
    }
}

impl std::fmt::Debug for RestApplication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestApplication")
            .field("router", &self.router)
            .field("registrations", &self.registrations.len())
            .field("registry", &self.registry)
            .finish()
    }
}

/// The routes declared in `config`, parsed and in file order.
fn config_routes(config: &AppConfig) -> Result<Vec<(Vec<Verb>, String, HandlerRef)>, AppError> {
    config
        .routes
        .iter()
        .map(|route| -> Result<_, AppError> {
            let (verbs, handler) = parse_route(route, config.dispatch.separator)?;
            Ok((verbs, route.pattern.clone(), handler))
        })
        .collect()
}

fn parse_route(route: &RouteConfig, separator: char) -> Result<(Vec<Verb>, HandlerRef), AppError> {
    let verbs = route
        .methods
        .iter()
        .map(|method| method.parse::<Verb>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| AppError::Verb {
            pattern: route.pattern.clone(),
            source,
        })?;
    let handler = HandlerRef::parse(&route.handler, separator).map_err(|source| AppError::Handler {
        pattern: route.pattern.clone(),
        source,
    })?;
    Ok((verbs, handler))
}
