//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! RouteMatch { handler: HandlerRef, params }
//!     → dispatcher.rs
//!         Invocable(fn)             → call fn(invocation)
//!         Composite(id, method?)    → factory.create(id) → controller.invoke(method or default)
//!     → Response
//! ```
//!
//! # Design Decisions
//! - Handler strings `identifier@method` are parsed once, at registration
//! - Controllers come from a factory, one instance per request
//! - Unknown controllers and methods are dispatch errors, not "no match"

pub mod controller;
pub mod dispatcher;
pub mod echo;
pub mod handler;

pub use controller::{Controller, ControllerFactory, ControllerRegistry};
pub use dispatcher::{DispatchError, Dispatcher, DEFAULT_METHOD};
pub use echo::EchoController;
pub use handler::{HandlerError, HandlerFn, HandlerFuture, HandlerRef, Invocation, DEFAULT_SEPARATOR};
