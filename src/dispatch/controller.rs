//! Controllers and the factory that creates them.

use std::collections::HashMap;
use std::sync::Arc;

use crate::dispatch::echo::EchoController;
use crate::dispatch::handler::{HandlerFuture, Invocation};

/// Target of a composite handler reference.
pub trait Controller: Send + Sync {
    /// Call `method`, or return `None` if the controller has no such method.
    fn invoke(&self, method: &str, invocation: Invocation) -> Option<HandlerFuture>;
}

/// Creates controllers from their identifiers.
pub trait ControllerFactory: Send + Sync {
    /// A fresh controller for `identifier`, or `None` if it is unknown.
    fn create(&self, identifier: &str) -> Option<Box<dyn Controller>>;
}

type Constructor = Arc<dyn Fn() -> Box<dyn Controller> + Send + Sync>;

/// Factory backed by registered constructors.
///
/// A new controller is constructed for every dispatched request.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    constructors: HashMap<String, Constructor>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `echo` controller.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register("echo", || EchoController);
        registry
    }

    /// Register a constructor under `identifier`, replacing any previous one.
    pub fn register<F, C>(&mut self, identifier: impl Into<String>, constructor: F)
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: Controller + 'static,
    {
        self.constructors.insert(
            identifier.into(),
            Arc::new(move || Box::new(constructor()) as Box<dyn Controller>),
        );
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.constructors.contains_key(identifier)
    }

    /// Registered identifiers, sorted.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl ControllerFactory for ControllerRegistry {
    fn create(&self, identifier: &str) -> Option<Box<dyn Controller>> {
        self.constructors.get(identifier).map(|constructor| constructor())
    }
}

impl std::fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("identifiers", &self.identifiers())
            .finish()
    }
}
