//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (verbs, patterns, handler strings)
//!     → AppConfig (validated, immutable)
//!     → routes registered into a fresh Router
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server rebuilds the Router
//!     → atomic swap of Arc<Router>
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::AppConfig;
pub use schema::DispatchConfig;
pub use schema::ObservabilityConfig;
pub use schema::RouteConfig;
pub use schema::ServerConfig;
pub use watcher::ConfigWatcher;
