//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (usually at startup):
//!     (verbs, pattern, handler)
//!     → pattern.rs (compile to fragment + placeholder slots)
//!     → table.rs (append per verb, registration order kept)
//!     → combiner.rs (one anchored alternation per verb)
//!     → router.rs (atomic swap of the verb's snapshot)
//!
//! Incoming Request (verb, path)
//!     → router.rs (load snapshot for verb)
//!     → resolver.rs (match once, find fired alternative, extract params)
//!     → Return: RouteMatch or NoMatch
//! ```
//!
//! # Design Decisions
//! - One expression per verb: a single pass over the path per request
//! - Group positions are tracked while building, not recovered from text
//! - Deterministic: same input always matches same route
//! - First registered route wins when several could match

pub mod combiner;
pub mod error;
pub mod params;
pub mod pattern;
pub mod resolver;
pub mod router;
pub mod table;
pub mod verb;

pub use combiner::CombinedExpression;
pub use error::{RouteError, RouteResult};
pub use params::Params;
pub use pattern::{compile, CompiledFragment};
pub use resolver::{Resolution, RouteMatch};
pub use router::Router;
pub use table::{RouteEntry, RouteTable};
pub use verb::{UnknownVerb, Verb};
