//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (verb, path, request_id)
//!
//! Consumers:
//!     → logging.rs (fmt subscriber on stdout)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through all log lines of a request
//! - Route registration and rebuilds log at debug, misses at warn

pub mod logging;

pub use logging::init_logging;
