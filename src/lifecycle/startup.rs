//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Register routes and build the HTTP server
//! - Bind the listener
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when routes are ready)

use std::path::Path;

use tokio::net::TcpListener;

use crate::app::RestApplication;
use crate::config::{load_config, AppConfig};
use crate::http::HttpServer;

/// Load the config at `path`, or defaults when no path is given.
pub fn load_or_default(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => Ok(AppConfig::default()),
    }
}

/// Build the application and bind its listener.
pub async fn start(config: AppConfig) -> Result<(HttpServer, TcpListener), Box<dyn std::error::Error>> {
    let bind_address = config.server.bind_address.clone();
    let app = RestApplication::new(config)?;
    let server = HttpServer::new(app);

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    Ok((server, listener))
}
