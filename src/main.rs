//! restful-router
//!
//! Serves REST routes declared in a TOML file.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ routing ──────────▶ dispatch ──▶ controller
//!                     (axum)          (verb + path →      (fn or
//!                                      handler, params)    id@method)
//!
//!     config file ──▶ watcher ──▶ rebuild routes ──▶ atomic swap
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use restful_router::config::ConfigWatcher;
use restful_router::lifecycle::{signals, startup, Shutdown};
use restful_router::observability::init_logging;
use restful_router::{RestApplication, Verb};

#[derive(Parser)]
#[command(name = "restful-router")]
#[command(about = "Regex REST router with config-declared routes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the configured routes
    Serve {
        /// Path to the TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Do not reload routes when the config file changes
        #[arg(long)]
        no_watch: bool,
    },
    /// Validate a config file and print the combined expression per verb
    Check {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve { config: None, no_watch: true }) {
        Commands::Serve { config, no_watch } => serve(config, !no_watch).await,
        Commands::Check { config } => check(config),
    }
}

async fn serve(path: Option<PathBuf>, watch: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = startup::load_or_default(path.as_deref())?;
    init_logging(&config.observability.log_filter);

    tracing::info!("restful-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.server.request_timeout_secs,
        "Configuration loaded"
    );

    let (server, listener) = startup::start(config).await?;

    // keep the watcher alive for the lifetime of the server
    let (config_updates, _watcher) = match path.filter(|_| watch) {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(&path);
            (updates, Some(watcher.run()?))
        }
        None => (mpsc::unbounded_channel().1, None),
    };

    let shutdown = Shutdown::new();
    tokio::spawn(signals::wait_for_termination(shutdown.clone()));

    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn check(path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = startup::load_or_default(Some(&path))?;
    let app = RestApplication::new(config)?;
    let router = app.router();

    for verb in Verb::ALL {
        let Some(combined) = router.snapshot(verb) else {
            continue;
        };
        println!("{} {}", verb, combined.as_str());
        for (position, alternative) in combined.alternatives().iter().enumerate() {
            let names: Vec<&str> = alternative.fragment.names().map(|n| n.unwrap_or("_")).collect();
            println!(
                "  #{} group {} {} -> {} [{}]",
                position,
                alternative.outer_group,
                alternative.pattern,
                alternative.handler,
                names.join(", ")
            );
        }
    }
    Ok(())
}
