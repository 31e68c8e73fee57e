//! IR-Hub daemon — entry point.
//!
//! Owns the two IR serial device sessions (receiver, transmitter) and serves
//! the browser-facing HTTP API: port enumeration, connect/disconnect, replay,
//! and the live decoded-event stream (SSE).
//!
//! # Usage
//!
//! ```text
//! ir-hub [OPTIONS]
//!
//! Options:
//!   --http-port  <PORT>  HTTP listener port [default: 8765]
//!   --http-bind  <ADDR>  Bind address [default: 0.0.0.0]
//!   --config-dir <DIR>   Override the port-config directory
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable            | Default   | Description                   |
//! |---------------------|-----------|-------------------------------|
//! | `IRHUB_HTTP_PORT`   | `8765`    | HTTP listener port            |
//! | `IRHUB_HTTP_BIND`   | `0.0.0.0` | Bind address                  |
//! | `IRHUB_CONFIG_DIR`  | platform  | Port-config directory         |
//! | `RUST_LOG`          | `info`    | `tracing` log filter          |
//!
//! # Startup sequence
//!
//! ```text
//! main()
//!  └─ tracing init
//!  └─ SessionSupervisor::new()   -- both roles disconnected
//!  └─ supervisor.bootstrap()     -- auto-reconnect from persisted config
//!  └─ axum serve                 -- until Ctrl-C
//!  └─ supervisor.shutdown()
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ir_hub::application::SessionSupervisor;
use ir_hub::domain::HubConfig;
use ir_hub::infrastructure::http::{api_routes, AppState};
use ir_hub::infrastructure::storage::{PortConfigStore, TomlPortConfigStore};

/// IR-Hub: bridge an infrared receiver/transmitter to web clients.
#[derive(Debug, Parser)]
#[command(name = "ir-hub", about = "IR serial device session manager with a web event stream", version)]
struct Cli {
    /// TCP port for the HTTP server to listen on.
    #[arg(long, default_value_t = 8765, env = "IRHUB_HTTP_PORT")]
    http_port: u16,

    /// IP address to bind the HTTP server to.
    ///
    /// Use `0.0.0.0` to accept connections from any interface, or
    /// `127.0.0.1` for local-only access.
    #[arg(long, default_value = "0.0.0.0", env = "IRHUB_HTTP_BIND")]
    http_bind: String,

    /// Directory for the persisted port config (defaults to the platform
    /// config directory).
    #[arg(long, env = "IRHUB_CONFIG_DIR")]
    config_dir: Option<PathBuf>,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`HubConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--http-bind` is not a valid IP address.
    fn into_config(self) -> anyhow::Result<(HubConfig, Option<PathBuf>)> {
        let bind_ip: IpAddr = self
            .http_bind
            .parse()
            .with_context(|| format!("invalid --http-bind address: {}", self.http_bind))?;
        let config = HubConfig {
            http_bind_addr: SocketAddr::new(bind_ip, self.http_port),
            ..HubConfig::default()
        };
        Ok((config, self.config_dir))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging. Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (config, config_dir) = Cli::parse().into_config()?;
    info!("IR-Hub starting");

    let store: Box<dyn PortConfigStore> = match config_dir {
        Some(dir) => Box::new(TomlPortConfigStore::new(dir)),
        None => Box::new(
            TomlPortConfigStore::from_platform_dir()
                .context("could not determine config directory; pass --config-dir")?,
        ),
    };

    let supervisor = SessionSupervisor::new(&config, store);

    // Reconnect whatever was connected last run. Per-role failures are
    // logged inside and never abort startup.
    supervisor.bootstrap().await;

    let app = api_routes().with_state(AppState::new(Arc::clone(&supervisor)));

    let listener = tokio::net::TcpListener::bind(config.http_bind_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {}", config.http_bind_addr))?;
    info!("HTTP API listening on {}", config.http_bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_err() {
                warn!("could not install Ctrl-C handler; running until killed");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await
        .context("HTTP server error")?;

    supervisor.shutdown().await;
    info!("IR-Hub stopped");
    Ok(())
}
