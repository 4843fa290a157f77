//! Carrers · Barcelona Street Quiz Backend
//!
//! - Axum HTTP + WebSocket API
//! - Static SPA fallback (<static_dir>/index.html)
//!
//! Important env variables:
//!   PORT             : u16 (default 3000)
//!   GAME_CONFIG_PATH : path to TOML config (catalog, quiz plan, static dir)
//!   LOG_LEVEL        : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT       : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use carrers_backend::routes::build_router;
use carrers_backend::state::AppState;
use carrers_backend::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Catalog, plan and caches; the catalog is immutable from here on.
  let state = Arc::new(AppState::new());

  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "carrers_backend", %addr, streets = state.catalog.len(), "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(async {
      let _ = tokio::signal::ctrl_c().await;
      info!(target: "carrers_backend", "Shutdown signal received");
    })
    .await?;
  Ok(())
}
