//! HTTP server assembly for the lastseen board.
//!
//! Mounts the JSON API under `/api` and serves uploaded photos read-only under
//! `/uploads`, backed by any [`ReportStore`].

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use lastseen_api::{ApiState, UPLOADS_PREFIX, UploadSink};
use lastseen_core::store::ReportStore;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, layered from defaults, an optional TOML file
/// and the environment.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:        String,
  pub port:        u16,
  /// The JSON file holding the report array.
  pub data_file:   PathBuf,
  /// Root of the per-report photo directories.
  pub uploads_dir: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:        "0.0.0.0".to_string(),
      port:        3000,
      data_file:   PathBuf::from("data/missing-persons.json"),
      uploads_dir: PathBuf::from(UPLOADS_PREFIX),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: ReportStore + 'static,
{
  let state = ApiState {
    store,
    uploads: Arc::new(UploadSink::new(&config.uploads_dir)),
  };

  Router::new()
    .nest("/api", lastseen_api::api_router(state))
    .nest_service(
      &format!("/{UPLOADS_PREFIX}"),
      ServeDir::new(&config.uploads_dir),
    )
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
