//! JSON REST API for the lastseen board.
//!
//! Exposes an axum [`Router`] backed by any [`lastseen_core::store::ReportStore`]
//! plus an [`UploadSink`] for photos. Static serving of the uploaded files,
//! CORS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", lastseen_api::api_router(state))
//! ```

pub mod error;
pub mod reports;
pub mod submit;
pub mod uploads;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, patch},
};
use lastseen_core::{
  photo::{MAX_PHOTO_BYTES, MAX_PHOTOS},
  store::ReportStore,
};

pub use error::ApiError;
pub use uploads::{UPLOADS_PREFIX, UploadSink};

/// Room for one photo past the cap, so a sixth part is reported as "too many"
/// rather than cut off by the body limit.
const MAX_BODY_BYTES: usize = (MAX_PHOTOS + 1) * MAX_PHOTO_BYTES + 1024 * 1024;

/// Shared state threaded through all API handlers.
pub struct ApiState<S> {
  pub store:   Arc<S>,
  pub uploads: Arc<UploadSink>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:   Arc::clone(&self.store),
      uploads: Arc::clone(&self.uploads),
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: ReportStore + 'static,
{
  Router::new()
    .route("/all", get(reports::list::<S>))
    // `GET /add` looks up a report whose id is "add", which never exists.
    .route(
      "/add",
      get(reports::not_found).post(submit::create::<S>),
    )
    .route("/{id}", get(reports::get_one::<S>))
    .route("/{id}/status", patch(reports::update_status::<S>))
    .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
    .with_state(state)
}
