//! Handler for `POST /add` — multipart report submission.
//!
//! Text parts are collected into a [`ReportForm`]; parts named `photos` go
//! through the shared photo policy. Everything is validated before anything
//! touches the disk, so a rejected request leaves no files behind.

use axum::{
  Json,
  extract::{
    Multipart, State,
    multipart::{Field, MultipartRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use bytes::BytesMut;
use lastseen_core::{
  photo::{MAX_PHOTO_BYTES, PhotoRejection, check_photo},
  schema::ReportForm,
  store::ReportStore,
};
use uuid::Uuid;

use crate::{ApiState, error::ApiError, uploads::StagedPhoto};

/// Multipart field name carrying photo files.
pub const PHOTO_FIELD: &str = "photos";

/// `POST /add` — returns 201 + the stored [`Report`](lastseen_core::Report).
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ReportStore,
{
  let mut multipart = multipart
    .map_err(|e| ApiError::BadRequest(format!("Upload error: {}", e.body_text())))?;

  let mut form = ReportForm::default();
  let mut photos: Vec<StagedPhoto> = Vec::new();

  while let Some(field) = multipart.next_field().await? {
    let name = field.name().unwrap_or_default().to_owned();
    if name == PHOTO_FIELD {
      if let Some(photo) = read_photo(field, photos.len()).await? {
        photos.push(photo);
      }
    } else {
      let value = field.text().await?;
      if !form.set(&name, value) {
        tracing::debug!(field = %name, "ignoring unknown form field");
      }
    }
  }

  let new_report = form.validate()?;

  let id = Uuid::new_v4();
  let paths = state
    .uploads
    .persist(id, &photos)
    .await
    .map_err(ApiError::internal)?;

  let report = new_report.into_report(id, paths);
  match state.store.append_report(report).await {
    Ok(report) => {
      tracing::info!(%id, photos = report.photos.len(), "report submitted");
      Ok((StatusCode::CREATED, Json(report)))
    }
    Err(e) => {
      state.uploads.discard(id).await;
      Err(ApiError::internal(e))
    }
  }
}

/// Read one `photos` part, enforcing count, type and size as it streams.
///
/// An empty part with an empty file name (a file input left blank) is
/// skipped.
async fn read_photo(
  mut field: Field<'_>,
  already_accepted: usize,
) -> Result<Option<StagedPhoto>, ApiError> {
  let file_name = field.file_name().map(str::to_owned);
  let content_type = field.content_type().map(str::to_owned);

  let mut buf = BytesMut::new();
  if file_name.as_deref() == Some("") {
    while let Some(chunk) = field.chunk().await? {
      buf.extend_from_slice(&chunk);
    }
    if buf.is_empty() {
      return Ok(None);
    }
  }

  check_photo(content_type.as_deref(), buf.len(), already_accepted)?;

  while let Some(chunk) = field.chunk().await? {
    if buf.len() + chunk.len() > MAX_PHOTO_BYTES {
      return Err(PhotoRejection::TooLarge.into());
    }
    buf.extend_from_slice(&chunk);
  }

  Ok(Some(StagedPhoto {
    file_name,
    content_type: content_type.unwrap_or_default(),
    bytes: buf.freeze(),
  }))
}
