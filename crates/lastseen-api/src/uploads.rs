//! The upload sink: writes accepted photos under a per-report directory and
//! hands back the relative paths stored on the report.

use std::{
  io,
  path::{Path, PathBuf},
};

use bytes::Bytes;
use chrono::Utc;
use rand_core::{OsRng, RngCore as _};
use tokio::fs;
use uuid::Uuid;

/// Public URL prefix (and first path segment of every stored photo path).
pub const UPLOADS_PREFIX: &str = "uploads";

/// A photo that passed the upload policy and is held in memory until the
/// whole request has been validated.
#[derive(Debug, Clone)]
pub struct StagedPhoto {
  /// Client-supplied file name; only its extension is kept.
  pub file_name:    Option<String>,
  pub content_type: String,
  pub bytes:        Bytes,
}

/// Disk-backed photo storage rooted at `root`.
#[derive(Debug, Clone)]
pub struct UploadSink {
  root: PathBuf,
}

impl UploadSink {
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

  fn report_dir(&self, report_id: Uuid) -> PathBuf {
    self.root.join(report_id.to_string())
  }

  /// Write `photos` to `<root>/<report_id>/` and return
  /// `uploads/<report_id>/<file>` for each, in order.
  ///
  /// Nothing is created when `photos` is empty. If any write fails, the
  /// report directory is removed again before the error is returned.
  pub async fn persist(
    &self,
    report_id: Uuid,
    photos: &[StagedPhoto],
  ) -> io::Result<Vec<String>> {
    if photos.is_empty() {
      return Ok(Vec::new());
    }

    let dir = self.report_dir(report_id);
    fs::create_dir_all(&dir).await?;

    let mut paths = Vec::with_capacity(photos.len());
    for photo in photos {
      let name = unique_file_name(photo.file_name.as_deref());
      if let Err(e) = fs::write(dir.join(&name), &photo.bytes).await {
        self.discard(report_id).await;
        return Err(e);
      }
      tracing::debug!(
        %report_id,
        file = %name,
        content_type = %photo.content_type,
        bytes = photo.bytes.len(),
        "stored photo"
      );
      paths.push(format!("{UPLOADS_PREFIX}/{report_id}/{name}"));
    }
    Ok(paths)
  }

  /// Remove every stored photo of `report_id`. Failures are logged, not
  /// returned: this only runs on an already-failing path.
  pub async fn discard(&self, report_id: Uuid) {
    let dir = self.report_dir(report_id);
    match fs::remove_dir_all(&dir).await {
      Ok(()) => tracing::info!(%report_id, "discarded uploaded photos"),
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(e) => tracing::warn!(
        %report_id,
        error = %e,
        "failed to discard uploaded photos"
      ),
    }
  }
}

/// `<unix millis>-<12 hex chars><.ext>`, keeping the original extension.
fn unique_file_name(original: Option<&str>) -> String {
  let mut random = [0u8; 6];
  OsRng.fill_bytes(&mut random);
  format!(
    "{}-{}{}",
    Utc::now().timestamp_millis(),
    hex::encode(random),
    extension(original)
  )
}

/// The original extension with its dot, or nothing when it is missing or
/// contains anything other than ASCII alphanumerics.
fn extension(original: Option<&str>) -> String {
  original
    .map(Path::new)
    .and_then(Path::extension)
    .and_then(|ext| ext.to_str())
    .filter(|ext| {
      !ext.is_empty()
        && ext.len() <= 10
        && ext.chars().all(|c| c.is_ascii_alphanumeric())
    })
    .map(|ext| format!(".{ext}"))
    .unwrap_or_default()
}
