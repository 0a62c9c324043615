//! Client-side photo staging.
//!
//! Candidate files are checked against the shared photo policy before they
//! are buffered. Every conforming file is staged; each refused file is
//! reported with its reason and the rest of the batch is unaffected.

use std::{
  fmt,
  path::{Path, PathBuf},
};

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use lastseen_core::photo::{MAX_PHOTOS, PhotoRejection, check_photo};

/// A photo buffered for submission.
#[derive(Debug, Clone)]
pub struct StagedPhoto {
  pub file_name:    String,
  pub content_type: String,
  pub bytes:        Vec<u8>,
}

impl StagedPhoto {
  /// `data:<type>;base64,...` preview of the file, encoded on demand.
  pub fn preview(&self) -> String { data_url(&self.content_type, &self.bytes) }
}

/// Why a candidate file was not staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
  Policy(PhotoRejection),
  Unreadable(String),
}

impl fmt::Display for RejectReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RejectReason::Policy(rejection) => write!(f, "{rejection}"),
      RejectReason::Unreadable(msg) => write!(f, "cannot read file: {msg}"),
    }
  }
}

/// A refused candidate.
#[derive(Debug, Clone)]
pub struct Rejected {
  pub path:   PathBuf,
  pub reason: RejectReason,
}

/// The ordered set of staged photos (at most [`MAX_PHOTOS`]).
#[derive(Debug, Clone, Default)]
pub struct PhotoStaging {
  photos: Vec<StagedPhoto>,
}

impl PhotoStaging {
  pub fn photos(&self) -> &[StagedPhoto] { &self.photos }

  pub fn len(&self) -> usize { self.photos.len() }

  pub fn is_empty(&self) -> bool { self.photos.is_empty() }

  pub fn remaining_slots(&self) -> usize { MAX_PHOTOS - self.photos.len() }

  /// Stage every conforming file in `paths`, in order, and return the ones
  /// that were refused.
  pub async fn add_files(&mut self, paths: &[PathBuf]) -> Vec<Rejected> {
    let mut rejected = Vec::new();
    for path in paths {
      if let Err(reason) = self.add_file(path).await {
        tracing::debug!(path = %path.display(), %reason, "photo refused");
        rejected.push(Rejected {
          path: path.clone(),
          reason,
        });
      }
    }
    rejected
  }

  async fn add_file(&mut self, path: &Path) -> Result<(), RejectReason> {
    let unreadable = |e: std::io::Error| RejectReason::Unreadable(e.to_string());

    // Size comes from metadata so oversized files are never read.
    let size = tokio::fs::metadata(path).await.map_err(unreadable)?.len();
    let content_type = content_type_for(path);
    check_photo(
      content_type,
      usize::try_from(size).unwrap_or(usize::MAX),
      self.photos.len(),
    )
    .map_err(RejectReason::Policy)?;

    let bytes = tokio::fs::read(path).await.map_err(unreadable)?;
    let file_name = path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| "photo".to_owned());
    let content_type = content_type.unwrap_or_default().to_owned();
    self.push(file_name, content_type, bytes)
  }

  /// Stage an in-memory photo, applying the same policy as files.
  pub fn push(
    &mut self,
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
  ) -> Result<(), RejectReason> {
    check_photo(Some(&content_type), bytes.len(), self.photos.len())
      .map_err(RejectReason::Policy)?;
    self.photos.push(StagedPhoto {
      file_name,
      content_type,
      bytes,
    });
    Ok(())
  }

  /// Remove the photo at `index`; out-of-range indexes are ignored.
  pub fn remove(&mut self, index: usize) -> Option<StagedPhoto> {
    (index < self.photos.len()).then(|| self.photos.remove(index))
  }

  pub fn clear(&mut self) { self.photos.clear(); }
}

/// `data:<content type>;base64,<payload>`
pub fn data_url(content_type: &str, bytes: &[u8]) -> String {
  format!("data:{content_type};base64,{}", B64.encode(bytes))
}

/// Media type guessed from the file extension; `None` when unknown.
pub fn content_type_for(path: &Path) -> Option<&'static str> {
  let ext = path.extension()?.to_str()?.to_ascii_lowercase();
  Some(match ext.as_str() {
    "jpg" | "jpeg" => "image/jpeg",
    "png" => "image/png",
    "gif" => "image/gif",
    "webp" => "image/webp",
    "bmp" => "image/bmp",
    "heic" => "image/heic",
    "avif" => "image/avif",
    "tif" | "tiff" => "image/tiff",
    "svg" => "image/svg+xml",
    "pdf" => "application/pdf",
    "txt" => "text/plain",
    _ => return None,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  use lastseen_core::photo::MAX_PHOTO_BYTES;

  fn write(dir: &Path, name: &str, len: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, vec![7u8; len]).unwrap();
    path
  }

  #[test]
  fn data_url_encodes_payload() {
    assert_eq!(data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
  }

  #[test]
  fn content_types_from_extension() {
    assert_eq!(content_type_for(Path::new("a.JPG")), Some("image/jpeg"));
    assert_eq!(content_type_for(Path::new("a.txt")), Some("text/plain"));
    assert_eq!(content_type_for(Path::new("a")), None);
  }

  #[tokio::test]
  async fn conforming_files_are_kept_and_rejections_reported() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
      write(dir.path(), "a.jpg", 10),
      write(dir.path(), "notes.txt", 10),
      write(dir.path(), "big.png", MAX_PHOTO_BYTES + 1),
      write(dir.path(), "b.png", 10),
      dir.path().join("missing.png"),
    ];

    let mut staging = PhotoStaging::default();
    let rejected = staging.add_files(&paths).await;

    let names: Vec<&str> =
      staging.photos().iter().map(|p| p.file_name.as_str()).collect();
    assert_eq!(names, ["a.jpg", "b.png"]);
    assert!(staging.photos()[0].preview().starts_with("data:image/jpeg;base64,"));

    let reasons: Vec<&RejectReason> = rejected.iter().map(|r| &r.reason).collect();
    assert_eq!(reasons.len(), 3);
    assert_eq!(reasons[0], &RejectReason::Policy(PhotoRejection::NotAnImage));
    assert_eq!(reasons[1], &RejectReason::Policy(PhotoRejection::TooLarge));
    assert!(matches!(reasons[2], RejectReason::Unreadable(_)));
  }

  #[tokio::test]
  async fn cumulative_cap_is_enforced_across_batches() {
    let dir = tempfile::tempdir().unwrap();
    let first: Vec<PathBuf> = (0..3)
      .map(|i| write(dir.path(), &format!("first{i}.png"), 4))
      .collect();
    let second: Vec<PathBuf> = (0..3)
      .map(|i| write(dir.path(), &format!("second{i}.png"), 4))
      .collect();

    let mut staging = PhotoStaging::default();
    assert!(staging.add_files(&first).await.is_empty());
    let rejected = staging.add_files(&second).await;

    assert_eq!(staging.len(), MAX_PHOTOS);
    assert_eq!(staging.remaining_slots(), 0);
    assert_eq!(rejected.len(), 1);
    assert_eq!(
      rejected[0].reason,
      RejectReason::Policy(PhotoRejection::TooMany)
    );
    assert!(rejected[0].path.ends_with("second2.png"));
  }

  #[test]
  fn remove_frees_a_slot() {
    let mut staging = PhotoStaging::default();
    for i in 0..MAX_PHOTOS {
      staging
        .push(format!("{i}.png"), "image/png".into(), vec![1, 2, 3])
        .unwrap();
    }
    assert!(staging.push("x.png".into(), "image/png".into(), vec![1]).is_err());

    let removed = staging.remove(1).unwrap();
    assert_eq!(removed.file_name, "1.png");
    assert!(staging.remove(99).is_none());
    assert!(staging.push("x.png".into(), "image/png".into(), vec![1]).is_ok());
    assert_eq!(staging.photos()[4].file_name, "x.png");
  }
}
