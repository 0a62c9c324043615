//! Error type for `lastseen-store-json`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("i/o error on {}: {source}", .path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The store file exists but does not hold a report array.
  #[error("store file {} is unreadable: {source}", .path.display())]
  Corrupt {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("report id {0} is already taken")]
  DuplicateId(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
