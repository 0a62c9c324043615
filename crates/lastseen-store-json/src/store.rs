//! [`JsonFileStore`] — the JSON-file implementation of [`ReportStore`].

use std::{
  collections::HashSet,
  io::ErrorKind,
  path::{Path, PathBuf},
  sync::Arc,
};

use lastseen_core::{
  report::{Report, Status},
  store::ReportStore,
};
use tokio::{fs, io::AsyncWriteExt as _, sync::RwLock};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A report store backed by a single JSON file.
///
/// Cloning is cheap — clones share the same in-memory collection and lock.
#[derive(Clone)]
pub struct JsonFileStore {
  inner: Arc<Inner>,
}

struct Inner {
  path:    PathBuf,
  reports: RwLock<Vec<Report>>,
}

impl JsonFileStore {
  /// Open the store at `path`.
  ///
  /// A missing (or empty) file is a new, empty store. A file that exists but
  /// cannot be read or parsed is an error: it is never silently replaced.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();

    let reports = match fs::read(&path).await {
      Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
      Ok(bytes) => serde_json::from_slice::<Vec<Report>>(&bytes).map_err(
        |source| Error::Corrupt {
          path: path.clone(),
          source,
        },
      )?,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        tracing::info!(path = %path.display(), "no store file yet, starting empty");
        Vec::new()
      }
      Err(source) => return Err(Error::Io { path, source }),
    };

    let mut seen = HashSet::with_capacity(reports.len());
    if let Some(dup) = reports.iter().find(|r| !seen.insert(r.id)) {
      return Err(Error::DuplicateId(dup.id));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent).await.map_err(|source| Error::Io {
        path: parent.to_path_buf(),
        source,
      })?;
    }

    tracing::info!(
      path = %path.display(),
      reports = reports.len(),
      "opened report store"
    );

    Ok(Self {
      inner: Arc::new(Inner {
        path,
        reports: RwLock::new(reports),
      }),
    })
  }

  /// Path of the backing file.
  pub fn path(&self) -> &Path { &self.inner.path }

  /// Write the whole collection to a sibling temp file, then rename it over
  /// the store file. Callers must hold the write lock.
  async fn persist(&self, reports: &[Report]) -> Result<()> {
    let path = &self.inner.path;
    let tmp = tmp_path(path);
    let bytes = serde_json::to_vec_pretty(reports)?;

    let io_err = |source| Error::Io {
      path: tmp.clone(),
      source,
    };
    let mut file = fs::File::create(&tmp).await.map_err(io_err)?;
    file.write_all(&bytes).await.map_err(io_err)?;
    file.sync_all().await.map_err(io_err)?;
    drop(file);

    fs::rename(&tmp, path).await.map_err(|source| Error::Io {
      path: path.clone(),
      source,
    })?;

    tracing::debug!(
      path = %path.display(),
      reports = reports.len(),
      bytes = bytes.len(),
      "persisted report store"
    );
    Ok(())
  }
}

fn tmp_path(path: &Path) -> PathBuf {
  let mut name = path
    .file_name()
    .map(|n| n.to_os_string())
    .unwrap_or_else(|| "store.json".into());
  name.push(".tmp");
  path.with_file_name(name)
}

// ─── ReportStore impl ────────────────────────────────────────────────────────

impl ReportStore for JsonFileStore {
  type Error = Error;

  async fn list_reports(&self) -> Result<Vec<Report>> {
    Ok(self.inner.reports.read().await.clone())
  }

  async fn get_report(&self, id: Uuid) -> Result<Option<Report>> {
    let reports = self.inner.reports.read().await;
    Ok(reports.iter().find(|r| r.id == id).cloned())
  }

  async fn append_report(&self, report: Report) -> Result<Report> {
    let mut reports = self.inner.reports.write().await;
    if reports.iter().any(|r| r.id == report.id) {
      return Err(Error::DuplicateId(report.id));
    }

    reports.push(report.clone());
    if let Err(e) = self.persist(&reports).await {
      reports.pop();
      return Err(e);
    }

    tracing::info!(id = %report.id, "appended report");
    Ok(report)
  }

  async fn update_status(
    &self,
    id: Uuid,
    status: Status,
  ) -> Result<Option<Report>> {
    let mut reports = self.inner.reports.write().await;
    let Some(index) = reports.iter().position(|r| r.id == id) else {
      return Ok(None);
    };

    let previous = std::mem::replace(&mut reports[index].status, status);
    if let Err(e) = self.persist(&reports).await {
      reports[index].status = previous;
      return Err(e);
    }

    tracing::info!(%id, from = %previous, to = %status, "updated report status");
    Ok(Some(reports[index].clone()))
  }
}
