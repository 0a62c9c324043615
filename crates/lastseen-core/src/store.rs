//! The `ReportStore` trait.
//!
//! Implemented by storage backends (e.g. `lastseen-store-json`). The API layer
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::report::{Report, Status};

/// Abstraction over a durable, uniquely-keyed report collection.
///
/// Reports are never deleted and only their status is ever rewritten.
pub trait ReportStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All reports in insertion order.
  fn list_reports(
    &self,
  ) -> impl Future<Output = Result<Vec<Report>, Self::Error>> + Send + '_;

  /// Retrieve a report by id. Returns `None` if not found.
  fn get_report(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Report>, Self::Error>> + Send + '_;

  /// Persist a fully-built report. Fails if the id is already taken.
  fn append_report(
    &self,
    report: Report,
  ) -> impl Future<Output = Result<Report, Self::Error>> + Send + '_;

  /// Set the status of a report and return it. Returns `None` if not found.
  /// Any status may follow any other, including itself.
  fn update_status(
    &self,
    id: Uuid,
    status: Status,
  ) -> impl Future<Output = Result<Option<Report>, Self::Error>> + Send + '_;
}
