//! Handlers for reading reports and changing their status.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/all` | Whole collection, insertion order |
//! | `GET`   | `/{id}` | 404 if not found |
//! | `PATCH` | `/{id}/status` | Body: `{"status":"missing\|critical\|found"}` |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
};
use lastseen_core::{
  report::{Report, Status},
  store::ReportStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// Ids that are not UUIDs cannot name a report, so they are simply not found.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|_| ApiError::report_not_found())
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /all`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Report>>, ApiError>
where
  S: ReportStore,
{
  let reports = state
    .store
    .list_reports()
    .await
    .map_err(ApiError::internal)?;
  Ok(Json(reports))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Report>, ApiError>
where
  S: ReportStore,
{
  let id = parse_id(&id)?;
  let report = state
    .store
    .get_report(id)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(ApiError::report_not_found)?;
  Ok(Json(report))
}

/// `GET` on a fixed path that can never name a report.
pub async fn not_found() -> ApiError { ApiError::report_not_found() }

// ─── Status ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PATCH /{id}/status`. The value is kept loose so that
/// a wrong type is reported the same way as an unknown status.
#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: Option<serde_json::Value>,
}

/// `PATCH /{id}/status` — the status is validated before the lookup, so an
/// invalid value is a 400 even for an unknown id.
pub async fn update_status<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  body: Result<Json<StatusBody>, JsonRejection>,
) -> Result<Json<Report>, ApiError>
where
  S: ReportStore,
{
  let invalid = || ApiError::BadRequest("Invalid status value".into());
  let Json(body) = body.map_err(|_| invalid())?;
  let status = body
    .status
    .as_ref()
    .and_then(serde_json::Value::as_str)
    .ok_or_else(invalid)
    .and_then(|s| Status::parse(s).map_err(|_| invalid()))?;

  let id = parse_id(&id)?;
  let report = state
    .store
    .update_status(id, status)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(ApiError::report_not_found)?;
  Ok(Json(report))
}
