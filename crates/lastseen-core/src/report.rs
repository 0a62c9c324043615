//! Report types: the single persisted entity of the board.
//!
//! A report is immutable once created except for its [`Status`], which may
//! move freely between the three values.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Status ──────────────────────────────────────────────────────────────────

/// The lifecycle tag attached to a report. There is no ordering between
/// values and no terminal state.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
  #[default]
  Missing,
  Critical,
  Found,
}

impl Status {
  /// Parse a wire value (`"missing"`, `"critical"`, `"found"`). Matching is
  /// exact; `"Found"` is rejected just like any other unknown value.
  pub fn parse(value: &str) -> Result<Self> {
    Status::from_str(value).map_err(|_| Error::UnknownStatus(value.to_owned()))
  }
}

// ─── NewReport ───────────────────────────────────────────────────────────────

/// The caller-editable attributes of a report, already validated.
///
/// Produced by [`crate::schema::ReportForm::validate`]; the server-assigned
/// fields are added by [`NewReport::into_report`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
  pub name:                 String,
  pub age:                  Option<u32>,
  pub gender:               Option<String>,
  pub height:               Option<f64>,
  pub weight:               Option<f64>,
  pub last_seen_date:       NaiveDate,
  pub last_seen_location:   String,
  pub description:          String,
  pub identifying_features: Option<String>,
  pub medical_conditions:   Option<String>,
  pub contact_person:       String,
  pub contact_phone:        String,
}

impl NewReport {
  /// Stamp the server-assigned fields: `status` starts as
  /// [`Status::Missing`] and `date_reported` is now.
  pub fn into_report(self, id: Uuid, photos: Vec<String>) -> Report {
    Report {
      id,
      name: self.name,
      age: self.age,
      gender: self.gender,
      height: self.height,
      weight: self.weight,
      last_seen_date: self.last_seen_date,
      last_seen_location: self.last_seen_location,
      description: self.description,
      identifying_features: self.identifying_features,
      medical_conditions: self.medical_conditions,
      contact_person: self.contact_person,
      contact_phone: self.contact_phone,
      photos,
      status: Status::default(),
      date_reported: Utc::now(),
    }
  }
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// A missing-person report as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
  pub id:                   Uuid,
  pub name:                 String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub age:                  Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub gender:               Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub height:               Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub weight:               Option<f64>,
  pub last_seen_date:       NaiveDate,
  pub last_seen_location:   String,
  pub description:          String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub identifying_features: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub medical_conditions:   Option<String>,
  pub contact_person:       String,
  pub contact_phone:        String,
  /// Paths relative to the server root, e.g. `uploads/<id>/<file>.jpg`.
  #[serde(default)]
  pub photos:               Vec<String>,
  #[serde(default)]
  pub status:               Status,
  /// Server-assigned; never changes after creation.
  pub date_reported:        DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_wire_values() {
    assert_eq!(Status::parse("missing").unwrap(), Status::Missing);
    assert_eq!(Status::parse("critical").unwrap(), Status::Critical);
    assert_eq!(Status::parse("found").unwrap(), Status::Found);
    assert!(matches!(Status::parse("Found"), Err(Error::UnknownStatus(_))));
    assert!(Status::parse("resolved").is_err());
    assert_eq!(Status::Critical.to_string(), "critical");
    assert_eq!(
      serde_json::to_value(Status::Found).unwrap(),
      serde_json::json!("found")
    );
  }

  #[test]
  fn report_serialises_camel_case_and_omits_absent_fields() {
    let report = NewReport {
      name:                 "Jane Doe".into(),
      age:                  None,
      gender:               None,
      height:               Some(170.5),
      weight:               None,
      last_seen_date:       NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
      last_seen_location:   "Central Station".into(),
      description:          "Wearing a red coat and carrying a bag.".into(),
      identifying_features: None,
      medical_conditions:   None,
      contact_person:       "John Doe".into(),
      contact_phone:        "+1 (555) 123-4567".into(),
    }
    .into_report(Uuid::new_v4(), Vec::new());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["lastSeenDate"], "2024-03-01");
    assert_eq!(json["status"], "missing");
    assert_eq!(json["height"], 170.5);
    assert!(json.get("age").is_none());
    assert!(json.get("medicalConditions").is_none());
    assert!(json["dateReported"].is_string());

    let back: Report = serde_json::from_value(json).unwrap();
    assert_eq!(back, report);
  }
}
