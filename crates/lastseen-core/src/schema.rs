//! Field rules for a new report.
//!
//! [`ReportForm`] holds the raw text values exactly as a client submits them
//! (multipart text parts on the server, draft fields on the client).
//! [`ReportForm::validate`] is the one place the acceptance rules live.

use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::report::NewReport;

pub const MIN_DESCRIPTION_CHARS: usize = 20;
pub const PHONE_LENGTH: RangeInclusive<usize> = 8..=20;

/// Wire names of every text field, in form order.
pub const FIELD_NAMES: [&str; 12] = [
  "name",
  "age",
  "gender",
  "height",
  "weight",
  "lastSeenDate",
  "lastSeenLocation",
  "description",
  "identifyingFeatures",
  "medicalConditions",
  "contactPerson",
  "contactPhone",
];

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
  /// Wire name of the field, e.g. `"contactPhone"`.
  pub field:   &'static str,
  pub message: String,
}

/// Every rule a form violated, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", joined(.errors))]
pub struct ValidationErrors {
  errors: Vec<FieldError>,
}

impl ValidationErrors {
  fn push(&mut self, field: &'static str, message: impl Into<String>) {
    self.errors.push(FieldError { field, message: message.into() });
  }

  pub fn is_empty(&self) -> bool { self.errors.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = &FieldError> { self.errors.iter() }

  /// The message for `field`, if that field was rejected.
  pub fn message_for(&self, field: &str) -> Option<&str> {
    self
      .errors
      .iter()
      .find(|e| e.field == field)
      .map(|e| e.message.as_str())
  }
}

fn joined(errors: &[FieldError]) -> String {
  errors
    .iter()
    .map(|e| e.message.as_str())
    .collect::<Vec<_>>()
    .join("; ")
}

// ─── Form ────────────────────────────────────────────────────────────────────

/// Raw, unvalidated report fields. Empty strings mean "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportForm {
  pub name:                 String,
  pub age:                  String,
  pub gender:               String,
  pub height:               String,
  pub weight:               String,
  pub last_seen_date:       String,
  pub last_seen_location:   String,
  pub description:          String,
  pub identifying_features: String,
  pub medical_conditions:   String,
  pub contact_person:       String,
  pub contact_phone:        String,
}

impl ReportForm {
  fn slot_mut(&mut self, field: &str) -> Option<&mut String> {
    Some(match field {
      "name" => &mut self.name,
      "age" => &mut self.age,
      "gender" => &mut self.gender,
      "height" => &mut self.height,
      "weight" => &mut self.weight,
      "lastSeenDate" => &mut self.last_seen_date,
      "lastSeenLocation" => &mut self.last_seen_location,
      "description" => &mut self.description,
      "identifyingFeatures" => &mut self.identifying_features,
      "medicalConditions" => &mut self.medical_conditions,
      "contactPerson" => &mut self.contact_person,
      "contactPhone" => &mut self.contact_phone,
      _ => return None,
    })
  }

  /// Set a field by wire name. Returns `false` for unknown names, which the
  /// caller is free to ignore.
  pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
    match self.slot_mut(field) {
      Some(slot) => {
        *slot = value.into();
        true
      }
      None => false,
    }
  }

  /// All fields as `(wire name, value)` pairs, in form order.
  pub fn fields(&self) -> [(&'static str, &str); 12] {
    let values: [&str; 12] = [
      &self.name,
      &self.age,
      &self.gender,
      &self.height,
      &self.weight,
      &self.last_seen_date,
      &self.last_seen_location,
      &self.description,
      &self.identifying_features,
      &self.medical_conditions,
      &self.contact_person,
      &self.contact_phone,
    ];
    std::array::from_fn(|i| (FIELD_NAMES[i], values[i]))
  }

  /// Apply every rule and either build a [`NewReport`] or report all
  /// violations at once.
  ///
  /// Required text values are stored as submitted; blank optional values
  /// become `None`.
  pub fn validate(&self) -> Result<NewReport, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    require(&mut errors, "name", &self.name, "Name is required");

    let age = match self.age.trim() {
      "" => None,
      raw => match raw.parse::<i64>() {
        Ok(n) if n < 0 => {
          errors.push("age", "Age must be positive");
          None
        }
        Ok(n) => match u32::try_from(n) {
          Ok(n) => Some(n),
          Err(_) => {
            errors.push("age", "Age is out of range");
            None
          }
        },
        Err(_) => {
          errors.push("age", "Age must be a whole number");
          None
        }
      },
    };

    let height = measurement(&mut errors, "height", "Height", &self.height);
    let weight = measurement(&mut errors, "weight", "Weight", &self.weight);

    let last_seen_date = match self.last_seen_date.trim() {
      "" => {
        errors.push("lastSeenDate", "Last seen date is required");
        None
      }
      raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        // Only the zero-padded form is accepted, so the stored value is
        // exactly what was submitted.
        Ok(date) if date.format("%Y-%m-%d").to_string() == self.last_seen_date => {
          Some(date)
        }
        _ => {
          errors.push(
            "lastSeenDate",
            "Last seen date must be a date (YYYY-MM-DD)",
          );
          None
        }
      },
    };

    require(
      &mut errors,
      "lastSeenLocation",
      &self.last_seen_location,
      "Last seen location is required",
    );

    if require(
      &mut errors,
      "description",
      &self.description,
      "Description is required",
    ) && self.description.chars().count() < MIN_DESCRIPTION_CHARS
    {
      errors.push(
        "description",
        format!(
          "Please provide a detailed description (at least \
           {MIN_DESCRIPTION_CHARS} characters)"
        ),
      );
    }

    require(
      &mut errors,
      "contactPerson",
      &self.contact_person,
      "Contact person name is required",
    );

    if require(
      &mut errors,
      "contactPhone",
      &self.contact_phone,
      "Phone number is required",
    ) && !is_valid_phone(&self.contact_phone)
    {
      errors.push("contactPhone", "Please enter a valid phone number");
    }

    match last_seen_date {
      Some(last_seen_date) if errors.is_empty() => Ok(NewReport {
        name: self.name.clone(),
        age,
        gender: optional(&self.gender),
        height,
        weight,
        last_seen_date,
        last_seen_location: self.last_seen_location.clone(),
        description: self.description.clone(),
        identifying_features: optional(&self.identifying_features),
        medical_conditions: optional(&self.medical_conditions),
        contact_person: self.contact_person.clone(),
        contact_phone: self.contact_phone.clone(),
      }),
      _ => Err(errors),
    }
  }
}

/// `^[0-9+\-\s()]{8,20}$`
pub fn is_valid_phone(phone: &str) -> bool {
  PHONE_LENGTH.contains(&phone.chars().count())
    && phone.chars().all(|c| {
      c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')') || c.is_whitespace()
    })
}

fn require(
  errors: &mut ValidationErrors,
  field: &'static str,
  value: &str,
  message: &str,
) -> bool {
  if value.trim().is_empty() {
    errors.push(field, message);
    false
  } else {
    true
  }
}

fn optional(value: &str) -> Option<String> {
  (!value.trim().is_empty()).then(|| value.to_owned())
}

fn measurement(
  errors: &mut ValidationErrors,
  field: &'static str,
  label: &str,
  value: &str,
) -> Option<f64> {
  let raw = value.trim();
  if raw.is_empty() {
    return None;
  }
  match raw.parse::<f64>() {
    Ok(n) if !n.is_finite() => {
      errors.push(field, format!("{label} must be a number"));
      None
    }
    Ok(n) if n < 0.0 => {
      errors.push(field, format!("{label} must be positive"));
      None
    }
    Ok(n) => Some(n),
    Err(_) => {
      errors.push(field, format!("{label} must be a number"));
      None
    }
  }
}
