//! The report submission flow as an explicit state machine.
//!
//! ```text
//! Empty ──edit──▶ Staged ──submit──▶ Submitting ──ok──▶ Submitted(id)
//!                   ▲                     │
//!                   └──edit── Failed ◀──err┘
//! ```
//!
//! A failed submission keeps every field and staged photo so the user can
//! retry; a successful one clears the draft.

use std::path::PathBuf;

use lastseen_core::{Report, schema::ReportForm};
use uuid::Uuid;

use crate::{
  client::ApiClient,
  staging::{PhotoStaging, Rejected},
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
  #[default]
  Empty,
  Staged,
  Submitting,
  Submitted(Uuid),
  Failed(String),
}

#[derive(Debug, Default)]
pub struct ReportDraft {
  form:   ReportForm,
  photos: PhotoStaging,
  state:  SubmissionState,
}

impl ReportDraft {
  pub fn state(&self) -> &SubmissionState { &self.state }

  pub fn form(&self) -> &ReportForm { &self.form }

  pub fn photos(&self) -> &PhotoStaging { &self.photos }

  fn touch(&mut self) {
    if self.state != SubmissionState::Submitting {
      self.state = SubmissionState::Staged;
    }
  }

  /// Set a text field by wire name. Ignored while a submission is in flight.
  pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> bool {
    if self.state == SubmissionState::Submitting {
      return false;
    }
    let known = self.form.set(field, value);
    if known {
      self.touch();
    }
    known
  }

  /// Stage photo files; returns the refused ones.
  pub async fn add_photos(&mut self, paths: &[PathBuf]) -> Vec<Rejected> {
    if self.state == SubmissionState::Submitting {
      return Vec::new();
    }
    let before = self.photos.len();
    let rejected = self.photos.add_files(paths).await;
    if self.photos.len() != before {
      self.touch();
    }
    rejected
  }

  pub fn remove_photo(&mut self, index: usize) -> bool {
    if self.state == SubmissionState::Submitting {
      return false;
    }
    let removed = self.photos.remove(index).is_some();
    if removed {
      self.touch();
    }
    removed
  }

  /// Validate and enter `Submitting`. On a validation failure the draft moves
  /// to `Failed` with the joined messages and nothing is sent.
  pub fn begin_submit(&mut self) -> anyhow::Result<()> {
    if self.state == SubmissionState::Submitting {
      anyhow::bail!("a submission is already in progress");
    }
    if let Err(errors) = self.form.validate() {
      self.state = SubmissionState::Failed(errors.to_string());
      return Err(errors.into());
    }
    self.state = SubmissionState::Submitting;
    Ok(())
  }

  /// Record the outcome of the request started by [`Self::begin_submit`].
  pub fn finish(&mut self, outcome: &anyhow::Result<Report>) {
    match outcome {
      Ok(report) => {
        self.form = ReportForm::default();
        self.photos.clear();
        self.state = SubmissionState::Submitted(report.id);
      }
      Err(e) => self.state = SubmissionState::Failed(format!("{e:#}")),
    }
  }

  /// Run the whole submission against the API.
  pub async fn submit(&mut self, client: &ApiClient) -> anyhow::Result<Report> {
    self.begin_submit()?;
    let outcome = client
      .submit_report(&self.form, self.photos.photos())
      .await;
    self.finish(&outcome);
    outcome
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use chrono::{NaiveDate, Utc};
  use lastseen_core::Status;

  fn fill(draft: &mut ReportDraft) {
    for (field, value) in [
      ("name", "Jane Doe"),
      ("lastSeenDate", "2024-03-01"),
      ("lastSeenLocation", "Central Station"),
      ("description", "Wearing a red coat and a grey backpack."),
      ("contactPerson", "John"),
      ("contactPhone", "555 123 4567"),
    ] {
      assert!(draft.set_field(field, value));
    }
  }

  fn created(id: Uuid) -> Report {
    Report {
      id,
      name: "Jane Doe".into(),
      age: None,
      gender: None,
      height: None,
      weight: None,
      last_seen_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
      last_seen_location: "Central Station".into(),
      description: "Wearing a red coat and a grey backpack.".into(),
      identifying_features: None,
      medical_conditions: None,
      contact_person: "John".into(),
      contact_phone: "555 123 4567".into(),
      photos: vec![],
      status: Status::Missing,
      date_reported: Utc::now(),
    }
  }

  #[test]
  fn editing_moves_empty_to_staged() {
    let mut draft = ReportDraft::default();
    assert_eq!(draft.state(), &SubmissionState::Empty);
    assert!(!draft.set_field("unknown", "x"));
    assert_eq!(draft.state(), &SubmissionState::Empty);
    assert!(draft.set_field("name", "Jane"));
    assert_eq!(draft.state(), &SubmissionState::Staged);
  }

  #[test]
  fn invalid_draft_fails_without_submitting() {
    let mut draft = ReportDraft::default();
    draft.set_field("name", "Jane");
    assert!(draft.begin_submit().is_err());
    match draft.state() {
      SubmissionState::Failed(msg) => {
        assert!(msg.contains("Description is required"), "msg: {msg}")
      }
      other => panic!("unexpected state {other:?}"),
    }
    // The draft is preserved.
    assert_eq!(draft.form().name, "Jane");
  }

  #[test]
  fn success_clears_the_draft() {
    let mut draft = ReportDraft::default();
    fill(&mut draft);
    draft.begin_submit().unwrap();
    assert_eq!(draft.state(), &SubmissionState::Submitting);
    assert!(draft.begin_submit().is_err());
    assert!(!draft.set_field("name", "changed mid-flight"));

    let id = Uuid::new_v4();
    draft.finish(&Ok(created(id)));
    assert_eq!(draft.state(), &SubmissionState::Submitted(id));
    assert_eq!(draft.form(), &ReportForm::default());
  }

  #[test]
  fn failure_keeps_the_draft_for_retry() {
    let mut draft = ReportDraft::default();
    fill(&mut draft);
    draft.begin_submit().unwrap();
    draft.finish(&Err(anyhow::anyhow!("connection refused")));

    assert_eq!(
      draft.state(),
      &SubmissionState::Failed("connection refused".into())
    );
    assert_eq!(draft.form().name, "Jane Doe");
    assert!(draft.begin_submit().is_ok());
  }
}
