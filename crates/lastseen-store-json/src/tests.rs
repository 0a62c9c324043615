//! Tests for `JsonFileStore` against temporary directories.

use chrono::{NaiveDate, Utc};
use lastseen_core::{
  report::{Report, Status},
  store::ReportStore,
};
use tempfile::TempDir;
use uuid::Uuid;

use crate::{Error, JsonFileStore};

async fn store() -> (JsonFileStore, TempDir) {
  let dir = tempfile::tempdir().expect("tempdir");
  let store = JsonFileStore::open(dir.path().join("data/missing-persons.json"))
    .await
    .expect("open store");
  (store, dir)
}

fn report(name: &str) -> Report {
  Report {
    id:                   Uuid::new_v4(),
    name:                 name.into(),
    age:                  Some(30),
    gender:               None,
    height:               None,
    weight:               Some(61.5),
    last_seen_date:       NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
    last_seen_location:   "Riverside Park".into(),
    description:          "Seen walking a dog along the river path.".into(),
    identifying_features: None,
    medical_conditions:   Some("Asthma".into()),
    contact_person:       "Sam".into(),
    contact_phone:        "555 123 4567".into(),
    photos:               vec![],
    status:               Status::Missing,
    date_reported:        Utc::now(),
  }
}

// ─── Open ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_file_opens_empty() {
  let (s, _dir) = store().await;
  assert!(s.list_reports().await.unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_file_is_an_error() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("store.json");
  std::fs::write(&path, "{ not json").unwrap();

  let result = JsonFileStore::open(&path).await;
  assert!(matches!(result, Err(Error::Corrupt { .. })));
  // The unreadable file is left alone.
  assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
}

#[tokio::test]
async fn duplicate_ids_on_disk_are_rejected() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("store.json");
  let r = report("Twice");
  std::fs::write(&path, serde_json::to_vec(&vec![r.clone(), r]).unwrap())
    .unwrap();

  assert!(matches!(
    JsonFileStore::open(&path).await,
    Err(Error::DuplicateId(_))
  ));
}

// ─── Append / get ────────────────────────────────────────────────────────────

#[tokio::test]
async fn append_and_get() {
  let (s, _dir) = store().await;
  let r = s.append_report(report("Alice")).await.unwrap();

  let fetched = s.get_report(r.id).await.unwrap().unwrap();
  assert_eq!(fetched, r);
  assert!(s.get_report(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn append_rejects_duplicate_id() {
  let (s, _dir) = store().await;
  let r = s.append_report(report("Alice")).await.unwrap();

  let mut again = report("Someone else");
  again.id = r.id;
  assert!(matches!(
    s.append_report(again).await,
    Err(Error::DuplicateId(id)) if id == r.id
  ));
  assert_eq!(s.list_reports().await.unwrap().len(), 1);
}

#[tokio::test]
async fn reports_survive_reopen_in_order() {
  let (s, dir) = store().await;
  let a = s.append_report(report("A")).await.unwrap();
  let b = s.append_report(report("B")).await.unwrap();
  drop(s);

  let reopened = JsonFileStore::open(dir.path().join("data/missing-persons.json"))
    .await
    .unwrap();
  let all = reopened.list_reports().await.unwrap();
  assert_eq!(all, vec![a, b]);
}

#[tokio::test]
async fn persisted_file_is_a_json_array() {
  let (s, _dir) = store().await;
  s.append_report(report("A")).await.unwrap();

  let raw = std::fs::read_to_string(s.path()).unwrap();
  let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
  assert_eq!(value.as_array().unwrap().len(), 1);
  assert_eq!(value[0]["lastSeenLocation"], "Riverside Park");
  assert!(!s.path().with_file_name("missing-persons.json.tmp").exists());
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_status_persists() {
  let (s, dir) = store().await;
  let r = s.append_report(report("Alice")).await.unwrap();

  let updated = s.update_status(r.id, Status::Critical).await.unwrap().unwrap();
  assert_eq!(updated.status, Status::Critical);
  assert_eq!(updated.date_reported, r.date_reported);

  let reopened = JsonFileStore::open(dir.path().join("data/missing-persons.json"))
    .await
    .unwrap();
  let fetched = reopened.get_report(r.id).await.unwrap().unwrap();
  assert_eq!(fetched.status, Status::Critical);
}

#[tokio::test]
async fn update_status_is_idempotent_and_unrestricted() {
  let (s, _dir) = store().await;
  let r = s.append_report(report("Alice")).await.unwrap();

  let first = s.update_status(r.id, Status::Found).await.unwrap().unwrap();
  let second = s.update_status(r.id, Status::Found).await.unwrap().unwrap();
  assert_eq!(first, second);

  // Found is not terminal.
  let back = s.update_status(r.id, Status::Missing).await.unwrap().unwrap();
  assert_eq!(back.status, Status::Missing);
}

#[tokio::test]
async fn update_status_unknown_id_returns_none() {
  let (s, _dir) = store().await;
  let result = s.update_status(Uuid::new_v4(), Status::Found).await.unwrap();
  assert!(result.is_none());
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_are_all_persisted() {
  let (s, dir) = store().await;

  let handles: Vec<_> = (0..16)
    .map(|i| {
      let s = s.clone();
      tokio::spawn(async move { s.append_report(report(&format!("P{i}"))).await })
    })
    .collect();
  for h in handles {
    h.await.unwrap().unwrap();
  }

  assert_eq!(s.list_reports().await.unwrap().len(), 16);
  let reopened = JsonFileStore::open(dir.path().join("data/missing-persons.json"))
    .await
    .unwrap();
  assert_eq!(reopened.list_reports().await.unwrap().len(), 16);
}
