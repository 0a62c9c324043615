//! Async HTTP client wrapping the lastseen JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use lastseen_core::{
  report::{Report, Status},
  schema::ReportForm,
};
use reqwest::{
  Client, Response,
  multipart::{Form, Part},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::staging::StagedPhoto;

/// Connection settings for the lastseen API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the lastseen REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn base(&self) -> &str { self.config.base_url.trim_end_matches('/') }

  fn url(&self, path: &str) -> String { format!("{}/api{}", self.base(), path) }

  /// Absolute URL of an uploaded photo given its stored relative path.
  pub fn photo_url(&self, path: &str) -> String {
    format!("{}/{}", self.base(), path.trim_start_matches('/'))
  }

  /// Turn a non-2xx response into an error carrying the server's message.
  async fn check(resp: Response, what: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp
      .json::<ErrorBody>()
      .await
      .map(|b| b.error)
      .unwrap_or_else(|_| status.to_string());
    Err(anyhow!("{what} → {status}: {message}"))
  }

  /// `GET /api/all`
  pub async fn list_reports(&self) -> Result<Vec<Report>> {
    let resp = self
      .client
      .get(self.url("/all"))
      .send()
      .await
      .context("GET /all failed")?;
    let resp = Self::check(resp, "GET /all").await?;
    resp.json().await.context("deserialising reports")
  }

  /// `GET /api/{id}`
  pub async fn get_report(&self, id: Uuid) -> Result<Report> {
    let resp = self
      .client
      .get(self.url(&format!("/{id}")))
      .send()
      .await
      .with_context(|| format!("GET /{id} failed"))?;
    let resp = Self::check(resp, &format!("GET /{id}")).await?;
    resp.json().await.context("deserialising report")
  }

  /// `POST /api/add` — text fields plus one `photos` part per staged photo.
  pub async fn submit_report(
    &self,
    form: &ReportForm,
    photos: &[StagedPhoto],
  ) -> Result<Report> {
    let mut body = Form::new();
    for (name, value) in form.fields() {
      body = body.text(name, value.to_owned());
    }
    for photo in photos {
      let part = Part::bytes(photo.bytes.clone())
        .file_name(photo.file_name.clone())
        .mime_str(&photo.content_type)
        .with_context(|| format!("bad media type {:?}", photo.content_type))?;
      body = body.part("photos", part);
    }

    let resp = self
      .client
      .post(self.url("/add"))
      .multipart(body)
      .send()
      .await
      .context("POST /add failed")?;
    let resp = Self::check(resp, "POST /add").await?;
    resp.json().await.context("deserialising created report")
  }

  /// `PATCH /api/{id}/status`
  pub async fn update_status(&self, id: Uuid, status: Status) -> Result<Report> {
    let resp = self
      .client
      .patch(self.url(&format!("/{id}/status")))
      .json(&json!({ "status": status }))
      .send()
      .await
      .with_context(|| format!("PATCH /{id}/status failed"))?;
    let resp = Self::check(resp, &format!("PATCH /{id}/status")).await?;
    resp.json().await.context("deserialising updated report")
  }
}
