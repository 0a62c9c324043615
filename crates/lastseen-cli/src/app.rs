//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lastseen_core::report::{Report, Status};
use uuid::Uuid;

use crate::{client::ApiClient, listing::ListingQuery};

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
  /// Focus on the report list; right pane shows the last opened report.
  ReportList,
  /// Focus on the report detail pane.
  ReportDetail,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  /// Every report returned by the last load, in server order.
  pub reports: Vec<Report>,

  /// Search, status filter and sort applied to `reports`.
  pub query: ListingQuery,

  /// Whether the user is typing a search term.
  pub filter_active: bool,

  /// Cursor position within the *visible* report list.
  pub list_cursor: usize,

  /// Scroll offset within the detail pane.
  pub detail_scroll: usize,

  /// The report open in the detail pane.
  pub selected: Option<Report>,

  /// Set while a status change is queued or in flight; status keys are
  /// ignored.
  pub updating: bool,

  /// Status change accepted by a key press, sent by [`App::run_pending_update`]
  /// after the next frame is drawn.
  pending_status: Option<Status>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient) -> Self {
    Self {
      screen: Screen::ReportList,
      reports: Vec::new(),
      query: ListingQuery::default(),
      filter_active: false,
      list_cursor: 0,
      detail_scroll: 0,
      selected: None,
      updating: false,
      pending_status: None,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch all reports and reset the cursor.
  pub async fn load_reports(&mut self) -> anyhow::Result<()> {
    self.status_msg = "Loading reports…".into();
    match self.client.list_reports().await {
      Ok(reports) => {
        self.reports = reports;
        self.list_cursor = 0;
        self.status_msg = String::new();
        Ok(())
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        Err(e)
      }
    }
  }

  // ── Visible list ──────────────────────────────────────────────────────────

  pub fn visible_reports(&self) -> Vec<&Report> { self.query.apply(&self.reports) }

  /// The report under the list cursor, if any.
  pub fn cursor_report(&self) -> Option<&Report> {
    self.visible_reports().get(self.list_cursor).copied()
  }

  /// Whether the status key for `status` is currently usable.
  pub fn can_set_status(&self, status: Status) -> bool {
    !self.updating && self.selected.as_ref().is_some_and(|r| r.status != status)
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.filter_active {
      return Ok(self.handle_filter_key(key));
    }

    match self.screen {
      Screen::ReportList => self.handle_list_key(key).await,
      Screen::ReportDetail => self.handle_detail_key(key).await,
    }
  }

  fn handle_filter_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.query.search.clear();
      }
      KeyCode::Enter => self.filter_active = false,
      KeyCode::Backspace => {
        self.query.search.pop();
      }
      KeyCode::Char(c) => self.query.search.push(c),
      _ => return true,
    }
    self.list_cursor = 0;
    true
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.visible_reports().len();
        if self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_report().map(|r| r.id) {
          self.open_detail(id).await;
        }
      }

      KeyCode::Char('/') => {
        self.filter_active = true;
        self.query.search.clear();
        self.list_cursor = 0;
      }
      KeyCode::Char('s') => {
        self.query.cycle_status();
        self.list_cursor = 0;
      }
      KeyCode::Char('o') => {
        self.query.sort = self.query.sort.next();
        self.list_cursor = 0;
      }
      KeyCode::Char('d') => {
        self.query.direction = self.query.direction.toggle();
        self.list_cursor = 0;
      }
      KeyCode::Char('r') => {
        // Errors are already in the status bar.
        let _ = self.load_reports().await;
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_detail_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::ReportList;
      }

      KeyCode::Down | KeyCode::Char('j') => self.detail_scroll += 1,
      KeyCode::Up | KeyCode::Char('k') => {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
      }

      KeyCode::Char('m') => {
        self.request_status(Status::Missing);
      }
      KeyCode::Char('c') => {
        self.request_status(Status::Critical);
      }
      KeyCode::Char('f') => {
        self.request_status(Status::Found);
      }

      _ => {}
    }
    Ok(true)
  }

  /// Fetch `id` fresh from the server and focus the detail pane.
  async fn open_detail(&mut self, id: Uuid) {
    self.status_msg = "Loading…".into();
    match self.client.get_report(id).await {
      Ok(report) => {
        self.selected = Some(report);
        self.detail_scroll = 0;
        self.screen = Screen::ReportDetail;
        self.status_msg = String::new();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  /// Queue a status change for the open report. Returns `false` when the
  /// action is disabled: the report already has `status`, or another change
  /// is still in flight.
  pub fn request_status(&mut self, status: Status) -> bool {
    if !self.can_set_status(status) {
      return false;
    }
    self.updating = true;
    self.pending_status = Some(status);
    self.status_msg = format!("Marking as {status}…");
    true
  }

  /// Send the queued status change, if any, and mirror the result in the
  /// list.
  pub async fn run_pending_update(&mut self) {
    let Some(status) = self.pending_status.take() else {
      self.updating = false;
      return;
    };
    let Some(id) = self.selected.as_ref().map(|r| r.id) else {
      self.updating = false;
      return;
    };

    let outcome = self.client.update_status(id, status).await;
    self.finish_update(outcome);
  }

  fn finish_update(&mut self, outcome: anyhow::Result<Report>) {
    self.updating = false;
    match outcome {
      Ok(updated) => {
        self.status_msg = format!("Status updated to {}", updated.status);
        if let Some(row) = self.reports.iter_mut().find(|r| r.id == updated.id) {
          *row = updated.clone();
        }
        if self.selected.as_ref().is_some_and(|r| r.id == updated.id) {
          self.selected = Some(updated);
        }
      }
      // The displayed status stays as it was.
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }
}
