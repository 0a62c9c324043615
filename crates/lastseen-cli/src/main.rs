//! `lastseen` — terminal client for the lastseen missing-persons board.
//!
//! # Usage
//!
//! ```
//! lastseen --url http://localhost:3000            # interactive browser
//! lastseen list --search harbour --status critical
//! lastseen show 7b0c…
//! lastseen report --name "Jane Doe" --last-seen-date 2024-03-01 … --photo a.jpg
//! lastseen status 7b0c… found
//! ```

mod app;
mod client;
mod draft;
mod listing;
mod staging;
mod ui;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use draft::ReportDraft;
use lastseen_core::report::Status;
use listing::{ListingQuery, SortDirection, SortField};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEFAULT_URL: &str = "http://localhost:3000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "lastseen", about = "Client for the lastseen missing-persons board")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the lastseen server (default: http://localhost:3000).
  #[arg(long, env = "LASTSEEN_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Interactive browser (the default).
  Browse,
  /// Print the report list.
  List {
    /// Case-insensitive search over name, location and description.
    #[arg(long, default_value = "")]
    search: String,
    /// Only show reports with this status.
    #[arg(long, value_parser = parse_status)]
    status: Option<Status>,
    /// dateReported, name or lastSeenDate.
    #[arg(long, default_value_t = SortField::default())]
    sort:   SortField,
    /// Ascending instead of descending order.
    #[arg(long)]
    asc:    bool,
  },
  /// Print one report.
  Show { id: Uuid },
  /// Submit a new report.
  Report(ReportArgs),
  /// Change a report's status.
  Status {
    id:     Uuid,
    #[arg(value_parser = parse_status)]
    status: Status,
  },
}

#[derive(clap::Args, Debug)]
struct ReportArgs {
  #[arg(long, default_value = "")]
  name:                 String,
  #[arg(long, default_value = "")]
  age:                  String,
  #[arg(long, default_value = "")]
  gender:               String,
  /// Height in centimetres.
  #[arg(long, default_value = "")]
  height:               String,
  /// Weight in kilograms.
  #[arg(long, default_value = "")]
  weight:               String,
  /// YYYY-MM-DD
  #[arg(long, default_value = "")]
  last_seen_date:       String,
  #[arg(long, default_value = "")]
  last_seen_location:   String,
  #[arg(long, default_value = "")]
  description:          String,
  #[arg(long, default_value = "")]
  identifying_features: String,
  #[arg(long, default_value = "")]
  medical_conditions:   String,
  #[arg(long, default_value = "")]
  contact_person:       String,
  #[arg(long, default_value = "")]
  contact_phone:        String,
  /// Photo file to attach; repeat for more (at most 5).
  #[arg(long = "photo", value_name = "FILE")]
  photos:               Vec<PathBuf>,
}

fn parse_status(value: &str) -> Result<Status, String> {
  Status::parse(value).map_err(|e| e.to_string())
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  // Logs go to stderr so they never land in the TUI or in piped output.
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flag / env override the config file, which overrides the default.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
  };
  let client = ApiClient::new(api_config)?;

  match args.command.unwrap_or(Command::Browse) {
    Command::Browse => browse(client).await,
    Command::List {
      search,
      status,
      sort,
      asc,
    } => {
      let query = ListingQuery {
        search,
        status,
        sort,
        direction: if asc { SortDirection::Asc } else { SortDirection::Desc },
      };
      list(&client, &query).await
    }
    Command::Show { id } => show(&client, id).await,
    Command::Report(report) => submit(&client, report).await,
    Command::Status { id, status } => {
      let updated = client.update_status(id, status).await?;
      println!("{} is now {}", updated.name, updated.status);
      Ok(())
    }
  }
}

// ─── One-shot commands ────────────────────────────────────────────────────────

async fn list(client: &ApiClient, query: &ListingQuery) -> Result<()> {
  let reports = client.list_reports().await?;
  let visible = query.apply(&reports);
  if visible.is_empty() {
    println!("No reports match.");
    return Ok(());
  }
  for report in visible {
    println!(
      "{}  {:<9} {:<24} {}  {}",
      report.id,
      report.status.as_ref(),
      report.name,
      report.last_seen_date,
      report.last_seen_location,
    );
  }
  Ok(())
}

async fn show(client: &ApiClient, id: Uuid) -> Result<()> {
  let report = client.get_report(id).await?;
  println!("{}", report.name);
  for (label, value) in ui::report_detail::detail_fields(&report) {
    println!("  {label:<22}{value}");
  }
  for path in &report.photos {
    println!("  {:<22}{}", "Photo", client.photo_url(path));
  }
  Ok(())
}

async fn submit(client: &ApiClient, args: ReportArgs) -> Result<()> {
  let mut draft = ReportDraft::default();
  for (field, value) in [
    ("name", args.name),
    ("age", args.age),
    ("gender", args.gender),
    ("height", args.height),
    ("weight", args.weight),
    ("lastSeenDate", args.last_seen_date),
    ("lastSeenLocation", args.last_seen_location),
    ("description", args.description),
    ("identifyingFeatures", args.identifying_features),
    ("medicalConditions", args.medical_conditions),
    ("contactPerson", args.contact_person),
    ("contactPhone", args.contact_phone),
  ] {
    draft.set_field(field, value);
  }

  for rejected in draft.add_photos(&args.photos).await {
    eprintln!("warning: skipping {}: {}", rejected.path.display(), rejected.reason);
  }

  for photo in draft.photos().photos() {
    eprintln!(
      "attaching {} ({}, {} bytes)",
      photo.file_name,
      photo.content_type,
      photo.bytes.len()
    );
    // The preview is only encoded when debug logging is enabled.
    tracing::debug!(file = %photo.file_name, preview_len = photo.preview().len(), "staged photo");
  }
  if !draft.photos().is_empty() {
    eprintln!("{} slot(s) left", draft.photos().remaining_slots());
  }

  let report = draft.submit(client).await?;
  println!("Report submitted: {}\n", report.id);
  show(client, report.id).await
}

// ─── Interactive browser ──────────────────────────────────────────────────────

async fn browse(client: ApiClient) -> Result<()> {
  let mut app = App::new(client);

  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let load_result = app.load_reports().await;

  // Run the event loop; restore terminal even on error.
  let run_result = if load_result.is_ok() {
    run_event_loop(&mut terminal, &mut app).await
  } else {
    load_result
  };

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // A queued status change is sent only after a frame showing it in flight.
    if app.updating {
      app.run_pending_update().await;
      continue;
    }

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event {
      if !app.handle_key(key).await? {
        break;
      }
    }
  }

  Ok(())
}
