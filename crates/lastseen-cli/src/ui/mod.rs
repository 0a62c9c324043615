//! TUI rendering — orchestrates all panes.

pub mod report_detail;
pub mod report_list;

use chrono::Local;
use lastseen_core::report::Status;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

/// Colour used for a status badge everywhere in the UI.
pub fn status_color(status: Status) -> Color {
  match status {
    Status::Missing => Color::Yellow,
    Status::Critical => Color::Red,
    Status::Found => Color::Green,
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " lastseen  [/] search  [r] reload  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let filter = app
    .query
    .status
    .map_or_else(|| "all".to_owned(), |s| s.to_string());
  let right = Span::styled(
    format!(
      "status: {filter}  sort: {} {}  {date} ",
      app.query.sort.label(),
      match app.query.direction {
        crate::listing::SortDirection::Asc => "↑",
        crate::listing::SortDirection::Desc => "↓",
      },
    ),
    Style::default().fg(Color::Gray),
  );

  let pad = usize::from(area.width)
    .saturating_sub(left.content.chars().count())
    .saturating_sub(right.content.chars().count());

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
    .split(area);

  report_list::draw(f, cols[0], app);

  if app.selected.is_some() {
    report_detail::draw(f, cols[1], app);
  } else {
    draw_empty_detail(f, cols[1]);
  }
}

fn draw_empty_detail(f: &mut Frame, area: Rect) {
  let block = Block::default()
    .title(" Detail ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new("Select a report and press Enter.")
      .style(Style::default().fg(Color::DarkGray)),
    inner,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match &app.screen {
    Screen::ReportList if app.filter_active => {
      ("SEARCH", "Type to search  Esc clear  Enter done")
    }
    Screen::ReportList => (
      "NORMAL",
      "↑↓/jk navigate  / search  s status  o sort  d direction  Enter detail",
    ),
    Screen::ReportDetail => (
      "DETAIL",
      "↑↓/jk scroll  m missing  c critical  f found  Esc back  q quit",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints
  } else {
    app.status_msg.as_str()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}
