//! Report detail pane — right panel.

use lastseen_core::report::{Report, Status};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use strum::IntoEnumIterator as _;

use super::status_color;
use crate::app::App;

// ─── Public entry ─────────────────────────────────────────────────────────────

/// Render the detail pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(report) = app.selected.as_ref() else {
    return;
  };

  let block = Block::default()
    .title(format!(" {} ", report.name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines: Vec<Line> = vec![status_line(app, report), Line::from("")];

  for (label, value) in detail_fields(report) {
    lines.push(Line::from(vec![
      Span::styled(
        format!("{label:<22}"),
        Style::default()
          .fg(Color::Cyan)
          .add_modifier(Modifier::BOLD),
      ),
      Span::raw(value),
    ]));
  }

  lines.push(Line::from(""));
  if report.photos.is_empty() {
    lines.push(Line::styled("No photos", Style::default().fg(Color::DarkGray)));
  } else {
    for path in &report.photos {
      lines.push(Line::from(vec![
        Span::styled(format!("{:<22}", "Photo"), Style::default().fg(Color::Cyan)),
        Span::styled(
          app.client.photo_url(path),
          Style::default().add_modifier(Modifier::UNDERLINED),
        ),
      ]));
    }
  }

  let scroll = u16::try_from(app.detail_scroll).unwrap_or(u16::MAX);
  f.render_widget(
    Paragraph::new(lines)
      .wrap(Wrap { trim: false })
      .scroll((scroll, 0)),
    inner,
  );
}

/// Current status badge followed by one action per status. The action for
/// the current status, and every action while an update is in flight, is
/// drawn disabled.
fn status_line<'a>(app: &App, report: &Report) -> Line<'a> {
  let mut spans = vec![Span::styled(
    format!(" {} ", report.status.as_ref().to_uppercase()),
    Style::default()
      .fg(Color::Black)
      .bg(status_color(report.status))
      .add_modifier(Modifier::BOLD),
  )];

  for status in Status::iter() {
    let key = match status {
      Status::Missing => 'm',
      Status::Critical => 'c',
      Status::Found => 'f',
    };
    let style = if app.can_set_status(status) {
      Style::default().fg(status_color(status))
    } else {
      Style::default().fg(Color::DarkGray)
    };
    spans.push(Span::styled(format!("  [{key}] {status}"), style));
  }

  if app.updating {
    spans.push(Span::styled("  updating…", Style::default().fg(Color::Yellow)));
  }
  Line::from(spans)
}

// ─── Field formatting ─────────────────────────────────────────────────────────

/// Labelled display values for a report, omitting optional fields that were
/// not provided. Photos are listed separately since they need the server URL.
pub fn detail_fields(report: &Report) -> Vec<(&'static str, String)> {
  let mut out = vec![("Status", report.status.to_string())];

  if let Some(age) = report.age {
    out.push(("Age", age.to_string()));
  }
  if let Some(gender) = &report.gender {
    out.push(("Gender", gender.clone()));
  }
  if let Some(height) = report.height {
    out.push(("Height", format!("{height} cm")));
  }
  if let Some(weight) = report.weight {
    out.push(("Weight", format!("{weight} kg")));
  }

  out.push(("Last seen", report.last_seen_date.format("%Y-%m-%d").to_string()));
  out.push(("Last seen location", report.last_seen_location.clone()));
  out.push(("Description", report.description.clone()));

  if let Some(features) = &report.identifying_features {
    out.push(("Identifying features", features.clone()));
  }
  if let Some(conditions) = &report.medical_conditions {
    out.push(("Medical conditions", conditions.clone()));
  }

  out.push(("Contact person", report.contact_person.clone()));
  out.push(("Contact phone", report.contact_phone.clone()));
  out.push((
    "Reported",
    report.date_reported.format("%Y-%m-%d %H:%M UTC").to_string(),
  ));
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  use chrono::{NaiveDate, TimeZone, Utc};
  use uuid::Uuid;

  fn report() -> Report {
    Report {
      id:                   Uuid::new_v4(),
      name:                 "Jane Doe".into(),
      age:                  Some(34),
      gender:               None,
      height:               Some(170.5),
      weight:               None,
      last_seen_date:       NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
      last_seen_location:   "Central Station".into(),
      description:          "Wearing a red coat and a grey backpack.".into(),
      identifying_features: None,
      medical_conditions:   Some("Diabetic".into()),
      contact_person:       "John".into(),
      contact_phone:        "555 123 4567".into(),
      photos:               vec![],
      status:               Status::Critical,
      date_reported:        Utc.with_ymd_and_hms(2024, 3, 2, 9, 30, 0).unwrap(),
    }
  }

  #[test]
  fn absent_optional_fields_are_omitted() {
    let fields = detail_fields(&report());
    let labels: Vec<&str> = fields.iter().map(|(l, _)| *l).collect();
    assert_eq!(
      labels,
      [
        "Status",
        "Age",
        "Height",
        "Last seen",
        "Last seen location",
        "Description",
        "Medical conditions",
        "Contact person",
        "Contact phone",
        "Reported",
      ]
    );
  }

  #[test]
  fn values_are_formatted_for_display() {
    let fields = detail_fields(&report());
    let value = |label: &str| {
      fields
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, v)| v.as_str())
        .unwrap()
    };
    assert_eq!(value("Status"), "critical");
    assert_eq!(value("Height"), "170.5 cm");
    assert_eq!(value("Last seen"), "2024-03-01");
    assert_eq!(value("Reported"), "2024-03-02 09:30 UTC");
  }
}
