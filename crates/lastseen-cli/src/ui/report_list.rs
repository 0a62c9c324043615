//! Report list pane — left panel.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::status_color;
use crate::app::App;

/// Render the report list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let visible = app.visible_reports();
  let total = app.reports.len();

  let title = if visible.len() == total {
    format!(" Reports ({total}) ")
  } else {
    format!(" Reports ({}/{total}) ", visible.len())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let items: Vec<ListItem> = visible
    .iter()
    .map(|report| {
      ListItem::new(Line::from(vec![
        Span::styled(
          format!("{:<9}", report.status.as_ref()),
          Style::default().fg(status_color(report.status)),
        ),
        Span::raw(report.name.clone()),
        Span::styled(
          format!("  {}", report.last_seen_location),
          Style::default().fg(Color::DarkGray),
        ),
      ]))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Search bar along the bottom edge while a term is set or being typed.
  let search = &app.query.search;
  if (app.filter_active || !search.is_empty()) && inner_area.height > 2 {
    let search_area = Rect {
      y: inner_area.y + inner_area.height - 1,
      height: 1,
      ..inner_area
    };
    inner_area.height -= 1;

    let text = if app.filter_active {
      format!("/{search}_")
    } else {
      format!("/{search}")
    };
    f.render_widget(
      Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
      search_area,
    );
  }

  if visible.is_empty() {
    f.render_widget(
      Paragraph::new("No reports match.").style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  let mut state = ListState::default();
  state.select(Some(app.list_cursor));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner_area,
    &mut state,
  );
}
