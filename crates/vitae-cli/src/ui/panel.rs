//! Record list for the active kind.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use vitae_core::{Record, ordering::move_item};

use crate::app::App;

/// Indices of the panel's items in display order. While an item is being
/// moved it is shown at the cursor.
fn preview(len: usize, moving: Option<(usize, usize)>) -> Vec<usize> {
  let mut order: Vec<usize> = (0..len).collect();
  if let Some((from, to)) = moving {
    move_item(&mut order, from, to);
  }
  order
}

/// Render the active panel into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let panel = app.panel();
  let kind = panel.kind();
  let records: &[Record] = panel.items();
  let moving = app.moving_from();

  let block = Block::default()
    .title(format!(" {} ", kind.label()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(if moving.is_some() {
      Color::Yellow
    } else {
      Color::DarkGray
    }));

  if records.is_empty() {
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new(Span::styled("Nothing here yet.", Style::default().fg(Color::DarkGray))),
      inner,
    );
    return;
  }

  let items: Vec<ListItem> = preview(records.len(), moving.map(|from| (from, app.cursor)))
    .into_iter()
    .map(|i| {
      let record = &records[i];
      let mut spans = vec![Span::raw(record.title(kind).to_string())];
      if let Some(sub) = record.subtitle(kind) {
        spans.push(Span::styled(format!("  {sub}"), Style::default().fg(Color::DarkGray)));
      }
      if Some(i) == moving {
        spans.insert(0, Span::styled("↕ ", Style::default().fg(Color::Yellow)));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.cursor));

  f.render_stateful_widget(
    List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      ),
    area,
    &mut state,
  );
}
