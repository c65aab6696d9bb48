use std::path::Path;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::registry::{Registry, ServerRecord};
use crate::selection::Selection;

pub const LIST_HEIGHT: u16 = 10;
pub const PANEL_HEIGHT: u16 = 8;
/// Rows reserved for the inline viewport.
pub const VIEWPORT_HEIGHT: u16 = LIST_HEIGHT + PANEL_HEIGHT;
pub const MAX_WIDTH: u16 = 80;

const DETAILS_TITLE: &str = "Details";
const HELP_TEXT: &str = "Keybindings\n\n↑↓: Select\n⏎ : Connect\nq : Exit";

/// `{n}: {name} ({username}@{host})`, `n` counted from 1.
pub fn list_line(index: usize, record: &ServerRecord) -> String {
    format!(
        "{}: {} ({}@{})",
        index + 1,
        record.name,
        record.username,
        record.host
    )
}

pub fn placeholder_line(config_path: &Path) -> String {
    format!(
        "⚠ No servers configured. Edit {} to add one.",
        config_path.display()
    )
}

/// Host, username and port of the selected server. Empty without a selection.
pub fn detail_lines(registry: &Registry, selection: &Selection) -> Vec<String> {
    selection
        .index()
        .and_then(|i| registry.get(i))
        .map(|s| {
            vec![
                format!("IP Addr.  : {}", s.host),
                format!("Username  : {}", s.username),
                format!("Port No.  : {}", s.port),
            ]
        })
        .unwrap_or_default()
}

/// Draw the whole UI. `list_state` must outlive a single frame so the list
/// keeps its scroll offset while the selection moves.
pub fn render(
    f: &mut Frame,
    registry: &Registry,
    selection: &Selection,
    list_state: &mut ListState,
    config_path: &Path,
) {
    let size = f.size();
    let area = Rect {
        width: size.width.min(MAX_WIDTH),
        ..size
    };

    let recs = Layout::vertical([
        Constraint::Length(LIST_HEIGHT),
        Constraint::Length(PANEL_HEIGHT),
    ])
    .split(area);
    let panel = Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(recs[1]);

    let list_block = heavy_block(Color::White);
    if registry.is_empty() {
        let placeholder = Paragraph::new(placeholder_line(config_path))
            .style(Style::default().fg(Color::Yellow))
            .wrap(Wrap { trim: true })
            .block(list_block);
        f.render_widget(placeholder, recs[0]);
    } else {
        let items: Vec<_> = registry
            .iter()
            .enumerate()
            .map(|(i, s)| ListItem::new(list_line(i, s)))
            .collect();
        let list = List::new(items)
            .block(list_block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_spacing(HighlightSpacing::Always);
        list_state.select(selection.index());
        f.render_stateful_widget(list, recs[0], list_state);
    }

    let mut details = vec![
        Line::from(Span::styled(
            DETAILS_TITLE,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];
    details.extend(detail_lines(registry, selection).into_iter().map(Line::from));
    f.render_widget(
        Paragraph::new(details).block(heavy_block(Color::Red)),
        panel[0],
    );

    f.render_widget(
        Paragraph::new(HELP_TEXT).block(heavy_block(Color::Blue)),
        panel[1],
    );
}

fn heavy_block(color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(color))
}
