//! Preview screen shown while the query is empty

use super::App;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

/// Render the idle view: no query yet, so give a feel for the dataset instead
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Settings
            Constraint::Length(3), // Query input
            Constraint::Length(1), // Prompt
            Constraint::Min(5),    // Dataset preview
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    super::render_settings(frame, app, chunks[0]);
    super::render_query(frame, app, chunks[1]);

    let prompt =
        Paragraph::new("Enter a search term to begin.").style(Style::default().fg(Color::Cyan));
    frame.render_widget(prompt, chunks[2]);

    render_preview(frame, app, chunks[3]);
    super::render_help(frame, app, chunks[4]);
}

/// Most frequent rows of the table, or its first rows when no total count
/// column ranks them
fn render_preview(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.table.has_total_counts() {
        format!(" Dataset Preview (top {} by total count) ", app.preview.len())
    } else {
        format!(" Dataset Preview (first {} rows) ", app.preview.len())
    };

    let header = Row::new((app.table.columns().iter()).map(|column| {
        Cell::from(Span::styled(
            &**column,
            Style::default().add_modifier(Modifier::BOLD),
        ))
    }));
    let rows = (app.preview.iter()).map(|&index| {
        Row::new((app.table.row(index).cells().iter()).map(|cell| Cell::from(cell.to_string())))
    });

    let widths = vec![Constraint::Fill(1); app.table.columns().len()];
    let preview = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(preview, area);
}
