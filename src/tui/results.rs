//! Results screen: ranked matches, detail panel, and the full match table

use super::{App, View};
use crate::{search::SCORE_COLUMN, Score};
use ratatui::prelude::*;
use ratatui::widgets::{
    Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Wrap,
};

/// Render the results view, or the no-match warning when the query came back
/// empty
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Settings
            Constraint::Length(3), // Query input
            Constraint::Length(1), // Match count banner
            Constraint::Min(8),    // Matches
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    super::render_settings(frame, app, chunks[0]);
    super::render_query(frame, app, chunks[1]);

    if app.view() == View::NoMatches {
        let warning =
            Paragraph::new("No matches found. Try adjusting the score cutoff or search term.")
                .style(Style::default().fg(Color::Yellow))
                .centered();
        frame.render_widget(warning, chunks[3]);
        super::render_help(frame, app, chunks[4]);
        return;
    }

    let banner = Paragraph::new(format!("Found {} matches.", app.results.len()))
        .style(Style::default().fg(Color::Green));
    frame.render_widget(banner, chunks[2]);

    // Phrase picker and detail panel side by side, full match table below
    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[3]);
    let upper = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(body[0]);

    render_match_list(frame, app, upper[0]);
    render_detail(frame, app, upper[1]);
    render_match_table(frame, app, body[1]);
    super::render_help(frame, app, chunks[4]);
}

/// Matched phrases in ranking order
fn render_match_list(frame: &mut Frame, app: &App, area: Rect) {
    let items = (app.results.iter()).map(|result| {
        ListItem::new(Line::from(vec![
            Span::styled(format!("{:5.1} ", result.score), score_style(result.score)),
            Span::raw(app.table.phrase(result.index)),
        ]))
    });
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Matched Phrases "),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    state.select(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Full record behind the picked phrase
fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Selected Phrase Details ");
    let Some(result) = app.detail_result() else {
        frame.render_widget(block, area);
        return;
    };

    let mut lines = vec![field_line(SCORE_COLUMN, format!("{:.1}", result.score))];
    lines.extend(
        (app.table.columns().iter())
            .zip(app.table.row(result.index).cells())
            .map(|(column, cell)| field_line(column, cell.to_string())),
    );
    let detail = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(detail, area);
}

/// One `name  value` line of the detail panel
fn field_line(name: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{name:>14}  "), Style::default().fg(Color::Cyan)),
        Span::raw(value),
    ])
}

/// Every match as a table, score column first like the batch output
fn render_match_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(
        (std::iter::once(SCORE_COLUMN))
            .chain((app.table.columns().iter()).map(|column| &**column))
            .map(|name| {
                Cell::from(Span::styled(
                    name,
                    Style::default().add_modifier(Modifier::BOLD),
                ))
            }),
    );
    let rows = (app.results.iter()).map(|result| {
        let score = Cell::from(Span::styled(
            format!("{:.1}", result.score),
            score_style(result.score),
        ));
        let cells =
            (app.table.row(result.index).cells().iter()).map(|cell| Cell::from(cell.to_string()));
        Row::new(std::iter::once(score).chain(cells))
    });

    let widths = (std::iter::once(Constraint::Length(11)))
        .chain(std::iter::repeat(Constraint::Fill(1)).take(app.table.columns().len()))
        .collect::<Vec<_>>();
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" All Matches "));
    frame.render_widget(table, area);
}

/// Green that brightens with the score, like a heat-mapped spreadsheet column
fn score_style(score: Score) -> Style {
    let unit = (score / 100.0).clamp(0.0, 1.0);
    let green = 95.0 + unit * 160.0;
    Style::default().fg(Color::Rgb(40, green as u8, 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_colors_brighten_with_the_score() {
        let green_of = |score: Score| match score_style(score).fg {
            Some(Color::Rgb(_, green, _)) => green,
            other => panic!("expected an RGB foreground, got {other:?}"),
        };
        assert!(green_of(90.0) > green_of(50.0));
        assert!(green_of(50.0) > green_of(10.0));
        assert_eq!(green_of(100.0), 255);
    }
}
