//! Interactive terminal session
//!
//! The interface follows one rule: every frame is drawn from scratch out of
//! the current [`App`] state, and every key press only updates that state.
//! What is on screen is therefore always the outcome of the latest full
//! search, never an incremental edit of a previous frame.

mod idle;
mod results;

use crate::{
    config::{Config, MAX_RESULTS_RANGE, SCORE_CUTOFF_RANGE},
    dataset::Table,
    matcher::ScorerKind,
    search::{self, MatchResult},
    top, Result, Score,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use std::{io, sync::Arc};

/// Step applied to the minimum score by Ctrl+Up/Down
const SCORE_STEP: Score = 5.0;

/// What the session is showing, as dictated by the query and its results
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum View {
    /// No query yet, showing the dataset preview
    Idle,

    /// Query with at least one match
    Results,

    /// Query that matched nothing
    NoMatches,
}

/// Application state
pub struct App {
    /// Phrase table under search
    table: Arc<Table>,

    /// Similarity measure
    scorer: ScorerKind,

    /// Query text as typed so far
    query: String,

    /// Cap on the number of search results
    max_results: usize,

    /// Minimum match score
    score_cutoff: Score,

    /// Outcome of the latest search, empty when the query is empty
    results: Vec<MatchResult>,

    /// Position picked in the match list
    selected: usize,

    /// Rows of the idle preview, fixed for the whole session
    preview: Vec<usize>,

    /// Set when the session should end
    should_quit: bool,
}
//
impl App {
    /// Set up a session over a freshly loaded table
    pub fn new(table: Arc<Table>, config: &Config) -> Self {
        let preview = top::preview_indices(&table);
        Self {
            table,
            scorer: config.scorer,
            query: String::new(),
            max_results: config.max_results,
            score_cutoff: config.score_cutoff,
            results: Vec::new(),
            selected: 0,
            preview,
            should_quit: false,
        }
    }

    /// Current view, derived from the query and its results
    pub fn view(&self) -> View {
        if self.query.is_empty() {
            View::Idle
        } else if self.results.is_empty() {
            View::NoMatches
        } else {
            View::Results
        }
    }

    /// Handle one key press
    fn handle_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            // Session control
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => self.should_quit = true,
            (_, KeyCode::Esc) => {
                if self.query.is_empty() {
                    self.should_quit = true;
                } else {
                    self.query.clear();
                    self.refresh_results();
                }
            }

            // Search settings
            (KeyModifiers::CONTROL, KeyCode::Up) => self.adjust_score_cutoff(SCORE_STEP),
            (KeyModifiers::CONTROL, KeyCode::Down) => self.adjust_score_cutoff(-SCORE_STEP),
            (KeyModifiers::CONTROL, KeyCode::Right) => self.adjust_max_results(1),
            (KeyModifiers::CONTROL, KeyCode::Left) => self.adjust_max_results(-1),

            // Detail selection
            (_, KeyCode::Up) => self.selected = self.selected.saturating_sub(1),
            (_, KeyCode::Down) => {
                if self.selected + 1 < self.results.len() {
                    self.selected += 1;
                }
            }

            // Query editing
            (_, KeyCode::Backspace) => {
                self.query.pop();
                self.refresh_results();
            }
            (modifiers, KeyCode::Char(c)) if !modifiers.contains(KeyModifiers::CONTROL) => {
                self.query.push(c);
                self.refresh_results();
            }
            _ => {}
        }
    }

    /// Re-run the search after any change to the query or its settings
    ///
    /// Like a fresh page of results would, this also snaps the detail
    /// selection back to the best match.
    fn refresh_results(&mut self) {
        if self.query.is_empty() {
            self.results.clear();
        } else {
            self.results = search::search(
                &self.table,
                &self.query,
                self.max_results,
                self.score_cutoff,
                &self.scorer,
            );
        }
        self.selected = 0;
    }

    fn adjust_score_cutoff(&mut self, step: Score) {
        self.score_cutoff = (self.score_cutoff + step)
            .clamp(*SCORE_CUTOFF_RANGE.start(), *SCORE_CUTOFF_RANGE.end());
        self.refresh_results();
    }

    fn adjust_max_results(&mut self, step: isize) {
        self.max_results = (self.max_results.saturating_add_signed(step))
            .clamp(*MAX_RESULTS_RANGE.start(), *MAX_RESULTS_RANGE.end());
        self.refresh_results();
    }

    /// Phrase currently picked in the match list
    fn selected_phrase(&self) -> Option<&str> {
        (self.results.get(self.selected)).map(|result| self.table.phrase(result.index))
    }

    /// Result shown in the detail panel
    ///
    /// Selection is by phrase text: when several matched rows carry the same
    /// phrase, the panel shows the first of them in ranking order, whichever
    /// entry was used to pick the phrase.
    pub fn detail_result(&self) -> Option<&MatchResult> {
        let phrase = self.selected_phrase()?;
        (self.results.iter()).find(|result| self.table.phrase(result.index) == phrase)
    }
}

/// Run the interactive session
///
/// Sets up the terminal, runs the main event loop, and restores the terminal
/// on exit (including on error).
pub fn run(table: Arc<Table>, config: &Config) -> Result<()> {
    let app = App::new(table, config);

    // Set up the terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the event loop, capturing any error so we can restore the terminal
    let result = run_event_loop(&mut terminal, app);

    // Restore the terminal regardless of success or failure
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| match app.view() {
            View::Idle => idle::render(frame, &app),
            View::Results | View::NoMatches => results::render(frame, &app),
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Draw the settings bar shared by every view
fn render_settings(frame: &mut Frame, app: &App, area: Rect) {
    let hint = Style::default().fg(Color::DarkGray);
    let line = Line::from(vec![
        Span::raw(format!("Max results: {}", app.max_results)),
        Span::styled("  Ctrl+\u{2190}/\u{2192}", hint),
        Span::raw("    "),
        Span::raw(format!("Min score: {:.0}", app.score_cutoff)),
        Span::styled("  Ctrl+\u{2191}/\u{2193}", hint),
        Span::raw("    "),
        Span::raw(format!("Scorer: {}", app.scorer.label())),
    ]);
    let settings = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search Settings "),
    );
    frame.render_widget(settings, area);
}

/// Draw the query input box shared by every view
fn render_query(frame: &mut Frame, app: &App, area: Rect) {
    let content = if app.query.is_empty() {
        Line::from(Span::styled(
            "Type a phrase here... (e.g., 'eğitim', 'mücadele')",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(vec![
            Span::raw(app.query.as_str()),
            Span::styled("\u{258c}", Style::default().fg(Color::Yellow)),
        ])
    };
    let input = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search Phrase "),
    );
    frame.render_widget(input, area);
}

/// Draw the key binding reminder at the bottom of every view
fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help = match app.view() {
        View::Idle => "type to search \u{b7} Esc/Ctrl+C quit",
        View::Results => "\u{2191}/\u{2193} pick a phrase \u{b7} type to refine \u{b7} Esc clear \u{b7} Ctrl+C quit",
        View::NoMatches => "type to refine \u{b7} Ctrl+\u{2193} lower the score cutoff \u{b7} Esc clear",
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
