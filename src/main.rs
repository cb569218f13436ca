//! Interactive fuzzy lookup over a phrase frequency table
//!
//! This program points a fuzzy matcher at a phrase frequency table such as
//! the frequency lists distilled from the Google Books Ngram dataset (see
//! <http://storage.googleapis.com/books/ngrams/books/datasetsv3.html> for the
//! kind of data this was designed around): one row per phrase, a "phrase"
//! column to search against, and whatever other columns the table carries.

mod config;
mod dataset;
mod matcher;
mod progress;
mod search;
mod top;
mod tui;

use crate::{config::Config, dataset::Table, matcher::ScorerKind, progress::ProgressReport};
use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use tokio::io::{AsyncWriteExt, BufWriter};

/// Fuzzy search over a phrase frequency table
///
/// Point this program at a CSV or TSV file with a "phrase" column and start
/// typing: every keystroke re-runs a fuzzy query against all phrases and
/// redraws the ranked matches. Diacritics and typos are no obstacle, so
/// "egitim reform" will find "eğitim reformu".
#[derive(Parser, Debug)]
#[command(version, author)]
struct Args {
    /// Path to the phrase table
    ///
    /// Accepts comma-separated (.csv) and tab-separated (any other extension)
    /// files, optionally gzipped (.gz). The file must have a header row with
    /// a "phrase" column, which is what fuzzy search runs against. When a
    /// "total_count" column is also present, it is used to rank the preview
    /// shown before the first query.
    #[arg(default_value = config::DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Initial cap on the number of search results
    ///
    /// Knowing the desired number of matches upfront lets the matcher discard
    /// weaker candidates while the ranking is being computed, instead of
    /// sorting the full phrase list on every keystroke.
    ///
    /// Can be adjusted during the session with Ctrl+Left/Right.
    #[arg(short = 'n', long, default_value_t = config::DEFAULT_MAX_RESULTS)]
    max_results: usize,

    /// Initial minimum match score, from 0 to 100
    ///
    /// Phrases scoring below this similarity against the query are not shown
    /// at all. Lower values cast a wider net, at the cost of noisier results.
    ///
    /// Can be adjusted during the session with Ctrl+Up/Down.
    #[arg(short = 's', long, default_value_t = config::DEFAULT_SCORE_CUTOFF)]
    min_score: Score,

    /// Similarity measure used to score phrases against the query
    #[arg(long, value_enum, default_value = "dice")]
    scorer: ScorerKind,

    /// Run a single query and print the matches to stdout, instead of
    /// starting an interactive session
    #[arg(short = 'q', long)]
    query: Option<String>,

    /// Print batch query results as JSON rather than tab-separated text
    #[arg(long, requires = "query")]
    json: bool,
}
//
impl Args {
    /// Decode and validate CLI arguments
    pub fn parse_and_check() -> Result<Self> {
        Self::check(Self::parse())
    }

    /// Check decoded arguments for basic sanity
    fn check(args: Self) -> Result<Self> {
        anyhow::ensure!(
            config::MAX_RESULTS_RANGE.contains(&args.max_results),
            "the result cap must lie within {:?}",
            config::MAX_RESULTS_RANGE
        );
        anyhow::ensure!(
            config::SCORE_CUTOFF_RANGE.contains(&args.min_score),
            "the minimum score must lie within {:?}",
            config::SCORE_CUTOFF_RANGE
        );
        if let Some(query) = &args.query {
            anyhow::ensure!(!query.trim().is_empty(), "a batch query cannot be blank");
        }
        Ok(args)
    }
}
//
#[tokio::main]
async fn main() -> Result<()> {
    // Set up logging
    setup_logging().map_err(|e| anyhow::format_err!("{e}"))?;

    // Decode CLI arguments
    let args = Args::parse_and_check()?;
    let config = Config::new(args);

    // Load the phrase table, reporting progress as rows stream in
    let report = ProgressReport::new();
    let table = dataset::load(&config.data_path, &report)
        .await
        .context("loading the phrase table")?;

    // Run one query in batch mode, or hand over to the interactive session
    match &config.query {
        Some(query) => print_matches(&config, &table, query).await,
        None => tui::run(table, &config),
    }
}

/// Print the outcome of one batch query to stdout
async fn print_matches(config: &Config, table: &Table, query: &str) -> Result<()> {
    let results = search::search(
        table,
        query,
        config.max_results,
        config.score_cutoff,
        &config.scorer,
    );
    if results.is_empty() {
        // Keep stdout clean for scripted consumers, the notice goes to stderr
        eprintln!("No matches found. Try adjusting the score cutoff or search term.");
        return Ok(());
    }

    let stdout = tokio::io::stdout();
    let mut stdout = BufWriter::new(stdout);
    if config.json {
        let report = search::SearchReport::new(table, query, &results);
        let rendered =
            serde_json::to_string_pretty(&report).context("encoding the search report")?;
        stdout.write_all(rendered.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
    } else {
        // Tab-separated with a header, score column first like the table views
        let header = search::result_columns(table).join("\t");
        stdout.write_all(header.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        for result in &results {
            let mut line = format!("{:.1}", result.score);
            for cell in table.row(result.index).cells() {
                line.push('\t');
                line.push_str(&cell.to_string());
            }
            line.push('\n');
            stdout.write_all(line.as_bytes()).await?;
        }
    }
    stdout.flush().await?;
    Ok(())
}

/// Use anyhow for Result type erasure
pub use anyhow::Result;

/// Fuzzy similarity score, from 0 (unrelated) to 100 (identical)
pub type Score = f64;

/// Set up logging
fn setup_logging() -> syslog::Result<()> {
    syslog::init(
        syslog::Facility::LOG_USER,
        if cfg!(feature = "log-trace") {
            LevelFilter::Trace
        } else if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_from(cli: &[&str]) -> Args {
        Args::try_parse_from(cli).expect("test command lines should decode")
    }

    #[test]
    fn accepts_defaults() {
        let args = Args::check(args_from(&["gramscope"])).expect("defaults should be valid");
        assert_eq!(args.data, PathBuf::from(config::DEFAULT_DATA_PATH));
        assert_eq!(args.max_results, config::DEFAULT_MAX_RESULTS);
        assert_eq!(args.min_score, config::DEFAULT_SCORE_CUTOFF);
        assert_eq!(args.scorer, ScorerKind::Dice);
        assert!(args.query.is_none());
        assert!(!args.json);
    }

    #[test]
    fn rejects_result_caps_outside_range() {
        assert!(Args::check(args_from(&["gramscope", "-n", "4"])).is_err());
        assert!(Args::check(args_from(&["gramscope", "-n", "51"])).is_err());
        assert!(Args::check(args_from(&["gramscope", "-n", "50"])).is_ok());
    }

    #[test]
    fn rejects_scores_outside_range() {
        assert!(Args::check(args_from(&["gramscope", "--min-score=-1"])).is_err());
        assert!(Args::check(args_from(&["gramscope", "-s", "150"])).is_err());
        assert!(Args::check(args_from(&["gramscope", "-s", "0"])).is_ok());
    }

    #[test]
    fn rejects_blank_batch_queries() {
        assert!(Args::check(args_from(&["gramscope", "-q", "  "])).is_err());
        assert!(Args::check(args_from(&["gramscope", "-q", "eğitim"])).is_ok());
    }

    #[test]
    fn json_output_requires_a_batch_query() {
        assert!(Args::try_parse_from(["gramscope", "--json"]).is_err());
        assert!(Args::try_parse_from(["gramscope", "--json", "-q", "x"]).is_ok());
    }

    #[test]
    fn scorer_names_decode() {
        assert_eq!(args_from(&["gramscope", "--scorer", "jaro"]).scorer, ScorerKind::Jaro);
        assert_eq!(
            args_from(&["gramscope", "--scorer", "levenshtein"]).scorer,
            ScorerKind::Levenshtein
        );
    }
}
