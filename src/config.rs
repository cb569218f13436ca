//! Process configuration digested from CLI arguments

use crate::{matcher::ScorerKind, Args, Score};
use std::{ops::RangeInclusive, path::PathBuf, sync::Arc};

/// Dataset file read when no path is given on the command line
pub const DEFAULT_DATA_PATH: &str = "phrases.tsv";

/// Default cap on the number of search results
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Accepted range for the search result cap
pub const MAX_RESULTS_RANGE: RangeInclusive<usize> = 5..=50;

/// Default minimum match score
pub const DEFAULT_SCORE_CUTOFF: Score = 50.0;

/// Accepted range for the minimum match score
pub const SCORE_CUTOFF_RANGE: RangeInclusive<Score> = 0.0..=100.0;

/// Final process configuration
///
/// This is the result of digesting [`Args`]. Please refer to [`Args`] to know
/// more about individual fields. The interactive session copies the search
/// settings into its own state, so that adjusting them mid-session does not
/// require mutating shared configuration.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub struct Config {
    /// Path to the phrase table
    pub data_path: PathBuf,

    // Other fields have the same meaning as in Args
    pub max_results: usize,
    pub score_cutoff: Score,
    pub scorer: ScorerKind,
    pub query: Option<Box<str>>,
    pub json: bool,
}
//
impl Config {
    /// Determine process configuration from decoded CLI arguments
    pub(crate) fn new(args: Args) -> Arc<Self> {
        let Args {
            data,
            max_results,
            min_score,
            scorer,
            query,
            json,
        } = args;
        Arc::new(Self {
            data_path: data,
            max_results,
            score_cutoff: min_score,
            scorer,
            query: query.map(Into::into),
            json,
        })
    }
}
