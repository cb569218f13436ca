//! One fuzzy query, from raw text to scored table rows

use crate::{
    dataset::Table,
    matcher::{self, ScoredIndex, Scorer},
    Score,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Name of the synthetic score column that search results prepend to the
/// table's own columns
pub const SCORE_COLUMN: &str = "match_score";

/// One search hit
///
/// Only meaningful against the table it was produced from: `index` points
/// into that table's rows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchResult {
    /// Similarity between the query and the row's phrase
    pub score: Score,

    /// Index of the matched row
    pub index: usize,
}
//
impl MatchResult {
    /// Key/value payload of the matched row, score included
    pub fn to_json(&self, table: &Table) -> Value {
        let mut map = Map::with_capacity(table.columns().len() + 1);
        map.insert(SCORE_COLUMN.to_owned(), Value::from(self.score));
        for (column, cell) in table.columns().iter().zip(table.row(self.index).cells()) {
            map.insert(column.to_string(), cell.to_json());
        }
        Value::Object(map)
    }
}

/// Run one query against the table
///
/// Returns at most `limit` rows whose phrase scores at least `score_cutoff`
/// against the query, best match first. Rows with equal scores keep the
/// table's row order, so re-running a query always reproduces the same
/// ranking.
pub fn search(
    table: &Table,
    query: &str,
    limit: usize,
    score_cutoff: Score,
    scorer: &dyn Scorer,
) -> Vec<MatchResult> {
    debug_assert!(!query.is_empty(), "an empty query means no search at all");
    let candidates = table.phrases().collect::<Vec<_>>();
    let ranked = matcher::extract(scorer, query, &candidates, limit, score_cutoff);
    log::debug!(
        "query {query:?} matched {}/{} phrases",
        ranked.len(),
        candidates.len()
    );
    (ranked.into_iter())
        .map(|ScoredIndex { score, index }| MatchResult { score, index })
        .collect()
}

/// Columns of the search result display: the synthetic score column first,
/// then every column of the source table
pub fn result_columns(table: &Table) -> Vec<&str> {
    std::iter::once(SCORE_COLUMN)
        .chain(table.columns().iter().map(|column| &**column))
        .collect()
}

/// Machine-readable outcome of one batch query
#[derive(Debug, Serialize)]
pub struct SearchReport {
    /// Query text
    pub query: Box<str>,

    /// Number of matches
    pub matches: usize,

    /// Matched rows with their scores, best match first
    pub results: Vec<Value>,
}
//
impl SearchReport {
    /// Package search results for JSON output
    pub fn new(table: &Table, query: &str, results: &[MatchResult]) -> Self {
        Self {
            query: query.into(),
            matches: results.len(),
            results: (results.iter()).map(|result| result.to_json(table)).collect(),
        }
    }
}
