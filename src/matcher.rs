//! Fuzzy matching of a query against a candidate list
//!
//! Scoring itself is delegated to the strsim crate, this module only decides
//! how scores are used: every candidate is scored against the query,
//! candidates below the cutoff are dropped, and the best `limit` survivors
//! are kept with a bounded min-heap rather than a full sort.

use crate::Score;
use rayon::prelude::*;
use std::{
    cmp::{Ordering, Reverse},
    collections::{BinaryHeap, VecDeque},
};

/// Fuzzy similarity measure between a query and a candidate phrase
///
/// Implementations must be cheap to call in a tight loop: the matcher scores
/// every phrase of the table on every keystroke.
pub trait Scorer: Sync {
    /// Similarity from 0.0 (unrelated) to 100.0 (identical)
    fn score(&self, query: &str, candidate: &str) -> Score;
}

/// Built-in scorers, all backed by strsim
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum ScorerKind {
    /// Sørensen-Dice similarity over character bigrams
    ///
    /// Tolerant of word reordering and partial overlap, which makes it a
    /// good default for multi-word phrases. Whitespace does not participate
    /// in the comparison.
    #[default]
    Dice,

    /// Normalized Damerau-Levenshtein similarity
    ///
    /// Strict about ordering, tolerant of typos and transpositions.
    Levenshtein,

    /// Jaro-Winkler similarity, which favors matching prefixes
    Jaro,
}
//
impl ScorerKind {
    /// Short label for status displays
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dice => "dice",
            Self::Levenshtein => "levenshtein",
            Self::Jaro => "jaro",
        }
    }
}
//
impl Scorer for ScorerKind {
    fn score(&self, query: &str, candidate: &str) -> Score {
        let unit = match self {
            Self::Dice => strsim::sorensen_dice(query, candidate),
            Self::Levenshtein => strsim::normalized_damerau_levenshtein(query, candidate),
            Self::Jaro => strsim::jaro_winkler(query, candidate),
        };
        unit * 100.0
    }
}

/// Score of one candidate, paired with its position in the candidate list
///
/// The ordering ranks higher scores first and breaks ties in favor of the
/// earliest candidate, so that a given query produces the same ranking no
/// matter how the scoring work was split across threads.
#[derive(Clone, Copy, Debug)]
pub struct ScoredIndex {
    /// Similarity to the query
    pub score: Score,

    /// Position in the candidate list
    pub index: usize,
}
//
impl Ord for ScoredIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.score.total_cmp(&other.score) {
            Ordering::Equal => other.index.cmp(&self.index),
            unequal => unequal,
        }
    }
}
//
impl PartialOrd for ScoredIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
//
impl PartialEq for ScoredIndex {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
//
impl Eq for ScoredIndex {}

/// Pick the candidates that best match the query
///
/// Every candidate is scored in parallel, candidates scoring below
/// `score_cutoff` are discarded, and only the `limit` best survivors are
/// returned, in order of decreasing score. Candidates with equal scores come
/// out in their original list order.
//
// TODO: Pre-filter candidates with a cheap length heuristic if scoring every
//       phrase of a very large table ever makes typing feel sluggish
pub fn extract(
    scorer: &dyn Scorer,
    query: &str,
    candidates: &[&str],
    limit: usize,
    score_cutoff: Score,
) -> Vec<ScoredIndex> {
    // Score all candidates, then determine the top scorers on each thread
    // using a min-heap whose weakest element is evicted on overflow...
    let mut top = (candidates.par_iter().enumerate())
        .filter_map(|(index, candidate)| {
            let score = scorer.score(query, candidate);
            (score >= score_cutoff).then_some(Reverse(ScoredIndex { score, index }))
        })
        .fold(
            || BinaryHeap::with_capacity(limit.saturating_add(1)),
            |mut heap, scored| {
                heap.push(scored);
                if heap.len() > limit {
                    heap.pop();
                }
                heap
            },
        )
        // ...then merge thread results into a global result
        .reduce(BinaryHeap::new, |heap1, heap2| {
            let (mut dst, mut src) = if heap1.len() >= heap2.len() {
                (heap1, heap2)
            } else {
                (heap2, heap1)
            };
            while let Some(elem) = src.pop() {
                dst.push(elem);
                if dst.len() > limit {
                    dst.pop();
                }
            }
            dst
        });

    // Popping a min-heap yields the weakest match first, so route the results
    // through the front of a deque to restore the ranking order
    let mut ranked = VecDeque::with_capacity(top.len());
    while let Some(Reverse(scored)) = top.pop() {
        ranked.push_front(scored);
    }
    ranked.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_dice(
        query: &str,
        candidates: &[&str],
        limit: usize,
        cutoff: Score,
    ) -> Vec<ScoredIndex> {
        extract(&ScorerKind::Dice, query, candidates, limit, cutoff)
    }

    #[test]
    fn identical_strings_score_100() {
        for scorer in [ScorerKind::Dice, ScorerKind::Levenshtein, ScorerKind::Jaro] {
            assert_eq!(scorer.score("eğitim reformu", "eğitim reformu"), 100.0);
        }
    }

    #[test]
    fn unrelated_strings_score_0() {
        assert_eq!(ScorerKind::Dice.score("abc", "xyz"), 0.0);
    }

    #[test]
    fn diacritics_and_truncation_still_match() {
        let score = ScorerKind::Dice.score("egitim reform", "eğitim reformu");
        assert!(score >= 70.0, "expected a strong match, got {score}");
    }

    #[test]
    fn results_come_out_by_decreasing_score() {
        let candidates = ["alpha beta", "alpha", "gamma delta", "alpha bet"];
        let ranked = extract_dice("alpha", &candidates, 10, 0.0);
        assert_eq!(ranked.len(), candidates.len());
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(ranked[0].index, 1);
    }

    #[test]
    fn equal_scores_keep_list_order() {
        let candidates = ["same phrase", "something else", "same phrase"];
        let ranked = extract_dice("same phrase", &candidates, 10, 0.0);
        assert_eq!(ranked[0].index, 0);
        assert_eq!(ranked[0].score, 100.0);
        assert_eq!(ranked[1].index, 2);
        assert_eq!(ranked[1].score, 100.0);
    }

    #[test]
    fn the_cutoff_is_inclusive() {
        let candidates = ["alpha", "alpha!", "omega"];
        let ranked = extract_dice("alpha", &candidates, 10, 100.0);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].index, 0);
    }

    #[test]
    fn the_limit_caps_the_ranking() {
        let candidates = [
            "aaaa", "aaab", "aabb", "abbb", "aaba", "abab", "baba", "bbbb",
        ];
        let ranked = extract_dice("aaaa", &candidates, 5, 0.0);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].index, 0);
        assert_eq!(ranked[0].score, 100.0);
    }

    #[test]
    fn rankings_are_reproducible() {
        let candidates = [
            "eğitim reformu",
            "eğitim sistemi",
            "sağlık reformu",
            "ekonomik kriz",
            "eğitim bakanlığı",
        ];
        let first = extract_dice("egitim", &candidates, 3, 10.0);
        let second = extract_dice("egitim", &candidates, 3, 10.0);
        assert_eq!(first, second);
    }
}
