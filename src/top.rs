//! Idle preview of the most frequent phrases

use crate::dataset::Table;
use std::{
    cmp::{Ordering, Reverse},
    collections::{BinaryHeap, VecDeque},
};

/// Number of rows shown while no query is active
pub const PREVIEW_ROWS: usize = 40;

/// Pick the rows of the idle preview
///
/// When the table has a total count column, the preview shows the most
/// frequent rows first, and rows whose count cell is missing or unusable
/// come last. Without that column, the preview simply shows the first rows
/// of the file. Either way, ties keep the table's row order and at most
/// [`PREVIEW_ROWS`] indices are returned.
pub fn preview_indices(table: &Table) -> Vec<usize> {
    if !table.has_total_counts() {
        return (0..table.len().min(PREVIEW_ROWS)).collect();
    }

    // Single pass over the rows with a bounded min-heap, which beats sorting
    // the whole table for a 40-row preview
    let mut top = BinaryHeap::with_capacity(PREVIEW_ROWS + 1);
    for index in 0..table.len() {
        top.push(Reverse(PreviewRank {
            count: table.total_count(index),
            index,
        }));
        if top.len() > PREVIEW_ROWS {
            top.pop();
        }
    }

    // The min-heap pops the least frequent row first, restore display order
    let mut ranked = VecDeque::with_capacity(top.len());
    while let Some(Reverse(rank)) = top.pop() {
        ranked.push_front(rank.index);
    }
    ranked.into()
}

/// Preview ordering: most frequent rows first, unranked rows last, ties in
/// row order
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct PreviewRank {
    /// Total count of the row, when usable
    count: Option<u64>,

    /// Row index
    index: usize,
}
//
impl Ord for PreviewRank {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.count.cmp(&other.count)).then_with(|| other.index.cmp(&self.index))
    }
}
//
impl PartialOrd for PreviewRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::TableBuilder;

    fn counted_table(counts: &[&str]) -> Table {
        let mut builder = TableBuilder::new(["phrase", "total_count"].into_iter().map(Box::from))
            .expect("the phrase column is present");
        for (row, count) in counts.iter().copied().enumerate() {
            let phrase = format!("phrase {row}");
            builder.push_record([phrase.as_str(), count]);
        }
        builder.finish().expect("test tables have rows")
    }

    #[test]
    fn most_frequent_rows_come_first() {
        let table = counted_table(&["5", "500", "50"]);
        assert_eq!(preview_indices(&table), [1, 2, 0]);
    }

    #[test]
    fn the_preview_is_capped() {
        let counts = (0..43).map(|count| count.to_string()).collect::<Vec<_>>();
        let table = counted_table(&counts.iter().map(String::as_str).collect::<Vec<_>>());
        let expected = (3..43).rev().collect::<Vec<_>>();
        assert_eq!(preview_indices(&table), expected);
    }

    #[test]
    fn unusable_counts_go_last_in_row_order() {
        let table = counted_table(&["10", "", "junk", "20"]);
        assert_eq!(preview_indices(&table), [3, 0, 1, 2]);
    }

    #[test]
    fn equal_counts_keep_row_order() {
        let table = counted_table(&["7", "7", "7"]);
        assert_eq!(preview_indices(&table), [0, 1, 2]);
    }

    #[test]
    fn without_counts_the_preview_keeps_file_order() {
        let mut builder = TableBuilder::new(["phrase"].into_iter().map(Box::from))
            .expect("the phrase column is present");
        for phrase in ["bir", "iki", "üç"] {
            builder.push_record([phrase]);
        }
        let table = builder.finish().expect("test tables have rows");
        assert_eq!(preview_indices(&table), [0, 1, 2]);
    }
}
