//! Listing orders for package records.
//!
//! Both sorts are stable, so rows that compare equal keep their storage order
//! (insertion order for [`crate::storage::JsonStorage`]).

use super::models::PackageRecord;
use std::cmp::Reverse;

/// Sorts records by usage count, most used first.
///
/// # Examples
///
/// ```
/// use modstash::storage::{sort_by_frequency, PackageRecord};
///
/// let mut low = PackageRecord::new(1, "a", "x/a", None);
/// low.freq = 1;
/// let mut high = PackageRecord::new(2, "b", "x/b", None);
/// high.freq = 5;
///
/// let mut records = vec![low, high];
/// sort_by_frequency(&mut records);
/// assert_eq!(records[0].name, "b");
/// ```
pub fn sort_by_frequency(records: &mut [PackageRecord]) {
    records.sort_by_key(|r| Reverse(r.freq));
}

/// Sorts records by last install time, most recent first.
///
/// Records that were never installed go last.
pub fn sort_by_last_used(records: &mut [PackageRecord]) {
    // `None < Some(_)`, so reversing puts never-used rows at the end.
    records.sort_by_key(|r| Reverse(r.last_used));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, freq: u32, last_used: Option<i64>) -> PackageRecord {
        let mut r = PackageRecord::new(id, format!("p{id}"), format!("x/p{id}"), None);
        r.freq = freq;
        r.last_used = last_used;
        r
    }

    #[test]
    fn frequency_sort_is_descending_and_stable() {
        let mut records = vec![record(1, 2, None), record(2, 7, None), record(3, 2, None)];
        sort_by_frequency(&mut records);
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn last_used_sort_puts_never_used_last() {
        let mut records = vec![
            record(1, 0, None),
            record(2, 1, Some(100)),
            record(3, 1, Some(300)),
            record(4, 0, None),
        ];
        sort_by_last_used(&mut records);
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1, 4]);
    }
}
