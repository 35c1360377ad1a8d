use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::CountOverflow;
use crate::parser::GradeRecord;

/// Finalized statistics for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateEntry {
    pub key: String,
    pub total_taught_count: u64,
    pub a_percent_avg: f64,
    pub fail_percent_avg: f64,
}

// Running sums; only divided in `Aggregator::finalize`.
#[derive(Debug, Default)]
struct Accumulator {
    total_taught_count: u64,
    a_percent_sum: f64,
    fail_percent_sum: f64,
    sample_count: u64,
}

/// Two-pass grouping: `add` records, then `finalize` once.
///
/// Percentages are plain sample means over contributing lines; they are not
/// weighted by `taught_count`.
#[derive(Debug, Default)]
pub struct Aggregator {
    groups: IndexMap<String, Accumulator>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds `record` into the group named `key`, creating it on first sight.
    ///
    /// # Errors
    ///
    /// Returns [`CountOverflow`] if the group's taught total no longer fits in
    /// a `u64`. The group is left unchanged in that case.
    pub fn add(&mut self, key: String, record: &GradeRecord) -> Result<(), CountOverflow> {
        let entry = self.groups.entry(key);
        let slot = entry.index();
        let acc = entry.or_default();

        let Some(total) = acc.total_taught_count.checked_add(record.taught_count) else {
            let key = self
                .groups
                .get_index(slot)
                .map(|(key, _)| key.clone())
                .unwrap_or_default();
            return Err(CountOverflow {
                key,
                taught_count: record.taught_count,
            });
        };

        acc.total_taught_count = total;
        acc.a_percent_sum += record.a_percent;
        acc.fail_percent_sum += record.fail_percent;
        acc.sample_count += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Divides each group's sums by its sample count. Consumes the aggregator.
    pub fn finalize(self) -> GroupedStats {
        let entries = self
            .groups
            .into_iter()
            .filter(|(_, acc)| acc.sample_count > 0)
            .map(|(key, acc)| {
                let n = acc.sample_count as f64;
                let entry = AggregateEntry {
                    key: key.clone(),
                    total_taught_count: acc.total_taught_count,
                    a_percent_avg: acc.a_percent_sum / n,
                    fail_percent_avg: acc.fail_percent_sum / n,
                };
                (key, entry)
            })
            .collect();

        GroupedStats { entries }
    }
}

/// Groups in first-seen order. Serializes as a list of entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedStats {
    entries: IndexMap<String, AggregateEntry>,
}

impl GroupedStats {
    pub fn iter(&self) -> indexmap::map::Values<'_, String, AggregateEntry> {
        self.entries.values()
    }

    pub fn get(&self, key: &str) -> Option<&AggregateEntry> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Same entries ordered by key instead of first appearance.
    pub fn sorted_by_key(mut self) -> Self {
        self.entries.sort_keys();
        self
    }
}

impl Serialize for GroupedStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.values())
    }
}

impl<'a> IntoIterator for &'a GroupedStats {
    type Item = &'a AggregateEntry;
    type IntoIter = indexmap::map::Values<'a, String, AggregateEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

/// Groups the records accepted by `predicate` under `key_fn` and averages them.
///
/// # Errors
///
/// Returns [`CountOverflow`] if a group's taught total overflows.
pub fn aggregate<'a, I, K, P>(
    records: I,
    key_fn: K,
    predicate: P,
) -> Result<GroupedStats, CountOverflow>
where
    I: IntoIterator<Item = &'a GradeRecord>,
    K: Fn(&GradeRecord) -> String,
    P: Fn(&GradeRecord) -> bool,
{
    let mut aggregator = Aggregator::new();
    let mut matched = 0usize;

    for record in records {
        if !predicate(record) {
            continue;
        }
        matched += 1;
        aggregator.add(key_fn(record), record)?;
    }

    debug!(matched, groups = aggregator.len(), "Records aggregated");
    Ok(aggregator.finalize())
}
