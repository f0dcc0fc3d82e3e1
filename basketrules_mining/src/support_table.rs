use std::collections::hash_map::Entry;
use std::collections::HashMap;

use basketrules_transactions::api::Itemset;

/// Absolute support (number of containing transactions) of every itemset evaluated by the miner.
///
/// Keys are written once; the table never shrinks.
#[derive(Debug, Default, Clone)]
pub struct SupportTable {
    counts: HashMap<Itemset, usize>,
}

impl SupportTable {
    /// Records the support of `itemset`. A key that is already present keeps its first count.
    pub fn record(&mut self, itemset: Itemset, count: usize) {
        match self.counts.entry(itemset) {
            Entry::Occupied(entry) => {
                tracing::debug!(
                    "Support of {} already recorded as {}, ignoring {}",
                    entry.key(),
                    entry.get(),
                    count
                );
            }
            Entry::Vacant(entry) => {
                entry.insert(count);
            }
        }
    }

    pub fn support(&self, itemset: &Itemset) -> Option<usize> {
        self.counts.get(itemset).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Itemset, usize)> {
        self.counts.iter().map(|(itemset, count)| (itemset, *count))
    }

    /// Folds another table into this one, keeping existing counts on key collisions
    pub fn merge(&mut self, other: SupportTable) {
        for (itemset, count) in other.counts {
            self.record(itemset, count);
        }
    }
}

/// Number of transactions that contain `candidate` as a subset
pub fn count_support(candidate: &Itemset, transactions: &[Itemset]) -> usize {
    transactions
        .iter()
        .filter(|transaction| candidate.is_subset_of(transaction))
        .count()
}
