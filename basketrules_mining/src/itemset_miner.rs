use std::collections::BTreeSet;

use basketrules_transactions::api::Itemset;

use crate::support_table::{count_support, SupportTable};

/// Counters for a single level of the level-wise search
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct LevelStats {
    /// Size of the itemsets evaluated at this level
    pub level: usize,
    pub candidates: usize,
    pub frequent: usize,
}

#[derive(Debug, Default, Clone)]
pub struct MiningOutcome {
    /// Frequent itemsets, level by level, each level in canonical order
    pub frequent: Vec<Itemset>,
    /// Support of every evaluated candidate, frequent or not
    pub support: SupportTable,
    pub levels: Vec<LevelStats>,
    pub min_support_count: usize,
}

impl MiningOutcome {
    /// Size of the largest frequent itemset, 0 if nothing was found
    pub fn max_itemset_size(&self) -> usize {
        self.frequent
            .iter()
            .map(Itemset::len)
            .max()
            .unwrap_or_default()
    }
}

/// Apriori frequent itemset miner
#[derive(Debug, Clone)]
pub struct ItemsetMiner {
    min_support_percent: f64,
}

impl ItemsetMiner {
    pub fn new(min_support_percent: f64) -> Self {
        Self {
            min_support_percent,
        }
    }

    /// ceil(min_support_percent / 100 * transaction_count)
    pub fn min_support_count(&self, transaction_count: usize) -> usize {
        let count = (self.min_support_percent * transaction_count as f64 / 100.0).ceil();
        if count <= 0.0 {
            0
        } else {
            count as usize
        }
    }

    pub fn mine(&self, transactions: &[Itemset]) -> MiningOutcome {
        let min_support_count = self.min_support_count(transactions.len());
        // An itemset never seen in any transaction is not frequent, even with a zero threshold
        let threshold = min_support_count.max(1);

        let mut outcome = MiningOutcome {
            min_support_count,
            ..Default::default()
        };

        let mut candidates = seed_candidates(transactions);
        let mut level = 1;
        while !candidates.is_empty() {
            let candidates_count = candidates.len();
            let frequent = filter_candidates(
                candidates,
                transactions,
                threshold,
                &mut outcome.support,
            );
            tracing::debug!(
                level,
                candidates = candidates_count,
                frequent = frequent.len(),
                "Evaluated mining level"
            );
            outcome.levels.push(LevelStats {
                level,
                candidates: candidates_count,
                frequent: frequent.len(),
            });
            if frequent.is_empty() {
                break;
            }

            candidates = generate_candidates(&frequent);
            outcome.frequent.extend(frequent);
            level += 1;
        }

        tracing::info!(
            transactions = transactions.len(),
            min_support_count,
            frequent_itemsets = outcome.frequent.len(),
            evaluated_itemsets = outcome.support.len(),
            max_itemset_size = outcome.max_itemset_size(),
            "Mined frequent itemsets"
        );
        outcome
    }
}

/// One single-item candidate for every distinct item, in item order
fn seed_candidates(transactions: &[Itemset]) -> Vec<Itemset> {
    transactions
        .iter()
        .flatten()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|item| Itemset::singleton(item.clone()))
        .collect()
}

/// Counts support of every candidate into `support` and returns those reaching `min_support_count`
fn filter_candidates(
    candidates: Vec<Itemset>,
    transactions: &[Itemset],
    min_support_count: usize,
    support: &mut SupportTable,
) -> Vec<Itemset> {
    let mut frequent = Vec::new();
    for candidate in candidates {
        let count = count_support(&candidate, transactions);
        if count >= min_support_count {
            frequent.push(candidate.clone());
        }
        support.record(candidate, count);
    }
    frequent
}

/// Joins frequent k-itemsets sharing their first k-1 items into (k+1)-candidates.
///
/// `level` must hold itemsets of one size in canonical order, so that itemsets with a common
/// prefix are adjacent.
fn generate_candidates(level: &[Itemset]) -> Vec<Itemset> {
    debug_assert!(level.windows(2).all(|pair| pair[0] < pair[1]));
    let mut candidates = Vec::new();
    for (i, left) in level.iter().enumerate() {
        for right in level[i + 1..].iter() {
            if !left.shares_prefix_with(right) {
                break;
            }
            if let Some(last) = right.last() {
                candidates.push(left.with_item(last));
            }
        }
    }
    candidates
}
