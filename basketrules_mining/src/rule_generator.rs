use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use basketrules_transactions::api::Itemset;

use crate::api::Rule;
use crate::support_table::SupportTable;

pub const DEFAULT_MIN_RULE_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_MIN_SAMPLE_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleGeneratorConfig {
    /// Rules below this confidence are dropped
    pub min_rule_confidence: f64,
    /// Support of both the precedent and the union must be strictly greater than this
    pub min_sample_size: usize,
}

impl Default for RuleGeneratorConfig {
    fn default() -> Self {
        Self {
            min_rule_confidence: DEFAULT_MIN_RULE_CONFIDENCE,
            min_sample_size: DEFAULT_MIN_SAMPLE_SIZE,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct RuleGenerationStats {
    /// Structurally valid (precedent, antecedent) pairs
    pub candidates: usize,
    /// Candidates with known supports above the sample floor
    pub scored: usize,
    /// Rules surviving the confidence and 1-to-1 filters
    pub kept: usize,
}

/// Turns frequent itemsets into scored and filtered association rules
#[derive(Debug, Default, Clone)]
pub struct RuleGenerator {
    config: RuleGeneratorConfig,
}

impl RuleGenerator {
    pub fn new(config: RuleGeneratorConfig) -> Self {
        Self { config }
    }

    /// All disjoint (precedent, antecedent) pairs whose combined size fits in the largest
    /// frequent itemset.
    ///
    /// Itemsets are grouped by size first so that antecedents too large for a given precedent
    /// are never visited.
    pub fn enumerate_candidates(frequent: &[Itemset]) -> Vec<(&Itemset, &Itemset)> {
        let mut by_size: BTreeMap<usize, BTreeSet<&Itemset>> = BTreeMap::new();
        for itemset in frequent.iter() {
            by_size.entry(itemset.len()).or_default().insert(itemset);
        }
        let max_itemset_size = by_size.keys().next_back().copied().unwrap_or_default();

        let mut candidates = Vec::new();
        if max_itemset_size < 2 {
            return candidates;
        }
        for (&precedent_size, precedents) in by_size.range(1..max_itemset_size) {
            let max_antecedent_size = max_itemset_size - precedent_size;
            for precedent in precedents.iter() {
                for antecedents in by_size.range(1..=max_antecedent_size).map(|(_, a)| a) {
                    candidates.extend(
                        antecedents
                            .iter()
                            .filter(|antecedent| precedent.is_disjoint(antecedent))
                            .map(|antecedent| (*precedent, *antecedent)),
                    );
                }
            }
        }
        candidates
    }

    /// Computes the confidence of `precedent -> antecedent`.
    ///
    /// Returns `None` when the support of the precedent or of the union was never recorded, or
    /// when either one does not exceed the sample size floor.
    pub fn score(
        &self,
        precedent: &Itemset,
        antecedent: &Itemset,
        support: &SupportTable,
    ) -> Option<Rule> {
        let union = precedent.union(antecedent);
        let union_support = support.support(&union)?;
        let precedent_support = support.support(precedent)?;

        if precedent_support <= self.config.min_sample_size
            || union_support <= self.config.min_sample_size
        {
            return None;
        }

        Some(Rule {
            precedent: precedent.clone(),
            antecedent: antecedent.clone(),
            confidence: union_support as f64 / precedent_support as f64,
        })
    }

    pub fn is_kept(&self, rule: &Rule) -> bool {
        rule.confidence >= self.config.min_rule_confidence && !rule.is_one_to_one()
    }

    /// Generates the final rule set in canonical order
    pub fn generate(&self, frequent: &[Itemset], support: &SupportTable) -> Vec<Rule> {
        self.generate_with_stats(frequent, support).0
    }

    pub fn generate_with_stats(
        &self,
        frequent: &[Itemset],
        support: &SupportTable,
    ) -> (Vec<Rule>, RuleGenerationStats) {
        let candidates = Self::enumerate_candidates(frequent);
        let mut stats = RuleGenerationStats {
            candidates: candidates.len(),
            ..Default::default()
        };

        let mut rules = BTreeSet::new();
        for (precedent, antecedent) in candidates {
            let Some(rule) = self.score(precedent, antecedent, support) else {
                continue;
            };
            stats.scored += 1;
            if self.is_kept(&rule) {
                rules.insert(rule);
            }
        }
        stats.kept = rules.len();

        tracing::info!(
            candidates = stats.candidates,
            scored = stats.scored,
            kept = stats.kept,
            min_rule_confidence = self.config.min_rule_confidence,
            min_sample_size = self.config.min_sample_size,
            "Generated rules"
        );
        (rules.into_iter().collect(), stats)
    }
}
