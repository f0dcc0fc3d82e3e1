use std::collections::{BTreeMap, BTreeSet};

use basketrules_mining::api::Rule;
use basketrules_transactions::api::{CustomerId, Item, Itemset};

use crate::api::{Recommendations, Successors};

/// Applies mined rules to customer purchase histories
#[derive(Default)]
pub struct RecommendationsEngine {
    rules_by_precedent_size: BTreeMap<usize, Vec<Rule>>,
    successors: Successors,
}

impl RecommendationsEngine {
    pub fn new(rules: &[Rule]) -> Self {
        Self::with_successors(rules, Successors::new())
    }

    /// Engine that falls back to `successors` for customers no rule matches
    pub fn with_successors(rules: &[Rule], successors: Successors) -> Self {
        let mut rules_by_precedent_size: BTreeMap<usize, Vec<Rule>> = Default::default();
        for rule in rules.iter() {
            rules_by_precedent_size
                .entry(rule.precedent.len())
                .or_default()
                .push(rule.clone());
        }
        Self {
            rules_by_precedent_size,
            successors,
        }
    }

    /// Rule based recommendations, or the successors of the purchases when no rule applies
    pub fn recommendations_for(&self, purchased: &Itemset) -> BTreeSet<Item> {
        let recommended = self.rule_recommendations_for(purchased);
        if recommended.is_empty() {
            return self.successors_for(purchased);
        }
        recommended
    }

    /// Union of the antecedents of every rule whose precedent was purchased, minus the purchases
    pub fn rule_recommendations_for(&self, purchased: &Itemset) -> BTreeSet<Item> {
        self.rules_by_precedent_size
            .range(..=purchased.len())
            .flat_map(|(_, rules)| rules.iter())
            .filter(|rule| rule.precedent.is_subset_of(purchased))
            .flat_map(|rule| rule.antecedent.iter())
            .filter(|item| !purchased.contains(item))
            .cloned()
            .collect()
    }

    /// Successor of every purchased product that has one, minus the purchases
    pub fn successors_for(&self, purchased: &Itemset) -> BTreeSet<Item> {
        purchased
            .iter()
            .filter_map(|item| self.successors.get(item))
            .filter(|next| !purchased.contains(next))
            .cloned()
            .collect()
    }

    pub fn recommend(&self, customers: &BTreeMap<CustomerId, Itemset>) -> Recommendations {
        let recommendations: Recommendations = customers
            .iter()
            .filter_map(|(customer, purchased)| {
                let recommended = self.recommendations_for(purchased);
                if recommended.is_empty() {
                    return None;
                }
                tracing::debug!(
                    "Recommending {} items to {}: {:?}",
                    recommended.len(),
                    customer,
                    recommended
                );
                Some((customer.clone(), recommended))
            })
            .collect();

        tracing::info!(
            customers = customers.len(),
            customers_with_recommendations = recommendations.len(),
            "Generated recommendations"
        );
        recommendations
    }
}

/// Recommendations for every customer matched by at least one rule
pub fn recommend(customers: &BTreeMap<CustomerId, Itemset>, rules: &[Rule]) -> Recommendations {
    RecommendationsEngine::new(rules).recommend(customers)
}
