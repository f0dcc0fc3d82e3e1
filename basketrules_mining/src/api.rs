use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use basketrules_transactions::api::Itemset;

/// Association rule `precedent -> antecedent`.
///
/// Identity and ordering only consider `(precedent, antecedent)`; `confidence` is metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub precedent: Itemset,
    pub antecedent: Itemset,
    /// support(precedent ∪ antecedent) / support(precedent), in [0, 1]
    pub confidence: f64,
}

impl Rule {
    pub fn is_one_to_one(&self) -> bool {
        self.precedent.len() == 1 && self.antecedent.len() == 1
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.precedent == other.precedent && self.antecedent == other.antecedent
    }
}

impl Eq for Rule {}

impl PartialOrd for Rule {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rule {
    fn cmp(&self, other: &Self) -> Ordering {
        self.precedent
            .cmp(&other.precedent)
            .then_with(|| self.antecedent.cmp(&other.antecedent))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ {} }} -> {{ {} }} ({:.4})",
            self.precedent, self.antecedent, self.confidence
        )
    }
}
