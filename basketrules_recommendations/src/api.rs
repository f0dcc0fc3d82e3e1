use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use basketrules_transactions::api::{CustomerId, Item};

/// Items recommended per customer, only customers with at least one recommendation are present
pub type Recommendations = BTreeMap<CustomerId, BTreeSet<Item>>;

/// Next product to offer after each purchased product
pub type Successors = BTreeMap<Item, Item>;

/// One link of a product succession chain, `item` is followed by `next`
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Successor {
    pub item: Item,
    pub next: Item,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, Eq, PartialEq)]
/// Totals of a single pipeline run
pub struct PipelineSummary {
    pub transactions: usize,
    pub skipped_lines: usize,
    pub frequent_itemsets: usize,
    pub evaluated_itemsets: usize,
    pub rules: usize,
    pub customers_with_recommendations: usize,
}
