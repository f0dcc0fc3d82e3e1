use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub type Item = String;
pub type CustomerId = String;

/// A set of unique items kept in canonical (sorted) order.
///
/// The canonical order gives structural equality, hashing and a total order, so an itemset
/// can be used directly as a map key and renders deterministically.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[serde(from = "Vec<Item>", into = "Vec<Item>")]
pub struct Itemset {
    items: Vec<Item>,
}

impl Itemset {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Item>,
    {
        Self::from(items.into_iter().map(Into::into).collect_vec())
    }

    pub fn singleton(item: impl Into<Item>) -> Self {
        Self {
            items: vec![item.into()],
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }

    pub fn last(&self) -> Option<&Item> {
        self.items.last()
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items
            .binary_search_by(|probe| probe.as_str().cmp(item))
            .is_ok()
    }

    /// True if every item of `self` is present in `other`.
    /// Walks both sorted sequences once.
    pub fn is_subset_of(&self, other: &Itemset) -> bool {
        if self.len() > other.len() {
            return false;
        }
        let mut other_items = other.items.iter();
        'outer: for item in self.items.iter() {
            for candidate in other_items.by_ref() {
                match candidate.cmp(item) {
                    std::cmp::Ordering::Less => continue,
                    std::cmp::Ordering::Equal => continue 'outer,
                    std::cmp::Ordering::Greater => return false,
                }
            }
            return false;
        }
        true
    }

    pub fn is_disjoint(&self, other: &Itemset) -> bool {
        let (mut left, mut right) = (self.items.iter().peekable(), other.items.iter().peekable());
        while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
            match l.cmp(r) {
                std::cmp::Ordering::Less => {
                    left.next();
                }
                std::cmp::Ordering::Greater => {
                    right.next();
                }
                std::cmp::Ordering::Equal => return false,
            }
        }
        true
    }

    pub fn union(&self, other: &Itemset) -> Itemset {
        Itemset {
            items: self
                .items
                .iter()
                .merge(other.items.iter())
                .dedup()
                .cloned()
                .collect(),
        }
    }

    /// Returns a new itemset with `item` added.
    pub fn with_item(&self, item: &str) -> Itemset {
        if self.contains(item) {
            return self.clone();
        }
        let mut items = self.items.clone();
        let position = items.partition_point(|existing| existing.as_str() < item);
        items.insert(position, item.to_string());
        Itemset { items }
    }

    /// True if both itemsets have the same size and agree on all items except the last one.
    pub fn shares_prefix_with(&self, other: &Itemset) -> bool {
        let size = self.len();
        size == other.len()
            && size > 0
            && self.items[..size - 1] == other.items[..size - 1]
            && self.items[size - 1] != other.items[size - 1]
    }
}

impl From<Vec<Item>> for Itemset {
    fn from(mut items: Vec<Item>) -> Self {
        items.sort_unstable();
        items.dedup();
        Self { items }
    }
}

impl From<Itemset> for Vec<Item> {
    fn from(itemset: Itemset) -> Self {
        itemset.items
    }
}

impl<'a> IntoIterator for &'a Itemset {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.items.iter().join(" "))
    }
}

/// Purchase record of a single customer
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct NamedTransaction {
    pub customer: CustomerId,
    pub items: Itemset,
}
