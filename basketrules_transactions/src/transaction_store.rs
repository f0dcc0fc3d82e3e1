use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::BufRead;

use crate::api::{CustomerId, Itemset, NamedTransaction};
use crate::transaction_source::{TransactionSource, TransactionSourceError};

/// Counters describing how the lines of a source were classified while loading
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct LoadStats {
    pub lines_read: usize,
    /// Lines with no tokens at all
    pub blank: usize,
    /// Lines with a single token, which cannot hold a customer name
    pub malformed: usize,
    /// Lines with a customer name but no items
    pub empty: usize,
    pub loaded: usize,
    /// Lines that were not valid UTF-8 and were decoded with replacement characters
    pub lossy: usize,
}

impl LoadStats {
    /// Lines that did not produce a transaction
    pub fn skipped(&self) -> usize {
        self.blank + self.malformed + self.empty
    }
}

/// Parsed dataset, held both as an anonymous list for mining and keyed by customer
#[derive(Debug, Default, Clone)]
pub struct TransactionStore {
    transactions: Vec<Itemset>,
    named: BTreeMap<CustomerId, Itemset>,
    stats: LoadStats,
}

enum ParsedLine {
    Blank,
    Malformed,
    Empty,
    Transaction(NamedTransaction),
}

/// Decodes a raw line without its terminator, invalid UTF-8 sequences become U+FFFD
fn decode_line(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes)
}

/// Splits a line into `<first-name> <last-name> <item>...`
fn parse_line(line: &str) -> ParsedLine {
    let mut tokens = line.split_whitespace();
    let (first_name, last_name) = match (tokens.next(), tokens.next()) {
        (None, _) => return ParsedLine::Blank,
        (Some(_), None) => return ParsedLine::Malformed,
        (Some(first_name), Some(last_name)) => (first_name, last_name),
    };
    let items = Itemset::new(tokens);
    if items.is_empty() {
        return ParsedLine::Empty;
    }
    ParsedLine::Transaction(NamedTransaction {
        customer: format!("{first_name} {last_name}"),
        items,
    })
}

impl TransactionStore {
    pub fn load(source: &dyn TransactionSource) -> Result<Self, TransactionSourceError> {
        let reader = source.open()?;
        let mut store = TransactionStore::default();

        for line in reader.split(b'\n') {
            let bytes = line.map_err(|source_error| TransactionSourceError::Read {
                source_name: source.name(),
                source: source_error,
            })?;
            store.stats.lines_read += 1;
            let line = decode_line(&bytes);
            if matches!(line, Cow::Owned(_)) {
                store.stats.lossy += 1;
                tracing::warn!(
                    "Line {} of {} is not valid UTF-8, decoded as {:?}",
                    store.stats.lines_read,
                    source.name(),
                    line
                );
            }
            match parse_line(&line) {
                ParsedLine::Blank => store.stats.blank += 1,
                ParsedLine::Malformed => store.stats.malformed += 1,
                ParsedLine::Empty => store.stats.empty += 1,
                ParsedLine::Transaction(transaction) => store.push(transaction),
            }
        }

        if store.stats.malformed > 0 {
            tracing::warn!(
                "Skipped {} malformed lines in {}",
                store.stats.malformed,
                source.name()
            );
        }
        tracing::info!(
            source = %source.name(),
            lines_read = store.stats.lines_read,
            loaded = store.stats.loaded,
            blank = store.stats.blank,
            malformed = store.stats.malformed,
            empty = store.stats.empty,
            lossy = store.stats.lossy,
            customers = store.named.len(),
            "Loaded transactions"
        );
        Ok(store)
    }

    pub fn from_transactions(transactions: impl IntoIterator<Item = NamedTransaction>) -> Self {
        let mut store = TransactionStore::default();
        for transaction in transactions {
            store.stats.lines_read += 1;
            if transaction.items.is_empty() {
                store.stats.empty += 1;
            } else {
                store.push(transaction);
            }
        }
        store
    }

    fn push(&mut self, transaction: NamedTransaction) {
        self.stats.loaded += 1;
        self.transactions.push(transaction.items.clone());
        if let Some(previous) = self
            .named
            .insert(transaction.customer.clone(), transaction.items)
        {
            tracing::warn!(
                "Customer {} appears more than once, replacing purchases {}",
                transaction.customer,
                previous
            );
        }
    }

    /// All transactions in input order, duplicates included
    pub fn transactions(&self) -> &[Itemset] {
        &self.transactions
    }

    pub fn named(&self) -> &BTreeMap<CustomerId, Itemset> {
        &self.named
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
