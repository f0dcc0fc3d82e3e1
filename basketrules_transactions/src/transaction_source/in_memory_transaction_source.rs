use std::io::{BufRead, Cursor};

use crate::transaction_source::{TransactionSource, TransactionSourceError};

/// Transaction source backed by text already held in memory
#[derive(Default, Clone)]
pub struct InMemoryTransactionSource {
    name: String,
    content: String,
}

impl InMemoryTransactionSource {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let content = lines
            .into_iter()
            .fold(String::new(), |mut content, line| {
                content.push_str(line.as_ref());
                content.push('\n');
                content
            });
        Self::new("in-memory", content)
    }
}

impl TransactionSource for InMemoryTransactionSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn open(&self) -> Result<Box<dyn BufRead + '_>, TransactionSourceError> {
        Ok(Box::new(Cursor::new(self.content.as_bytes())))
    }
}

#[cfg(test)]
mod in_memory_transaction_source_tests {
    use super::*;

    #[test]
    /// Every open starts reading from the beginning
    fn test_open_twice() {
        let source = InMemoryTransactionSource::from_lines(["Alice Smith A", "Bob Jones B"]);

        for _ in 0..2 {
            let lines: Vec<String> = source
                .open()
                .unwrap()
                .lines()
                .collect::<Result<_, _>>()
                .unwrap();
            assert_eq!(lines, vec!["Alice Smith A", "Bob Jones B"]);
        }
        assert_eq!(source.name(), "in-memory");
    }
}
