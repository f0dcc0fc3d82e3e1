pub use file_transaction_source::FileTransactionSource;
pub use in_memory_transaction_source::InMemoryTransactionSource;

use std::io::BufRead;

mod file_transaction_source;
mod in_memory_transaction_source;

#[derive(thiserror::Error, Debug)]
pub enum TransactionSourceError {
    #[error("Transaction source {source_name} is unavailable: {source}")]
    SourceUnavailable {
        source_name: String,
        source: std::io::Error,
    },

    #[error("Failed to read transaction source {source_name}: {source}")]
    Read {
        source_name: String,
        source: std::io::Error,
    },
}

/// Provider of raw transaction lines, one customer per line
pub trait TransactionSource {
    /// Human readable name of the source, used in logs and errors
    fn name(&self) -> String;

    /// Opens the source for reading from the beginning
    fn open(&self) -> Result<Box<dyn BufRead + '_>, TransactionSourceError>;
}
