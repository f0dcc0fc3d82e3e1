use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::transaction_source::{TransactionSource, TransactionSourceError};

pub struct FileTransactionSource {
    path: PathBuf,
}

impl FileTransactionSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl TransactionSource for FileTransactionSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> Result<Box<dyn BufRead + '_>, TransactionSourceError> {
        tracing::debug!("Opening transaction file {}", self.path.display());
        let file = File::open(&self.path).map_err(|source| {
            TransactionSourceError::SourceUnavailable {
                source_name: self.name(),
                source,
            }
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}
