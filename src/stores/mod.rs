//! Storage layer for account records. Provides:
//! - The [`AccountRepository`] interface used by the directory and the engine
//! - A file-backed JSON Lines store ([`FileStore`])
//! - An in-process store with the same encoding ([`MemoryStore`])
//!
//! The store is the only source of truth. Every read decodes the full record
//! set and every mutation after creation rewrites it.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use tracing::warn;

use crate::account::Account;
use crate::dto::{self, RecordError};
use crate::error::StoreError;

pub trait AccountRepository {
    /// Appends one record. Used when an account is opened.
    fn append(&self, account: &Account) -> Result<(), StoreError>;

    /// Replaces the whole store with `accounts`, in order.
    fn rewrite_all(&self, accounts: &[Account]) -> Result<(), StoreError>;

    /// Decodes every record, reporting the ones that were skipped.
    fn scan(&self) -> Result<Scan, StoreError>;

    /// Decodes every record. Skipped records are logged and left out.
    fn load_all(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.scan()?.accounts)
    }
}

/// Result of decoding a full store.
#[derive(Debug, Default)]
pub struct Scan {
    pub accounts: Vec<Account>,
    pub skipped: Vec<SkippedRecord>,
}

#[derive(Debug)]
pub struct SkippedRecord {
    /// 1-based line number in the store.
    pub line: usize,
    pub reason: RecordError,
}

impl Scan {
    pub(crate) fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut scan = Scan::default();
        for (idx, line) in lines.into_iter().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match dto::decode_line(line) {
                Ok(account) => scan.accounts.push(account),
                Err(reason) => {
                    warn!(line = idx + 1, %reason, "skipping account record");
                    scan.skipped.push(SkippedRecord {
                        line: idx + 1,
                        reason,
                    });
                }
            }
        }
        scan
    }
}
