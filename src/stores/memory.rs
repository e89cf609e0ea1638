use std::cell::RefCell;

use super::{AccountRepository, Scan};
use crate::account::Account;
use crate::dto;
use crate::error::StoreError;

/// In-process store holding encoded record lines.
///
/// Uses the same line encoding as [`super::FileStore`], so decoding rules
/// (skipped records, rounding) behave identically.
#[derive(Debug, Default)]
pub struct MemoryStore {
    lines: RefCell<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            lines: RefCell::new(Vec::new()),
        }
    }

    /// Seeds the store with raw record lines.
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: RefCell::new(lines.into_iter().map(Into::into).collect()),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl AccountRepository for MemoryStore {
    fn append(&self, account: &Account) -> Result<(), StoreError> {
        let line = dto::encode_line(account)?;
        self.lines.borrow_mut().push(line);
        Ok(())
    }

    fn rewrite_all(&self, accounts: &[Account]) -> Result<(), StoreError> {
        let lines = accounts
            .iter()
            .map(dto::encode_line)
            .collect::<Result<Vec<_>, _>>()?;
        *self.lines.borrow_mut() = lines;
        Ok(())
    }

    fn scan(&self) -> Result<Scan, StoreError> {
        let lines = self.lines.borrow();
        Ok(Scan::from_lines(lines.iter().map(String::as_str)))
    }
}
