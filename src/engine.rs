use rust_decimal::Decimal;
use tracing::debug;

use crate::account::{Account, AccountNumber};
use crate::directory::Directory;
use crate::error::StoreError;
use crate::stores::AccountRepository;
use crate::Error;

/// Post-state of a completed transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub from: Account,
    pub to: Account,
}

/// Applies balance mutations and persists them.
///
/// Callers are expected to have authenticated the acting account already;
/// the engine does not check credentials.
pub struct Engine<'a, S> {
    store: &'a S,
}

impl<'a, S: AccountRepository> Engine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn deposit_to(&self, number: AccountNumber, amount: Decimal) -> Result<Account, Error> {
        let mut account = self.find(number)?.ok_or(Error::AccountNotFound)?;
        if !account.deposit(amount) {
            return Err(Error::InvalidAmount);
        }
        self.persist(&[&account])?;
        debug!(account = number, %amount, "deposit");
        Ok(account)
    }

    pub fn withdraw_from(&self, number: AccountNumber, amount: Decimal) -> Result<Account, Error> {
        let mut account = self.find(number)?.ok_or(Error::AccountNotFound)?;
        if !account.withdraw(amount) {
            return Err(Error::InsufficientFunds);
        }
        self.persist(&[&account])?;
        debug!(account = number, %amount, "withdrawal");
        Ok(account)
    }

    /// Moves `amount` between two accounts and rewrites the store once.
    ///
    /// Both accounts are read fresh from the store. Nothing is written unless
    /// the withdrawal succeeds. The two balance changes are applied in memory
    /// before the single rewrite, so a crash in between loses both.
    pub fn transfer(
        &self,
        from: AccountNumber,
        to: AccountNumber,
        amount: Decimal,
    ) -> Result<Transfer, Error> {
        if from == to {
            return Err(Error::SameAccount);
        }
        let sender = self.find(from)?;
        let mut recipient = self.find(to)?.ok_or(Error::RecipientNotFound)?;
        let mut sender = sender.ok_or(Error::AccountNotFound)?;

        if !sender.withdraw(amount) {
            return Err(Error::InsufficientFunds);
        }
        // A successful withdrawal guarantees a positive amount.
        recipient.deposit(amount);

        self.persist(&[&sender, &recipient])?;
        debug!(from, to, %amount, "transfer");
        Ok(Transfer {
            from: sender,
            to: recipient,
        })
    }

    fn find(&self, number: AccountNumber) -> Result<Option<Account>, StoreError> {
        Directory::new(self.store).find(number)
    }

    /// Reloads the store, replaces every record whose number matches one of
    /// `updated`, and rewrites the whole store.
    fn persist(&self, updated: &[&Account]) -> Result<(), StoreError> {
        let mut accounts = self.store.load_all()?;
        for slot in accounts.iter_mut() {
            if let Some(account) = updated.iter().find(|a| a.number == slot.number) {
                *slot = (*account).clone();
            }
        }
        self.store.rewrite_all(&accounts)
    }
}
