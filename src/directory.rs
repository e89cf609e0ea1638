//! Account lookup, authentication and removal on top of a record store.
//!
//! Nothing is cached: every call reloads the store.

use rand::Rng;
use rust_decimal::Decimal;
use tracing::info;

use crate::account::{self, Account, AccountNumber, AccountType};
use crate::error::StoreError;
use crate::stores::AccountRepository;
use crate::Error;

pub struct Directory<'a, S> {
    store: &'a S,
}

impl<'a, S: AccountRepository> Directory<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Opens a new account with a random number and password and appends it
    /// to the store.
    pub fn open(&self, account_type: AccountType, initial_balance: Decimal) -> Result<Account, Error> {
        self.open_with_rng(&mut rand::thread_rng(), account_type, initial_balance)
    }

    pub fn open_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        account_type: AccountType,
        initial_balance: Decimal,
    ) -> Result<Account, Error> {
        let number = account::generate_number(rng);
        let account = Account::open_with_rng(rng, number, account_type, initial_balance)?;
        self.store.append(&account)?;
        info!(account = account.number, %account_type, "opened account");
        Ok(account)
    }

    /// First account with the given number.
    pub fn find(&self, number: AccountNumber) -> Result<Option<Account>, StoreError> {
        Ok(self
            .store
            .load_all()?
            .into_iter()
            .find(|account| account.number == number))
    }

    /// Returns the account only if both number and password match exactly.
    /// A wrong password and an unknown number are indistinguishable.
    pub fn authenticate(
        &self,
        number: AccountNumber,
        password: &str,
    ) -> Result<Option<Account>, StoreError> {
        Ok(self
            .find(number)?
            .filter(|account| account.password() == password))
    }

    /// Removes the first record matching both number and password and
    /// rewrites the store. Returns `false` when no record matches.
    pub fn remove(&self, number: AccountNumber, password: &str) -> Result<bool, StoreError> {
        let mut accounts = self.store.load_all()?;
        let Some(idx) = accounts
            .iter()
            .position(|a| a.number == number && a.password() == password)
        else {
            return Ok(false);
        };
        accounts.remove(idx);
        self.store.rewrite_all(&accounts)?;
        info!(account = number, "closed account");
        Ok(true)
    }
}
