use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

pub type AccountNumber = u64;

const ACCOUNT_NUMBERS: std::ops::RangeInclusive<AccountNumber> = 100_000_000..=999_999_999;
const PASSWORDS: std::ops::RangeInclusive<u16> = 1000..=9999;

/// Balances and amounts carry at most this many decimal places.
pub const MAX_SCALE: u32 = 4;

/// True if `amount` needs more than [`MAX_SCALE`] decimal places.
fn too_precise(amount: Decimal) -> bool {
    amount.normalize().scale() > MAX_SCALE
}

/// Account classification. All types share the same balance rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Savings,
    Current,
    Business,
    Personal,
}

impl AccountType {
    pub const ALL: [AccountType; 4] = [
        AccountType::Savings,
        AccountType::Current,
        AccountType::Business,
        AccountType::Personal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "savings",
            AccountType::Current => "current",
            AccountType::Business => "business",
            AccountType::Personal => "personal",
        }
    }

    /// Exact tag match, as stored in records.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses user input, ignoring case and surrounding whitespace.
impl FromStr for AccountType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(&s.trim().to_ascii_lowercase())
            .ok_or_else(|| Error::InvalidAccountType(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub number: AccountNumber,
    pub account_type: AccountType,
    balance: Decimal,
    password: String,
}

impl Account {
    /// Creates an account with a freshly generated 4-digit password.
    pub fn open(
        number: AccountNumber,
        account_type: AccountType,
        initial_balance: Decimal,
    ) -> Result<Self, Error> {
        Self::open_with_rng(&mut rand::thread_rng(), number, account_type, initial_balance)
    }

    pub fn open_with_rng<R: Rng + ?Sized>(
        rng: &mut R,
        number: AccountNumber,
        account_type: AccountType,
        initial_balance: Decimal,
    ) -> Result<Self, Error> {
        if initial_balance < Decimal::ZERO || too_precise(initial_balance) {
            return Err(Error::InvalidAmount);
        }
        Ok(Self {
            number,
            account_type,
            balance: initial_balance,
            password: generate_password(rng),
        })
    }

    /// Rebuilds an account from a stored snapshot, keeping its password.
    pub(crate) fn restore(
        number: AccountNumber,
        account_type: AccountType,
        balance: Decimal,
        password: String,
    ) -> Self {
        Self {
            number,
            account_type,
            balance,
            password,
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Adds a positive amount of at most 4 decimal places. Returns `false` and
    /// leaves the balance untouched otherwise, including on overflow.
    pub fn deposit(&mut self, amount: Decimal) -> bool {
        if amount <= Decimal::ZERO || too_precise(amount) {
            return false;
        }
        match self.balance.checked_add(amount) {
            Some(balance) => {
                self.balance = balance;
                true
            }
            None => false,
        }
    }

    /// Removes `amount` if `0 < amount <= balance` and it has at most 4 decimal
    /// places. Returns `false` and leaves the balance untouched otherwise.
    pub fn withdraw(&mut self, amount: Decimal) -> bool {
        if amount > Decimal::ZERO && amount <= self.balance && !too_precise(amount) {
            self.balance -= amount;
            return true;
        }
        false
    }
}

/// Random 9-digit account number. Collisions are not checked.
pub fn generate_number<R: Rng + ?Sized>(rng: &mut R) -> AccountNumber {
    rng.gen_range(ACCOUNT_NUMBERS)
}

fn generate_password<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.gen_range(PASSWORDS).to_string()
}
