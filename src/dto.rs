use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::{Account, AccountNumber, AccountType, MAX_SCALE};

/// One line of the record store.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AccountRecord {
    pub account_number: AccountNumber,
    pub password: String,
    pub account_type: String,
    #[serde(deserialize_with = "deserialize_decimal_4dp")]
    pub balance: Decimal,
}

/// Row of the CSV account listing. Passwords are never exported.
#[derive(Debug, Serialize, PartialEq)]
pub struct AccountRow {
    pub account_number: AccountNumber,
    pub account_type: AccountType,
    pub balance: Decimal,
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unrecognized account type `{0}`")]
    UnrecognizedType(String),

    #[error("negative balance {0}")]
    NegativeBalance(Decimal),
}

fn deserialize_decimal_4dp<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    <Decimal as Deserialize>::deserialize(deserializer)
        .map(|dec| dec.round_dp_with_strategy(MAX_SCALE, RoundingStrategy::ToZero))
}

impl From<&Account> for AccountRecord {
    fn from(account: &Account) -> Self {
        Self {
            account_number: account.number,
            password: account.password().to_string(),
            account_type: account.account_type.as_str().to_string(),
            balance: account.balance(),
        }
    }
}

impl TryFrom<AccountRecord> for Account {
    type Error = RecordError;

    fn try_from(record: AccountRecord) -> Result<Self, Self::Error> {
        let account_type = AccountType::from_tag(&record.account_type)
            .ok_or(RecordError::UnrecognizedType(record.account_type))?;
        if record.balance < Decimal::ZERO {
            return Err(RecordError::NegativeBalance(record.balance));
        }
        Ok(Account::restore(
            record.account_number,
            account_type,
            record.balance,
            record.password,
        ))
    }
}

impl From<&Account> for AccountRow {
    fn from(account: &Account) -> Self {
        Self {
            account_number: account.number,
            account_type: account.account_type,
            balance: account.balance(),
        }
    }
}

pub fn encode_line(account: &Account) -> Result<String, serde_json::Error> {
    serde_json::to_string(&AccountRecord::from(account))
}

pub fn decode_line(line: &str) -> Result<Account, RecordError> {
    let record: AccountRecord = serde_json::from_str(line)?;
    Account::try_from(record)
}
