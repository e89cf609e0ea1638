//! Domain-specific errors for the account manager.
//!
//! [`Error`] covers business outcomes such as a rejected amount, a missing
//! account or a credential mismatch. [`StoreError`] covers technical failures
//! of the record store and is wrapped by [`Error::Store`] so callers can tell
//! the two apart.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid account type `{0}` (expected savings, current, business or personal)")]
    InvalidAccountType(String),

    #[error("invalid amount")]
    InvalidAmount,

    #[error("insufficient funds or invalid amount")]
    InsufficientFunds,

    #[error("account not found")]
    AccountNotFound,

    #[error("recipient account does not exist")]
    RecipientNotFound,

    #[error("cannot transfer to the same account")]
    SameAccount,

    #[error("invalid account number or password")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}
