pub mod account;
mod csv_utils;
pub mod directory;
pub mod dto;
mod engine;
mod error;
mod runner;
pub mod stores;

pub use account::{Account, AccountNumber, AccountType};
pub use directory::Directory;
pub use engine::{Engine, Transfer};
pub use error::{Error, StoreError};
pub use runner::{run, Command};
pub use stores::{AccountRepository, FileStore, MemoryStore};
