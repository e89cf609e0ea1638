use anyhow::Result;
use rust_decimal::Decimal;
use std::io::Write;

use crate::{
    account::{Account, AccountNumber, AccountType},
    csv_utils::write_csv,
    dto::AccountRow,
    stores::AccountRepository,
    Directory, Engine, Error,
};

/// One user action against the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open {
        account_type: AccountType,
        initial_deposit: Decimal,
    },
    Balance {
        account: AccountNumber,
        password: String,
    },
    Deposit {
        account: AccountNumber,
        password: String,
        amount: Decimal,
    },
    Withdraw {
        account: AccountNumber,
        password: String,
        amount: Decimal,
    },
    Transfer {
        account: AccountNumber,
        password: String,
        to: AccountNumber,
        amount: Decimal,
    },
    Close {
        account: AccountNumber,
        password: String,
    },
    /// CSV listing of all accounts, without passwords.
    Export,
    /// Reports records that cannot be loaded.
    Check,
}

/// Runs one command against `store` and writes the outcome to `writer`.
///
/// # Errors
/// Returns an error if:
/// * The credentials do not match an account
/// * The amount is rejected or funds are insufficient
/// * The recipient of a transfer does not exist
/// * The store cannot be read or written
/// * Writing to the output fails
pub fn run<S, W>(store: &S, command: Command, mut writer: W) -> Result<()>
where
    S: AccountRepository,
    W: Write,
{
    let directory = Directory::new(store);
    let engine = Engine::new(store);

    match command {
        Command::Open {
            account_type,
            initial_deposit,
        } => {
            let account = directory.open(account_type, initial_deposit)?;
            writeln!(
                writer,
                "Account created! Your account number is {} and your password is {}",
                account.number,
                account.password()
            )?;
        }
        Command::Balance { account, password } => {
            let account = login(&directory, account, &password)?;
            writeln!(writer, "Your current balance is: {}", account.balance())?;
        }
        Command::Deposit {
            account,
            password,
            amount,
        } => {
            let account = login(&directory, account, &password)?;
            let account = engine.deposit_to(account.number, amount)?;
            writeln!(writer, "Deposit successful! New balance: {}", account.balance())?;
        }
        Command::Withdraw {
            account,
            password,
            amount,
        } => {
            let account = login(&directory, account, &password)?;
            let account = engine.withdraw_from(account.number, amount)?;
            writeln!(writer, "Withdrawal successful! New balance: {}", account.balance())?;
        }
        Command::Transfer {
            account,
            password,
            to,
            amount,
        } => {
            let account = login(&directory, account, &password)?;
            let transfer = engine.transfer(account.number, to, amount)?;
            writeln!(
                writer,
                "Transfer successful! Your new balance is: {}",
                transfer.from.balance()
            )?;
        }
        Command::Close { account, password } => {
            if !directory.remove(account, &password)? {
                return Err(Error::InvalidCredentials.into());
            }
            writeln!(writer, "Account deleted successfully!")?;
        }
        Command::Export => {
            // Sort by account number for deterministic output
            let mut accounts: Vec<_> = store.load_all()?.iter().map(AccountRow::from).collect();
            accounts.sort_by_key(|row| row.account_number);
            write_csv(&mut writer, accounts.into_iter())?;
        }
        Command::Check => {
            let scan = store.scan()?;
            writeln!(
                writer,
                "{} accounts loaded, {} records skipped",
                scan.accounts.len(),
                scan.skipped.len()
            )?;
            for skipped in &scan.skipped {
                writeln!(writer, "line {}: {}", skipped.line, skipped.reason)?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

fn login<S: AccountRepository>(
    directory: &Directory<'_, S>,
    number: AccountNumber,
    password: &str,
) -> Result<Account, Error> {
    directory
        .authenticate(number, password)?
        .ok_or(Error::InvalidCredentials)
}
