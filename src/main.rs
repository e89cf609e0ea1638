use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use rusty_teller::{AccountNumber, AccountType, Command, FileStore};

#[derive(Parser)]
#[command(name = "teller")]
#[command(about = "Single-user bank account records", long_about = None)]
struct Cli {
    /// Account store file
    #[arg(short, long, env = "TELLER_STORE", default_value = "accounts.txt")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a new account
    Open {
        /// savings, current, business or personal
        account_type: AccountType,
        /// Initial deposit
        #[arg(long, default_value = "0")]
        deposit: Decimal,
    },

    /// Show the balance of an account
    Balance {
        account: AccountNumber,
        #[arg(short, long)]
        password: String,
    },

    /// Deposit funds into an account
    Deposit {
        account: AccountNumber,
        amount: Decimal,
        #[arg(short, long)]
        password: String,
    },

    /// Withdraw funds from an account
    Withdraw {
        account: AccountNumber,
        amount: Decimal,
        #[arg(short, long)]
        password: String,
    },

    /// Transfer funds to another account
    Transfer {
        account: AccountNumber,
        /// Recipient account number
        to: AccountNumber,
        amount: Decimal,
        #[arg(short, long)]
        password: String,
    },

    /// Delete an account
    Close {
        account: AccountNumber,
        #[arg(short, long)]
        password: String,
    },

    /// Print all accounts as CSV (no passwords)
    Export,

    /// Report store records that cannot be loaded
    Check,
}

impl From<Commands> for Command {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Open {
                account_type,
                deposit,
            } => Command::Open {
                account_type,
                initial_deposit: deposit,
            },
            Commands::Balance { account, password } => Command::Balance { account, password },
            Commands::Deposit {
                account,
                amount,
                password,
            } => Command::Deposit {
                account,
                password,
                amount,
            },
            Commands::Withdraw {
                account,
                amount,
                password,
            } => Command::Withdraw {
                account,
                password,
                amount,
            },
            Commands::Transfer {
                account,
                to,
                amount,
                password,
            } => Command::Transfer {
                account,
                password,
                to,
                amount,
            },
            Commands::Close { account, password } => Command::Close { account, password },
            Commands::Export => Command::Export,
            Commands::Check => Command::Check,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = FileStore::new(cli.store);

    if let Err(err) = rusty_teller::run(&store, cli.command.into(), std::io::stdout()) {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}
