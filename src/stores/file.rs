//! File-backed record store, one JSON object per line.
//!
//! Appends go straight to the end of the file. Rewrites go to a temporary
//! file in the same directory which is then renamed over the store, so a
//! reader never sees a half-written store. The replacement keeps the
//! permissions of the file it replaces.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::{AccountRepository, Scan};
use crate::account::Account;
use crate::dto;
use crate::error::StoreError;

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl AccountRepository for FileStore {
    fn append(&self, account: &Account) -> Result<(), StoreError> {
        let line = dto::encode_line(account)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        file.flush()?;
        debug!(path = %self.path.display(), account = account.number, "appended record");
        Ok(())
    }

    fn rewrite_all(&self, accounts: &[Account]) -> Result<(), StoreError> {
        let mut tmp = NamedTempFile::new_in(self.parent_dir())?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            for account in accounts {
                writeln!(writer, "{}", dto::encode_line(account)?)?;
            }
            writer.flush()?;
        }
        match fs::metadata(&self.path) {
            Ok(existing) => tmp.as_file().set_permissions(existing.permissions())?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        debug!(path = %self.path.display(), records = accounts.len(), "rewrote store");
        Ok(())
    }

    fn scan(&self) -> Result<Scan, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Scan::default()),
            Err(e) => return Err(e.into()),
        };
        let lines = BufReader::new(file)
            .lines()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Scan::from_lines(lines.iter().map(String::as_str)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountType;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn account(number: u64, account_type: AccountType, balance: Decimal) -> Account {
        Account::open(number, account_type, balance).unwrap()
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("accounts.txt"));
        assert!(store.load_all().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_append_creates_file_and_loads_back() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("accounts.txt"));
        let first = account(111_111_111, AccountType::Savings, dec!(100));
        let second = account(222_222_222, AccountType::Business, Decimal::ZERO);

        store.append(&first).unwrap();
        store.append(&second).unwrap();

        assert_eq!(store.load_all().unwrap(), vec![first, second]);
        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_rewrite_all_replaces_content_in_order() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("accounts.txt"));
        let a = account(1, AccountType::Savings, dec!(1));
        let b = account(2, AccountType::Current, dec!(2));
        let c = account(3, AccountType::Personal, dec!(3));
        store.append(&a).unwrap();
        store.append(&b).unwrap();

        store.rewrite_all(&[c.clone(), a.clone()]).unwrap();

        assert_eq!(store.load_all().unwrap(), vec![c, a]);
    }

    #[test]
    fn test_rewrite_all_with_empty_set_truncates() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("accounts.txt"));
        store.append(&account(1, AccountType::Savings, dec!(1))).unwrap();

        store.rewrite_all(&[]).unwrap();

        assert_eq!(fs::read_to_string(store.path()).unwrap(), "");
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_rewrite_of_load_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("accounts.txt"));
        for (n, t) in AccountType::ALL.into_iter().enumerate() {
            store
                .append(&account(n as u64 + 1, t, Decimal::new(n as i64 * 1025, 2)))
                .unwrap();
        }

        store.rewrite_all(&store.load_all().unwrap()).unwrap();
        let once = fs::read_to_string(store.path()).unwrap();
        store.rewrite_all(&store.load_all().unwrap()).unwrap();
        let twice = fs::read_to_string(store.path()).unwrap();

        assert_eq!(once, twice);
        assert_eq!(store.load_all().unwrap().len(), 4);
    }

    #[test]
    fn test_loads_store_with_float_balances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accounts.txt");
        fs::write(
            &path,
            concat!(
                "{\"account_number\": 512345678, \"password\": \"4821\", \"account_type\": \"savings\", \"balance\": 150.0}\n",
                "{\"account_number\": 612345678, \"password\": \"1002\", \"account_type\": \"current\", \"balance\": 0.30000000000000004}\n",
            ),
        )
        .unwrap();

        let accounts = FileStore::new(&path).load_all().unwrap();

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].balance(), dec!(150));
        assert_eq!(accounts[0].password(), "4821");
        assert_eq!(accounts[1].balance(), dec!(0.3));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accounts.txt");
        fs::write(
            &path,
            concat!(
                "{\"account_number\":1,\"password\":\"1234\",\"account_type\":\"savings\",\"balance\":\"10\"}\n",
                "{\"account_number\":2,\"password\n",
                "\n",
                "{\"account_number\":3,\"password\":\"1234\",\"account_type\":\"crypto\",\"balance\":\"10\"}\n",
            ),
        )
        .unwrap();

        let scan = FileStore::new(&path).scan().unwrap();

        assert_eq!(scan.accounts.len(), 1);
        let lines: Vec<_> = scan.skipped.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn test_rewrite_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("accounts.txt"));
        store
            .rewrite_all(&[account(1, AccountType::Savings, dec!(1))])
            .unwrap();

        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_rewrite_keeps_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("accounts.txt"));
        store.append(&account(1, AccountType::Savings, dec!(1))).unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

        store.rewrite_all(&store.load_all().unwrap()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_unreadable_store_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be read as a store file.
        let store = FileStore::new(dir.path());
        assert!(matches!(store.load_all(), Err(StoreError::Io(_))));
    }
}
