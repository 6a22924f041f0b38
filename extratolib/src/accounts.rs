//! Загрузка входной таблицы счетов; при отсутствии файла — тестовый набор.

use crate::{
    error::{ExtratoError, Result},
    formats::{accounts_csv::CsvAccounts, accounts_xlsx::XlsxAccounts},
    model::Account,
    traits::{AccountTable, ReadAccounts, WriteAccounts},
};
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub fn fixture_accounts() -> Vec<Account> {
    vec![
        Account::new("551", "5087", Some("26968930".into())),
        Account::new("1505", "1348", Some("178961031".into())),
        Account::new("452", "123873", Some("704950857".into())),
    ]
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

pub fn read_accounts(path: &Path) -> Result<Vec<Account>> {
    fn read_with<F: AccountTable>(path: &Path) -> Result<Vec<Account>> {
        let file = File::open(path)?;
        <F as ReadAccounts>::read(BufReader::new(file))
    }

    let res = if is_csv(path) {
        read_with::<CsvAccounts>(path)
    } else {
        read_with::<XlsxAccounts>(path)
    };
    res.map_err(|e| match e {
        ExtratoError::Config(msg) => ExtratoError::Config(format!("{}: {msg}", path.display())),
        other => ExtratoError::Config(format!("cannot read {}: {other}", path.display())),
    })
}

pub fn write_accounts(path: &Path, accounts: &[Account]) -> Result<()> {
    let file = File::create(path)?;
    if is_csv(path) {
        <CsvAccounts as WriteAccounts>::write(file, accounts)
    } else {
        <XlsxAccounts as WriteAccounts>::write(file, accounts)
    }
}

/// Читает таблицу; если файла нет — сначала записывает туда тестовые счета.
pub fn load_or_seed(path: &Path) -> Result<Vec<Account>> {
    if !path.exists() {
        info!(
            "input file {} not found; writing test accounts",
            path.display()
        );
        write_accounts(path, &fixture_accounts())?;
    }
    let accounts = read_accounts(path)?;
    info!("loaded {} accounts from {}", accounts.len(), path.display());
    Ok(accounts)
}
