//! Таблица счетов в CSV: заголовки `MCITest,Agencia,Conta` (`MCITest` необязателен).

use crate::{
    error::{ExtratoError, Result},
    model::Account,
    traits::{ReadAccounts, WriteAccounts},
};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::io::{Read, Seek, Write};

use super::{BRANCH_HEADER, ACCOUNT_HEADER, TEST_CUSTOMER_HEADER};

#[derive(serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Agencia")]
    agencia: String,
    #[serde(rename = "Conta")]
    conta: String,
    #[serde(rename = "MCITest", default)]
    mci_test: Option<String>,
}

#[derive(serde::Serialize)]
struct CsvOutRow<'a> {
    #[serde(rename = "MCITest")]
    mci_test: &'a str,
    #[serde(rename = "Agencia")]
    agencia: &'a str,
    #[serde(rename = "Conta")]
    conta: &'a str,
}

pub struct CsvAccounts;

impl ReadAccounts for CsvAccounts {
    fn read<R: Read + Seek>(r: R) -> Result<Vec<Account>> {
        let mut rdr = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(r);

        let headers = rdr.headers()?.clone();
        for required in [BRANCH_HEADER, ACCOUNT_HEADER] {
            if !headers.iter().any(|h| h == required) {
                return Err(ExtratoError::Config(format!(
                    "input table has no '{required}' column"
                )));
            }
        }

        let mut accounts = Vec::new();
        for rec in rdr.deserialize::<CsvRow>() {
            let row = rec?;
            if row.agencia.is_empty() && row.conta.is_empty() {
                continue;
            }
            accounts.push(Account::new(
                row.agencia,
                row.conta,
                row.mci_test.filter(|v| !v.is_empty()),
            ));
        }
        Ok(accounts)
    }
}

impl WriteAccounts for CsvAccounts {
    fn write<W: Write + Seek + Send>(w: W, accounts: &[Account]) -> Result<()> {
        let mut wrt = WriterBuilder::new().from_writer(w);
        if accounts.is_empty() {
            wrt.write_record([TEST_CUSTOMER_HEADER, BRANCH_HEADER, ACCOUNT_HEADER])?;
        }
        for a in accounts {
            wrt.serialize(CsvOutRow {
                mci_test: a.test_customer_id.as_deref().unwrap_or(""),
                agencia: &a.branch_code,
                conta: &a.account_number,
            })?;
        }
        wrt.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn leading_zeros_survive() {
        let input = "Agencia,Conta,MCITest\n0551,00005087-X,\n1505,1348,178961031\n";
        let accounts = CsvAccounts::read(Cursor::new(input)).unwrap();
        assert_eq!(
            accounts,
            vec![
                Account::new("0551", "00005087-X", None),
                Account::new("1505", "1348", Some("178961031".into())),
            ]
        );
    }

    #[test]
    fn missing_account_column_is_config_error() {
        let err = CsvAccounts::read(Cursor::new("Agencia,Foo\n1,2\n")).unwrap_err();
        assert!(matches!(err, ExtratoError::Config(_)));
    }
}
