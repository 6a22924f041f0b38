//! Таблица счетов в xlsx/xls/ods: первый лист, строка заголовков ищется по именам.

use crate::{
    error::{ExtratoError, Result},
    model::Account,
    traits::{ReadAccounts, WriteAccounts},
};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::io::{Cursor, Read, Seek, Write};

use super::{ACCOUNT_HEADER, BRANCH_HEADER, TEST_CUSTOMER_HEADER};

pub struct XlsxAccounts;

/// Значение ячейки как текст: целые числа без `.0`, идентификаторы не превращаются в числа.
pub(crate) fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    }
}

impl ReadAccounts for XlsxAccounts {
    fn read<R: Read + Seek>(mut r: R) -> Result<Vec<Account>> {
        let mut buf = Vec::new();
        r.read_to_end(&mut buf)?;
        let mut wb = open_workbook_auto_from_rs(Cursor::new(buf))?;
        let range = wb
            .worksheet_range_at(0)
            .ok_or_else(|| ExtratoError::Config("input workbook has no sheets".into()))??;

        let mut rows = range.rows();
        let header: Vec<String> = match rows.next() {
            Some(h) => h.iter().map(cell_text).collect(),
            None => return Ok(Vec::new()),
        };
        let col = |name: &str| header.iter().position(|h| h == name);

        let branch_col = col(BRANCH_HEADER).ok_or_else(|| {
            ExtratoError::Config(format!("input table has no '{BRANCH_HEADER}' column"))
        })?;
        let account_col = col(ACCOUNT_HEADER).ok_or_else(|| {
            ExtratoError::Config(format!("input table has no '{ACCOUNT_HEADER}' column"))
        })?;
        let mci_col = col(TEST_CUSTOMER_HEADER);

        let at = |row: &[Data], idx: usize| row.get(idx).map(cell_text).unwrap_or_default();

        let mut accounts = Vec::new();
        for row in rows {
            let branch = at(row, branch_col);
            let account = at(row, account_col);
            if branch.is_empty() && account.is_empty() {
                continue;
            }
            let mci = mci_col.map(|c| at(row, c)).filter(|v| !v.is_empty());
            accounts.push(Account::new(branch, account, mci));
        }
        Ok(accounts)
    }
}

impl WriteAccounts for XlsxAccounts {
    fn write<W: Write + Seek + Send>(w: W, accounts: &[Account]) -> Result<()> {
        let mut sheet = Worksheet::new();
        for (col, name) in [TEST_CUSTOMER_HEADER, BRANCH_HEADER, ACCOUNT_HEADER]
            .into_iter()
            .enumerate()
        {
            sheet.write_string(0, col as u16, name)?;
        }
        for (i, a) in accounts.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, a.test_customer_id.as_deref().unwrap_or(""))?;
            sheet.write_string(row, 1, a.branch_code.as_str())?;
            sheet.write_string(row, 2, a.account_number.as_str())?;
        }

        let mut wb = Workbook::new();
        wb.push_worksheet(sheet);
        wb.save_to_writer(w)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_cells_render_without_fraction() {
        assert_eq!(cell_text(&Data::Float(5087.0)), "5087");
        assert_eq!(cell_text(&Data::Int(551)), "551");
        assert_eq!(cell_text(&Data::String(" 0452 ".into())), "0452");
        assert_eq!(cell_text(&Data::Empty), "");
    }
}
