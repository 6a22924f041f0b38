//! Сводный отчёт: лист `Log_Execucao` + по листу на каждый счёт.

use crate::{
    error::Result,
    http::preview,
    model::{AccountResult, BatchRun},
    traits::WriteReport,
};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook, Worksheet};
use std::collections::HashSet;
use std::io::{Seek, Write};

use super::{ACCOUNT_HEADER, BRANCH_HEADER};

pub const LOG_SHEET: &str = "Log_Execucao";
pub const LOG_COLUMNS: [&str; 4] = [BRANCH_HEADER, ACCOUNT_HEADER, "Status", "Detalhe"];
pub const STATEMENT_COLUMNS: [&str; 4] = [
    "dataLancamento",
    "numeroDocumento",
    "valorLancamento",
    "textoDescricaoHistorico",
];

/// Предел длины имени листа в xlsx.
pub const MAX_SHEET_NAME: usize = 31;

/// Предел длины текста в ячейке xlsx.
pub const MAX_CELL_CHARS: usize = 32_767;

const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

pub struct XlsxReport;

impl WriteReport for XlsxReport {
    fn write<W: Write + Seek + Send>(w: W, run: &BatchRun) -> Result<()> {
        let bold = Format::new().set_bold();
        let money = Format::new().set_num_format("0.00");

        // фиксированная дата создания: одинаковый прогон даёт одинаковые байты
        let created = ExcelDateTime::from_ymd(2000, 1, 1)?.and_hms(0, 0, 0)?;
        let mut wb = Workbook::new();
        wb.set_properties(&DocProperties::new().set_creation_datetime(&created));
        let mut used = HashSet::new();

        let mut log = Worksheet::new();
        log.set_name(LOG_SHEET)?;
        used.insert(LOG_SHEET.to_lowercase());
        write_header(&mut log, &LOG_COLUMNS, &bold)?;
        for (i, r) in run.results.iter().enumerate() {
            let row = i as u32 + 1;
            log.write_string(row, 0, cell(&r.account().branch_code))?;
            log.write_string(row, 1, cell(&r.account().account_number))?;
            log.write_string(row, 2, r.status().as_str())?;
            log.write_string(row, 3, cell(r.detail()))?;
        }
        wb.push_worksheet(log);

        for r in &run.results {
            let name = sheet_name(&r.account().key(), &mut used);
            wb.push_worksheet(statement_sheet(r, &name, &bold, &money)?);
        }

        wb.save_to_writer(w)?;
        Ok(())
    }
}

fn write_header(sheet: &mut Worksheet, columns: &[&str], bold: &Format) -> Result<()> {
    for (col, name) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, bold)?;
    }
    Ok(())
}

fn statement_sheet(r: &AccountResult, name: &str, bold: &Format, money: &Format) -> Result<Worksheet> {
    let mut sheet = Worksheet::new();
    sheet.set_name(name)?;
    write_header(&mut sheet, &STATEMENT_COLUMNS, bold)?;
    for (i, item) in r.line_items().iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, cell(&item.posting_date))?;
        sheet.write_string(row, 1, cell(&item.document_number))?;
        sheet.write_number_with_format(row, 2, item.amount.to_f64().unwrap_or_default(), money)?;
        sheet.write_string(row, 3, cell(&item.description))?;
    }
    Ok(sheet)
}

fn cell(text: &str) -> &str {
    preview(text, MAX_CELL_CHARS)
}

/// Имя листа: запрещённые символы -> `_`, не длиннее 31, без `'` по краям,
/// повтор получает суффикс `~N`.
pub fn sheet_name(key: &str, used: &mut HashSet<String>) -> String {
    let clean: String = key
        .chars()
        .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let mut base: Vec<char> = clean.chars().take(MAX_SHEET_NAME).collect();
    for idx in [0, base.len().saturating_sub(1)] {
        if base.get(idx) == Some(&'\'') {
            base[idx] = '_';
        }
    }
    let base: String = base.into_iter().collect();

    let mut name = base.clone();
    let mut n = 2;
    while used.contains(&name.to_lowercase()) {
        let suffix = format!("~{n}");
        let keep = MAX_SHEET_NAME - suffix.chars().count();
        name = base.chars().take(keep).collect::<String>() + &suffix;
        n += 1;
    }
    used.insert(name.to_lowercase());
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_keys_are_truncated_to_31() {
        let mut used = HashSet::new();
        let key = format!("{}-{}", "1".repeat(10), "9".repeat(30));
        let name = sheet_name(&key, &mut used);
        assert_eq!(name.chars().count(), 31);
        assert!(key.starts_with(&name));
    }

    #[test]
    fn duplicate_and_illegal_names() {
        let mut used = HashSet::new();
        assert_eq!(sheet_name("551-5087", &mut used), "551-5087");
        assert_eq!(sheet_name("551-5087", &mut used), "551-5087~2");
        assert_eq!(sheet_name("12/3-4:5", &mut used), "12_3-4_5");
        assert_eq!(sheet_name("'551-5087'", &mut used), "_551-5087_");
        assert_eq!(sheet_name("O'Neil-1", &mut used), "O'Neil-1");
    }

    #[test]
    fn apostrophe_after_truncation_is_replaced() {
        let mut used = HashSet::new();
        let key = format!("{}'tail", "1".repeat(30));
        let name = sheet_name(&key, &mut used);
        assert_eq!(name.chars().count(), 31);
        assert!(name.ends_with('_'));
    }

    #[test]
    fn oversized_cell_text_is_capped() {
        let long = "x".repeat(MAX_CELL_CHARS + 10);
        assert_eq!(cell(&long).chars().count(), MAX_CELL_CHARS);
        assert_eq!(cell("HTTP 502"), "HTTP 502");
    }
}
