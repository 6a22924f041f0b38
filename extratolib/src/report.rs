//! Запись сводного отчёта в файл: сначала в память, файл появляется только целиком.

use crate::{
    error::{ExtratoError, Result},
    formats::report_xlsx::XlsxReport,
    model::BatchRun,
    traits::WriteReport,
};
use log::{error, info};
use std::io::Cursor;
use std::path::Path;

pub fn write_file(path: &Path, run: &BatchRun) -> Result<()> {
    write_file_with::<XlsxReport>(path, run)
}

pub fn write_file_with<F: WriteReport>(path: &Path, run: &BatchRun) -> Result<()> {
    info!("writing consolidated report to {}", path.display());
    let res = render::<F>(run).and_then(|bytes| std::fs::write(path, bytes).map_err(ExtratoError::from));

    match res {
        Ok(()) => {
            info!("report {} written", path.display());
            Ok(())
        }
        Err(e) => {
            error!("failed to write report {}: {e}", path.display());
            Err(ExtratoError::Report(format!("{}: {e}", path.display())))
        }
    }
}

fn render<F: WriteReport>(run: &BatchRun) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    F::write(&mut buf, run)?;
    Ok(buf.into_inner())
}
